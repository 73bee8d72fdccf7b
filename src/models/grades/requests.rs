use std::collections::HashMap;

use serde::Deserialize;
use ts_rs::TS;

// 作业查询参数
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct AssignmentQueryParams {
    pub course_id: i64,
}

// 创建作业请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct CreateAssignmentRequest {
    pub course_id: i64,
    pub title: String,
    pub due_date: Option<chrono::NaiveDate>,
    #[serde(default = "default_max_marks")]
    pub max_marks: f64,
}

fn default_max_marks() -> f64 {
    100.0
}

// 批量保存成绩请求：分数按学生 ID 提交，未填写的学生不在其中
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct SaveGradesRequest {
    pub records: HashMap<i64, f64>,
}
