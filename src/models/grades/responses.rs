use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::grades::entities::{Assignment, GradeHistoryEntry};

// 作业列表响应
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct AssignmentListResponse {
    pub items: Vec<Assignment>,
    pub total: i64,
}

// 成绩录入表条目：选课学生与已有成绩的合并视图
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GradeSheetEntry {
    pub student_id: i64,
    pub full_name: String,
    pub email: String,
    pub marks_obtained: Option<f64>,
}

// 成绩录入表响应
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GradeSheetResponse {
    pub assignment_id: i64,
    pub entries: Vec<GradeSheetEntry>,
    pub total: i64,
}

// 保存成绩结果响应
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct SaveGradesResponse {
    pub saved: i64,
}

// 学生成绩历史响应
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GradeHistoryResponse {
    pub items: Vec<GradeHistoryEntry>,
    pub total: i64,
}
