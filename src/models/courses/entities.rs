use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct Course {
    // 课程ID
    pub id: i64,
    // 课程编号
    pub code: String,
    // 课程名称
    pub name: String,
    // 课程简介
    pub description: Option<String>,
    // 学分
    pub credits: i32,
    // 所属院系
    pub department_id: i64,
    // 授课教师（可以为空，等待指派）
    pub faculty_id: Option<i64>,
    // 创建时间
    pub created_at: chrono::DateTime<chrono::Utc>,
    // 更新时间
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
