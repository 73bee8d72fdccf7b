use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct Assignment {
    pub id: i64,
    pub course_id: i64,
    pub title: String,
    pub due_date: Option<chrono::NaiveDate>,
    pub max_marks: f64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// 成绩记录，(assignment_id, student_id) 唯一
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct Grade {
    pub id: i64,
    pub assignment_id: i64,
    pub student_id: i64,
    pub marks_obtained: f64,
    pub graded_at: chrono::DateTime<chrono::Utc>,
}

// 学生成绩历史条目（作业 + 课程联表展开）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GradeHistoryEntry {
    pub assignment_title: String,
    pub course_code: String,
    pub course_name: String,
    pub marks_obtained: f64,
    pub max_marks: f64,
    pub due_date: Option<chrono::NaiveDate>,
    pub graded_at: chrono::DateTime<chrono::Utc>,
}
