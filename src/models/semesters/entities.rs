use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 学期实体。多个学期可以同时处于激活状态，读取方任取其一。
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/semester.ts")]
pub struct Semester {
    pub id: i64,
    pub name: String,
    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
