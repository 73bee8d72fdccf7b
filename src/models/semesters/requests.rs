use serde::Deserialize;
use ts_rs::TS;

// 学期查询参数
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/semester.ts")]
pub struct SemesterQueryParams {
    /// true 时仅返回激活学期
    #[serde(default)]
    pub active: bool,
}

// 创建学期请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/semester.ts")]
pub struct CreateSemesterRequest {
    pub name: String,
    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
    #[serde(default)]
    pub is_active: bool,
}
