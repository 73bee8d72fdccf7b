use serde::Deserialize;
use ts_rs::TS;

// 创建院系请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/department.ts")]
pub struct CreateDepartmentRequest {
    pub code: String,
    pub name: String,
}
