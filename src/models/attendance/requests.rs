use std::collections::HashMap;

use serde::Deserialize;
use ts_rs::TS;

use crate::models::attendance::entities::AttendanceStatus;

// 会话解析请求：定位或创建 (课程, 日期) 对应的课堂会话
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct ResolveSessionRequest {
    pub course_id: i64,
    pub session_date: chrono::NaiveDate,
}

// 名册查询参数：会话 ID 在路径里，课程 ID 在查询串里
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct RosterQueryParams {
    pub course_id: i64,
}

// 批量保存考勤请求
//
// 状态按学生 ID 提交，原始字符串形式。空字符串表示该学生本次未编辑，
// 会在保存前被过滤掉，全部为空时返回 NoRecordsToSave。
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct SaveAttendanceRequest {
    pub records: HashMap<i64, String>,
}

// 学生自助打卡请求：仅允许当天
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct SelfMarkRequest {
    pub course_id: i64,
    pub date: chrono::NaiveDate,
    pub status: AttendanceStatus,
}
