use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::attendance::entities::{AttendanceHistoryEntry, AttendanceStatus};

// 会话解析响应
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct SessionResponse {
    pub session_id: i64,
    pub course_id: i64,
    pub session_date: chrono::NaiveDate,
    pub semester_id: i64,
}

// 名册条目：选课学生与其当前考勤状态的合并视图
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct RosterEntry {
    pub student_id: i64,
    pub full_name: String,
    pub email: String,
    pub status: AttendanceStatus,
}

// 名册响应
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct RosterResponse {
    pub session_id: i64,
    pub entries: Vec<RosterEntry>,
    pub total: i64,
}

// 保存结果响应
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct SaveAttendanceResponse {
    pub saved: i64,
}

// 学生考勤历史响应
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceHistoryResponse {
    pub items: Vec<AttendanceHistoryEntry>,
    pub total: i64,
}
