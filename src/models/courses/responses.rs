use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::courses::entities::Course;

// 课程列表响应：目录语义，一次性返回全部匹配课程
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct CourseListResponse {
    pub items: Vec<Course>,
    pub total: i64,
}
