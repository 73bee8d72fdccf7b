use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::enrollments::entities::{EnrollmentDetail, StudentCourse};

// 选课明细列表响应
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct EnrollmentListResponse {
    pub items: Vec<EnrollmentDetail>,
    pub total: i64,
}

// 学生已选课程列表响应
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct StudentCourseListResponse {
    pub items: Vec<StudentCourse>,
    pub total: i64,
}
