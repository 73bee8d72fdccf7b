use serde::Deserialize;
use ts_rs::TS;

// 管理员创建选课记录
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct CreateEnrollmentRequest {
    pub student_id: i64,
    pub course_id: i64,
    pub semester_id: i64,
}

// 学生自助选课：只能为自己选，学期必须处于激活状态
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct SelfEnrollRequest {
    pub course_id: i64,
    pub semester_id: i64,
}
