use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::courses::entities::Course;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct Enrollment {
    pub id: i64,
    pub student_id: i64,
    pub course_id: i64,
    pub semester_id: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// 选课明细：学生/课程/学期联表展开后的行
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct EnrollmentDetail {
    pub id: i64,
    pub student_id: i64,
    pub student_name: String,
    pub student_email: String,
    pub course_id: i64,
    pub course_code: String,
    pub course_name: String,
    pub semester_id: i64,
    pub semester_name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// 课程名册行：选课记录与学生档案的左联结果。
// 档案联表可能缺失（档案行被策略遮蔽或尚未建立），此时名字字段为空，
// 由考勤名册逻辑负责批量回填。
#[derive(Debug, Clone, PartialEq)]
pub struct CourseRosterRow {
    pub student_id: i64,
    pub full_name: Option<String>,
    pub email: Option<String>,
}

// 学生视角的已选课程
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct StudentCourse {
    pub enrollment_id: i64,
    pub semester_id: i64,
    pub semester_name: String,
    pub course: Course,
}
