use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::courses::entities::Course;

// 管理员看板统计
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct AdminDashboardStats {
    pub students: i64,
    pub courses: i64,
    pub active_semesters: i64,
    pub enrollments: i64,
    pub recent_courses: Vec<Course>,
}

// 教师看板统计：仅统计自己名下的课程
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct FacultyDashboardStats {
    pub courses: i64,
    pub students: i64,
    pub enrollments: i64,
}

// 学生看板统计
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct StudentDashboardStats {
    pub enrollments: i64,
    pub grades: i64,
    pub attendance: i64,
}

// 看板统计响应（按请求者角色返回对应形态）
#[derive(Debug, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub enum DashboardStats {
    Admin(AdminDashboardStats),
    Faculty(FacultyDashboardStats),
    Student(StudentDashboardStats),
}

// 报表数据集：仅提供原始行，渲染与导出由前端负责

#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct StudentReportRow {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct CourseReportRow {
    pub code: String,
    pub name: String,
    pub credits: i32,
    pub department: String,
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct EnrollmentReportRow {
    pub student: String,
    pub course: String,
    pub semester: String,
}

#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct ReportDatasetResponse<T: TS> {
    pub rows: Vec<T>,
    pub total: i64,
}
