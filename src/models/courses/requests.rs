use serde::Deserialize;
use ts_rs::TS;

// 课程查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct CourseQueryParams {
    pub search: Option<String>,
    /// true 时仅返回当前教师自己的课程
    #[serde(default)]
    pub mine: bool,
}

// 创建课程请求
//
// # faculty_id 字段说明
// - 教师创建：可选字段，不填写则自动使用当前登录教师的 ID
// - 管理员创建：可指定任意教师，也可留空等待指派
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct CreateCourseRequest {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(default = "default_credits")]
    pub credits: i32,
    pub department_id: i64,
    pub faculty_id: Option<i64>,
}

fn default_credits() -> i32 {
    3
}

// 课程列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct CourseListQuery {
    pub faculty_id: Option<i64>,
    pub search: Option<String>,
}
