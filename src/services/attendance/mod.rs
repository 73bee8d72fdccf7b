//! 考勤业务逻辑
//!
//! 核心流程分为两步：会话解析（(课程, 日期) 定位或创建课堂会话，见
//! `session` 模块）与名册对账（选课名单与已有考勤记录合并，见 `roster`
//! 模块）。两步必须顺序执行，后者的输入依赖前者的输出。

pub mod history;
pub mod roster;
pub mod save;
pub mod self_mark;
pub mod session;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::CollegeSysError;
use crate::models::attendance::requests::{
    ResolveSessionRequest, SaveAttendanceRequest, SelfMarkRequest,
};
use crate::models::courses::entities::Course;
use crate::models::users::entities::{User, UserRole};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

/// 考勤域错误
///
/// 存储层错误在各变体中原样保留（message/code 信息不丢失），
/// 由 `to_response` 统一映射为 API 错误码。
#[derive(Debug)]
pub enum AttendanceError {
    /// 既无选课记录也无激活学期，无法为新会话推导学期
    NoSemesterAvailable,
    /// 会话插入失败，不自动重试
    SessionCreateFailed(CollegeSysError),
    /// 选课名单查询失败，调用方不得提供点名入口
    RosterUnavailable(CollegeSysError),
    /// 过滤空白状态后没有可保存的记录
    NoRecordsToSave,
    /// 提交的状态值不在 present/absent/late 之内
    InvalidStatus(String),
    /// (会话, 学生) 已有记录
    AlreadyMarked,
    /// 学生自助打卡只允许当天
    InvalidDate,
    /// 学生未选该课程
    NotEnrolled,
    CourseNotFound,
    SessionNotFound,
    /// 授权策略拒绝，附带具体规则与整改提示
    PolicyDenied { rule: &'static str, cause: String },
    Storage(CollegeSysError),
}

impl AttendanceError {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            AttendanceError::NoSemesterAvailable => ErrorCode::NoSemesterAvailable,
            AttendanceError::SessionCreateFailed(_) => ErrorCode::SessionCreateFailed,
            AttendanceError::RosterUnavailable(_) => ErrorCode::RosterUnavailable,
            AttendanceError::NoRecordsToSave => ErrorCode::NoRecordsToSave,
            AttendanceError::InvalidStatus(_) => ErrorCode::BadRequest,
            AttendanceError::AlreadyMarked => ErrorCode::AlreadyMarked,
            AttendanceError::InvalidDate => ErrorCode::InvalidDate,
            AttendanceError::NotEnrolled => ErrorCode::NotEnrolled,
            AttendanceError::CourseNotFound => ErrorCode::CourseNotFound,
            AttendanceError::SessionNotFound => ErrorCode::SessionNotFound,
            AttendanceError::PolicyDenied { .. } => ErrorCode::PermissionDenied,
            AttendanceError::Storage(_) => ErrorCode::DatabaseError,
        }
    }

    /// 面向调用方的消息，保留底层诊断字段
    pub fn user_message(&self) -> String {
        match self {
            AttendanceError::NoSemesterAvailable => {
                "No semester found for this course. Please ensure students are enrolled or an \
                 active semester exists."
                    .to_string()
            }
            AttendanceError::SessionCreateFailed(e) => {
                format!("Failed to create class session: {e}")
            }
            AttendanceError::RosterUnavailable(e) => format!("Failed to load students: {e}"),
            AttendanceError::NoRecordsToSave => {
                "No attendance records to save. Please mark at least one student.".to_string()
            }
            AttendanceError::InvalidStatus(s) => {
                format!("Invalid attendance status: '{s}'. Supported: present, absent, late")
            }
            AttendanceError::AlreadyMarked => {
                "Attendance has already been marked for this course today.".to_string()
            }
            AttendanceError::InvalidDate => {
                "Attendance can only be marked for the current date.".to_string()
            }
            AttendanceError::NotEnrolled => {
                "No enrollment found for this course. Please make sure you are enrolled."
                    .to_string()
            }
            AttendanceError::CourseNotFound => "Course not found".to_string(),
            AttendanceError::SessionNotFound => "Class session not found".to_string(),
            AttendanceError::PolicyDenied { rule, cause } => format!(
                "Operation rejected by authorization policy ({rule}). Please contact your \
                 administrator if you believe you should have access. Details: {cause}"
            ),
            AttendanceError::Storage(e) => format!("Attendance operation failed: {e}"),
        }
    }

    pub fn to_response(&self) -> HttpResponse {
        let body = ApiResponse::error_empty(self.error_code(), self.user_message());
        match self {
            AttendanceError::CourseNotFound | AttendanceError::SessionNotFound => {
                HttpResponse::NotFound().json(body)
            }
            AttendanceError::PolicyDenied { .. } => HttpResponse::Forbidden().json(body),
            AttendanceError::AlreadyMarked => HttpResponse::Conflict().json(body),
            AttendanceError::InvalidStatus(_)
            | AttendanceError::InvalidDate
            | AttendanceError::NoRecordsToSave => HttpResponse::BadRequest().json(body),
            AttendanceError::NoSemesterAvailable
            | AttendanceError::SessionCreateFailed(_)
            | AttendanceError::RosterUnavailable(_)
            | AttendanceError::NotEnrolled => HttpResponse::UnprocessableEntity().json(body),
            AttendanceError::Storage(_) => HttpResponse::InternalServerError().json(body),
        }
    }
}

/// 点名类操作的课程归属校验：管理员放行，教师只能操作自己名下的课程
pub(crate) async fn check_course_access(
    storage: &Arc<dyn Storage>,
    course_id: i64,
    user: &User,
) -> Result<Course, AttendanceError> {
    let course = storage
        .get_course_by_id(course_id)
        .await
        .map_err(AttendanceError::Storage)?
        .ok_or(AttendanceError::CourseNotFound)?;

    match user.role {
        UserRole::Admin => Ok(course),
        UserRole::Faculty if course.faculty_id == Some(user.id) => Ok(course),
        _ => Err(AttendanceError::PolicyDenied {
            rule: "attendance requires course ownership",
            cause: format!(
                "user {} is not the owning faculty of course {}",
                user.id, course.id
            ),
        }),
    }
}

pub struct AttendanceService {
    storage: Option<Arc<dyn Storage>>,
}

impl AttendanceService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    // 定位或创建 (课程, 日期) 的课堂会话
    pub async fn resolve_session(
        &self,
        request: &HttpRequest,
        payload: ResolveSessionRequest,
    ) -> ActixResult<HttpResponse> {
        session::resolve_session_handler(self, request, payload).await
    }

    // 加载会话名册（选课学生 + 当前状态）
    pub async fn get_roster(
        &self,
        request: &HttpRequest,
        session_id: i64,
        course_id: i64,
    ) -> ActixResult<HttpResponse> {
        roster::get_roster(self, request, session_id, course_id).await
    }

    // 批量保存考勤
    pub async fn save_attendance(
        &self,
        request: &HttpRequest,
        session_id: i64,
        payload: SaveAttendanceRequest,
    ) -> ActixResult<HttpResponse> {
        save::save_attendance(self, request, session_id, payload).await
    }

    // 学生自助打卡
    pub async fn mark_self(
        &self,
        request: &HttpRequest,
        payload: SelfMarkRequest,
    ) -> ActixResult<HttpResponse> {
        self_mark::mark_self(self, request, payload).await
    }

    // 学生考勤历史
    pub async fn my_attendance(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        history::my_attendance(self, request).await
    }
}

#[cfg(test)]
pub(crate) mod test_support;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::attendance::test_support::{MockStorage, make_course, make_user};

    #[tokio::test]
    async fn admin_passes_course_access_check() {
        let mut mock = MockStorage::default();
        mock.courses = vec![make_course(1, Some(20))];
        let storage: Arc<dyn Storage> = Arc::new(mock);
        let admin = make_user(99, "Root", "root@x.edu", UserRole::Admin);

        assert!(check_course_access(&storage, 1, &admin).await.is_ok());
    }

    #[tokio::test]
    async fn owning_faculty_passes_other_faculty_denied() {
        let mut mock = MockStorage::default();
        mock.courses = vec![make_course(1, Some(20))];
        let storage: Arc<dyn Storage> = Arc::new(mock);

        let owner = make_user(20, "Owner", "owner@x.edu", UserRole::Faculty);
        assert!(check_course_access(&storage, 1, &owner).await.is_ok());

        let other = make_user(21, "Other", "other@x.edu", UserRole::Faculty);
        let denied = check_course_access(&storage, 1, &other).await;
        assert!(matches!(
            denied,
            Err(AttendanceError::PolicyDenied { .. })
        ));
    }

    #[tokio::test]
    async fn missing_course_is_reported_as_not_found() {
        let storage: Arc<dyn Storage> = Arc::new(MockStorage::default());
        let admin = make_user(99, "Root", "root@x.edu", UserRole::Admin);

        let result = check_course_access(&storage, 404, &admin).await;
        assert!(matches!(result, Err(AttendanceError::CourseNotFound)));
    }

    #[test]
    fn domain_errors_map_to_stable_codes() {
        assert_eq!(
            AttendanceError::NoSemesterAvailable.error_code(),
            ErrorCode::NoSemesterAvailable
        );
        assert_eq!(
            AttendanceError::AlreadyMarked.error_code(),
            ErrorCode::AlreadyMarked
        );
        assert_eq!(
            AttendanceError::InvalidDate.error_code(),
            ErrorCode::InvalidDate
        );
        assert_eq!(
            AttendanceError::NoRecordsToSave.error_code(),
            ErrorCode::NoRecordsToSave
        );
        assert_eq!(
            AttendanceError::NotEnrolled.error_code(),
            ErrorCode::NotEnrolled
        );
    }

    #[test]
    fn policy_denied_message_names_rule_and_cause() {
        let err = AttendanceError::PolicyDenied {
            rule: "attendance requires course ownership",
            cause: "user 7 is not the owning faculty of course 3".to_string(),
        };
        let msg = err.user_message();
        assert!(msg.contains("attendance requires course ownership"));
        assert!(msg.contains("user 7 is not the owning faculty of course 3"));
        assert!(msg.contains("administrator"));
    }
}
