//! 学生自助打卡
//!
//! 与教师点名共用"定位或创建会话"的思路，但学期直接取自学生本人的
//! 选课记录（选课校验在任何会话创建之前完成），且只允许当天打卡。

use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::NaiveDate;
use tracing::info;

use super::{AttendanceError, AttendanceService};
use crate::errors::CollegeSysError;
use crate::middlewares::RequireJWT;
use crate::models::attendance::entities::{AttendanceRecord, AttendanceStatus};
use crate::models::attendance::requests::SelfMarkRequest;
use crate::models::users::entities::{User, UserRole};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

/// 自助打卡核心流程。`today` 由调用方传入（服务器 UTC 当天）。
pub async fn mark_self_core(
    storage: &Arc<dyn Storage>,
    student: &User,
    course_id: i64,
    date: NaiveDate,
    status: AttendanceStatus,
    today: NaiveDate,
) -> Result<AttendanceRecord, AttendanceError> {
    // 1. 只允许当天
    if date != today {
        return Err(AttendanceError::InvalidDate);
    }

    // 2. 选课校验先于一切会话创建；选课记录同时提供学期引用
    let enrollment = storage
        .get_enrollment(student.id, course_id)
        .await
        .map_err(AttendanceError::Storage)?
        .ok_or(AttendanceError::NotEnrolled)?;

    // 3. 定位或创建当天的会话
    let session = match storage
        .find_session_by_course_and_date(course_id, today)
        .await
    {
        Ok(Some(session)) => session,
        Ok(None) => match storage
            .insert_class_session(course_id, today, enrollment.semester_id)
            .await
        {
            Ok(session) => session,
            Err(CollegeSysError::Authorization(cause)) => {
                return Err(AttendanceError::PolicyDenied {
                    rule: "students creating class sessions",
                    cause,
                });
            }
            Err(e) => return Err(AttendanceError::SessionCreateFailed(e)),
        },
        Err(e) => return Err(AttendanceError::Storage(e)),
    };

    // 4. 先查重，竞态下插入冲突同样按已打卡处理
    if storage
        .find_attendance(session.id, student.id)
        .await
        .map_err(AttendanceError::Storage)?
        .is_some()
    {
        return Err(AttendanceError::AlreadyMarked);
    }

    match storage
        .insert_attendance(session.id, student.id, status)
        .await
    {
        Ok(record) => {
            info!(
                session_id = session.id,
                student_id = student.id,
                status = %status,
                "学生自助打卡成功"
            );
            Ok(record)
        }
        Err(e) if e.is_unique_violation() => Err(AttendanceError::AlreadyMarked),
        Err(e) => Err(AttendanceError::Storage(e)),
    }
}

pub(crate) async fn mark_self(
    service: &AttendanceService,
    request: &HttpRequest,
    payload: SelfMarkRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let user = match RequireJWT::extract_user_claims(request) {
        Some(user) => user,
        None => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "Unauthorized: missing user identity",
            )));
        }
    };

    if user.role != UserRole::Student {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::PermissionDenied,
            "Only students can self-mark attendance",
        )));
    }

    let today = chrono::Utc::now().date_naive();
    match mark_self_core(
        &storage,
        &user,
        payload.course_id,
        payload.date,
        payload.status,
        today,
    )
    .await
    {
        Ok(record) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            record,
            "Attendance marked successfully",
        ))),
        Err(e) => Ok(e.to_response()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enrollments::entities::Enrollment;
    use crate::services::attendance::test_support::{MockStorage, make_user};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn enrollment(student_id: i64, course_id: i64, semester_id: i64) -> Enrollment {
        Enrollment {
            id: 1,
            student_id,
            course_id,
            semester_id,
            created_at: chrono::Utc::now(),
        }
    }

    fn student() -> User {
        make_user(10, "Marco", "marco@x.edu", UserRole::Student)
    }

    #[tokio::test]
    async fn rejects_non_current_date() {
        let mock = Arc::new(MockStorage::default());
        let storage: Arc<dyn Storage> = mock.clone();
        let today = date(2024, 9, 10);

        let result = mark_self_core(
            &storage,
            &student(),
            1,
            date(2024, 9, 9),
            AttendanceStatus::Present,
            today,
        )
        .await;

        assert!(matches!(result, Err(AttendanceError::InvalidDate)));
        assert_eq!(mock.session_count(), 0);
    }

    #[tokio::test]
    async fn fails_before_session_creation_when_not_enrolled() {
        let mock = Arc::new(MockStorage::default());
        let storage: Arc<dyn Storage> = mock.clone();
        let today = date(2024, 9, 10);

        let result = mark_self_core(
            &storage,
            &student(),
            1,
            today,
            AttendanceStatus::Present,
            today,
        )
        .await;

        assert!(matches!(result, Err(AttendanceError::NotEnrolled)));
        // 选课校验失败时不得创建任何会话
        assert_eq!(mock.session_count(), 0);
    }

    #[tokio::test]
    async fn creates_session_with_enrollment_semester_and_marks() {
        let mut inner = MockStorage::default();
        inner.enrollments = vec![enrollment(10, 1, 55)];
        let mock = Arc::new(inner);
        let storage: Arc<dyn Storage> = mock.clone();
        let today = date(2024, 9, 10);

        let record = mark_self_core(
            &storage,
            &student(),
            1,
            today,
            AttendanceStatus::Late,
            today,
        )
        .await
        .unwrap();

        assert_eq!(record.status, AttendanceStatus::Late);
        let sessions = mock.sessions.lock().unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].semester_id, 55);
    }

    #[tokio::test]
    async fn precheck_reports_already_marked() {
        let mut inner = MockStorage::default();
        inner.enrollments = vec![enrollment(10, 1, 55)];
        let mock = Arc::new(inner);
        let storage: Arc<dyn Storage> = mock.clone();
        let today = date(2024, 9, 10);

        mark_self_core(
            &storage,
            &student(),
            1,
            today,
            AttendanceStatus::Present,
            today,
        )
        .await
        .unwrap();

        let second = mark_self_core(
            &storage,
            &student(),
            1,
            today,
            AttendanceStatus::Present,
            today,
        )
        .await;
        assert!(matches!(second, Err(AttendanceError::AlreadyMarked)));
    }

    #[tokio::test]
    async fn insert_race_unique_violation_reports_already_marked() {
        let mut inner = MockStorage::default();
        inner.enrollments = vec![enrollment(10, 1, 55)];
        // 预检查通过后插入时撞唯一索引（并发竞态）
        inner.fail_insert_attendance = Some(crate::errors::CollegeSysError::unique_violation(
            "attendance.session_id, attendance.student_id",
        ));
        let mock = Arc::new(inner);
        let storage: Arc<dyn Storage> = mock.clone();
        let today = date(2024, 9, 10);

        let result = mark_self_core(
            &storage,
            &student(),
            1,
            today,
            AttendanceStatus::Present,
            today,
        )
        .await;
        assert!(matches!(result, Err(AttendanceError::AlreadyMarked)));
    }
}
