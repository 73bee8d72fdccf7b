//! 课堂会话解析
//!
//! 将 (课程, 日期) 确定性地解析为一个课堂会话：存在即返回，不存在则
//! 推导学期后创建。没有跨查询的事务可用，(course_id, session_date)
//! 唯一索引兜底并发竞争；插入失败不自动重试，下一次解析会找到已存在
//! 的行。

use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::NaiveDate;
use tracing::{info, warn};

use super::{AttendanceError, AttendanceService, check_course_access};
use crate::errors::CollegeSysError;
use crate::middlewares::RequireJWT;
use crate::models::attendance::entities::ClassSession;
use crate::models::attendance::requests::ResolveSessionRequest;
use crate::models::attendance::responses::SessionResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

/// 学期推导策略，按 `SEMESTER_STRATEGIES` 中的顺序依次尝试，首个命中即停止
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemesterStrategy {
    /// 取该课程任意一条选课记录的学期引用（当前使用方式下每门课的
    /// 选课学期一致，取第一行即可）
    EnrollmentSemester,
    /// 回退：任取一个处于激活状态的学期
    ActiveSemester,
}

pub const SEMESTER_STRATEGIES: &[SemesterStrategy] = &[
    SemesterStrategy::EnrollmentSemester,
    SemesterStrategy::ActiveSemester,
];

/// 执行单个学期推导策略
///
/// 查询失败按未命中处理，让推导链退化到下一个策略；
/// 授权策略拒绝是例外，必须原样向上传播。
async fn try_semester_strategy(
    storage: &Arc<dyn Storage>,
    strategy: SemesterStrategy,
    course_id: i64,
) -> Result<Option<i64>, AttendanceError> {
    let result = match strategy {
        SemesterStrategy::EnrollmentSemester => storage.find_enrollment_semester(course_id).await,
        SemesterStrategy::ActiveSemester => storage
            .find_active_semester()
            .await
            .map(|semester| semester.map(|s| s.id)),
    };

    match result {
        Ok(found) => Ok(found),
        Err(CollegeSysError::Authorization(cause)) => Err(AttendanceError::PolicyDenied {
            rule: "semester lookup",
            cause,
        }),
        Err(e) => {
            warn!(
                course_id,
                strategy = ?strategy,
                error = %e,
                "学期推导策略查询失败，按未命中处理"
            );
            Ok(None)
        }
    }
}

/// 为新会话推导学期引用，推导链耗尽返回 NoSemesterAvailable
pub async fn resolve_semester(
    storage: &Arc<dyn Storage>,
    course_id: i64,
) -> Result<i64, AttendanceError> {
    for strategy in SEMESTER_STRATEGIES {
        if let Some(semester_id) = try_semester_strategy(storage, *strategy, course_id).await? {
            return Ok(semester_id);
        }
    }
    Err(AttendanceError::NoSemesterAvailable)
}

/// 将 (课程, 日期) 解析为唯一的课堂会话，不存在则创建
pub async fn resolve_session(
    storage: &Arc<dyn Storage>,
    course_id: i64,
    session_date: NaiveDate,
) -> Result<ClassSession, AttendanceError> {
    // 1. 查已有会话。零行是预期结果；查询失败按未命中处理继续走创建，
    //    授权拒绝除外。
    match storage
        .find_session_by_course_and_date(course_id, session_date)
        .await
    {
        Ok(Some(session)) => return Ok(session),
        Ok(None) => {}
        Err(CollegeSysError::Authorization(cause)) => {
            return Err(AttendanceError::PolicyDenied {
                rule: "class session lookup",
                cause,
            });
        }
        Err(e) => {
            warn!(course_id, %session_date, error = %e, "会话查询失败，按未命中处理");
        }
    }

    // 2. 推导学期
    let semester_id = resolve_semester(storage, course_id).await?;

    // 3. 创建会话。任何插入失败（含唯一索引冲突）原样上报，不重试。
    let session = storage
        .insert_class_session(course_id, session_date, semester_id)
        .await
        .map_err(AttendanceError::SessionCreateFailed)?;

    info!(
        session_id = session.id,
        course_id, %session_date, semester_id, "课堂会话已创建"
    );
    Ok(session)
}

pub(crate) async fn resolve_session_handler(
    service: &AttendanceService,
    request: &HttpRequest,
    payload: ResolveSessionRequest,
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

    if let Err(e) = check_course_access(&storage, payload.course_id, &user).await {
        return Ok(e.to_response());
    }

    match resolve_session(&storage, payload.course_id, payload.session_date).await {
        Ok(session) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            SessionResponse {
                session_id: session.id,
                course_id: session.course_id,
                session_date: session.session_date,
                semester_id: session.semester_id,
            },
            "Class session resolved successfully",
        ))),
        Err(e) => Ok(e.to_response()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::attendance::test_support::{MockStorage, make_semester};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn as_storage(mock: MockStorage) -> Arc<dyn Storage> {
        Arc::new(mock)
    }

    #[tokio::test]
    async fn resolve_returns_existing_session() {
        let mock = MockStorage::default();
        let storage = as_storage(mock);
        let first = resolve_session(&storage, 7, date(2024, 9, 10)).await;
        // 第一次调用没有学期来源，应失败且不建会话
        assert!(matches!(first, Err(AttendanceError::NoSemesterAvailable)));

        let mut mock = MockStorage::default();
        mock.enrollment_semesters.insert(7, 42);
        let storage = as_storage(mock);

        let created = resolve_session(&storage, 7, date(2024, 9, 10)).await.unwrap();
        let resolved = resolve_session(&storage, 7, date(2024, 9, 10)).await.unwrap();
        // 幂等：第二次解析返回同一个会话
        assert_eq!(created.id, resolved.id);
        assert_eq!(resolved.semester_id, 42);
    }

    #[tokio::test]
    async fn new_session_takes_enrollment_semester() {
        let mut mock = MockStorage::default();
        mock.enrollment_semesters.insert(1, 10);
        mock.active_semester = Some(make_semester(99, "Spring 2025", true));
        let storage = as_storage(mock);

        let session = resolve_session(&storage, 1, date(2024, 9, 10)).await.unwrap();
        // 选课学期优先于激活学期
        assert_eq!(session.semester_id, 10);
    }

    #[tokio::test]
    async fn falls_back_to_active_semester_without_enrollments() {
        let mut mock = MockStorage::default();
        mock.active_semester = Some(make_semester(5, "Fall 2024", true));
        let storage = as_storage(mock);

        let session = resolve_session(&storage, 1, date(2024, 9, 10)).await.unwrap();
        assert_eq!(session.semester_id, 5);
    }

    #[tokio::test]
    async fn fails_without_any_semester_source() {
        let storage = as_storage(MockStorage::default());
        let result = resolve_session(&storage, 1, date(2024, 9, 10)).await;
        assert!(matches!(result, Err(AttendanceError::NoSemesterAvailable)));
    }

    #[tokio::test]
    async fn no_session_row_created_when_semester_resolution_fails() {
        let mock = Arc::new(MockStorage::default());
        let storage: Arc<dyn Storage> = mock.clone();
        let result = resolve_session(&storage, 1, date(2024, 9, 10)).await;
        assert!(result.is_err());
        assert_eq!(mock.session_count(), 0);
    }

    #[tokio::test]
    async fn enrollment_lookup_failure_degrades_to_active_semester() {
        let mut mock = MockStorage::default();
        mock.fail_enrollment_semester =
            Some(crate::errors::CollegeSysError::database_operation("boom"));
        mock.active_semester = Some(make_semester(8, "Fall 2024", true));
        let storage = as_storage(mock);

        let session = resolve_session(&storage, 1, date(2024, 9, 10)).await.unwrap();
        assert_eq!(session.semester_id, 8);
    }

    #[tokio::test]
    async fn authorization_failure_propagates_distinctly() {
        let mut mock = MockStorage::default();
        mock.fail_enrollment_semester =
            Some(crate::errors::CollegeSysError::authorization("row policy"));
        mock.active_semester = Some(make_semester(8, "Fall 2024", true));
        let storage = as_storage(mock);

        let result = resolve_session(&storage, 1, date(2024, 9, 10)).await;
        // 授权拒绝不允许退化到下一个策略
        assert!(matches!(
            result,
            Err(AttendanceError::PolicyDenied { .. })
        ));
    }

    #[tokio::test]
    async fn session_lookup_failure_degrades_to_creation() {
        let mut mock = MockStorage::default();
        mock.fail_find_session =
            Some(crate::errors::CollegeSysError::database_operation("timeout"));
        mock.enrollment_semesters.insert(1, 12);
        let storage = as_storage(mock);

        // 查询失败按未命中处理，走创建路径
        let session = resolve_session(&storage, 1, date(2024, 9, 10)).await.unwrap();
        assert_eq!(session.semester_id, 12);
    }

    #[tokio::test]
    async fn session_lookup_authorization_failure_propagates() {
        let mut mock = MockStorage::default();
        mock.fail_find_session =
            Some(crate::errors::CollegeSysError::authorization("row policy"));
        mock.enrollment_semesters.insert(1, 12);
        let storage = as_storage(mock);

        let result = resolve_session(&storage, 1, date(2024, 9, 10)).await;
        assert!(matches!(
            result,
            Err(AttendanceError::PolicyDenied { .. })
        ));
    }

    #[tokio::test]
    async fn insert_failure_surfaces_as_session_create_failed() {
        let mut mock = MockStorage::default();
        mock.enrollment_semesters.insert(1, 3);
        mock.fail_insert_session = Some(crate::errors::CollegeSysError::unique_violation(
            "class_sessions.course_id, class_sessions.session_date",
        ));
        let storage = as_storage(mock);

        let result = resolve_session(&storage, 1, date(2024, 9, 10)).await;
        assert!(matches!(
            result,
            Err(AttendanceError::SessionCreateFailed(_))
        ));
    }

    #[tokio::test]
    async fn strategy_order_is_enrollment_first() {
        assert_eq!(
            SEMESTER_STRATEGIES,
            &[
                SemesterStrategy::EnrollmentSemester,
                SemesterStrategy::ActiveSemester
            ]
        );
    }
}
