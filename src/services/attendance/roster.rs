//! 名册对账
//!
//! 把课程的选课名单与会话已有的考勤记录合并成完整的逐学生状态视图：
//! 按学生去重、缺记录的学生默认缺勤、按姓名不区分大小写排序。
//! 联表缺失的学生姓名通过一次批量档案查询回填。

use std::collections::HashMap;
use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, warn};

use super::{AttendanceError, AttendanceService, check_course_access};
use crate::middlewares::RequireJWT;
use crate::models::attendance::entities::AttendanceStatus;
use crate::models::attendance::responses::{RosterEntry, RosterResponse};
use crate::models::enrollments::entities::CourseRosterRow;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

/// 档案联表未命中时的占位姓名，回填后仍缺失则保留
const PLACEHOLDER_NAME: &str = "Unknown Student";

/// 合并选课名单与已有状态记录（纯函数，便于单测）
///
/// - 按学生 ID 去重，保留首次出现的行
/// - 映射中没有记录的学生默认 absent
/// - 按显示名（姓名，退而求其次邮箱）不区分大小写排序
pub fn merge_roster(
    rows: Vec<CourseRosterRow>,
    existing: &HashMap<i64, AttendanceStatus>,
) -> Vec<RosterEntry> {
    let mut seen: HashMap<i64, ()> = HashMap::new();
    let mut entries: Vec<RosterEntry> = Vec::with_capacity(rows.len());

    for row in rows {
        if seen.insert(row.student_id, ()).is_some() {
            continue;
        }

        let full_name = match row.full_name {
            Some(name) if !name.trim().is_empty() => name,
            _ => PLACEHOLDER_NAME.to_string(),
        };

        entries.push(RosterEntry {
            student_id: row.student_id,
            full_name,
            email: row.email.unwrap_or_default(),
            status: existing
                .get(&row.student_id)
                .copied()
                .unwrap_or(AttendanceStatus::Absent),
        });
    }

    entries.sort_by(|a, b| {
        let key_a = display_key(a);
        let key_b = display_key(b);
        key_a.cmp(&key_b)
    });

    entries
}

fn display_key(entry: &RosterEntry) -> String {
    let name = if entry.full_name == PLACEHOLDER_NAME && !entry.email.is_empty() {
        &entry.email
    } else {
        &entry.full_name
    };
    name.to_lowercase()
}

/// 回填联表缺失的学生姓名：一次批量查询，限定学生角色
async fn backfill_missing_names(storage: &Arc<dyn Storage>, rows: &mut [CourseRosterRow]) {
    let missing_ids: Vec<i64> = rows
        .iter()
        .filter(|r| r.full_name.as_deref().is_none_or(|n| n.trim().is_empty()))
        .map(|r| r.student_id)
        .collect();

    if missing_ids.is_empty() {
        return;
    }

    match storage.list_students_by_ids(&missing_ids).await {
        Ok(profiles) => {
            let by_id: HashMap<i64, _> = profiles.into_iter().map(|p| (p.id, p)).collect();
            for row in rows.iter_mut() {
                if row.full_name.as_deref().is_none_or(|n| n.trim().is_empty())
                    && let Some(profile) = by_id.get(&row.student_id)
                {
                    row.full_name = Some(profile.full_name.clone());
                    if row.email.as_deref().is_none_or(str::is_empty) {
                        row.email = Some(profile.email.clone());
                    }
                }
            }
        }
        Err(e) => {
            // 回填失败不阻塞名册，缺名的学生带占位名返回
            warn!(error = %e, "学生档案批量回填失败");
        }
    }
}

/// 加载会话的完整名册视图
pub async fn load_roster(
    storage: &Arc<dyn Storage>,
    session_id: i64,
    course_id: i64,
) -> Result<Vec<RosterEntry>, AttendanceError> {
    // 1. 选课名单；失败即 RosterUnavailable，调用方不得提供点名入口
    let mut rows = storage
        .list_course_roster(course_id)
        .await
        .map_err(AttendanceError::RosterUnavailable)?;

    // 2. 姓名回填
    backfill_missing_names(storage, &mut rows).await;

    // 3. 已有考勤记录；查询失败时记录日志并按全员无记录处理
    let existing: HashMap<i64, AttendanceStatus> =
        match storage.list_attendance_for_session(session_id).await {
            Ok(records) => records.into_iter().collect(),
            Err(e) => {
                error!(session_id, error = %e, "考勤记录加载失败，按无记录处理");
                HashMap::new()
            }
        };

    Ok(merge_roster(rows, &existing))
}

pub(crate) async fn get_roster(
    service: &AttendanceService,
    request: &HttpRequest,
    session_id: i64,
    course_id: i64,
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

    if let Err(e) = check_course_access(&storage, course_id, &user).await {
        return Ok(e.to_response());
    }

    match load_roster(&storage, session_id, course_id).await {
        Ok(entries) => {
            let total = entries.len() as i64;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                RosterResponse {
                    session_id,
                    entries,
                    total,
                },
                "Roster loaded successfully",
            )))
        }
        Err(e) => Ok(e.to_response()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::attendance::test_support::{MockStorage, make_user};
    use crate::models::users::entities::UserRole;

    fn row(student_id: i64, name: Option<&str>, email: Option<&str>) -> CourseRosterRow {
        CourseRosterRow {
            student_id,
            full_name: name.map(str::to_string),
            email: email.map(str::to_string),
        }
    }

    #[test]
    fn merge_defaults_missing_students_to_absent() {
        let rows = vec![
            row(1, Some("Alice"), Some("alice@x.edu")),
            row(2, Some("Bob"), Some("bob@x.edu")),
        ];
        let mut existing = HashMap::new();
        existing.insert(1, AttendanceStatus::Present);

        let entries = merge_roster(rows, &existing);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].full_name, "Alice");
        assert_eq!(entries[0].status, AttendanceStatus::Present);
        assert_eq!(entries[1].status, AttendanceStatus::Absent);
    }

    #[test]
    fn merge_deduplicates_by_student_id() {
        // 同一学生跨学期多条选课记录，名册上只出现一次
        let rows = vec![
            row(1, Some("Alice"), None),
            row(1, Some("Alice"), None),
            row(2, Some("Bob"), None),
        ];
        let entries = merge_roster(rows, &HashMap::new());
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn merge_sorts_case_insensitively() {
        let rows = vec![
            row(1, Some("charlie"), None),
            row(2, Some("Alice"), None),
            row(3, Some("Bob"), None),
        ];
        let entries = merge_roster(rows, &HashMap::new());
        let names: Vec<&str> = entries.iter().map(|e| e.full_name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Bob", "charlie"]);
    }

    #[test]
    fn merge_uses_placeholder_for_missing_profiles() {
        let rows = vec![row(9, None, None)];
        let entries = merge_roster(rows, &HashMap::new());
        assert_eq!(entries[0].full_name, "Unknown Student");
        assert_eq!(entries[0].status, AttendanceStatus::Absent);
    }

    #[tokio::test]
    async fn roster_backfills_names_from_profiles() {
        let mut mock = MockStorage::default();
        mock.roster = vec![row(1, None, None), row(2, Some("Bob"), Some("bob@x.edu"))];
        mock.students = vec![make_user(1, "Alice", "alice@x.edu", UserRole::Student)];
        let storage: Arc<dyn Storage> = Arc::new(mock);

        let entries = load_roster(&storage, 100, 1).await.unwrap();
        assert_eq!(entries[0].full_name, "Alice");
        assert_eq!(entries[0].email, "alice@x.edu");
    }

    #[tokio::test]
    async fn roster_backfill_ignores_non_student_profiles() {
        let mut mock = MockStorage::default();
        mock.roster = vec![row(1, None, None)];
        // 角色不是学生的档案不参与回填
        mock.students = vec![make_user(1, "Eve", "eve@x.edu", UserRole::Faculty)];
        let storage: Arc<dyn Storage> = Arc::new(mock);

        let entries = load_roster(&storage, 100, 1).await.unwrap();
        assert_eq!(entries[0].full_name, "Unknown Student");
    }

    #[tokio::test]
    async fn roster_unavailable_when_enrollment_fetch_fails() {
        let mut mock = MockStorage::default();
        mock.fail_roster = Some(crate::errors::CollegeSysError::database_operation("down"));
        let storage: Arc<dyn Storage> = Arc::new(mock);

        let result = load_roster(&storage, 100, 1).await;
        assert!(matches!(result, Err(AttendanceError::RosterUnavailable(_))));
    }

    #[tokio::test]
    async fn roster_survives_attendance_fetch_failure() {
        let mut mock = MockStorage::default();
        mock.roster = vec![row(1, Some("Alice"), None)];
        mock.fail_attendance_list =
            Some(crate::errors::CollegeSysError::database_operation("down"));
        let storage: Arc<dyn Storage> = Arc::new(mock);

        let entries = load_roster(&storage, 100, 1).await.unwrap();
        assert_eq!(entries[0].status, AttendanceStatus::Absent);
    }

    #[tokio::test]
    async fn scenario_two_enrolled_students_default_absent_sorted() {
        use crate::services::attendance::session::resolve_session;

        let mut mock = MockStorage::default();
        mock.enrollment_semesters.insert(1, 77);
        mock.roster = vec![
            row(2, Some("Sofia"), Some("s2@x.edu")),
            row(1, Some("Marco"), Some("s1@x.edu")),
        ];
        let storage: Arc<dyn Storage> = Arc::new(mock);

        let session = resolve_session(
            &storage,
            1,
            chrono::NaiveDate::from_ymd_opt(2024, 9, 10).unwrap(),
        )
        .await
        .unwrap();
        assert_eq!(session.semester_id, 77);

        let entries = load_roster(&storage, session.id, 1).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].full_name, "Marco");
        assert_eq!(entries[1].full_name, "Sofia");
        assert!(entries.iter().all(|e| e.status == AttendanceStatus::Absent));
    }
}
