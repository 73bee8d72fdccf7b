//! 批量保存考勤

use std::collections::HashMap;
use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{AttendanceError, AttendanceService, check_course_access};
use crate::middlewares::RequireJWT;
use crate::models::attendance::entities::AttendanceStatus;
use crate::models::attendance::requests::SaveAttendanceRequest;
use crate::models::attendance::responses::SaveAttendanceResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

/// 过滤空白状态并解析剩余条目（纯函数，便于单测）
///
/// 空字符串表示该学生本次未编辑，直接丢弃；非空但不可解析的值是
/// 调用方错误，整个请求失败。
pub fn collect_valid_records(
    edits: &HashMap<i64, String>,
) -> Result<Vec<(i64, AttendanceStatus)>, AttendanceError> {
    let mut records = Vec::with_capacity(edits.len());

    for (student_id, raw) in edits {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }
        let status = trimmed
            .parse::<AttendanceStatus>()
            .map_err(|_| AttendanceError::InvalidStatus(raw.clone()))?;
        records.push((*student_id, status));
    }

    if records.is_empty() {
        return Err(AttendanceError::NoRecordsToSave);
    }

    // 稳定的提交顺序，便于日志与测试对账
    records.sort_by_key(|(student_id, _)| *student_id);
    Ok(records)
}

/// 保存会话的考勤编辑：一次批量 upsert，冲突目标 (session_id, student_id)
pub async fn persist_attendance(
    storage: &Arc<dyn Storage>,
    session_id: i64,
    edits: &HashMap<i64, String>,
) -> Result<u64, AttendanceError> {
    let records = collect_valid_records(edits)?;

    let saved = storage
        .upsert_attendance(session_id, &records)
        .await
        .map_err(AttendanceError::Storage)?;

    info!(session_id, saved, "考勤批量保存完成");
    Ok(saved)
}

pub(crate) async fn save_attendance(
    service: &AttendanceService,
    request: &HttpRequest,
    session_id: i64,
    payload: SaveAttendanceRequest,
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

    // 会话必须存在，保存前顺带拿到课程做归属校验
    let session = match storage.get_session_by_id(session_id).await {
        Ok(Some(session)) => session,
        Ok(None) => return Ok(AttendanceError::SessionNotFound.to_response()),
        Err(e) => return Ok(AttendanceError::Storage(e).to_response()),
    };

    if let Err(e) = check_course_access(&storage, session.course_id, &user).await {
        return Ok(e.to_response());
    }

    match persist_attendance(&storage, session_id, &payload.records).await {
        Ok(saved) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            SaveAttendanceResponse {
                saved: saved as i64,
            },
            "Attendance saved successfully",
        ))),
        Err(e) => Ok(e.to_response()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::attendance::test_support::MockStorage;

    fn edits(pairs: &[(i64, &str)]) -> HashMap<i64, String> {
        pairs
            .iter()
            .map(|(id, status)| (*id, status.to_string()))
            .collect()
    }

    #[test]
    fn collect_filters_empty_statuses() {
        let records =
            collect_valid_records(&edits(&[(1, "present"), (2, ""), (3, "late")])).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(
            records,
            vec![
                (1, AttendanceStatus::Present),
                (3, AttendanceStatus::Late)
            ]
        );
    }

    #[test]
    fn collect_rejects_all_empty_edits() {
        let result = collect_valid_records(&edits(&[(1, ""), (2, "  ")]));
        assert!(matches!(result, Err(AttendanceError::NoRecordsToSave)));
    }

    #[test]
    fn collect_rejects_unknown_status() {
        let result = collect_valid_records(&edits(&[(1, "excused")]));
        assert!(matches!(result, Err(AttendanceError::InvalidStatus(_))));
    }

    #[tokio::test]
    async fn all_empty_edits_perform_no_upsert() {
        let mock = Arc::new(MockStorage::default());
        let storage: Arc<dyn Storage> = mock.clone();

        let result = persist_attendance(&storage, 5, &edits(&[(1, ""), (2, "")])).await;
        assert!(matches!(result, Err(AttendanceError::NoRecordsToSave)));
        assert_eq!(mock.upsert_count(), 0);
    }

    #[tokio::test]
    async fn save_upserts_only_non_empty_records() {
        let mock = Arc::new(MockStorage::default());
        let storage: Arc<dyn Storage> = mock.clone();

        let saved = persist_attendance(
            &storage,
            5,
            &edits(&[(1, "present"), (2, ""), (3, "absent")]),
        )
        .await
        .unwrap();

        assert_eq!(saved, 2);
        let upserts = mock.upserts.lock().unwrap();
        assert_eq!(upserts.len(), 1);
        let (session_id, records) = &upserts[0];
        assert_eq!(*session_id, 5);
        assert_eq!(
            records,
            &vec![
                (1, AttendanceStatus::Present),
                (3, AttendanceStatus::Absent)
            ]
        );
    }
}
