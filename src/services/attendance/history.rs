//! 学生考勤历史

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::AttendanceService;
use crate::middlewares::RequireJWT;
use crate::models::attendance::responses::AttendanceHistoryResponse;
use crate::models::{ApiResponse, ErrorCode};

/// 历史记录条数上限
const HISTORY_LIMIT: u64 = 50;

pub(crate) async fn my_attendance(
    service: &AttendanceService,
    request: &HttpRequest,
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

    match storage
        .list_attendance_history_for_student(user.id, HISTORY_LIMIT)
        .await
    {
        Ok(items) => {
            let total = items.len() as i64;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                AttendanceHistoryResponse { items, total },
                "Attendance history retrieved successfully",
            )))
        }
        Err(e) => {
            error!("Failed to retrieve attendance history: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::DatabaseError,
                    format!("Failed to retrieve attendance history: {e}"),
                )),
            )
        }
    }
}
