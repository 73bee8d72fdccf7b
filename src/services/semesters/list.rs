use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use crate::models::{ApiResponse, ErrorCode};

use super::SemesterService;

pub async fn list_semesters(
    service: &SemesterService,
    request: &HttpRequest,
    active_only: bool,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_semesters().await {
        Ok(mut semesters) => {
            if active_only {
                semesters.retain(|s| s.is_active);
            }
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                semesters,
                "Semesters retrieved successfully",
            )))
        }
        Err(e) => {
            error!("Failed to retrieve semesters: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to retrieve semesters",
                )),
            )
        }
    }
}
