use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use crate::models::enrollments::responses::EnrollmentListResponse;
use crate::models::{ApiResponse, ErrorCode};

use super::EnrollmentService;

pub async fn list_enrollments(
    service: &EnrollmentService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_enrollments_with_details().await {
        Ok(items) => {
            let total = items.len() as i64;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                EnrollmentListResponse { items, total },
                "Enrollments retrieved successfully",
            )))
        }
        Err(e) => {
            error!("Failed to retrieve enrollments: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to retrieve enrollments",
                )),
            )
        }
    }
}
