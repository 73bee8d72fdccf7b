use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use crate::models::{ApiResponse, ErrorCode};

use super::DepartmentService;

pub async fn list_departments(
    service: &DepartmentService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_departments().await {
        Ok(departments) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            departments,
            "Departments retrieved successfully",
        ))),
        Err(e) => {
            error!("Failed to retrieve departments: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to retrieve departments",
                )),
            )
        }
    }
}
