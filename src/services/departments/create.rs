use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use crate::models::departments::requests::CreateDepartmentRequest;
use crate::models::{ApiResponse, ErrorCode};

use super::DepartmentService;

pub async fn create_department(
    service: &DepartmentService,
    request: &HttpRequest,
    department: CreateDepartmentRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if department.code.trim().is_empty() || department.name.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Department code and name are required",
        )));
    }

    match storage.create_department(department).await {
        Ok(created) => {
            info!("Department {} created", created.code);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                created,
                "Department created successfully",
            )))
        }
        Err(e) => {
            let msg = format!("Failed to create department: {e}");
            error!("{}", msg);
            if e.is_unique_violation() {
                Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                    ErrorCode::Conflict,
                    "Department code already exists",
                )))
            } else {
                Ok(HttpResponse::InternalServerError()
                    .json(ApiResponse::error_empty(ErrorCode::DatabaseError, msg)))
            }
        }
    }
}
