use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use crate::models::semesters::requests::CreateSemesterRequest;
use crate::models::{ApiResponse, ErrorCode};

use super::SemesterService;

pub async fn create_semester(
    service: &SemesterService,
    request: &HttpRequest,
    semester: CreateSemesterRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if semester.name.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Semester name is required",
        )));
    }

    if semester.end_date < semester.start_date {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Semester end date must not precede its start date",
        )));
    }

    match storage.create_semester(semester).await {
        Ok(created) => {
            info!("Semester {} created (active: {})", created.name, created.is_active);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                created,
                "Semester created successfully",
            )))
        }
        Err(e) => {
            error!("Failed to create semester: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::DatabaseError,
                    format!("Failed to create semester: {e}"),
                )),
            )
        }
    }
}
