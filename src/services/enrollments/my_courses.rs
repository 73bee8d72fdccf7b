use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use crate::middlewares::RequireJWT;
use crate::models::enrollments::responses::StudentCourseListResponse;
use crate::models::{ApiResponse, ErrorCode};

use super::EnrollmentService;

pub async fn my_courses(
    service: &EnrollmentService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let student = match RequireJWT::extract_user_claims(request) {
        Some(user) => user,
        None => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "Unauthorized: missing user identity",
            )));
        }
    };

    match storage.list_student_courses(student.id).await {
        Ok(items) => {
            let total = items.len() as i64;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                StudentCourseListResponse { items, total },
                "Enrolled courses retrieved successfully",
            )))
        }
        Err(e) => {
            error!("Failed to retrieve enrolled courses: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to retrieve enrolled courses",
                )),
            )
        }
    }
}
