use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::{GradeService, check_course_ownership};
use crate::models::grades::requests::CreateAssignmentRequest;
use crate::models::grades::responses::AssignmentListResponse;
use crate::models::{ApiResponse, ErrorCode};

pub async fn create_assignment(
    service: &GradeService,
    request: &HttpRequest,
    assignment: CreateAssignmentRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let course_id = assignment.course_id;

    if let Err(resp) = check_course_ownership(&storage, request, course_id).await {
        return Ok(resp);
    }

    if assignment.title.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Assignment title is required",
        )));
    }

    if assignment.max_marks <= 0.0 {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Maximum marks must be greater than 0",
        )));
    }

    let payload = CreateAssignmentRequest {
        course_id,
        title: assignment.title.trim().to_string(),
        due_date: assignment.due_date,
        max_marks: assignment.max_marks,
    };

    match storage.create_assignment(course_id, payload).await {
        Ok(created) => {
            info!("Assignment '{}' created for course {}", created.title, course_id);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                created,
                "Assignment created successfully",
            )))
        }
        Err(e) => {
            error!("Failed to create assignment: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::DatabaseError,
                    format!("Failed to create assignment: {e}"),
                )),
            )
        }
    }
}

pub async fn list_assignments(
    service: &GradeService,
    request: &HttpRequest,
    course_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if let Err(resp) = check_course_ownership(&storage, request, course_id).await {
        return Ok(resp);
    }

    match storage.list_assignments_for_course(course_id).await {
        Ok(items) => {
            let total = items.len() as i64;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                AssignmentListResponse { items, total },
                "Assignments retrieved successfully",
            )))
        }
        Err(e) => {
            error!("Failed to retrieve assignments: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to retrieve assignments",
                )),
            )
        }
    }
}
