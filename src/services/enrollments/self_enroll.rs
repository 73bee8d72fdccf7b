use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use crate::middlewares::RequireJWT;
use crate::models::enrollments::requests::SelfEnrollRequest;
use crate::models::{ApiResponse, ErrorCode};

use super::EnrollmentService;

/// 学生自助选课：只能为自己选，且学期必须处于激活状态
pub async fn self_enroll(
    service: &EnrollmentService,
    request: &HttpRequest,
    payload: SelfEnrollRequest,
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

    // 学期必须存在且处于激活状态
    match storage.get_semester_by_id(payload.semester_id).await {
        Ok(Some(semester)) if semester.is_active => {}
        Ok(Some(_)) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::BadRequest,
                "Self-enrollment is only allowed into an active semester",
            )));
        }
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::SemesterNotFound,
                "Semester not found",
            )));
        }
        Err(e) => {
            error!("Failed to fetch semester: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to enroll",
                )),
            );
        }
    }

    if let Ok(None) = storage.get_course_by_id(payload.course_id).await {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::CourseNotFound,
            "Course not found",
        )));
    }

    // 重复选课预检查；竞态下插入冲突同样按已选课处理
    match storage.get_enrollment(student.id, payload.course_id).await {
        Ok(Some(_)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::AlreadyEnrolled,
                "You are already enrolled in this course",
            )));
        }
        Ok(None) => {}
        Err(e) => {
            error!("Failed to check existing enrollment: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to enroll",
                )),
            );
        }
    }

    match storage
        .create_enrollment(student.id, payload.course_id, payload.semester_id)
        .await
    {
        Ok(created) => {
            info!(
                "Student {} self-enrolled in course {} for semester {}",
                student.id, created.course_id, created.semester_id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                created,
                "Successfully enrolled in course",
            )))
        }
        Err(e) if e.is_unique_violation() => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(
                ErrorCode::AlreadyEnrolled,
                "You are already enrolled in this course",
            ),
        )),
        Err(e) => {
            error!("Self-enrollment failed: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::DatabaseError,
                    format!("Failed to enroll: {e}"),
                )),
            )
        }
    }
}
