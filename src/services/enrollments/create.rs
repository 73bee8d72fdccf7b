use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use crate::models::enrollments::requests::CreateEnrollmentRequest;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};

use super::EnrollmentService;

/// 管理员录入选课记录
pub async fn create_enrollment(
    service: &EnrollmentService,
    request: &HttpRequest,
    enrollment: CreateEnrollmentRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    // 引用完整性预检查，给出比外键报错更可读的提示
    match storage.get_user_by_id(enrollment.student_id).await {
        Ok(Some(user)) if user.role == UserRole::Student => {}
        Ok(Some(_)) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::BadRequest,
                "Enrollments can only reference student profiles",
            )));
        }
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::UserNotFound,
                "Student not found",
            )));
        }
        Err(e) => {
            error!("Failed to fetch student: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to create enrollment",
                )),
            );
        }
    }

    if let Ok(None) = storage.get_course_by_id(enrollment.course_id).await {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::CourseNotFound,
            "Course not found",
        )));
    }

    if let Ok(None) = storage.get_semester_by_id(enrollment.semester_id).await {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SemesterNotFound,
            "Semester not found",
        )));
    }

    match storage
        .create_enrollment(
            enrollment.student_id,
            enrollment.course_id,
            enrollment.semester_id,
        )
        .await
    {
        Ok(created) => {
            info!(
                "Enrollment created: student {} in course {} for semester {}",
                created.student_id, created.course_id, created.semester_id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                created,
                "Enrollment created successfully",
            )))
        }
        Err(e) if e.is_unique_violation() => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(
                ErrorCode::AlreadyEnrolled,
                "The student is already enrolled in this course for this semester",
            ),
        )),
        Err(e) => {
            error!("Failed to create enrollment: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::DatabaseError,
                    format!("Failed to enroll: {e}"),
                )),
            )
        }
    }
}
