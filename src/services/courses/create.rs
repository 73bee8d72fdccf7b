use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::CourseService;
use crate::middlewares::RequireJWT;
use crate::models::courses::requests::CreateCourseRequest;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};

pub async fn create_course(
    service: &CourseService,
    request: &HttpRequest,
    mut course_data: CreateCourseRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let role = RequireJWT::extract_user_role(request);

    let uid = match RequireJWT::extract_user_id(request) {
        Some(id) => id,
        None => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "Unauthorized: missing user id",
            )));
        }
    };

    // 权限校验与归属解析
    match role {
        Some(UserRole::Admin) => {
            // 管理员可指定任意教师，也可留空等待指派
            if let Some(faculty_id) = course_data.faculty_id {
                match storage.get_user_by_id(faculty_id).await {
                    Ok(Some(user)) if user.role == UserRole::Faculty => {}
                    Ok(Some(_)) => {
                        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                            ErrorCode::BadRequest,
                            "Assigned owner must have the faculty role",
                        )));
                    }
                    Ok(None) => {
                        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                            ErrorCode::UserNotFound,
                            "Assigned faculty does not exist",
                        )));
                    }
                    Err(e) => {
                        error!("Failed to get user by id: {}", e);
                        return Ok(HttpResponse::InternalServerError().json(
                            ApiResponse::error_empty(
                                ErrorCode::InternalServerError,
                                "Internal server error while fetching user",
                            ),
                        ));
                    }
                }
            }
        }
        Some(UserRole::Faculty) => {
            // 教师只能把自己设为课程负责人
            match course_data.faculty_id {
                Some(id) if id != uid => {
                    return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                        ErrorCode::PermissionDenied,
                        "You do not have permission to create a course for another faculty member",
                    )));
                }
                _ => course_data.faculty_id = Some(uid),
            }
        }
        _ => {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::PermissionDenied,
                "You do not have permission to create a course",
            )));
        }
    }

    // 院系必须存在
    match storage.get_department_by_id(course_data.department_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::DepartmentNotFound,
                "Department does not exist. Create one in the departments page first.",
            )));
        }
        Err(e) => {
            error!("Failed to get department: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Internal server error while fetching department",
                )),
            );
        }
    }

    // 创建课程
    match storage.create_course(course_data).await {
        Ok(course) => {
            info!("Course {} created successfully by {}", course.code, uid);
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(course, "Course created successfully")))
        }
        Err(e) => Ok(handle_course_create_error(&e.to_string())),
    }
}

/// 错误响应辅助函数
fn handle_course_create_error(e: &str) -> HttpResponse {
    let msg = format!("Course creation failed: {e}");
    error!("{}", msg);
    if msg.contains("UNIQUE constraint failed") || msg.contains("duplicate key") {
        HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::Conflict,
            "Course code already exists",
        ))
    } else if msg.contains("FOREIGN KEY constraint failed") {
        HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Referenced department or faculty does not exist",
        ))
    } else {
        HttpResponse::InternalServerError()
            .json(ApiResponse::error_empty(ErrorCode::DatabaseError, msg))
    }
}
