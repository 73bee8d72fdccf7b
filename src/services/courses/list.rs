use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use crate::middlewares::RequireJWT;
use crate::models::courses::requests::{CourseListQuery, CourseQueryParams};
use crate::models::courses::responses::CourseListResponse;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};

use super::CourseService;

pub async fn list_courses(
    service: &CourseService,
    request: &HttpRequest,
    query: CourseQueryParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    // mine=true 时限定教师自己的课程；管理员的 mine 视为无操作
    let faculty_id = if query.mine {
        match (
            RequireJWT::extract_user_role(request),
            RequireJWT::extract_user_id(request),
        ) {
            (Some(UserRole::Faculty), Some(uid)) => Some(uid),
            _ => None,
        }
    } else {
        None
    };

    let list_query = CourseListQuery {
        faculty_id,
        search: query.search,
    };

    match storage.list_courses(list_query).await {
        Ok(courses) => {
            let total = courses.len() as i64;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                CourseListResponse {
                    items: courses,
                    total,
                },
                "Courses retrieved successfully",
            )))
        }
        Err(e) => {
            error!("Failed to retrieve courses: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to retrieve courses",
                )),
            )
        }
    }
}
