pub mod assignments;
pub mod my_grades;
pub mod sheet;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::middlewares::RequireJWT;
use crate::models::courses::entities::Course;
use crate::models::grades::requests::{CreateAssignmentRequest, SaveGradesRequest};
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub struct GradeService {
    storage: Option<Arc<dyn Storage>>,
}

/// 成绩类操作的课程归属校验：管理员放行，教师只能操作自己名下的课程。
/// 返回 Err 时直接携带应答。
pub(crate) async fn check_course_ownership(
    storage: &Arc<dyn Storage>,
    request: &HttpRequest,
    course_id: i64,
) -> Result<Course, HttpResponse> {
    let user = match RequireJWT::extract_user_claims(request) {
        Some(user) => user,
        None => {
            return Err(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "Unauthorized: missing user identity",
            )));
        }
    };

    let course = match storage.get_course_by_id(course_id).await {
        Ok(Some(course)) => course,
        Ok(None) => {
            return Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::CourseNotFound,
                "Course not found",
            )));
        }
        Err(e) => {
            tracing::error!("Failed to fetch course: {}", e);
            return Err(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to fetch course",
                )),
            );
        }
    };

    match user.role {
        UserRole::Admin => Ok(course),
        UserRole::Faculty if course.faculty_id == Some(user.id) => Ok(course),
        _ => Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::PermissionDenied,
            "You can only manage grades for your own courses. Please contact your administrator \
             if you believe you should have access.",
        ))),
    }
}

impl GradeService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    // 创建作业（教师/管理员）
    pub async fn create_assignment(
        &self,
        request: &HttpRequest,
        assignment: CreateAssignmentRequest,
    ) -> ActixResult<HttpResponse> {
        assignments::create_assignment(self, request, assignment).await
    }

    // 课程作业列表
    pub async fn list_assignments(
        &self,
        request: &HttpRequest,
        course_id: i64,
    ) -> ActixResult<HttpResponse> {
        assignments::list_assignments(self, request, course_id).await
    }

    // 成绩录入表：选课学生与已有成绩的合并视图
    pub async fn grade_sheet(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        sheet::grade_sheet(self, request, assignment_id).await
    }

    // 批量保存成绩
    pub async fn save_grades(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        payload: SaveGradesRequest,
    ) -> ActixResult<HttpResponse> {
        sheet::save_grades(self, request, assignment_id, payload).await
    }

    // 学生成绩历史
    pub async fn my_grades(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        my_grades::my_grades(self, request).await
    }
}
