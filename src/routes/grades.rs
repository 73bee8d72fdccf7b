use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::grades::requests::{
    AssignmentQueryParams, CreateAssignmentRequest, SaveGradesRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::GradeService;
use crate::utils::SafeAssignmentIdI64;

// 懒加载的全局 GRADE_SERVICE 实例
static GRADE_SERVICE: Lazy<GradeService> = Lazy::new(GradeService::new_lazy);

pub async fn create_assignment(
    req: HttpRequest,
    assignment: web::Json<CreateAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE
        .create_assignment(&req, assignment.into_inner())
        .await
}

pub async fn list_assignments(
    req: HttpRequest,
    query: web::Query<AssignmentQueryParams>,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.list_assignments(&req, query.course_id).await
}

pub async fn grade_sheet(
    req: HttpRequest,
    assignment_id: SafeAssignmentIdI64,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.grade_sheet(&req, assignment_id.0).await
}

pub async fn save_grades(
    req: HttpRequest,
    assignment_id: SafeAssignmentIdI64,
    payload: web::Json<SaveGradesRequest>,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE
        .save_grades(&req, assignment_id.0, payload.into_inner())
        .await
}

pub async fn my_grades(req: HttpRequest) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.my_grades(&req).await
}

// 配置路由
pub fn configure_grades_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/assignments")
            .wrap(middlewares::RequireJWT)
            .service(
                // 作业按课程维护，course_id 由查询参数/请求体携带
                web::resource("")
                    .route(
                        web::get()
                            .to(list_assignments)
                            .wrap(middlewares::RequireRole::new_any(UserRole::faculty_roles())),
                    )
                    .route(
                        web::post()
                            .to(create_assignment)
                            .wrap(middlewares::RequireRole::new_any(UserRole::faculty_roles())),
                    ),
            )
            .service(
                // 成绩录入表与批量保存，upsert 冲突目标 (assignment_id, student_id)
                web::resource("/{assignment_id}/grades")
                    .route(
                        web::get()
                            .to(grade_sheet)
                            .wrap(middlewares::RequireRole::new_any(UserRole::faculty_roles())),
                    )
                    .route(
                        web::put()
                            .to(save_grades)
                            .wrap(middlewares::RequireRole::new_any(UserRole::faculty_roles())),
                    ),
            ),
    );

    cfg.service(
        web::scope("/api/v1/grades")
            .wrap(middlewares::RequireJWT)
            .service(
                // 学生查看自己的成绩
                web::resource("/my").route(
                    web::get()
                        .to(my_grades)
                        .wrap(middlewares::RequireRole::new(&UserRole::Student)),
                ),
            ),
    );
}
