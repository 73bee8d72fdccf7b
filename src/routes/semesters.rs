use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::semesters::requests::{CreateSemesterRequest, SemesterQueryParams};
use crate::models::users::entities::UserRole;
use crate::services::SemesterService;

// 懒加载的全局 SEMESTER_SERVICE 实例
static SEMESTER_SERVICE: Lazy<SemesterService> = Lazy::new(SemesterService::new_lazy);

pub async fn list_semesters(
    req: HttpRequest,
    query: web::Query<SemesterQueryParams>,
) -> ActixResult<HttpResponse> {
    SEMESTER_SERVICE.list_semesters(&req, query.active).await
}

pub async fn create_semester(
    req: HttpRequest,
    semester: web::Json<CreateSemesterRequest>,
) -> ActixResult<HttpResponse> {
    SEMESTER_SERVICE
        .create_semester(&req, semester.into_inner())
        .await
}

// 配置路由
pub fn configure_semesters_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/semesters")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    // 学生选课时需要看激活学期列表，因此所有角色可读
                    .route(web::get().to(list_semesters))
                    .route(
                        web::post()
                            .to(create_semester)
                            // 学期只能由管理员维护
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            ),
    );
}
