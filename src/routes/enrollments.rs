use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::enrollments::requests::{CreateEnrollmentRequest, SelfEnrollRequest};
use crate::models::users::entities::UserRole;
use crate::services::EnrollmentService;
use crate::utils::SafeEnrollmentIdI64;

// 懒加载的全局 ENROLLMENT_SERVICE 实例
static ENROLLMENT_SERVICE: Lazy<EnrollmentService> = Lazy::new(EnrollmentService::new_lazy);

pub async fn list_enrollments(req: HttpRequest) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE.list_enrollments(&req).await
}

pub async fn create_enrollment(
    req: HttpRequest,
    enrollment: web::Json<CreateEnrollmentRequest>,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE
        .create_enrollment(&req, enrollment.into_inner())
        .await
}

pub async fn delete_enrollment(
    req: HttpRequest,
    enrollment_id: SafeEnrollmentIdI64,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE
        .delete_enrollment(&req, enrollment_id.0)
        .await
}

pub async fn self_enroll(
    req: HttpRequest,
    payload: web::Json<SelfEnrollRequest>,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE.self_enroll(&req, payload.into_inner()).await
}

pub async fn my_courses(req: HttpRequest) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE.my_courses(&req).await
}

// 配置路由
pub fn configure_enrollments_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/enrollments")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(
                        // 管理员查看全部选课明细
                        web::get()
                            .to(list_enrollments)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    )
                    .route(
                        // 管理员录入选课记录
                        web::post()
                            .to(create_enrollment)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            )
            .service(
                // 学生在课程目录里自助选课
                web::resource("/self").route(
                    web::post()
                        .to(self_enroll)
                        .wrap(middlewares::RequireRole::new(&UserRole::Student)),
                ),
            )
            .service(
                // 学生查看自己的课程
                web::resource("/my-courses").route(
                    web::get()
                        .to(my_courses)
                        .wrap(middlewares::RequireRole::new(&UserRole::Student)),
                ),
            )
            .service(
                web::resource("/{enrollment_id}").route(
                    web::delete()
                        .to(delete_enrollment)
                        .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                ),
            ),
    );
}
