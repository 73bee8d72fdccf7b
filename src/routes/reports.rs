use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::users::entities::UserRole;
use crate::services::ReportService;

// 懒加载的全局 REPORT_SERVICE 实例
static REPORT_SERVICE: Lazy<ReportService> = Lazy::new(ReportService::new_lazy);

pub async fn dashboard(req: HttpRequest) -> ActixResult<HttpResponse> {
    REPORT_SERVICE.dashboard(&req).await
}

pub async fn dataset(req: HttpRequest, report_id: web::Path<String>) -> ActixResult<HttpResponse> {
    REPORT_SERVICE.dataset(&req, report_id.into_inner()).await
}

// 配置路由
pub fn configure_reports_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/reports")
            .wrap(middlewares::RequireJWT)
            .service(
                // 看板统计按请求者角色返回对应形态，所有角色可用
                web::resource("/dashboard").route(web::get().to(dashboard)),
            )
            .service(
                // 报表数据集只开放给管理员与教师
                web::resource("/datasets/{report_id}").route(
                    web::get()
                        .to(dataset)
                        .wrap(middlewares::RequireRole::new_any(UserRole::faculty_roles())),
                ),
            ),
    );
}
