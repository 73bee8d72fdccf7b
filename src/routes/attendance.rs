use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::attendance::requests::{
    ResolveSessionRequest, RosterQueryParams, SaveAttendanceRequest, SelfMarkRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::AttendanceService;
use crate::utils::SafeSessionIdI64;

// 懒加载的全局 ATTENDANCE_SERVICE 实例
static ATTENDANCE_SERVICE: Lazy<AttendanceService> = Lazy::new(AttendanceService::new_lazy);

// HTTP处理程序
pub async fn resolve_session(
    req: HttpRequest,
    payload: web::Json<ResolveSessionRequest>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .resolve_session(&req, payload.into_inner())
        .await
}

pub async fn get_roster(
    req: HttpRequest,
    session_id: SafeSessionIdI64,
    query: web::Query<RosterQueryParams>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .get_roster(&req, session_id.0, query.course_id)
        .await
}

pub async fn save_attendance(
    req: HttpRequest,
    session_id: SafeSessionIdI64,
    payload: web::Json<SaveAttendanceRequest>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .save_attendance(&req, session_id.0, payload.into_inner())
        .await
}

pub async fn mark_self(
    req: HttpRequest,
    payload: web::Json<SelfMarkRequest>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.mark_self(&req, payload.into_inner()).await
}

pub async fn my_attendance(req: HttpRequest) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.my_attendance(&req).await
}

// 配置路由
pub fn configure_attendance_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/attendance")
            .wrap(middlewares::RequireJWT)
            .service(
                // 教师解析 (课程, 日期) 的课堂会话，管理员可操作所有课程
                web::resource("/sessions").route(
                    web::post()
                        .to(resolve_session)
                        .wrap(middlewares::RequireRole::new_any(UserRole::faculty_roles())),
                ),
            )
            .service(
                // 会话名册：选课学生与当前考勤状态的合并视图
                web::resource("/sessions/{session_id}/roster").route(
                    web::get()
                        .to(get_roster)
                        .wrap(middlewares::RequireRole::new_any(UserRole::faculty_roles())),
                ),
            )
            .service(
                // 批量保存考勤
                web::resource("/sessions/{session_id}/records").route(
                    web::put()
                        .to(save_attendance)
                        .wrap(middlewares::RequireRole::new_any(UserRole::faculty_roles())),
                ),
            )
            .service(
                // 学生自助打卡，仅限当天
                web::resource("/self-mark").route(
                    web::post()
                        .to(mark_self)
                        .wrap(middlewares::RequireRole::new(&UserRole::Student)),
                ),
            )
            .service(
                // 学生查看自己的考勤历史
                web::resource("/my").route(
                    web::get()
                        .to(my_attendance)
                        .wrap(middlewares::RequireRole::new(&UserRole::Student)),
                ),
            ),
    );
}
