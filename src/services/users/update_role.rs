use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use crate::middlewares::RequireJWT;
use crate::models::users::requests::{UpdateUserRequest, UpdateUserRoleRequest};
use crate::models::users::responses::UserResponse;
use crate::models::{ApiResponse, ErrorCode};

use super::UserService;

/// 管理员调整用户角色（用户管理页的角色下拉框）
pub async fn update_role(
    service: &UserService,
    request: &HttpRequest,
    user_id: i64,
    update: UpdateUserRoleRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    // 不允许管理员撤销自己的管理员身份，避免把系统锁死
    if let Some(current) = RequireJWT::extract_user_id(request)
        && current == user_id
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "You cannot change your own role",
        )));
    }

    let storage_update = UpdateUserRequest {
        role: Some(update.role),
        ..Default::default()
    };

    match storage.update_user(user_id, storage_update).await {
        Ok(Some(user)) => {
            info!("User {} role updated to {}", user.email, user.role);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                UserResponse { user },
                "Role updated successfully",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        ))),
        Err(e) => {
            error!("Failed to update role: {}", e);
            Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to update role: {e}"),
            )))
        }
    }
}
