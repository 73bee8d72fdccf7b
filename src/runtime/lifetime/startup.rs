use crate::config::AppConfig;
use crate::models::users::entities::UserRole;
use crate::models::users::requests::CreateUserRequest;
use crate::storage::Storage;
use crate::utils::password::hash_password;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
}

/// 生成随机密码
fn generate_random_password(length: usize) -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%";
    let mut rng = rand::rng();
    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// 初始化默认管理员账号
/// 如果数据库中没有任何用户，则创建一个默认的 admin 账号
async fn seed_admin(storage: &Arc<dyn Storage>) {
    // 检查是否已有用户
    match storage.count_users().await {
        Ok(count) if count > 0 => {
            debug!(
                "Database already has {} user(s), skipping admin seed",
                count
            );
            return;
        }
        Ok(_) => {
            info!("No users found in database, creating default admin account...");
        }
        Err(e) => {
            warn!("Failed to count users: {}, skipping admin seed", e);
            return;
        }
    }

    // 获取密码：优先从环境变量，否则生成随机密码
    let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| {
        let pwd = generate_random_password(16);
        warn!("==========================================================");
        warn!("  ADMIN PASSWORD NOT SET - USING GENERATED PASSWORD");
        warn!("  admin@collegesys.local / {}", pwd);
        warn!("  Set ADMIN_PASSWORD to control this value");
        warn!("==========================================================");
        pwd
    });

    let hashed = match hash_password(&password) {
        Ok(hash) => hash,
        Err(e) => {
            warn!("Failed to hash admin password: {}, skipping admin seed", e);
            return;
        }
    };

    let admin = CreateUserRequest {
        full_name: "System Administrator".to_string(),
        email: "admin@collegesys.local".to_string(),
        password: hashed,
        role: Some(UserRole::Admin),
    };

    match storage.create_user(admin).await {
        Ok(user) => info!("Default admin account created: {}", user.email),
        Err(e) => warn!("Failed to create default admin account: {}", e),
    }
}

/// 服务启动前的准备工作
///
/// 存储初始化是一次性的异步过程，用显式的超时组合子限定等待上限；
/// 超时或失败直接退出进程，而不是带着未就绪的依赖继续运行。
pub async fn prepare_server_startup() -> StartupContext {
    let config = AppConfig::get();
    let startup_timeout = Duration::from_secs(config.server.timeouts.startup);

    let storage = match tokio::time::timeout(startup_timeout, crate::storage::create_storage())
        .await
    {
        Ok(Ok(storage)) => storage,
        Ok(Err(e)) => {
            eprintln!("Failed to initialize storage: {e}");
            std::process::exit(1);
        }
        Err(_) => {
            eprintln!(
                "Storage initialization timed out after {}s",
                startup_timeout.as_secs()
            );
            std::process::exit(1);
        }
    };

    seed_admin(&storage).await;

    StartupContext { storage }
}
