//! 用户档案存储操作

use super::{SeaOrmStorage, log_db_err};
use crate::entity::profiles::{ActiveModel, Column, Entity as Profiles};
use crate::errors::Result;
use crate::models::{
    PaginationInfo,
    users::{
        entities::{User, UserRole, UserStatus},
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

impl SeaOrmStorage {
    /// 创建用户（password 字段传入的是已哈希的密码）
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            full_name: Set(req.full_name),
            email: Set(req.email),
            password_hash: Set(req.password),
            role: Set(req.role.unwrap_or(UserRole::Student).to_string()),
            status: Set(UserStatus::Active.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| log_db_err("profiles:create", e))?;

        Ok(result.into_user())
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Profiles::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| log_db_err("profiles:getById", e))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过邮箱获取用户
    pub async fn get_user_by_email_impl(&self, email: &str) -> Result<Option<User>> {
        let result = Profiles::find()
            .filter(Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| log_db_err("profiles:getByEmail", e))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 分页列出用户
    pub async fn list_users_with_pagination_impl(
        &self,
        query: UserListQuery,
    ) -> Result<UserListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let mut select = Profiles::find();

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::FullName.contains(&escaped))
                    .add(Column::Email.contains(&escaped)),
            );
        }

        // 角色筛选
        if let Some(ref role) = query.role {
            select = select.filter(Column::Role.eq(role.to_string()));
        }

        // 按姓名排序
        select = select.order_by_asc(Column::FullName);

        // 分页查询
        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| log_db_err("profiles:count", e))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| log_db_err("profiles:countPages", e))?;

        let users = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| log_db_err("profiles:list", e))?;

        Ok(UserListResponse {
            items: users.into_iter().map(|m| m.into_user()).collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 更新用户信息
    pub async fn update_user_impl(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        let existing = Profiles::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| log_db_err("profiles:getForUpdate", e))?;

        if existing.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(full_name) = update.full_name {
            model.full_name = Set(full_name);
        }
        if let Some(email) = update.email {
            model.email = Set(email);
        }
        if let Some(password_hash) = update.password {
            model.password_hash = Set(password_hash);
        }
        if let Some(role) = update.role {
            model.role = Set(role.to_string());
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| log_db_err("profiles:update", e))?;

        Ok(Some(result.into_user()))
    }

    /// 更新用户最后登录时间
    pub async fn update_last_login_impl(&self, id: i64) -> Result<bool> {
        let model = ActiveModel {
            id: Set(id),
            last_login: Set(Some(chrono::Utc::now().timestamp())),
            ..Default::default()
        };

        match model.update(&self.db).await {
            Ok(_) => Ok(true),
            Err(sea_orm::DbErr::RecordNotFound(_)) => Ok(false),
            Err(e) => Err(log_db_err("profiles:updateLastLogin", e)),
        }
    }

    /// 统计用户总数
    pub async fn count_users_impl(&self) -> Result<u64> {
        Profiles::find()
            .count(&self.db)
            .await
            .map_err(|e| log_db_err("profiles:countAll", e))
    }

    /// 统计指定角色的用户数量
    pub async fn count_users_by_role_impl(&self, role: UserRole) -> Result<u64> {
        Profiles::find()
            .filter(Column::Role.eq(role.to_string()))
            .count(&self.db)
            .await
            .map_err(|e| log_db_err("profiles:countByRole", e))
    }

    /// 按 ID 批量获取学生档案（单次查询，限定角色为学生）
    pub async fn list_students_by_ids_impl(&self, ids: &[i64]) -> Result<Vec<User>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let result = Profiles::find()
            .filter(Column::Id.is_in(ids.to_vec()))
            .filter(Column::Role.eq(UserRole::Student.to_string()))
            .all(&self.db)
            .await
            .map_err(|e| log_db_err("profiles:listStudentsByIds", e))?;

        Ok(result.into_iter().map(|m| m.into_user()).collect())
    }
}
