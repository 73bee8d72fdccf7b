//! 院系存储操作

use super::{SeaOrmStorage, log_db_err};
use crate::entity::departments::{ActiveModel, Column, Entity as Departments};
use crate::errors::Result;
use crate::models::departments::{entities::Department, requests::CreateDepartmentRequest};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryOrder, Set};

impl SeaOrmStorage {
    pub async fn create_department_impl(
        &self,
        req: CreateDepartmentRequest,
    ) -> Result<Department> {
        let model = ActiveModel {
            code: Set(req.code),
            name: Set(req.name),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| log_db_err("departments:create", e))?;

        Ok(result.into_department())
    }

    pub async fn get_department_by_id_impl(&self, id: i64) -> Result<Option<Department>> {
        let result = Departments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| log_db_err("departments:getById", e))?;

        Ok(result.map(|m| m.into_department()))
    }

    pub async fn list_departments_impl(&self) -> Result<Vec<Department>> {
        let result = Departments::find()
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| log_db_err("departments:list", e))?;

        Ok(result.into_iter().map(|m| m.into_department()).collect())
    }
}
