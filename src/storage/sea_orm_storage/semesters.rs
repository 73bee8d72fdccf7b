//! 学期存储操作

use super::{SeaOrmStorage, log_db_err};
use crate::entity::semesters::{ActiveModel, Column, Entity as Semesters};
use crate::errors::Result;
use crate::models::semesters::{entities::Semester, requests::CreateSemesterRequest};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    pub async fn create_semester_impl(&self, req: CreateSemesterRequest) -> Result<Semester> {
        let model = ActiveModel {
            name: Set(req.name),
            start_date: Set(req.start_date),
            end_date: Set(req.end_date),
            is_active: Set(req.is_active),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| log_db_err("semesters:create", e))?;

        Ok(result.into_semester())
    }

    pub async fn get_semester_by_id_impl(&self, id: i64) -> Result<Option<Semester>> {
        let result = Semesters::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| log_db_err("semesters:getById", e))?;

        Ok(result.map(|m| m.into_semester()))
    }

    /// 列出学期，开课日期倒序
    pub async fn list_semesters_impl(&self) -> Result<Vec<Semester>> {
        let result = Semesters::find()
            .order_by_desc(Column::StartDate)
            .all(&self.db)
            .await
            .map_err(|e| log_db_err("semesters:list", e))?;

        Ok(result.into_iter().map(|m| m.into_semester()).collect())
    }

    /// 任取一个激活学期：可能有多个同时激活，取第一行
    pub async fn find_active_semester_impl(&self) -> Result<Option<Semester>> {
        let result = Semesters::find()
            .filter(Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .map_err(|e| log_db_err("semesters:getActive", e))?;

        Ok(result.map(|m| m.into_semester()))
    }

    pub async fn count_active_semesters_impl(&self) -> Result<u64> {
        Semesters::find()
            .filter(Column::IsActive.eq(true))
            .count(&self.db)
            .await
            .map_err(|e| log_db_err("semesters:countActive", e))
    }
}
