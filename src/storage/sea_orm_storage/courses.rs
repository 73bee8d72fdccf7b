//! 课程存储操作

use super::{SeaOrmStorage, log_db_err};
use crate::entity::courses::{ActiveModel, Column, Entity as Courses};
use crate::errors::Result;
use crate::models::courses::{
    entities::Course,
    requests::{CourseListQuery, CreateCourseRequest},
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

impl SeaOrmStorage {
    /// 创建课程（faculty_id 已由服务层解析）
    pub async fn create_course_impl(&self, req: CreateCourseRequest) -> Result<Course> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            code: Set(req.code),
            name: Set(req.name),
            description: Set(req.description),
            credits: Set(req.credits),
            department_id: Set(req.department_id),
            faculty_id: Set(req.faculty_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| log_db_err("courses:create", e))?;

        Ok(result.into_course())
    }

    pub async fn get_course_by_id_impl(&self, id: i64) -> Result<Option<Course>> {
        let result = Courses::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| log_db_err("courses:getById", e))?;

        Ok(result.map(|m| m.into_course()))
    }

    /// 列出课程：目录语义，按课程编号排序一次性返回
    pub async fn list_courses_impl(&self, query: CourseListQuery) -> Result<Vec<Course>> {
        let mut select = Courses::find();

        if let Some(faculty_id) = query.faculty_id {
            select = select.filter(Column::FacultyId.eq(faculty_id));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::Code.contains(&escaped))
                    .add(Column::Name.contains(&escaped))
                    .add(Column::Description.contains(&escaped)),
            );
        }

        let result = select
            .order_by_asc(Column::Code)
            .all(&self.db)
            .await
            .map_err(|e| log_db_err("courses:list", e))?;

        Ok(result.into_iter().map(|m| m.into_course()).collect())
    }

    /// 最近创建的课程（看板）
    pub async fn list_recent_courses_impl(&self, limit: u64) -> Result<Vec<Course>> {
        let result = Courses::find()
            .order_by_desc(Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| log_db_err("courses:listRecent", e))?;

        Ok(result.into_iter().map(|m| m.into_course()).collect())
    }

    pub async fn count_courses_impl(&self) -> Result<u64> {
        Courses::find()
            .count(&self.db)
            .await
            .map_err(|e| log_db_err("courses:count", e))
    }

    pub async fn list_course_ids_by_faculty_impl(&self, faculty_id: i64) -> Result<Vec<i64>> {
        let result = Courses::find()
            .filter(Column::FacultyId.eq(faculty_id))
            .all(&self.db)
            .await
            .map_err(|e| log_db_err("courses:listIdsByFaculty", e))?;

        Ok(result.into_iter().map(|m| m.id).collect())
    }
}
