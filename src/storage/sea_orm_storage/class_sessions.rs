//! 课堂会话存储操作

use super::{SeaOrmStorage, log_db_err};
use crate::entity::class_sessions::{ActiveModel, Column, Entity as ClassSessions};
use crate::errors::{CollegeSysError, Result};
use crate::models::attendance::entities::ClassSession;
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QuerySelect, Set,
};

impl SeaOrmStorage {
    /// (课程, 日期) 查会话
    ///
    /// limit(1) 查询：零行是预期结果，调用方据此决定是否建会话。
    pub async fn find_session_by_course_and_date_impl(
        &self,
        course_id: i64,
        session_date: NaiveDate,
    ) -> Result<Option<ClassSession>> {
        let result = ClassSessions::find()
            .filter(
                Condition::all()
                    .add(Column::CourseId.eq(course_id))
                    .add(Column::SessionDate.eq(session_date)),
            )
            .limit(1)
            .one(&self.db)
            .await
            .map_err(|e| log_db_err("class_sessions:getByCourseAndDate", e))?;

        Ok(result.map(|m| m.into_class_session()))
    }

    /// 插入会话
    ///
    /// (course_id, session_date) 唯一索引生效时，并发创建的败者在这里拿到
    /// UniqueViolation；调用方不重试，由下一次解析找到胜者的行。
    pub async fn insert_class_session_impl(
        &self,
        course_id: i64,
        session_date: NaiveDate,
        semester_id: i64,
    ) -> Result<ClassSession> {
        let model = ActiveModel {
            course_id: Set(course_id),
            session_date: Set(session_date),
            semester_id: Set(semester_id),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            if let Some(sea_orm::SqlErr::UniqueConstraintViolation(msg)) = e.sql_err() {
                CollegeSysError::unique_violation(msg)
            } else {
                log_db_err("class_sessions:insert", e)
            }
        })?;

        Ok(result.into_class_session())
    }

    pub async fn get_session_by_id_impl(&self, id: i64) -> Result<Option<ClassSession>> {
        let result = ClassSessions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| log_db_err("class_sessions:getById", e))?;

        Ok(result.map(|m| m.into_class_session()))
    }
}
