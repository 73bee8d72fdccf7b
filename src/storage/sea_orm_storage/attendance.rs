//! 考勤记录存储操作

use std::collections::{HashMap, HashSet};

use super::{SeaOrmStorage, log_db_err};
use crate::entity::attendance::{ActiveModel, Column, Entity as Attendance};
use crate::entity::class_sessions::{Column as SessionColumn, Entity as ClassSessions};
use crate::entity::courses::{Column as CourseColumn, Entity as Courses};
use crate::errors::{CollegeSysError, Result};
use crate::models::attendance::entities::{
    AttendanceHistoryEntry, AttendanceRecord, AttendanceStatus,
};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

impl SeaOrmStorage {
    /// 会话已有的 (学生, 状态) 记录
    pub async fn list_attendance_for_session_impl(
        &self,
        session_id: i64,
    ) -> Result<Vec<(i64, AttendanceStatus)>> {
        let rows = Attendance::find()
            .filter(Column::SessionId.eq(session_id))
            .all(&self.db)
            .await
            .map_err(|e| log_db_err("attendance:listForSession", e))?;

        Ok(rows
            .into_iter()
            .map(|m| {
                let status = m
                    .status
                    .parse::<AttendanceStatus>()
                    .unwrap_or(AttendanceStatus::Absent);
                (m.student_id, status)
            })
            .collect())
    }

    /// 批量 upsert，冲突目标精确为 (session_id, student_id)
    pub async fn upsert_attendance_impl(
        &self,
        session_id: i64,
        records: &[(i64, AttendanceStatus)],
    ) -> Result<u64> {
        if records.is_empty() {
            return Ok(0);
        }

        let now = chrono::Utc::now().timestamp();
        let models: Vec<ActiveModel> = records
            .iter()
            .map(|(student_id, status)| ActiveModel {
                session_id: Set(session_id),
                student_id: Set(*student_id),
                status: Set(status.to_string()),
                marked_at: Set(now),
                ..Default::default()
            })
            .collect();

        let affected = Attendance::insert_many(models)
            .on_conflict(
                OnConflict::columns([Column::SessionId, Column::StudentId])
                    .update_columns([Column::Status, Column::MarkedAt])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| log_db_err("attendance:upsert", e))?;

        Ok(affected)
    }

    /// (会话, 学生) 的已有记录
    pub async fn find_attendance_impl(
        &self,
        session_id: i64,
        student_id: i64,
    ) -> Result<Option<AttendanceRecord>> {
        let result = Attendance::find()
            .filter(
                Condition::all()
                    .add(Column::SessionId.eq(session_id))
                    .add(Column::StudentId.eq(student_id)),
            )
            .one(&self.db)
            .await
            .map_err(|e| log_db_err("attendance:getForSessionAndStudent", e))?;

        Ok(result.map(|m| m.into_attendance_record()))
    }

    /// 单条插入（学生自助打卡），重复插入返回 UniqueViolation
    pub async fn insert_attendance_impl(
        &self,
        session_id: i64,
        student_id: i64,
        status: AttendanceStatus,
    ) -> Result<AttendanceRecord> {
        let model = ActiveModel {
            session_id: Set(session_id),
            student_id: Set(student_id),
            status: Set(status.to_string()),
            marked_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            if let Some(sea_orm::SqlErr::UniqueConstraintViolation(msg)) = e.sql_err() {
                CollegeSysError::unique_violation(msg)
            } else {
                log_db_err("attendance:markByStudent", e)
            }
        })?;

        Ok(result.into_attendance_record())
    }

    /// 学生考勤历史：最新在前，带会话与课程信息
    pub async fn list_attendance_history_for_student_impl(
        &self,
        student_id: i64,
        limit: u64,
    ) -> Result<Vec<AttendanceHistoryEntry>> {
        let records = Attendance::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_desc(Column::MarkedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| log_db_err("attendance:listForStudent", e))?;

        if records.is_empty() {
            return Ok(vec![]);
        }

        let session_ids: HashSet<i64> = records.iter().map(|r| r.session_id).collect();
        let sessions: HashMap<i64, _> = ClassSessions::find()
            .filter(SessionColumn::Id.is_in(session_ids))
            .all(&self.db)
            .await
            .map_err(|e| log_db_err("attendance:listSessionsForStudent", e))?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        let course_ids: HashSet<i64> = sessions.values().map(|s| s.course_id).collect();
        let courses: HashMap<i64, (String, String)> = Courses::find()
            .filter(CourseColumn::Id.is_in(course_ids))
            .all(&self.db)
            .await
            .map_err(|e| log_db_err("attendance:listCoursesForStudent", e))?
            .into_iter()
            .map(|c| (c.id, (c.code, c.name)))
            .collect();

        // 会话或课程已被删除的记录不展示
        Ok(records
            .into_iter()
            .filter_map(|r| {
                let session = sessions.get(&r.session_id)?;
                let (course_code, course_name) = courses.get(&session.course_id)?.clone();
                let session_date = session.session_date;
                let record = r.into_attendance_record();

                Some(AttendanceHistoryEntry {
                    id: record.id,
                    course_code,
                    course_name,
                    session_date,
                    status: record.status,
                    marked_at: record.marked_at,
                })
            })
            .collect())
    }

    pub async fn count_attendance_for_student_impl(&self, student_id: i64) -> Result<u64> {
        Attendance::find()
            .filter(Column::StudentId.eq(student_id))
            .count(&self.db)
            .await
            .map_err(|e| log_db_err("attendance:countForStudent", e))
    }
}
