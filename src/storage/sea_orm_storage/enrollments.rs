//! 选课关联存储操作

use std::collections::{HashMap, HashSet};

use super::{SeaOrmStorage, log_db_err};
use crate::entity::courses::{Column as CourseColumn, Entity as Courses};
use crate::entity::enrollments::{ActiveModel, Column, Entity as Enrollments, Relation};
use crate::entity::profiles::Column as ProfileColumn;
use crate::entity::semesters::Entity as Semesters;
use crate::errors::{CollegeSysError, Result};
use crate::models::enrollments::entities::{
    CourseRosterRow, Enrollment, EnrollmentDetail, StudentCourse,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, FromQueryResult, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};

/// 名册联表查询行：选课记录左联学生档案
#[derive(Debug, FromQueryResult)]
struct RosterQueryRow {
    student_id: i64,
    full_name: Option<String>,
    email: Option<String>,
}

impl SeaOrmStorage {
    /// 创建选课记录，重复选课返回 UniqueViolation
    pub async fn create_enrollment_impl(
        &self,
        student_id: i64,
        course_id: i64,
        semester_id: i64,
    ) -> Result<Enrollment> {
        let model = ActiveModel {
            student_id: Set(student_id),
            course_id: Set(course_id),
            semester_id: Set(semester_id),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            if let Some(sea_orm::SqlErr::UniqueConstraintViolation(msg)) = e.sql_err() {
                CollegeSysError::unique_violation(msg)
            } else {
                log_db_err("enrollments:create", e)
            }
        })?;

        Ok(result.into_enrollment())
    }

    pub async fn delete_enrollment_impl(&self, id: i64) -> Result<bool> {
        let result = Enrollments::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| log_db_err("enrollments:delete", e))?;

        Ok(result.rows_affected > 0)
    }

    /// 选课明细：选课记录展开学生/课程/学期名称
    pub async fn list_enrollments_with_details_impl(&self) -> Result<Vec<EnrollmentDetail>> {
        let enrollments = Enrollments::find()
            .order_by_desc(Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| log_db_err("enrollments:list", e))?;

        if enrollments.is_empty() {
            return Ok(vec![]);
        }

        let student_ids: HashSet<i64> = enrollments.iter().map(|e| e.student_id).collect();
        let course_ids: HashSet<i64> = enrollments.iter().map(|e| e.course_id).collect();
        let semester_ids: HashSet<i64> = enrollments.iter().map(|e| e.semester_id).collect();

        let students: HashMap<i64, (String, String)> = crate::entity::profiles::Entity::find()
            .filter(ProfileColumn::Id.is_in(student_ids))
            .all(&self.db)
            .await
            .map_err(|e| log_db_err("enrollments:listStudents", e))?
            .into_iter()
            .map(|p| (p.id, (p.full_name, p.email)))
            .collect();

        let courses: HashMap<i64, (String, String)> = Courses::find()
            .filter(CourseColumn::Id.is_in(course_ids))
            .all(&self.db)
            .await
            .map_err(|e| log_db_err("enrollments:listCourses", e))?
            .into_iter()
            .map(|c| (c.id, (c.code, c.name)))
            .collect();

        let semesters: HashMap<i64, String> = Semesters::find()
            .filter(crate::entity::semesters::Column::Id.is_in(semester_ids))
            .all(&self.db)
            .await
            .map_err(|e| log_db_err("enrollments:listSemesters", e))?
            .into_iter()
            .map(|s| (s.id, s.name))
            .collect();

        Ok(enrollments
            .into_iter()
            .map(|e| {
                let (student_name, student_email) = students
                    .get(&e.student_id)
                    .cloned()
                    .unwrap_or_else(|| (String::new(), String::new()));
                let (course_code, course_name) = courses
                    .get(&e.course_id)
                    .cloned()
                    .unwrap_or_else(|| (String::new(), String::new()));
                let semester_name = semesters.get(&e.semester_id).cloned().unwrap_or_default();
                let detail = e.into_enrollment();

                EnrollmentDetail {
                    id: detail.id,
                    student_id: detail.student_id,
                    student_name,
                    student_email,
                    course_id: detail.course_id,
                    course_code,
                    course_name,
                    semester_id: detail.semester_id,
                    semester_name,
                    created_at: detail.created_at,
                }
            })
            .collect())
    }

    /// 课程名册：选课记录左联学生档案，档案缺失时名字字段为空
    pub async fn list_course_roster_impl(&self, course_id: i64) -> Result<Vec<CourseRosterRow>> {
        let rows = Enrollments::find()
            .select_only()
            .column(Column::StudentId)
            .column_as(ProfileColumn::FullName, "full_name")
            .column_as(ProfileColumn::Email, "email")
            .join(JoinType::LeftJoin, Relation::Student.def())
            .filter(Column::CourseId.eq(course_id))
            .into_model::<RosterQueryRow>()
            .all(&self.db)
            .await
            .map_err(|e| log_db_err("enrollments:listRosterForCourse", e))?;

        Ok(rows
            .into_iter()
            .map(|r| CourseRosterRow {
                student_id: r.student_id,
                full_name: r.full_name,
                email: r.email,
            })
            .collect())
    }

    /// 任取该课程一条选课记录的学期引用
    pub async fn find_enrollment_semester_impl(&self, course_id: i64) -> Result<Option<i64>> {
        let result = Enrollments::find()
            .filter(Column::CourseId.eq(course_id))
            .one(&self.db)
            .await
            .map_err(|e| log_db_err("enrollments:getSemesterForCourse", e))?;

        Ok(result.map(|e| e.semester_id))
    }

    /// 学生在某课程中的选课记录
    pub async fn get_enrollment_impl(
        &self,
        student_id: i64,
        course_id: i64,
    ) -> Result<Option<Enrollment>> {
        let result = Enrollments::find()
            .filter(
                Condition::all()
                    .add(Column::StudentId.eq(student_id))
                    .add(Column::CourseId.eq(course_id)),
            )
            .one(&self.db)
            .await
            .map_err(|e| log_db_err("enrollments:getForStudentAndCourse", e))?;

        Ok(result.map(|e| e.into_enrollment()))
    }

    /// 学生视角的已选课程列表
    pub async fn list_student_courses_impl(&self, student_id: i64) -> Result<Vec<StudentCourse>> {
        let enrollments = Enrollments::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_desc(Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| log_db_err("enrollments:listForStudent", e))?;

        if enrollments.is_empty() {
            return Ok(vec![]);
        }

        let course_ids: HashSet<i64> = enrollments.iter().map(|e| e.course_id).collect();
        let semester_ids: HashSet<i64> = enrollments.iter().map(|e| e.semester_id).collect();

        let courses: HashMap<i64, _> = Courses::find()
            .filter(CourseColumn::Id.is_in(course_ids))
            .all(&self.db)
            .await
            .map_err(|e| log_db_err("enrollments:listCoursesForStudent", e))?
            .into_iter()
            .map(|c| (c.id, c.into_course()))
            .collect();

        let semesters: HashMap<i64, String> = Semesters::find()
            .filter(crate::entity::semesters::Column::Id.is_in(semester_ids))
            .all(&self.db)
            .await
            .map_err(|e| log_db_err("enrollments:listSemestersForStudent", e))?
            .into_iter()
            .map(|s| (s.id, s.name))
            .collect();

        // 课程已被删除的选课记录不展示
        Ok(enrollments
            .into_iter()
            .filter_map(|e| {
                let course = courses.get(&e.course_id)?.clone();
                Some(StudentCourse {
                    enrollment_id: e.id,
                    semester_id: e.semester_id,
                    semester_name: semesters.get(&e.semester_id).cloned().unwrap_or_default(),
                    course,
                })
            })
            .collect())
    }

    pub async fn count_enrollments_impl(&self) -> Result<u64> {
        Enrollments::find()
            .count(&self.db)
            .await
            .map_err(|e| log_db_err("enrollments:count", e))
    }

    pub async fn count_enrollments_for_courses_impl(&self, course_ids: &[i64]) -> Result<u64> {
        if course_ids.is_empty() {
            return Ok(0);
        }

        Enrollments::find()
            .filter(Column::CourseId.is_in(course_ids.to_vec()))
            .count(&self.db)
            .await
            .map_err(|e| log_db_err("enrollments:countForCourses", e))
    }

    pub async fn count_distinct_students_for_courses_impl(
        &self,
        course_ids: &[i64],
    ) -> Result<u64> {
        if course_ids.is_empty() {
            return Ok(0);
        }

        let rows = Enrollments::find()
            .filter(Column::CourseId.is_in(course_ids.to_vec()))
            .all(&self.db)
            .await
            .map_err(|e| log_db_err("enrollments:listForDistinctStudents", e))?;

        let distinct: HashSet<i64> = rows.into_iter().map(|e| e.student_id).collect();
        Ok(distinct.len() as u64)
    }

    pub async fn count_enrollments_for_student_impl(&self, student_id: i64) -> Result<u64> {
        Enrollments::find()
            .filter(Column::StudentId.eq(student_id))
            .count(&self.db)
            .await
            .map_err(|e| log_db_err("enrollments:countForStudent", e))
    }
}
