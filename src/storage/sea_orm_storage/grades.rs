//! 作业与成绩存储操作

use std::collections::{HashMap, HashSet};

use super::{SeaOrmStorage, log_db_err};
use crate::entity::assignments::{
    ActiveModel as AssignmentActiveModel, Column as AssignmentColumn, Entity as Assignments,
};
use crate::entity::courses::{Column as CourseColumn, Entity as Courses};
use crate::entity::grades::{ActiveModel, Column, Entity as Grades};
use crate::errors::Result;
use crate::models::grades::{
    entities::{Assignment, Grade, GradeHistoryEntry},
    requests::CreateAssignmentRequest,
};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    pub async fn create_assignment_impl(
        &self,
        course_id: i64,
        req: CreateAssignmentRequest,
    ) -> Result<Assignment> {
        let model = AssignmentActiveModel {
            course_id: Set(course_id),
            title: Set(req.title),
            due_date: Set(req.due_date),
            max_marks: Set(req.max_marks),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| log_db_err("assignments:create", e))?;

        Ok(result.into_assignment())
    }

    pub async fn get_assignment_by_id_impl(&self, id: i64) -> Result<Option<Assignment>> {
        let result = Assignments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| log_db_err("assignments:getById", e))?;

        Ok(result.map(|m| m.into_assignment()))
    }

    /// 课程作业列表，按截止日期排序
    pub async fn list_assignments_for_course_impl(&self, course_id: i64) -> Result<Vec<Assignment>> {
        let result = Assignments::find()
            .filter(AssignmentColumn::CourseId.eq(course_id))
            .order_by_asc(AssignmentColumn::DueDate)
            .all(&self.db)
            .await
            .map_err(|e| log_db_err("assignments:listForCourse", e))?;

        Ok(result.into_iter().map(|m| m.into_assignment()).collect())
    }

    /// 批量 upsert，冲突目标精确为 (assignment_id, student_id)
    pub async fn upsert_grades_impl(
        &self,
        assignment_id: i64,
        records: &[(i64, f64)],
    ) -> Result<u64> {
        if records.is_empty() {
            return Ok(0);
        }

        let now = chrono::Utc::now().timestamp();
        let models: Vec<ActiveModel> = records
            .iter()
            .map(|(student_id, marks)| ActiveModel {
                assignment_id: Set(assignment_id),
                student_id: Set(*student_id),
                marks_obtained: Set(*marks),
                graded_at: Set(now),
                ..Default::default()
            })
            .collect();

        let affected = Grades::insert_many(models)
            .on_conflict(
                OnConflict::columns([Column::AssignmentId, Column::StudentId])
                    .update_columns([Column::MarksObtained, Column::GradedAt])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| log_db_err("grades:upsertForAssignment", e))?;

        Ok(affected)
    }

    pub async fn list_grades_for_assignment_impl(&self, assignment_id: i64) -> Result<Vec<Grade>> {
        let result = Grades::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .all(&self.db)
            .await
            .map_err(|e| log_db_err("grades:listForAssignment", e))?;

        Ok(result.into_iter().map(|m| m.into_grade()).collect())
    }

    /// 学生成绩历史：带作业与课程信息，最新在前
    pub async fn list_grade_history_for_student_impl(
        &self,
        student_id: i64,
    ) -> Result<Vec<GradeHistoryEntry>> {
        let grades = Grades::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_desc(Column::GradedAt)
            .all(&self.db)
            .await
            .map_err(|e| log_db_err("grades:listForStudent", e))?;

        if grades.is_empty() {
            return Ok(vec![]);
        }

        let assignment_ids: HashSet<i64> = grades.iter().map(|g| g.assignment_id).collect();
        let assignments: HashMap<i64, _> = Assignments::find()
            .filter(AssignmentColumn::Id.is_in(assignment_ids))
            .all(&self.db)
            .await
            .map_err(|e| log_db_err("grades:listAssignmentsForStudent", e))?
            .into_iter()
            .map(|a| (a.id, a))
            .collect();

        let course_ids: HashSet<i64> = assignments.values().map(|a| a.course_id).collect();
        let courses: HashMap<i64, (String, String)> = Courses::find()
            .filter(CourseColumn::Id.is_in(course_ids))
            .all(&self.db)
            .await
            .map_err(|e| log_db_err("grades:listCoursesForStudent", e))?
            .into_iter()
            .map(|c| (c.id, (c.code, c.name)))
            .collect();

        Ok(grades
            .into_iter()
            .filter_map(|g| {
                let assignment = assignments.get(&g.assignment_id)?;
                let (course_code, course_name) = courses.get(&assignment.course_id)?.clone();
                let grade = g.into_grade();

                Some(GradeHistoryEntry {
                    assignment_title: assignment.title.clone(),
                    course_code,
                    course_name,
                    marks_obtained: grade.marks_obtained,
                    max_marks: assignment.max_marks,
                    due_date: assignment.due_date,
                    graded_at: grade.graded_at,
                })
            })
            .collect())
    }

    pub async fn count_grades_for_student_impl(&self, student_id: i64) -> Result<u64> {
        Grades::find()
            .filter(Column::StudentId.eq(student_id))
            .count(&self.db)
            .await
            .map_err(|e| log_db_err("grades:countForStudent", e))
    }
}
