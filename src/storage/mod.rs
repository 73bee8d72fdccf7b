use std::sync::Arc;

use chrono::NaiveDate;

use crate::models::{
    attendance::entities::{
        AttendanceHistoryEntry, AttendanceRecord, AttendanceStatus, ClassSession,
    },
    courses::{entities::Course, requests::{CourseListQuery, CreateCourseRequest}},
    departments::{entities::Department, requests::CreateDepartmentRequest},
    enrollments::entities::{CourseRosterRow, Enrollment, EnrollmentDetail, StudentCourse},
    grades::{
        entities::{Assignment, Grade, GradeHistoryEntry},
        requests::CreateAssignmentRequest,
    },
    semesters::{entities::Semester, requests::CreateSemesterRequest},
    users::{
        entities::{User, UserRole},
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户档案管理方法
    // 创建用户（password 字段传入的是已哈希的密码）
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 列出用户
    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse>;
    // 更新用户信息
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 统计用户总数
    async fn count_users(&self) -> Result<u64>;
    // 统计指定角色的用户数量
    async fn count_users_by_role(&self, role: UserRole) -> Result<u64>;
    // 按 ID 批量获取学生档案（名册姓名回填）
    async fn list_students_by_ids(&self, ids: &[i64]) -> Result<Vec<User>>;

    /// 院系管理方法
    async fn create_department(&self, department: CreateDepartmentRequest) -> Result<Department>;
    async fn get_department_by_id(&self, id: i64) -> Result<Option<Department>>;
    async fn list_departments(&self) -> Result<Vec<Department>>;

    /// 课程管理方法
    // 创建课程（faculty_id 已由服务层解析）
    async fn create_course(&self, course: CreateCourseRequest) -> Result<Course>;
    async fn get_course_by_id(&self, id: i64) -> Result<Option<Course>>;
    async fn list_courses(&self, query: CourseListQuery) -> Result<Vec<Course>>;
    async fn list_recent_courses(&self, limit: u64) -> Result<Vec<Course>>;
    async fn count_courses(&self) -> Result<u64>;
    // 教师名下的课程 ID 集合（看板统计）
    async fn list_course_ids_by_faculty(&self, faculty_id: i64) -> Result<Vec<i64>>;

    /// 学期管理方法
    async fn create_semester(&self, semester: CreateSemesterRequest) -> Result<Semester>;
    async fn get_semester_by_id(&self, id: i64) -> Result<Option<Semester>>;
    async fn list_semesters(&self) -> Result<Vec<Semester>>;
    // 任取一个处于激活状态的学期（可能有多个，取第一个）
    async fn find_active_semester(&self) -> Result<Option<Semester>>;
    async fn count_active_semesters(&self) -> Result<u64>;

    /// 选课管理方法
    async fn create_enrollment(
        &self,
        student_id: i64,
        course_id: i64,
        semester_id: i64,
    ) -> Result<Enrollment>;
    async fn delete_enrollment(&self, id: i64) -> Result<bool>;
    // 选课明细（学生/课程/学期联表）
    async fn list_enrollments_with_details(&self) -> Result<Vec<EnrollmentDetail>>;
    // 课程名册：选课记录与学生档案左联，档案缺失时名字字段为空
    async fn list_course_roster(&self, course_id: i64) -> Result<Vec<CourseRosterRow>>;
    // 任取该课程一条选课记录的学期（会话学期推导，取第一行）
    async fn find_enrollment_semester(&self, course_id: i64) -> Result<Option<i64>>;
    // 学生在某课程中的选课记录
    async fn get_enrollment(&self, student_id: i64, course_id: i64) -> Result<Option<Enrollment>>;
    // 学生视角的已选课程列表
    async fn list_student_courses(&self, student_id: i64) -> Result<Vec<StudentCourse>>;
    async fn count_enrollments(&self) -> Result<u64>;
    async fn count_enrollments_for_courses(&self, course_ids: &[i64]) -> Result<u64>;
    async fn count_distinct_students_for_courses(&self, course_ids: &[i64]) -> Result<u64>;
    async fn count_enrollments_for_student(&self, student_id: i64) -> Result<u64>;

    /// 课堂会话方法
    // (课程, 日期) 查会话，零行是预期结果而不是错误
    async fn find_session_by_course_and_date(
        &self,
        course_id: i64,
        session_date: NaiveDate,
    ) -> Result<Option<ClassSession>>;
    async fn insert_class_session(
        &self,
        course_id: i64,
        session_date: NaiveDate,
        semester_id: i64,
    ) -> Result<ClassSession>;
    async fn get_session_by_id(&self, id: i64) -> Result<Option<ClassSession>>;

    /// 考勤方法
    // 会话已有的 (学生, 状态) 记录
    async fn list_attendance_for_session(
        &self,
        session_id: i64,
    ) -> Result<Vec<(i64, AttendanceStatus)>>;
    // 批量 upsert，冲突目标 (session_id, student_id)
    async fn upsert_attendance(
        &self,
        session_id: i64,
        records: &[(i64, AttendanceStatus)],
    ) -> Result<u64>;
    async fn find_attendance(
        &self,
        session_id: i64,
        student_id: i64,
    ) -> Result<Option<AttendanceRecord>>;
    // 单条插入（学生自助打卡），重复插入返回 UniqueViolation
    async fn insert_attendance(
        &self,
        session_id: i64,
        student_id: i64,
        status: AttendanceStatus,
    ) -> Result<AttendanceRecord>;
    async fn list_attendance_history_for_student(
        &self,
        student_id: i64,
        limit: u64,
    ) -> Result<Vec<AttendanceHistoryEntry>>;
    async fn count_attendance_for_student(&self, student_id: i64) -> Result<u64>;

    /// 作业与成绩方法
    async fn create_assignment(
        &self,
        course_id: i64,
        assignment: CreateAssignmentRequest,
    ) -> Result<Assignment>;
    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>>;
    async fn list_assignments_for_course(&self, course_id: i64) -> Result<Vec<Assignment>>;
    // 批量 upsert，冲突目标 (assignment_id, student_id)
    async fn upsert_grades(&self, assignment_id: i64, records: &[(i64, f64)]) -> Result<u64>;
    async fn list_grades_for_assignment(&self, assignment_id: i64) -> Result<Vec<Grade>>;
    async fn list_grade_history_for_student(
        &self,
        student_id: i64,
    ) -> Result<Vec<GradeHistoryEntry>>;
    async fn count_grades_for_student(&self, student_id: i64) -> Result<u64>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
