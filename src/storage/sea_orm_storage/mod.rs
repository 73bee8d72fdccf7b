//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。
//! 所有失败都在此层带操作标签记录一次，然后原样转发给调用方：
//! 本层不恢复、不重试、不吞错。

mod attendance;
mod class_sessions;
mod courses;
mod departments;
mod enrollments;
mod grades;
mod semesters;
mod users;

use crate::config::AppConfig;
use crate::errors::{CollegeSysError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实例
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

/// 统一记录存储层错误，错误原样转发
///
/// label 是操作标签（集合:动作），与日志关联排查授权策略类失败时全靠它。
pub(crate) fn log_db_err(label: &str, err: sea_orm::DbErr) -> CollegeSysError {
    tracing::error!(operation = label, error = %err, "数据库操作失败");
    CollegeSysError::database_operation(format!("{label}: {err}"))
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| CollegeSysError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| CollegeSysError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| CollegeSysError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| CollegeSysError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(CollegeSysError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
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
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse> {
        self.list_users_with_pagination_impl(query).await
    }

    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    async fn count_users_by_role(&self, role: UserRole) -> Result<u64> {
        self.count_users_by_role_impl(role).await
    }

    async fn list_students_by_ids(&self, ids: &[i64]) -> Result<Vec<User>> {
        self.list_students_by_ids_impl(ids).await
    }

    // 院系模块
    async fn create_department(&self, department: CreateDepartmentRequest) -> Result<Department> {
        self.create_department_impl(department).await
    }

    async fn get_department_by_id(&self, id: i64) -> Result<Option<Department>> {
        self.get_department_by_id_impl(id).await
    }

    async fn list_departments(&self) -> Result<Vec<Department>> {
        self.list_departments_impl().await
    }

    // 课程模块
    async fn create_course(&self, course: CreateCourseRequest) -> Result<Course> {
        self.create_course_impl(course).await
    }

    async fn get_course_by_id(&self, id: i64) -> Result<Option<Course>> {
        self.get_course_by_id_impl(id).await
    }

    async fn list_courses(&self, query: CourseListQuery) -> Result<Vec<Course>> {
        self.list_courses_impl(query).await
    }

    async fn list_recent_courses(&self, limit: u64) -> Result<Vec<Course>> {
        self.list_recent_courses_impl(limit).await
    }

    async fn count_courses(&self) -> Result<u64> {
        self.count_courses_impl().await
    }

    async fn list_course_ids_by_faculty(&self, faculty_id: i64) -> Result<Vec<i64>> {
        self.list_course_ids_by_faculty_impl(faculty_id).await
    }

    // 学期模块
    async fn create_semester(&self, semester: CreateSemesterRequest) -> Result<Semester> {
        self.create_semester_impl(semester).await
    }

    async fn get_semester_by_id(&self, id: i64) -> Result<Option<Semester>> {
        self.get_semester_by_id_impl(id).await
    }

    async fn list_semesters(&self) -> Result<Vec<Semester>> {
        self.list_semesters_impl().await
    }

    async fn find_active_semester(&self) -> Result<Option<Semester>> {
        self.find_active_semester_impl().await
    }

    async fn count_active_semesters(&self) -> Result<u64> {
        self.count_active_semesters_impl().await
    }

    // 选课模块
    async fn create_enrollment(
        &self,
        student_id: i64,
        course_id: i64,
        semester_id: i64,
    ) -> Result<Enrollment> {
        self.create_enrollment_impl(student_id, course_id, semester_id)
            .await
    }

    async fn delete_enrollment(&self, id: i64) -> Result<bool> {
        self.delete_enrollment_impl(id).await
    }

    async fn list_enrollments_with_details(&self) -> Result<Vec<EnrollmentDetail>> {
        self.list_enrollments_with_details_impl().await
    }

    async fn list_course_roster(&self, course_id: i64) -> Result<Vec<CourseRosterRow>> {
        self.list_course_roster_impl(course_id).await
    }

    async fn find_enrollment_semester(&self, course_id: i64) -> Result<Option<i64>> {
        self.find_enrollment_semester_impl(course_id).await
    }

    async fn get_enrollment(&self, student_id: i64, course_id: i64) -> Result<Option<Enrollment>> {
        self.get_enrollment_impl(student_id, course_id).await
    }

    async fn list_student_courses(&self, student_id: i64) -> Result<Vec<StudentCourse>> {
        self.list_student_courses_impl(student_id).await
    }

    async fn count_enrollments(&self) -> Result<u64> {
        self.count_enrollments_impl().await
    }

    async fn count_enrollments_for_courses(&self, course_ids: &[i64]) -> Result<u64> {
        self.count_enrollments_for_courses_impl(course_ids).await
    }

    async fn count_distinct_students_for_courses(&self, course_ids: &[i64]) -> Result<u64> {
        self.count_distinct_students_for_courses_impl(course_ids)
            .await
    }

    async fn count_enrollments_for_student(&self, student_id: i64) -> Result<u64> {
        self.count_enrollments_for_student_impl(student_id).await
    }

    // 课堂会话模块
    async fn find_session_by_course_and_date(
        &self,
        course_id: i64,
        session_date: NaiveDate,
    ) -> Result<Option<ClassSession>> {
        self.find_session_by_course_and_date_impl(course_id, session_date)
            .await
    }

    async fn insert_class_session(
        &self,
        course_id: i64,
        session_date: NaiveDate,
        semester_id: i64,
    ) -> Result<ClassSession> {
        self.insert_class_session_impl(course_id, session_date, semester_id)
            .await
    }

    async fn get_session_by_id(&self, id: i64) -> Result<Option<ClassSession>> {
        self.get_session_by_id_impl(id).await
    }

    // 考勤模块
    async fn list_attendance_for_session(
        &self,
        session_id: i64,
    ) -> Result<Vec<(i64, AttendanceStatus)>> {
        self.list_attendance_for_session_impl(session_id).await
    }

    async fn upsert_attendance(
        &self,
        session_id: i64,
        records: &[(i64, AttendanceStatus)],
    ) -> Result<u64> {
        self.upsert_attendance_impl(session_id, records).await
    }

    async fn find_attendance(
        &self,
        session_id: i64,
        student_id: i64,
    ) -> Result<Option<AttendanceRecord>> {
        self.find_attendance_impl(session_id, student_id).await
    }

    async fn insert_attendance(
        &self,
        session_id: i64,
        student_id: i64,
        status: AttendanceStatus,
    ) -> Result<AttendanceRecord> {
        self.insert_attendance_impl(session_id, student_id, status)
            .await
    }

    async fn list_attendance_history_for_student(
        &self,
        student_id: i64,
        limit: u64,
    ) -> Result<Vec<AttendanceHistoryEntry>> {
        self.list_attendance_history_for_student_impl(student_id, limit)
            .await
    }

    async fn count_attendance_for_student(&self, student_id: i64) -> Result<u64> {
        self.count_attendance_for_student_impl(student_id).await
    }

    // 作业与成绩模块
    async fn create_assignment(
        &self,
        course_id: i64,
        assignment: CreateAssignmentRequest,
    ) -> Result<Assignment> {
        self.create_assignment_impl(course_id, assignment).await
    }

    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>> {
        self.get_assignment_by_id_impl(id).await
    }

    async fn list_assignments_for_course(&self, course_id: i64) -> Result<Vec<Assignment>> {
        self.list_assignments_for_course_impl(course_id).await
    }

    async fn upsert_grades(&self, assignment_id: i64, records: &[(i64, f64)]) -> Result<u64> {
        self.upsert_grades_impl(assignment_id, records).await
    }

    async fn list_grades_for_assignment(&self, assignment_id: i64) -> Result<Vec<Grade>> {
        self.list_grades_for_assignment_impl(assignment_id).await
    }

    async fn list_grade_history_for_student(
        &self,
        student_id: i64,
    ) -> Result<Vec<GradeHistoryEntry>> {
        self.list_grade_history_for_student_impl(student_id).await
    }

    async fn count_grades_for_student(&self, student_id: i64) -> Result<u64> {
        self.count_grades_for_student_impl(student_id).await
    }
}
