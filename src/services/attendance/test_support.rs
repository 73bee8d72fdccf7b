//! 考勤服务测试用的内存存储替身
//!
//! 只实现考勤流程会触达的方法，其余方法调用即 panic，
//! 这样任何意料之外的存储访问都会在测试里立刻暴露。

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::NaiveDate;

use crate::errors::{CollegeSysError, Result};
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
        entities::{User, UserRole, UserStatus},
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};
use crate::storage::Storage;

pub fn make_user(id: i64, full_name: &str, email: &str, role: UserRole) -> User {
    User {
        id,
        full_name: full_name.to_string(),
        email: email.to_string(),
        password_hash: String::new(),
        role,
        status: UserStatus::Active,
        last_login: None,
        created_at: chrono::Utc::now(),
        updated_at: chrono::Utc::now(),
    }
}

pub fn make_course(id: i64, faculty_id: Option<i64>) -> Course {
    Course {
        id,
        code: format!("CS{id:03}"),
        name: format!("Course {id}"),
        description: None,
        credits: 3,
        department_id: 1,
        faculty_id,
        created_at: chrono::Utc::now(),
        updated_at: chrono::Utc::now(),
    }
}

pub fn make_semester(id: i64, name: &str, is_active: bool) -> Semester {
    Semester {
        id,
        name: name.to_string(),
        start_date: NaiveDate::from_ymd_opt(2024, 9, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
        is_active,
        created_at: chrono::Utc::now(),
    }
}

#[derive(Default)]
pub struct MockStorage {
    pub courses: Vec<Course>,
    pub sessions: Mutex<Vec<ClassSession>>,
    pub next_session_id: Mutex<i64>,
    // course_id -> 选课记录里的学期引用
    pub enrollment_semesters: HashMap<i64, i64>,
    pub enrollments: Vec<Enrollment>,
    pub active_semester: Option<Semester>,
    pub roster: Vec<CourseRosterRow>,
    pub students: Vec<User>,
    pub attendance: Mutex<Vec<AttendanceRecord>>,
    pub upserts: Mutex<Vec<(i64, Vec<(i64, AttendanceStatus)>)>>,
    pub history: Vec<AttendanceHistoryEntry>,

    // 注入的故障
    pub fail_find_session: Option<CollegeSysError>,
    pub fail_enrollment_semester: Option<CollegeSysError>,
    pub fail_active_semester: Option<CollegeSysError>,
    pub fail_roster: Option<CollegeSysError>,
    pub fail_insert_session: Option<CollegeSysError>,
    pub fail_insert_attendance: Option<CollegeSysError>,
    pub fail_attendance_list: Option<CollegeSysError>,
}

impl MockStorage {
    pub fn session_count(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }

    pub fn upsert_count(&self) -> usize {
        self.upserts.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl Storage for MockStorage {
    async fn create_user(&self, _user: CreateUserRequest) -> Result<User> {
        unimplemented!("not used by attendance tests")
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        Ok(self.students.iter().find(|u| u.id == id).cloned())
    }

    async fn get_user_by_email(&self, _email: &str) -> Result<Option<User>> {
        unimplemented!("not used by attendance tests")
    }

    async fn list_users_with_pagination(&self, _query: UserListQuery) -> Result<UserListResponse> {
        unimplemented!("not used by attendance tests")
    }

    async fn update_user(&self, _id: i64, _update: UpdateUserRequest) -> Result<Option<User>> {
        unimplemented!("not used by attendance tests")
    }

    async fn update_last_login(&self, _id: i64) -> Result<bool> {
        unimplemented!("not used by attendance tests")
    }

    async fn count_users(&self) -> Result<u64> {
        unimplemented!("not used by attendance tests")
    }

    async fn count_users_by_role(&self, _role: UserRole) -> Result<u64> {
        unimplemented!("not used by attendance tests")
    }

    async fn list_students_by_ids(&self, ids: &[i64]) -> Result<Vec<User>> {
        Ok(self
            .students
            .iter()
            .filter(|u| ids.contains(&u.id) && u.role == UserRole::Student)
            .cloned()
            .collect())
    }

    async fn create_department(&self, _department: CreateDepartmentRequest) -> Result<Department> {
        unimplemented!("not used by attendance tests")
    }

    async fn get_department_by_id(&self, _id: i64) -> Result<Option<Department>> {
        unimplemented!("not used by attendance tests")
    }

    async fn list_departments(&self) -> Result<Vec<Department>> {
        unimplemented!("not used by attendance tests")
    }

    async fn create_course(&self, _course: CreateCourseRequest) -> Result<Course> {
        unimplemented!("not used by attendance tests")
    }

    async fn get_course_by_id(&self, id: i64) -> Result<Option<Course>> {
        Ok(self.courses.iter().find(|c| c.id == id).cloned())
    }

    async fn list_courses(&self, _query: CourseListQuery) -> Result<Vec<Course>> {
        unimplemented!("not used by attendance tests")
    }

    async fn list_recent_courses(&self, _limit: u64) -> Result<Vec<Course>> {
        unimplemented!("not used by attendance tests")
    }

    async fn count_courses(&self) -> Result<u64> {
        unimplemented!("not used by attendance tests")
    }

    async fn list_course_ids_by_faculty(&self, _faculty_id: i64) -> Result<Vec<i64>> {
        unimplemented!("not used by attendance tests")
    }

    async fn create_semester(&self, _semester: CreateSemesterRequest) -> Result<Semester> {
        unimplemented!("not used by attendance tests")
    }

    async fn get_semester_by_id(&self, _id: i64) -> Result<Option<Semester>> {
        unimplemented!("not used by attendance tests")
    }

    async fn list_semesters(&self) -> Result<Vec<Semester>> {
        unimplemented!("not used by attendance tests")
    }

    async fn find_active_semester(&self) -> Result<Option<Semester>> {
        if let Some(err) = &self.fail_active_semester {
            return Err(err.clone());
        }
        Ok(self.active_semester.clone())
    }

    async fn count_active_semesters(&self) -> Result<u64> {
        unimplemented!("not used by attendance tests")
    }

    async fn create_enrollment(
        &self,
        _student_id: i64,
        _course_id: i64,
        _semester_id: i64,
    ) -> Result<Enrollment> {
        unimplemented!("not used by attendance tests")
    }

    async fn delete_enrollment(&self, _id: i64) -> Result<bool> {
        unimplemented!("not used by attendance tests")
    }

    async fn list_enrollments_with_details(&self) -> Result<Vec<EnrollmentDetail>> {
        unimplemented!("not used by attendance tests")
    }

    async fn list_course_roster(&self, _course_id: i64) -> Result<Vec<CourseRosterRow>> {
        if let Some(err) = &self.fail_roster {
            return Err(err.clone());
        }
        Ok(self.roster.clone())
    }

    async fn find_enrollment_semester(&self, course_id: i64) -> Result<Option<i64>> {
        if let Some(err) = &self.fail_enrollment_semester {
            return Err(err.clone());
        }
        Ok(self.enrollment_semesters.get(&course_id).copied())
    }

    async fn get_enrollment(&self, student_id: i64, course_id: i64) -> Result<Option<Enrollment>> {
        Ok(self
            .enrollments
            .iter()
            .find(|e| e.student_id == student_id && e.course_id == course_id)
            .cloned())
    }

    async fn list_student_courses(&self, _student_id: i64) -> Result<Vec<StudentCourse>> {
        unimplemented!("not used by attendance tests")
    }

    async fn count_enrollments(&self) -> Result<u64> {
        unimplemented!("not used by attendance tests")
    }

    async fn count_enrollments_for_courses(&self, _course_ids: &[i64]) -> Result<u64> {
        unimplemented!("not used by attendance tests")
    }

    async fn count_distinct_students_for_courses(&self, _course_ids: &[i64]) -> Result<u64> {
        unimplemented!("not used by attendance tests")
    }

    async fn count_enrollments_for_student(&self, _student_id: i64) -> Result<u64> {
        unimplemented!("not used by attendance tests")
    }

    async fn find_session_by_course_and_date(
        &self,
        course_id: i64,
        session_date: NaiveDate,
    ) -> Result<Option<ClassSession>> {
        if let Some(err) = &self.fail_find_session {
            return Err(err.clone());
        }
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.course_id == course_id && s.session_date == session_date)
            .cloned())
    }

    async fn insert_class_session(
        &self,
        course_id: i64,
        session_date: NaiveDate,
        semester_id: i64,
    ) -> Result<ClassSession> {
        if let Some(err) = &self.fail_insert_session {
            return Err(err.clone());
        }
        let mut next_id = self.next_session_id.lock().unwrap();
        *next_id += 1;
        let session = ClassSession {
            id: *next_id,
            course_id,
            session_date,
            semester_id,
            created_at: chrono::Utc::now(),
        };
        self.sessions.lock().unwrap().push(session.clone());
        Ok(session)
    }

    async fn get_session_by_id(&self, id: i64) -> Result<Option<ClassSession>> {
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .cloned())
    }

    async fn list_attendance_for_session(
        &self,
        session_id: i64,
    ) -> Result<Vec<(i64, AttendanceStatus)>> {
        if let Some(err) = &self.fail_attendance_list {
            return Err(err.clone());
        }
        Ok(self
            .attendance
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.session_id == session_id)
            .map(|r| (r.student_id, r.status))
            .collect())
    }

    async fn upsert_attendance(
        &self,
        session_id: i64,
        records: &[(i64, AttendanceStatus)],
    ) -> Result<u64> {
        self.upserts
            .lock()
            .unwrap()
            .push((session_id, records.to_vec()));
        Ok(records.len() as u64)
    }

    async fn find_attendance(
        &self,
        session_id: i64,
        student_id: i64,
    ) -> Result<Option<AttendanceRecord>> {
        Ok(self
            .attendance
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.session_id == session_id && r.student_id == student_id)
            .cloned())
    }

    async fn insert_attendance(
        &self,
        session_id: i64,
        student_id: i64,
        status: AttendanceStatus,
    ) -> Result<AttendanceRecord> {
        if let Some(err) = &self.fail_insert_attendance {
            return Err(err.clone());
        }
        let record = AttendanceRecord {
            id: (self.attendance.lock().unwrap().len() + 1) as i64,
            session_id,
            student_id,
            status,
            marked_at: chrono::Utc::now(),
        };
        self.attendance.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn list_attendance_history_for_student(
        &self,
        _student_id: i64,
        limit: u64,
    ) -> Result<Vec<AttendanceHistoryEntry>> {
        Ok(self.history.iter().take(limit as usize).cloned().collect())
    }

    async fn count_attendance_for_student(&self, _student_id: i64) -> Result<u64> {
        unimplemented!("not used by attendance tests")
    }

    async fn create_assignment(
        &self,
        _course_id: i64,
        _assignment: CreateAssignmentRequest,
    ) -> Result<Assignment> {
        unimplemented!("not used by attendance tests")
    }

    async fn get_assignment_by_id(&self, _id: i64) -> Result<Option<Assignment>> {
        unimplemented!("not used by attendance tests")
    }

    async fn list_assignments_for_course(&self, _course_id: i64) -> Result<Vec<Assignment>> {
        unimplemented!("not used by attendance tests")
    }

    async fn upsert_grades(&self, _assignment_id: i64, _records: &[(i64, f64)]) -> Result<u64> {
        unimplemented!("not used by attendance tests")
    }

    async fn list_grades_for_assignment(&self, _assignment_id: i64) -> Result<Vec<Grade>> {
        unimplemented!("not used by attendance tests")
    }

    async fn list_grade_history_for_student(
        &self,
        _student_id: i64,
    ) -> Result<Vec<GradeHistoryEntry>> {
        unimplemented!("not used by attendance tests")
    }

    async fn count_grades_for_student(&self, _student_id: i64) -> Result<u64> {
        unimplemented!("not used by attendance tests")
    }
}
