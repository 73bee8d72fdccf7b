pub mod attendance;
pub mod auth;
pub mod courses;
pub mod departments;
pub mod enrollments;
pub mod grades;
pub mod reports;
pub mod semesters;
pub mod users;

pub use attendance::AttendanceService;
pub use auth::AuthService;
pub use courses::CourseService;
pub use departments::DepartmentService;
pub use enrollments::EnrollmentService;
pub use grades::GradeService;
pub use reports::ReportService;
pub use semesters::SemesterService;
pub use users::UserService;
