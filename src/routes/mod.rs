pub mod attendance;

pub mod auth;

pub mod courses;

pub mod departments;

pub mod enrollments;

pub mod grades;

pub mod reports;

pub mod semesters;

pub mod users;

pub use attendance::configure_attendance_routes;
pub use auth::configure_auth_routes;
pub use courses::configure_courses_routes;
pub use departments::configure_departments_routes;
pub use enrollments::configure_enrollments_routes;
pub use grades::configure_grades_routes;
pub use reports::configure_reports_routes;
pub use semesters::configure_semesters_routes;
pub use users::configure_user_routes;
