//! 角色看板统计
//!
//! 同一页面需要的多个只读计数并发执行，全部完成后汇总；
//! 它们作用于不相交的集合，顺序无关。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, warn};

use super::ReportService;
use crate::middlewares::RequireJWT;
use crate::models::reports::responses::{
    AdminDashboardStats, DashboardStats, FacultyDashboardStats, StudentDashboardStats,
};
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};

const RECENT_COURSES_LIMIT: u64 = 5;

pub async fn dashboard(
    service: &ReportService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let user = match RequireJWT::extract_user_claims(request) {
        Some(user) => user,
        None => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "Unauthorized: missing user identity",
            )));
        }
    };

    let stats = match user.role {
        UserRole::Admin => {
            let (students, courses, active_semesters, enrollments, recent) = tokio::join!(
                storage.count_users_by_role(UserRole::Student),
                storage.count_courses(),
                storage.count_active_semesters(),
                storage.count_enrollments(),
                storage.list_recent_courses(RECENT_COURSES_LIMIT),
            );

            DashboardStats::Admin(AdminDashboardStats {
                students: unwrap_count("profiles:countStudents", students),
                courses: unwrap_count("courses:count", courses),
                active_semesters: unwrap_count("semesters:countActive", active_semesters),
                enrollments: unwrap_count("enrollments:count", enrollments),
                recent_courses: recent.unwrap_or_else(|e| {
                    warn!("Recent courses query failed: {}", e);
                    vec![]
                }),
            })
        }
        UserRole::Faculty => {
            let course_ids = match storage.list_course_ids_by_faculty(user.id).await {
                Ok(ids) => ids,
                Err(e) => {
                    error!("Failed to list faculty courses: {}", e);
                    vec![]
                }
            };

            let (students, enrollments) = tokio::join!(
                storage.count_distinct_students_for_courses(&course_ids),
                storage.count_enrollments_for_courses(&course_ids),
            );

            DashboardStats::Faculty(FacultyDashboardStats {
                courses: course_ids.len() as i64,
                students: unwrap_count("enrollments:countDistinctStudents", students),
                enrollments: unwrap_count("enrollments:countForFacultyCourses", enrollments),
            })
        }
        UserRole::Student => {
            let (enrollments, grades, attendance) = tokio::join!(
                storage.count_enrollments_for_student(user.id),
                storage.count_grades_for_student(user.id),
                storage.count_attendance_for_student(user.id),
            );

            DashboardStats::Student(StudentDashboardStats {
                enrollments: unwrap_count("enrollments:countForStudent", enrollments),
                grades: unwrap_count("grades:countForStudent", grades),
                attendance: unwrap_count("attendance:countForStudent", attendance),
            })
        }
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        stats,
        "Dashboard statistics retrieved successfully",
    )))
}

/// 单个计数失败按 0 处理，保证看板整体可用
fn unwrap_count(label: &str, result: crate::errors::Result<u64>) -> i64 {
    match result {
        Ok(count) => count as i64,
        Err(e) => {
            warn!(operation = label, error = %e, "看板计数失败，按 0 处理");
            0
        }
    }
}
