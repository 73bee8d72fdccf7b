//! 报表数据集
//!
//! 只产出原始行，CSV/PDF 渲染由前端负责。

use std::collections::HashMap;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::ReportService;
use crate::models::courses::requests::CourseListQuery;
use crate::models::reports::responses::{
    CourseReportRow, EnrollmentReportRow, ReportDatasetResponse, StudentReportRow,
};
use crate::models::users::entities::UserRole;
use crate::models::users::requests::UserListQuery;
use crate::models::{ApiResponse, ErrorCode};

pub async fn dataset(
    service: &ReportService,
    request: &HttpRequest,
    report_id: String,
) -> ActixResult<HttpResponse> {
    match report_id.as_str() {
        "students" => students_report(service, request).await,
        "courses" => courses_report(service, request).await,
        "enrollments" => enrollments_report(service, request).await,
        other => Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            format!("Unknown report '{other}'. Supported: students, courses, enrollments"),
        ))),
    }
}

async fn students_report(
    service: &ReportService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let query = UserListQuery {
        page: Some(1),
        size: Some(1000),
        role: Some(UserRole::Student),
        search: None,
    };

    match storage.list_users_with_pagination(query).await {
        Ok(students) => {
            let rows: Vec<StudentReportRow> = students
                .items
                .into_iter()
                .map(|s| StudentReportRow {
                    name: s.full_name,
                    email: s.email,
                })
                .collect();
            let total = rows.len() as i64;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                ReportDatasetResponse { rows, total },
                "Student report generated successfully",
            )))
        }
        Err(e) => {
            error!("Student report failed: {}", e);
            Ok(report_error(e))
        }
    }
}

async fn courses_report(
    service: &ReportService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let courses = match storage.list_courses(CourseListQuery::default()).await {
        Ok(courses) => courses,
        Err(e) => {
            error!("Course report failed: {}", e);
            return Ok(report_error(e));
        }
    };

    let departments: HashMap<i64, String> = match storage.list_departments().await {
        Ok(departments) => departments
            .into_iter()
            .map(|d| (d.id, format!("{} - {}", d.code, d.name)))
            .collect(),
        Err(e) => {
            // 缺院系信息不影响报表主体
            error!("Department lookup for course report failed: {}", e);
            HashMap::new()
        }
    };

    let rows: Vec<CourseReportRow> = courses
        .into_iter()
        .map(|c| CourseReportRow {
            code: c.code,
            name: c.name,
            credits: c.credits,
            department: departments.get(&c.department_id).cloned().unwrap_or_default(),
            description: c.description.unwrap_or_default(),
        })
        .collect();
    let total = rows.len() as i64;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        ReportDatasetResponse { rows, total },
        "Course report generated successfully",
    )))
}

async fn enrollments_report(
    service: &ReportService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_enrollments_with_details().await {
        Ok(details) => {
            let rows: Vec<EnrollmentReportRow> = details
                .into_iter()
                .map(|d| EnrollmentReportRow {
                    student: if d.student_name.is_empty() {
                        d.student_email
                    } else {
                        d.student_name
                    },
                    course: format!("{} - {}", d.course_code, d.course_name),
                    semester: d.semester_name,
                })
                .collect();
            let total = rows.len() as i64;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                ReportDatasetResponse { rows, total },
                "Enrollment report generated successfully",
            )))
        }
        Err(e) => {
            error!("Enrollment report failed: {}", e);
            Ok(report_error(e))
        }
    }
}

fn report_error(e: crate::errors::CollegeSysError) -> HttpResponse {
    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
        ErrorCode::DatabaseError,
        format!("Failed to generate report: {e}"),
    ))
}
