//! 成绩录入表与批量保存

use std::collections::HashMap;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info, warn};

use super::{GradeService, check_course_ownership};
use crate::models::grades::requests::SaveGradesRequest;
use crate::models::grades::responses::{GradeSheetEntry, GradeSheetResponse, SaveGradesResponse};
use crate::models::{ApiResponse, ErrorCode};

/// 成绩录入表：课程选课学生与该作业已有成绩的合并视图。
/// 与考勤名册不同，档案始终无法解析的学生不出现在录入表里。
pub async fn grade_sheet(
    service: &GradeService,
    request: &HttpRequest,
    assignment_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let assignment = match storage.get_assignment_by_id(assignment_id).await {
        Ok(Some(assignment)) => assignment,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::AssignmentNotFound,
                "Assignment not found",
            )));
        }
        Err(e) => {
            error!("Failed to fetch assignment: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to fetch assignment",
                )),
            );
        }
    };

    if let Err(resp) = check_course_ownership(&storage, request, assignment.course_id).await {
        return Ok(resp);
    }

    // 1. 选课名单
    let mut rows = match storage.list_course_roster(assignment.course_id).await {
        Ok(rows) => rows,
        Err(e) => {
            error!("Failed to load roster for grades: {}", e);
            return Ok(
                HttpResponse::UnprocessableEntity().json(ApiResponse::error_empty(
                    ErrorCode::RosterUnavailable,
                    format!("Failed to load students: {e}"),
                )),
            );
        }
    };

    // 2. 缺名回填（单次批量档案查询）
    let missing: Vec<i64> = rows
        .iter()
        .filter(|r| r.full_name.as_deref().is_none_or(|n| n.trim().is_empty()))
        .map(|r| r.student_id)
        .collect();
    if !missing.is_empty() {
        match storage.list_students_by_ids(&missing).await {
            Ok(profiles) => {
                let by_id: HashMap<i64, _> =
                    profiles.into_iter().map(|p| (p.id, p)).collect();
                for row in rows.iter_mut() {
                    if let Some(profile) = by_id.get(&row.student_id) {
                        row.full_name = Some(profile.full_name.clone());
                        row.email = Some(profile.email.clone());
                    }
                }
            }
            Err(e) => warn!("Grade sheet profile backfill failed: {}", e),
        }
    }

    // 3. 已有成绩
    let grades: HashMap<i64, f64> = match storage.list_grades_for_assignment(assignment_id).await {
        Ok(grades) => grades
            .into_iter()
            .map(|g| (g.student_id, g.marks_obtained))
            .collect(),
        Err(e) => {
            error!("Failed to load existing grades: {}", e);
            HashMap::new()
        }
    };

    // 4. 去重、丢弃无名学生、按姓名排序
    let mut seen = HashMap::new();
    let mut entries: Vec<GradeSheetEntry> = rows
        .into_iter()
        .filter(|r| seen.insert(r.student_id, ()).is_none())
        .filter_map(|r| {
            let full_name = r.full_name.filter(|n| !n.trim().is_empty())?;
            Some(GradeSheetEntry {
                student_id: r.student_id,
                full_name,
                email: r.email.unwrap_or_default(),
                marks_obtained: grades.get(&r.student_id).copied(),
            })
        })
        .collect();
    entries.sort_by_key(|e| e.full_name.to_lowercase());

    let total = entries.len() as i64;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        GradeSheetResponse {
            assignment_id,
            entries,
            total,
        },
        "Grade sheet loaded successfully",
    )))
}

/// 批量保存成绩：一次 upsert，冲突目标 (assignment_id, student_id)
pub async fn save_grades(
    service: &GradeService,
    request: &HttpRequest,
    assignment_id: i64,
    payload: SaveGradesRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let assignment = match storage.get_assignment_by_id(assignment_id).await {
        Ok(Some(assignment)) => assignment,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::AssignmentNotFound,
                "Assignment not found",
            )));
        }
        Err(e) => {
            error!("Failed to fetch assignment: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to fetch assignment",
                )),
            );
        }
    };

    if let Err(resp) = check_course_ownership(&storage, request, assignment.course_id).await {
        return Ok(resp);
    }

    if payload.records.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::NoRecordsToSave,
            "Please enter at least one grade",
        )));
    }

    for (student_id, marks) in &payload.records {
        if *marks < 0.0 || *marks > assignment.max_marks {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::BadRequest,
                format!(
                    "Marks for student {student_id} must be between 0 and {}",
                    assignment.max_marks
                ),
            )));
        }
    }

    let mut records: Vec<(i64, f64)> = payload
        .records
        .iter()
        .map(|(student_id, marks)| (*student_id, *marks))
        .collect();
    records.sort_by_key(|(student_id, _)| *student_id);

    match storage.upsert_grades(assignment_id, &records).await {
        Ok(saved) => {
            info!(assignment_id, saved, "成绩批量保存完成");
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                SaveGradesResponse {
                    saved: saved as i64,
                },
                "Grades saved successfully",
            )))
        }
        Err(e) => {
            error!("Failed to save grades: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::DatabaseError,
                    format!("Failed to save grades: {e}"),
                )),
            )
        }
    }
}
