use std::collections::HashSet;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::GradeService;
use crate::middlewares::CourseAccess;
use crate::models::{
    ApiResponse, ErrorCode,
    course_members::entities::CourseRole,
    grades::{
        entities::{letter_grade, weighted_scores},
        requests::{GradeUpsert, OverrideGradeRequest},
        responses::GradeCalculationResponse,
    },
};
use crate::services::{bad_request, internal_error, load_course, not_found};

/// 为全部学生成员重新计算总评，手动覆盖的成绩保持不变
pub async fn calculate_grades(
    service: &GradeService,
    course_id: i64,
    access: &CourseAccess,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    if let Err(resp) = load_course(storage.as_ref(), course_id).await {
        return Ok(resp);
    }

    let student_ids = match storage
        .list_course_member_ids(course_id, CourseRole::Student)
        .await
    {
        Ok(ids) => ids,
        Err(e) => return Ok(internal_error("Grade calculation failed", e)),
    };
    let scores = match storage.list_graded_scores(course_id).await {
        Ok(scores) => scores,
        Err(e) => return Ok(internal_error("Grade calculation failed", e)),
    };
    let overridden: HashSet<i64> = match storage.list_course_grades(course_id).await {
        Ok(grades) => grades
            .into_iter()
            .filter(|g| g.is_override)
            .map(|g| g.user_id)
            .collect(),
        Err(e) => return Ok(internal_error("Grade calculation failed", e)),
    };

    let averages = weighted_scores(&scores);
    let mut grades = Vec::new();
    let mut skipped_overrides = 0;

    for user_id in student_ids {
        // 没有已评分提交的学生不生成记录
        let Some(&score) = averages.get(&user_id) else {
            continue;
        };
        if overridden.contains(&user_id) {
            skipped_overrides += 1;
            continue;
        }

        let upsert = GradeUpsert {
            course_id,
            user_id,
            score,
            letter_grade: letter_grade(score).to_string(),
            remarks: None,
            is_override: false,
            updated_by: Some(access.user_id()),
        };
        match storage.upsert_grade(upsert).await {
            Ok(grade) => grades.push(grade),
            Err(e) => return Ok(internal_error("Grade calculation failed", e)),
        }
    }

    info!(
        "Calculated {} grades for course {} ({} overrides kept)",
        grades.len(),
        course_id,
        skipped_overrides
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        GradeCalculationResponse {
            calculated: grades.len(),
            skipped_overrides,
            grades,
        },
        "Grades calculated successfully",
    )))
}

pub async fn override_grade(
    service: &GradeService,
    course_id: i64,
    user_id: i64,
    access: &CourseAccess,
    override_data: OverrideGradeRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if let Err(msg) = override_data.validate() {
        return Ok(bad_request(ErrorCode::GradeInvalid, msg));
    }

    match storage.get_course_member(course_id, user_id).await {
        Ok(Some(member)) if member.role == CourseRole::Student => {}
        Ok(_) => {
            return Ok(not_found(
                ErrorCode::MemberNotFound,
                "Student is not enrolled in this course",
            ));
        }
        Err(e) => return Ok(internal_error("Grade override failed", e)),
    }

    let upsert = GradeUpsert {
        course_id,
        user_id,
        score: override_data.score,
        letter_grade: letter_grade(override_data.score).to_string(),
        remarks: override_data.remarks,
        is_override: true,
        updated_by: Some(access.user_id()),
    };

    match storage.upsert_grade(upsert).await {
        Ok(grade) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            grade,
            "Grade updated successfully",
        ))),
        Err(e) => Ok(internal_error("Grade override failed", e)),
    }
}

pub async fn delete_grade(
    service: &GradeService,
    course_id: i64,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.delete_grade(course_id, user_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Grade deleted successfully",
        ))),
        Ok(false) => Ok(not_found(ErrorCode::GradeNotFound, "Grade not found")),
        Err(e) => Ok(internal_error("Grade deletion failed", e)),
    }
}
