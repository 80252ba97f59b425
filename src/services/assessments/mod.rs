pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod submissions;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::middlewares::CourseAccess;
use crate::models::assessments::requests::{
    AssessmentListParams, CreateAssessmentRequest, GradeSubmissionRequest,
    SubmitAssessmentRequest, UpdateAssessmentRequest,
};
use crate::services::define_service;

define_service!(AssessmentService);

impl AssessmentService {
    // 学生只能看到已发布的考核项
    pub async fn list_assessments(
        &self,
        course_id: i64,
        access: &CourseAccess,
        query: AssessmentListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_assessments(self, course_id, access, query, request).await
    }

    pub async fn create_assessment(
        &self,
        course_id: i64,
        access: &CourseAccess,
        assessment_data: CreateAssessmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_assessment(self, course_id, access, assessment_data, request).await
    }

    pub async fn get_assessment(
        &self,
        course_id: i64,
        assessment_id: i64,
        access: &CourseAccess,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_assessment(self, course_id, assessment_id, access, request).await
    }

    pub async fn update_assessment(
        &self,
        course_id: i64,
        assessment_id: i64,
        update_data: UpdateAssessmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_assessment(self, course_id, assessment_id, update_data, request).await
    }

    pub async fn delete_assessment(
        &self,
        course_id: i64,
        assessment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_assessment(self, course_id, assessment_id, request).await
    }

    // 学生提交
    pub async fn submit(
        &self,
        course_id: i64,
        assessment_id: i64,
        access: &CourseAccess,
        submit_data: SubmitAssessmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        submissions::submit(self, course_id, assessment_id, access, submit_data, request).await
    }

    pub async fn list_submissions(
        &self,
        course_id: i64,
        assessment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        submissions::list_submissions(self, course_id, assessment_id, request).await
    }

    pub async fn my_submissions(
        &self,
        course_id: i64,
        assessment_id: i64,
        access: &CourseAccess,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        submissions::my_submissions(self, course_id, assessment_id, access, request).await
    }

    pub async fn grade_submission(
        &self,
        course_id: i64,
        assessment_id: i64,
        submission_id: i64,
        access: &CourseAccess,
        grade_data: GradeSubmissionRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        submissions::grade_submission(
            self,
            course_id,
            assessment_id,
            submission_id,
            access,
            grade_data,
            request,
        )
        .await
    }
}
