use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::{PaginationQuery, pagination::deserialize_optional_i64};

pub const MIN_COURSE_YEAR: i32 = 2000;
pub const MAX_COURSE_YEAR: i32 = 2100;

// 课程目录查询参数
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct CourseListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
    pub semester: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub year: Option<i64>,
}

// 课程列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct CourseListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub search: Option<String>,
    pub semester: Option<String>,
    pub year: Option<i32>,
}

impl From<CourseListParams> for CourseListQuery {
    fn from(params: CourseListParams) -> Self {
        Self {
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            search: params.search,
            semester: params.semester,
            year: params.year.and_then(|y| i32::try_from(y).ok()),
        }
    }
}

// 创建课程请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct CreateCourseRequest {
    pub code: String,
    pub title: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub semester: String,
    pub year: i32,
}

impl CreateCourseRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.code.trim().is_empty() {
            return Err("Course code must not be empty");
        }
        if self.title.trim().is_empty() {
            return Err("Course title must not be empty");
        }
        if self.semester.trim().is_empty() {
            return Err("Semester must not be empty");
        }
        validate_year(self.year)
    }
}

// 更新课程请求
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct UpdateCourseRequest {
    pub code: Option<String>,
    pub title: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub semester: Option<String>,
    pub year: Option<i32>,
}

impl UpdateCourseRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(code) = &self.code
            && code.trim().is_empty()
        {
            return Err("Course code must not be empty");
        }
        if let Some(title) = &self.title
            && title.trim().is_empty()
        {
            return Err("Course title must not be empty");
        }
        if let Some(semester) = &self.semester
            && semester.trim().is_empty()
        {
            return Err("Semester must not be empty");
        }
        match self.year {
            Some(year) => validate_year(year),
            None => Ok(()),
        }
    }
}

fn validate_year(year: i32) -> Result<(), &'static str> {
    if !(MIN_COURSE_YEAR..=MAX_COURSE_YEAR).contains(&year) {
        return Err("Year must be between 2000 and 2100");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(year: i32) -> CreateCourseRequest {
        CreateCourseRequest {
            code: "CS101".into(),
            title: "Intro to CS".into(),
            category: None,
            description: None,
            semester: "fall".into(),
            year,
        }
    }

    #[test]
    fn test_year_bounds() {
        assert!(request(2024).validate().is_ok());
        assert!(request(1999).validate().is_err());
        assert!(request(2101).validate().is_err());
    }

    #[test]
    fn test_update_rejects_blank_title() {
        let update = UpdateCourseRequest {
            title: Some("  ".into()),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_list_params_parse_year_from_query() {
        let params: CourseListParams =
            serde_json::from_str(r#"{"page":"1","size":"5","year":"2025"}"#).unwrap();
        let query = CourseListQuery::from(params);
        assert_eq!(query.year, Some(2025));
        assert_eq!(query.size, Some(5));
    }
}
