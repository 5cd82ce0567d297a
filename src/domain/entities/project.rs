use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    entities::{
        option_fields::OptionField,
        validation::{
            parse_date, parse_required_date, present, violations, trim_all, trim_opt_nonempty,
            validate_date, validate_github_url, validate_http_url, validate_image_urls,
            validate_optional_date, validate_optional_github_url, validate_optional_http_url,
            validate_optional_max_chars, validate_technologies, non_blank,
        },
    },
    errors::{new_validation_error, AppError},
    listing::{coerce_bool, coerce_enum, RawQuery, RecordFilter, SortField},
};

wire_enum! {
    #[derive(sqlx::Type)]
    #[sqlx(type_name = "project_category", rename_all = "lowercase")]
    pub enum ProjectCategory {
        Web => "web",
        Mobile => "mobile",
        Desktop => "desktop",
        Other => "other",
    }
}

wire_enum! {
    #[derive(sqlx::Type, Default)]
    #[sqlx(type_name = "project_status", rename_all = "kebab-case")]
    pub enum ProjectStatus {
        #[default]
        Completed => "completed",
        InProgress => "in-progress",
        Planned => "planned",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub long_description: Option<String>,
    pub technologies: Vec<String>,
    pub images: Vec<String>,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    pub featured: bool,
    pub category: ProjectCategory,
    pub status: ProjectStatus,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A fully validated project, ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectInsert {
    pub title: String,
    pub description: String,
    pub long_description: Option<String>,
    pub technologies: Vec<String>,
    pub images: Vec<String>,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    pub featured: bool,
    pub category: ProjectCategory,
    pub status: ProjectStatus,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
}

impl ProjectInsert {
    /// Record-level rules every write must satisfy, whatever path produced it.
    pub fn check_invariants(&self) -> Result<(), AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::invalid_field("title", TITLE_REQUIRED));
        }
        if self.title.chars().count() > 100 {
            return Err(AppError::invalid_field("title", "Title cannot exceed 100 characters"));
        }
        if self.description.trim().is_empty() {
            return Err(AppError::invalid_field("description", DESCRIPTION_REQUIRED));
        }
        if self.description.chars().count() > 500 {
            return Err(AppError::invalid_field("description", "Description cannot exceed 500 characters"));
        }
        if self.technologies.is_empty() {
            return Err(AppError::invalid_field("technologies", "At least one technology is required"));
        }
        if self.long_description.as_ref().is_some_and(|d| d.chars().count() > 2000) {
            return Err(AppError::invalid_field("longDescription", "Long description cannot exceed 2000 characters"));
        }
        if let Some(url) = &self.github_url {
            validate_github_url(url)
                .map_err(|_| AppError::invalid_field("githubUrl", "Please enter a valid GitHub URL"))?;
        }
        if let Some(url) = &self.live_url {
            validate_http_url(url).map_err(|_| AppError::invalid_field("liveUrl", "Please enter a valid URL"))?;
        }
        if dates_out_of_order(self.start_date, self.end_date) {
            return Err(AppError::invalid_field("endDate", END_DATE_MESSAGE));
        }
        Ok(())
    }

    pub fn into_project(self, id: Uuid, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Project {
        Project {
            id,
            title: self.title,
            description: self.description,
            long_description: self.long_description,
            technologies: self.technologies,
            images: self.images,
            github_url: self.github_url,
            live_url: self.live_url,
            featured: self.featured,
            category: self.category,
            status: self.status,
            start_date: self.start_date,
            end_date: self.end_date,
            created_at,
            updated_at,
        }
    }
}

impl From<&Project> for ProjectInsert {
    fn from(project: &Project) -> Self {
        ProjectInsert {
            title: project.title.clone(),
            description: project.description.clone(),
            long_description: project.long_description.clone(),
            technologies: project.technologies.clone(),
            images: project.images.clone(),
            github_url: project.github_url.clone(),
            live_url: project.live_url.clone(),
            featured: project.featured,
            category: project.category,
            status: project.status,
            start_date: project.start_date,
            end_date: project.end_date,
        }
    }
}

const END_DATE_MESSAGE: &str = "End date must be after start date";
const TITLE_REQUIRED: &str = "Project title is required";
const DESCRIPTION_REQUIRED: &str = "Project description is required";

fn validate_title(raw: &str) -> Result<(), ValidationError> {
    non_blank(raw, TITLE_REQUIRED)
}

fn validate_description(raw: &str) -> Result<(), ValidationError> {
    non_blank(raw, DESCRIPTION_REQUIRED)
}

fn dates_out_of_order(start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> bool {
    end.is_some_and(|end| end < start)
}

fn date_order_error() -> ValidationError {
    new_validation_error("date_order", END_DATE_MESSAGE)
}

fn validate_project_category(raw: &str) -> Result<(), ValidationError> {
    raw.parse::<ProjectCategory>().map(|_| ()).map_err(|_| {
        new_validation_error("invalid_category", "Category must be one of web, mobile, desktop, other")
    })
}

fn validate_project_status(raw: &str) -> Result<(), ValidationError> {
    raw.parse::<ProjectStatus>().map(|_| ()).map_err(|_| {
        new_validation_error("invalid_status", "Status must be one of completed, in-progress, planned")
    })
}

fn validate_long_description(value: &OptionField<String>) -> Result<(), ValidationError> {
    validate_optional_max_chars(value, 2000, "Long description cannot exceed 2000 characters")
}

fn parse_category(raw: &str) -> Result<ProjectCategory, AppError> {
    raw.parse().map_err(|_| AppError::invalid_field("category", "Invalid project category"))
}

fn parse_status(raw: &str) -> Result<ProjectStatus, AppError> {
    raw.parse().map_err(|_| AppError::invalid_field("status", "Invalid project status"))
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    #[validate(
        required(message = "Project title is required"),
        length(max = 100, message = "Title cannot exceed 100 characters"),
        custom(function = "validate_title")
    )]
    pub title: Option<String>,

    #[validate(
        required(message = "Project description is required"),
        length(max = 500, message = "Description cannot exceed 500 characters"),
        custom(function = "validate_description")
    )]
    pub description: Option<String>,

    #[validate(length(max = 2000, message = "Long description cannot exceed 2000 characters"))]
    pub long_description: Option<String>,

    #[validate(
        required(message = "At least one technology is required"),
        length(min = 1, message = "At least one technology is required"),
        custom(function = "validate_technologies")
    )]
    pub technologies: Option<Vec<String>>,

    #[validate(custom(function = "validate_image_urls"))]
    pub images: Option<Vec<String>>,

    #[validate(custom(function = "validate_github_url"))]
    pub github_url: Option<String>,

    #[validate(custom(function = "validate_http_url"))]
    pub live_url: Option<String>,

    pub featured: Option<bool>,

    #[validate(
        required(message = "Project category is required"),
        custom(function = "validate_project_category")
    )]
    pub category: Option<String>,

    #[validate(custom(function = "validate_project_status"))]
    pub status: Option<String>,

    #[validate(
        required(message = "Start date is required"),
        custom(function = "validate_date")
    )]
    pub start_date: Option<String>,

    #[validate(custom(function = "validate_date"))]
    pub end_date: Option<String>,
}

impl NewProject {
    fn normalized(self) -> Self {
        NewProject {
            title: trim_opt_nonempty(self.title),
            description: trim_opt_nonempty(self.description),
            long_description: trim_opt_nonempty(self.long_description),
            technologies: trim_all(self.technologies),
            images: trim_all(self.images),
            github_url: trim_opt_nonempty(self.github_url),
            live_url: trim_opt_nonempty(self.live_url),
            featured: self.featured,
            category: trim_opt_nonempty(self.category),
            status: trim_opt_nonempty(self.status),
            start_date: trim_opt_nonempty(self.start_date),
            end_date: trim_opt_nonempty(self.end_date),
        }
    }

    /// Trims, validates every field and the date ordering, then builds the insert.
    pub fn into_insert(self) -> Result<ProjectInsert, AppError> {
        let payload = self.normalized();
        let mut errors = violations(&payload);

        let start = payload.start_date.as_deref().and_then(parse_date);
        let end = payload.end_date.as_deref().and_then(parse_date);
        if let Some(start) = start {
            if dates_out_of_order(start, end) {
                errors.add("endDate", date_order_error());
            }
        }

        if !errors.is_empty() {
            return Err(errors.into());
        }

        let end_date = match payload.end_date.as_deref() {
            Some(raw) => Some(parse_required_date(raw, "endDate")?),
            None => None,
        };

        Ok(ProjectInsert {
            title: present(payload.title, "title")?,
            description: present(payload.description, "description")?,
            long_description: payload.long_description,
            technologies: present(payload.technologies, "technologies")?,
            images: payload.images.unwrap_or_default(),
            github_url: payload.github_url,
            live_url: payload.live_url,
            featured: payload.featured.unwrap_or(false),
            category: parse_category(&present(payload.category, "category")?)?,
            status: match payload.status.as_deref() {
                Some(raw) => parse_status(raw)?,
                None => ProjectStatus::default(),
            },
            start_date: parse_required_date(&present(payload.start_date, "startDate")?, "startDate")?,
            end_date,
        })
    }
}

/// Partial update. Absent keys keep the stored value; `null` clears the
/// optional fields.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProject {
    #[validate(
        length(max = 100, message = "Title cannot exceed 100 characters"),
        custom(function = "validate_title")
    )]
    pub title: Option<String>,

    #[validate(
        length(max = 500, message = "Description cannot exceed 500 characters"),
        custom(function = "validate_description")
    )]
    pub description: Option<String>,

    #[serde(default)]
    #[validate(custom(function = "validate_long_description"))]
    pub long_description: OptionField<String>,

    #[validate(
        length(min = 1, message = "At least one technology is required"),
        custom(function = "validate_technologies")
    )]
    pub technologies: Option<Vec<String>>,

    #[validate(custom(function = "validate_image_urls"))]
    pub images: Option<Vec<String>>,

    #[serde(default)]
    #[validate(custom(function = "validate_optional_github_url"))]
    pub github_url: OptionField<String>,

    #[serde(default)]
    #[validate(custom(function = "validate_optional_http_url"))]
    pub live_url: OptionField<String>,

    pub featured: Option<bool>,

    #[validate(custom(function = "validate_project_category"))]
    pub category: Option<String>,

    #[validate(custom(function = "validate_project_status"))]
    pub status: Option<String>,

    #[validate(custom(function = "validate_date"))]
    pub start_date: Option<String>,

    #[serde(default)]
    #[validate(custom(function = "validate_optional_date"))]
    pub end_date: OptionField<String>,
}

impl UpdateProject {
    fn normalized(self) -> Self {
        UpdateProject {
            title: self.title.map(|s| s.trim().to_string()),
            description: self.description.map(|s| s.trim().to_string()),
            long_description: self.long_description.trimmed(),
            technologies: trim_all(self.technologies),
            images: trim_all(self.images),
            github_url: self.github_url.trimmed(),
            live_url: self.live_url.trimmed(),
            featured: self.featured,
            category: self.category.map(|s| s.trim().to_string()),
            status: self.status.map(|s| s.trim().to_string()),
            start_date: self.start_date.map(|s| s.trim().to_string()),
            end_date: self.end_date.trimmed(),
        }
    }

    /// Validates the supplied fields and applies them over `current`.
    ///
    /// The date ordering is checked against the merged record, so moving only
    /// one of the two dates is still caught.
    pub fn merge(self, current: &Project) -> Result<ProjectInsert, AppError> {
        let patch = self.normalized();
        let mut errors = violations(&patch);

        let start = match patch.start_date.as_deref() {
            Some(raw) => parse_date(raw),
            None => Some(current.start_date),
        };
        let end = match &patch.end_date {
            OptionField::Unchanged => current.end_date,
            OptionField::SetToNull => None,
            OptionField::SetToValue(raw) => parse_date(raw),
        };
        if let Some(start) = start {
            if dates_out_of_order(start, end) {
                errors.add("endDate", date_order_error());
            }
        }

        if !errors.is_empty() {
            return Err(errors.into());
        }

        let mut merged = ProjectInsert::from(current);

        if let Some(title) = patch.title {
            merged.title = title;
        }
        if let Some(description) = patch.description {
            merged.description = description;
        }
        merged.long_description = patch.long_description.apply(merged.long_description);
        if let Some(technologies) = patch.technologies {
            merged.technologies = technologies;
        }
        if let Some(images) = patch.images {
            merged.images = images;
        }
        merged.github_url = patch.github_url.apply(merged.github_url);
        merged.live_url = patch.live_url.apply(merged.live_url);
        if let Some(featured) = patch.featured {
            merged.featured = featured;
        }
        if let Some(raw) = patch.category.as_deref() {
            merged.category = parse_category(raw)?;
        }
        if let Some(raw) = patch.status.as_deref() {
            merged.status = parse_status(raw)?;
        }
        if let Some(raw) = patch.start_date.as_deref() {
            merged.start_date = parse_required_date(raw, "startDate")?;
        }
        merged.end_date = match patch.end_date {
            OptionField::Unchanged => merged.end_date,
            OptionField::SetToNull => None,
            OptionField::SetToValue(raw) => Some(parse_required_date(&raw, "endDate")?),
        };

        Ok(merged)
    }
}

/// Recognised list filters. `None` imposes no constraint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectFilter {
    pub category: Option<ProjectCategory>,
    pub featured: Option<bool>,
    pub status: Option<ProjectStatus>,
}

impl ProjectFilter {
    pub fn from_params(raw: &RawQuery) -> Self {
        ProjectFilter {
            category: coerce_enum(raw.get("category")),
            featured: coerce_bool(raw.get("featured")),
            status: coerce_enum(raw.get("status")),
        }
    }

    pub fn featured() -> Self {
        ProjectFilter { featured: Some(true), ..Default::default() }
    }
}

impl RecordFilter<Project> for ProjectFilter {
    fn matches(&self, project: &Project) -> bool {
        self.category.is_none_or(|c| project.category == c)
            && self.featured.is_none_or(|f| project.featured == f)
            && self.status.is_none_or(|s| project.status == s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectSort {
    CreatedAt,
    UpdatedAt,
    Title,
    StartDate,
    EndDate,
    Category,
    Status,
    Featured,
}

impl SortField for ProjectSort {
    type Record = Project;

    fn parse(name: &str) -> Option<Self> {
        match name {
            "createdAt" => Some(ProjectSort::CreatedAt),
            "updatedAt" => Some(ProjectSort::UpdatedAt),
            "title" => Some(ProjectSort::Title),
            "startDate" => Some(ProjectSort::StartDate),
            "endDate" => Some(ProjectSort::EndDate),
            "category" => Some(ProjectSort::Category),
            "status" => Some(ProjectSort::Status),
            "featured" => Some(ProjectSort::Featured),
            _ => None,
        }
    }

    fn column(&self) -> &'static str {
        match self {
            ProjectSort::CreatedAt => "created_at",
            ProjectSort::UpdatedAt => "updated_at",
            ProjectSort::Title => "title COLLATE \"C\"",
            ProjectSort::StartDate => "start_date",
            ProjectSort::EndDate => "end_date",
            ProjectSort::Category => "category::text COLLATE \"C\"",
            ProjectSort::Status => "status::text COLLATE \"C\"",
            ProjectSort::Featured => "featured",
        }
    }

    fn compare(&self, a: &Project, b: &Project) -> Ordering {
        match self {
            ProjectSort::CreatedAt => a.created_at.cmp(&b.created_at),
            ProjectSort::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            ProjectSort::Title => a.title.cmp(&b.title),
            ProjectSort::StartDate => a.start_date.cmp(&b.start_date),
            ProjectSort::EndDate => a.end_date.cmp(&b.end_date),
            ProjectSort::Category => a.category.as_str().cmp(b.category.as_str()),
            ProjectSort::Status => a.status.as_str().cmp(b.status.as_str()),
            ProjectSort::Featured => a.featured.cmp(&b.featured),
        }
    }
}
