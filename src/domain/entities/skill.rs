use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    entities::{
        option_fields::OptionField,
        validation::{
            non_blank, present, trim_opt_nonempty, validate_hex_color, validate_optional_hex_color,
            violations,
        },
    },
    errors::{new_validation_error, AppError},
    listing::{coerce_bool, coerce_enum, RawQuery, RecordFilter, SortField},
};

wire_enum! {
    #[derive(sqlx::Type)]
    #[sqlx(type_name = "skill_category", rename_all = "lowercase")]
    pub enum SkillCategory {
        Frontend => "frontend",
        Backend => "backend",
        Database => "database",
        Tools => "tools",
        Other => "other",
    }
}

const CATEGORY_MESSAGE: &str = "Category must be one of frontend, backend, database, tools, other";

impl SkillCategory {
    /// Strict parse used for path segments, where an unknown value is an error.
    pub fn parse_param(raw: &str) -> Result<Self, AppError> {
        raw.trim()
            .parse()
            .map_err(|_| AppError::invalid_field("category", CATEGORY_MESSAGE))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub category: SkillCategory,
    pub proficiency: i32,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkillInsert {
    pub name: String,
    pub category: SkillCategory,
    pub proficiency: i32,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub featured: bool,
}

impl SkillInsert {
    pub fn check_invariants(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::invalid_field("name", NAME_REQUIRED));
        }
        if self.name.chars().count() > 50 {
            return Err(AppError::invalid_field("name", "Skill name cannot exceed 50 characters"));
        }
        if !(1..=100).contains(&self.proficiency) {
            return Err(AppError::invalid_field("proficiency", PROFICIENCY_MESSAGE));
        }
        if let Some(color) = &self.color {
            validate_hex_color(color)
                .map_err(|_| AppError::invalid_field("color", "Please enter a valid hex color code"))?;
        }
        Ok(())
    }

    pub fn into_skill(self, id: Uuid, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Skill {
        Skill {
            id,
            name: self.name,
            category: self.category,
            proficiency: self.proficiency,
            icon: self.icon,
            color: self.color,
            featured: self.featured,
            created_at,
            updated_at,
        }
    }
}

impl From<&Skill> for SkillInsert {
    fn from(skill: &Skill) -> Self {
        SkillInsert {
            name: skill.name.clone(),
            category: skill.category,
            proficiency: skill.proficiency,
            icon: skill.icon.clone(),
            color: skill.color.clone(),
            featured: skill.featured,
        }
    }
}

const PROFICIENCY_MESSAGE: &str = "Proficiency must be between 1 and 100";
const NAME_REQUIRED: &str = "Skill name is required";

fn validate_skill_name(raw: &str) -> Result<(), ValidationError> {
    non_blank(raw, NAME_REQUIRED)
}

fn validate_skill_category(raw: &str) -> Result<(), ValidationError> {
    raw.parse::<SkillCategory>()
        .map(|_| ())
        .map_err(|_| new_validation_error("invalid_category", CATEGORY_MESSAGE))
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewSkill {
    #[validate(
        required(message = "Skill name is required"),
        length(max = 50, message = "Skill name cannot exceed 50 characters")
    )]
    pub name: Option<String>,

    #[validate(
        required(message = "Skill category is required"),
        custom(function = "validate_skill_category")
    )]
    pub category: Option<String>,

    #[validate(
        required(message = "Proficiency level is required"),
        range(min = 1, max = 100, message = "Proficiency must be between 1 and 100")
    )]
    pub proficiency: Option<i32>,

    pub icon: Option<String>,

    #[validate(custom(function = "validate_hex_color"))]
    pub color: Option<String>,

    pub featured: Option<bool>,
}

impl NewSkill {
    pub fn into_insert(self) -> Result<SkillInsert, AppError> {
        let payload = NewSkill {
            name: trim_opt_nonempty(self.name),
            category: trim_opt_nonempty(self.category),
            icon: trim_opt_nonempty(self.icon),
            color: trim_opt_nonempty(self.color),
            ..self
        };

        let errors = violations(&payload);
        if !errors.is_empty() {
            return Err(errors.into());
        }

        Ok(SkillInsert {
            name: present(payload.name, "name")?,
            category: SkillCategory::parse_param(&present(payload.category, "category")?)?,
            proficiency: present(payload.proficiency, "proficiency")?,
            icon: payload.icon,
            color: payload.color,
            featured: payload.featured.unwrap_or(false),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSkill {
    #[validate(
        length(max = 50, message = "Skill name cannot exceed 50 characters"),
        custom(function = "validate_skill_name")
    )]
    pub name: Option<String>,

    #[validate(custom(function = "validate_skill_category"))]
    pub category: Option<String>,

    #[validate(range(min = 1, max = 100, message = "Proficiency must be between 1 and 100"))]
    pub proficiency: Option<i32>,

    #[serde(default)]
    pub icon: OptionField<String>,

    #[serde(default)]
    #[validate(custom(function = "validate_optional_hex_color"))]
    pub color: OptionField<String>,

    pub featured: Option<bool>,
}

impl UpdateSkill {
    pub fn merge(self, current: &Skill) -> Result<SkillInsert, AppError> {
        let patch = UpdateSkill {
            name: self.name.map(|s| s.trim().to_string()),
            category: self.category.map(|s| s.trim().to_string()),
            icon: self.icon.trimmed(),
            color: self.color.trimmed(),
            ..self
        };

        let errors = violations(&patch);
        if !errors.is_empty() {
            return Err(errors.into());
        }

        let mut merged = SkillInsert::from(current);
        if let Some(name) = patch.name {
            merged.name = name;
        }
        if let Some(raw) = patch.category.as_deref() {
            merged.category = SkillCategory::parse_param(raw)?;
        }
        if let Some(proficiency) = patch.proficiency {
            merged.proficiency = proficiency;
        }
        merged.icon = patch.icon.apply(merged.icon);
        merged.color = patch.color.apply(merged.color);
        if let Some(featured) = patch.featured {
            merged.featured = featured;
        }

        Ok(merged)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkillFilter {
    pub category: Option<SkillCategory>,
    pub featured: Option<bool>,
}

impl SkillFilter {
    pub fn from_params(raw: &RawQuery) -> Self {
        SkillFilter {
            category: coerce_enum(raw.get("category")),
            featured: coerce_bool(raw.get("featured")),
        }
    }

    pub fn featured() -> Self {
        SkillFilter { featured: Some(true), ..Default::default() }
    }

    pub fn in_category(category: SkillCategory) -> Self {
        SkillFilter { category: Some(category), ..Default::default() }
    }
}

impl RecordFilter<Skill> for SkillFilter {
    fn matches(&self, skill: &Skill) -> bool {
        self.category.is_none_or(|c| skill.category == c)
            && self.featured.is_none_or(|f| skill.featured == f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillSort {
    Proficiency,
    Name,
    Category,
    Featured,
    CreatedAt,
    UpdatedAt,
}

impl SortField for SkillSort {
    type Record = Skill;

    fn parse(name: &str) -> Option<Self> {
        match name {
            "proficiency" => Some(SkillSort::Proficiency),
            "name" => Some(SkillSort::Name),
            "category" => Some(SkillSort::Category),
            "featured" => Some(SkillSort::Featured),
            "createdAt" => Some(SkillSort::CreatedAt),
            "updatedAt" => Some(SkillSort::UpdatedAt),
            _ => None,
        }
    }

    fn column(&self) -> &'static str {
        match self {
            SkillSort::Proficiency => "proficiency",
            SkillSort::Name => "name COLLATE \"C\"",
            SkillSort::Category => "category::text COLLATE \"C\"",
            SkillSort::Featured => "featured",
            SkillSort::CreatedAt => "created_at",
            SkillSort::UpdatedAt => "updated_at",
        }
    }

    fn compare(&self, a: &Skill, b: &Skill) -> Ordering {
        match self {
            SkillSort::Proficiency => a.proficiency.cmp(&b.proficiency),
            SkillSort::Name => a.name.cmp(&b.name),
            SkillSort::Category => a.category.as_str().cmp(b.category.as_str()),
            SkillSort::Featured => a.featured.cmp(&b.featured),
            SkillSort::CreatedAt => a.created_at.cmp(&b.created_at),
            SkillSort::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FieldError;

    fn rust_skill(proficiency: i32) -> NewSkill {
        NewSkill {
            name: Some("Rust".into()),
            category: Some("backend".into()),
            proficiency: Some(proficiency),
            ..Default::default()
        }
    }

    #[test]
    fn proficiency_above_range_is_rejected() {
        let err = rust_skill(101).into_insert().unwrap_err();
        match err {
            AppError::ValidationError(errors) => assert_eq!(
                errors,
                vec![FieldError { field: "proficiency".into(), message: PROFICIENCY_MESSAGE.into() }]
            ),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn proficiency_bounds_are_inclusive() {
        assert!(rust_skill(1).into_insert().is_ok());
        assert!(rust_skill(100).into_insert().is_ok());
        assert!(rust_skill(0).into_insert().is_err());
    }

    #[test]
    fn blank_color_is_dropped_and_bad_color_rejected() {
        let mut skill = rust_skill(80);
        skill.color = Some("   ".into());
        assert_eq!(skill.into_insert().unwrap().color, None);

        let mut skill = rust_skill(80);
        skill.color = Some("#12345G".into());
        assert!(skill.into_insert().is_err());
    }

    #[test]
    fn update_keeps_unsent_fields() {
        let now = Utc::now();
        let mut insert = rust_skill(80).into_insert().unwrap();
        insert.color = Some("#DEA584".into());
        let skill = insert.into_skill(Uuid::new_v4(), now, now);

        let patch: UpdateSkill = serde_json::from_str(r#"{"proficiency":90,"color":null}"#).unwrap();
        let merged = patch.merge(&skill).unwrap();
        assert_eq!(merged.proficiency, 90);
        assert_eq!(merged.color, None);
        assert_eq!(merged.name, "Rust");
    }

    #[test]
    fn blank_name_is_reported_as_missing() {
        let now = Utc::now();
        let skill = rust_skill(80).into_insert().unwrap().into_skill(Uuid::new_v4(), now, now);

        let patch = UpdateSkill { name: Some("  ".into()), ..Default::default() };
        match patch.merge(&skill).unwrap_err() {
            AppError::ValidationError(errors) => assert_eq!(
                errors,
                vec![FieldError { field: "name".into(), message: NAME_REQUIRED.into() }]
            ),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn category_path_parameter_is_strict() {
        assert_eq!(SkillCategory::parse_param("tools").unwrap(), SkillCategory::Tools);
        assert!(SkillCategory::parse_param("cooking").is_err());
    }
}
