use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidateEmail};

use crate::{
    entities::validation::{present, trim_opt, violations},
    errors::AppError,
    listing::{coerce_enum, RawQuery, RecordFilter, SortField},
};

wire_enum! {
    #[derive(sqlx::Type, Default)]
    #[sqlx(type_name = "contact_status", rename_all = "lowercase")]
    pub enum ContactStatus {
        #[default]
        New => "new",
        Read => "read",
        Replied => "replied",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub status: ContactStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContactInsert {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

fn chars_between(value: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&value.chars().count())
}

impl ContactInsert {
    /// Record-level rules every stored contact must satisfy.
    pub fn check_invariants(&self) -> Result<(), AppError> {
        if !chars_between(&self.name, 2, 100) {
            return Err(AppError::invalid_field("name", "Name must be between 2 and 100 characters"));
        }
        if !self.email.validate_email() {
            return Err(AppError::invalid_field("email", "Please provide a valid email"));
        }
        if !chars_between(&self.subject, 5, 200) {
            return Err(AppError::invalid_field("subject", "Subject must be between 5 and 200 characters"));
        }
        if !chars_between(&self.message, 10, 1000) {
            return Err(AppError::invalid_field("message", "Message must be between 10 and 1000 characters"));
        }
        Ok(())
    }

    pub fn into_contact(self, id: Uuid, now: DateTime<Utc>) -> Contact {
        Contact {
            id,
            name: self.name,
            email: self.email,
            subject: self.subject,
            message: self.message,
            status: ContactStatus::New,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct NewContact {
    #[validate(
        required(message = "Name must be between 2 and 100 characters"),
        length(min = 2, max = 100, message = "Name must be between 2 and 100 characters")
    )]
    pub name: Option<String>,

    #[validate(
        required(message = "Please provide a valid email"),
        email(message = "Please provide a valid email")
    )]
    pub email: Option<String>,

    #[validate(
        required(message = "Subject must be between 5 and 200 characters"),
        length(min = 5, max = 200, message = "Subject must be between 5 and 200 characters")
    )]
    pub subject: Option<String>,

    #[validate(
        required(message = "Message must be between 10 and 1000 characters"),
        length(min = 10, max = 1000, message = "Message must be between 10 and 1000 characters")
    )]
    pub message: Option<String>,
}

impl NewContact {
    pub fn into_insert(self) -> Result<ContactInsert, AppError> {
        let payload = NewContact {
            name: trim_opt(self.name),
            email: trim_opt(self.email).map(|e| e.to_lowercase()),
            subject: trim_opt(self.subject),
            message: trim_opt(self.message),
        };

        let errors = violations(&payload);
        if !errors.is_empty() {
            return Err(errors.into());
        }

        Ok(ContactInsert {
            name: present(payload.name, "name")?,
            email: present(payload.email, "email")?,
            subject: present(payload.subject, "subject")?,
            message: present(payload.message, "message")?,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateContactStatus {
    pub status: Option<String>,
}

impl UpdateContactStatus {
    pub fn parse(&self) -> Result<ContactStatus, AppError> {
        self.status
            .as_deref()
            .map(str::trim)
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| {
                AppError::invalid_field("status", "Invalid status. Must be new, read, or replied")
            })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContactFilter {
    pub status: Option<ContactStatus>,
}

impl ContactFilter {
    pub fn from_params(raw: &RawQuery) -> Self {
        ContactFilter { status: coerce_enum(raw.get("status")) }
    }
}

impl RecordFilter<Contact> for ContactFilter {
    fn matches(&self, contact: &Contact) -> bool {
        self.status.is_none_or(|s| contact.status == s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactSort {
    CreatedAt,
    UpdatedAt,
    Name,
    Email,
    Subject,
    Status,
}

impl SortField for ContactSort {
    type Record = Contact;

    fn parse(name: &str) -> Option<Self> {
        match name {
            "createdAt" => Some(ContactSort::CreatedAt),
            "updatedAt" => Some(ContactSort::UpdatedAt),
            "name" => Some(ContactSort::Name),
            "email" => Some(ContactSort::Email),
            "subject" => Some(ContactSort::Subject),
            "status" => Some(ContactSort::Status),
            _ => None,
        }
    }

    fn column(&self) -> &'static str {
        match self {
            ContactSort::CreatedAt => "created_at",
            ContactSort::UpdatedAt => "updated_at",
            ContactSort::Name => "name COLLATE \"C\"",
            ContactSort::Email => "email COLLATE \"C\"",
            ContactSort::Subject => "subject COLLATE \"C\"",
            ContactSort::Status => "status::text COLLATE \"C\"",
        }
    }

    fn compare(&self, a: &Contact, b: &Contact) -> Ordering {
        match self {
            ContactSort::CreatedAt => a.created_at.cmp(&b.created_at),
            ContactSort::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            ContactSort::Name => a.name.cmp(&b.name),
            ContactSort::Email => a.email.cmp(&b.email),
            ContactSort::Subject => a.subject.cmp(&b.subject),
            ContactSort::Status => a.status.as_str().cmp(b.status.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submission_is_trimmed_and_email_lowercased() {
        let form = NewContact {
            name: Some("  Ada Lovelace ".into()),
            email: Some(" Ada@Example.COM ".into()),
            subject: Some("Hello there".into()),
            message: Some("I would like to talk about a project.".into()),
        };
        let insert = form.into_insert().unwrap();
        assert_eq!(insert.name, "Ada Lovelace");
        assert_eq!(insert.email, "ada@example.com");
    }

    #[test]
    fn every_short_field_is_reported() {
        let form = NewContact {
            name: Some("A".into()),
            email: Some("not-an-email".into()),
            subject: Some("Hi".into()),
            message: Some("short".into()),
        };
        match form.into_insert().unwrap_err() {
            AppError::ValidationError(errors) => {
                let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(fields, vec!["email", "message", "name", "subject"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn status_update_accepts_any_known_value() {
        let parse = |s: &str| UpdateContactStatus { status: Some(s.into()) }.parse();
        assert_eq!(parse("replied").unwrap(), ContactStatus::Replied);
        assert_eq!(parse("new").unwrap(), ContactStatus::New);
        assert!(parse("archived").is_err());
        assert!(UpdateContactStatus::default().parse().is_err());
    }
}
