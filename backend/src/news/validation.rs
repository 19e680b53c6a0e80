//! Request validation for news writes
//!
//! Every write endpoint runs the request body through [`validate`], which checks
//! each recognized field and collects all violations before anything touches the
//! store. The `url` uniqueness rule needs the store, so it is applied afterwards
//! with [`Validation::check_unique_url`].

use crate::error::AppError;
use crate::news::models::{NewsChanges, NewsFields, NewsId};
use crate::news::repository::NewsRepository;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use url::Url;

/// Field names accepted on writes; anything else in a body is ignored
pub const WRITABLE_FIELDS: [&str; 8] = [
    "title",
    "author",
    "description",
    "content",
    "url",
    "url_image",
    "published_at",
    "category",
];

/// Naive formats accepted for `published_at`, interpreted as UTC
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Field name -> list of violation messages
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    /// Record a violation for `field`
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Violations recorded for `field`
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// True when no field failed
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fields with at least one violation
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Raw JSON object body of a write request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct NewsPayload(Map<String, Value>);

impl NewsPayload {
    fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }
}

/// Which fields must be present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Every writable field must be supplied (create, full update)
    All,
    /// Only supplied fields are checked (partial update)
    Supplied,
}

/// Outcome of field validation, before the uniqueness check
#[derive(Debug)]
pub struct Validation {
    changes: NewsChanges,
    errors: FieldErrors,
}

/// Validate every writable field of `payload`
///
/// # Arguments
/// * `payload` - Request body
/// * `presence` - Whether absent fields are violations
pub fn validate(payload: &NewsPayload, presence: Presence) -> Validation {
    let mut errors = FieldErrors::default();
    let mut check = FieldCheck {
        payload,
        presence,
        errors: &mut errors,
    };

    let changes = NewsChanges {
        title: check.string("title"),
        author: check.string("author"),
        description: check.string("description"),
        content: check.string("content"),
        url: check.url("url"),
        url_image: check.url("url_image"),
        published_at: check.date("published_at"),
        category: check.string("category"),
    };

    Validation { changes, errors }
}

impl Validation {
    /// Apply the `url` uniqueness rule
    ///
    /// Only runs when `url` passed its other rules.
    ///
    /// # Arguments
    /// * `repo` - Store to check against
    /// * `ignore` - Record being updated, excluded from the check
    pub async fn check_unique_url(
        &mut self,
        repo: &dyn NewsRepository,
        ignore: Option<NewsId>,
    ) -> Result<(), AppError> {
        if let Some(url) = self.changes.url.as_deref() {
            if repo.url_taken(url, ignore).await? {
                self.errors.add("url", taken_message("url"));
            }
        }
        Ok(())
    }

    /// Finish a partial validation
    pub fn into_changes(self) -> Result<NewsChanges, FieldErrors> {
        if self.errors.is_empty() {
            Ok(self.changes)
        } else {
            Err(self.errors)
        }
    }

    /// Finish a full validation; every field must have passed
    pub fn into_fields(self) -> Result<NewsFields, FieldErrors> {
        if !self.errors.is_empty() {
            return Err(self.errors);
        }

        let NewsChanges {
            title: Some(title),
            author: Some(author),
            description: Some(description),
            content: Some(content),
            url: Some(url),
            url_image: Some(url_image),
            published_at: Some(published_at),
            category: Some(category),
        } = self.changes
        else {
            // Only reachable when validated with Presence::Supplied
            let mut errors = self.errors;
            for field in WRITABLE_FIELDS {
                errors.add(field, required_message(field));
            }
            return Err(errors);
        };

        Ok(NewsFields {
            title,
            author,
            description,
            content,
            url,
            url_image,
            published_at,
            category,
        })
    }
}

struct FieldCheck<'a> {
    payload: &'a NewsPayload,
    presence: Presence,
    errors: &'a mut FieldErrors,
}

impl<'a> FieldCheck<'a> {
    /// `required` then `string`; yields the trimmed value
    fn string(&mut self, field: &str) -> Option<String> {
        let value = self.present(field)?;
        match value {
            Value::String(s) => Some(s.trim().to_string()),
            _ => {
                self.errors.add(field, string_message(field));
                None
            }
        }
    }

    /// `required` then `url`; a non-string value is not a valid URL
    fn url(&mut self, field: &str) -> Option<String> {
        let value = self.present(field)?;
        match value.as_str().map(str::trim) {
            Some(url) if is_valid_url(url) => Some(url.to_string()),
            _ => {
                self.errors.add(field, url_message(field));
                None
            }
        }
    }

    fn date(&mut self, field: &str) -> Option<DateTime<Utc>> {
        let value = self.present(field)?;
        let parsed = value.as_str().and_then(|s| parse_date(s.trim()));
        if parsed.is_none() {
            self.errors.add(field, date_message(field));
        }
        parsed
    }

    /// Applies `required`. Absent fields are skipped silently in partial mode.
    fn present(&mut self, field: &str) -> Option<&'a Value> {
        let payload = self.payload;
        let blank = match payload.get(field) {
            None if self.presence == Presence::Supplied => return None,
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.trim().is_empty(),
            Some(Value::Array(items)) => items.is_empty(),
            Some(_) => false,
        };

        if blank {
            self.errors.add(field, required_message(field));
            return None;
        }
        payload.get(field)
    }
}

/// Absolute URL with a host
pub fn is_valid_url(value: &str) -> bool {
    Url::parse(value).map(|u| u.has_host()).unwrap_or(false)
}

/// Parse a `published_at` value
///
/// Accepts RFC 3339, a handful of naive date-time layouts and a bare date
/// (midnight). Naive values are taken as UTC.
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

fn attribute(field: &str) -> String {
    field.replace('_', " ")
}

fn required_message(field: &str) -> String {
    format!("The {} field is required.", attribute(field))
}

fn string_message(field: &str) -> String {
    format!("The {} field must be a string.", attribute(field))
}

fn url_message(field: &str) -> String {
    format!("The {} field must be a valid URL.", attribute(field))
}

fn date_message(field: &str) -> String {
    format!("The {} field must be a valid date.", attribute(field))
}

fn taken_message(field: &str) -> String {
    format!("The {} has already been taken.", attribute(field))
}
