//! Form binding and validation.
//!
//! Forms are validated with `validator`. A failed form is not an error
//! response: handlers re-render the form context with [`FieldErrors`].

use std::borrow::Cow;
use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, NoneAsEmptyString};
use utoipa::ToSchema;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::models::author::{Author, AuthorFields};

/// Field name -> human-readable messages
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Flatten `validator` errors into per-field messages
pub fn field_errors(errors: &ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Renewal
// ---------------------------------------------------------------------------

/// Proposed renewal on an empty form
pub const RENEWAL_PROPOSAL_WEEKS: i64 = 3;
/// Furthest a renewal may reach
pub const RENEWAL_MAX_WEEKS: i64 = 4;

pub const FIELD_REQUIRED: &str = "This field is required.";
pub const INVALID_DATE: &str = "Enter a valid date.";

pub const RENEWAL_IN_PAST: &str = "Invalid date - renewal in past";
pub const RENEWAL_TOO_FAR: &str = "Invalid date - renewal more than 4 weeks ahead";

fn error_with_message(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

fn single_error(field: &'static str, error: ValidationError) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.add(field, error);
    errors
}

/// Parse an ISO `YYYY-MM-DD` form value
fn parse_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| error_with_message("invalid_date", INVALID_DATE))
}

/// Blank means no date
fn parse_optional_date(value: Option<&str>) -> Result<Option<NaiveDate>, ValidationError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_date(value).map(Some),
    }
}

/// Check `today <= date <= today + 4 weeks`
pub fn validate_renewal_date(date: NaiveDate, today: NaiveDate) -> Result<(), ValidationError> {
    if date < today {
        return Err(error_with_message("renewal_in_past", RENEWAL_IN_PAST));
    }
    if date > today + Duration::weeks(RENEWAL_MAX_WEEKS) {
        return Err(error_with_message("renewal_too_far", RENEWAL_TOO_FAR));
    }
    Ok(())
}

/// Renewal form of a book instance, as submitted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct RenewBookForm {
    /// Enter a date between now and 4 weeks (default 3)
    #[schema(example = "2024-03-12")]
    pub renewal_date: String,
}

impl RenewBookForm {
    /// Form shown before any submission
    pub fn proposed(today: NaiveDate) -> Self {
        Self {
            renewal_date: (today + Duration::weeks(RENEWAL_PROPOSAL_WEEKS)).to_string(),
        }
    }

    /// Parse and validate against `today`; the cleaned value is the submitted date
    pub fn clean(&self, today: NaiveDate) -> Result<NaiveDate, ValidationErrors> {
        let value = self.renewal_date.trim();
        if value.is_empty() {
            return Err(single_error(
                "renewal_date",
                error_with_message("required", FIELD_REQUIRED),
            ));
        }
        let date = parse_date(value).map_err(|e| single_error("renewal_date", e))?;
        validate_renewal_date(date, today).map_err(|e| single_error("renewal_date", e))?;
        Ok(date)
    }
}

// ---------------------------------------------------------------------------
// Author
// ---------------------------------------------------------------------------

/// Initial "Died" value of the create form
pub fn default_date_of_death() -> NaiveDate {
    NaiveDate::from_ymd_opt(2018, 5, 1).unwrap_or(NaiveDate::MIN)
}

/// Author create/update form, as submitted. Blank dates bind to `None`.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct AuthorForm {
    #[validate(length(min = 1, max = 100, message = "First name must be 1-100 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "Last name must be 1-100 characters"))]
    pub last_name: String,
    #[serde_as(as = "NoneAsEmptyString")]
    pub date_of_birth: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    pub date_of_death: Option<String>,
}

impl AuthorForm {
    /// Blank create form
    pub fn initial() -> Self {
        Self {
            date_of_death: Some(default_date_of_death().to_string()),
            ..Self::default()
        }
    }

    /// Validate, trim and parse into persistable fields
    pub fn clean(&self) -> Result<AuthorFields, ValidationErrors> {
        let trimmed = Self {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            ..self.clone()
        };
        let mut errors = match trimmed.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        let date_of_birth = match parse_optional_date(self.date_of_birth.as_deref()) {
            Ok(date) => date,
            Err(e) => {
                errors.add("date_of_birth", e);
                None
            }
        };
        let date_of_death = match parse_optional_date(self.date_of_death.as_deref()) {
            Ok(date) => date,
            Err(e) => {
                errors.add("date_of_death", e);
                None
            }
        };

        if !errors.errors().is_empty() {
            return Err(errors);
        }
        Ok(AuthorFields {
            first_name: trimmed.first_name,
            last_name: trimmed.last_name,
            date_of_birth,
            date_of_death,
        })
    }
}

impl From<&Author> for AuthorForm {
    fn from(author: &Author) -> Self {
        Self {
            first_name: author.first_name.clone(),
            last_name: author.last_name.clone(),
            date_of_birth: author.date_of_birth.map(|d| d.to_string()),
            date_of_death: author.date_of_death.map(|d| d.to_string()),
        }
    }
}
