use std::fmt;

use validator::ValidateEmail;

use super::domain::{ApplicationSubmission, JobCategory, Technology, ValidApplication};

pub const INVALID_EMAIL_MESSAGE: &str =
    "The email address is not valid. Please enter a valid email address.";
pub const MISMATCHED_TECHNOLOGY_MESSAGE: &str =
    "The selected technology is not available for the chosen type.";

/// Error attached to a single form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn required(field: &'static str, label: &str) -> Self {
        Self {
            field,
            message: format!("{label} field is required."),
        }
    }
}

/// Every field-level problem found in one submission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message.as_str())
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().map(|error| error.field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.fields().collect();
        write!(f, "submission failed validation on: {}", fields.join(", "))
    }
}

/// Trims surrounding whitespace and drops control characters from single-line input.
pub fn sanitize_line(raw: &str) -> String {
    raw.trim().chars().filter(|c| !c.is_control()).collect()
}

/// Normalises line endings and trims the message as a whole; inner line breaks survive.
pub fn sanitize_message(raw: &str) -> String {
    raw.replace("\r\n", "\n").replace('\r', "\n").trim().to_string()
}

/// Address syntax check. On top of the general syntax rules the address must be
/// accepted by the mail transport, the local part may not have empty dot-separated
/// atoms, and the domain needs at least two non-empty labels.
pub fn is_valid_email(email: &str) -> bool {
    if !email.validate_email() || email.parse::<lettre::Address>().is_err() {
        return false;
    }
    let Some((local, domain)) = email.rsplit_once('@') else {
        return false;
    };

    let local_ok = local.split('.').all(|atom| !atom.is_empty());
    let labels: Vec<&str> = domain.split('.').collect();
    let domain_ok = labels.len() > 1
        && labels
            .iter()
            .all(|label| !label.is_empty() && !label.starts_with('-') && !label.ends_with('-'));

    local_ok && domain_ok
}

/// Validates and sanitises a raw submission. No side effects happen here.
pub fn validate(submission: &ApplicationSubmission) -> Result<ValidApplication, ValidationErrors> {
    let mut errors = Vec::new();

    let name = sanitize_line(&submission.name);
    if name.is_empty() {
        errors.push(FieldError::required("name", "Name"));
    }

    let email = sanitize_line(&submission.email);
    if email.is_empty() {
        errors.push(FieldError::required("email", "Email"));
    } else if !is_valid_email(&email) {
        errors.push(FieldError {
            field: "email",
            message: INVALID_EMAIL_MESSAGE.to_string(),
        });
    }

    let category = if submission.category.trim().is_empty() {
        errors.push(FieldError::required("type", "Type"));
        None
    } else {
        let parsed = JobCategory::parse(&submission.category);
        if parsed.is_none() {
            errors.push(FieldError {
                field: "type",
                message: "The selected type is not valid.".to_string(),
            });
        }
        parsed
    };

    let technology = if submission.technology.trim().is_empty() {
        errors.push(FieldError::required("technology", "Technology"));
        None
    } else {
        match Technology::parse(&submission.technology) {
            Some(technology) => Some(technology),
            None => {
                errors.push(FieldError {
                    field: "technology",
                    message: "The selected technology is not valid.".to_string(),
                });
                None
            }
        }
    };

    if let (Some(category), Some(technology)) = (category, technology) {
        if technology.category() != category {
            errors.push(FieldError {
                field: "technology",
                message: MISMATCHED_TECHNOLOGY_MESSAGE.to_string(),
            });
        }
    }

    let message = sanitize_message(&submission.message);
    if message.is_empty() {
        errors.push(FieldError::required("message", "Message"));
    }

    match (category, technology) {
        (Some(category), Some(technology)) if errors.is_empty() => Ok(ValidApplication {
            name,
            email,
            category,
            technology,
            message,
        }),
        _ => Err(ValidationErrors(errors)),
    }
}
