use askama::Template;

use super::domain::{ApplicationSubmission, JobCategory, Technology};
use super::validation::ValidationErrors;
use crate::web::Notice;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// Field-level messages shown under the matching inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    pub name: Option<String>,
    pub email: Option<String>,
    pub category: Option<String>,
    pub technology: Option<String>,
    pub message: Option<String>,
}

impl From<&ValidationErrors> for FormErrors {
    fn from(errors: &ValidationErrors) -> Self {
        let message_for = |field: &str| errors.message_for(field).map(str::to_string);
        Self {
            name: message_for("name"),
            email: message_for("email"),
            category: message_for("type"),
            technology: message_for("technology"),
            message: message_for("message"),
        }
    }
}

/// The sub-category container; also served alone for partial updates.
#[derive(Template)]
#[template(path = "technology_field.html")]
pub struct TechnologyField {
    pub options: Vec<SelectOption>,
    pub error: Option<String>,
}

impl TechnologyField {
    /// Options of `category`, with `selected` highlighted when it belongs to it.
    pub fn for_category(
        category: JobCategory,
        selected: Option<Technology>,
        error: Option<String>,
    ) -> Self {
        let selected = selected
            .filter(|technology| technology.category() == category)
            .unwrap_or_else(|| category.default_technology());
        let options = category
            .technologies()
            .iter()
            .map(|technology| SelectOption {
                value: technology.as_str(),
                label: technology.label(),
                selected: *technology == selected,
            })
            .collect();
        Self { options, error }
    }
}

#[derive(Template)]
#[template(path = "apply.html")]
pub struct ApplyPage {
    pub notices: Vec<Notice>,
    pub name: String,
    pub email: String,
    pub message: String,
    pub errors: FormErrors,
    pub categories: Vec<SelectOption>,
    pub technology_field: String,
}

impl ApplyPage {
    /// A fresh form with the default category and technology selected.
    pub fn blank(notices: Vec<Notice>) -> Result<Self, askama::Error> {
        Self::with_values(&ApplicationSubmission::default(), FormErrors::default(), notices)
    }

    /// Re-renders the form keeping what the user typed.
    pub fn with_values(
        values: &ApplicationSubmission,
        errors: FormErrors,
        notices: Vec<Notice>,
    ) -> Result<Self, askama::Error> {
        let category = JobCategory::parse(&values.category).unwrap_or_default();
        let technology_field = TechnologyField::for_category(
            category,
            Technology::parse(&values.technology),
            errors.technology.clone(),
        )
        .render()?;

        let categories = JobCategory::ALL
            .into_iter()
            .map(|option| SelectOption {
                value: option.as_str(),
                label: option.label(),
                selected: option == category,
            })
            .collect();

        Ok(Self {
            notices,
            name: values.name.clone(),
            email: values.email.clone(),
            message: values.message.clone(),
            errors,
            categories,
            technology_field,
        })
    }
}
