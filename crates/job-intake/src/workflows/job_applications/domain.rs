use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier assigned by the store on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub i64);

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Job category offered on the intake form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobCategory {
    Backend,
    Frontend,
}

impl JobCategory {
    pub const ALL: [JobCategory; 2] = [JobCategory::Backend, JobCategory::Frontend];

    pub const fn as_str(self) -> &'static str {
        match self {
            JobCategory::Backend => "backend",
            JobCategory::Frontend => "frontend",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            JobCategory::Backend => "Backend",
            JobCategory::Frontend => "Frontend",
        }
    }

    /// Sub-category options offered once this category is selected.
    pub const fn technologies(self) -> &'static [Technology] {
        match self {
            JobCategory::Backend => &[Technology::Php, Technology::Java],
            JobCategory::Frontend => &[Technology::Angular, Technology::React],
        }
    }

    pub const fn default_technology(self) -> Technology {
        self.technologies()[0]
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == raw.trim())
    }
}

impl Default for JobCategory {
    fn default() -> Self {
        JobCategory::Backend
    }
}

/// Technology sub-category; every value belongs to exactly one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Technology {
    Php,
    Java,
    Angular,
    React,
}

impl Technology {
    pub const ALL: [Technology; 4] = [
        Technology::Php,
        Technology::Java,
        Technology::Angular,
        Technology::React,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Technology::Php => "php",
            Technology::Java => "java",
            Technology::Angular => "angular",
            Technology::React => "react",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Technology::Php => "PHP",
            Technology::Java => "Java",
            Technology::Angular => "AngularJS",
            Technology::React => "ReactJS",
        }
    }

    pub const fn category(self) -> JobCategory {
        match self {
            Technology::Php | Technology::Java => JobCategory::Backend,
            Technology::Angular | Technology::React => JobCategory::Frontend,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|technology| technology.as_str() == raw.trim())
    }
}

/// Raw form input exactly as posted by the browser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationSubmission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "type", default)]
    pub category: String,
    #[serde(default)]
    pub technology: String,
    #[serde(default)]
    pub message: String,
}

/// A validated submission ready to be mailed and stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidApplication {
    pub name: String,
    pub email: String,
    pub category: JobCategory,
    pub technology: Technology,
    pub message: String,
}

impl ValidApplication {
    pub fn into_new_record(self, submitted: i64) -> NewJobApplication {
        NewJobApplication {
            name: self.name,
            email: self.email,
            category: self.category,
            technology: self.technology,
            message: self.message,
            submitted,
        }
    }
}

/// Row values handed to the store; the id is assigned on insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJobApplication {
    pub name: String,
    pub email: String,
    pub category: JobCategory,
    pub technology: Technology,
    pub message: String,
    pub submitted: i64,
}

/// A stored job application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobApplication {
    pub id: ApplicationId,
    pub name: String,
    pub email: String,
    #[serde(rename = "type")]
    pub category: JobCategory,
    pub technology: Technology,
    pub message: String,
    pub submitted: i64,
}

impl JobApplication {
    pub fn from_new(id: ApplicationId, record: NewJobApplication) -> Self {
        Self {
            id,
            name: record.name,
            email: record.email,
            category: record.category,
            technology: record.technology,
            message: record.message,
            submitted: record.submitted,
        }
    }
}
