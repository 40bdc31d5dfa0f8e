//! Job application intake: the public form, its validation, the submission
//! sequence, and the admin listing of what was stored.

pub mod domain;
pub mod listing;
pub mod repository;
pub mod router;
pub mod service;
pub mod validation;
pub mod views;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicationId, ApplicationSubmission, JobApplication, JobCategory, NewJobApplication,
    Technology, ValidApplication,
};
pub use listing::{listing_router, ListingPage};
pub use repository::{ApplicationStore, Page, RepositoryError, DEFAULT_PAGE_SIZE};
pub use router::intake_router;
pub use service::{IntakeError, IntakeService, SubmissionOutcome};
pub use validation::{validate, FieldError, ValidationErrors};
