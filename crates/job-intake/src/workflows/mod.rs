pub mod job_applications;
pub mod notifications;
