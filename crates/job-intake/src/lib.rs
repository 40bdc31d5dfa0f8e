//! Careers-site job application intake: the public form, the admin listing,
//! mail delivery with a fallback relay, and deferred follow-up notifications.

pub mod admin;
pub mod clock;
pub mod config;
pub mod error;
pub mod mail;
pub mod settings;
pub mod storage;
pub mod telemetry;
pub mod web;
pub mod workflows;
