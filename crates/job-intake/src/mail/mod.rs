//! Outbound mail: message formatting, the transactional-email client, the SMTP fallback
//! relay, and the gateway choosing between them on every send.

pub mod format;
pub mod gateway;
pub mod message;
pub mod sendgrid;
pub mod smtp;

pub use gateway::{
    DeliveryError, DeliveryFailure, DeliveryPath, MailGateway, MailTransport, Mailer,
};
pub use message::{MailMessage, MessageKey, OutboundEmail};
pub use sendgrid::{SendGridClient, SENDGRID_ENDPOINT};
pub use smtp::SmtpFallback;
