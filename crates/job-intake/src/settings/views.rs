use askama::Template;

use crate::web::Notice;

#[derive(Template)]
#[template(path = "sendgrid_settings.html")]
pub struct SendGridSettingsPage {
    pub notices: Vec<Notice>,
    pub api_key: String,
}
