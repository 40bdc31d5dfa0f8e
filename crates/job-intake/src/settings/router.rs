use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::Response,
    routing::get,
    Form, Router,
};
use serde::Deserialize;

use super::views::SendGridSettingsPage;
use super::{ApiKey, SettingsStore};
use crate::web::{generic_failure, render_page, Notice};

pub const SAVED_MESSAGE: &str = "The configuration options have been saved.";

/// Admin screen for the provider key. Callers are expected to wrap it in the admin guard.
pub fn settings_router<S>(store: Arc<S>) -> Router
where
    S: SettingsStore + 'static,
{
    Router::new()
        .route(
            "/admin/config/sendgrid",
            get(show_handler::<S>).post(save_handler::<S>),
        )
        .with_state(store)
}

#[derive(Debug, Deserialize)]
pub struct SettingsForm {
    #[serde(default)]
    pub sendgrid_api_key: String,
}

pub(crate) async fn show_handler<S>(State(store): State<Arc<S>>) -> Response
where
    S: SettingsStore + 'static,
{
    match store.load_api_key().await {
        Ok(key) => render_page(
            StatusCode::OK,
            &SendGridSettingsPage {
                notices: Vec::new(),
                api_key: key.expose().to_string(),
            },
        ),
        Err(err) => {
            tracing::error!(error = %err, "unable to load sendgrid settings");
            generic_failure()
        }
    }
}

pub(crate) async fn save_handler<S>(
    State(store): State<Arc<S>>,
    Form(form): Form<SettingsForm>,
) -> Response
where
    S: SettingsStore + 'static,
{
    let key = ApiKey::new(form.sendgrid_api_key);
    let blank = key.is_blank();
    match store.save_api_key(key.clone()).await {
        Ok(()) => {
            tracing::info!(fallback_mode = blank, "sendgrid api key updated");
            render_page(
                StatusCode::OK,
                &SendGridSettingsPage {
                    notices: vec![Notice::status(SAVED_MESSAGE)],
                    api_key: key.expose().to_string(),
                },
            )
        }
        Err(err) => {
            tracing::error!(error = %err, "unable to save sendgrid settings");
            generic_failure()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SettingsError;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request};
    use std::sync::Mutex;
    use tower::ServiceExt;

    #[derive(Default)]
    struct MemorySettings {
        key: Mutex<ApiKey>,
    }

    #[async_trait]
    impl SettingsStore for MemorySettings {
        async fn load_api_key(&self) -> Result<ApiKey, SettingsError> {
            Ok(self.key.lock().expect("settings mutex poisoned").clone())
        }

        async fn save_api_key(&self, key: ApiKey) -> Result<(), SettingsError> {
            *self.key.lock().expect("settings mutex poisoned") = key;
            Ok(())
        }
    }

    struct OfflineSettings;

    #[async_trait]
    impl SettingsStore for OfflineSettings {
        async fn load_api_key(&self) -> Result<ApiKey, SettingsError> {
            Err(SettingsError::Unavailable("database offline".to_string()))
        }

        async fn save_api_key(&self, _key: ApiKey) -> Result<(), SettingsError> {
            Err(SettingsError::Unavailable("database offline".to_string()))
        }
    }

    async fn read_body(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        String::from_utf8(bytes.to_vec()).expect("utf-8 body")
    }

    #[tokio::test]
    async fn get_renders_the_current_key() {
        let store = Arc::new(MemorySettings::default());
        store
            .save_api_key(ApiKey::new("SG.current"))
            .await
            .expect("seed key");

        let response = settings_router(store)
            .oneshot(
                Request::get("/admin/config/sendgrid")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_body(response).await;
        assert!(body.contains("value=\"SG.current\""));
        assert!(body.contains("Single Sender Verification"));
    }

    #[tokio::test]
    async fn post_persists_the_new_key() {
        let store = Arc::new(MemorySettings::default());

        let response = settings_router(store.clone())
            .oneshot(
                Request::post("/admin/config/sendgrid")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("sendgrid_api_key=SG.rotated"))
                    .expect("request builds"),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        assert!(read_body(response).await.contains(SAVED_MESSAGE));
        assert_eq!(
            store.load_api_key().await.expect("load").expose(),
            "SG.rotated"
        );
    }

    #[tokio::test]
    async fn empty_key_is_accepted() {
        let store = Arc::new(MemorySettings::default());
        store
            .save_api_key(ApiKey::new("SG.old"))
            .await
            .expect("seed key");

        let response = settings_router(store.clone())
            .oneshot(
                Request::post("/admin/config/sendgrid")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("sendgrid_api_key="))
                    .expect("request builds"),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        assert!(store.load_api_key().await.expect("load").is_blank());
    }

    #[tokio::test]
    async fn storage_failure_shows_generic_notice() {
        let response = settings_router(Arc::new(OfflineSettings))
            .oneshot(
                Request::get("/admin/config/sendgrid")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = read_body(response).await;
        assert!(body.contains("Contact the site administrator"));
        assert!(!body.contains("database offline"));
    }
}
