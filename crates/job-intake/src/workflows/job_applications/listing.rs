//! Admin listing of stored applications, newest first, five per page.

use std::sync::Arc;

use askama::Template;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Response,
    routing::get,
    Router,
};
use chrono::DateTime;
use serde::Deserialize;

use super::domain::JobApplication;
use super::repository::{ApplicationStore, Page, RepositoryError, DEFAULT_PAGE_SIZE};
use crate::web::{generic_failure, render_page, Notice};

pub const EMPTY_MESSAGE: &str = "No job applications found.";
pub const SUBMITTED_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Numbered links shown around the current page.
const PAGER_WINDOW: u32 = 9;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub category: &'static str,
    pub technology: &'static str,
    pub message: String,
    pub submitted: String,
}

impl From<&JobApplication> for ListingRow {
    fn from(application: &JobApplication) -> Self {
        Self {
            id: application.id.0,
            name: application.name.clone(),
            email: application.email.clone(),
            category: application.category.as_str(),
            technology: application.technology.as_str(),
            message: application.message.clone(),
            submitted: format_submitted(application.submitted),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagerLink {
    pub label: String,
    pub href: Option<String>,
    pub current: bool,
}

impl PagerLink {
    fn to_page(label: impl Into<String>, index: u32) -> Self {
        Self {
            label: label.into(),
            href: Some(format!("?page={index}")),
            current: false,
        }
    }
}

#[derive(Template)]
#[template(path = "job_applications.html")]
pub struct ListingPage {
    pub notices: Vec<Notice>,
    pub table_empty: bool,
    pub rows: Vec<ListingRow>,
    pub show_pager: bool,
    pub pager: Vec<PagerLink>,
}

impl ListingPage {
    pub fn new(rows: &[JobApplication], total: u64, page: Page) -> Self {
        let pages = page_count(total, page.size);
        Self {
            notices: Vec::new(),
            table_empty: total == 0,
            rows: rows.iter().map(ListingRow::from).collect(),
            show_pager: pages > 1,
            pager: pager_links(page.index, pages),
        }
    }
}

pub fn format_submitted(timestamp: i64) -> String {
    DateTime::from_timestamp(timestamp, 0)
        .map(|moment| moment.format(SUBMITTED_FORMAT).to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

pub fn page_count(total: u64, size: u32) -> u32 {
    if size == 0 {
        return 0;
    }
    let pages = total.div_ceil(u64::from(size));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// First / previous / numbered / next / last links for `pages` pages.
pub fn pager_links(current: u32, pages: u32) -> Vec<PagerLink> {
    if pages <= 1 {
        return Vec::new();
    }
    let last = pages - 1;
    let mut links = Vec::new();

    if current > 0 {
        links.push(PagerLink::to_page("« First", 0));
        links.push(PagerLink::to_page("‹ Previous", current.min(pages) - 1));
    }

    let half = PAGER_WINDOW / 2;
    let start = current.saturating_sub(half).min(last.saturating_sub(PAGER_WINDOW - 1));
    let end = (start + PAGER_WINDOW - 1).min(last);
    for index in start..=end {
        if index == current {
            links.push(PagerLink {
                label: (index + 1).to_string(),
                href: None,
                current: true,
            });
        } else {
            links.push(PagerLink::to_page((index + 1).to_string(), index));
        }
    }

    if current < last {
        links.push(PagerLink::to_page("Next ›", current + 1));
        links.push(PagerLink::to_page("Last »", last));
    }
    links
}

/// Admin listing route. Callers wrap it in the admin guard.
pub fn listing_router<R>(store: Arc<R>) -> Router
where
    R: ApplicationStore + 'static,
{
    Router::new()
        .route("/admin/job-applications", get(listing_handler::<R>))
        .with_state(store)
}

#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    #[serde(default)]
    pub page: Option<String>,
}

impl ListingQuery {
    /// Anything that is not a page number means the first page.
    pub fn page_index(&self) -> u32 {
        self.page
            .as_deref()
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(0)
    }
}

pub(crate) async fn listing_handler<R>(
    State(store): State<Arc<R>>,
    Query(query): Query<ListingQuery>,
) -> Response
where
    R: ApplicationStore + 'static,
{
    let page = Page {
        index: query.page_index(),
        size: DEFAULT_PAGE_SIZE,
    };
    match load_page(store.as_ref(), page).await {
        Ok(listing) => render_page(StatusCode::OK, &listing),
        Err(err) => {
            tracing::error!(error = %err, page = page.index, "unable to load job applications");
            generic_failure()
        }
    }
}

pub async fn load_page<R>(store: &R, page: Page) -> Result<ListingPage, RepositoryError>
where
    R: ApplicationStore + ?Sized,
{
    let total = store.count().await?;
    let rows = store.list_recent(page).await?;
    Ok(ListingPage::new(&rows, total, page))
}
