use super::common::*;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use std::sync::Arc;
use tower::ServiceExt;

use crate::workflows::job_applications::listing::{load_page, EMPTY_MESSAGE};
use crate::workflows::job_applications::{listing_router, ApplicationStore, Page};

async fn fetch(store: Arc<impl ApplicationStore + 'static>, uri: &str) -> (StatusCode, String) {
    let response = listing_router(store)
        .oneshot(Request::get(uri).body(Body::empty()).expect("request builds"))
        .await
        .expect("route executes");
    let status = response.status();
    (status, read_body(response).await)
}

fn ids(page: &crate::workflows::job_applications::ListingPage) -> Vec<i64> {
    page.rows.iter().map(|row| row.id).collect()
}

#[tokio::test]
async fn pages_hold_five_rows_newest_first() {
    let store = MemoryStore::seeded(12);

    let first = load_page(&store, Page::new(0)).await.expect("page 0");
    let second = load_page(&store, Page::new(1)).await.expect("page 1");
    let third = load_page(&store, Page::new(2)).await.expect("page 2");

    assert_eq!(ids(&first), vec![12, 11, 10, 9, 8]);
    assert_eq!(ids(&second), vec![7, 6, 5, 4, 3]);
    assert_eq!(ids(&third), vec![2, 1]);
    assert!(first.show_pager);
}

#[tokio::test]
async fn empty_table_shows_the_marker() {
    let (status, body) = fetch(Arc::new(MemoryStore::default()), "/admin/job-applications").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(EMPTY_MESSAGE));
    assert!(!body.contains("pager__items"));
}

#[tokio::test]
async fn page_beyond_the_end_is_empty_without_the_marker() {
    let (status, body) = fetch(
        Arc::new(MemoryStore::seeded(3)),
        "/admin/job-applications?page=4",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(!body.contains(EMPTY_MESSAGE));
    assert!(!body.contains("Applicant 1"));
}

#[tokio::test]
async fn message_line_breaks_become_markup() {
    let harness = harness(MailScript::Deliver(crate::mail::DeliveryPath::Primary));
    harness
        .service
        .submit(submission())
        .await
        .expect("submission succeeds");

    let (_, body) = fetch(harness.store.clone(), "/admin/job-applications").await;

    assert!(body.contains("<td>line1<br/>line2</td>"));
    assert!(body.contains("<td>a@example.com</td>"));
    assert!(body.contains("<td>backend</td>"));
    assert!(body.contains("<td>java</td>"));
    assert!(body.contains("<td>2023-11-14 22:13</td>"));
}

#[tokio::test]
async fn stored_markup_is_escaped() {
    let store = MemoryStore::seeded(1);
    store.rows.lock().expect("store mutex poisoned")[0].message =
        "<script>alert(1)</script>".to_string();

    let (_, body) = fetch(Arc::new(store), "/admin/job-applications").await;

    assert!(!body.contains("<script>alert(1)</script>"));
    assert!(body.contains("&lt;script&gt;"));
}

#[tokio::test]
async fn markup_split_across_lines_stays_escaped() {
    let store = MemoryStore::seeded(1);
    store.rows.lock().expect("store mutex poisoned")[0].message =
        "<b>bold\n</b> & 'quoted'".to_string();

    let (_, body) = fetch(Arc::new(store), "/admin/job-applications").await;

    assert!(body.contains("<td>&lt;b&gt;bold<br/>&lt;/b&gt; &amp; &#x27;quoted&#x27;</td>"));
}

#[tokio::test]
async fn pager_appears_only_with_several_pages() {
    let (_, single) = fetch(Arc::new(MemoryStore::seeded(5)), "/admin/job-applications").await;
    assert!(!single.contains("pager__items"));

    let (_, several) = fetch(Arc::new(MemoryStore::seeded(6)), "/admin/job-applications").await;
    assert!(several.contains("pager__items"));
    assert!(several.contains("Next ›"));
}

#[tokio::test]
async fn rendering_is_idempotent() {
    let store = Arc::new(MemoryStore::seeded(7));

    let (_, first) = fetch(store.clone(), "/admin/job-applications?page=1").await;
    let (_, second) = fetch(store, "/admin/job-applications?page=1").await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn storage_failure_shows_the_generic_notice() {
    let (status, body) = fetch(Arc::new(UnavailableStore), "/admin/job-applications").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!body.contains("database offline"));
}
