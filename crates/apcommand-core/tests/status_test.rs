#![allow(clippy::unwrap_used)]
// Radio status reader tests: scraping, caching and degraded pages.

mod common;

use std::time::Duration;

use pretty_assertions::assert_eq;

use apcommand_core::{Band, NOT_AVAILABLE, RadioStatusReader};
use common::{FakeAp, SETTLE, payload};

#[tokio::test(start_paused = true)]
async fn test_reads_radio_page_fields() {
    let ap = FakeAp::new();
    let reader = RadioStatusReader::new(ap.session(SETTLE), true);

    assert_eq!(reader.channel(Band::TwoPointFour).await.unwrap(), "6");
    assert_eq!(reader.state(Band::TwoPointFour).await.unwrap(), "Enabled");
    assert_eq!(reader.channel(Band::Five).await.unwrap(), "36");
    assert_eq!(reader.state(Band::Five).await.unwrap(), "Disabled");
    assert_eq!(
        reader.sideband(Band::Five).await.unwrap().as_deref(),
        Some("Upper")
    );
    assert_eq!(
        reader.mac_address(Band::Five).await.unwrap(),
        "(00:90:4C:13:11:03)"
    );
    assert_eq!(
        reader.bandwidth(Band::TwoPointFour).await.unwrap().as_deref(),
        Some("20MHz in 2.4G Band and 40MHz in 5G Band")
    );
}

#[tokio::test(start_paused = true)]
async fn test_queries_post_unit_without_action() {
    let ap = FakeAp::new();
    let reader = RadioStatusReader::new(ap.session(SETTLE), true);

    reader.channel(Band::Five).await.unwrap();
    reader.ssid(Band::TwoPointFour).await.unwrap();

    let calls = ap.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].path, "radio.asp");
    assert_eq!(calls[0].data, Some(payload(&[("wl_unit", "1")])));
    assert_eq!(calls[1].path, "ssid.asp");
    assert_eq!(calls[1].data, Some(payload(&[("wl_unit", "0")])));
    assert!(calls.iter().all(|c| !c.is_commit()));
}

#[tokio::test(start_paused = true)]
async fn test_reads_ssid_page() {
    let ap = FakeAp::new();
    let reader = RadioStatusReader::new(ap.session(SETTLE), true);

    assert_eq!(reader.ssid(Band::TwoPointFour).await.unwrap(), "bcm-24");
    assert_eq!(reader.ssid(Band::Five).await.unwrap(), "bcm-5");
}

#[tokio::test(start_paused = true)]
async fn test_24ghz_sideband_is_none_without_request() {
    let ap = FakeAp::new();
    let reader = RadioStatusReader::new(ap.session(SETTLE), true);

    assert_eq!(reader.sideband(Band::TwoPointFour).await.unwrap(), None);
    assert!(ap.calls().is_empty());
}

// ── Caching ─────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_cached_reader_fetches_each_page_once() {
    let ap = FakeAp::new();
    let reader = RadioStatusReader::new(ap.session(SETTLE), false);

    reader.channel(Band::Five).await.unwrap();
    reader.state(Band::Five).await.unwrap();
    reader.mac_address(Band::Five).await.unwrap();
    assert_eq!(ap.calls().len(), 1);

    // Different band, different page.
    reader.channel(Band::TwoPointFour).await.unwrap();
    reader.ssid(Band::TwoPointFour).await.unwrap();
    assert_eq!(ap.calls().len(), 3);

    reader.clear_cache();
    reader.channel(Band::Five).await.unwrap();
    assert_eq!(ap.calls().len(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_cached_reader_serves_stale_values() {
    let ap = FakeAp::new();
    let session = ap.session(SETTLE);
    let cached = RadioStatusReader::new(session.clone(), false);
    let fresh = RadioStatusReader::new(session, true);

    assert_eq!(cached.channel(Band::TwoPointFour).await.unwrap(), "6");
    ap.pin_channel(0, "1");

    assert_eq!(cached.channel(Band::TwoPointFour).await.unwrap(), "6");
    assert_eq!(fresh.channel(Band::TwoPointFour).await.unwrap(), "1");
    assert!(fresh.refreshes());
    assert!(!cached.refreshes());
}

// ── Degraded pages ──────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_missing_fields_degrade_to_sentinel() {
    let ap = FakeAp::new();
    ap.serve_blank_pages();
    let reader = RadioStatusReader::new(ap.session(SETTLE), true);

    assert_eq!(reader.channel(Band::Five).await.unwrap(), NOT_AVAILABLE);
    assert_eq!(reader.state(Band::Five).await.unwrap(), NOT_AVAILABLE);
    assert_eq!(reader.ssid(Band::Five).await.unwrap(), NOT_AVAILABLE);
    assert_eq!(reader.mac_address(Band::Five).await.unwrap(), NOT_AVAILABLE);
    assert_eq!(reader.sideband(Band::Five).await.unwrap(), None);
    assert_eq!(reader.bandwidth(Band::Five).await.unwrap(), None);
}

#[tokio::test(start_paused = true)]
async fn test_transport_errors_propagate() {
    let ap = FakeAp::new();
    ap.fail_with(404);
    let reader = RadioStatusReader::new(ap.session(SETTLE), true);

    let err = reader.channel(Band::Five).await.unwrap_err();
    assert!(!err.is_transient());
    assert!(err.to_string().contains("404"), "got: {err}");
}

// ── Session timing ──────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_each_query_settles_after_navigation_and_submission() {
    let ap = FakeAp::new();
    let reader = RadioStatusReader::new(ap.session(SETTLE), true);

    let start = tokio::time::Instant::now();
    reader.channel(Band::Five).await.unwrap();

    assert!(start.elapsed() >= SETTLE * 2);
    assert_eq!(ap.calls()[0].path, "radio.asp");
}

#[tokio::test(start_paused = true)]
async fn test_session_lock_is_exclusive() {
    let ap = FakeAp::new();
    let session = ap.session(SETTLE);

    let tx = session.begin().await;
    let blocked = tokio::time::timeout(Duration::from_millis(10), session.begin()).await;
    assert!(blocked.is_err(), "second transaction acquired while first open");

    drop(tx);
    let _tx = session.begin().await;
}
