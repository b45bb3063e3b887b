//! Tests for the interactive builder
//!
//! These tests verify:
//! - Key handling drives the builder session the way the screens promise
//! - Catalog fetches on worker threads land in the right step
//! - "Add to cart" writes the snapshot and opens checkout

mod common;

use common::{RecordingSource, catalog_file};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use gigahz::app::{App, AppMode};
use gigahz::catalog::JsonFileSource;
use gigahz::checkout::{CHECKOUT_KEY, MemorySessionStore, PayloadOrigin};
use gigahz::config::AppConfig;
use gigahz::types::{CpuBrand, PartCategory};
use std::sync::Arc;
use std::time::Duration;
use tempfile::NamedTempFile;

const WAIT: Duration = Duration::from_secs(5);

fn offline_app() -> (App, NamedTempFile) {
    let file = catalog_file();
    let source = Arc::new(JsonFileSource::new(file.path()));
    let mut app = App::new(
        &AppConfig::default(),
        source,
        Box::new(MemorySessionStore::new()),
    );
    assert!(app.wait_for_catalog(WAIT));
    (app, file)
}

fn press(app: &mut App, code: KeyCode) -> bool {
    app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
        .expect("key handling")
}

fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        press(app, KeyCode::Char(c));
    }
}

fn visible_ids(app: &App) -> Vec<String> {
    app.state()
        .visible_items()
        .iter()
        .map(|i| i.id.clone())
        .collect()
}

// =============================================================================
// Startup and Brand Gate
// =============================================================================

#[test]
fn test_starts_on_brand_gate() {
    let (app, _file) = offline_app();
    assert_eq!(app.state().mode, AppMode::BrandGate);
    assert_eq!(app.state().session.active_step(), PartCategory::Cpu);
    assert!(visible_ids(&app).is_empty());
}

#[test]
fn test_brand_gate_keys() {
    let (mut app, _file) = offline_app();
    press(&mut app, KeyCode::Right);
    assert_eq!(app.state().brand_cursor, CpuBrand::Intel);
    press(&mut app, KeyCode::Enter);

    assert_eq!(app.state().mode, AppMode::Builder);
    assert_eq!(app.state().session.brand(), Some(CpuBrand::Intel));
    assert_eq!(visible_ids(&app), vec!["3"]);
}

#[test]
fn test_escape_leaves_cpus_hidden() {
    let (mut app, _file) = offline_app();
    press(&mut app, KeyCode::Esc);
    assert_eq!(app.state().mode, AppMode::Builder);
    assert!(app.state().session.brand_gate_open());
    assert!(visible_ids(&app).is_empty());
}

// =============================================================================
// Selecting Parts
// =============================================================================

#[test]
fn test_enter_selects_and_loads_compatible_boards() {
    let (mut app, _file) = offline_app();
    press(&mut app, KeyCode::Char('a'));
    press(&mut app, KeyCode::Enter);

    assert_eq!(app.state().session.active_step(), PartCategory::Motherboard);
    assert!(app.wait_for_catalog(WAIT));
    assert_eq!(visible_ids(&app), vec!["10"]);
    assert!(app.state().status_message.contains("Ryzen 5 7600"));
}

#[test]
fn test_out_of_stock_enter_reports_and_stays() {
    let (mut app, _file) = offline_app();
    press(&mut app, KeyCode::Char('a'));
    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Down);
    assert_eq!(app.state().highlighted().map(|i| i.id.as_str()), Some("4"));

    press(&mut app, KeyCode::Enter);
    assert_eq!(app.state().session.active_step(), PartCategory::Cpu);
    assert!(app.state().session.selection().is_empty());
    assert_eq!(app.state().status_message, "Item is out of stock");
}

#[test]
fn test_cursor_stays_in_bounds() {
    let (mut app, _file) = offline_app();
    press(&mut app, KeyCode::Char('a'));
    for _ in 0..10 {
        press(&mut app, KeyCode::Down);
    }
    assert_eq!(app.state().cursor, 2);
    press(&mut app, KeyCode::Home);
    press(&mut app, KeyCode::Up);
    assert_eq!(app.state().cursor, 0);
}

#[test]
fn test_quantity_keys_clamp() {
    let (mut app, _file) = offline_app();
    press(&mut app, KeyCode::Esc);
    press(&mut app, KeyCode::Char('-'));
    assert_eq!(app.state().session.quantities().get(PartCategory::Cpu), 1);
    press(&mut app, KeyCode::Char('+'));
    press(&mut app, KeyCode::Char('+'));
    assert_eq!(app.state().session.quantities().get(PartCategory::Cpu), 3);
}

#[test]
fn test_number_keys_jump_to_step() {
    let (mut app, _file) = offline_app();
    press(&mut app, KeyCode::Esc);
    press(&mut app, KeyCode::Char('8'));
    assert_eq!(app.state().session.active_step(), PartCategory::Gpu);
    assert!(app.wait_for_catalog(WAIT));
    assert_eq!(visible_ids(&app), vec!["70"]);
}

// =============================================================================
// Search, Filters, Help
// =============================================================================

#[test]
fn test_search_mode_filters_list() {
    let (mut app, _file) = offline_app();
    press(&mut app, KeyCode::Char('a'));
    press(&mut app, KeyCode::Char('/'));
    assert_eq!(app.state().mode, AppMode::Search);
    type_text(&mut app, "5600");
    press(&mut app, KeyCode::Enter);

    assert_eq!(app.state().mode, AppMode::Builder);
    assert_eq!(visible_ids(&app), vec!["2"]);
}

#[test]
fn test_stock_filter_cycles() {
    let (mut app, _file) = offline_app();
    press(&mut app, KeyCode::Char('a'));
    press(&mut app, KeyCode::Char('f'));
    assert_eq!(visible_ids(&app), vec!["1", "2"]);
    press(&mut app, KeyCode::Char('f'));
    assert_eq!(visible_ids(&app), vec!["4"]);
}

#[test]
fn test_help_swallows_keys() {
    let (mut app, _file) = offline_app();
    press(&mut app, KeyCode::Esc);
    press(&mut app, KeyCode::Char('?'));
    assert!(app.state().help_visible);

    assert!(!press(&mut app, KeyCode::Right));
    assert_eq!(app.state().session.active_step(), PartCategory::Cpu);
    assert!(!press(&mut app, KeyCode::Char('q')));
    assert!(!app.state().help_visible);
}

#[test]
fn test_quit_from_builder() {
    let (mut app, _file) = offline_app();
    press(&mut app, KeyCode::Esc);
    assert!(press(&mut app, KeyCode::Char('q')));
}

// =============================================================================
// Checkout
// =============================================================================

#[test]
fn test_add_to_cart_opens_checkout() {
    let (mut app, _file) = offline_app();
    press(&mut app, KeyCode::Char('a'));
    press(&mut app, KeyCode::Enter);
    press(&mut app, KeyCode::Char('c'));

    assert_eq!(app.state().mode, AppMode::Checkout);
    assert!(app.store().get(CHECKOUT_KEY).is_some());
    let checkout = app.state().checkout.as_ref().unwrap();
    assert_eq!(checkout.origin(), PayloadOrigin::Navigation);
    assert_eq!(checkout.lines().len(), 1);
    // Contact details are not collected in the TUI
    assert_eq!(
        app.state().notice.as_deref(),
        Some("Please enter your full name.")
    );
}

#[test]
fn test_promo_entry() {
    let (mut app, _file) = offline_app();
    press(&mut app, KeyCode::Char('a'));
    press(&mut app, KeyCode::Enter);
    press(&mut app, KeyCode::Char('c'));

    press(&mut app, KeyCode::Char('p'));
    assert_eq!(app.state().mode, AppMode::PromoInput);
    type_text(&mut app, "freeship");
    press(&mut app, KeyCode::Enter);

    assert_eq!(app.state().mode, AppMode::Checkout);
    let checkout = app.state().checkout.as_ref().unwrap();
    assert_eq!(checkout.promo().map(|p| p.code.as_str()), Some("FREESHIP"));
    assert!(checkout.totals().delivery_fee > gigahz::money::Lkr::ZERO);
    assert_eq!(checkout.totals().payable, checkout.totals().subtotal);
}

#[test]
fn test_reset_reopens_brand_gate() {
    let (mut app, _file) = offline_app();
    press(&mut app, KeyCode::Char('a'));
    press(&mut app, KeyCode::Enter);
    press(&mut app, KeyCode::Char('r'));

    assert_eq!(app.state().mode, AppMode::BrandGate);
    assert!(app.state().session.selection().is_empty());
    assert_eq!(app.state().session.active_step(), PartCategory::Cpu);
}

// =============================================================================
// Fetch Failures
// =============================================================================

#[test]
fn test_failed_fetch_shows_status() {
    let source = Arc::new(RecordingSource::failing(500));
    let mut app = App::new(
        &AppConfig::default(),
        source.clone(),
        Box::new(MemorySessionStore::new()),
    );
    assert!(app.wait_for_catalog(WAIT));
    assert_eq!(app.state().status_message, "Failed to load CPU: API error 500");
    assert_eq!(source.queries().len(), 1);
}

#[test]
fn test_cursor_keys_keep_failed_list() {
    let source = Arc::new(RecordingSource::failing(500));
    let mut app = App::new(
        &AppConfig::default(),
        source.clone(),
        Box::new(MemorySessionStore::new()),
    );
    assert!(app.wait_for_catalog(WAIT));
    press(&mut app, KeyCode::Esc);
    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Up);

    assert_eq!(source.queries().len(), 1);
    assert_eq!(
        app.state().catalog.error(PartCategory::Cpu),
        Some("API error 500")
    );
    assert!(!app.state().catalog.is_loading(PartCategory::Cpu));
}

#[test]
fn test_failed_list_retried_on_view_change() {
    let source = Arc::new(RecordingSource::failing(500));
    let mut app = App::new(
        &AppConfig::default(),
        source.clone(),
        Box::new(MemorySessionStore::new()),
    );
    assert!(app.wait_for_catalog(WAIT));
    press(&mut app, KeyCode::Esc);

    // Stock filter change
    press(&mut app, KeyCode::Char('f'));
    assert!(app.wait_for_catalog(WAIT));
    assert_eq!(source.queries().len(), 2);

    // Step away and back
    press(&mut app, KeyCode::Right);
    assert!(app.wait_for_catalog(WAIT));
    press(&mut app, KeyCode::Left);
    assert!(app.wait_for_catalog(WAIT));
    let cpu_fetches = source
        .queries()
        .iter()
        .filter(|q| q.category == PartCategory::Cpu)
        .count();
    assert_eq!(cpu_fetches, 3);
}
