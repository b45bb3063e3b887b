//! Main application module
//!
//! The event loop owns the [`AppState`]. Catalog fetches run on worker
//! threads and post their results back over a channel; the loop commits them
//! through [`CatalogLoader::complete`], which discards anything superseded by
//! a newer request.
//!
//! [`CatalogLoader::complete`]: crate::catalog::CatalogLoader::complete

mod state;

pub use state::{AppMode, AppState};

use crate::advisor;
use crate::builder::{BuilderSession, SelectOutcome};
use crate::catalog::{CatalogLoader, FetchTicket, ProductRow, ProductSource};
use crate::checkout::{self, Checkout, PaymentMethod, PromoOutcome, SessionStore};
use crate::config::AppConfig;
use crate::error::{CatalogError, Result};
use crate::types::{CpuBrand, PartCategory, StockFilter};
use crate::ui::UiRenderer;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::Backend};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};
use strum::IntoEnumIterator;
use tracing::{debug, info, warn};

/// A finished catalog fetch, posted from a worker thread
#[derive(Debug)]
pub struct CatalogMessage {
    pub ticket: FetchTicket,
    pub result: std::result::Result<Vec<ProductRow>, CatalogError>,
}

/// What the user is looking at: step, brand, stock filter and search text
type ViewKey = (PartCategory, Option<CpuBrand>, StockFilter, String);

/// Main application
pub struct App {
    state: AppState,
    source: Arc<dyn ProductSource>,
    store: Box<dyn SessionStore>,
    active_only: bool,
    catalog_tx: Sender<CatalogMessage>,
    catalog_rx: Receiver<CatalogMessage>,
    /// View the active list was last checked under
    last_view: Option<ViewKey>,
    ui_renderer: UiRenderer,
}

impl App {
    /// Create the application and request the first catalog
    pub fn new(
        config: &AppConfig,
        source: Arc<dyn ProductSource>,
        store: Box<dyn SessionStore>,
    ) -> Self {
        let (catalog_tx, catalog_rx) = mpsc::channel();
        let session = BuilderSession::new().with_max_quantity(config.max_quantity);
        let catalog = CatalogLoader::new(config.api_base.clone());

        let mut app = Self {
            state: AppState::new(session, catalog),
            source,
            store,
            active_only: config.active_only,
            catalog_tx,
            catalog_rx,
            last_view: None,
            ui_renderer: UiRenderer::new(),
        };
        app.ensure_active_catalog();
        app
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn store(&self) -> &dyn SessionStore {
        self.store.as_ref()
    }

    fn view_key(&self) -> ViewKey {
        let session = &self.state.session;
        (
            session.active_step(),
            session.brand(),
            session.stock_filter(),
            session.search().to_string(),
        )
    }

    /// Start a fetch for the active step when its list is missing or stale.
    ///
    /// A failed list is retried only once the view changes, so moving the
    /// cursor keeps the error on screen.
    fn ensure_active_catalog(&mut self) {
        let view = self.view_key();
        let view_changed = self.last_view.as_ref() != Some(&view);
        self.last_view = Some(view);

        let query = self
            .state
            .session
            .active_query()
            .active_only(self.active_only);
        if !self.state.catalog.needs_fetch(&query) {
            return;
        }
        if !view_changed && self.state.catalog.failed_for(&query) {
            debug!(category = %query.category, "keeping failed list until the view changes");
            return;
        }

        let ticket = self.state.catalog.begin(query);
        let source = Arc::clone(&self.source);
        let tx = self.catalog_tx.clone();

        thread::spawn(move || {
            let result = source.fetch(&ticket.query);
            if tx.send(CatalogMessage { ticket, result }).is_err() {
                debug!("catalog response dropped, UI loop has exited");
            }
        });
    }

    /// Commit every finished fetch without blocking. Returns how many
    /// responses were committed.
    pub fn poll_catalog_messages(&mut self) -> usize {
        let mut committed = 0;
        while let Ok(msg) = self.catalog_rx.try_recv() {
            if self.commit(msg) {
                committed += 1;
            }
        }
        committed
    }

    fn commit(&mut self, msg: CatalogMessage) -> bool {
        let category = msg.ticket.category();
        let applied = self.state.catalog.complete(&msg.ticket, msg.result);
        if applied && category == self.state.session.active_step() {
            self.state.clamp_cursor();
            if let Some(err) = self.state.catalog.error(category) {
                self.state.status_message = format!("Failed to load {}: {}", category.label(), err);
            }
        }
        applied
    }

    /// Block until the active step's list has settled or `timeout` passes.
    /// Returns whether the list settled.
    pub fn wait_for_catalog(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            let active = self.state.session.active_step();
            if !self.state.catalog.is_loading(active) {
                return true;
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }
            match self.catalog_rx.recv_timeout(remaining) {
                Ok(msg) => {
                    self.commit(msg);
                }
                Err(_) => return false,
            }
        }
    }

    /// Run the main application loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        info!("Starting main application loop");

        loop {
            self.poll_catalog_messages();

            if crossterm::event::poll(Duration::from_millis(50))? {
                match crossterm::event::read()? {
                    Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                        if self.handle_key_event(key_event)? {
                            break;
                        }
                    }
                    Event::Resize(width, height) => {
                        debug!(width, height, "terminal resized");
                    }
                    _ => {}
                }
            }

            terminal.draw(|f| self.ui_renderer.render(f, &self.state))?;
        }

        info!("Main loop exited");
        Ok(())
    }

    /// Handle keyboard input. Returns `Ok(true)` when the user asked to quit.
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Result<bool> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Ok(true);
        }

        if self.state.help_visible {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                self.state.help_visible = false;
            }
            return Ok(false);
        }

        let quit = match self.state.mode {
            AppMode::BrandGate => {
                self.handle_brand_gate_key(key);
                false
            }
            AppMode::Builder => self.handle_builder_key(key)?,
            AppMode::Search => {
                self.handle_search_key(key);
                false
            }
            AppMode::Details => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('d')) {
                    self.state.details = None;
                    self.state.mode = AppMode::Builder;
                }
                false
            }
            AppMode::Advisor => {
                self.handle_advisor_key(key);
                false
            }
            AppMode::Checkout => self.handle_checkout_key(key),
            AppMode::PromoInput => {
                self.handle_promo_key(key);
                false
            }
        };

        self.ensure_active_catalog();
        Ok(quit)
    }

    fn handle_brand_gate_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Left | KeyCode::Right | KeyCode::Up | KeyCode::Down | KeyCode::Tab => {
                self.state.brand_cursor = self.state.brand_cursor.toggled();
            }
            KeyCode::Char('a') | KeyCode::Char('A') => self.choose_brand(CpuBrand::Amd),
            KeyCode::Char('i') | KeyCode::Char('I') => self.choose_brand(CpuBrand::Intel),
            KeyCode::Enter => self.choose_brand(self.state.brand_cursor),
            KeyCode::Esc => {
                self.state.mode = AppMode::Builder;
                if self.state.session.brand_gate_open() {
                    self.state.status_message =
                        "CPUs stay hidden until a brand is chosen (press b)".to_string();
                }
            }
            _ => {}
        }
    }

    fn choose_brand(&mut self, brand: CpuBrand) {
        self.state.session.choose_brand(brand);
        self.state.brand_cursor = brand;
        self.state.cursor = 0;
        self.state.mode = AppMode::Builder;
        self.state.status_message = format!("Showing {brand} processors");
    }

    fn handle_builder_key(&mut self, key: KeyEvent) -> Result<bool> {
        let step = self.state.session.active_step();
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(true),
            KeyCode::Char('?') => self.state.help_visible = true,
            KeyCode::Left => self.change_step(|s| s.previous_step()),
            KeyCode::Right => self.change_step(|s| s.next_step()),
            KeyCode::Char(c @ '1'..='8') => {
                let index = (c as usize) - ('1' as usize);
                if let Some(category) = PartCategory::from_index(index) {
                    self.change_step(|s| s.go_to(category));
                }
            }
            KeyCode::Up => self.state.cursor = self.state.cursor.saturating_sub(1),
            KeyCode::Down => {
                let len = self.state.visible_items().len();
                if self.state.cursor + 1 < len {
                    self.state.cursor += 1;
                }
            }
            KeyCode::Home => self.state.cursor = 0,
            KeyCode::End => {
                self.state.cursor = self.state.visible_items().len().saturating_sub(1);
            }
            KeyCode::Enter => self.select_highlighted(),
            KeyCode::Char('+') | KeyCode::Char('=') => {
                let qty = self.state.session.increment_qty(step);
                self.state.status_message = format!("{} quantity: {qty}", step.label());
            }
            KeyCode::Char('-') => {
                let qty = self.state.session.decrement_qty(step);
                self.state.status_message = format!("{} quantity: {qty}", step.label());
            }
            KeyCode::Char('x') | KeyCode::Delete => {
                if self.state.session.selection().is_selected(step) {
                    self.state.session.clear(step);
                    self.state.status_message = format!("Cleared {}", step.label());
                }
            }
            KeyCode::Char('f') => {
                let filter = self.state.session.cycle_stock_filter();
                self.state.cursor = 0;
                self.state.status_message = format!("Stock filter: {}", filter.label());
            }
            KeyCode::Char('/') => self.state.mode = AppMode::Search,
            KeyCode::Char('b') => {
                self.state.brand_cursor = self.state.session.brand().unwrap_or_default();
                self.state.mode = AppMode::BrandGate;
            }
            KeyCode::Char('d') => {
                if let Some(item) = self.state.highlighted().cloned() {
                    self.state.details = Some(item);
                    self.state.mode = AppMode::Details;
                }
            }
            KeyCode::Char('a') => {
                self.state.question.clear();
                self.state.advisor_answer = None;
                self.state.mode = AppMode::Advisor;
            }
            KeyCode::Char('r') => {
                self.state.session.reset();
                self.state
                    .catalog
                    .invalidate(&PartCategory::cpu_dependents());
                self.state.cursor = 0;
                self.state.checkout = None;
                self.state.brand_cursor = CpuBrand::default();
                self.state.mode = AppMode::BrandGate;
                self.state.status_message = "Build reset".to_string();
            }
            KeyCode::Char('c') => self.open_checkout()?,
            _ => {}
        }
        Ok(false)
    }

    fn change_step(&mut self, f: impl FnOnce(&mut BuilderSession)) {
        let before = self.state.session.active_step();
        f(&mut self.state.session);
        if self.state.session.active_step() != before {
            self.state.cursor = 0;
        }
    }

    fn select_highlighted(&mut self) {
        let step = self.state.session.active_step();
        let Some(item) = self.state.highlighted().cloned() else {
            return;
        };
        let name = item.name.clone();

        match self.state.session.select(step, item) {
            SelectOutcome::Selected {
                next_step,
                invalidated,
            } => {
                if !invalidated.is_empty() {
                    self.state.catalog.invalidate(&invalidated);
                }
                self.state.cursor = 0;
                self.state.status_message = if next_step == step {
                    format!("Selected {name}. Press c to add the build to your cart")
                } else {
                    format!("Selected {name}")
                };
            }
            SelectOutcome::Rejected(reason) => {
                self.state.status_message = reason.to_string();
            }
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        let mut query = self.state.session.search().to_string();
        match key.code {
            KeyCode::Esc | KeyCode::Enter => {
                self.state.mode = AppMode::Builder;
                return;
            }
            KeyCode::Backspace => {
                query.pop();
            }
            KeyCode::Char(c) => query.push(c),
            _ => return,
        }
        self.state.session.set_search(query);
        self.state.cursor = 0;
    }

    fn handle_advisor_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.state.mode = AppMode::Builder,
            KeyCode::Enter => {
                self.state.advisor_answer =
                    advisor::answer(&self.state.question, self.state.session.selection());
                self.state.question.clear();
            }
            KeyCode::Backspace => {
                self.state.question.pop();
            }
            KeyCode::Char(c) => self.state.question.push(c),
            _ => {}
        }
    }

    /// "Add to cart": snapshot the build and open the checkout review
    fn open_checkout(&mut self) -> Result<()> {
        let payload = checkout::prepare_checkout(&self.state.session, self.store.as_mut())?;
        let checkout = Checkout::open(Some(payload), self.store.as_mut());
        self.state.notice = checkout.validate().err().map(|n| n.to_string());
        self.state.checkout = Some(checkout);
        self.state.promo_input.clear();
        self.state.mode = AppMode::Checkout;
        self.state.status_message = "Build saved for checkout".to_string();
        Ok(())
    }

    fn handle_checkout_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => return true,
            KeyCode::Char('?') => self.state.help_visible = true,
            KeyCode::Esc | KeyCode::Char('b') => self.state.mode = AppMode::Builder,
            KeyCode::Char('p') => {
                self.state.promo_input = self
                    .state
                    .checkout
                    .as_ref()
                    .and_then(|c| c.promo())
                    .map(|p| p.code.clone())
                    .unwrap_or_default();
                self.state.mode = AppMode::PromoInput;
            }
            KeyCode::Tab => {
                if let Some(ref mut checkout) = self.state.checkout {
                    let methods: Vec<_> = PaymentMethod::iter().collect();
                    let pos = methods
                        .iter()
                        .position(|m| *m == checkout.payment)
                        .unwrap_or(0);
                    checkout.payment = methods[(pos + 1) % methods.len()];
                }
            }
            _ => {}
        }
        false
    }

    fn handle_promo_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.state.mode = AppMode::Checkout,
            KeyCode::Enter => {
                if let Some(ref mut checkout) = self.state.checkout {
                    self.state.notice = match checkout.apply_promo(&self.state.promo_input) {
                        Ok(PromoOutcome::Applied(promo)) => {
                            Some(format!("Promo {} applied: -{}", promo.code, promo.amount))
                        }
                        Ok(PromoOutcome::Cleared) => Some("Promo removed".to_string()),
                        Err(notice) => {
                            warn!(%notice, "promo refused");
                            Some(notice.to_string())
                        }
                    };
                }
                self.state.mode = AppMode::Checkout;
            }
            KeyCode::Backspace => {
                self.state.promo_input.pop();
            }
            KeyCode::Char(c) => self.state.promo_input.push(c),
            _ => {}
        }
    }
}
