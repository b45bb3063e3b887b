//! GigaHz - Main entry point
//!
//! Interactive PC builder by default; `catalog`, `checkout` and
//! `validate-config` subcommands for scripted use.

use anyhow::{Context, Result, bail};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::fs::{self, File};
use std::io::stdout;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use gigahz::app::App;
use gigahz::catalog::{
    CatalogLoader, CatalogQuery, HttpProductSource, JsonFileSource, ProductSource,
};
use gigahz::checkout::{Checkout, CustomerDetails, FileSessionStore, PromoOutcome, unix_millis};
use gigahz::cli::{CheckoutArgs, Cli, Commands};
use gigahz::config::AppConfig;
use gigahz::types::{MemoryType, PartCategory};

const LOG_FILE_NAME: &str = "gigahz.log";

/// Initialize tracing. `RUST_LOG` overrides the default `info` level.
///
/// With a log file the output goes there instead of stderr so it does not
/// draw over the TUI.
fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {path:?}"))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

/// Configuration file, then `GIGAHZ_*` environment, then command-line flags
fn resolve_config(cli: &Cli) -> Result<AppConfig> {
    let config = match cli.config {
        Some(ref path) => AppConfig::load_from_file(path)?,
        None => AppConfig::default(),
    };
    let mut config = config.with_env_overrides();

    if let Some(ref base) = cli.api_base {
        config.api_base = base.clone();
    }
    if let Some(ref dir) = cli.session_dir {
        config.session_dir = dir.clone();
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn product_source(cli: &Cli, config: &AppConfig) -> Result<Arc<dyn ProductSource>> {
    match cli.offline {
        Some(ref path) => {
            info!(?path, "serving catalog from file");
            Ok(Arc::new(JsonFileSource::new(path)))
        }
        None => {
            let source = HttpProductSource::new(config.api_base.clone(), config.request_timeout())
                .context("Failed to build HTTP client")?;
            Ok(Arc::new(source))
        }
    }
}

/// Main application entry point
fn main() -> Result<()> {
    let cli = Cli::parse_args();

    if let Some(Commands::ValidateConfig { ref path }) = cli.command {
        init_tracing(None)?;
        return validate_config(path);
    }

    let config = resolve_config(&cli)?;
    fs::create_dir_all(&config.session_dir).with_context(|| {
        format!("Failed to create session directory {:?}", config.session_dir)
    })?;

    match cli.command {
        Some(Commands::Catalog {
            category,
            ref socket,
            ref ram_type,
            include_inactive,
            json,
        }) => {
            init_tracing(None)?;
            let source = product_source(&cli, &config)?;
            print_catalog(
                &config,
                source.as_ref(),
                category,
                socket.clone(),
                ram_type.as_deref(),
                !include_inactive && config.active_only,
                json,
            )
        }
        Some(Commands::Checkout(ref args)) => {
            init_tracing(None)?;
            run_checkout(&config, args)
        }
        Some(Commands::ValidateConfig { .. }) => Ok(()),
        Some(Commands::Build) | None => {
            init_tracing(Some(&config.session_dir.join(LOG_FILE_NAME)))?;
            let source = product_source(&cli, &config)?;
            run_tui(&config, source)
        }
    }
}

fn validate_config(path: &Path) -> Result<()> {
    info!(?path, "validating configuration file");
    let config = AppConfig::load_from_file(path)?;
    match config.validate() {
        Ok(()) => {
            println!("✓ Configuration file is valid: {path:?}");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "configuration validation failed");
            bail!("Configuration file is invalid: {e}")
        }
    }
}

fn print_catalog(
    config: &AppConfig,
    source: &dyn ProductSource,
    category: PartCategory,
    socket: Option<String>,
    ram_type: Option<&str>,
    active_only: bool,
    json: bool,
) -> Result<()> {
    let mut query = CatalogQuery::new(category).active_only(active_only);
    query.socket = socket;
    if let Some(raw) = ram_type {
        let mem: MemoryType = raw
            .parse()
            .with_context(|| format!("Unknown RAM type {raw:?} (expected DDR4 or DDR5)"))?;
        query.memory_type = Some(mem);
    }

    let mut loader = CatalogLoader::new(config.api_base.clone());
    let items = loader.load(source, query).to_vec();
    if let Some(err) = loader.error(category) {
        bail!("Failed to load {}: {err}", category.label());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    println!("{} ({} parts)", category.label(), items.len());
    for item in &items {
        let extra = item
            .socket
            .as_deref()
            .or(item.memory_type.as_deref())
            .unwrap_or("");
        println!(
            "{:<8} {:<40} {:<10} {:>20}  {:<12} {}",
            item.id,
            item.name,
            item.brand,
            item.price.to_string(),
            item.stock.badge(),
            extra
        );
    }
    Ok(())
}

fn run_checkout(config: &AppConfig, args: &CheckoutArgs) -> Result<()> {
    let mut store = FileSessionStore::open(&config.session_dir)?;
    let mut checkout = Checkout::open(None, &mut store);
    debug!(origin = ?checkout.origin(), "checkout payload resolved");

    checkout.customer = CustomerDetails {
        full_name: args.name.clone(),
        phone: args.phone.clone(),
        email: args.email.clone(),
        address1: args.address.clone(),
        address2: args.address2.clone(),
        city: args.city.clone(),
        province: args.province.clone(),
        postal: args.postal.clone(),
    };
    checkout.payment = args.payment;

    if let Some(ref code) = args.promo {
        match checkout.apply_promo(code) {
            Ok(PromoOutcome::Applied(promo)) => {
                println!("Promo {} applied: -{}", promo.code, promo.amount);
            }
            Ok(PromoOutcome::Cleared) => {}
            Err(notice) => {
                warn!(%notice, "promo refused");
                println!("{notice}");
            }
        }
    }

    for line in checkout.lines() {
        println!(
            "{:<15} {:<40} x{:<3} {:>20}",
            line.category.label(),
            line.item.name,
            line.quantity,
            line.line_total.to_string()
        );
    }
    let totals = checkout.totals();
    println!("Subtotal:        {}", totals.subtotal);
    println!("Build discount: -{}", totals.build_discount);
    println!("Promo:          -{}", totals.promo_discount);
    println!("Delivery:        {}", totals.delivery_fee);
    println!("Payable:         {}", totals.payable);
    println!("Payment:         {}", checkout.payment.label());

    if args.dry_run {
        return Ok(());
    }

    match checkout.place_order(&mut store, unix_millis()) {
        Ok(order) => {
            println!("✓ Order {} placed ({})", order.id, order.totals.payable);
            Ok(())
        }
        Err(notice) => bail!("{notice}"),
    }
}

fn run_tui(config: &AppConfig, source: Arc<dyn ProductSource>) -> Result<()> {
    info!("GigaHz builder starting up");
    let store = FileSessionStore::open(&config.session_dir)?;
    let mut app = App::new(config, source, Box::new(store));

    enable_raw_mode().context("Failed to enable raw mode")?;
    crossterm::execute!(stdout(), crossterm::terminal::EnterAlternateScreen)
        .context("Failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout());
    let result = Terminal::new(backend)
        .context("Failed to create terminal")
        .and_then(|mut terminal| {
            let run = app.run(&mut terminal).map_err(anyhow::Error::from);
            let _ = terminal.show_cursor();
            run
        });

    let _ = disable_raw_mode();
    let _ = crossterm::execute!(stdout(), crossterm::terminal::LeaveAlternateScreen);

    if let Err(ref e) = result {
        error!(error = %e, "application error");
    }
    info!("GigaHz builder exited");
    result
}
