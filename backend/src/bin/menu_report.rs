//! Print the shopping shortfall of one menu from a JSON catalogue.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use cap_std::{ambient_authority, fs::Dir};
use clap::Parser;
use menu_planner::domain::{MenuId, MenuPlanningService, NumericConfig, ProductConstraint};
use menu_planner::outbound::memory::InMemoryCatalogue;
use rust_decimal::Decimal;
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

/// `menu-report` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "menu-report",
    about = "Price what is still missing to serve a menu from a product catalogue",
    version
)]
struct CliArgs {
    /// Path to a JSON catalogue holding products, dishes and menus.
    #[arg(long = "catalogue", value_name = "path")]
    catalogue: PathBuf,
    /// Menu to report on.
    #[arg(long = "menu-id", value_name = "uuid", value_parser = parse_menu_id)]
    menu_id: MenuId,
    /// How many times the whole menu is served.
    #[arg(long = "quantity", value_name = "decimal", default_value = "1", value_parser = parse_quantity)]
    quantity: Decimal,
    /// Candidate override as `dish:ordinal:index`; later entries win.
    #[arg(long = "constraint", value_name = "dish:ordinal:index", value_parser = parse_constraint)]
    constraints: Vec<ProductConstraint>,
}

fn main() -> io::Result<()> {
    if let Err(error) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .with_writer(io::stderr)
        .try_init()
    {
        warn!(%error, "tracing init failed");
    }

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let document = read_catalogue(&args.catalogue)?;
    let catalogue = Arc::new(InMemoryCatalogue::from_json(&document).map_err(|error| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("load catalogue '{}': {error}", args.catalogue.display()),
        )
    })?);

    let service = MenuPlanningService::new(
        Arc::clone(&catalogue),
        Arc::clone(&catalogue),
        catalogue,
        NumericConfig::from_env(),
    );
    let report = service
        .shortfall_report(&args.menu_id, args.quantity, &args.constraints)
        .await
        .map_err(|error| io::Error::other(format!("shortfall report failed: {error}")))?;

    let rendered = serde_json::to_string_pretty(&report)
        .map_err(|error| io::Error::other(format!("render report: {error}")))?;
    println!("{rendered}");
    Ok(())
}

fn read_catalogue(path: &Path) -> io::Result<String> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "catalogue path must be a file"))?;
    let directory = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|error| {
        io::Error::other(format!(
            "open catalogue directory '{}': {error}",
            parent.display()
        ))
    })?;
    directory.read_to_string(Path::new(file_name)).map_err(|error| {
        io::Error::other(format!("read catalogue '{}': {error}", path.display()))
    })
}

fn parse_menu_id(raw: &str) -> Result<MenuId, String> {
    MenuId::new(raw).map_err(|error| error.to_string())
}

fn parse_quantity(raw: &str) -> Result<Decimal, String> {
    Decimal::from_str(raw.trim()).map_err(|error| format!("invalid quantity '{raw}': {error}"))
}

fn parse_constraint(raw: &str) -> Result<ProductConstraint, String> {
    let mut parts = raw.rsplitn(3, ':');
    let (Some(index), Some(ordinal), Some(dish)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(format!("constraint '{raw}' must look like dish:ordinal:index"));
    };
    let ordinal = ordinal
        .trim()
        .parse::<usize>()
        .map_err(|error| format!("invalid ingredient ordinal in '{raw}': {error}"))?;
    let index = index
        .trim()
        .parse::<usize>()
        .map_err(|error| format!("invalid product index in '{raw}': {error}"))?;
    ProductConstraint::new(dish, ordinal, index).map_err(|error| error.to_string())
}
