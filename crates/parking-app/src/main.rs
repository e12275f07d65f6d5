//! # Parking Access - Authorization-aware cache-aside access layer
//!
//! This is the main entry point that wires everything together.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  main.rs (this file) - Dependency Injection & Wiring            │
//! │    │                                                            │
//! │    ├── Loads:   AccessConfig (shared)                           │
//! │    ├── Creates: InMemoryVehicleRepository (adapter)             │
//! │    ├── Creates: InMemorySectionRepository (adapter)             │
//! │    ├── Creates: InMemoryCacheStore / RedisCacheStore (cache)    │
//! │    └── Runs:    one read, or the demo scenario                  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Usage:
//!   parking-access                                   - Run the demo scenario
//!   parking-access --role SECURITY vehicles list --page 1 --limit 10
//!   parking-access --role RESIDENT --residence r-12 vehicles get v-100
//!   parking-access sections revenue s-north --from 2026-10-01 --to 2026-10-31

mod seed;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use cache::{CacheStore, InMemoryCacheStore};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use parking_domain::{
    AuthenticatedCaller, CallerId, CallerRole, PageRequest, ResidenceId, SectionId, VehicleId,
};
use parking_usecase::ParkingAccess;
use serde::Serialize;
use shared::{AccessConfig, CacheConfig};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "parking-access")]
#[command(about = "Authorization-aware cached access to vehicles and parking sections")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Role of the calling user
    #[arg(short, long, global = true, default_value = "ADMIN")]
    role: String,

    /// Id of the calling user
    #[arg(long, global = true, default_value = "cli")]
    caller: String,

    /// Residence of the calling user, for RESIDENT callers
    #[arg(long, global = true)]
    residence: Option<String>,

    /// Read from the record store even if a cached value exists
    #[arg(long, global = true)]
    bypass_cache: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Read vehicles
    #[command(subcommand)]
    Vehicles(VehicleCommand),
    /// Read parking sections
    #[command(subcommand)]
    Sections(SectionCommand),
    /// Walk through the caching and authorization behaviour
    Demo,
}

#[derive(Subcommand, Debug)]
enum VehicleCommand {
    List(PageArgs),
    Get { id: String },
}

#[derive(Subcommand, Debug)]
enum SectionCommand {
    List(PageArgs),
    Get {
        id: String,
    },
    /// Reserved slots of a section
    Slots {
        id: String,
    },
    /// Revenue of a section, both days inclusive
    Revenue {
        id: String,
        #[arg(long)]
        from: NaiveDate,
        #[arg(long)]
        to: NaiveDate,
    },
}

#[derive(clap::Args, Debug)]
struct PageArgs {
    #[arg(long)]
    page: Option<u32>,
    #[arg(long)]
    limit: Option<u32>,
}

impl PageArgs {
    fn request(&self) -> PageRequest {
        PageRequest {
            page: self.page,
            limit: self.limit,
        }
    }
}

impl Cli {
    fn authenticated_caller(&self) -> AuthenticatedCaller {
        let caller = AuthenticatedCaller::new(
            CallerId::new(self.caller.as_str()),
            CallerRole::parse(&self.role),
        );
        match &self.residence {
            Some(residence) => caller.with_residence(ResidenceId::new(residence.as_str())),
            None => caller,
        }
    }

    fn access_config(&self) -> anyhow::Result<AccessConfig> {
        match &self.config {
            Some(path) => AccessConfig::from_file(path)
                .with_context(|| format!("failed to load config from {}", path.display())),
            None => Ok(AccessConfig::default()),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.access_config()?;

    // ========================================
    // Dependency Injection - Wire up the system
    // ========================================

    let vehicles = Arc::new(seed::vehicles()?);
    let sections = Arc::new(seed::sections()?);
    let cache_store = cache_store(&config.cache).await?;
    let access = ParkingAccess::new(vehicles, sections, cache_store, &config);

    info!(
        ttl_secs = config.cache.ttl_secs,
        consistency = ?config.consistency,
        cache_enabled = config.cache.enabled,
        "parking access ready"
    );

    let caller = cli.authenticated_caller();
    let bypass = cli.bypass_cache;

    match &cli.command {
        Some(Commands::Vehicles(VehicleCommand::List(page))) => {
            print_json(&access.vehicles.list(&caller, page.request(), bypass).await?)
        }
        Some(Commands::Vehicles(VehicleCommand::Get { id })) => print_json(
            &access
                .vehicles
                .get(&caller, &VehicleId::new(id.as_str()), bypass)
                .await?,
        ),
        Some(Commands::Sections(SectionCommand::List(page))) => {
            print_json(&access.sections.list(&caller, page.request(), bypass).await?)
        }
        Some(Commands::Sections(SectionCommand::Get { id })) => print_json(
            &access
                .sections
                .get(&caller, &SectionId::new(id.as_str()), bypass)
                .await?,
        ),
        Some(Commands::Sections(SectionCommand::Slots { id })) => print_json(
            &access
                .sections
                .list_reserved_slots(&caller, &SectionId::new(id.as_str()), bypass)
                .await?,
        ),
        Some(Commands::Sections(SectionCommand::Revenue { id, from, to })) => print_json(
            &access
                .sections
                .revenue_report(&caller, &SectionId::new(id.as_str()), *from, *to, bypass)
                .await?,
        ),
        Some(Commands::Demo) | None => demo(&access).await,
    }
}

#[cfg(feature = "redis")]
async fn cache_store(config: &CacheConfig) -> anyhow::Result<Arc<dyn CacheStore>> {
    match &config.redis_url {
        Some(url) => {
            let store = cache::RedisCacheStore::connect(url)
                .await
                .context("failed to connect to the redis cache")?;
            Ok(Arc::new(store))
        }
        None => Ok(Arc::new(InMemoryCacheStore::new())),
    }
}

#[cfg(not(feature = "redis"))]
async fn cache_store(config: &CacheConfig) -> anyhow::Result<Arc<dyn CacheStore>> {
    if config.redis_url.is_some() {
        warn!("redisUrl is set but this build has no redis support, using the in-memory cache");
    }
    Ok(Arc::new(InMemoryCacheStore::new()))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn demo(access: &ParkingAccess) -> anyhow::Result<()> {
    let admin = AuthenticatedCaller::new(CallerId::new("admin-1"), CallerRole::Admin);
    let security = AuthenticatedCaller::new(CallerId::new("guard-7"), CallerRole::Security);
    let resident = AuthenticatedCaller::new(CallerId::new("resident-12"), CallerRole::Resident)
        .with_residence(ResidenceId::new("r-12"));
    let page = PageRequest::new(1, 10);

    info!("🚗 Security lists vehicles, twice");
    let first = access.vehicles.list(&security, page, false).await?;
    let second = access.vehicles.list(&security, page, false).await?;
    info!(count = first.len(), same = (first == second), "   ✓ second read served from cache");

    info!("🔒 Resident reads vehicles");
    let own = access.vehicles.list(&resident, page, false).await?;
    info!(count = own.len(), "   ✓ only the resident's own vehicles");
    match access
        .vehicles
        .get(&resident, &VehicleId::new("v-102"), false)
        .await
    {
        Ok(_) => warn!("   ✗ resident read a vehicle outside their residence"),
        Err(e) => info!(error = %e, "   ✓ foreign vehicle refused"),
    }

    info!("✏️  Admin changes a plate after it was cached");
    let id = VehicleId::new("v-103");
    access.vehicles.get(&admin, &id, false).await?;
    access.vehicles.update_plate(&admin, &id, "dlv-556").await?;
    let cached = access.vehicles.get(&admin, &id, false).await?;
    let fresh = access.vehicles.get(&admin, &id, true).await?;
    info!(
        cached = cached.plate(),
        fresh = fresh.plate(),
        "   ✓ cached read vs bypass read"
    );

    info!("🅿️  Sections");
    let visible = access.sections.list(&resident, PageRequest::all(), false).await?;
    info!(count = visible.len(), "   ✓ sections the resident is privileged for");
    let section = SectionId::new("s-north");
    let slots = access.sections.list_reserved_slots(&resident, &section, false).await?;
    info!(count = slots.len(), "   ✓ reserved slots");

    let from = NaiveDate::from_ymd_opt(2026, 10, 1).context("invalid report start")?;
    let to = NaiveDate::from_ymd_opt(2026, 10, 31).context("invalid report end")?;
    let report = access
        .sections
        .revenue_report(&admin, &section, from, to, false)
        .await?;
    info!(
        reservations = report.reservation_count,
        total_cents = report.total_cents,
        "   ✓ revenue report"
    );
    if let Err(e) = access
        .sections
        .revenue_report(&security, &section, from, to, false)
        .await
    {
        info!(error = %e, "   ✓ revenue report refused for security");
    }

    Ok(())
}
