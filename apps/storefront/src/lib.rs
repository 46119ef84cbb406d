//! # Storefront App Library
//!
//! Wiring for the storefront command-line client: startup, state objects
//! and the command implementations. `main.rs` only parses arguments.
//!
//! ## Module Organization
//! ```text
//! storefront_app/
//! ├── lib.rs          ◄─── You are here (startup & AppContext)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── db.rs       ◄─── Local store wrapper
//! │   ├── cart.rs     ◄─── Cart context
//! │   └── config.rs   ◄─── Configuration + session resolution
//! ├── commands/
//! │   ├── catalog.rs  ◄─── Product list / detail / search
//! │   ├── cart.rs     ◄─── Cart manipulation
//! │   ├── campaigns.rs◄─── Discount campaign admin
//! │   ├── history.rs  ◄─── Recently viewed, comparison, language
//! │   ├── wishlist.rs ◄─── Wishlist
//! │   ├── orders.rs   ◄─── Checkout, order history, admin board
//! │   └── reviews.rs  ◄─── Product reviews
//! ├── output.rs       ◄─── Text / JSON output
//! └── error.rs        ◄─── AppError for commands
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Application Startup                               │
//! │                                                                         │
//! │  1. Initialize Logging ───────────────────────────────────────────────► │
//! │     • tracing-subscriber with env filter                                │
//! │     • Default: info,storefront=debug,sqlx=warn; RUST_LOG overrides      │
//! │                                                                         │
//! │  2. Load Configuration ───────────────────────────────────────────────► │
//! │     • defaults → storefront.toml → STOREFRONT_* → validate()            │
//! │                                                                         │
//! │  3. Open Local Store ─────────────────────────────────────────────────► │
//! │     • STOREFRONT_DB_PATH, else <data dir>/local.db                      │
//! │     • Run pending migrations                                            │
//! │                                                                         │
//! │  4. Initialize State Objects ─────────────────────────────────────────► │
//! │     • ConfigState, DbState                                              │
//! │     • Session: user_{id} when signed in, else the stored guest id       │
//! │     • CartState: empty until the command refreshes it                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod error;
pub mod output;
pub mod state;

use storefront_client::{ApiClient, Services, StorefrontConfig};
use storefront_db::{Database, DbConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

use error::{AppError, AppResult, ErrorCode};
use output::Output;
use state::{CartState, ConfigState, DbState};

/// Everything a command needs, built once per run.
#[derive(Debug)]
pub struct AppContext {
    pub config: ConfigState,
    pub db: DbState,
    pub cart: CartState,
    pub services: Services,
    pub output: Output,
}

impl AppContext {
    /// Opens the local store, resolves the session and builds the services.
    pub async fn init(config: StorefrontConfig, output: Output) -> AppResult<Self> {
        let db_path = config
            .db_path()
            .ok_or_else(|| AppError::new(ErrorCode::ConfigError, "Could not determine data directory"))?;
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::new(
                    ErrorCode::StorageError,
                    format!("Could not create {}: {}", parent.display(), e),
                )
            })?;
        }
        info!(?db_path, "Local store path determined");

        let db = DbState::new(Database::new(DbConfig::new(db_path)).await?);
        Self::with_database(config, db, output).await
    }

    /// Builds the context over an already open store.
    pub async fn with_database(
        config: StorefrontConfig,
        db: DbState,
        output: Output,
    ) -> AppResult<Self> {
        let api = ApiClient::from_config(&config)?;
        let services = Services::new(api);

        let config = ConfigState::new(config);
        let session = config.session(&db).await?;
        let cart = CartState::new(services.cart.clone(), &session);
        info!(session = %session, backend = %config.inner().api.base_url, "State initialized");

        Ok(AppContext {
            config,
            db,
            cart,
            services,
            output,
        })
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so command output on stdout stays clean.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=storefront_client=trace` - Trace backend calls only
/// - Default: `info,storefront=debug,sqlx=warn`
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,storefront=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
