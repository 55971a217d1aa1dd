//! Reusable portal server runtime.
//!
//! [`AppServices`] wires the flat-file repositories into the application
//! services. [`ServerHandle`] owns the HTTP listener and its graceful
//! shutdown. The CLI binary and the router tests both build on these.

use std::sync::{Arc, OnceLock};

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::{error, info, warn};

use crate::application::{
    AssetService, ImportOutcome, ImportService, LibraryService, RepairService, SessionRegistry,
    SessionService, SettingsService, SharedSessionRegistry, UserService,
};
use crate::config::{AppConfig, LoggingConfig};
use crate::domain::{DomainResult, PermissionSet};
use crate::infrastructure::{
    CsvEquipmentRepository, CsvImportSources, FsLibraryStore, JsonRepairRepository,
    JsonSettingsRepository, JsonUserRepository, TokenConfig,
};
use crate::interfaces::http::create_api_router;
use crate::shared::shutdown::{ShutdownCoordinator, ShutdownSignal};

// ── Services ───────────────────────────────────────────────────────

/// Every application service, built over the configured data files.
#[derive(Clone)]
pub struct AppServices {
    pub users: Arc<UserService<JsonUserRepository>>,
    pub sessions: Arc<SessionService<JsonUserRepository>>,
    pub registry: SharedSessionRegistry,
    pub assets: Arc<AssetService>,
    pub import: Arc<ImportService>,
    pub settings: Arc<SettingsService>,
    pub repairs: Arc<RepairService>,
    pub library: Arc<LibraryService>,
    pub reference_year: i32,
}

impl AppServices {
    pub fn from_config(config: &AppConfig) -> Self {
        let storage = &config.storage;

        let user_repo = Arc::new(JsonUserRepository::new(storage.users_path()));
        let default_permissions: PermissionSet =
            config.accounts.default_permissions.iter().copied().collect();
        let users = Arc::new(UserService::new(user_repo, default_permissions));

        let registry: SharedSessionRegistry = Arc::new(SessionRegistry::new(
            chrono::Duration::hours(config.security.session_hours),
        ));
        let sessions = Arc::new(SessionService::new(
            users.clone(),
            registry.clone(),
            TokenConfig::from_security(&config.security),
        ));

        let equipment = Arc::new(CsvEquipmentRepository::new(storage.equipment_path()));
        let reference_year = config.assets.reference_year;

        Self {
            users,
            sessions,
            registry,
            assets: Arc::new(AssetService::new(equipment.clone(), reference_year)),
            import: Arc::new(ImportService::new(
                Arc::new(CsvImportSources::new(config.import.clone())),
                equipment,
            )),
            settings: Arc::new(SettingsService::new(Arc::new(JsonSettingsRepository::new(
                storage.settings_path(),
            )))),
            repairs: Arc::new(RepairService::new(
                Arc::new(JsonRepairRepository::new(storage.repairs_path())),
                config.repairs.departments.clone(),
            )),
            library: Arc::new(LibraryService::new(Arc::new(FsLibraryStore::new(
                &config.library,
            )))),
            reference_year,
        }
    }

    /// Create the settings and user files on first start.
    pub async fn initialize_stores(&self) -> DomainResult<()> {
        self.settings.current().await?;
        self.users.ensure_initialized().await?;
        Ok(())
    }
}

/// One-shot import used by `--run-import`.
pub async fn run_import_once(config: &AppConfig) -> DomainResult<ImportOutcome> {
    let services = AppServices::from_config(config);
    let outcome = services.import.run().await?;
    if outcome.written() {
        info!(
            rows = outcome.rows,
            sources = ?outcome.sources,
            "Import written to {}",
            config.storage.equipment_path().display()
        );
    } else {
        warn!(sources = ?outcome.sources, "Import produced no rows; equipment table unchanged");
    }
    Ok(outcome)
}

// ── ServerHandle ───────────────────────────────────────────────────

/// Handle to a running portal server.
///
/// ```rust,no_run
/// use medequip::config::AppConfig;
/// use medequip::server::ServerHandle;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let handle = ServerHandle::start(AppConfig::default()).await?;
///     handle.shutdown().await;
///     Ok(())
/// }
/// ```
pub struct ServerHandle {
    pub services: AppServices,
    /// The configuration the server was started with.
    pub config: AppConfig,
    /// Port the HTTP listener is bound to.
    pub port: u16,

    shutdown: ShutdownCoordinator,
    api_task: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    /// Initialize the data files, then serve the REST API until shutdown.
    pub async fn start(config: AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        info!("Starting medical equipment portal...");

        let prometheus_handle = prometheus_handle();

        let services = AppServices::from_config(&config);
        services.initialize_stores().await?;
        info!(
            data_dir = %config.storage.data_dir.display(),
            "Data files ready"
        );

        let shutdown = ShutdownCoordinator::new(config.server.shutdown_timeout);
        let shutdown_signal = shutdown.signal();

        let router = create_api_router(&services, prometheus_handle);

        let addr = config.listen_address();
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        let port = listener.local_addr()?.port();
        info!("REST API listening on http://{}", addr);
        info!("Swagger UI available at http://{}/docs/", addr);

        let api_shutdown = shutdown_signal.clone();
        let api_server = axum::serve(listener, router).with_graceful_shutdown(async move {
            api_shutdown.wait().await;
            info!("REST API received shutdown signal");
        });

        let api_task = tokio::spawn(async move {
            if let Err(e) = api_server.await {
                error!("REST API server error: {}", e);
            }
        });

        Ok(Self {
            services,
            config,
            port,
            shutdown,
            api_task,
        })
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Install SIGTERM / SIGINT listeners that trigger shutdown.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    /// Wait for the shutdown signal, then give the listener
    /// `server.shutdown_timeout` seconds to drain.
    pub async fn wait(self) {
        let Self {
            services,
            shutdown,
            api_task,
            ..
        } = self;

        shutdown
            .shutdown_with_cleanup(|| async move {
                match api_task.await {
                    Ok(()) => info!("REST API server stopped"),
                    Err(e) => error!("REST API server task panicked: {}", e),
                }
            })
            .await;

        info!(
            open_sessions = services.registry.len(),
            "Portal shutdown complete"
        );
    }

    pub async fn shutdown(self) {
        info!("Shutting down portal...");
        self.trigger_shutdown();
        self.wait().await;
    }

    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }
}

// ── Helpers ────────────────────────────────────────────────────────

/// The global recorder can only be installed once per process; later
/// starts in the same process reuse the first handle.
fn prometheus_handle() -> Option<PrometheusHandle> {
    static PROM_HANDLE: OnceLock<Option<PrometheusHandle>> = OnceLock::new();

    PROM_HANDLE
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                info!("Prometheus metrics recorder installed");
                Some(handle)
            }
            Err(e) => {
                warn!("Prometheus recorder unavailable, /metrics disabled: {}", e);
                None
            }
        })
        .clone()
}

/// Initialize tracing from the logging config. `RUST_LOG` takes precedence
/// over the configured level.
pub fn init_tracing(config: &LoggingConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.level));

    match config.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}
