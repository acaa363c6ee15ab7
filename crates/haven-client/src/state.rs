//! Shared client components.

use std::sync::Arc;

use haven_core::config::AppConfig;
use haven_core::result::AppResult;
use haven_core::traits::{CookieSource, Document, Navigator, Notifier, Storage};
use haven_realtime::{RealtimeChannel, SecurityReactor, Transport};
use haven_routing::{NavigationGuard, RouteTable};
use haven_session::{
    ApiClient, AuthApi, CredentialStore, Eviction, HttpAuthApi, SessionStore, SessionSynchronizer,
    SuspensionInterceptor,
};

/// The host environment the client runs in.
#[derive(Debug, Clone)]
pub struct Platform {
    /// Persisted key/value storage.
    pub storage: Arc<dyn Storage>,
    /// Cookie jar.
    pub cookies: Arc<dyn CookieSource>,
    /// History and location.
    pub navigator: Arc<dyn Navigator>,
    /// Toasts.
    pub notifier: Arc<dyn Notifier>,
    /// Document-level styling.
    pub document: Arc<dyn Document>,
}

/// Every shared component of the client.
///
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct ClientState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Host environment
    pub platform: Platform,

    // ── Session ──────────────────────────────────────────────
    /// Stored credential triple
    pub credentials: Arc<CredentialStore>,
    /// Identity and lifecycle phase
    pub store: Arc<SessionStore>,
    /// Server-initiated session removal
    pub eviction: Arc<Eviction>,
    /// REST client with the suspension interceptor installed
    pub client: Arc<ApiClient>,
    /// Auth endpoints
    pub api: Arc<dyn AuthApi>,
    /// Bootstrap and periodic verification
    pub synchronizer: Arc<SessionSynchronizer>,

    // ── Routing & Realtime ───────────────────────────────────
    /// Per-navigation gate
    pub guard: Arc<NavigationGuard>,
    /// Realtime connection manager
    pub realtime: Arc<RealtimeChannel>,
    /// Account event handling
    pub reactor: SecurityReactor,
}

impl ClientState {
    /// Build every component over the given platform and realtime transport.
    pub fn build(
        config: AppConfig,
        platform: Platform,
        transport: Arc<dyn Transport>,
    ) -> AppResult<Self> {
        let credentials = Arc::new(CredentialStore::new(Arc::clone(&platform.storage)));
        let store = Arc::new(SessionStore::new(
            Arc::clone(&platform.storage),
            config.session.snapshot_key.clone(),
        ));
        let eviction = Arc::new(Eviction::new(
            Arc::clone(&store),
            Arc::clone(&credentials),
            Arc::clone(&platform.navigator),
            Arc::clone(&platform.notifier),
            config.session.sign_in_path.clone(),
            config.session.redirect_delay(),
        ));

        let client = Arc::new(
            ApiClient::new(
                config.api.base_url.clone(),
                config.api.request_timeout(),
                Arc::clone(&credentials),
            )?
            .with_interceptor(Arc::new(SuspensionInterceptor::new(Arc::clone(&eviction)))),
        );
        let api: Arc<dyn AuthApi> = Arc::new(HttpAuthApi::new(Arc::clone(&client), &config.api));

        let synchronizer = Arc::new(SessionSynchronizer::new(
            Arc::clone(&api),
            Arc::clone(&store),
            Arc::clone(&credentials),
            Arc::clone(&eviction),
            config.session.check_interval(),
        ));

        let guard = Arc::new(NavigationGuard::new(
            RouteTable::standard(),
            config.session.sign_in_path.clone(),
        ));
        let realtime = Arc::new(RealtimeChannel::new(
            transport,
            Arc::clone(&credentials),
            Arc::clone(&store),
            Arc::clone(&platform.cookies),
            Arc::clone(&platform.navigator),
            config.realtime.clone(),
            &config.session.sign_in_path,
        ));
        let reactor = SecurityReactor::new(Arc::clone(&store), Arc::clone(&eviction));

        Ok(Self {
            config: Arc::new(config),
            platform,
            credentials,
            store,
            eviction,
            client,
            api,
            synchronizer,
            guard,
            realtime,
            reactor,
        })
    }
}
