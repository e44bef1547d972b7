//! Application State - Shared state handed to every route and middleware

use crate::core::cache::ResponseCache;
use crate::monitoring::ProcessMonitor;
use crate::repositories::{AreaRepository, ContatoRepository, UsuarioRepository};
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::MySqlPool;
use std::time::Duration;

pub struct AppState {
    /// Repository for users
    pub usuario: UsuarioRepository,

    /// Repository for area codes
    pub area: AreaRepository,

    /// Repository for contacts
    pub contato: ContatoRepository,

    /// Secret key used to sign JWT tokens
    pub jwt_secret: String,

    /// Lifetime of issued tokens
    pub jwt_expiration_hours: i64,

    /// Cache for listing responses
    pub cache: ResponseCache,

    /// Renders the Prometheus recorder on `/metrics`, `None` when no recorder is installed
    pub metrics: Option<PrometheusHandle>,

    /// CPU and memory sampler for the server process
    pub process: ProcessMonitor,
}

impl AppState {
    /// Builds the state wiring every repository to the read and write pools.
    ///
    /// # Arguments
    /// * `reader` - Pool used for queries
    /// * `writer` - Pool used for inserts, updates and deletes
    /// * `jwt_secret` - Key used to sign JWT tokens
    pub fn new(reader: MySqlPool, writer: MySqlPool, jwt_secret: String) -> Self {
        Self {
            usuario: UsuarioRepository::new(reader.clone(), writer.clone()),
            area: AreaRepository::new(reader.clone(), writer.clone()),
            contato: ContatoRepository::new(reader, writer),
            jwt_secret,
            jwt_expiration_hours: 24,
            cache: ResponseCache::new(Duration::from_secs(60)),
            metrics: None,
            process: ProcessMonitor::new(),
        }
    }

    pub fn with_jwt_expiration_hours(mut self, hours: i64) -> Self {
        self.jwt_expiration_hours = hours;
        self
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache = ResponseCache::new(ttl);
        self
    }
}
