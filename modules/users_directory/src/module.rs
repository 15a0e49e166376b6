use std::sync::Arc;

use axum::Router;
use modkit::SseBroadcaster;
use tracing::{debug, info};
use utoipa::OpenApi;

use crate::api::rest::{dto::UserEvent, routes, sse_adapter::SseUserEventPublisher};
use crate::config::UsersDirectoryConfig;
use crate::contract::client::UsersDirectoryApi;
use crate::domain::repo::UsersRepository;
use crate::domain::service::Service;
use crate::gateways::local::UsersDirectoryLocalClient;
use crate::infra::latency::SimulatedLatency;
use crate::infra::storage::InMemoryUsersRepository;

/// The users_directory module: owns the service and everything wired around it
/// (store, SSE broadcaster, local client, REST routes).
#[derive(Clone)]
pub struct UsersDirectory {
    service: Arc<Service>,
    sse: SseBroadcaster<UserEvent>,
    client: Arc<dyn UsersDirectoryApi>,
}

impl UsersDirectory {
    /// Wire the module over a fresh in-memory store.
    pub fn new(cfg: UsersDirectoryConfig) -> anyhow::Result<Self> {
        Self::with_repository(cfg, Arc::new(InMemoryUsersRepository::new()))
    }

    /// Wire the module over the given repository.
    pub fn with_repository(
        cfg: UsersDirectoryConfig,
        repo: Arc<dyn UsersRepository>,
    ) -> anyhow::Result<Self> {
        info!("Initializing users_directory module");
        cfg.validate()?;
        debug!(
            default_page_size = cfg.default_page_size,
            max_page_size = cfg.max_page_size,
            unchanged_email = ?cfg.unchanged_email,
            "Loaded users_directory config"
        );

        let sse = SseBroadcaster::<UserEvent>::new(cfg.sse_capacity);
        let events = Arc::new(SseUserEventPublisher::new(sse.clone()));

        let mut service = Service::new(repo, events, cfg.service_config());
        let profile = cfg.latency.profile();
        if !profile.is_zero() {
            info!(?profile, "Simulated latency enabled");
            service = service.with_latency(Arc::new(SimulatedLatency::new(profile)));
        }
        let service = Arc::new(service);

        let client: Arc<dyn UsersDirectoryApi> =
            Arc::new(UsersDirectoryLocalClient::new(service.clone()));

        Ok(Self {
            service,
            sse,
            client,
        })
    }

    pub fn service(&self) -> Arc<Service> {
        self.service.clone()
    }

    /// In-process API for other modules.
    pub fn client(&self) -> Arc<dyn UsersDirectoryApi> {
        self.client.clone()
    }

    pub fn events(&self) -> SseBroadcaster<UserEvent> {
        self.sse.clone()
    }

    /// REST routes plus the SSE stream.
    pub fn router(&self) -> Router {
        info!("Registering users_directory REST routes");
        let router = routes::register_routes(Router::new(), self.service.clone());
        routes::register_users_sse_route(router, self.sse.clone())
    }

    pub fn openapi() -> utoipa::openapi::OpenApi {
        routes::ApiDoc::openapi()
    }
}
