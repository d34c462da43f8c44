use std::{sync::Arc, time::Duration};

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, web::ServiceConfig, App, HttpServer};
use clover_tools::CloverApi;
use log::*;
use print_relay_engine::{
    token_store::{JsonTokenStore, TokenStore},
    traits::MerchantProvider,
    LatestOrderApi,
    OrderPoller,
    PollerConfig,
    PollerControl,
    TokenManager,
};

use crate::{
    config::ServerConfig,
    errors::ServerError,
    integrations::clover::CloverGateway,
    routes::{
        health,
        oauth_login,
        AuthorizeUrl,
        LatestOrderRoute,
        OauthCallbackRoute,
        PollingStatusRoute,
        StartPollingRoute,
        StopPollingRoute,
    },
};

/// Everything the handlers share. One instance is built at startup and cloned into every worker.
pub struct RelayState<S, P> {
    pub tokens: Arc<TokenManager<S, P>>,
    pub control: Arc<PollerControl<S, P>>,
    pub latest_order: Arc<LatestOrderApi<S, P>>,
    pub authorize_url: AuthorizeUrl,
}

impl<S, P> Clone for RelayState<S, P> {
    fn clone(&self) -> Self {
        Self {
            tokens: Arc::clone(&self.tokens),
            control: Arc::clone(&self.control),
            latest_order: Arc::clone(&self.latest_order),
            authorize_url: self.authorize_url.clone(),
        }
    }
}

impl<S, P> RelayState<S, P>
where
    S: TokenStore + 'static,
    P: MerchantProvider,
{
    pub fn new(store: S, provider: Arc<P>, poller_config: &PollerConfig, authorize_url: AuthorizeUrl) -> Self {
        let tokens = Arc::new(TokenManager::new(store, Arc::clone(&provider)));
        let poller = OrderPoller::new(Arc::clone(&tokens), Arc::clone(&provider), poller_config);
        let control = Arc::new(PollerControl::new(poller, poller_config.interval));
        let latest_order = Arc::new(LatestOrderApi::new(Arc::clone(&tokens), provider));
        Self { tokens, control, latest_order, authorize_url }
    }
}

/// Registers the relay's shared state and routes on an app or scope.
pub fn configure_relay<S, P>(cfg: &mut ServiceConfig, state: &RelayState<S, P>)
where
    S: TokenStore + 'static,
    P: MerchantProvider,
{
    let api_scope = web::scope("/api")
        .service(StartPollingRoute::<S, P>::new())
        .service(StopPollingRoute::<S, P>::new())
        .service(PollingStatusRoute::<S, P>::new())
        .service(LatestOrderRoute::<S, P>::new());
    cfg.app_data(web::Data::from(Arc::clone(&state.tokens)))
        .app_data(web::Data::from(Arc::clone(&state.control)))
        .app_data(web::Data::from(Arc::clone(&state.latest_order)))
        .app_data(web::Data::new(state.authorize_url.clone()))
        .service(health)
        .service(oauth_login)
        .service(OauthCallbackRoute::<S, P>::new())
        .service(api_scope);
}

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let api = CloverApi::new(config.clover.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let authorize_url = api.authorize_url().map_err(|e| ServerError::ConfigurationError(e.to_string()))?;
    info!("🔑️ Authorize the app at http://{}:{}/oauth/login", config.host, config.port);
    let provider = Arc::new(CloverGateway::new(api));
    let store = JsonTokenStore::new(config.token_file.clone());
    let state = RelayState::new(store, provider, &config.poller, AuthorizeUrl(authorize_url.to_string()));
    if config.autostart {
        let interval = state.control.start(None).await?;
        info!("🕰️ Polling started automatically every {} ms", interval.as_millis());
    }
    let srv = create_server_instance(&config, state.clone())?;
    let result = srv.await.map_err(|e| ServerError::Unspecified(e.to_string()));
    shutdown_poller(&state.control).await;
    result
}

/// Stops the poller if it is still running once the HTTP server has exited.
pub async fn shutdown_poller<S, P>(control: &PollerControl<S, P>)
where
    S: TokenStore + 'static,
    P: MerchantProvider,
{
    if !control.is_running().await {
        return;
    }
    match control.stop().await {
        Ok(()) => debug!("🕰️ Poller stopped on shutdown"),
        Err(e) => warn!("🕰️ Could not stop the poller on shutdown. {e}"),
    }
}

pub fn create_server_instance<S, P>(config: &ServerConfig, state: RelayState<S, P>) -> Result<Server, ServerError>
where
    S: TokenStore + 'static,
    P: MerchantProvider,
{
    let srv = HttpServer::new(move || {
        let state = state.clone();
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("cpr::access_log"))
            .configure(move |cfg| configure_relay(cfg, &state))
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
