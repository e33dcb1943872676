//! Client facade
//!
//! Wires one session, one transport and the services together and hands out
//! stores bound to them.

use std::sync::Arc;

use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::http::NetworkHttpClient;
use crate::services::{
    AuthApi, AuthService, ChartApi, ChartsService, ProductApi, ProductsService, SaleApi,
    SalesService, UserApi, UsersService,
};
use crate::session::Session;
use crate::sync::{AuthStore, ChartStore, EntityStore, ProductsStore, SalesStore, UsersStore};

#[derive(Debug, Clone)]
pub struct BelleClient {
    config: ClientConfig,
    session: Session,
    http: Arc<NetworkHttpClient>,
}

impl BelleClient {
    /// Build a client with the session store the config selects
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let session = Session::new(config.session_store());
        Self::with_session(config, session)
    }

    pub fn with_session(config: ClientConfig, session: Session) -> ClientResult<Self> {
        let http = Arc::new(NetworkHttpClient::new(&config, session.clone())?);
        tracing::debug!(base_url = %http.base_url(), timeout = config.timeout, "Client ready");
        Ok(Self {
            config,
            session,
            http,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn http(&self) -> &Arc<NetworkHttpClient> {
        &self.http
    }

    pub fn sales(&self) -> Arc<dyn SaleApi> {
        Arc::new(SalesService::new(self.http.clone()))
    }

    pub fn users(&self) -> Arc<dyn UserApi> {
        Arc::new(UsersService::new(self.http.clone()))
    }

    pub fn products(&self) -> Arc<dyn ProductApi> {
        Arc::new(ProductsService::new(self.http.clone()))
    }

    pub fn charts(&self) -> Arc<dyn ChartApi> {
        Arc::new(ChartsService::new(self.http.clone()))
    }

    pub fn auth(&self) -> Arc<dyn AuthApi> {
        Arc::new(AuthService::new(self.http.clone()))
    }

    pub fn sales_store(&self) -> Arc<SalesStore> {
        Arc::new(EntityStore::new(self.sales()))
    }

    pub fn users_store(&self) -> Arc<UsersStore> {
        Arc::new(EntityStore::new(self.users()))
    }

    pub fn products_store(&self) -> Arc<ProductsStore> {
        Arc::new(EntityStore::new(self.products()))
    }

    pub fn chart_store(&self) -> Arc<ChartStore> {
        Arc::new(ChartStore::new(self.charts()))
    }

    pub fn auth_store(&self) -> Arc<AuthStore> {
        Arc::new(AuthStore::new(self.auth(), self.session.clone()))
    }
}
