//! Sales service (`/vendas`)

use std::sync::Arc;

use async_trait::async_trait;
use shared::{Sale, SaleForm};

use super::{CollectionApi, Operation, Resource, classify, require_id};
use crate::error::ServiceResult;
use crate::http::{HttpClient, NetworkHttpClient};

/// Sales endpoints beyond plain CRUD
#[async_trait]
pub trait SaleApi: CollectionApi<Sale> {
    /// Sales between two `YYYY-MM-DD` dates, inclusive
    async fn by_period(&self, inicio: &str, fim: &str) -> ServiceResult<Vec<Sale>>;
}

pub struct SalesService<C = NetworkHttpClient> {
    http: Arc<C>,
}

impl<C: HttpClient> SalesService<C> {
    pub fn new(http: Arc<C>) -> Self {
        Self { http }
    }
}

const RESOURCE: Resource = Resource::Sales;

#[async_trait]
impl<C: HttpClient + 'static> CollectionApi<Sale> for SalesService<C> {
    #[tracing::instrument(skip(self))]
    async fn list(&self) -> ServiceResult<Vec<Sale>> {
        self.http
            .get("vendas")
            .await
            .map_err(|e| classify(e, RESOURCE, Operation::List))
    }

    #[tracing::instrument(skip(self))]
    async fn get(&self, id: &str) -> ServiceResult<Sale> {
        let id = require_id(id, RESOURCE)?;
        self.http
            .get(&format!("vendas/{}", id))
            .await
            .map_err(|e| classify(e, RESOURCE, Operation::Get))
    }

    #[tracing::instrument(skip_all, fields(produto = %data.nome_produto))]
    async fn create(&self, data: SaleForm) -> ServiceResult<Sale> {
        self.http
            .post("vendas", &data)
            .await
            .map_err(|e| classify(e, RESOURCE, Operation::Create))
    }

    #[tracing::instrument(skip(self, data))]
    async fn update(&self, id: &str, data: SaleForm) -> ServiceResult<Sale> {
        let id = require_id(id, RESOURCE)?;
        self.http
            .put(&format!("vendas/{}", id), &data)
            .await
            .map_err(|e| classify(e, RESOURCE, Operation::Update))
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: &str) -> ServiceResult<()> {
        let id = require_id(id, RESOURCE)?;
        self.http
            .delete(&format!("vendas/{}", id))
            .await
            .map_err(|e| classify(e, RESOURCE, Operation::Delete))
    }
}

#[async_trait]
impl<C: HttpClient + 'static> SaleApi for SalesService<C> {
    #[tracing::instrument(skip(self))]
    async fn by_period(&self, inicio: &str, fim: &str) -> ServiceResult<Vec<Sale>> {
        self.http
            .post_empty(&format!("vendas/{}/{}", inicio.trim(), fim.trim()))
            .await
            .map_err(|e| classify(e, RESOURCE, Operation::ByPeriod))
    }
}
