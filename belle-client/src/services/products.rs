//! Products service (`/produto`)

use std::sync::Arc;

use async_trait::async_trait;
use shared::{Product, ProductForm};

use super::{CollectionApi, Operation, Resource, classify, require_id};
use crate::error::ServiceResult;
use crate::http::{HttpClient, NetworkHttpClient};

#[async_trait]
pub trait ProductApi: CollectionApi<Product> {
    /// Case-insensitive name search over the full list
    async fn search(&self, nome: &str) -> ServiceResult<Vec<Product>> {
        let products = self.list().await?;
        Ok(products.into_iter().filter(|p| p.name_contains(nome)).collect())
    }
}

pub struct ProductsService<C = NetworkHttpClient> {
    http: Arc<C>,
}

impl<C: HttpClient> ProductsService<C> {
    pub fn new(http: Arc<C>) -> Self {
        Self { http }
    }
}

const RESOURCE: Resource = Resource::Products;

#[async_trait]
impl<C: HttpClient + 'static> CollectionApi<Product> for ProductsService<C> {
    #[tracing::instrument(skip(self))]
    async fn list(&self) -> ServiceResult<Vec<Product>> {
        self.http
            .get("produto")
            .await
            .map_err(|e| classify(e, RESOURCE, Operation::List))
    }

    #[tracing::instrument(skip(self))]
    async fn get(&self, id: &str) -> ServiceResult<Product> {
        let id = require_id(id, RESOURCE)?;
        self.http
            .get(&format!("produto/{}", id))
            .await
            .map_err(|e| classify(e, RESOURCE, Operation::Get))
    }

    #[tracing::instrument(skip_all, fields(produto = %data.nome_produto))]
    async fn create(&self, data: ProductForm) -> ServiceResult<Product> {
        self.http
            .post("produto", &data)
            .await
            .map_err(|e| classify(e, RESOURCE, Operation::Create))
    }

    #[tracing::instrument(skip(self, data))]
    async fn update(&self, id: &str, data: ProductForm) -> ServiceResult<Product> {
        let id = require_id(id, RESOURCE)?;
        self.http
            .put(&format!("produto/{}", id), &data)
            .await
            .map_err(|e| classify(e, RESOURCE, Operation::Update))
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: &str) -> ServiceResult<()> {
        let id = require_id(id, RESOURCE)?;
        self.http
            .delete(&format!("produto/{}", id))
            .await
            .map_err(|e| classify(e, RESOURCE, Operation::Delete))
    }
}

impl<C: HttpClient + 'static> ProductApi for ProductsService<C> {}
