//! Products store

use shared::Product;

use super::entity::EntityStore;
use crate::error::ServiceResult;
use crate::services::ProductApi;

pub type ProductsStore = EntityStore<Product, dyn ProductApi>;

impl<A: ProductApi + ?Sized> EntityStore<Product, A> {
    pub async fn search(&self, nome: &str) -> ServiceResult<Vec<Product>> {
        self.query(self.api().search(nome)).await
    }
}
