//! Sales store

use shared::{Sale, SaleFilter};

use super::entity::EntityStore;
use crate::error::ServiceResult;
use crate::services::SaleApi;

pub type SalesStore = EntityStore<Sale, dyn SaleApi>;

impl<A: SaleApi + ?Sized> EntityStore<Sale, A> {
    /// Sales in `[inicio, fim]`. The owned collection is not replaced.
    pub async fn by_period(&self, inicio: &str, fim: &str) -> ServiceResult<Vec<Sale>> {
        self.query(self.api().by_period(inicio, fim)).await
    }

    /// Loaded sales matching `filter`, in collection order
    pub async fn filtered(&self, filter: &SaleFilter) -> Vec<Sale> {
        filter_sales(&self.items().await, filter)
    }
}

/// Client-side payment-method / name filter
pub fn filter_sales(items: &[Sale], filter: &SaleFilter) -> Vec<Sale> {
    filter.apply(items).into_iter().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::CollectionApi;
    use crate::sync::entity::tests::{FakeSales, sale};
    use async_trait::async_trait;
    use shared::PaymentMethod;
    use std::sync::Arc;

    #[async_trait]
    impl SaleApi for FakeSales {
        async fn by_period(&self, _inicio: &str, _fim: &str) -> ServiceResult<Vec<Sale>> {
            Ok(self.items.lock().unwrap().iter().take(1).cloned().collect())
        }
    }

    #[tokio::test]
    async fn test_by_period_keeps_collection() {
        let api: Arc<dyn SaleApi> = Arc::new(FakeSales::with(vec![sale("1", 100, 1), sale("2", 100, 1)]));
        let store: SalesStore = EntityStore::new(api.clone());
        store.fetch_all().await;

        let found = store.by_period("2024-01-01", "2024-01-31").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(store.items().await.len(), 2);
        assert_eq!(api.list().await.unwrap().len(), 2);
    }

    #[test]
    fn test_filter_by_payment_method() {
        let mut cash = sale("1", 100, 1);
        cash.forma_pagamento = PaymentMethod::Dinheiro;
        let items = vec![cash, sale("2", 100, 1)];

        let filter = SaleFilter {
            forma_pagamento: Some(PaymentMethod::Pix),
            nome_produto: None,
        };
        let filtered = filter_sales(&items, &filter);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "2");
        assert_eq!(filter_sales(&items, &SaleFilter::default()).len(), 2);
    }
}
