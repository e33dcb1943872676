//! Charts service (`/graficos`)

use std::sync::Arc;

use async_trait::async_trait;
use shared::{ChartRequest, ChartSeries, ChartStats};

use super::{Operation, Resource, classify};
use crate::error::ServiceResult;
use crate::http::{HttpClient, NetworkHttpClient};

/// Per-payment-method aggregates for a period
#[async_trait]
pub trait ChartApi: Send + Sync {
    /// Number of sales per payment method (pie chart)
    async fn payment_counts(&self, request: &ChartRequest) -> ServiceResult<ChartSeries>;

    /// Amount sold per payment method
    async fn payment_totals(&self, request: &ChartRequest) -> ServiceResult<ChartSeries>;

    /// Dashboard figures derived from both aggregates
    async fn stats(&self, request: &ChartRequest) -> ServiceResult<ChartStats> {
        let (counts, totals) =
            tokio::join!(self.payment_counts(request), self.payment_totals(request));
        let (counts, totals) = (counts?.normalize(), totals?.normalize());
        Ok(ChartStats::from_series(
            &counts,
            &totals,
            &request.data_inicio,
            &request.data_fim,
        ))
    }
}

pub struct ChartsService<C = NetworkHttpClient> {
    http: Arc<C>,
}

impl<C: HttpClient> ChartsService<C> {
    pub fn new(http: Arc<C>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl<C: HttpClient + 'static> ChartApi for ChartsService<C> {
    #[tracing::instrument(skip(self))]
    async fn payment_counts(&self, request: &ChartRequest) -> ServiceResult<ChartSeries> {
        self.http
            .post("graficos/gerarGraficoPizza", request)
            .await
            .map_err(|e| classify(e, Resource::Charts, Operation::Chart))
    }

    #[tracing::instrument(skip(self))]
    async fn payment_totals(&self, request: &ChartRequest) -> ServiceResult<ChartSeries> {
        self.http
            .post("graficos/gerarGraficoTotalVendas", request)
            .await
            .map_err(|e| classify(e, Resource::Charts, Operation::Chart))
    }
}
