//! Chart store
//!
//! Holds count-by-method, amount-by-method and the derived stats for one
//! period as a single snapshot. A new filter is ignored while a load is
//! running; a load never cancels.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{NaiveDate, Utc};
use shared::{
    ChartRequest, ChartStats, DateRange, PaymentMethod, PaymentSeries, PeriodFilter, PeriodPreset,
};
use tokio::sync::RwLock;

use super::coordinator::RequestCoordinator;
use crate::services::ChartApi;

pub const INVALID_PERIOD_MESSAGE: &str = "Período inválido. Verifique as datas selecionadas.";

/// Chart snapshot
#[derive(Debug, Clone, Default)]
pub struct ChartState {
    pub pizza: Option<PaymentSeries>,
    pub total_vendas: Option<PaymentSeries>,
    pub stats: Option<ChartStats>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub is_initialized: bool,
    pub current_filter: PeriodFilter,
}

impl ChartState {
    fn clear_data(&mut self) {
        self.pizza = None;
        self.total_vendas = None;
        self.stats = None;
    }
}

/// How an `apply_filter` call ended
#[derive(Debug, Clone, PartialEq)]
pub enum ApplyOutcome {
    Applied,
    /// A load was already running
    Ignored,
    /// The period failed validation; no request was made
    InvalidPeriod(String),
    Failed(String),
}

pub struct ChartStore {
    api: Arc<dyn ChartApi>,
    state: RwLock<ChartState>,
    requests: RequestCoordinator,
    started: AtomicBool,
}

impl ChartStore {
    pub fn new(api: Arc<dyn ChartApi>) -> Self {
        Self {
            api,
            state: RwLock::new(ChartState::default()),
            requests: RequestCoordinator::new(),
            started: AtomicBool::new(false),
        }
    }

    /// Current state; `is_loading` reflects whether a load is running now
    pub async fn snapshot(&self) -> ChartState {
        let mut snapshot = self.state.read().await.clone();
        snapshot.is_loading = self.requests.is_busy();
        snapshot
    }

    pub fn is_loading(&self) -> bool {
        self.requests.is_busy()
    }

    /// Load the three aggregates for `filter`, with presets expanded
    /// against `today`.
    ///
    /// Dropping the returned future abandons the load and leaves the
    /// previous snapshot in place.
    #[tracing::instrument(skip(self))]
    pub async fn apply_filter_at(&self, filter: PeriodFilter, today: NaiveDate) -> ApplyOutcome {
        let Some(_load) = self.requests.start_or_ignore() else {
            tracing::debug!("Chart load already running, filter ignored");
            return ApplyOutcome::Ignored;
        };

        self.state.write().await.error = None;

        let (data_inicio, data_fim) = filter.resolve(today);
        if let Err(e) = DateRange::parse(&data_inicio, &data_fim) {
            tracing::warn!(%data_inicio, %data_fim, error = %e, "Rejected chart period");
            let mut state = self.state.write().await;
            state.clear_data();
            state.error = Some(INVALID_PERIOD_MESSAGE.to_string());
            state.is_initialized = true;
            return ApplyOutcome::InvalidPeriod(INVALID_PERIOD_MESSAGE.to_string());
        }

        let request = ChartRequest::new(data_inicio.clone(), data_fim.clone());
        let (counts, totals, stats) = tokio::join!(
            self.api.payment_counts(&request),
            self.api.payment_totals(&request),
            self.api.stats(&request),
        );

        let mut state = self.state.write().await;
        let outcome = match (counts, totals, stats) {
            (Ok(counts), Ok(totals), Ok(stats)) => {
                state.pizza = Some(counts.normalize());
                state.total_vendas = Some(totals.normalize());
                state.stats = Some(stats);
                state.current_filter = filter.with_dates(data_inicio, data_fim);
                tracing::debug!(period = %state.current_filter.summary(), "Chart snapshot updated");
                ApplyOutcome::Applied
            }
            (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => {
                state.clear_data();
                state.error = Some(e.message.clone());
                tracing::warn!(kind = ?e.kind, "Chart load failed: {}", e.message);
                ApplyOutcome::Failed(e.message)
            }
        };
        state.is_initialized = true;
        outcome
    }

    /// [`apply_filter_at`](Self::apply_filter_at) with today's UTC date
    pub async fn apply_filter(&self, filter: PeriodFilter) -> ApplyOutcome {
        self.apply_filter_at(filter, Utc::now().date_naive()).await
    }

    pub async fn set_period_preset(&self, preset: PeriodPreset) -> ApplyOutcome {
        self.apply_filter(PeriodFilter::preset(preset)).await
    }

    pub async fn set_custom_period(&self, data_inicio: &str, data_fim: &str) -> ApplyOutcome {
        self.apply_filter(PeriodFilter::custom(data_inicio, data_fim)).await
    }

    /// Re-apply the current filter (same resolved dates)
    pub async fn refetch(&self) -> ApplyOutcome {
        let filter = self.state.read().await.current_filter.clone();
        self.apply_filter(filter).await
    }

    /// First load with the default month preset, at most once per store
    pub async fn initialize(&self) -> Option<ApplyOutcome> {
        if self.started.swap(true, Ordering::SeqCst) {
            return None;
        }
        Some(self.apply_filter(PeriodFilter::default()).await)
    }

    pub async fn clear_error(&self) {
        self.state.write().await.error = None;
    }

    pub async fn period_summary(&self) -> String {
        self.state.read().await.current_filter.summary()
    }

    pub async fn has_data(&self) -> bool {
        let state = self.state.read().await;
        state.pizza.is_some() || state.total_vendas.is_some()
    }

    pub async fn is_data_empty(&self) -> bool {
        !self.has_data().await
    }

    /// Argmax of the count series; `None` before the first load
    pub async fn most_used_method(&self) -> Option<PaymentMethod> {
        self.state.read().await.pizza.map(|p| p.argmax())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, ServiceError, ServiceResult};
    use async_trait::async_trait;
    use shared::ChartSeries;
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Notify;

    #[derive(Default)]
    struct FakeCharts {
        calls: AtomicUsize,
        fail_stats: bool,
        gate: Option<Arc<Notify>>,
        requests: Mutex<Vec<ChartRequest>>,
    }

    #[async_trait]
    impl ChartApi for FakeCharts {
        async fn payment_counts(&self, request: &ChartRequest) -> ServiceResult<ChartSeries> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().unwrap().push(request.clone());
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            Ok(ChartSeries::Labeled {
                dados: vec![50.0, 50.0],
                labels: vec!["PIX".into(), "DINHEIRO".into()],
            })
        }

        async fn payment_totals(&self, _request: &ChartRequest) -> ServiceResult<ChartSeries> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(ChartSeries::Bare(vec![100.0, 250.0, 0.0, 40.0]))
        }

        async fn stats(&self, request: &ChartRequest) -> ServiceResult<ChartStats> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_stats {
                return Err(ServiceError::new(
                    ErrorKind::Server,
                    "Erro interno do servidor. Tente novamente mais tarde.",
                ));
            }
            Ok(ChartStats::from_series(
                &PaymentSeries([50.0, 50.0, 0.0, 0.0]),
                &PaymentSeries([100.0, 250.0, 0.0, 40.0]),
                &request.data_inicio,
                &request.data_fim,
            ))
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[tokio::test]
    async fn test_successful_load_stores_snapshot_and_filter() {
        let api = Arc::new(FakeCharts::default());
        let store = ChartStore::new(api.clone());

        let outcome = store
            .apply_filter_at(PeriodFilter::preset(PeriodPreset::Semana), today())
            .await;
        assert_eq!(outcome, ApplyOutcome::Applied);

        let state = store.snapshot().await;
        assert_eq!(state.pizza.unwrap().values(), &[50.0, 50.0, 0.0, 0.0]);
        assert_eq!(state.total_vendas.unwrap().sum(), 390.0);
        assert_eq!(state.stats.unwrap().produtos_vendidos, 200.0);
        assert_eq!(state.current_filter.data_inicio.as_deref(), Some("2024-03-08"));
        assert_eq!(state.current_filter.preset, Some(PeriodPreset::Semana));
        assert!(!state.is_loading);
        assert!(state.is_initialized);

        assert_eq!(store.most_used_method().await, Some(PaymentMethod::Dinheiro));
        assert_eq!(store.period_summary().await, "08/03/2024 até 15/03/2024");
        assert!(store.has_data().await);
        assert_eq!(api.requests.lock().unwrap()[0], ChartRequest::new("2024-03-08", "2024-03-15"));
    }

    #[tokio::test]
    async fn test_one_failure_discards_whole_round() {
        let store = ChartStore::new(Arc::new(FakeCharts::default()));
        store
            .apply_filter_at(PeriodFilter::default(), today())
            .await;
        assert!(store.has_data().await);

        let failing = ChartStore::new(Arc::new(FakeCharts {
            fail_stats: true,
            ..Default::default()
        }));
        let outcome = failing.apply_filter_at(PeriodFilter::default(), today()).await;
        assert!(matches!(outcome, ApplyOutcome::Failed(_)));

        let state = failing.snapshot().await;
        assert!(state.pizza.is_none());
        assert!(state.total_vendas.is_none());
        assert!(state.stats.is_none());
        assert_eq!(
            state.error.as_deref(),
            Some("Erro interno do servidor. Tente novamente mais tarde.")
        );
        assert!(failing.is_data_empty().await);
    }

    #[tokio::test]
    async fn test_invalid_period_makes_no_request() {
        let api = Arc::new(FakeCharts::default());
        let store = ChartStore::new(api.clone());

        let outcome = store
            .apply_filter_at(PeriodFilter::custom("2024-01-01", "2025-01-02"), today())
            .await;
        assert_eq!(
            outcome,
            ApplyOutcome::InvalidPeriod(INVALID_PERIOD_MESSAGE.to_string())
        );
        assert_eq!(api.calls.load(Ordering::SeqCst), 0);

        let state = store.snapshot().await;
        assert_eq!(state.error.as_deref(), Some(INVALID_PERIOD_MESSAGE));
        assert!(!state.is_loading);

        store.clear_error().await;
        assert!(store.snapshot().await.error.is_none());
    }

    #[tokio::test]
    async fn test_filter_ignored_while_loading() {
        let gate = Arc::new(Notify::new());
        let api = Arc::new(FakeCharts {
            gate: Some(gate.clone()),
            ..Default::default()
        });
        let store = Arc::new(ChartStore::new(api.clone()));

        let first = tokio::spawn({
            let store = store.clone();
            async move { store.apply_filter_at(PeriodFilter::default(), today()).await }
        });
        while api.calls.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }

        let second = store
            .apply_filter_at(PeriodFilter::preset(PeriodPreset::Hoje), today())
            .await;
        assert_eq!(second, ApplyOutcome::Ignored);

        gate.notify_one();
        assert_eq!(first.await.unwrap(), ApplyOutcome::Applied);
        assert_eq!(api.requests.lock().unwrap().len(), 1);
        assert_eq!(
            store.snapshot().await.current_filter.preset,
            Some(PeriodPreset::Mes)
        );
    }

    #[tokio::test]
    async fn test_abandoned_load_frees_the_store() {
        let gate = Arc::new(Notify::new());
        let api = Arc::new(FakeCharts {
            gate: Some(gate.clone()),
            ..Default::default()
        });
        let store = ChartStore::new(api.clone());

        let abandoned = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            store.apply_filter_at(PeriodFilter::default(), today()),
        )
        .await;
        assert!(abandoned.is_err());
        assert!(!store.is_loading());
        assert!(!store.snapshot().await.is_loading);
        assert!(store.is_data_empty().await);

        gate.notify_one();
        let outcome = store
            .apply_filter_at(PeriodFilter::preset(PeriodPreset::Semana), today())
            .await;
        assert_eq!(outcome, ApplyOutcome::Applied);
        assert_eq!(api.requests.lock().unwrap().len(), 2);
        assert_eq!(
            store.snapshot().await.current_filter.preset,
            Some(PeriodPreset::Semana)
        );
    }
}
