//! Chart aggregate models
//!
//! Both chart endpoints answer with one number per payment method. The
//! backend is not consistent about ordering (or about sending labels at all),
//! so every series is reindexed into the canonical [`PaymentMethod::ALL`]
//! order before it reaches state.

use serde::{Deserialize, Serialize};

use super::PaymentMethod;

/// Chart query body: an inclusive `YYYY-MM-DD` period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartRequest {
    pub data_inicio: String,
    pub data_fim: String,
}

impl ChartRequest {
    pub fn new(data_inicio: impl Into<String>, data_fim: impl Into<String>) -> Self {
        Self {
            data_inicio: data_inicio.into(),
            data_fim: data_fim.into(),
        }
    }
}

/// Raw chart response
///
/// Accepts either `{"dados": [...], "labels": [...]}` or a bare `[...]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChartSeries {
    Bare(Vec<f64>),
    Labeled {
        dados: Vec<f64>,
        #[serde(default)]
        labels: Vec<String>,
    },
}

impl ChartSeries {
    /// Reindex into canonical payment-method order
    pub fn normalize(&self) -> PaymentSeries {
        match self {
            ChartSeries::Labeled { dados, labels } if !labels.is_empty() => {
                PaymentSeries::from_labeled(dados, labels)
            }
            ChartSeries::Labeled { dados, .. } | ChartSeries::Bare(dados) => {
                PaymentSeries::from_positional(dados)
            }
        }
    }
}

/// Exactly four values, one per payment method, in canonical order
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentSeries(pub [f64; 4]);

impl PaymentSeries {
    /// Match each canonical method against `labels` (case-insensitive, first
    /// occurrence wins). Absent labels and out-of-range indexes become 0.
    pub fn from_labeled(dados: &[f64], labels: &[String]) -> Self {
        let mut values = [0.0; 4];
        for method in PaymentMethod::ALL {
            if let Some(pos) = labels
                .iter()
                .position(|l| l.trim().eq_ignore_ascii_case(method.code()))
            {
                values[method.index()] = dados.get(pos).copied().unwrap_or(0.0);
            }
        }
        Self(values)
    }

    /// Take values positionally; a short array is padded with 0, extras dropped
    pub fn from_positional(dados: &[f64]) -> Self {
        let mut values = [0.0; 4];
        for (slot, value) in values.iter_mut().zip(dados) {
            *slot = *value;
        }
        Self(values)
    }

    pub fn values(&self) -> &[f64; 4] {
        &self.0
    }

    pub fn get(&self, method: PaymentMethod) -> f64 {
        self.0[method.index()]
    }

    /// Canonical labels matching `values()`
    pub fn labels() -> [&'static str; 4] {
        PaymentMethod::ALL.map(PaymentMethod::code)
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|v| *v == 0.0)
    }

    /// Method with the largest value; ties go to the earliest canonical index
    pub fn argmax(&self) -> PaymentMethod {
        let mut best = 0;
        for (i, value) in self.0.iter().enumerate() {
            if *value > self.0[best] {
                best = i;
            }
        }
        PaymentMethod::ALL[best]
    }

    /// Share of each value in the total, in percent with two decimals.
    /// All zeros when the total is zero.
    pub fn percentages(&self) -> [f64; 4] {
        let total = self.sum();
        if total == 0.0 {
            return [0.0; 4];
        }
        self.0.map(|v| (v / total * 100.0 * 100.0).round() / 100.0)
    }
}

/// Derived dashboard figures for one period (`GraficosStats`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartStats {
    pub total_vendido: f64,
    pub vendas_realizadas: f64,
    /// Estimated as two units per sale; the backend exposes no line items
    pub produtos_vendidos: f64,
    pub forma_pagamento_mais_usada: String,
    pub periodo_selecionado: String,
}

impl ChartStats {
    /// Assumed average units per sale
    pub const UNITS_PER_SALE: f64 = 2.0;

    pub fn from_series(
        count: &PaymentSeries,
        amount: &PaymentSeries,
        data_inicio: &str,
        data_fim: &str,
    ) -> Self {
        let vendas_realizadas = count.sum();
        Self {
            total_vendido: amount.sum(),
            vendas_realizadas,
            produtos_vendidos: vendas_realizadas * Self::UNITS_PER_SALE,
            forma_pagamento_mais_usada: count.argmax().short_label().to_string(),
            periodo_selecionado: format!("{} até {}", data_inicio, data_fim),
        }
    }
}
