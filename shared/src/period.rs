//! Period filter
//!
//! A chart period is either a named preset relative to today or an explicit
//! `YYYY-MM-DD` pair. Resolution and validation are pure: callers pass
//! `today` in, so nothing here reads the clock.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest accepted period, in days
pub const MAX_PERIOD_DAYS: i64 = 365;

/// Wire/date format used by the backend
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const DISPLAY_FORMAT: &str = "%d/%m/%Y";

/// Named relative period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodPreset {
    Hoje,
    Semana,
    Mes,
    Trimestre,
}

impl PeriodPreset {
    pub const ALL: [PeriodPreset; 4] = [
        PeriodPreset::Hoje,
        PeriodPreset::Semana,
        PeriodPreset::Mes,
        PeriodPreset::Trimestre,
    ];

    pub fn id(self) -> &'static str {
        match self {
            PeriodPreset::Hoje => "hoje",
            PeriodPreset::Semana => "semana",
            PeriodPreset::Mes => "mes",
            PeriodPreset::Trimestre => "trimestre",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PeriodPreset::Hoje => "Hoje",
            PeriodPreset::Semana => "Última Semana",
            PeriodPreset::Mes => "Último Mês",
            PeriodPreset::Trimestre => "Último Trimestre",
        }
    }

    /// Days subtracted from today to get the start date
    pub fn days(self) -> i64 {
        match self {
            PeriodPreset::Hoje => 0,
            PeriodPreset::Semana => 7,
            PeriodPreset::Mes => 30,
            PeriodPreset::Trimestre => 90,
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.id() == id.trim())
    }

    /// `(start, end)` relative to `today`
    pub fn range(self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        (today - Duration::days(self.days()), today)
    }
}

impl std::str::FromStr for PeriodPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_id(s).ok_or_else(|| format!("Unknown period preset: {}", s))
    }
}

/// Period selection (`PeriodFilter`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodFilter {
    /// `None` with explicit dates means a custom period
    #[serde(default, rename = "periodo")]
    pub preset: Option<PeriodPreset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_inicio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_fim: Option<String>,
}

impl Default for PeriodFilter {
    fn default() -> Self {
        Self::preset(PeriodPreset::Mes)
    }
}

impl PeriodFilter {
    pub fn preset(preset: PeriodPreset) -> Self {
        Self {
            preset: Some(preset),
            data_inicio: None,
            data_fim: None,
        }
    }

    pub fn custom(data_inicio: impl Into<String>, data_fim: impl Into<String>) -> Self {
        Self {
            preset: None,
            data_inicio: Some(data_inicio.into()),
            data_fim: Some(data_fim.into()),
        }
    }

    /// Both explicit dates present and non-empty
    pub fn explicit_dates(&self) -> Option<(&str, &str)> {
        match (self.data_inicio.as_deref(), self.data_fim.as_deref()) {
            (Some(start), Some(end)) if !start.is_empty() && !end.is_empty() => Some((start, end)),
            _ => None,
        }
    }

    /// Concrete `(start, end)` strings. Explicit dates win; otherwise the
    /// preset (month when absent) is expanded against `today`.
    pub fn resolve(&self, today: NaiveDate) -> (String, String) {
        if let Some((start, end)) = self.explicit_dates() {
            return (start.to_string(), end.to_string());
        }

        let (start, end) = self.preset.unwrap_or(PeriodPreset::Mes).range(today);
        (
            start.format(DATE_FORMAT).to_string(),
            end.format(DATE_FORMAT).to_string(),
        )
    }

    /// Same filter with the resolved dates filled in
    pub fn with_dates(&self, data_inicio: String, data_fim: String) -> Self {
        Self {
            preset: self.preset,
            data_inicio: Some(data_inicio),
            data_fim: Some(data_fim),
        }
    }

    /// Human-readable period label
    pub fn summary(&self) -> String {
        let Some((start, end)) = self.explicit_dates() else {
            return self
                .preset
                .map(|p| p.label().to_string())
                .unwrap_or_else(|| "Período não definido".to_string());
        };

        let display = |raw: &str| {
            NaiveDate::parse_from_str(raw, DATE_FORMAT)
                .map(|d| d.format(DISPLAY_FORMAT).to_string())
                .unwrap_or_else(|_| raw.to_string())
        };
        let (start, end) = (display(start), display(end));

        if start == end {
            format!("Hoje ({})", start)
        } else {
            format!("{} até {}", start, end)
        }
    }
}

/// Period validation failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Start date {start} is after end date {end}")]
    StartAfterEnd { start: NaiveDate, end: NaiveDate },

    #[error("Period spans {days} days (max 365)")]
    SpanTooLong { days: i64 },
}

/// A validated inclusive date range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Parse and validate: both valid calendar dates, `start <= end`,
    /// at most [`MAX_PERIOD_DAYS`] apart.
    pub fn parse(start: &str, end: &str) -> Result<Self, PeriodError> {
        let parse = |raw: &str| {
            NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
                .map_err(|_| PeriodError::InvalidDate(raw.to_string()))
        };
        Self::new(parse(start)?, parse(end)?)
    }

    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, PeriodError> {
        if start > end {
            return Err(PeriodError::StartAfterEnd { start, end });
        }
        let days = (end - start).num_days();
        if days > MAX_PERIOD_DAYS {
            return Err(PeriodError::SpanTooLong { days });
        }
        Ok(Self { start, end })
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    pub fn start_str(&self) -> String {
        self.start.format(DATE_FORMAT).to_string()
    }

    pub fn end_str(&self) -> String {
        self.end.format(DATE_FORMAT).to_string()
    }
}
