//! Covid statistics processing and the display snapshot.
//!
//! Series arrive newest first. The latest observation is typically still
//! provisional and published as an empty value, so the weekly window starts
//! at the first present value.

use serde::Serialize;

use crate::providers::{CaseRecord, FetchError};

/// Number of daily values in a rolling week.
const WEEK: usize = 7;

/// Sum the most recent week of complete daily counts.
///
/// Leading `None` observations are skipped, then up to seven present values
/// are summed. Returns `None` when the series has no usable values at all.
pub fn rolling_weekly_sum(daily: &[Option<i64>]) -> Option<i64> {
    let window: Vec<i64> = daily
        .iter()
        .skip_while(|d| d.is_none())
        .take(WEEK)
        .filter_map(|d| *d)
        .collect();
    if window.is_empty() {
        None
    } else {
        Some(window.iter().sum())
    }
}

/// First present value in a newest-first series column.
pub fn first_present(values: impl Iterator<Item = Option<i64>>) -> Option<i64> {
    values.flatten().next()
}

/// Display statistics for one region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionReport {
    pub area_name: String,
    /// Rolling weekly case sum.
    pub weekly_cases: i64,
    /// Weekly sum divided by seven, rounded down.
    pub daily_rate: i64,
    /// Latest published hospital cases; nation-level feeds only.
    pub hospital_cases: Option<i64>,
    /// Latest cumulative deaths; nation-level feeds only.
    pub total_deaths: Option<i64>,
}

/// State of one half of the covid snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RegionStats {
    /// No fetch has completed yet.
    Pending,
    /// Last refresh succeeded.
    Ready(RegionReport),
    /// Last refresh failed.
    Failed { error: String },
}

impl RegionStats {
    /// Whether this half holds usable data.
    pub fn is_ready(&self) -> bool {
        matches!(self, RegionStats::Ready(_))
    }

    /// The report, when ready.
    pub fn report(&self) -> Option<&RegionReport> {
        match self {
            RegionStats::Ready(report) => Some(report),
            _ => None,
        }
    }
}

/// Last-known covid statistics for the dashboard. Replaced wholesale on
/// every refresh; the two halves fail independently but are never partially
/// updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CovidSnapshot {
    pub local: RegionStats,
    pub national: RegionStats,
}

impl CovidSnapshot {
    /// Create an empty snapshot with both halves pending.
    pub fn new() -> Self {
        Self {
            local: RegionStats::Pending,
            national: RegionStats::Pending,
        }
    }

    /// Replace both halves at once.
    pub fn update(&mut self, local: RegionStats, national: RegionStats) {
        self.local = local;
        self.national = national;
    }

    /// True when either half has no usable data; drives the page-load
    /// retry.
    pub fn needs_refresh(&self) -> bool {
        !self.local.is_ready() || !self.national.is_ready()
    }
}

impl Default for CovidSnapshot {
    fn default() -> Self {
        Self::new()
    }
}

/// Reduce a fetched series to display statistics.
pub fn region_report(series: &[CaseRecord]) -> Result<RegionReport, FetchError> {
    let first = series.first().ok_or(FetchError::EmptyResult)?;
    let daily: Vec<Option<i64>> = series.iter().map(|r| r.daily_cases).collect();
    let weekly_cases = rolling_weekly_sum(&daily).ok_or(FetchError::EmptyResult)?;

    Ok(RegionReport {
        area_name: first.area_name.clone(),
        weekly_cases,
        daily_rate: weekly_cases / WEEK as i64,
        hospital_cases: first_present(series.iter().map(|r| r.hospital_cases)),
        total_deaths: first_present(series.iter().map(|r| r.cumulative_deaths)),
    })
}
