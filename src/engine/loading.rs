//! Loading Engine Module
//! Computes derived loading metrics and risk classification per reading.

use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;

/// Assumed displacement power factor converting rated kVA to usable kW.
pub const POWER_FACTOR: f64 = 0.92;

/// Lower edges of the six risk bands, in percent of capacity.
///
/// Chart renderers shade bands from these exact values; they are part of the
/// public contract so shading never drifts from classification.
pub const BAND_BOUNDARIES: [f64; 6] = [0.0, 10.0, 80.0, 100.0, 120.0, 140.0];

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComputationError {
    #[error(
        "transformer {transformer} at {timestamp}: rated capacity resolves to \
         {capacity_kw} kW, percent of capacity is undefined"
    )]
    NonPositiveCapacity {
        transformer: String,
        timestamp: String,
        capacity_kw: f64,
    },
}

/// Operating-risk classification of one reading.
///
/// Variants are ordered by severity, so `Ord` gives "worst status" directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Status {
    Underutilization,
    Normal,
    Alert,
    ControlledOverload,
    HighRisk,
    Critical,
}

impl Status {
    pub const ALL: [Status; 6] = [
        Status::Underutilization,
        Status::Normal,
        Status::Alert,
        Status::ControlledOverload,
        Status::HighRisk,
        Status::Critical,
    ];

    /// Human-readable label, also used as the CSV `Status` cell.
    pub fn label(self) -> &'static str {
        match self {
            Status::Underutilization => "Underutilization",
            Status::Normal => "Normal operation",
            Status::Alert => "Alert - load growth",
            Status::ControlledOverload => "Controlled short-term overload",
            Status::HighRisk => "High risk - plan expansion",
            Status::Critical => "Critical risk - immediate intervention",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One input row: a transformer's load/generation/capacity at a timestamp.
///
/// The timestamp is an opaque label (e.g. an hour string); rows are assumed
/// chronological in input order and are never re-sorted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    pub transformer: String,
    pub timestamp: String,
    pub load_kw: f64,
    pub generation_kw: f64,
    pub capacity_kva: f64,
}

/// A [`Reading`] plus the derived loading metrics and classification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedReading {
    #[serde(flatten)]
    pub reading: Reading,
    pub capacity_kw: f64,
    pub net_demand_kw: f64,
    pub percent_of_capacity: f64,
    pub status: Status,
}

/// One classification band: everything below `upper` (or equal, when the
/// upper edge is closed) that did not match an earlier band.
struct Band {
    upper: f64,
    closed: bool,
    status: Status,
}

/// Sorted threshold table, evaluated in order; first match wins. The 120-140
/// band closes its upper edge, so exactly 140 is HighRisk, not Critical.
const BANDS: [Band; 5] = [
    Band {
        upper: 10.0,
        closed: false,
        status: Status::Underutilization,
    },
    Band {
        upper: 80.0,
        closed: false,
        status: Status::Normal,
    },
    Band {
        upper: 100.0,
        closed: false,
        status: Status::Alert,
    },
    Band {
        upper: 120.0,
        closed: false,
        status: Status::ControlledOverload,
    },
    Band {
        upper: 140.0,
        closed: true,
        status: Status::HighRisk,
    },
];

/// Classify a percent-of-capacity value into its risk band.
///
/// Total over all reals: values below 10 (including negatives, when on-site
/// generation exceeds load) are Underutilization, values above 140 Critical.
pub fn classify(percent: f64) -> Status {
    for band in &BANDS {
        if percent < band.upper || (band.closed && percent == band.upper) {
            return band.status;
        }
    }
    Status::Critical
}

/// Pure, stateless transform from validated readings to enriched rows.
pub struct LoadingEngine;

impl LoadingEngine {
    pub fn compute_capacity_kw(capacity_kva: f64) -> f64 {
        capacity_kva * POWER_FACTOR
    }

    pub fn compute_net_demand_kw(load_kw: f64, generation_kw: f64) -> f64 {
        load_kw - generation_kw
    }

    /// `None` when `capacity_kw` is not strictly positive; a zero or negative
    /// rated capacity makes the metric undefined and is never passed through
    /// as infinity or NaN.
    pub fn compute_percent_of_capacity(net_demand_kw: f64, capacity_kw: f64) -> Option<f64> {
        (capacity_kw > 0.0).then(|| net_demand_kw / capacity_kw * 100.0)
    }

    /// Enrich a single reading.
    pub fn enrich_row(reading: &Reading) -> Result<EnrichedReading, ComputationError> {
        let capacity_kw = Self::compute_capacity_kw(reading.capacity_kva);
        let net_demand_kw = Self::compute_net_demand_kw(reading.load_kw, reading.generation_kw);
        let percent_of_capacity = Self::compute_percent_of_capacity(net_demand_kw, capacity_kw)
            .ok_or_else(|| ComputationError::NonPositiveCapacity {
                transformer: reading.transformer.clone(),
                timestamp: reading.timestamp.clone(),
                capacity_kw,
            })?;

        Ok(EnrichedReading {
            reading: reading.clone(),
            capacity_kw,
            net_demand_kw,
            percent_of_capacity,
            status: classify(percent_of_capacity),
        })
    }

    /// Enrich every reading, preserving input order in the output.
    ///
    /// Rows are independent, so the map runs on the rayon pool; `collect`
    /// keeps output order equal to input order. Any undefined row fails the
    /// whole batch, no partial results. The sequential pre-scan reports the
    /// first offending row regardless of scheduling.
    pub fn enrich(readings: &[Reading]) -> Result<Vec<EnrichedReading>, ComputationError> {
        if let Some(bad) = readings
            .iter()
            .find(|r| Self::compute_capacity_kw(r.capacity_kva) <= 0.0)
        {
            return Err(ComputationError::NonPositiveCapacity {
                transformer: bad.transformer.clone(),
                timestamp: bad.timestamp.clone(),
                capacity_kw: Self::compute_capacity_kw(bad.capacity_kva),
            });
        }

        readings.par_iter().map(Self::enrich_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(transformer: &str, timestamp: &str, load: f64, gen: f64, kva: f64) -> Reading {
        Reading {
            transformer: transformer.to_string(),
            timestamp: timestamp.to_string(),
            load_kw: load,
            generation_kw: gen,
            capacity_kva: kva,
        }
    }

    #[test]
    fn capacity_applies_power_factor() {
        assert!((LoadingEngine::compute_capacity_kw(100.0) - 92.0).abs() < 1e-9);
        assert!((LoadingEngine::compute_capacity_kw(0.0)).abs() < 1e-9);
    }

    #[test]
    fn net_demand_offsets_generation() {
        assert!((LoadingEngine::compute_net_demand_kw(100.0, 20.0) - 80.0).abs() < 1e-9);
        // Generation above load yields a negative net demand.
        assert!((LoadingEngine::compute_net_demand_kw(10.0, 30.0) + 20.0).abs() < 1e-9);
    }

    #[test]
    fn percent_undefined_for_non_positive_capacity() {
        assert_eq!(LoadingEngine::compute_percent_of_capacity(80.0, 0.0), None);
        assert_eq!(LoadingEngine::compute_percent_of_capacity(80.0, -5.0), None);
        let p = LoadingEngine::compute_percent_of_capacity(80.0, 92.0).unwrap();
        assert!((p - 8000.0 / 92.0).abs() < 1e-9);
    }

    #[test]
    fn classify_interior_values() {
        assert_eq!(classify(-50.0), Status::Underutilization);
        assert_eq!(classify(5.0), Status::Underutilization);
        assert_eq!(classify(50.0), Status::Normal);
        assert_eq!(classify(90.0), Status::Alert);
        assert_eq!(classify(110.0), Status::ControlledOverload);
        assert_eq!(classify(130.0), Status::HighRisk);
        assert_eq!(classify(500.0), Status::Critical);
    }

    #[test]
    fn classify_boundaries_belong_to_upper_band() {
        assert_eq!(classify(10.0), Status::Normal);
        assert_eq!(classify(80.0), Status::Alert);
        assert_eq!(classify(100.0), Status::ControlledOverload);
        assert_eq!(classify(120.0), Status::HighRisk);
    }

    #[test]
    fn classify_140_is_high_risk_not_critical() {
        // The 120-140 band closes its upper edge.
        assert_eq!(classify(140.0), Status::HighRisk);
        assert_eq!(classify(140.0 + 1e-9), Status::Critical);
    }

    #[test]
    fn classify_partitions_the_line() {
        // Dense sweep across every boundary: exactly one status each, and the
        // status sequence is monotone in severity.
        let mut last = Status::Underutilization;
        let mut p = -20.0;
        while p <= 160.0 {
            let s = classify(p);
            assert!(s >= last, "severity regressed at {p}");
            last = s;
            p += 0.25;
        }
        assert_eq!(last, Status::Critical);
    }

    #[test]
    fn alert_scenario() {
        let row = LoadingEngine::enrich_row(&reading("T1", "01:00", 100.0, 20.0, 100.0)).unwrap();
        assert!((row.capacity_kw - 92.0).abs() < 1e-9);
        assert!((row.net_demand_kw - 80.0).abs() < 1e-9);
        assert!((row.percent_of_capacity - 8000.0 / 92.0).abs() < 1e-9);
        assert_eq!(row.status, Status::Alert);
    }

    #[test]
    fn critical_scenario() {
        let row = LoadingEngine::enrich_row(&reading("T1", "02:00", 130.0, 0.0, 100.0)).unwrap();
        assert!(row.percent_of_capacity > 141.0 && row.percent_of_capacity < 141.5);
        assert_eq!(row.status, Status::Critical);
    }

    #[test]
    fn exact_120_percent_is_high_risk() {
        // 110.4 kW over 92 kW of capacity lands on the 120% edge.
        let row = LoadingEngine::enrich_row(&reading("T1", "03:00", 110.4, 0.0, 100.0)).unwrap();
        assert!(row.percent_of_capacity >= 120.0);
        assert_eq!(row.status, Status::HighRisk);
    }

    #[test]
    fn zero_capacity_fails_the_batch() {
        let rows = vec![
            reading("T1", "01:00", 50.0, 0.0, 100.0),
            reading("T1", "02:00", 50.0, 0.0, 0.0),
        ];
        let err = LoadingEngine::enrich(&rows).unwrap_err();
        match err {
            ComputationError::NonPositiveCapacity { timestamp, .. } => {
                assert_eq!(timestamp, "02:00");
            }
        }
    }

    #[test]
    fn negative_capacity_fails_too() {
        let err = LoadingEngine::enrich_row(&reading("T1", "01:00", 50.0, 0.0, -10.0)).unwrap_err();
        assert!(matches!(err, ComputationError::NonPositiveCapacity { .. }));
    }

    #[test]
    fn enrich_preserves_order_and_is_idempotent() {
        let rows: Vec<Reading> = (0..200)
            .map(|i| reading("T1", &format!("{i:02}:00"), i as f64, 0.0, 100.0))
            .collect();

        let first = LoadingEngine::enrich(&rows).unwrap();
        let second = LoadingEngine::enrich(&rows).unwrap();
        assert_eq!(first, second);

        for (i, row) in first.iter().enumerate() {
            assert_eq!(row.reading.timestamp, format!("{i:02}:00"));
        }
    }
}
