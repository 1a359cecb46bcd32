//! Derived per-company metrics over a cleaned layoff frame
//!
//! Each metric lives in its own module and is a pure function of the cleaned
//! frame. None of them writes back, so [`MetricsEngine::compute_all`] runs
//! them in parallel with Rayon.

pub mod efficiency;
pub mod fragility;
pub mod instability;
pub mod severity;

// Re-export metric functions
pub use efficiency::{calculate_efficiency, record_efficiency, EfficiencyResult, EfficiencyRow};
pub use fragility::{calculate_fragility, FragilityResult, FragilityRow};
pub use instability::{calculate_instability, InstabilityResult, InstabilityRow};
pub use severity::{calculate_severity, severity_index, SeverityResult, SeverityRow};

use crate::error::Result;
use polars::prelude::*;

/// All metric tables for one cleaned frame
#[derive(Debug, Clone)]
pub struct MetricTables {
    pub efficiency: EfficiencyResult,
    pub instability: InstabilityResult,
    pub severity: SeverityResult,
    pub fragility: FragilityResult,
}

impl MetricTables {
    /// `(file stem, frame)` pairs for persisting every table
    pub fn to_frames(&self) -> Result<Vec<(&'static str, DataFrame)>> {
        Ok(vec![
            ("efficiency", self.efficiency.to_frame()?),
            ("instability", self.instability.to_frame()?),
            ("severity", self.severity.to_frame()?),
            ("fragility", self.fragility.to_frame()?),
        ])
    }
}

/// Read-only view over a cleaned frame that computes metric tables
pub struct MetricsEngine<'a> {
    cleaned: &'a DataFrame,
}

impl<'a> MetricsEngine<'a> {
    pub fn new(cleaned: &'a DataFrame) -> Self {
        Self { cleaned }
    }

    pub fn efficiency(&self) -> Result<EfficiencyResult> {
        calculate_efficiency(self.cleaned)
    }

    pub fn instability(&self) -> Result<InstabilityResult> {
        calculate_instability(self.cleaned)
    }

    pub fn severity(&self) -> Result<SeverityResult> {
        calculate_severity(self.cleaned)
    }

    pub fn fragility(&self) -> Result<FragilityResult> {
        calculate_fragility(self.cleaned)
    }

    /// Compute every table, sequentially
    pub fn compute_all(&self) -> Result<MetricTables> {
        Ok(MetricTables {
            efficiency: self.efficiency()?,
            instability: self.instability()?,
            severity: self.severity()?,
            fragility: self.fragility()?,
        })
    }

    /// Compute every table in parallel (Rayon)
    ///
    /// Results are identical to [`Self::compute_all`].
    pub fn compute_all_parallel(&self) -> Result<MetricTables> {
        let ((efficiency, instability), (severity, fragility)) = rayon::join(
            || rayon::join(|| self.efficiency(), || self.instability()),
            || rayon::join(|| self.severity(), || self.fragility()),
        );

        Ok(MetricTables {
            efficiency: efficiency?,
            instability: instability?,
            severity: severity?,
            fragility: fragility?,
        })
    }
}
