//! Core Web Vitals thresholds and an in-memory collector for field reports.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::str::FromStr;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use trailmark_core::{Error, Result};

/// Samples kept per metric; older reports are dropped first.
pub const WINDOW: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VitalMetric {
    Lcp,
    Inp,
    Cls,
    Fcp,
    Ttfb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rating {
    Good,
    NeedsImprovement,
    Poor,
}

impl VitalMetric {
    pub fn all() -> &'static [VitalMetric] {
        &[
            VitalMetric::Lcp,
            VitalMetric::Inp,
            VitalMetric::Cls,
            VitalMetric::Fcp,
            VitalMetric::Ttfb,
        ]
    }

    /// `(good, poor)` boundaries. Milliseconds except CLS, which is unitless.
    pub fn thresholds(self) -> (f64, f64) {
        match self {
            VitalMetric::Lcp => (2500.0, 4000.0),
            VitalMetric::Inp => (200.0, 500.0),
            VitalMetric::Cls => (0.1, 0.25),
            VitalMetric::Fcp => (1800.0, 3000.0),
            VitalMetric::Ttfb => (800.0, 1800.0),
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            VitalMetric::Cls => "",
            _ => "ms",
        }
    }

    pub fn rate(self, value: f64) -> Rating {
        let (good, poor) = self.thresholds();
        if value <= good {
            Rating::Good
        } else if value <= poor {
            Rating::NeedsImprovement
        } else {
            Rating::Poor
        }
    }
}

impl fmt::Display for VitalMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VitalMetric::Lcp => "LCP",
            VitalMetric::Inp => "INP",
            VitalMetric::Cls => "CLS",
            VitalMetric::Fcp => "FCP",
            VitalMetric::Ttfb => "TTFB",
        };
        f.write_str(s)
    }
}

impl FromStr for VitalMetric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LCP" => Ok(VitalMetric::Lcp),
            "INP" => Ok(VitalMetric::Inp),
            "CLS" => Ok(VitalMetric::Cls),
            "FCP" => Ok(VitalMetric::Fcp),
            "TTFB" => Ok(VitalMetric::Ttfb),
            other => Err(Error::Validation(format!("Unknown web vital: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalSummary {
    pub metric: VitalMetric,
    pub count: usize,
    pub p75: Option<f64>,
    pub rating: Option<Rating>,
    pub unit: &'static str,
}

/// Bounded per-metric sample windows shared across requests.
pub struct VitalsCollector {
    samples: RwLock<HashMap<VitalMetric, VecDeque<f64>>>,
    window: usize,
}

impl Default for VitalsCollector {
    fn default() -> Self {
        Self::new(WINDOW)
    }
}

impl VitalsCollector {
    pub fn new(window: usize) -> Self {
        Self {
            samples: RwLock::new(HashMap::new()),
            window: window.max(1),
        }
    }

    /// Store one field measurement and return its rating.
    pub fn record(&self, metric: VitalMetric, value: f64) -> Result<Rating> {
        if !value.is_finite() || value < 0.0 {
            return Err(Error::Validation(format!(
                "{} value must be a non-negative number",
                metric
            )));
        }
        let mut samples = self.samples.write();
        let window = samples.entry(metric).or_default();
        if window.len() >= self.window {
            window.pop_front();
        }
        window.push_back(value);
        let rating = metric.rate(value);
        debug!(%metric, value, ?rating, "Recorded web vital");
        Ok(rating)
    }

    pub fn summary(&self, metric: VitalMetric) -> VitalSummary {
        let samples = self.samples.read();
        let p75 = samples.get(&metric).and_then(|w| percentile(w, 0.75));
        VitalSummary {
            metric,
            count: samples.get(&metric).map_or(0, VecDeque::len),
            p75,
            rating: p75.map(|v| metric.rate(v)),
            unit: metric.unit(),
        }
    }

    pub fn summaries(&self) -> Vec<VitalSummary> {
        VitalMetric::all().iter().map(|m| self.summary(*m)).collect()
    }

    pub fn clear(&self) {
        self.samples.write().clear();
    }
}

/// Nearest-rank percentile.
fn percentile(values: &VecDeque<f64>, p: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted: Vec<f64> = values.iter().copied().collect();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let rank = (p * sorted.len() as f64).ceil() as usize;
    Some(sorted[rank.clamp(1, sorted.len()) - 1])
}
