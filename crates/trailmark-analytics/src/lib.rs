//! Trailmark analytics: labelled mock SEO dashboards plus a real
//! Core Web Vitals collector fed by client reports.

pub mod mock;
pub mod vitals;

pub use mock::{MockAnalytics, MOCK_MODE};
pub use vitals::{Rating, VitalMetric, VitalSummary, VitalsCollector};
