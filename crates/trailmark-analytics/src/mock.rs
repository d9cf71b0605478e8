//! Randomly generated SEO dashboard data.
//!
//! Nothing here is measured. Every payload carries `"mode": "mock"` so
//! callers can tell it apart from real telemetry. A fixed seed makes the
//! sequence reproducible.

use chrono::Utc;
use parking_lot::Mutex;
use rand::prelude::*;
use serde::Serialize;

use crate::vitals::{Rating, VitalMetric};

pub const MOCK_MODE: &str = "mock";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub technical: u32,
    pub content: u32,
    pub performance: u32,
    pub mobile: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoScoreReport {
    pub mode: &'static str,
    pub slug: String,
    pub score: u32,
    pub breakdown: ScoreBreakdown,
    pub generated_at: String,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordRanking {
    pub keyword: String,
    pub position: u32,
    pub previous_position: u32,
    pub search_volume: u32,
    pub difficulty: u32,
    pub trend: Trend,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordReport {
    pub mode: &'static str,
    pub rankings: Vec<KeywordRanking>,
    pub generated_at: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalReading {
    pub metric: VitalMetric,
    pub value: f64,
    pub rating: Rating,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalsReport {
    pub mode: &'static str,
    pub page: String,
    pub metrics: Vec<VitalReading>,
    pub generated_at: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewReport {
    pub mode: &'static str,
    pub total_pages: usize,
    pub average_score: u32,
    pub organic_sessions: u32,
    pub indexed_pages: usize,
    pub top_pages: Vec<SeoScoreReport>,
    pub generated_at: String,
}

pub struct MockAnalytics {
    rng: Mutex<StdRng>,
}

impl Default for MockAnalytics {
    fn default() -> Self {
        Self::new(None)
    }
}

impl MockAnalytics {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng: Mutex::new(rng) }
    }

    pub fn seo_score(&self, slug: &str) -> SeoScoreReport {
        let mut rng = self.rng.lock();
        score_report(&mut rng, slug)
    }

    pub fn keyword_rankings(&self, keywords: &[String]) -> KeywordReport {
        let mut rng = self.rng.lock();
        let rankings = keywords
            .iter()
            .map(|keyword| {
                let position: u32 = rng.gen_range(1..=50);
                let previous_position = (position as i64 + rng.gen_range(-5..=5)).clamp(1, 100) as u32;
                let trend = match previous_position.cmp(&position) {
                    std::cmp::Ordering::Greater => Trend::Up,
                    std::cmp::Ordering::Less => Trend::Down,
                    std::cmp::Ordering::Equal => Trend::Stable,
                };
                KeywordRanking {
                    keyword: keyword.clone(),
                    position,
                    previous_position,
                    search_volume: rng.gen_range(100..=10_000),
                    difficulty: rng.gen_range(10..=90),
                    trend,
                }
            })
            .collect();
        KeywordReport {
            mode: MOCK_MODE,
            rankings,
            generated_at: now(),
        }
    }

    pub fn core_web_vitals(&self, page: &str) -> VitalsReport {
        let mut rng = self.rng.lock();
        let metrics = VitalMetric::all()
            .iter()
            .map(|&metric| {
                let (_, poor) = metric.thresholds();
                // 0.2x to 1.2x the poor threshold.
                let raw = rng.gen_range(0.2..1.2) * poor;
                let value = if metric == VitalMetric::Cls {
                    (raw * 1000.0).round() / 1000.0
                } else {
                    raw.round()
                };
                VitalReading {
                    metric,
                    value,
                    rating: metric.rate(value),
                }
            })
            .collect();
        VitalsReport {
            mode: MOCK_MODE,
            page: page.to_string(),
            metrics,
            generated_at: now(),
        }
    }

    /// Site summary with a score per slug, best first, capped at five pages.
    pub fn overview(&self, slugs: &[String]) -> OverviewReport {
        let mut rng = self.rng.lock();
        let mut pages: Vec<SeoScoreReport> =
            slugs.iter().map(|s| score_report(&mut rng, s)).collect();
        let average_score = if pages.is_empty() {
            0
        } else {
            pages.iter().map(|p| p.score).sum::<u32>() / pages.len() as u32
        };
        pages.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.slug.cmp(&b.slug)));
        pages.truncate(5);
        OverviewReport {
            mode: MOCK_MODE,
            total_pages: slugs.len(),
            average_score,
            organic_sessions: rng.gen_range(1_000..=50_000),
            indexed_pages: slugs.len(),
            top_pages: pages,
            generated_at: now(),
        }
    }
}

fn score_report(rng: &mut StdRng, slug: &str) -> SeoScoreReport {
    let breakdown = ScoreBreakdown {
        technical: rng.gen_range(60..=100),
        content: rng.gen_range(60..=100),
        performance: rng.gen_range(60..=100),
        mobile: rng.gen_range(60..=100),
    };
    let score =
        (breakdown.technical + breakdown.content + breakdown.performance + breakdown.mobile) / 4;
    SeoScoreReport {
        mode: MOCK_MODE,
        slug: slug.to_string(),
        score,
        breakdown,
        generated_at: now(),
    }
}

fn now() -> String {
    Utc::now().to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_is_reproducible() {
        let a = MockAnalytics::new(Some(7));
        let b = MockAnalytics::new(Some(7));
        assert_eq!(a.seo_score("x").score, b.seo_score("x").score);
        let ka = a.keyword_rankings(&["bangkok".into()]);
        let kb = b.keyword_rankings(&["bangkok".into()]);
        assert_eq!(ka.rankings[0].position, kb.rankings[0].position);
    }

    #[test]
    fn test_payloads_are_labelled() {
        let mock = MockAnalytics::new(Some(1));
        let value = serde_json::to_value(mock.seo_score("a")).unwrap();
        assert_eq!(value["mode"], "mock");
        let value = serde_json::to_value(mock.core_web_vitals("/")).unwrap();
        assert_eq!(value["mode"], "mock");
        assert_eq!(value["metrics"].as_array().unwrap().len(), 5);
        let value = serde_json::to_value(mock.overview(&[])).unwrap();
        assert_eq!(value["mode"], "mock");
        assert_eq!(value["averageScore"], 0);
    }

    #[test]
    fn test_ranges() {
        let mock = MockAnalytics::new(Some(42));
        for _ in 0..50 {
            let report = mock.seo_score("a");
            assert!((60..=100).contains(&report.score));
        }
        let keywords: Vec<String> = (0..20).map(|i| format!("kw{}", i)).collect();
        for ranking in mock.keyword_rankings(&keywords).rankings {
            assert!((1..=50).contains(&ranking.position));
            assert!(ranking.previous_position >= 1);
        }
        for reading in mock.core_web_vitals("/").metrics {
            assert_eq!(reading.rating, reading.metric.rate(reading.value));
        }
    }

    #[test]
    fn test_overview_top_pages() {
        let slugs: Vec<String> = (0..8).map(|i| format!("post-{}", i)).collect();
        let overview = MockAnalytics::new(Some(3)).overview(&slugs);
        assert_eq!(overview.total_pages, 8);
        assert_eq!(overview.top_pages.len(), 5);
        assert!(overview
            .top_pages
            .windows(2)
            .all(|w| w[0].score >= w[1].score));
    }
}
