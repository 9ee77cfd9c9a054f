//! The scoring engine: gather one [`SiteContext`], run the check battery,
//! aggregate into categories and a weighted overall score.
//!
//! All network traffic happens up front in [`ScoringEngine::gather_context`];
//! the battery itself is a pure function of the gathered context, so the same
//! context always produces the same scores.

pub mod checks;
pub mod tables;

pub use checks::{CHECK_BATTERY, CheckOutcome, CheckSpec, SiteContext};
pub use tables::ScoreCategory;

use crate::fetcher::Fetcher;
use crate::metrics;
use crate::robots::RobotsRules;
use crate::types::{AnalysisResponse, AnalysisSummary, CategoryResult, CheckResult};
use crate::util;
use crate::Result;
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};
use url::Url;

/// Feed locations probed for the alternate-formats check, in order.
const FEED_PATHS: &[&str] = &["/feed.xml", "/rss.xml", "/atom.xml", "/feed"];

/// Runs the full analysis for one site.
pub struct ScoringEngine {
    fetcher: Arc<Fetcher>,
}

impl ScoringEngine {
    /// Creates an engine over a shared fetcher.
    #[must_use]
    pub fn new(fetcher: Arc<Fetcher>) -> Self {
        Self { fetcher }
    }

    /// Analyze one site end to end.
    ///
    /// The only fatal error is an unparseable input URL; unreachable targets
    /// still produce a (low-scoring) response.
    pub async fn analyze(&self, input_url: &str) -> Result<AnalysisResponse> {
        let url = util::normalize_input_url(input_url)?;
        info!(url = %url, "analyzing site");
        let context = self.gather_context(url).await;
        Ok(build_response(&context))
    }

    /// Fetch everything the battery will look at, concurrently where the
    /// requests are independent.
    pub async fn gather_context(&self, url: Url) -> SiteContext {
        let (page, response_time_ms) = self.fetcher.timed_fetch(url.as_str()).await;

        let origin = url.origin().ascii_serialization();
        let robots_url = format!("{origin}/robots.txt");
        let sitemap_url = format!("{origin}/sitemap.xml");
        let llms_url = format!("{origin}/llms.txt");
        let robots_fut = self.fetcher.fetch(&robots_url);
        let sitemap_fut = self.fetcher.probe(&sitemap_url);
        let llms_fut = self.fetcher.probe(&llms_url);
        let feed_fut = async {
            for feed_path in FEED_PATHS {
                let status = self.fetcher.probe(&format!("{origin}{feed_path}")).await;
                if (200..300).contains(&status) {
                    return status;
                }
            }
            0
        };

        let (robots_outcome, sitemap_status, llms_txt_status, feed_status) =
            tokio::join!(robots_fut, sitemap_fut, llms_fut, feed_fut);

        let robots = robots_outcome.body().map(RobotsRules::parse);
        let metrics = metrics::extract(page.body().unwrap_or(""));

        SiteContext {
            url,
            page,
            response_time_ms,
            robots,
            metrics,
            sitemap_status,
            llms_txt_status,
            feed_status,
        }
    }
}

/// Score a gathered context into a complete response.
///
/// Deterministic apart from the timestamp.
#[must_use]
pub fn build_response(context: &SiteContext) -> AnalysisResponse {
    let categories = run_battery(context);
    let overall = overall_score(&categories);
    let summary = build_summary(&categories, overall);

    AnalysisResponse {
        url: context.url.to_string(),
        timestamp: Utc::now(),
        overall_score: overall,
        categories,
        summary,
        page_type: None,
        scoring_adjustments: None,
    }
}

fn run_battery(context: &SiteContext) -> Vec<CategoryResult> {
    ScoreCategory::ALL
        .iter()
        .map(|&category| {
            let results: Vec<CheckResult> = CHECK_BATTERY
                .iter()
                .filter(|spec| spec.category == category)
                .map(|spec| run_check(spec, context))
                .collect();

            let score = mean_rounded(results.iter().map(|c| c.score));
            let recommendations = results
                .iter()
                .flat_map(|check| tables::triggered_recommendations(&check.id, check.score))
                .map(str::to_string)
                .collect();

            CategoryResult {
                id: category.id().to_string(),
                name: category.name().to_string(),
                weight: tables::baseline_weight(category),
                score,
                checks: results,
                recommendations,
            }
        })
        .collect()
}

/// Run one check, timing it and converting failure into a zero-score
/// "Error" result so one bad check never poisons its siblings.
fn run_check(spec: &CheckSpec, context: &SiteContext) -> CheckResult {
    let start = Instant::now();
    let (score, status, details) = match (spec.run)(context) {
        Ok(outcome) => (
            outcome.score,
            status_label(outcome.score).to_string(),
            outcome.details,
        ),
        Err(e) => {
            debug!(check = spec.id, error = %e, "check failed");
            (0, "Error".to_string(), e.to_string())
        },
    };

    CheckResult {
        id: spec.id.to_string(),
        name: spec.name.to_string(),
        score,
        status,
        details,
        execution_time: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
    }
}

/// Qualitative bucket for a score.
#[must_use]
pub const fn status_label(score: u32) -> &'static str {
    match score {
        80.. => "Excellent",
        60..=79 => "Good",
        40..=59 => "Needs Improvement",
        _ => "Poor",
    }
}

/// Weighted overall score over the categories that carry weight, plus the
/// structured-data bonus.
///
/// Order-independent: categories are matched by id, not position.
#[must_use]
pub fn overall_score(categories: &[CategoryResult]) -> u32 {
    let weight_sum: u32 = categories.iter().map(|c| c.weight).sum();
    let base = if weight_sum == 0 {
        0
    } else {
        let weighted: f64 = categories
            .iter()
            .map(|c| f64::from(c.score) * f64::from(c.weight))
            .sum();
        (weighted / f64::from(weight_sum)).round() as u32
    };

    let bonus = categories
        .iter()
        .find(|c| c.id == ScoreCategory::StructuredData.id())
        .map_or(0, |c| {
            (f64::from(c.score) / 100.0 * f64::from(tables::STRUCTURED_DATA_BONUS_CAP)).round()
                as u32
        });

    (base + bonus).min(100)
}

fn build_summary(categories: &[CategoryResult], overall: u32) -> AnalysisSummary {
    let strengths = categories
        .iter()
        .filter(|c| c.score >= 75)
        .map(|c| c.name.clone())
        .collect();

    // Weakest categories first, then dedup while keeping first occurrence.
    let mut by_score: Vec<&CategoryResult> = categories.iter().collect();
    by_score.sort_by_key(|c| c.score);
    let mut improvements: Vec<String> = Vec::new();
    for category in by_score {
        for rec in &category.recommendations {
            if !improvements.contains(rec) {
                improvements.push(rec.clone());
            }
        }
    }

    let priority = if overall < 40 {
        "high"
    } else if overall < 70 {
        "medium"
    } else {
        "low"
    };

    AnalysisSummary {
        strengths,
        improvements,
        priority: priority.to_string(),
    }
}

fn mean_rounded(scores: impl Iterator<Item = u32>) -> u32 {
    let collected: Vec<u32> = scores.collect();
    if collected.is_empty() {
        return 0;
    }
    let sum: u32 = collected.iter().sum();
    (f64::from(sum) / collected.len() as f64).round() as u32
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::fetcher::{FetchOutcome, SiteResponse};
    use std::collections::HashMap;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn context_for(html: &str) -> SiteContext {
        SiteContext {
            url: Url::parse("https://example.com/").unwrap(),
            page: FetchOutcome::Reachable(SiteResponse {
                status: 200,
                body: html.to_string(),
                headers: HashMap::new(),
            }),
            response_time_ms: 120,
            robots: Some(RobotsRules::parse("User-agent: *\nAllow: /\n")),
            metrics: metrics::extract(html),
            sitemap_status: 200,
            llms_txt_status: 200,
            feed_status: 200,
        }
    }

    fn category(id: &str, weight: u32, score: u32) -> CategoryResult {
        CategoryResult {
            id: id.to_string(),
            name: id.to_string(),
            weight,
            score,
            checks: Vec::new(),
            recommendations: Vec::new(),
        }
    }

    #[test]
    fn status_labels_bucket_correctly() {
        assert_eq!(status_label(95), "Excellent");
        assert_eq!(status_label(80), "Excellent");
        assert_eq!(status_label(79), "Good");
        assert_eq!(status_label(60), "Good");
        assert_eq!(status_label(59), "Needs Improvement");
        assert_eq!(status_label(40), "Needs Improvement");
        assert_eq!(status_label(39), "Poor");
        assert_eq!(status_label(0), "Poor");
    }

    #[test]
    fn overall_score_ignores_zero_weight_categories_in_base() {
        let categories = vec![
            category("access_control", 40, 100),
            category("structured_data", 0, 0),
            category("content_structure", 25, 100),
            category("technical", 35, 100),
        ];
        assert_eq!(overall_score(&categories), 100);
    }

    #[test]
    fn structured_data_contributes_as_bonus() {
        let without = vec![
            category("access_control", 40, 50),
            category("structured_data", 0, 0),
            category("content_structure", 25, 50),
            category("technical", 35, 50),
        ];
        let mut with = without.clone();
        with[1].score = 100;

        assert_eq!(overall_score(&without), 50);
        assert_eq!(
            overall_score(&with),
            50 + tables::STRUCTURED_DATA_BONUS_CAP
        );
    }

    #[test]
    fn overall_score_is_order_independent() {
        let mut categories = vec![
            category("access_control", 40, 80),
            category("structured_data", 0, 60),
            category("content_structure", 25, 40),
            category("technical", 35, 90),
        ];
        let forward = overall_score(&categories);
        categories.reverse();
        assert_eq!(overall_score(&categories), forward);
    }

    #[test]
    fn overall_score_caps_at_one_hundred() {
        let categories = vec![
            category("access_control", 40, 100),
            category("structured_data", 0, 100),
            category("content_structure", 25, 100),
            category("technical", 35, 100),
        ];
        assert_eq!(overall_score(&categories), 100);
    }

    #[test]
    fn failing_check_becomes_error_result_without_poisoning_others() {
        fn broken(_: &SiteContext) -> crate::Result<CheckOutcome> {
            Err(Error::Parse("synthetic failure".to_string()))
        }
        let spec = CheckSpec {
            id: "broken_check",
            name: "Broken Check",
            category: ScoreCategory::Technical,
            run: broken,
        };

        let context = context_for("<html><body><h1>ok</h1></body></html>");
        let result = run_check(&spec, &context);
        assert_eq!(result.score, 0);
        assert_eq!(result.status, "Error");
        assert!(result.details.contains("synthetic failure"));

        // The regular battery still runs to completion.
        let categories = run_battery(&context);
        assert_eq!(categories.len(), ScoreCategory::ALL.len());
    }

    #[test]
    fn battery_covers_every_check_exactly_once() {
        let context = context_for("<html><body><h1>ok</h1></body></html>");
        let categories = run_battery(&context);
        let total: usize = categories.iter().map(|c| c.checks.len()).sum();
        assert_eq!(total, CHECK_BATTERY.len());
        for check in categories.iter().flat_map(|c| &c.checks) {
            assert!(check.status != "Error", "{} errored", check.id);
        }
    }

    #[test]
    fn scoring_a_context_twice_is_idempotent() {
        let context = context_for(
            "<html><body><main><h1>T</h1><h2>A</h2><h3>B</h3><p>words here</p></main></body></html>",
        );
        let first = build_response(&context);
        let second = build_response(&context);
        assert_eq!(first.overall_score, second.overall_score);
        for (a, b) in first.categories.iter().zip(&second.categories) {
            assert_eq!(a.score, b.score);
        }
    }

    #[test]
    fn summary_collects_strengths_and_deduped_improvements() {
        let context = context_for("<html><body><p>thin</p></body></html>");
        let response = build_response(&context);

        // Access control scores 100 here (permissive robots + llms.txt).
        assert!(response
            .summary
            .strengths
            .iter()
            .any(|s| s == "Access Control"));
        let mut seen = std::collections::HashSet::new();
        for improvement in &response.summary.improvements {
            assert!(seen.insert(improvement.clone()), "duplicate: {improvement}");
        }
    }

    #[tokio::test]
    async fn analyze_rejects_invalid_urls_only() {
        let fetcher = Arc::new(
            Fetcher::with_timeout(Duration::from_millis(500), Duration::ZERO).unwrap(),
        );
        let engine = ScoringEngine::new(fetcher);

        assert!(matches!(
            engine.analyze("not a url").await,
            Err(Error::InvalidUrl(_))
        ));

        // Unreachable targets still score (badly), they do not error.
        let response = engine.analyze("http://127.0.0.1:1/").await.unwrap();
        assert!(response.overall_score < 40);
        assert_eq!(response.summary.priority, "high");
    }

    #[tokio::test]
    async fn gather_context_probes_auxiliary_files() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<html><body><main><h1>Home</h1></main></body></html>"),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/robots.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nAllow: /\n"))
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/sitemap.xml"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/llms.txt"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/rss.xml"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        // Remaining feed paths and anything else: 404.
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = Arc::new(
            Fetcher::with_timeout(Duration::from_secs(5), Duration::ZERO).unwrap(),
        );
        let engine = ScoringEngine::new(fetcher);
        let url = Url::parse(&format!("{}/", server.uri())).unwrap();
        let context = engine.gather_context(url).await;

        assert_eq!(context.page.status(), 200);
        assert!(context.robots.is_some());
        assert_eq!(context.sitemap_status, 200);
        assert_eq!(context.llms_txt_status, 404);
        assert_eq!(context.feed_status, 200);
        assert_eq!(context.metrics.h1_count, 1);
    }

    #[tokio::test]
    async fn robots_fetch_error_status_means_no_rules() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/robots.txt"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = Arc::new(
            Fetcher::with_timeout(Duration::from_secs(5), Duration::ZERO).unwrap(),
        );
        let engine = ScoringEngine::new(fetcher);
        let url = Url::parse(&format!("{}/", server.uri())).unwrap();
        let context = engine.gather_context(url).await;

        assert!(context.robots.is_none());
    }
}
