//! Multi-site orchestration: discovery, batched analysis, aggregation.
//!
//! The orchestrator ties the pipeline together: discover (or accept) a set
//! of sites, analyze them in fixed-size concurrent batches, apply
//! context-aware adjustment per site, and roll everything up into one
//! response. A failure on one site never aborts the run; the failed site is
//! reported with a zero score and the error as its only improvement.

use crate::config::{AnalysisConfig, Config};
use crate::context;
use crate::discovery::candidates::Candidate;
use crate::discovery::{probe, DiscoveryEngine, DiscoveryOptions};
use crate::fetcher::Fetcher;
use crate::scoring::ScoringEngine;
use crate::types::{
    AnalysisResponse, AnalysisSummary, ContextAwareScore, DiscoveredSite, DiscoveryResult,
    MultiSiteAnalysisResponse, MultiSiteRequest, MultiSiteSummary, OriginKind,
    PrioritizedRecommendation, SiteAnalysisResult, SiteInfo, SiteKind,
};
use crate::util;
use crate::Result;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD_NO_PAD;
use chrono::Utc;
use futures::future::join_all;
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use tracing::{info, warn};

/// Length of the opaque request identifier.
const REQUEST_ID_LEN: usize = 16;

/// Cap on cross-site recommendations in the summary.
const MAX_PRIORITIZED_RECOMMENDATIONS: usize = 10;

/// Test seam for swapping out the per-site analysis.
#[cfg(test)]
type AnalyzeOverride = Box<
    dyn Fn(&str) -> futures::future::BoxFuture<'static, Result<AnalysisResponse>> + Send + Sync,
>;

/// Coordinates a full multi-site run.
pub struct Orchestrator {
    fetcher: std::sync::Arc<Fetcher>,
    engine: ScoringEngine,
    discovery: DiscoveryEngine,
    analysis: AnalysisConfig,
    #[cfg(test)]
    analyze_override: Option<AnalyzeOverride>,
}

impl Orchestrator {
    /// Creates an orchestrator from configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let fetcher = std::sync::Arc::new(Fetcher::new(&config.fetch)?);
        Ok(Self::from_parts(fetcher, config.analysis.clone()))
    }

    /// Creates an orchestrator over an existing fetcher.
    #[must_use]
    pub fn from_parts(fetcher: std::sync::Arc<Fetcher>, analysis: AnalysisConfig) -> Self {
        Self {
            engine: ScoringEngine::new(fetcher.clone()),
            discovery: DiscoveryEngine::new(fetcher.clone()),
            fetcher,
            analysis,
            #[cfg(test)]
            analyze_override: None,
        }
    }

    /// Run discovery (or probe the supplied URLs) and analyze every site.
    pub async fn run(&self, request: &MultiSiteRequest) -> Result<MultiSiteAnalysisResponse> {
        let request_id = request_id(&request.input_url);
        info!(
            request_id,
            input_url = %request.input_url,
            discovery = request.discovery_enabled,
            "starting multi-site run"
        );

        let discovery = if request.discovery_enabled {
            let options = DiscoveryOptions {
                include_subdomains: request.include_subdomains,
                include_paths: request.include_paths,
            };
            self.discovery
                .discover_with(&request.input_url, options)
                .await?
        } else {
            self.probe_custom_urls(request).await?
        };

        let targets: Vec<DiscoveredSite> = discovery
            .analysis_ready
            .iter()
            .take(request.max_sites)
            .cloned()
            .collect();

        let mut analyses = Vec::with_capacity(targets.len());
        for batch in targets.chunks(self.analysis.batch_size.max(1)) {
            let results = join_all(batch.iter().map(|site| self.analyze_one(site))).await;
            analyses.extend(results);
        }

        let summary = summarize(&analyses);
        Ok(MultiSiteAnalysisResponse {
            request_id,
            input_url: request.input_url.clone(),
            discovery,
            analyses,
            summary,
        })
    }

    /// Probe explicit URLs in place of discovery.
    async fn probe_custom_urls(&self, request: &MultiSiteRequest) -> Result<DiscoveryResult> {
        let seed_url = util::normalize_input_url(&request.input_url)?;
        let main_domain = util::bare_domain(&seed_url);

        let mut pool = Vec::new();
        for raw in &request.custom_urls {
            match util::normalize_input_url(raw) {
                Ok(url) => pool.push(Candidate {
                    url: url.to_string(),
                    origin_kind: OriginKind::Main,
                }),
                Err(e) => warn!(url = raw, error = %e, "skipping unparseable custom URL"),
            }
        }

        let probed = probe::probe_all(&self.fetcher, &pool).await;
        let discovered_sites = probe::dedup_by_final_url(probed);
        let total_found = discovered_sites.len();
        let analysis_ready = discovered_sites
            .iter()
            .filter(|site| site.accessible)
            .cloned()
            .collect();

        Ok(DiscoveryResult {
            main_domain,
            site_kind: SiteKind::Unknown,
            discovered_sites,
            total_found,
            analysis_ready,
        })
    }

    /// Analyze one discovered site, never propagating its failure.
    async fn analyze_one(&self, site: &DiscoveredSite) -> SiteAnalysisResult {
        let site_info = SiteInfo {
            category: site.category,
            origin_kind: site.origin_kind,
            discovered_at: Utc::now(),
        };

        match self.run_analysis(&site.final_url).await {
            Ok(mut analysis) => {
                let adjustment = context::adjust(&analysis, site.category);
                let context_aware_score = ContextAwareScore {
                    original_score: analysis.overall_score,
                    adjusted_score: adjustment.adjusted_score,
                    adjustment_reason: adjustment.reason,
                };
                analysis.page_type = Some(site.category);
                if !adjustment.adjustments.is_empty() {
                    analysis.scoring_adjustments = Some(adjustment.adjustments);
                }
                SiteAnalysisResult {
                    analysis,
                    site_info,
                    context_aware_score,
                }
            },
            Err(e) => {
                warn!(url = %site.final_url, error = %e, "site analysis failed");
                failed_site_result(&site.final_url, &e.to_string(), site_info)
            },
        }
    }

    async fn run_analysis(&self, url: &str) -> Result<AnalysisResponse> {
        #[cfg(test)]
        if let Some(analyze) = &self.analyze_override {
            return analyze(url).await;
        }
        self.engine.analyze(url).await
    }
}

/// Zero-score placeholder for a site whose analysis failed.
fn failed_site_result(url: &str, error: &str, site_info: SiteInfo) -> SiteAnalysisResult {
    SiteAnalysisResult {
        analysis: AnalysisResponse {
            url: url.to_string(),
            timestamp: Utc::now(),
            overall_score: 0,
            categories: Vec::new(),
            summary: AnalysisSummary {
                strengths: Vec::new(),
                improvements: vec![format!("Analysis failed: {error}")],
                priority: "high".to_string(),
            },
            page_type: None,
            scoring_adjustments: None,
        },
        site_info,
        context_aware_score: ContextAwareScore {
            original_score: 0,
            adjusted_score: 0,
            adjustment_reason: "Analysis failed".to_string(),
        },
    }
}

/// Opaque, collision-resistant run identifier.
fn request_id(input_url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input_url.as_bytes());
    hasher.update(Utc::now().timestamp_nanos_opt().unwrap_or_default().to_le_bytes());
    STANDARD_NO_PAD
        .encode(hasher.finalize())
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(REQUEST_ID_LEN)
        .collect()
}

/// Cross-site aggregate: averages, extremes, and prioritized advice.
fn summarize(analyses: &[SiteAnalysisResult]) -> MultiSiteSummary {
    let total_sites = analyses.len();
    let average_score = if analyses.is_empty() {
        0
    } else {
        let sum: u32 = analyses.iter().map(|a| a.analysis.overall_score).sum();
        (f64::from(sum) / analyses.len() as f64).round() as u32
    };

    let highest_score = analyses
        .iter()
        .max_by(|a, b| {
            a.analysis
                .overall_score
                .cmp(&b.analysis.overall_score)
                // First occurrence wins ties.
                .then(std::cmp::Ordering::Greater)
        })
        .map(|a| a.analysis.url.clone());
    let lowest_score = analyses
        .iter()
        .min_by(|a, b| {
            a.analysis
                .overall_score
                .cmp(&b.analysis.overall_score)
                .then(std::cmp::Ordering::Less)
        })
        .map(|a| a.analysis.url.clone());

    MultiSiteSummary {
        total_sites,
        average_score,
        highest_score,
        lowest_score,
        recommendations_priority: prioritize_recommendations(analyses),
    }
}

/// Group identical recommendations across sites and rank them by
/// `occurrences * mean(100 - source category score) * distinct sites`.
fn prioritize_recommendations(analyses: &[SiteAnalysisResult]) -> Vec<PrioritizedRecommendation> {
    struct Tally {
        text: String,
        occurrences: usize,
        impact_sum: u32,
        sites: BTreeSet<String>,
    }

    let mut tallies: Vec<Tally> = Vec::new();
    for result in analyses {
        for category in &result.analysis.categories {
            for rec in &category.recommendations {
                let impact = 100_u32.saturating_sub(category.score);
                match tallies.iter_mut().find(|t| t.text == *rec) {
                    Some(tally) => {
                        tally.occurrences += 1;
                        tally.impact_sum += impact;
                        tally.sites.insert(result.analysis.url.clone());
                    },
                    None => tallies.push(Tally {
                        text: rec.clone(),
                        occurrences: 1,
                        impact_sum: impact,
                        sites: BTreeSet::from([result.analysis.url.clone()]),
                    }),
                }
            }
        }
    }

    let mut prioritized: Vec<PrioritizedRecommendation> = tallies
        .into_iter()
        .map(|tally| {
            let mean_impact = f64::from(tally.impact_sum) / tally.occurrences as f64;
            PrioritizedRecommendation {
                priority_score: tally.occurrences as f64 * mean_impact * tally.sites.len() as f64,
                recommendation: tally.text,
                occurrence_count: tally.occurrences,
                affected_sites: tally.sites.len(),
            }
        })
        .collect();

    prioritized.sort_by(|a, b| {
        b.priority_score
            .partial_cmp(&a.priority_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    prioritized.truncate(MAX_PRIORITIZED_RECOMMENDATIONS);
    prioritized
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{CategoryResult, SiteCategory};
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn orchestrator() -> Orchestrator {
        let fetcher = std::sync::Arc::new(
            Fetcher::with_timeout(Duration::from_secs(5), Duration::ZERO).unwrap(),
        );
        Orchestrator::from_parts(fetcher, AnalysisConfig::default())
    }

    fn canned_analysis(url: &str) -> AnalysisResponse {
        let categories = [
            ("access_control", 40),
            ("structured_data", 0),
            ("content_structure", 25),
            ("technical", 35),
        ]
        .into_iter()
        .map(|(id, weight)| CategoryResult {
            id: id.to_string(),
            name: id.to_string(),
            weight,
            score: 80,
            checks: Vec::new(),
            recommendations: Vec::new(),
        })
        .collect();

        AnalysisResponse {
            url: url.to_string(),
            timestamp: Utc::now(),
            overall_score: 80,
            categories,
            summary: AnalysisSummary {
                strengths: Vec::new(),
                improvements: Vec::new(),
                priority: "low".to_string(),
            },
            page_type: None,
            scoring_adjustments: None,
        }
    }

    fn result_with(url: &str, overall: u32, recs: &[(&str, u32, &[&str])]) -> SiteAnalysisResult {
        let categories = recs
            .iter()
            .map(|(id, score, advice)| CategoryResult {
                id: (*id).to_string(),
                name: (*id).to_string(),
                weight: 25,
                score: *score,
                checks: Vec::new(),
                recommendations: advice.iter().map(|a| (*a).to_string()).collect(),
            })
            .collect();
        SiteAnalysisResult {
            analysis: AnalysisResponse {
                url: url.to_string(),
                timestamp: Utc::now(),
                overall_score: overall,
                categories,
                summary: AnalysisSummary {
                    strengths: Vec::new(),
                    improvements: Vec::new(),
                    priority: "medium".to_string(),
                },
                page_type: None,
                scoring_adjustments: None,
            },
            site_info: SiteInfo {
                category: SiteCategory::Unknown,
                origin_kind: OriginKind::Main,
                discovered_at: Utc::now(),
            },
            context_aware_score: ContextAwareScore {
                original_score: overall,
                adjusted_score: overall,
                adjustment_reason: String::new(),
            },
        }
    }

    #[test]
    fn failed_site_record_carries_the_error_as_sole_improvement() {
        let info = SiteInfo {
            category: SiteCategory::Docs,
            origin_kind: OriginKind::Subdomain,
            discovered_at: Utc::now(),
        };
        let record = failed_site_result("https://docs.example.com", "boom", info);

        assert_eq!(record.analysis.overall_score, 0);
        assert_eq!(record.context_aware_score.adjusted_score, 0);
        assert_eq!(record.analysis.summary.priority, "high");
        assert_eq!(
            record.analysis.summary.improvements,
            vec!["Analysis failed: boom".to_string()]
        );
        assert!(record.analysis.categories.is_empty());
    }

    #[test]
    fn request_ids_are_opaque_and_unique() {
        let a = request_id("https://example.com");
        let b = request_id("https://example.com");
        assert_eq!(a.len(), REQUEST_ID_LEN);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b, "same input at different instants must differ");
    }

    #[test]
    fn summary_reports_extremes_with_first_occurrence_tie_break() {
        let analyses = vec![
            result_with("https://a.example.com", 70, &[]),
            result_with("https://b.example.com", 90, &[]),
            result_with("https://c.example.com", 90, &[]),
            result_with("https://d.example.com", 30, &[]),
        ];
        let summary = summarize(&analyses);
        assert_eq!(summary.total_sites, 4);
        assert_eq!(summary.average_score, 70);
        assert_eq!(summary.highest_score.as_deref(), Some("https://b.example.com"));
        assert_eq!(summary.lowest_score.as_deref(), Some("https://d.example.com"));
    }

    #[test]
    fn empty_run_summarizes_to_zero() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_sites, 0);
        assert_eq!(summary.average_score, 0);
        assert!(summary.highest_score.is_none());
        assert!(summary.recommendations_priority.is_empty());
    }

    #[test]
    fn widespread_low_score_advice_ranks_first() {
        let analyses = vec![
            result_with(
                "https://a.example.com",
                50,
                &[
                    ("access_control", 20, &["Allow AI crawlers"]),
                    ("technical", 90, &["Publish a sitemap"]),
                ],
            ),
            result_with(
                "https://b.example.com",
                60,
                &[("access_control", 30, &["Allow AI crawlers"])],
            ),
        ];

        let prioritized = prioritize_recommendations(&analyses);
        assert_eq!(prioritized[0].recommendation, "Allow AI crawlers");
        assert_eq!(prioritized[0].occurrence_count, 2);
        assert_eq!(prioritized[0].affected_sites, 2);
        // 2 occurrences * mean(80, 70) * 2 sites = 300.
        assert!((prioritized[0].priority_score - 300.0).abs() < f64::EPSILON);
        assert!(prioritized[0].priority_score > prioritized[1].priority_score);
    }

    #[test]
    fn recommendation_list_is_capped() {
        let recs: Vec<(String, u32)> = (0..15).map(|i| (format!("advice {i}"), 10)).collect();
        let categories: Vec<(&str, u32, Vec<&str>)> = recs
            .iter()
            .map(|(text, score)| ("access_control", *score, vec![text.as_str()]))
            .collect();
        let borrowed: Vec<(&str, u32, &[&str])> = categories
            .iter()
            .map(|(id, score, advice)| (*id, *score, advice.as_slice()))
            .collect();
        let analyses = vec![result_with("https://a.example.com", 10, &borrowed)];

        let prioritized = prioritize_recommendations(&analyses);
        assert_eq!(prioritized.len(), MAX_PRIORITIZED_RECOMMENDATIONS);
    }

    #[tokio::test]
    async fn custom_url_mode_skips_discovery() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<h1>Home</h1>"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/robots.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nAllow: /\n"))
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let request = MultiSiteRequest {
            input_url: server.uri(),
            discovery_enabled: false,
            custom_urls: vec![format!("{}/", server.uri()), "not a url".to_string()],
            include_subdomains: true,
            include_paths: true,
            max_sites: 10,
        };

        let response = orchestrator().run(&request).await.unwrap();
        assert_eq!(response.discovery.site_kind, SiteKind::Unknown);
        assert_eq!(response.analyses.len(), 1);
        assert_eq!(response.summary.total_sites, 1);
    }

    #[tokio::test]
    async fn one_failing_site_never_aborts_the_run() {
        let server = MockServer::start().await;
        for p in ["/", "/docs", "/blog"] {
            Mock::given(method("GET"))
                .and(path(p))
                .respond_with(ResponseTemplate::new(200).set_body_string("<h1>Page</h1>"))
                .mount(&server)
                .await;
        }
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let mut orchestrator = orchestrator();
        orchestrator.analyze_override = Some(Box::new(
            |url: &str| -> futures::future::BoxFuture<'static, crate::Result<AnalysisResponse>> {
                let url = url.to_string();
                Box::pin(async move {
                    if url.ends_with("/blog") {
                        Err(crate::Error::Other("scoring backend unavailable".to_string()))
                    } else {
                        Ok(canned_analysis(&url))
                    }
                })
            },
        ));

        let request = MultiSiteRequest {
            input_url: server.uri(),
            discovery_enabled: false,
            custom_urls: vec![
                format!("{}/", server.uri()),
                format!("{}/docs", server.uri()),
                format!("{}/blog", server.uri()),
            ],
            include_subdomains: true,
            include_paths: true,
            max_sites: 10,
        };

        let response = orchestrator.run(&request).await.unwrap();

        assert_eq!(response.analyses.len(), 3);
        assert_eq!(response.summary.total_sites, 3);

        let failed: Vec<_> = response
            .analyses
            .iter()
            .filter(|a| a.analysis.overall_score == 0)
            .collect();
        assert_eq!(failed.len(), 1);
        assert!(failed[0].analysis.url.ends_with("/blog"));
        assert_eq!(
            failed[0].analysis.summary.improvements,
            vec!["Analysis failed: scoring backend unavailable".to_string()]
        );
        assert_eq!(failed[0].analysis.summary.priority, "high");

        // The siblings kept their real scores.
        assert!(response
            .analyses
            .iter()
            .filter(|a| !a.analysis.url.ends_with("/blog"))
            .all(|a| a.analysis.overall_score == 80));
    }

    #[tokio::test]
    async fn max_sites_bounds_the_analyzed_set() {
        let server = MockServer::start().await;
        for p in ["/", "/docs", "/blog", "/api"] {
            Mock::given(method("GET"))
                .and(path(p))
                .respond_with(ResponseTemplate::new(200).set_body_string("<h1>Page</h1>"))
                .mount(&server)
                .await;
        }
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let request = MultiSiteRequest {
            input_url: server.uri(),
            discovery_enabled: false,
            custom_urls: vec![
                format!("{}/", server.uri()),
                format!("{}/docs", server.uri()),
                format!("{}/blog", server.uri()),
                format!("{}/api", server.uri()),
            ],
            include_subdomains: true,
            include_paths: true,
            max_sites: 2,
        };

        let response = orchestrator().run(&request).await.unwrap();
        assert_eq!(response.analyses.len(), 2);
        assert_eq!(response.discovery.analysis_ready.len(), 4);
    }
}
