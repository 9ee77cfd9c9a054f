//! Core data types shared across the analysis pipeline.
//!
//! Every type here is created fresh per request and never mutated after
//! construction. All response types serialize to camelCase JSON for the
//! consumers that snapshot or render analysis results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Functional category of a page, derived from its URL alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteCategory {
    /// Root page or a root-level about/home/index slug.
    Homepage,
    /// Documentation, help centers, guides.
    Docs,
    /// Blogs, news, changelogs.
    Blog,
    /// Developer/API surfaces.
    Api,
    /// Storefronts and commerce pages.
    Shop,
    /// Support, contact, community pages.
    Support,
    /// Anything that matched no token family.
    Unknown,
}

impl SiteCategory {
    /// Stable lowercase label used in details and adjustment reasons.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Homepage => "homepage",
            Self::Docs => "docs",
            Self::Blog => "blog",
            Self::Api => "api",
            Self::Shop => "shop",
            Self::Support => "support",
            Self::Unknown => "unknown",
        }
    }
}

/// Coarse classification of what kind of site a seed URL belongs to.
///
/// Drives which subdomain/path candidate patterns discovery tries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SiteKind {
    /// Developer platforms: SDKs, API references, docs portals.
    DeveloperPlatform,
    /// Storefronts.
    Ecommerce,
    /// Hosted product with signup/pricing pages.
    Saas,
    /// Editorial/publishing sites.
    ContentSite,
    /// Brochure/corporate sites.
    Corporate,
    /// No signal either way.
    Unknown,
}

/// Where a discovered site sits relative to the seed domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OriginKind {
    /// The seed URL itself.
    Main,
    /// A sibling subdomain (e.g. `docs.example.com`).
    Subdomain,
    /// A path under the seed domain (e.g. `example.com/docs`).
    Path,
}

/// A site surfaced by the discovery engine, immutable once emitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveredSite {
    /// Candidate URL as generated (pre-redirect).
    pub url: String,
    /// Relationship of this URL to the seed domain.
    pub origin_kind: OriginKind,
    /// Category derived from the final URL's tokens.
    pub category: SiteCategory,
    /// Always true for emitted records; kept for consumers that merge
    /// discovered and manually supplied sites.
    pub discovered: bool,
    /// Whether the probe reached a non-error terminal response.
    pub accessible: bool,
    /// Whether the probe was redirected on the way to `final_url`.
    pub is_redirect: bool,
    /// Terminal URL after following redirects.
    pub final_url: String,
}

/// Result of one scoring rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    /// Stable check identifier (e.g. `ai_crawler_access`).
    pub id: String,
    /// Human-readable check name.
    pub name: String,
    /// Score in `[0, 100]`.
    pub score: u32,
    /// Qualitative bucket label ("Excellent", "Good", ..., or "Error").
    pub status: String,
    /// Human-readable evidence for the score.
    pub details: String,
    /// Wall-clock time the check took, in milliseconds.
    pub execution_time: u64,
}

/// A scoring category: an ordered set of checks plus derived advice.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResult {
    /// Stable category identifier (e.g. `access_control`).
    pub id: String,
    /// Human-readable category name.
    pub name: String,
    /// Weight from the active weighting table (not owned by the category).
    pub weight: u32,
    /// Rounded arithmetic mean of the contained checks' scores.
    pub score: u32,
    /// Checks in battery order.
    pub checks: Vec<CheckResult>,
    /// Advisory strings derived from low-scoring checks.
    pub recommendations: Vec<String>,
}

/// Narrative summary attached to a single-site analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    /// Categories that scored well.
    pub strengths: Vec<String>,
    /// Concrete improvement advice, highest impact first.
    pub improvements: Vec<String>,
    /// Overall urgency bucket: "high", "medium", or "low".
    pub priority: String,
}

/// A weight delta applied by the context-aware adjustor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringAdjustment {
    /// Category the adjustment applies to.
    pub category: String,
    /// Signed delta relative to the baseline expectation.
    pub adjustment: i32,
    /// Why the adjustment fired.
    pub reason: String,
}

/// Complete single-site analysis. `overall_score` is derived, never hand-set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    /// URL that was analyzed.
    pub url: String,
    /// When the analysis ran.
    pub timestamp: DateTime<Utc>,
    /// Weighted overall score in `[0, 100]`.
    pub overall_score: u32,
    /// Category results in battery order.
    pub categories: Vec<CategoryResult>,
    /// Narrative summary.
    pub summary: AnalysisSummary,
    /// Detected page category, when context-aware scoring ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_type: Option<SiteCategory>,
    /// Adjustments the weight adjustor applied, when any fired.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scoring_adjustments: Option<Vec<ScoringAdjustment>>,
}

/// Discovery metadata carried alongside a per-site analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteInfo {
    /// Category of the site at discovery time.
    pub category: SiteCategory,
    /// Origin relative to the seed domain.
    pub origin_kind: OriginKind,
    /// When discovery emitted the record.
    pub discovered_at: DateTime<Utc>,
}

/// Original vs context-adjusted score for one site.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextAwareScore {
    /// Score under the generic baseline weights.
    pub original_score: u32,
    /// Score after category-specific reweighting and rules.
    pub adjusted_score: u32,
    /// Rationale trail, joined for display.
    pub adjustment_reason: String,
}

/// One site's analysis inside a multi-site run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteAnalysisResult {
    /// The per-site analysis.
    #[serde(flatten)]
    pub analysis: AnalysisResponse,
    /// Discovery metadata for this site.
    pub site_info: SiteInfo,
    /// Context-aware scoring outcome.
    pub context_aware_score: ContextAwareScore,
}

/// Cross-site aggregate figures.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiSiteSummary {
    /// Number of sites analyzed (including failed ones).
    pub total_sites: usize,
    /// Rounded mean of overall scores.
    pub average_score: u32,
    /// URL of the best performer (first occurrence wins ties).
    pub highest_score: Option<String>,
    /// URL of the worst performer (first occurrence wins ties).
    pub lowest_score: Option<String>,
    /// Cross-site recommendations, highest priority first, at most 10.
    pub recommendations_priority: Vec<PrioritizedRecommendation>,
}

/// A recommendation aggregated across sites, scored for triage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrioritizedRecommendation {
    /// The recommendation text (identical strings are grouped).
    pub recommendation: String,
    /// How many times it occurred across all sites.
    pub occurrence_count: usize,
    /// Number of distinct sites it occurred on.
    pub affected_sites: usize,
    /// `occurrences * mean(100 - source category score) * distinct sites`.
    pub priority_score: f64,
}

/// Outcome of a full discovery run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryResult {
    /// Bare domain the seed resolved to (no `www.`).
    pub main_domain: String,
    /// Inferred kind of the seed site.
    pub site_kind: SiteKind,
    /// Every deduplicated probe survivor, reachable or not.
    pub discovered_sites: Vec<DiscoveredSite>,
    /// Total records before reachability filtering.
    pub total_found: usize,
    /// Reachable sites, in discovery order, ready for analysis.
    pub analysis_ready: Vec<DiscoveredSite>,
}

/// Options controlling a multi-site run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiSiteRequest {
    /// Seed URL for discovery, or context for custom URLs.
    pub input_url: String,
    /// When false, `custom_urls` is probed directly and discovery is skipped.
    pub discovery_enabled: bool,
    /// Explicit URL list used when discovery is disabled.
    #[serde(default)]
    pub custom_urls: Vec<String>,
    /// Whether discovery may guess subdomain candidates.
    #[serde(default = "default_true")]
    pub include_subdomains: bool,
    /// Whether discovery may guess path candidates.
    #[serde(default = "default_true")]
    pub include_paths: bool,
    /// Upper bound on sites analyzed.
    #[serde(default = "default_max_sites")]
    pub max_sites: usize,
}

const fn default_max_sites() -> usize {
    10
}

const fn default_true() -> bool {
    true
}

/// Response for a multi-site orchestration run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiSiteAnalysisResponse {
    /// Opaque id for this run.
    pub request_id: String,
    /// The seed URL as supplied.
    pub input_url: String,
    /// Discovery outcome that fed the run.
    pub discovery: DiscoveryResult,
    /// One entry per analyzed site, in discovery order.
    pub analyses: Vec<SiteAnalysisResult>,
    /// Cross-site aggregate.
    pub summary: MultiSiteSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn site_category_labels_are_lowercase() {
        for cat in [
            SiteCategory::Homepage,
            SiteCategory::Docs,
            SiteCategory::Blog,
            SiteCategory::Api,
            SiteCategory::Shop,
            SiteCategory::Support,
            SiteCategory::Unknown,
        ] {
            let label = cat.label();
            assert_eq!(label, label.to_lowercase());
        }
    }

    #[test]
    fn analysis_response_serializes_camel_case() {
        let response = AnalysisResponse {
            url: "https://example.com".to_string(),
            timestamp: Utc::now(),
            overall_score: 72,
            categories: Vec::new(),
            summary: AnalysisSummary {
                strengths: vec!["Technical Infrastructure".to_string()],
                improvements: Vec::new(),
                priority: "medium".to_string(),
            },
            page_type: Some(SiteCategory::Docs),
            scoring_adjustments: None,
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["overallScore"], 72);
        assert_eq!(json["pageType"], "docs");
        assert!(json.get("scoringAdjustments").is_none());
    }

    #[test]
    fn multi_site_request_defaults_keep_both_guess_families() {
        let request: MultiSiteRequest = serde_json::from_value(serde_json::json!({
            "inputUrl": "https://example.com",
            "discoveryEnabled": true,
        }))
        .unwrap();

        assert!(request.include_subdomains);
        assert!(request.include_paths);
        assert!(request.custom_urls.is_empty());
        assert_eq!(request.max_sites, 10);
    }

    #[test]
    fn site_analysis_result_flattens_analysis_fields() {
        let result = SiteAnalysisResult {
            analysis: AnalysisResponse {
                url: "https://docs.example.com".to_string(),
                timestamp: Utc::now(),
                overall_score: 55,
                categories: Vec::new(),
                summary: AnalysisSummary {
                    strengths: Vec::new(),
                    improvements: Vec::new(),
                    priority: "medium".to_string(),
                },
                page_type: None,
                scoring_adjustments: None,
            },
            site_info: SiteInfo {
                category: SiteCategory::Docs,
                origin_kind: OriginKind::Subdomain,
                discovered_at: Utc::now(),
            },
            context_aware_score: ContextAwareScore {
                original_score: 55,
                adjusted_score: 58,
                adjustment_reason: "docs weighting".to_string(),
            },
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["overallScore"], 55);
        assert_eq!(json["contextAwareScore"]["adjustedScore"], 58);
        assert_eq!(json["siteInfo"]["originKind"], "subdomain");
    }
}
