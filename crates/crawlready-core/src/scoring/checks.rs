//! The fixed battery of scoring checks.
//!
//! Each check is a pure function over a [`SiteContext`] that the engine
//! gathered up front, registered in [`CHECK_BATTERY`] by id. Checks return a
//! structured `{score, details}` pair; they never touch the network and
//! never abort the battery: an `Err` from one check is recorded as a
//! zero-score "Error" result by the engine and its siblings run on.

use crate::fetcher::FetchOutcome;
use crate::metrics::ContentMetrics;
use crate::robots::{RobotsRules, total_agent_weight};
use crate::scoring::tables::{
    self, DIVERSITY_BONUS_CAP, DIVERSITY_BONUS_PER_TYPE, ENRICHMENT_FIELDS, ENRICHMENT_POINTS_CAP,
    ENRICHMENT_POINTS_EACH, FAQ_CONTENT_BONUS, RICH_RESULTS_BASE, ScoreCategory,
};
use crate::Result;
use chrono::{Datelike, Utc};
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::LazyLock;
use url::Url;

/// Penalty subtracted per blocked critical agent.
const BLOCKED_AGENT_PENALTY: u32 = 15;

// SAFETY: pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static QUESTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(how|what|why|when|where|who|can|does|do|is|are)\b[^.?!]{3,120}\?").unwrap()
});

// SAFETY: pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static YEAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(20\d{2})\b").unwrap());

/// Everything a check may inspect, gathered before the battery runs.
///
/// All network traffic happens while building the context; the checks
/// themselves are deterministic functions of it.
#[derive(Debug)]
pub struct SiteContext {
    /// The analyzed URL.
    pub url: Url,
    /// The page fetch outcome (status 0 when unreachable).
    pub page: FetchOutcome,
    /// Round-trip time of the page fetch, in milliseconds.
    pub response_time_ms: u64,
    /// Parsed robots rules; `None` when no robots.txt could be fetched.
    pub robots: Option<RobotsRules>,
    /// Structural metrics of the fetched page.
    pub metrics: ContentMetrics,
    /// HEAD status of `/sitemap.xml` (0 unreachable).
    pub sitemap_status: u16,
    /// HEAD status of `/llms.txt` (0 unreachable).
    pub llms_txt_status: u16,
    /// Best HEAD status across the known feed paths (0 when none answered).
    pub feed_status: u16,
}

/// Structured result of one check: a bounded score plus evidence.
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    /// Score in `[0, 100]`.
    pub score: u32,
    /// Human-readable evidence for the score.
    pub details: String,
}

/// A registered check.
pub struct CheckSpec {
    /// Stable identifier.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Category the check belongs to.
    pub category: ScoreCategory,
    /// The scoring function.
    pub run: fn(&SiteContext) -> Result<CheckOutcome>,
}

/// The fixed, versioned check battery, grouped by category in battery order.
pub const CHECK_BATTERY: &[CheckSpec] = &[
    CheckSpec {
        id: "ai_crawler_access",
        name: "AI Crawler Access",
        category: ScoreCategory::AccessControl,
        run: check_ai_crawler_access,
    },
    CheckSpec {
        id: "llms_permissions",
        name: "AI Usage Permissions",
        category: ScoreCategory::AccessControl,
        run: check_llms_permissions,
    },
    CheckSpec {
        id: "schema_coverage",
        name: "Structured Data Coverage",
        category: ScoreCategory::StructuredData,
        run: check_schema_coverage,
    },
    CheckSpec {
        id: "schema_validity",
        name: "Structured Data Validity",
        category: ScoreCategory::StructuredData,
        run: check_schema_validity,
    },
    CheckSpec {
        id: "rich_results",
        name: "Rich Results Readiness",
        category: ScoreCategory::StructuredData,
        run: check_rich_results,
    },
    CheckSpec {
        id: "heading_hierarchy",
        name: "Heading Hierarchy",
        category: ScoreCategory::ContentStructure,
        run: check_heading_hierarchy,
    },
    CheckSpec {
        id: "server_side_content",
        name: "Server-Side Content",
        category: ScoreCategory::ContentStructure,
        run: check_server_side_content,
    },
    CheckSpec {
        id: "clean_extraction",
        name: "Clean Extraction",
        category: ScoreCategory::ContentStructure,
        run: check_clean_extraction,
    },
    CheckSpec {
        id: "content_clarity",
        name: "Content Clarity",
        category: ScoreCategory::ContentStructure,
        run: check_content_clarity,
    },
    CheckSpec {
        id: "content_freshness",
        name: "Content Freshness",
        category: ScoreCategory::ContentStructure,
        run: check_content_freshness,
    },
    CheckSpec {
        id: "https_usage",
        name: "HTTPS Usage",
        category: ScoreCategory::Technical,
        run: check_https_usage,
    },
    CheckSpec {
        id: "response_time",
        name: "Response Time",
        category: ScoreCategory::Technical,
        run: check_response_time,
    },
    CheckSpec {
        id: "sitemap",
        name: "Sitemap",
        category: ScoreCategory::Technical,
        run: check_sitemap,
    },
    CheckSpec {
        id: "alternate_formats",
        name: "Alternate Formats",
        category: ScoreCategory::Technical,
        run: check_alternate_formats,
    },
];

fn outcome(score: u32, details: impl Into<String>) -> Result<CheckOutcome> {
    Ok(CheckOutcome {
        score: score.min(100),
        details: details.into(),
    })
}

const fn is_http_success(status: u16) -> bool {
    status >= 200 && status < 300
}

/// The most elaborate check: resolve every critical AI agent against the
/// robots rules and score the allowed weight, with a flat 15-point penalty
/// per blocked agent. No fetchable robots file scores 0 outright.
fn check_ai_crawler_access(ctx: &SiteContext) -> Result<CheckOutcome> {
    let Some(robots) = &ctx.robots else {
        return outcome(
            0,
            "No robots.txt could be fetched; crawler access policy is undefined",
        );
    };

    let accesses = robots.evaluate_critical_agents();
    let total_weight = total_agent_weight();
    let allowed_weight: u32 = accesses
        .iter()
        .filter(|a| a.allowed)
        .map(|a| a.agent.weight)
        .sum();
    let blocked_count = accesses.iter().filter(|a| !a.allowed).count() as u32;

    let base = (f64::from(allowed_weight) / f64::from(total_weight) * 100.0).round() as i64;
    let score = (base - i64::from(blocked_count * BLOCKED_AGENT_PENALTY)).clamp(0, 100) as u32;

    let details = accesses
        .iter()
        .map(|a| {
            format!(
                "{} ({}): {}",
                a.agent.id,
                a.agent.platform,
                if a.allowed { "allowed" } else { "blocked" }
            )
        })
        .collect::<Vec<_>>()
        .join("; ");

    outcome(score, details)
}

fn check_llms_permissions(ctx: &SiteContext) -> Result<CheckOutcome> {
    if is_http_success(ctx.llms_txt_status) {
        return outcome(100, "llms.txt is published at the site root");
    }
    if ctx.robots.is_some() {
        return outcome(
            60,
            "No llms.txt file; robots.txt exists but states no AI usage policy",
        );
    }
    outcome(20, "Neither llms.txt nor robots.txt is available")
}

/// Extract the `@type` of a schema block (first entry when it is an array).
fn schema_type(block: &Value) -> Option<String> {
    match block.get("@type") {
        Some(Value::String(t)) => Some(t.clone()),
        Some(Value::Array(items)) => items
            .iter()
            .find_map(|item| item.as_str().map(str::to_string)),
        _ => None,
    }
}

fn distinct_recognized_types(blocks: &[Value]) -> BTreeSet<String> {
    blocks
        .iter()
        .filter_map(schema_type)
        .filter(|t| tables::is_recognized_type(t))
        .collect()
}

/// FAQ-like text without explicit FAQ markup: an FAQ heading, three
/// question-pattern sentences, or two "Q:"-style markers.
fn has_faq_signals(metrics: &ContentMetrics) -> bool {
    let faq_heading = metrics.heading_texts.iter().any(|h| {
        let lower = h.to_lowercase();
        lower.contains("faq") || lower.contains("frequently asked")
    });
    if faq_heading {
        return true;
    }
    if QUESTION_RE.find_iter(&metrics.text).count() >= 3 {
        return true;
    }
    metrics.text.matches("Q:").count() >= 2
}

fn check_schema_coverage(ctx: &SiteContext) -> Result<CheckOutcome> {
    let blocks = &ctx.metrics.schema_blocks;
    if blocks.is_empty() {
        return outcome(0, "No structured data blocks found");
    }

    let types = distinct_recognized_types(blocks);
    let type_points: u32 = types.iter().map(|t| tables::coverage_points(t)).sum();

    let has_faq_schema = types.contains("FAQPage") || types.contains("QAPage");
    let faq_bonus = if !has_faq_schema && has_faq_signals(&ctx.metrics) {
        FAQ_CONTENT_BONUS
    } else {
        0
    };

    let diversity_bonus = (types.len().saturating_sub(1) as u32 * DIVERSITY_BONUS_PER_TYPE)
        .min(DIVERSITY_BONUS_CAP);

    let score = type_points + faq_bonus + diversity_bonus;
    let details = format!(
        "{} block(s), {} recognized type(s): {}",
        blocks.len(),
        types.len(),
        if types.is_empty() {
            "none".to_string()
        } else {
            types.iter().cloned().collect::<Vec<_>>().join(", ")
        }
    );

    outcome(score, details)
}

/// Per-block validity: 20 for `@context`, 20 for a recognized type, up to 30
/// for required-field completeness, up to 10 for enrichment fields.
fn block_validity(block: &Value) -> (u32, Vec<&'static str>) {
    let mut score = 0;

    if block.get("@context").is_some() {
        score += 20;
    }

    let block_type = schema_type(block);
    let recognized = block_type
        .as_deref()
        .is_some_and(tables::is_recognized_type);
    if recognized {
        score += 20;
    }

    let required: &'static [&'static str] =
        block_type.as_deref().map_or(&[], tables::required_fields);
    let mut missing = Vec::new();
    if !required.is_empty() {
        let present = required
            .iter()
            .filter(|field| {
                let found = block.get(**field).is_some_and(|v| !v.is_null());
                if !found {
                    missing.push(**field);
                }
                found
            })
            .count();
        score += (present as f64 / required.len() as f64 * 30.0).round() as u32;
    }

    let enrichment = ENRICHMENT_FIELDS
        .iter()
        .filter(|field| block.get(**field).is_some_and(|v| !v.is_null()))
        .count() as u32
        * ENRICHMENT_POINTS_EACH;
    score += enrichment.min(ENRICHMENT_POINTS_CAP);

    (score, missing)
}

fn check_schema_validity(ctx: &SiteContext) -> Result<CheckOutcome> {
    let blocks = &ctx.metrics.schema_blocks;
    if blocks.is_empty() {
        return outcome(0, "No structured data blocks to validate");
    }

    let mut valid_count = 0_usize;
    let mut score_sum = 0_u32;
    let mut missing_fields: BTreeSet<&str> = BTreeSet::new();

    for block in blocks {
        let (score, missing) = block_validity(block);
        if missing.is_empty() && score >= 40 {
            valid_count += 1;
        }
        missing_fields.extend(missing);
        score_sum += score;
    }

    let valid_ratio = valid_count as f64 / blocks.len() as f64;
    let average = f64::from(score_sum) / blocks.len() as f64;
    let score = (valid_ratio * 60.0 + average * 0.4).round() as u32;

    let details = if missing_fields.is_empty() {
        format!("{valid_count}/{} blocks valid", blocks.len())
    } else {
        format!(
            "{valid_count}/{} blocks valid; missing required properties: {}",
            blocks.len(),
            missing_fields.into_iter().collect::<Vec<_>>().join(", ")
        )
    };

    outcome(score, details)
}

fn check_rich_results(ctx: &SiteContext) -> Result<CheckOutcome> {
    let blocks = &ctx.metrics.schema_blocks;
    if blocks.is_empty() {
        return outcome(0, "No structured data, so no rich-result eligibility");
    }

    let types = distinct_recognized_types(blocks);
    let points: u32 = types.iter().map(|t| tables::rich_results_points(t)).sum();
    let eligible: Vec<&str> = types
        .iter()
        .filter(|t| tables::rich_results_points(t) > 0)
        .map(String::as_str)
        .collect();

    let details = if eligible.is_empty() {
        "Schema present but no rich-result eligible types".to_string()
    } else {
        format!("Rich-result eligible types: {}", eligible.join(", "))
    };

    outcome(RICH_RESULTS_BASE + points, details)
}

fn check_heading_hierarchy(ctx: &SiteContext) -> Result<CheckOutcome> {
    if ctx.page.body().is_none() {
        return outcome(0, "Page could not be fetched");
    }
    let m = &ctx.metrics;
    let (score, details) = if m.h1_count == 1 && m.heading_count > 2 {
        (90, format!("One H1 and {} headings total", m.heading_count))
    } else if m.h1_count == 1 {
        (75, "One H1 but little supporting structure".to_string())
    } else if m.heading_count > 0 {
        (
            50,
            format!("{} H1 elements across {} headings", m.h1_count, m.heading_count),
        )
    } else {
        (20, "No headings found".to_string())
    };
    outcome(score, details)
}

fn check_server_side_content(ctx: &SiteContext) -> Result<CheckOutcome> {
    if ctx.page.body().is_none() {
        return outcome(0, "Page could not be fetched");
    }
    let m = &ctx.metrics;
    let score = if m.word_count >= 500 && m.heading_count > 0 {
        90
    } else if m.word_count >= 200 {
        70
    } else if m.word_count >= 50 {
        40
    } else {
        15
    };
    outcome(
        score,
        format!("{} words in the initial HTML response", m.word_count),
    )
}

fn check_clean_extraction(ctx: &SiteContext) -> Result<CheckOutcome> {
    if ctx.page.body().is_none() {
        return outcome(0, "Page could not be fetched");
    }
    let m = &ctx.metrics;
    let score = if m.signal_to_noise_ratio >= 0.7 && m.semantic_element_count >= 3 {
        90
    } else if m.semantic_element_count >= 3 {
        70
    } else if m.semantic_element_count >= 1 {
        55
    } else {
        30
    };
    outcome(
        score,
        format!(
            "{} landmark element(s), signal-to-noise {:.2}",
            m.semantic_element_count, m.signal_to_noise_ratio
        ),
    )
}

fn check_content_clarity(ctx: &SiteContext) -> Result<CheckOutcome> {
    if ctx.page.body().is_none() {
        return outcome(0, "Page could not be fetched");
    }
    let m = &ctx.metrics;
    let score = if m.heading_count >= 3 && m.word_count / m.heading_count <= 300 {
        85
    } else if m.heading_count >= 1 {
        65
    } else {
        40
    };
    outcome(
        score,
        format!(
            "{} heading(s) over {} words",
            m.heading_count, m.word_count
        ),
    )
}

fn check_content_freshness(ctx: &SiteContext) -> Result<CheckOutcome> {
    if ctx.page.body().is_none() {
        return outcome(0, "Page could not be fetched");
    }

    let mut date_strings: Vec<String> = ctx.metrics.date_hints.clone();
    for block in &ctx.metrics.schema_blocks {
        for field in ["datePublished", "dateModified"] {
            if let Some(value) = block.get(field).and_then(Value::as_str) {
                date_strings.push(value.to_string());
            }
        }
    }

    let newest_year = date_strings
        .iter()
        .flat_map(|s| YEAR_RE.captures_iter(s))
        .filter_map(|cap| cap[1].parse::<i32>().ok())
        .max();

    let current_year = Utc::now().year();
    let (score, details) = match newest_year {
        Some(year) if current_year - year <= 1 => {
            (90, format!("Most recent date signal is from {year}"))
        },
        Some(year) if current_year - year == 2 => {
            (70, format!("Most recent date signal is from {year}"))
        },
        Some(year) => (50, format!("Date signals are stale (newest {year})")),
        None => (30, "No machine-readable date signals found".to_string()),
    };
    outcome(score, details)
}

fn check_https_usage(ctx: &SiteContext) -> Result<CheckOutcome> {
    if ctx.url.scheme() == "https" {
        return outcome(100, "Site is served over HTTPS");
    }
    // Loopback hosts are secure contexts; scoring them as insecure would
    // only punish local and test deployments.
    let loopback = ctx.url.host_str().is_some_and(|host| {
        host == "localhost"
            || host
                .parse::<std::net::IpAddr>()
                .is_ok_and(|ip| ip.is_loopback())
    });
    if loopback {
        return outcome(100, "Loopback host; treated as a secure context");
    }
    outcome(0, "Site is served over plain HTTP")
}

fn check_response_time(ctx: &SiteContext) -> Result<CheckOutcome> {
    if ctx.page.status() == 0 {
        return outcome(0, "Target did not respond");
    }
    let ms = ctx.response_time_ms;
    let score = match ms {
        0..=299 => 100,
        300..=799 => 85,
        800..=1499 => 70,
        1500..=2999 => 50,
        _ => 25,
    };
    outcome(score, format!("Responded in {ms}ms"))
}

fn check_sitemap(ctx: &SiteContext) -> Result<CheckOutcome> {
    if is_http_success(ctx.sitemap_status) {
        outcome(100, "sitemap.xml is reachable")
    } else {
        outcome(0, "No reachable sitemap.xml")
    }
}

fn check_alternate_formats(ctx: &SiteContext) -> Result<CheckOutcome> {
    if is_http_success(ctx.feed_status) {
        outcome(100, "A machine-readable feed is reachable")
    } else {
        outcome(0, "No RSS/Atom feed found at the usual paths")
    }
}
