//! Centralized rule tables for the scoring engine.
//!
//! Every point value, weight, and trigger lives here as an immutable lookup
//! structure so the scoring functions that consume them stay free of magic
//! numbers and the tables stay unit-testable on their own.

use crate::types::SiteCategory;

/// The four scoring categories, in battery order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoreCategory {
    /// Whether AI crawlers may access the site at all.
    AccessControl,
    /// Machine-readable structured data coverage and quality.
    StructuredData,
    /// How well content is structured for extraction.
    ContentStructure,
    /// Transport, latency, and auxiliary files.
    Technical,
}

impl ScoreCategory {
    /// All categories in battery order.
    pub const ALL: &'static [Self] = &[
        Self::AccessControl,
        Self::StructuredData,
        Self::ContentStructure,
        Self::Technical,
    ];

    /// Stable identifier used in results and weight tables.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::AccessControl => "access_control",
            Self::StructuredData => "structured_data",
            Self::ContentStructure => "content_structure",
            Self::Technical => "technical",
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::AccessControl => "Access Control",
            Self::StructuredData => "Structured Data",
            Self::ContentStructure => "Content Structure",
            Self::Technical => "Technical Infrastructure",
        }
    }
}

/// Baseline category weights.
///
/// Structured data carries weight 0 here: most sites have none, so instead
/// of dragging the weighted mean down it is folded into the overall score as
/// a bonus of up to 10 points.
pub const BASELINE_WEIGHTS: &[(ScoreCategory, u32)] = &[
    (ScoreCategory::AccessControl, 40),
    (ScoreCategory::StructuredData, 0),
    (ScoreCategory::ContentStructure, 25),
    (ScoreCategory::Technical, 35),
];

/// Look up a category's baseline weight.
#[must_use]
pub fn baseline_weight(category: ScoreCategory) -> u32 {
    BASELINE_WEIGHTS
        .iter()
        .find(|(c, _)| *c == category)
        .map_or(0, |(_, w)| *w)
}

/// Maximum points the structured-data bonus can add to the overall score.
pub const STRUCTURED_DATA_BONUS_CAP: u32 = 10;

/// Schema-type point values for coverage scoring, skewed toward types AI
/// assistants consume directly.
pub const SCHEMA_COVERAGE_POINTS: &[(&str, u32)] = &[
    ("FAQPage", 30),
    ("QAPage", 28),
    ("HowTo", 25),
    ("Article", 20),
    ("BlogPosting", 20),
    ("Recipe", 20),
    ("Product", 18),
    ("Review", 15),
    ("Event", 15),
    ("VideoObject", 12),
    ("BreadcrumbList", 12),
    ("Organization", 8),
    ("WebSite", 8),
    ("WebPage", 8),
];

/// Bonus when FAQ-like text exists without an explicit FAQ schema.
pub const FAQ_CONTENT_BONUS: u32 = 10;

/// Per-extra-distinct-type diversity bonus and its cap.
pub const DIVERSITY_BONUS_PER_TYPE: u32 = 5;
/// Upper bound on the diversity bonus.
pub const DIVERSITY_BONUS_CAP: u32 = 15;

/// Schema-type point values for rich-results readiness.
pub const RICH_RESULTS_POINTS: &[(&str, u32)] = &[
    ("FAQPage", 25),
    ("HowTo", 20),
    ("Product", 20),
    ("Review", 15),
    ("Recipe", 15),
    ("Event", 10),
    ("Article", 10),
    ("VideoObject", 10),
    ("BreadcrumbList", 5),
];

/// Flat base added when any schema block exists at all.
pub const RICH_RESULTS_BASE: u32 = 20;

/// Required top-level properties per recognized schema type.
pub const REQUIRED_FIELDS: &[(&str, &[&str])] = &[
    ("FAQPage", &["mainEntity"]),
    ("QAPage", &["mainEntity"]),
    ("HowTo", &["name", "step"]),
    ("Article", &["headline"]),
    ("BlogPosting", &["headline"]),
    ("Product", &["name", "offers"]),
    ("Review", &["itemReviewed", "reviewRating"]),
    ("Recipe", &["name", "recipeIngredient"]),
    ("Event", &["name", "startDate"]),
    ("VideoObject", &["name", "thumbnailUrl"]),
    ("BreadcrumbList", &["itemListElement"]),
    ("Organization", &["name", "url"]),
    ("WebSite", &["name", "url"]),
    ("WebPage", &["name"]),
];

/// Enrichment properties that earn small validity bonuses.
pub const ENRICHMENT_FIELDS: &[&str] = &["image", "author", "datePublished", "dateModified"];

/// Points per enrichment property and the cap across them.
pub const ENRICHMENT_POINTS_EACH: u32 = 3;
/// Upper bound on enrichment points per block.
pub const ENRICHMENT_POINTS_CAP: u32 = 10;

/// Whether a type string is in the recognized schema vocabulary.
#[must_use]
pub fn is_recognized_type(schema_type: &str) -> bool {
    REQUIRED_FIELDS.iter().any(|(t, _)| *t == schema_type)
}

/// Coverage points for one schema type; 0 when unrecognized.
#[must_use]
pub fn coverage_points(schema_type: &str) -> u32 {
    SCHEMA_COVERAGE_POINTS
        .iter()
        .find(|(t, _)| *t == schema_type)
        .map_or(0, |(_, p)| *p)
}

/// Rich-results points for one schema type; 0 when not eligible.
#[must_use]
pub fn rich_results_points(schema_type: &str) -> u32 {
    RICH_RESULTS_POINTS
        .iter()
        .find(|(t, _)| *t == schema_type)
        .map_or(0, |(_, p)| *p)
}

/// Required properties for one schema type; empty when unrecognized.
#[must_use]
pub fn required_fields(schema_type: &str) -> &'static [&'static str] {
    REQUIRED_FIELDS
        .iter()
        .find(|(t, _)| *t == schema_type)
        .map_or(&[], |(_, fields)| fields)
}

/// Category weight tables per detected site category.
///
/// Access control and technical infrastructure dominate everywhere; the
/// structured-data weight only becomes material for shops and blogs, where
/// schema markup actually moves the needle for AI surfaces.
#[must_use]
pub fn context_weights(site_category: SiteCategory) -> &'static [(ScoreCategory, u32)] {
    use ScoreCategory::{AccessControl, ContentStructure, StructuredData, Technical};
    match site_category {
        SiteCategory::Homepage => &[
            (AccessControl, 40),
            (StructuredData, 5),
            (ContentStructure, 20),
            (Technical, 35),
        ],
        SiteCategory::Docs => &[
            (AccessControl, 35),
            (StructuredData, 5),
            (ContentStructure, 35),
            (Technical, 25),
        ],
        SiteCategory::Blog => &[
            (AccessControl, 35),
            (StructuredData, 10),
            (ContentStructure, 30),
            (Technical, 25),
        ],
        SiteCategory::Api => &[
            (AccessControl, 40),
            (StructuredData, 5),
            (ContentStructure, 15),
            (Technical, 40),
        ],
        SiteCategory::Shop => &[
            (AccessControl, 30),
            (StructuredData, 20),
            (ContentStructure, 20),
            (Technical, 30),
        ],
        SiteCategory::Support => &[
            (AccessControl, 35),
            (StructuredData, 10),
            (ContentStructure, 35),
            (Technical, 20),
        ],
        SiteCategory::Unknown => BASELINE_WEIGHTS,
    }
}

/// A fixed bonus/penalty rule keyed to a (site category, category score)
/// combination.
#[derive(Debug, Clone, Copy)]
pub struct ContextRule {
    /// Site category the rule applies to.
    pub site_category: SiteCategory,
    /// Scoring category whose score is inspected.
    pub category: ScoreCategory,
    /// Fires when the category score is below this bound...
    pub below: Option<u32>,
    /// ...or at/above this bound.
    pub at_least: Option<u32>,
    /// Signed delta applied to the adjusted score.
    pub delta: i32,
    /// Rationale shown to the user.
    pub reason: &'static str,
}

/// Context bonus/penalty rules.
pub const CONTEXT_RULES: &[ContextRule] = &[
    ContextRule {
        site_category: SiteCategory::Shop,
        category: ScoreCategory::StructuredData,
        below: Some(30),
        at_least: None,
        delta: -10,
        reason: "E-commerce pages without product structured data are nearly invisible to AI shopping surfaces",
    },
    ContextRule {
        site_category: SiteCategory::Docs,
        category: ScoreCategory::ContentStructure,
        below: None,
        at_least: Some(80),
        delta: 5,
        reason: "Well-structured documentation is highly quotable by AI assistants",
    },
    ContextRule {
        site_category: SiteCategory::Api,
        category: ScoreCategory::Technical,
        below: None,
        at_least: Some(80),
        delta: 5,
        reason: "Strong technical infrastructure makes an API surface dependable for automated consumers",
    },
    ContextRule {
        site_category: SiteCategory::Blog,
        category: ScoreCategory::StructuredData,
        below: None,
        at_least: Some(60),
        delta: 3,
        reason: "Article markup helps AI systems attribute and date blog content",
    },
];

/// A recommendation trigger: fires when a check scores below the threshold.
#[derive(Debug, Clone, Copy)]
pub struct RecommendationTrigger {
    /// Check the trigger watches.
    pub check_id: &'static str,
    /// Fires when the check score is strictly below this.
    pub below: u32,
    /// The advice surfaced to the user.
    pub advice: &'static str,
}

/// Recommendation triggers per check.
pub const RECOMMENDATION_TRIGGERS: &[RecommendationTrigger] = &[
    RecommendationTrigger {
        check_id: "ai_crawler_access",
        below: 100,
        advice: "Allow major AI crawlers (GPTBot, ClaudeBot, PerplexityBot) in robots.txt",
    },
    RecommendationTrigger {
        check_id: "llms_permissions",
        below: 100,
        advice: "Publish an llms.txt file describing how AI systems may use your content",
    },
    RecommendationTrigger {
        check_id: "schema_coverage",
        below: 50,
        advice: "Add schema.org structured data; FAQPage and Article markup score highest for AI surfaces",
    },
    RecommendationTrigger {
        check_id: "schema_validity",
        below: 60,
        advice: "Fix structured data blocks that are missing required properties",
    },
    RecommendationTrigger {
        check_id: "rich_results",
        below: 50,
        advice: "Add rich-result eligible schema types such as FAQPage, HowTo or Product",
    },
    RecommendationTrigger {
        check_id: "heading_hierarchy",
        below: 75,
        advice: "Use exactly one H1 and a logical heading outline",
    },
    RecommendationTrigger {
        check_id: "server_side_content",
        below: 70,
        advice: "Serve primary content in the initial HTML response instead of client-side rendering",
    },
    RecommendationTrigger {
        check_id: "clean_extraction",
        below: 70,
        advice: "Wrap primary content in a <main> or <article> landmark",
    },
    RecommendationTrigger {
        check_id: "content_clarity",
        below: 65,
        advice: "Break long text into sections with descriptive headings",
    },
    RecommendationTrigger {
        check_id: "content_freshness",
        below: 70,
        advice: "Expose machine-readable publish and modified dates",
    },
    RecommendationTrigger {
        check_id: "https_usage",
        below: 100,
        advice: "Serve the site over HTTPS",
    },
    RecommendationTrigger {
        check_id: "response_time",
        below: 70,
        advice: "Reduce server response time below one second",
    },
    RecommendationTrigger {
        check_id: "sitemap",
        below: 100,
        advice: "Publish a sitemap.xml and reference it from robots.txt",
    },
    RecommendationTrigger {
        check_id: "alternate_formats",
        below: 100,
        advice: "Offer an RSS or Atom feed as an alternate machine-readable format",
    },
];

/// Recommendations fired by a check score.
#[must_use]
pub fn triggered_recommendations(check_id: &str, score: u32) -> Vec<&'static str> {
    RECOMMENDATION_TRIGGERS
        .iter()
        .filter(|t| t.check_id == check_id && score < t.below)
        .map(|t| t.advice)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_weights_cover_every_category() {
        for category in ScoreCategory::ALL {
            assert!(BASELINE_WEIGHTS.iter().any(|(c, _)| c == category));
        }
    }

    #[test]
    fn structured_data_baseline_weight_is_zero() {
        assert_eq!(baseline_weight(ScoreCategory::StructuredData), 0);
    }

    #[test]
    fn context_weight_tables_cover_every_category() {
        for site_category in [
            SiteCategory::Homepage,
            SiteCategory::Docs,
            SiteCategory::Blog,
            SiteCategory::Api,
            SiteCategory::Shop,
            SiteCategory::Support,
            SiteCategory::Unknown,
        ] {
            let table = context_weights(site_category);
            for category in ScoreCategory::ALL {
                assert!(
                    table.iter().any(|(c, _)| c == category),
                    "{site_category:?} table missing {category:?}"
                );
            }
            let total: u32 = table.iter().map(|(_, w)| w).sum();
            assert!(total > 0, "{site_category:?} weights sum to zero");
        }
    }

    #[test]
    fn unknown_context_matches_baseline() {
        assert_eq!(context_weights(SiteCategory::Unknown), BASELINE_WEIGHTS);
    }

    #[test]
    fn faq_outranks_every_other_coverage_type() {
        let faq = coverage_points("FAQPage");
        for (schema_type, points) in SCHEMA_COVERAGE_POINTS {
            if *schema_type != "FAQPage" {
                assert!(faq >= *points, "{schema_type} outscores FAQPage");
            }
        }
        assert!(faq > coverage_points("Organization"));
        assert!(faq > coverage_points("WebSite"));
    }

    #[test]
    fn every_coverage_type_is_recognized() {
        for (schema_type, _) in SCHEMA_COVERAGE_POINTS {
            assert!(
                is_recognized_type(schema_type),
                "{schema_type} has no required-field entry"
            );
        }
    }

    #[test]
    fn unrecognized_types_score_nothing() {
        assert_eq!(coverage_points("MadeUpType"), 0);
        assert_eq!(rich_results_points("MadeUpType"), 0);
        assert!(required_fields("MadeUpType").is_empty());
        assert!(!is_recognized_type("MadeUpType"));
    }

    #[test]
    fn triggers_fire_strictly_below_threshold() {
        assert!(triggered_recommendations("https_usage", 99)
            .iter()
            .any(|advice| advice.contains("HTTPS")));
        assert!(triggered_recommendations("https_usage", 100).is_empty());
        assert!(triggered_recommendations("unknown_check", 0).is_empty());
    }

    #[test]
    fn context_rules_reference_valid_thresholds() {
        for rule in CONTEXT_RULES {
            assert!(
                rule.below.is_some() ^ rule.at_least.is_some(),
                "rule must have exactly one bound"
            );
            assert!(rule.delta != 0);
            assert!(!rule.reason.is_empty());
        }
    }
}
