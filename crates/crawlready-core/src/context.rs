//! Context-aware score adjustment.
//!
//! A docs portal and a storefront should not be graded on the same curve:
//! after the baseline analysis runs, the adjustor reweights the category
//! scores with the table for the page's detected category and applies a
//! small set of fixed bonus/penalty rules. The original score is always
//! preserved alongside the adjusted one.

use crate::scoring::tables::{self, CONTEXT_RULES};
use crate::types::{AnalysisResponse, ScoringAdjustment, SiteCategory};
use tracing::debug;

/// Threshold below which a weight delta is considered noise and not reported.
const REPORTABLE_WEIGHT_DELTA: i32 = 5;

/// Outcome of context-aware adjustment.
#[derive(Debug, Clone)]
pub struct ContextAdjustment {
    /// Overall score under the context weight table and rules, in `[0, 100]`.
    pub adjusted_score: u32,
    /// Every reportable weight delta and fired rule.
    pub adjustments: Vec<ScoringAdjustment>,
    /// Display rationale, joined from the individual adjustments.
    pub reason: String,
}

/// Re-score an analysis for its detected page category.
///
/// Unknown pages keep the baseline score untouched; for every other category
/// the overall score is recomputed with that category's weight table
/// (structured data is weighted directly rather than folded in as a bonus)
/// and the fixed context rules are applied on top.
#[must_use]
pub fn adjust(analysis: &AnalysisResponse, site_category: SiteCategory) -> ContextAdjustment {
    if site_category == SiteCategory::Unknown {
        return ContextAdjustment {
            adjusted_score: analysis.overall_score,
            adjustments: Vec::new(),
            reason: "Standard weighting applied (unknown page type)".to_string(),
        };
    }

    let table = tables::context_weights(site_category);
    let mut adjustments = Vec::new();

    let mut weighted = 0.0_f64;
    let mut weight_sum = 0_u32;
    for (category, weight) in table {
        let Some(result) = analysis.categories.iter().find(|c| c.id == category.id()) else {
            continue;
        };
        weighted += f64::from(result.score) * f64::from(*weight);
        weight_sum += weight;

        let delta = i64::from(*weight) - i64::from(tables::baseline_weight(*category));
        let delta = i32::try_from(delta).unwrap_or(0);
        if delta.abs() >= REPORTABLE_WEIGHT_DELTA {
            adjustments.push(ScoringAdjustment {
                category: category.id().to_string(),
                adjustment: delta,
                reason: format!(
                    "{} weight changed for {} pages ({:+})",
                    category.name(),
                    site_category.label(),
                    delta
                ),
            });
        }
    }

    let base = if weight_sum == 0 {
        0_i64
    } else {
        (weighted / f64::from(weight_sum)).round() as i64
    };

    let mut adjusted = base;
    for rule in CONTEXT_RULES {
        if rule.site_category != site_category {
            continue;
        }
        let Some(result) = analysis
            .categories
            .iter()
            .find(|c| c.id == rule.category.id())
        else {
            continue;
        };
        let fires = match (rule.below, rule.at_least) {
            (Some(bound), None) => result.score < bound,
            (None, Some(bound)) => result.score >= bound,
            _ => false,
        };
        if fires {
            debug!(
                category = rule.category.id(),
                delta = rule.delta,
                "context rule fired"
            );
            adjusted += i64::from(rule.delta);
            adjustments.push(ScoringAdjustment {
                category: rule.category.id().to_string(),
                adjustment: rule.delta,
                reason: rule.reason.to_string(),
            });
        }
    }

    let adjusted_score = adjusted.clamp(0, 100) as u32;
    let reason = if adjustments.is_empty() {
        format!("Standard weighting applied for {} pages", site_category.label())
    } else {
        adjustments
            .iter()
            .map(|a| a.reason.clone())
            .collect::<Vec<_>>()
            .join("; ")
    };

    ContextAdjustment {
        adjusted_score,
        adjustments,
        reason,
    }
}
