//! Text rendering for analysis results.

use colored::Colorize;
use crawlready_core::types::{
    AnalysisResponse, DiscoveryResult, MultiSiteAnalysisResponse,
};

/// Color a score by its qualitative bucket.
fn colored_score(score: u32) -> colored::ColoredString {
    let text = format!("{score:>3}");
    match score {
        80.. => text.green().bold(),
        60..=79 => text.yellow(),
        40..=59 => text.truecolor(255, 165, 0),
        _ => text.red().bold(),
    }
}

/// Render a single-site analysis.
pub fn print_analysis(report: &AnalysisResponse) {
    println!(
        "\n{} {}",
        "Analysis of".bold(),
        report.url.as_str().cyan()
    );
    println!(
        "{} {}/100\n",
        "Overall score:".bold(),
        colored_score(report.overall_score)
    );

    for category in &report.categories {
        println!(
            "  {} {}  (weight {})",
            colored_score(category.score),
            category.name.bold(),
            category.weight
        );
        for check in &category.checks {
            println!(
                "      {} {:<24} {}",
                colored_score(check.score),
                check.name,
                check.details.dimmed()
            );
        }
    }

    if let Some(adjustments) = &report.scoring_adjustments {
        println!("\n{}", "Context adjustments:".bold());
        for adjustment in adjustments {
            println!("  {:+} {} - {}", adjustment.adjustment, adjustment.category, adjustment.reason);
        }
    }

    if !report.summary.strengths.is_empty() {
        println!("\n{}", "Strengths:".bold().green());
        for strength in &report.summary.strengths {
            println!("  + {strength}");
        }
    }
    if !report.summary.improvements.is_empty() {
        println!("\n{}", "Improvements:".bold().yellow());
        for improvement in &report.summary.improvements {
            println!("  - {improvement}");
        }
    }
    println!("\nPriority: {}", report.summary.priority.bold());
}

/// Render a discovery result.
pub fn print_discovery(result: &DiscoveryResult) {
    println!(
        "\n{} {} ({:?})",
        "Discovered sites for".bold(),
        result.main_domain.as_str().cyan(),
        result.site_kind
    );
    for site in &result.discovered_sites {
        let marker = if site.accessible {
            "ok ".green()
        } else {
            "err".red()
        };
        let redirect = if site.is_redirect {
            format!(" -> {}", site.final_url)
        } else {
            String::new()
        };
        println!(
            "  [{marker}] {:<10} {}{redirect}",
            site.category.label(),
            site.url
        );
    }
    println!(
        "\n{} of {} sites ready for analysis",
        result.analysis_ready.len(),
        result.total_found
    );
}

/// Render a multi-site run.
pub fn print_multi_site(response: &MultiSiteAnalysisResponse) {
    println!(
        "\n{} {}  (request {})",
        "Multi-site analysis for".bold(),
        response.input_url.as_str().cyan(),
        response.request_id.dimmed()
    );

    for result in &response.analyses {
        println!(
            "  {} {:<44} adjusted {} ({})",
            colored_score(result.analysis.overall_score),
            result.analysis.url,
            colored_score(result.context_aware_score.adjusted_score),
            result.site_info.category.label()
        );
    }

    let summary = &response.summary;
    println!(
        "\n{} {} sites, average {}",
        "Summary:".bold(),
        summary.total_sites,
        colored_score(summary.average_score)
    );
    if let Some(best) = &summary.highest_score {
        println!("  best:  {best}");
    }
    if let Some(worst) = &summary.lowest_score {
        println!("  worst: {worst}");
    }

    if !summary.recommendations_priority.is_empty() {
        println!("\n{}", "Top recommendations:".bold().yellow());
        for rec in &summary.recommendations_priority {
            println!(
                "  - {} ({} sites, {} occurrences)",
                rec.recommendation, rec.affected_sites, rec.occurrence_count
            );
        }
    }
}
