//! Structural metrics extracted from a fetched HTML document.
//!
//! The extractor turns raw markup into the facts the scoring battery
//! consumes: visible word count, heading counts, landmark-element counts,
//! embedded structured-data blocks, and a crude signal-to-noise ratio.
//! Malformed structured-data blocks are skipped silently and do not count.

use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use std::sync::LazyLock;

/// Tags whose text is never user-visible.
const INVISIBLE_TAGS: &[&str] = &["script", "style", "noscript", "template"];

// SAFETY: selectors are compile-time constants known to be valid.
#[allow(clippy::unwrap_used)]
static HEADING_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h1, h2, h3, h4, h5, h6").unwrap());
#[allow(clippy::unwrap_used)]
static H1_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h1").unwrap());
#[allow(clippy::unwrap_used)]
static SEMANTIC_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("article, section, nav, header, footer, main, aside, figure").unwrap()
});
#[allow(clippy::unwrap_used)]
static JSON_LD_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"script[type="application/ld+json"]"#).unwrap());
// Main-content landmarks, in preference order.
#[allow(clippy::unwrap_used)]
static MAIN_CONTENT_SELECTORS: LazyLock<[Selector; 3]> = LazyLock::new(|| {
    [
        Selector::parse("main").unwrap(),
        Selector::parse("article").unwrap(),
        Selector::parse(r#"[role="main"]"#).unwrap(),
    ]
});
#[allow(clippy::unwrap_used)]
static DATE_HINT_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(
        r#"meta[property="article:modified_time"], meta[property="article:published_time"], meta[name="last-modified"], time[datetime]"#,
    )
    .unwrap()
});

/// Structural facts about one HTML document.
#[derive(Debug, Clone)]
pub struct ContentMetrics {
    /// Whitespace-tokenized count of the document's visible text.
    pub word_count: usize,
    /// Count of h1–h6 elements.
    pub heading_count: usize,
    /// Count of h1 elements (heading-hierarchy scoring needs it separately).
    pub h1_count: usize,
    /// Count of landmark elements.
    pub semantic_element_count: usize,
    /// Every syntactically valid JSON object from ld+json script blocks.
    pub schema_blocks: Vec<Value>,
    /// Main-landmark text length over total text length; 1.0 when no
    /// main-content landmark exists.
    pub signal_to_noise_ratio: f64,
    /// Machine-readable date strings found in meta/time elements.
    pub date_hints: Vec<String>,
    /// Text content of each heading, in document order.
    pub heading_texts: Vec<String>,
    /// The document's visible text (FAQ heuristics scan it).
    pub text: String,
}

/// Parse an HTML document into [`ContentMetrics`].
#[must_use]
pub fn extract(html: &str) -> ContentMetrics {
    let document = Html::parse_document(html);

    let total_text = visible_text(document.root_element());
    let word_count = total_text.split_whitespace().count();

    let heading_texts: Vec<String> = document
        .select(&HEADING_SELECTOR)
        .map(|heading| heading.text().collect::<String>().trim().to_string())
        .collect();
    let heading_count = heading_texts.len();
    let h1_count = document.select(&H1_SELECTOR).count();
    let semantic_element_count = document.select(&SEMANTIC_SELECTOR).count();

    let schema_blocks = document
        .select(&JSON_LD_SELECTOR)
        .flat_map(|script| parse_schema_block(&script.text().collect::<String>()))
        .collect();

    let signal_to_noise_ratio = MAIN_CONTENT_SELECTORS
        .iter()
        .find_map(|selector| document.select(selector).next())
        .map_or(1.0, |landmark| {
            let main_len = visible_text(landmark).chars().count();
            let total_len = total_text.chars().count();
            if total_len == 0 {
                1.0
            } else {
                main_len as f64 / total_len as f64
            }
        });

    let date_hints = document
        .select(&DATE_HINT_SELECTOR)
        .filter_map(|el| {
            el.value()
                .attr("content")
                .or_else(|| el.value().attr("datetime"))
                .map(str::to_string)
        })
        .collect();

    ContentMetrics {
        word_count,
        heading_count,
        h1_count,
        semantic_element_count,
        schema_blocks,
        signal_to_noise_ratio,
        date_hints,
        heading_texts,
        text: total_text,
    }
}

/// Parse one ld+json block into zero or more JSON objects.
///
/// A top-level array contributes each of its object elements; anything that
/// fails to parse contributes nothing.
fn parse_schema_block(raw: &str) -> Vec<Value> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(obj)) => vec![Value::Object(obj)],
        Ok(Value::Array(items)) => items
            .into_iter()
            .filter(|item| item.is_object())
            .collect(),
        _ => Vec::new(),
    }
}

/// Collect visible text under an element, skipping script/style subtrees.
fn visible_text(root: ElementRef<'_>) -> String {
    let mut out = String::new();
    collect_text(root, &mut out);
    out
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    if INVISIBLE_TAGS.contains(&element.value().name()) {
        return;
    }
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
            out.push(' ');
        } else if let Some(child_el) = ElementRef::wrap(child) {
            collect_text(child_el, out);
        }
    }
}
