// Text utils

use once_cell::sync::Lazy;
use regex::Regex;

// Residual inline markup such as <emphasis> or <a l:href="...">.
static MARKUP_SPAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
static LINE_BREAKS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\p{Zl}\p{Zp}\n\r]+").unwrap());

// Per-line canonicalisation, matched by Unicode general category so the rules
// hold across scripts rather than for a hand-picked list of characters.
static DASHES: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\p{Pd}\-]+").unwrap());
static OPEN_BRACKETS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\p{Ps}(]+").unwrap());
static CLOSE_BRACKETS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\p{Pe})]+").unwrap());
static OPEN_QUOTES: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\p{Pi}«]+").unwrap());
static CLOSE_QUOTES: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\p{Pf}»]+").unwrap());
static INVISIBLES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \u{00A0}\p{Zs}\p{C}\p{Mc}\p{Me}\p{Mn}]+").unwrap());

// Used when a record value is written as a single TSV field.
static FIELD_BREAKS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ ]*[\n\r\t]+[ ]*").unwrap());
// Used before handing text to a language classifier.
static CLASSIFIER_BREAKS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\n\r\t ]+").unwrap());

/// Canonicalises a text fragment: strips leftover markup, unifies line breaks,
/// collapses dash/bracket/quote/whitespace variants and drops empty lines.
///
/// The result is stable: `normalize_text(&normalize_text(s)) == normalize_text(s)`.
pub fn normalize_text(fragment: &str) -> String {
    let without_markup = MARKUP_SPAN.replace_all(fragment, "");
    let unified = LINE_BREAKS.replace_all(&without_markup, "\n");

    unified
        .split('\n')
        .map(normalize_line)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn normalize_line(line: &str) -> String {
    let line = DASHES.replace_all(line, "-");
    let line = OPEN_BRACKETS.replace_all(&line, "(");
    let line = CLOSE_BRACKETS.replace_all(&line, ")");
    let line = OPEN_QUOTES.replace_all(&line, "«");
    let line = CLOSE_QUOTES.replace_all(&line, "»");
    let line = INVISIBLES.replace_all(&line, " ");
    line.trim().to_string()
}

/// Folds line breaks and tabs (with their surrounding spaces) into one space,
/// so a value fits into a single tab-separated field.
pub fn flatten_field(value: &str) -> String {
    FIELD_BREAKS.replace_all(value, " ").into_owned()
}

/// Single-line form of `text` for classifiers that read one line at a time.
pub fn flatten_for_classifier(text: &str) -> String {
    CLASSIFIER_BREAKS.replace_all(text, " ").into_owned()
}
