//! Inline markup tokenizer for the visual guide text.
//!
//! Three delimiter pairs, processed left-to-right and non-nesting:
//! `**text**` for strong emphasis, `*text*` for secondary emphasis,
//! `[text]` for a called-out visual cue. This is a fixed ad hoc grammar,
//! not markdown; an unterminated delimiter renders literally.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanKind {
    Plain,
    Strong,
    Emphasis,
    Cue,
}

/// One typed run of guide text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuideSpan {
    pub kind: SpanKind,
    pub text: String,
}

impl GuideSpan {
    fn new(kind: SpanKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Tokenize guide text into spans.
pub fn tokenize(input: &str) -> Vec<GuideSpan> {
    let mut spans = Vec::new();
    let mut plain = String::new();
    let mut rest = input;

    while !rest.is_empty() {
        // `**` takes precedence over `*` at the same position
        if let Some(after) = rest.strip_prefix("**") {
            match after.find("**") {
                Some(end) => {
                    flush_plain(&mut spans, &mut plain);
                    spans.push(GuideSpan::new(SpanKind::Strong, &after[..end]));
                    rest = &after[end + 2..];
                }
                None => {
                    plain.push_str("**");
                    rest = after;
                }
            }
            continue;
        }

        if let Some(after) = rest.strip_prefix('*') {
            match after.find('*') {
                Some(end) => {
                    flush_plain(&mut spans, &mut plain);
                    spans.push(GuideSpan::new(SpanKind::Emphasis, &after[..end]));
                    rest = &after[end + 1..];
                }
                None => {
                    plain.push('*');
                    rest = after;
                }
            }
            continue;
        }

        if let Some(after) = rest.strip_prefix('[') {
            match after.find(']') {
                Some(end) => {
                    flush_plain(&mut spans, &mut plain);
                    spans.push(GuideSpan::new(SpanKind::Cue, &after[..end]));
                    rest = &after[end + 1..];
                }
                None => {
                    plain.push('[');
                    rest = after;
                }
            }
            continue;
        }

        if let Some(c) = rest.chars().next() {
            plain.push(c);
            rest = &rest[c.len_utf8()..];
        }
    }

    flush_plain(&mut spans, &mut plain);
    spans
}

fn flush_plain(spans: &mut Vec<GuideSpan>, plain: &mut String) {
    if !plain.is_empty() {
        spans.push(GuideSpan::new(SpanKind::Plain, std::mem::take(plain)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(kind: SpanKind, text: &str) -> GuideSpan {
        GuideSpan::new(kind, text)
    }

    #[test]
    fn test_plain_text_passes_through() {
        assert_eq!(
            tokenize("turn the valve"),
            vec![span(SpanKind::Plain, "turn the valve")]
        );
    }

    #[test]
    fn test_all_three_tokens() {
        let spans = tokenize("Check the **cartridge** and *gently* pry the [handle cap].");
        assert_eq!(
            spans,
            vec![
                span(SpanKind::Plain, "Check the "),
                span(SpanKind::Strong, "cartridge"),
                span(SpanKind::Plain, " and "),
                span(SpanKind::Emphasis, "gently"),
                span(SpanKind::Plain, " pry the "),
                span(SpanKind::Cue, "handle cap"),
                span(SpanKind::Plain, "."),
            ]
        );
    }

    #[test]
    fn test_double_asterisk_wins_over_single() {
        assert_eq!(
            tokenize("**bold**"),
            vec![span(SpanKind::Strong, "bold")]
        );
    }

    #[test]
    fn test_unterminated_delimiters_render_literally() {
        assert_eq!(
            tokenize("a **dangling start"),
            vec![span(SpanKind::Plain, "a **dangling start")]
        );
        assert_eq!(
            tokenize("see [the arrow"),
            vec![span(SpanKind::Plain, "see [the arrow")]
        );
        assert_eq!(
            tokenize("a *lonely star"),
            vec![span(SpanKind::Plain, "a *lonely star")]
        );
    }

    #[test]
    fn test_no_nesting_inside_a_span() {
        // Brackets inside a strong span are taken verbatim
        assert_eq!(
            tokenize("**see [the] arrow**"),
            vec![span(SpanKind::Strong, "see [the] arrow")]
        );
    }

    #[test]
    fn test_left_to_right_scan() {
        // The first closing delimiter ends the span; no lookahead
        assert_eq!(
            tokenize("[a][b]"),
            vec![span(SpanKind::Cue, "a"), span(SpanKind::Cue, "b")]
        );
    }

    #[test]
    fn test_multibyte_text_survives() {
        let spans = tokenize("düse **prüfen**");
        assert_eq!(
            spans,
            vec![
                span(SpanKind::Plain, "düse "),
                span(SpanKind::Strong, "prüfen"),
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("").is_empty());
    }
}
