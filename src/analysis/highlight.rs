//! Inline markers
//!
//! Matches are tracked as spans against the original text and rendered into
//! `<span>` markers in a single pass, so no rule ever sees marker syntax.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

use super::catalog::Category;

static MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"<span style='[^']*' title='[^']*' data-issue-index='\d+' data-category='[^']*'>((?s:.*?))</span>",
    )
    .unwrap()
});

/// One highlighted span of the original text.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub range: Range<usize>,
    pub index: usize,
    pub category: Category,
    pub tooltip: String,
}

/// Collects non-overlapping markers over a borrowed text.
#[derive(Debug)]
pub struct Annotator<'a> {
    text: &'a str,
    markers: Vec<Marker>,
}

impl<'a> Annotator<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            markers: Vec::new(),
        }
    }

    /// True when `range` is non-empty and overlaps no claimed marker.
    pub fn is_free(&self, range: &Range<usize>) -> bool {
        !range.is_empty()
            && self
                .markers
                .iter()
                .all(|m| range.end <= m.range.start || m.range.end <= range.start)
    }

    /// First case-insensitive occurrence of `needle` that is still free.
    pub fn find_free_literal(&self, needle: &str) -> Option<Range<usize>> {
        if needle.is_empty() {
            return None;
        }
        let regex = Regex::new(&format!("(?i){}", regex::escape(needle))).ok()?;
        let found = regex
            .find_iter(self.text)
            .map(|m| m.range())
            .find(|range| self.is_free(range));
        found
    }

    pub fn claim(&mut self, marker: Marker) {
        debug_assert!(self.is_free(&marker.range));
        self.markers.push(marker);
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Render the text with every claimed marker, ordered by span start.
    pub fn render(mut self) -> String {
        self.markers.sort_by_key(|m| m.range.start);

        let mut out = String::with_capacity(self.text.len() + self.markers.len() * 160);
        let mut cursor = 0;
        for marker in &self.markers {
            out.push_str(&self.text[cursor..marker.range.start]);
            out.push_str(&format!(
                "<span style='{} padding: 2px 4px; border-radius: 3px;' title='{}' data-issue-index='{}' data-category='{}'>",
                escape_attr(marker.category.palette()),
                escape_attr(&marker.tooltip),
                marker.index,
                escape_attr(marker.category.label()),
            ));
            out.push_str(&self.text[marker.range.clone()]);
            out.push_str("</span>");
            cursor = marker.range.end;
        }
        out.push_str(&self.text[cursor..]);
        out
    }
}

/// Escape a value for a single-quoted HTML attribute.
pub fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '\'' => out.push_str("&#39;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Remove every marker, leaving the wrapped text in place.
///
/// Marker-shaped spans that were already present in the input cannot be told
/// apart from rendered ones and are unwrapped as well, so the round trip is
/// exact only for input without such spans.
pub fn strip_markers(annotated: &str) -> String {
    MARKER.replace_all(annotated, "${1}").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker(range: Range<usize>, index: usize) -> Marker {
        Marker {
            range,
            index,
            category: Category::Spelling,
            tooltip: "Spelling error: Did you mean \"whereas\"?".to_string(),
        }
    }

    #[test]
    fn test_render_orders_by_span_start() {
        let text = "wheras and wheras";
        let mut annotator = Annotator::new(text);
        annotator.claim(marker(11..17, 0));
        annotator.claim(marker(0..6, 1));
        let html = annotator.render();

        let first = html.find("data-issue-index='1'").unwrap();
        let second = html.find("data-issue-index='0'").unwrap();
        assert!(first < second);
        assert_eq!(strip_markers(&html), text);
    }

    #[test]
    fn test_tooltip_is_escaped() {
        let mut annotator = Annotator::new("wheras");
        annotator.claim(marker(0..6, 0));
        let html = annotator.render();
        assert!(html.contains("title='Spelling error: Did you mean &quot;whereas&quot;?'"));
    }

    #[test]
    fn test_overlap_detection() {
        let mut annotator = Annotator::new("abcdefghij");
        annotator.claim(marker(2..5, 0));
        assert!(!annotator.is_free(&(4..6)));
        assert!(!annotator.is_free(&(0..3)));
        assert!(annotator.is_free(&(5..7)));
        assert!(annotator.is_free(&(0..2)));
        assert!(!annotator.is_free(&(7..7)));
    }

    #[test]
    fn test_find_free_literal_skips_claimed() {
        let mut annotator = Annotator::new("Term and TERM");
        assert_eq!(annotator.find_free_literal("term"), Some(0..4));
        annotator.claim(marker(0..4, 0));
        assert_eq!(annotator.find_free_literal("term"), Some(9..13));
        assert_eq!(annotator.find_free_literal(""), None);
    }

    #[test]
    fn test_find_free_literal_in_longer_text() {
        let text = "The Lessee and the lessee's agent";
        let mut annotator = Annotator::new(text);
        let first = annotator.find_free_literal("LESSEE").unwrap();
        assert_eq!(&text[first.clone()], "Lessee");
        annotator.claim(marker(first, 0));
        assert_eq!(annotator.find_free_literal("lessee"), Some(19..25));
    }

    #[test]
    fn test_strip_unwraps_marker_shaped_input() {
        let text = "see <span style='c' title='t' data-issue-index='9' data-category='Style'>note</span>";
        assert_eq!(strip_markers(text), "see note");
    }

    #[test]
    fn test_strip_keeps_unrelated_html() {
        let text = "<b>bold</b> and <span>plain</span>";
        assert_eq!(strip_markers(text), text);
    }
}
