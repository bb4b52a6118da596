//! Rule-based Analysis
//!
//! Deterministic editorial analysis used whenever the language model is not
//! available or fails. The analyzer runs the [`RuleCatalog`] against the
//! original text in catalog order:
//!
//! 1. every rule looks for its first match that does not overlap a span
//!    claimed by an earlier rule;
//! 2. a hit becomes an [`Issue`] at the next index and claims its span;
//! 3. sentence-structure advisories are appended last;
//! 4. markers are rendered in a single pass over the original text.
//!
//! The analyzer is total: any string input yields an outcome.

pub mod catalog;
pub mod highlight;
pub mod structure;

pub use catalog::{Category, Rule, RuleCatalog, RuleMatch, CATALOG};
pub use highlight::{strip_markers, Annotator, Marker};

use serde::Serialize;
use tracing::debug;

/// One reported correction or advisory finding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    pub index: usize,
    pub category: Category,
    pub original: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    /// Extra notes appended to the summary line
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

impl Issue {
    /// `"<Category>: <original> → <suggestion>"`, or
    /// `"<Category>: <explanation>"` for advisories, followed by any details
    /// separated with `" | "`.
    pub fn summary(&self) -> String {
        let mut line = match &self.suggestion {
            Some(suggestion) => format!("{}: {} → {}", self.category, self.original, suggestion),
            None => format!(
                "{}: {}",
                self.category,
                self.explanation.as_deref().unwrap_or(&self.original)
            ),
        };
        for detail in &self.details {
            line.push_str(" | ");
            line.push_str(detail);
        }
        line
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOutcome {
    pub highlighted_text: String,
    pub issues: Vec<Issue>,
}

impl AnalysisOutcome {
    pub fn total_issues(&self) -> usize {
        self.issues.len()
    }

    pub fn issues_found(&self) -> Vec<String> {
        self.issues.iter().map(Issue::summary).collect()
    }
}

/// Analyze `text` with the built-in catalog.
pub fn analyze(text: &str) -> AnalysisOutcome {
    analyze_with(&CATALOG, text)
}

pub fn analyze_with(catalog: &RuleCatalog, text: &str) -> AnalysisOutcome {
    let mut annotator = Annotator::new(text);
    let mut issues: Vec<Issue> = Vec::new();

    for rule in catalog.rules() {
        let Some(hit) = rule.find_first(text, |range| annotator.is_free(range)) else {
            continue;
        };

        let index = issues.len();
        annotator.claim(Marker {
            range: hit.range.clone(),
            index,
            category: rule.category().clone(),
            tooltip: rule.tooltip().to_string(),
        });
        issues.push(Issue {
            index,
            category: rule.category().clone(),
            original: text[hit.range].to_string(),
            suggestion: Some(hit.suggestion),
            explanation: Some(rule.tooltip().to_string()),
            details: Vec::new(),
        });
    }

    for advisory in structure::advisories(text) {
        issues.push(Issue {
            index: issues.len(),
            category: Category::Structure,
            original: advisory.sentence,
            suggestion: None,
            explanation: Some(advisory.message),
            details: Vec::new(),
        });
    }

    debug!(
        text_len = text.len(),
        issues = issues.len(),
        "Rule-based analysis complete"
    );

    AnalysisOutcome {
        highlighted_text: annotator.render(),
        issues,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_no_matches_returns_text_unchanged() {
        let text = "The tenant shall pay rent on the first day of each month.";
        let outcome = analyze(text);
        assert!(outcome.issues.is_empty());
        assert_eq!(outcome.highlighted_text, text);
        assert_eq!(outcome.total_issues(), 0);
    }

    #[test]
    fn test_single_misspelling() {
        let text = "This agreement is made wheras the parties consent.";
        let outcome = analyze(text);

        assert_eq!(outcome.issues.len(), 1);
        let issue = &outcome.issues[0];
        assert_eq!(issue.category, Category::Spelling);
        assert_eq!(issue.original, "wheras");
        assert_eq!(issue.suggestion.as_deref(), Some("whereas"));
        assert_eq!(outcome.issues_found(), vec!["Spelling: wheras → whereas"]);

        assert_eq!(outcome.highlighted_text.matches("<span").count(), 1);
        assert!(outcome
            .highlighted_text
            .contains("data-issue-index='0' data-category='Spelling'>wheras</span>"));
    }

    #[test]
    fn test_only_first_occurrence_is_wrapped() {
        let text = "wheras the buyer pays, wheras the seller delivers";
        let outcome = analyze(text);

        assert_eq!(outcome.issues.len(), 1);
        assert_eq!(outcome.highlighted_text.matches("<span").count(), 1);
        assert!(outcome.highlighted_text.ends_with(", wheras the seller delivers"));
    }

    #[test]
    fn test_categories_emit_in_catalog_order() {
        let text = "I got a big thing about the seperate deal, kinda.";
        let outcome = analyze(text);
        let categories: Vec<&Category> = outcome.issues.iter().map(|i| &i.category).collect();

        assert_eq!(categories[0], &Category::Spelling);
        assert_eq!(categories[1], &Category::Style);
        assert!(categories[2..]
            .iter()
            .all(|c| **c == Category::LegalTerminology));
        assert_eq!(
            outcome.issues_found(),
            vec![
                "Spelling: seperate → separate",
                "Style: kinda → somewhat",
                "Legal terminology: about → regarding",
                "Legal terminology: big → substantial",
                "Legal terminology: thing → matter",
            ]
        );
    }

    #[test]
    fn test_grammar_rules() {
        let text = "Your going to see the court and it's jurisdiction....";
        let outcome = analyze(text);
        let found = outcome.issues_found();
        assert!(found.contains(&"Grammar: Your → you're".to_string()));
        assert!(found.contains(&"Grammar: it's → its".to_string()));
        assert!(found.contains(&"Grammar: .... → ...".to_string()));
        assert_eq!(strip_markers(&outcome.highlighted_text), text);
    }

    #[test]
    fn test_structure_advisories_have_no_marker() {
        let text = "The lease was terminated by the landlord.";
        let outcome = analyze(text);
        assert_eq!(outcome.issues.len(), 1);
        assert_eq!(outcome.issues[0].category, Category::Structure);
        assert_eq!(outcome.issues[0].suggestion, None);
        assert_eq!(
            outcome.issues[0].summary(),
            "Sentence structure: Consider using active voice for clarity"
        );
        assert_eq!(outcome.highlighted_text, text);
    }

    #[test]
    fn test_later_rules_do_not_overlap_earlier_spans() {
        // "the thing the thing" is claimed by the repeated-phrase rule before
        // legal terminology runs, so "thing" is only flagged outside it.
        let text = "the thing the thing and one more thing";
        let outcome = analyze(text);
        let legal = outcome
            .issues
            .iter()
            .find(|i| i.category == Category::LegalTerminology)
            .unwrap();
        assert_eq!(legal.original, "thing");
        assert!(outcome.highlighted_text.ends_with(">thing</span>"));
        assert_eq!(strip_markers(&outcome.highlighted_text), text);
    }

    fn document() -> impl Strategy<Value = String> {
        let token = prop::sample::select(vec![
            "wheras", "Wheras", "the", "party", "kinda", "OK", "about", "it's", "own",
            "your", "going", "was", "signed", "contract", "I", "think", "<b>", "'quoted'",
            "&", "....", "thing", "beleive",
        ]);
        let sep = prop::sample::select(vec![" ", "  ", ". ", ", ", "\n\n", "! "]);
        prop::collection::vec((token, sep), 0..60).prop_map(|parts| {
            parts
                .into_iter()
                .map(|(t, s)| format!("{}{}", t, s))
                .collect::<String>()
        })
    }

    const EXISTING_MARKER: &str =
        "<span style='c' title='t' data-issue-index='9' data-category='Style'>note</span>";

    fn document_with_markup() -> impl Strategy<Value = String> {
        let token = prop::sample::select(vec![
            "wheras", "the", "kinda", "about", "signed", "<b>", EXISTING_MARKER,
        ]);
        let sep = prop::sample::select(vec![" ", "  ", ". ", "\n\n"]);
        prop::collection::vec((token, sep), 0..40).prop_map(|parts| {
            parts
                .into_iter()
                .map(|(t, s)| format!("{}{}", t, s))
                .collect::<String>()
        })
    }

    proptest! {
        #[test]
        fn prop_rendering_only_adds_markers(text in document_with_markup()) {
            let outcome = analyze(&text);
            prop_assert_eq!(strip_markers(&outcome.highlighted_text), strip_markers(&text));
        }

        #[test]
        fn prop_stripping_markers_restores_input(text in document()) {
            let outcome = analyze(&text);
            prop_assert_eq!(strip_markers(&outcome.highlighted_text), text);
        }

        #[test]
        fn prop_indices_match_positions(text in document()) {
            let outcome = analyze(&text);
            for (pos, issue) in outcome.issues.iter().enumerate() {
                prop_assert_eq!(issue.index, pos);
            }
            prop_assert_eq!(outcome.total_issues(), outcome.issues.len());
        }

        #[test]
        fn prop_each_rule_wraps_at_most_once(text in document()) {
            let outcome = analyze(&text);
            let markers = outcome.highlighted_text.matches("data-issue-index=").count();
            let substitutions = outcome
                .issues
                .iter()
                .filter(|i| i.suggestion.is_some())
                .count();
            prop_assert_eq!(markers, substitutions);
        }
    }
}
