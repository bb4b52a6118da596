//! Rule Catalog
//!
//! The static, ordered table of correction rules used by the rule-based
//! analyzer. Categories run in a fixed order (spelling, style, grammar,
//! legal terminology) and rules inside a category run in declared order;
//! that order determines issue numbering.

use std::fmt;
use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};

/// The built-in catalog, compiled once on first use.
pub static CATALOG: Lazy<RuleCatalog> =
    Lazy::new(|| RuleCatalog::standard().expect("built-in rule patterns compile"));

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").unwrap());

const SPELLING: &[(&str, &str)] = &[
    ("wheras", "whereas"),
    ("herebye", "hereby"),
    ("aforementionedly", "aforementioned"),
    ("cuboard", "cupboard"),
    ("seperate", "separate"),
    ("recieve", "receive"),
    ("occured", "occurred"),
    ("judgement", "judgment"),
    ("priviledge", "privilege"),
    ("neccessary", "necessary"),
    ("occassion", "occasion"),
    ("beleive", "believe"),
    ("acheive", "achieve"),
];

const STYLE: &[(&str, &str)] = &[
    ("I think", "I believe"),
    ("might", "may"),
    ("kinda", "somewhat"),
    ("gonna", "going to"),
    ("wanna", "want to"),
    ("pretty", "rather"),
    ("okay", "acceptable"),
    ("OK", "acceptable"),
];

// (pattern, replacement). Group 1, when present, is the flagged span; the
// rest of the match is context only.
const GRAMMAR: &[(&str, &str)] = &[
    (r"\b(it's)\s+(?:own|purpose|jurisdiction)\b", "its"),
    (r"\b(your)\s+going\b", "you're"),
    (r"\b(there)\s+(?:going|being)\b", "they're"),
    (r"[ \t]{2,}", " "),
    (r"\.{4,}", "..."),
];

const LEGAL_TERMINOLOGY: &[(&str, &str)] = &[
    ("according to", "pursuant to"),
    ("about", "regarding"),
    ("because", "due to"),
    ("get", "obtain"),
    ("show", "demonstrate"),
    ("big", "substantial"),
    ("thing", "matter"),
];

/// Correction category. The first five come from the rule catalog; the rest
/// only appear in model-produced issues.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    Spelling,
    Style,
    Grammar,
    LegalTerminology,
    Structure,
    Clarity,
    Punctuation,
    Formatting,
    Other(String),
}

impl Category {
    pub fn label(&self) -> &str {
        match self {
            Category::Spelling => "Spelling",
            Category::Style => "Style",
            Category::Grammar => "Grammar",
            Category::LegalTerminology => "Legal terminology",
            Category::Structure => "Sentence structure",
            Category::Clarity => "Clarity",
            Category::Punctuation => "Punctuation",
            Category::Formatting => "Formatting",
            Category::Other(label) => label,
        }
    }

    /// Map a free-form label (as returned by a model) onto a category.
    pub fn from_label(label: &str) -> Self {
        let lower = label.to_lowercase();
        if lower.contains("spelling") {
            Category::Spelling
        } else if lower.contains("grammar") {
            Category::Grammar
        } else if lower.contains("style") {
            Category::Style
        } else if lower.contains("legal") {
            Category::LegalTerminology
        } else if lower.contains("clarity") {
            Category::Clarity
        } else if lower.contains("punctuation") {
            Category::Punctuation
        } else if lower.contains("formatting") {
            Category::Formatting
        } else if lower.contains("structure") {
            Category::Structure
        } else if label.trim().is_empty() {
            Category::Other("Issue".to_string())
        } else {
            Category::Other(label.trim().to_string())
        }
    }

    /// Inline highlight palette for markers of this category.
    pub fn palette(&self) -> &'static str {
        match self {
            Category::Spelling => "background-color: #ffe0e0; color: #a00; border-left: 3px solid #d00;",
            Category::Grammar => "background-color: #d4edda; color: #155724; border-left: 3px solid #28a745;",
            Category::Style => "background-color: #fff3cd; color: #856404; border-left: 3px solid #ffc107;",
            Category::LegalTerminology => "background-color: #e2e3f0; color: #383d41; border-left: 3px solid #007bff;",
            Category::Clarity => "background-color: #d1ecf1; color: #0c5460; border-left: 3px solid #17a2b8;",
            Category::Punctuation => "background-color: #f8d7da; color: #721c24; border-left: 3px solid #dc3545;",
            Category::Formatting => "background-color: #e2e3f0; color: #383d41; border-left: 3px solid #6f42c1;",
            Category::Structure | Category::Other(_) => {
                "background-color: #f8f9fa; color: #495057; border-left: 3px solid #6c757d;"
            }
        }
    }

    fn tooltip(&self, suggestion: &str) -> String {
        match self {
            Category::Spelling => format!("Spelling error: Did you mean \"{}\"?", suggestion),
            Category::Style => format!("Style issue: Use \"{}\" instead", suggestion),
            Category::Grammar => format!("Grammar issue: Use \"{}\" instead", suggestion),
            Category::LegalTerminology => {
                format!("Legal terminology: Consider \"{}\" for formal tone", suggestion)
            }
            other => format!("{}: Consider \"{}\"", other.label(), suggestion),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

#[derive(Debug)]
enum Matcher {
    Pattern { regex: Regex, group: usize },
    /// `w1 w2 w1 w2`, compared case-insensitively on whole words
    RepeatedPhrase,
}

/// A located rule hit: the flagged span of the original text and the
/// replacement to suggest for it.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleMatch {
    pub range: Range<usize>,
    pub suggestion: String,
}

#[derive(Debug)]
pub struct Rule {
    category: Category,
    matcher: Matcher,
    replacement: String,
    tooltip: String,
}

impl Rule {
    fn pattern(category: Category, pattern: &str, replacement: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(&format!("(?i){}", pattern))?;
        let group = if regex.captures_len() > 1 { 1 } else { 0 };
        Ok(Self {
            tooltip: category.tooltip(replacement),
            category,
            matcher: Matcher::Pattern { regex, group },
            replacement: replacement.to_string(),
        })
    }

    fn whole_word(category: Category, word: &str, replacement: &str) -> Result<Self, regex::Error> {
        Self::pattern(category, &format!(r"\b{}\b", regex::escape(word)), replacement)
    }

    fn repeated_phrase() -> Self {
        Self {
            category: Category::Grammar,
            matcher: Matcher::RepeatedPhrase,
            replacement: String::new(),
            tooltip: "Grammar issue: Remove repeated words".to_string(),
        }
    }

    pub fn category(&self) -> &Category {
        &self.category
    }

    pub fn tooltip(&self) -> &str {
        &self.tooltip
    }

    /// First match in `text` whose flagged span is accepted by `is_free`.
    pub fn find_first<F>(&self, text: &str, is_free: F) -> Option<RuleMatch>
    where
        F: Fn(&Range<usize>) -> bool,
    {
        match &self.matcher {
            Matcher::Pattern { regex, group } => regex
                .captures_iter(text)
                .filter_map(|caps| caps.get(*group).map(|m| m.range()))
                .find(|range| !range.is_empty() && is_free(range))
                .map(|range| RuleMatch {
                    range,
                    suggestion: self.replacement.clone(),
                }),
            Matcher::RepeatedPhrase => find_repeated_phrase(text, &is_free),
        }
    }
}

fn find_repeated_phrase<F>(text: &str, is_free: &F) -> Option<RuleMatch>
where
    F: Fn(&Range<usize>) -> bool,
{
    let words: Vec<Range<usize>> = WORD.find_iter(text).map(|m| m.range()).collect();
    let same = |a: &Range<usize>, b: &Range<usize>| {
        text[a.clone()].to_lowercase() == text[b.clone()].to_lowercase()
    };
    let spaced = |a: &Range<usize>, b: &Range<usize>| {
        let gap = &text[a.end..b.start];
        !gap.is_empty() && gap.chars().all(char::is_whitespace)
    };

    words.windows(4).find_map(|w| {
        let phrase = w[0].start..w[3].end;
        let repeated = same(&w[0], &w[2])
            && same(&w[1], &w[3])
            && w.windows(2).all(|pair| spaced(&pair[0], &pair[1]));
        if repeated && is_free(&phrase) {
            Some(RuleMatch {
                suggestion: text[w[0].start..w[1].end].to_string(),
                range: phrase,
            })
        } else {
            None
        }
    })
}

/// Ordered rule table.
#[derive(Debug)]
pub struct RuleCatalog {
    rules: Vec<Rule>,
}

impl RuleCatalog {
    pub fn standard() -> Result<Self, regex::Error> {
        let mut rules = Vec::new();

        for (word, fix) in SPELLING {
            rules.push(Rule::whole_word(Category::Spelling, word, fix)?);
        }
        for (phrase, fix) in STYLE {
            rules.push(Rule::whole_word(Category::Style, phrase, fix)?);
        }
        for (pattern, fix) in GRAMMAR {
            rules.push(Rule::pattern(Category::Grammar, pattern, fix)?);
        }
        rules.push(Rule::repeated_phrase());
        for (phrase, fix) in LEGAL_TERMINOLOGY {
            rules.push(Rule::whole_word(Category::LegalTerminology, phrase, fix)?);
        }

        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule_for(category: Category, replacement: &str) -> &'static Rule {
        CATALOG
            .rules()
            .iter()
            .find(|r| r.category == category && r.replacement == replacement)
            .unwrap()
    }

    #[test]
    fn test_standard_catalog_compiles() {
        let catalog = RuleCatalog::standard().unwrap();
        assert_eq!(catalog.len(), 13 + 8 + 5 + 1 + 7);
    }

    #[test]
    fn test_category_order_is_fixed() {
        let mut seen: Vec<Category> = Vec::new();
        for rule in CATALOG.rules() {
            if seen.last() != Some(&rule.category) {
                seen.push(rule.category.clone());
            }
        }
        assert_eq!(
            seen,
            vec![
                Category::Spelling,
                Category::Style,
                Category::Grammar,
                Category::LegalTerminology
            ]
        );
    }

    #[test]
    fn test_spelling_is_whole_word_and_case_insensitive() {
        let rule = rule_for(Category::Spelling, "whereas");
        let hit = rule.find_first("WHERAS the parties", |_| true).unwrap();
        assert_eq!(hit.range, 0..6);
        assert!(rule.find_first("somewheras", |_| true).is_none());
    }

    #[test]
    fn test_context_pattern_flags_only_group() {
        let rule = rule_for(Category::Grammar, "its");
        let text = "The court and it's jurisdiction";
        let hit = rule.find_first(text, |_| true).unwrap();
        assert_eq!(&text[hit.range], "it's");
        assert!(rule.find_first("it's raining", |_| true).is_none());
    }

    #[test]
    fn test_find_first_skips_claimed_spans() {
        let rule = rule_for(Category::LegalTerminology, "regarding");
        let text = "about this and about that";
        let hit = rule.find_first(text, |r| r.start > 0).unwrap();
        assert_eq!(hit.range, 15..20);
    }

    #[test]
    fn test_repeated_phrase() {
        let rule = CATALOG
            .rules()
            .iter()
            .find(|r| matches!(r.matcher, Matcher::RepeatedPhrase))
            .unwrap();
        let text = "Notice to the party the party shall be given.";
        let hit = rule.find_first(text, |_| true).unwrap();
        assert_eq!(&text[hit.range.clone()], "the party the party");
        assert_eq!(hit.suggestion, "the party");

        assert!(rule.find_first("the party, the party", |_| true).is_none());
        assert!(rule.find_first("the party the partying", |_| true).is_none());
    }

    #[test]
    fn test_whitespace_rule_ignores_paragraph_breaks() {
        let rule = rule_for(Category::Grammar, " ");
        assert!(rule.find_first("Hello\n\nWorld", |_| true).is_none());
        assert!(rule.find_first("Hello   World", |_| true).is_some());
    }

    #[test]
    fn test_category_from_label() {
        assert_eq!(Category::from_label("Spelling"), Category::Spelling);
        assert_eq!(Category::from_label("Legal Terms"), Category::LegalTerminology);
        assert_eq!(Category::from_label("punctuation"), Category::Punctuation);
        assert_eq!(
            Category::from_label("Tone"),
            Category::Other("Tone".to_string())
        );
        assert_eq!(Category::from_label(" "), Category::Other("Issue".to_string()));
    }

    #[test]
    fn test_category_serializes_as_label() {
        let json = serde_json::to_string(&Category::LegalTerminology).unwrap();
        assert_eq!(json, "\"Legal terminology\"");
    }
}
