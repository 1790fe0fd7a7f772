//! Web-search style query parsing for the in-memory engine.
//!
//! Follows the syntax PostgreSQL's `websearch_to_tsquery` accepts:
//!
//! - `rust backend` → both words required
//! - `"data engineer"` → the quoted words are required
//! - `-java` → documents containing `java` are excluded
//! - `rust or go` → either side may match; `or` binds looser than AND
//!
//! Every word is run through the language analyzer, so stopwords disappear.
//! A query left with no lexemes at all matches nothing.

use jobs_core::Language;

use super::lexical::{Analyzer, SearchDocument};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Conjunction {
    required: Vec<String>,
    excluded: Vec<String>,
}

impl Conjunction {
    fn is_empty(&self) -> bool {
        self.required.is_empty() && self.excluded.is_empty()
    }

    fn matches(&self, document: &SearchDocument) -> bool {
        self.required.iter().all(|lexeme| document.contains(lexeme))
            && !self.excluded.iter().any(|lexeme| document.contains(lexeme))
    }
}

/// A parsed query: alternatives of required/excluded lexemes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LexicalQuery {
    alternatives: Vec<Conjunction>,
}

enum Unit<'a> {
    Word { text: &'a str, negated: bool },
    Or,
}

impl LexicalQuery {
    pub fn parse(text: &str, language: Language) -> Self {
        let analyzer = Analyzer::for_language(language);
        let mut alternatives = Vec::new();
        let mut current = Conjunction::default();

        for unit in split_units(text) {
            match unit {
                Unit::Or => {
                    if !current.is_empty() {
                        alternatives.push(std::mem::take(&mut current));
                    }
                }
                Unit::Word { text, negated } => {
                    let lexemes = analyzer.lexemes(text);
                    if negated {
                        current.excluded.extend(lexemes);
                    } else {
                        current.required.extend(lexemes);
                    }
                }
            }
        }
        if !current.is_empty() {
            alternatives.push(current);
        }

        Self { alternatives }
    }

    /// True when no lexeme survived analysis.
    pub fn is_empty(&self) -> bool {
        self.alternatives.is_empty()
    }

    pub fn matches(&self, document: &SearchDocument) -> bool {
        self.alternatives.iter().any(|c| c.matches(document))
    }

    /// Sum of the weights of matched required lexemes, best alternative.
    pub fn rank(&self, document: &SearchDocument) -> f32 {
        self.alternatives
            .iter()
            .filter(|c| c.matches(document))
            .map(|c| {
                c.required
                    .iter()
                    .filter_map(|lexeme| document.weight_of(lexeme))
                    .map(|w| w.value())
                    .sum::<f32>()
            })
            .fold(0.0, f32::max)
    }
}

fn split_units(text: &str) -> Vec<Unit<'_>> {
    let mut units = Vec::new();
    let mut rest = text;

    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            break;
        }

        if let Some(quoted) = rest.strip_prefix('"') {
            let end = quoted.find('"').unwrap_or(quoted.len());
            units.push(Unit::Word {
                text: &quoted[..end],
                negated: false,
            });
            rest = quoted.get(end + 1..).unwrap_or("");
            continue;
        }

        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let word = &rest[..end];
        rest = &rest[end..];

        if word.eq_ignore_ascii_case("or") {
            units.push(Unit::Or);
        } else if let Some(negated) = word.strip_prefix('-').filter(|w| !w.is_empty()) {
            units.push(Unit::Word {
                text: negated,
                negated: true,
            });
        } else {
            units.push(Unit::Word {
                text: word,
                negated: false,
            });
        }
    }

    units
}
