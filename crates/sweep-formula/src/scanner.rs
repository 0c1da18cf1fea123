//! Lexical scanning of formula text for bracketed field references

use crate::error::FormulaResult;
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// A candidate reference found in formula text.
///
/// `bracket` is the byte offset of the opening `[` in the flattened text; a
/// qualified and an unqualified candidate with the same offset describe the
/// same bracket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormulaReference {
    /// `Table[Name]` or `'Table'[Name]`
    Qualified {
        table: String,
        name: String,
        quoted: bool,
        bracket: usize,
    },
    /// `[Name]` not preceded by an identifier character
    Unqualified { name: String, bracket: usize },
}

/// Finds candidate field references in formula text.
///
/// Implementations report candidates only; deciding which candidates name
/// real fields is left to [`DependencyExtractor`](crate::DependencyExtractor).
pub trait ReferenceScanner: Send + Sync {
    fn scan(&self, formula: &str) -> FormulaResult<Vec<FormulaReference>>;
}

/// Collapse newlines and whitespace runs into single spaces
pub fn flatten_formula(formula: &str) -> String {
    formula.split_whitespace().collect::<Vec<_>>().join(" ")
}

static QUALIFIED_PATTERN: OnceLock<Regex> = OnceLock::new();
static UNQUALIFIED_PATTERN: OnceLock<Regex> = OnceLock::new();

fn qualified_pattern() -> &'static Regex {
    QUALIFIED_PATTERN.get_or_init(|| {
        Regex::new(r"'(?P<qtable>[^'\[\]]+)'\[(?P<qname>[\w ]+)\]|(?P<table>[\w ]+)\[(?P<name>[\w ]+)\]")
            .expect("valid regex literal")
    })
}

fn unqualified_pattern() -> &'static Regex {
    UNQUALIFIED_PATTERN.get_or_init(|| Regex::new(r"\[(?P<name>[\w ]+)\]").expect("valid regex literal"))
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Regex-based scanner over flattened formula text
#[derive(Debug, Default, Clone, Copy)]
pub struct LexicalScanner;

impl LexicalScanner {
    pub fn new() -> Self {
        Self
    }
}

impl ReferenceScanner for LexicalScanner {
    fn scan(&self, formula: &str) -> FormulaResult<Vec<FormulaReference>> {
        let flat = flatten_formula(formula);
        let mut refs = Vec::new();
        let mut quoted_brackets = HashSet::new();

        for caps in qualified_pattern().captures_iter(&flat) {
            let (table, name, quoted) = match (caps.name("qtable"), caps.name("qname")) {
                (Some(t), Some(n)) => (t, n, true),
                _ => match (caps.name("table"), caps.name("name")) {
                    (Some(t), Some(n)) => (t, n, false),
                    _ => continue,
                },
            };
            if table.as_str().trim().is_empty() {
                continue;
            }
            let bracket = name.start() - 1;
            if quoted {
                quoted_brackets.insert(bracket);
            }
            refs.push(FormulaReference::Qualified {
                table: table.as_str().to_string(),
                name: name.as_str().to_string(),
                quoted,
                bracket,
            });
        }

        for caps in unqualified_pattern().captures_iter(&flat) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.name("name")) else {
                continue;
            };
            let bracket = whole.start();
            if quoted_brackets.contains(&bracket) {
                continue;
            }
            let preceded_by_identifier = flat[..bracket]
                .chars()
                .next_back()
                .is_some_and(is_identifier_char);
            if preceded_by_identifier {
                continue;
            }
            refs.push(FormulaReference::Unqualified {
                name: name.as_str().to_string(),
                bracket,
            });
        }

        Ok(refs)
    }
}

#[cfg(test)]
#[path = "scanner_test.rs"]
mod tests;
