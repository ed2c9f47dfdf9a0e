use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{RuleError, RuleResult};

/// Structural matches: the uppercase keywords and parentheses, with any
/// surrounding whitespace. Lowercase `and`/`or` are deliberately not
/// structural; they end up inside operand text and fail operand validation.
static STRUCTURAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*(AND|OR|\(|\))\s*").expect("structural token pattern"));

/// A lexical token of a rule expression, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    And,
    Or,
    LParen,
    RParen,
    /// The trimmed raw text between two structural tokens, e.g. `age > 30`.
    Operand(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::And => f.write_str("AND"),
            Token::Or => f.write_str("OR"),
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
            Token::Operand(raw) => f.write_str(raw),
        }
    }
}

/// Split rule text into a flat token sequence.
///
/// Fails with [`RuleError::MalformedRule`] when the counts of `(` and `)`
/// differ, or when no tokens result at all.
pub fn tokenize(rule_text: &str) -> RuleResult<Vec<Token>> {
    let open = rule_text.matches('(').count();
    let close = rule_text.matches(')').count();
    if open != close {
        return Err(RuleError::MalformedRule(
            "unbalanced parentheses in rule".to_string(),
        ));
    }

    let mut tokens = Vec::new();
    let mut last_index = 0;

    for captures in STRUCTURAL.captures_iter(rule_text) {
        let matched = captures.get(0).expect("whole match");
        if matched.start() > last_index {
            tokens.push(Token::Operand(
                rule_text[last_index..matched.start()].trim().to_string(),
            ));
        }
        let structural = captures.get(1).expect("structural group");
        tokens.push(match structural.as_str() {
            "AND" => Token::And,
            "OR" => Token::Or,
            "(" => Token::LParen,
            _ => Token::RParen,
        });
        last_index = matched.end();
    }

    if last_index < rule_text.len() {
        tokens.push(Token::Operand(rule_text[last_index..].trim().to_string()));
    }

    if tokens.is_empty() {
        return Err(RuleError::MalformedRule("empty rule".to_string()));
    }

    Ok(tokens)
}
