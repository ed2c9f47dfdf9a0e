//! Public entry points of the engine. Everything here is a stateless pure
//! function of its inputs, safe to call concurrently without coordination.

use tracing::debug;

use crate::combiner::{self, CombineStrategy};
use crate::error::RuleResult;
use crate::evaluator::{self, AttributeMap};
use crate::parser::{self, AstNode};
use crate::tokenizer;

/// Parse rule text into an AST.
pub fn parse_rule(rule_text: &str) -> RuleResult<AstNode> {
    let tokens = tokenizer::tokenize(rule_text)?;
    debug!(rule = rule_text, tokens = tokens.len(), "tokenized rule");
    parser::parse(&tokens)
}

/// Check rule syntax without keeping the tree. Used by callers that persist
/// rule text and want to reject bad rules up front.
pub fn validate_rule(rule_text: &str) -> RuleResult<()> {
    parse_rule(rule_text).map(|_| ())
}

/// Evaluate a parsed (or storage-reconstructed) AST against user attributes.
pub fn evaluate_rule(ast: &AstNode, user_attributes: &AttributeMap) -> RuleResult<bool> {
    evaluator::evaluate(ast, user_attributes)
}

/// Combine several rule texts into one AST using the canonical strategy.
pub fn combine_rules(rule_texts: &[String]) -> RuleResult<AstNode> {
    combiner::combine_rules(rule_texts)
}

/// Combine several rule texts into one AST with an explicit strategy.
pub fn combine_rules_with(rule_texts: &[String], strategy: CombineStrategy) -> RuleResult<AstNode> {
    combiner::combine_rules_with(rule_texts, strategy)
}
