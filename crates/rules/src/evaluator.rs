use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{RuleError, RuleResult};
use crate::operand::{split_operand, Comparator};
use crate::parser::{AstNode, Operator};

/// User attributes supplied at evaluation time, keyed by the exact attribute
/// spelling the rule uses. Values are JSON strings or numbers.
pub type AttributeMap = Map<String, Value>;

/// Walk an AST against user attributes and produce a verdict.
///
/// Both children of an operator node are evaluated before combining; there is
/// no short-circuiting, so a [`RuleError::MissingAttribute`] on either side
/// surfaces even when the other side alone would decide the result. This
/// keeps evaluation order deterministic and lets both branches be traced.
pub fn evaluate(ast: &AstNode, user_attributes: &AttributeMap) -> RuleResult<bool> {
    match ast {
        AstNode::Operator {
            operator,
            left,
            right,
        } => {
            let left_result = evaluate(left, user_attributes)?;
            let right_result = evaluate(right, user_attributes)?;
            debug!(%operator, left_result, right_result, "evaluated operator node");
            Ok(match operator {
                Operator::And => left_result && right_result,
                Operator::Or => left_result || right_result,
            })
        }
        AstNode::Operand { value } => evaluate_operand(value, user_attributes),
    }
}

fn evaluate_operand(raw: &str, user_attributes: &AttributeMap) -> RuleResult<bool> {
    let Some((attribute_seg, comparator, rule_value)) = split_operand(raw) else {
        return Err(RuleError::InvalidOperand(format!(
            "invalid operand format: {raw}"
        )));
    };
    let attribute = attribute_seg.trim();

    // An absent key and a falsy value (null, false, zero, empty string) are
    // treated alike: the attribute is considered missing.
    let user_value = user_attributes
        .get(attribute)
        .filter(|value| !is_falsy(value))
        .ok_or_else(|| RuleError::MissingAttribute(attribute.to_string()))?;

    debug!(attribute, %comparator, rule_value, ?user_value, "evaluating operand");

    match comparator {
        // A side that does not coerce to a number compares like NaN: the
        // comparison is false, never an error.
        Comparator::GreaterThan => match (as_number(user_value), parse_number(rule_value)) {
            (Some(supplied), Some(literal)) => Ok(supplied > literal),
            _ => Ok(false),
        },
        Comparator::LessThan => match (as_number(user_value), parse_number(rule_value)) {
            (Some(supplied), Some(literal)) => Ok(supplied < literal),
            _ => Ok(false),
        },
        Comparator::Equal => {
            let Value::String(supplied) = user_value else {
                return Err(RuleError::InvalidOperand(format!(
                    "equality comparison needs a string value for attribute '{attribute}'"
                )));
            };
            let rule_side: String = rule_value
                .chars()
                .filter(|c| !matches!(c, '\'' | '"'))
                .collect();
            Ok(supplied.trim().to_lowercase() == rule_side.trim().to_lowercase())
        }
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f == 0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(true) => Some(1.0),
        _ => None,
    }
}

fn parse_number(rule_value: &str) -> Option<f64> {
    rule_value.trim().parse().ok()
}
