use tracing::debug;

use crate::engine::parse_rule;
use crate::error::{RuleError, RuleResult};
use crate::parser::{AstNode, Operator};

/// How several independently-parsed rules are folded into one tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombineStrategy {
    /// Canonical: fold right-associatively with whichever operator occurs
    /// most often across the raw rule texts; ties favor `AND`.
    MostFrequentOperator,
    /// Permissive utility: fold left-associatively with `AND` regardless of
    /// the rule contents.
    AndFold,
}

/// Combine rule texts into a single AST using the canonical strategy.
pub fn combine_rules(rule_texts: &[String]) -> RuleResult<AstNode> {
    combine_rules_with(rule_texts, CombineStrategy::MostFrequentOperator)
}

/// Combine rule texts into a single AST.
///
/// Every rule text must parse; a failure in any of them propagates instead of
/// dropping the rule. An empty input list fails with
/// [`RuleError::InvalidInput`]. A single rule comes back as its own tree,
/// unwrapped.
pub fn combine_rules_with(
    rule_texts: &[String],
    strategy: CombineStrategy,
) -> RuleResult<AstNode> {
    if rule_texts.is_empty() {
        return Err(RuleError::InvalidInput(
            "rules must be a non-empty list of rule strings".to_string(),
        ));
    }

    let asts = rule_texts
        .iter()
        .map(|text| parse_rule(text))
        .collect::<RuleResult<Vec<_>>>()?;

    let combined = match strategy {
        CombineStrategy::MostFrequentOperator => {
            let operator = most_frequent_operator(rule_texts);
            debug!(%operator, rules = rule_texts.len(), "combining rules");
            fold_right(asts, operator)
        }
        CombineStrategy::AndFold => fold_left(asts, Operator::And),
    };

    combined.ok_or_else(|| RuleError::InvalidInput("no valid rules to combine".to_string()))
}

/// Textual frequency count over the raw rule texts, not over the parsed
/// trees; ties go to `AND`.
fn most_frequent_operator(rule_texts: &[String]) -> Operator {
    let mut and_count = 0;
    let mut or_count = 0;
    for text in rule_texts {
        and_count += text.matches("AND").count();
        or_count += text.matches("OR").count();
    }
    if and_count >= or_count {
        Operator::And
    } else {
        Operator::Or
    }
}

/// Right-leaning fold: the first AST stays the outermost left child and the
/// rest collapse into the right subtree. The asymmetry with the parser's
/// left-leaning chains is intentional.
fn fold_right(asts: Vec<AstNode>, operator: Operator) -> Option<AstNode> {
    let mut combined: Option<AstNode> = None;
    for ast in asts.into_iter().rev() {
        combined = Some(match combined {
            None => ast,
            Some(right) => AstNode::operator(operator, ast, right),
        });
    }
    combined
}

fn fold_left(asts: Vec<AstNode>, operator: Operator) -> Option<AstNode> {
    let mut combined: Option<AstNode> = None;
    for ast in asts {
        combined = Some(match combined {
            None => ast,
            Some(left) => AstNode::operator(operator, left, ast),
        });
    }
    combined
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_combine_builds_right_leaning_tree() {
        let combined = combine_rules(&rules(&[
            "age > 30",
            "salary < 50000",
            "department = 'IT'",
        ]))
        .unwrap();
        assert_eq!(
            combined,
            AstNode::operator(
                Operator::And,
                AstNode::operand("age > 30"),
                AstNode::operator(
                    Operator::And,
                    AstNode::operand("salary < 50000"),
                    AstNode::operand("department = 'IT'"),
                ),
            )
        );
    }

    #[test]
    fn test_combine_picks_most_frequent_operator() {
        let combined = combine_rules(&rules(&[
            "age > 30 OR experience > 5",
            "salary < 50000 OR department = 'IT'",
            "age < 65 AND experience > 2",
        ]))
        .unwrap();
        let AstNode::Operator { operator, .. } = combined else {
            panic!("expected operator root");
        };
        assert_eq!(operator, Operator::Or);
    }

    #[test]
    fn test_combine_tie_favors_and() {
        let combined = combine_rules(&rules(&[
            "age > 30 OR experience > 5",
            "salary < 50000 AND department = 'IT'",
        ]))
        .unwrap();
        let AstNode::Operator { operator, .. } = combined else {
            panic!("expected operator root");
        };
        assert_eq!(operator, Operator::And);
    }

    #[test]
    fn test_combine_single_rule_is_unwrapped() {
        let combined = combine_rules(&rules(&["age > 30 AND salary < 50000"])).unwrap();
        assert_eq!(
            combined,
            AstNode::operator(
                Operator::And,
                AstNode::operand("age > 30"),
                AstNode::operand("salary < 50000"),
            )
        );
    }

    #[test]
    fn test_combine_empty_list_fails() {
        let err = combine_rules(&[]).unwrap_err();
        assert!(matches!(err, RuleError::InvalidInput(_)));
    }

    #[test]
    fn test_combine_propagates_parse_errors() {
        let err = combine_rules(&rules(&["age > 30", "height > 180"])).unwrap_err();
        assert!(matches!(err, RuleError::InvalidOperand(_)));

        let err = combine_rules(&rules(&["age > 30", "(salary < 50000"])).unwrap_err();
        assert!(matches!(err, RuleError::MalformedRule(_)));
    }

    #[test]
    fn test_and_fold_builds_left_leaning_tree() {
        let combined = combine_rules_with(
            &rules(&["age > 30", "salary < 50000", "experience > 5"]),
            CombineStrategy::AndFold,
        )
        .unwrap();
        assert_eq!(
            combined,
            AstNode::operator(
                Operator::And,
                AstNode::operator(
                    Operator::And,
                    AstNode::operand("age > 30"),
                    AstNode::operand("salary < 50000"),
                ),
                AstNode::operand("experience > 5"),
            )
        );
    }

    #[test]
    fn test_and_fold_ignores_operator_frequency() {
        let combined = combine_rules_with(
            &rules(&["age > 30 OR experience > 5", "salary < 50000 OR age < 65"]),
            CombineStrategy::AndFold,
        )
        .unwrap();
        let AstNode::Operator { operator, .. } = combined else {
            panic!("expected operator root");
        };
        assert_eq!(operator, Operator::And);
    }
}
