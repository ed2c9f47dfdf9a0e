use std::fmt;

use crate::error::{RuleError, RuleResult};

/// Attribute names the engine recognizes, exactly as spelled in rules.
pub const VALID_ATTRIBUTES: [&str; 8] = [
    "age",
    "department",
    "salary",
    "experience",
    "AGE",
    "DEPARTMENT",
    "SALARY",
    "EXPERIENCE",
];

/// Attributes whose rule-side value must parse as a number.
pub const NUMERIC_ATTRIBUTES: [&str; 6] =
    ["age", "salary", "experience", "AGE", "SALARY", "EXPERIENCE"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    GreaterThan,
    LessThan,
    Equal,
}

impl Comparator {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '>' => Some(Comparator::GreaterThan),
            '<' => Some(Comparator::LessThan),
            '=' => Some(Comparator::Equal),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Comparator::GreaterThan => ">",
            Comparator::LessThan => "<",
            Comparator::Equal => "=",
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decomposed form of an operand token. Intermediate only: the AST keeps the
/// raw operand text and the evaluator re-derives this split on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operand {
    pub attribute: String,
    pub comparator: Comparator,
    /// Everything after the comparator, untrimmed, quotes preserved.
    pub value: String,
}

/// Split operand text on the first comparator character. The split must be
/// deterministic since it runs once at validation and again at evaluation.
pub(crate) fn split_operand(raw: &str) -> Option<(&str, Comparator, &str)> {
    let index = raw.find(['>', '<', '='])?;
    let comparator = Comparator::from_char(raw[index..].chars().next()?)?;
    Some((&raw[..index], comparator, &raw[index + 1..]))
}

/// Validate a single operand token and decompose it.
///
/// Rejects: missing attribute/comparator/value segments, attributes outside
/// the registry, non-numeric values for numeric attributes, and reversed
/// operands such as `30 > age` where the attribute segment itself is numeric.
pub fn validate_operand(raw: &str) -> RuleResult<Operand> {
    let Some((attribute_seg, comparator, value_seg)) = split_operand(raw) else {
        return Err(RuleError::InvalidOperand(format!(
            "invalid operand format: {raw}"
        )));
    };

    if attribute_seg.is_empty() || value_seg.is_empty() {
        return Err(RuleError::InvalidOperand(format!(
            "invalid operand format: {raw}"
        )));
    }

    let attribute = attribute_seg.trim();
    if !VALID_ATTRIBUTES.contains(&attribute) {
        return Err(RuleError::InvalidOperand(format!(
            "invalid attribute '{attribute}': only 'age', 'salary', 'experience', \
             'department' or their uppercase forms are allowed"
        )));
    }

    let value_is_numeric = value_seg.trim().parse::<f64>().is_ok();

    if NUMERIC_ATTRIBUTES.contains(&attribute) && !value_is_numeric {
        return Err(RuleError::InvalidOperand(format!(
            "invalid value for numeric attribute '{attribute}': {value_seg}"
        )));
    }

    // Guard against reversed operand ordering, e.g. `30 > age`.
    if !value_is_numeric && attribute.parse::<f64>().is_ok() {
        return Err(RuleError::InvalidOperand(format!(
            "invalid value for attribute: {value_seg}"
        )));
    }

    Ok(Operand {
        attribute: attribute.to_string(),
        comparator,
        value: value_seg.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_numeric_operand() {
        let operand = validate_operand("age > 30").unwrap();
        assert_eq!(operand.attribute, "age");
        assert_eq!(operand.comparator, Comparator::GreaterThan);
        assert_eq!(operand.value, " 30");
    }

    #[test]
    fn test_validate_string_operand_keeps_quotes() {
        let operand = validate_operand("department = 'Sales'").unwrap();
        assert_eq!(operand.attribute, "department");
        assert_eq!(operand.comparator, Comparator::Equal);
        assert_eq!(operand.value, " 'Sales'");
    }

    #[test]
    fn test_validate_uppercase_attribute() {
        let operand = validate_operand("SALARY < 50000").unwrap();
        assert_eq!(operand.attribute, "SALARY");
        assert_eq!(operand.comparator, Comparator::LessThan);
    }

    #[test]
    fn test_reject_unknown_attribute() {
        let err = validate_operand("height > 180").unwrap_err();
        assert!(matches!(err, RuleError::InvalidOperand(_)));
    }

    #[test]
    fn test_reject_mixed_case_attribute() {
        // Registry membership is exact; `Age` is neither spelling.
        let err = validate_operand("Age > 30").unwrap_err();
        assert!(matches!(err, RuleError::InvalidOperand(_)));
    }

    #[test]
    fn test_reject_missing_comparator() {
        let err = validate_operand("age 30").unwrap_err();
        assert!(matches!(err, RuleError::InvalidOperand(_)));
    }

    #[test]
    fn test_reject_doubled_comparator() {
        // `age >> 30` splits into value `> 30`, which is not numeric.
        let err = validate_operand("age >> 30").unwrap_err();
        assert!(matches!(err, RuleError::InvalidOperand(_)));
    }

    #[test]
    fn test_reject_non_numeric_value_for_numeric_attribute() {
        let err = validate_operand("experience > five").unwrap_err();
        assert!(matches!(err, RuleError::InvalidOperand(_)));
    }

    #[test]
    fn test_reject_missing_value() {
        let err = validate_operand("age >").unwrap_err();
        assert!(matches!(err, RuleError::InvalidOperand(_)));
    }

    #[test]
    fn test_split_is_first_comparator_only() {
        let (attribute, comparator, value) = split_operand("department = 'a=b'").unwrap();
        assert_eq!(attribute, "department ");
        assert_eq!(comparator, Comparator::Equal);
        assert_eq!(value, " 'a=b'");
    }
}
