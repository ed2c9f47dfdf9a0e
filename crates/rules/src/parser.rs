use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{RuleError, RuleResult};
use crate::operand::validate_operand;
use crate::tokenizer::Token;

/// Binary boolean operator of an internal AST node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "AND")]
    And,
    #[serde(rename = "OR")]
    Or,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::And => f.write_str("AND"),
            Operator::Or => f.write_str("OR"),
        }
    }
}

/// Abstract syntax tree node for rule expressions.
///
/// Serializes to the persisted wire shape:
/// `{"type":"operand","value":"age > 30"}` for leaves and
/// `{"type":"operator","operator":"AND","left":…,"right":…}` for internal
/// nodes, so a tree reconstructed from storage evaluates without re-parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AstNode {
    /// Leaf: the raw operand text, e.g. `age > 30`. The decomposition into
    /// attribute/comparator/value is re-derived at evaluation time.
    Operand { value: String },
    /// Internal node owning both subtrees.
    Operator {
        operator: Operator,
        left: Box<AstNode>,
        right: Box<AstNode>,
    },
}

impl AstNode {
    pub fn operand(value: impl Into<String>) -> Self {
        AstNode::Operand {
            value: value.into(),
        }
    }

    pub fn operator(operator: Operator, left: AstNode, right: AstNode) -> Self {
        AstNode::Operator {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

/// Parse a token sequence into an AST by recursive descent.
///
/// Grammar (left-associative, `AND` binds tighter than `OR`):
///
/// ```text
/// Expression := Term ( OR Term )*
/// Term       := Factor ( AND Factor )*
/// Factor     := '(' Expression ')' | Operand
/// ```
///
/// Operand leaves are validated before node construction; a validation
/// failure aborts the whole parse. Tokens left over after a complete
/// top-level expression are an error.
pub fn parse(tokens: &[Token]) -> RuleResult<AstNode> {
    let mut parser = Parser {
        tokens,
        position: 0,
    };
    let root = parser.parse_expression()?;
    if let Some(token) = parser.peek() {
        return Err(RuleError::UnexpectedToken(format!(
            "trailing input after expression: '{token}'"
        )));
    }
    Ok(root)
}

struct Parser<'a> {
    tokens: &'a [Token],
    position: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn bump(&mut self) {
        self.position += 1;
    }

    fn parse_expression(&mut self) -> RuleResult<AstNode> {
        let mut node = self.parse_term()?;
        while matches!(self.peek(), Some(Token::Or)) {
            self.bump();
            let right = self.parse_term()?;
            node = AstNode::operator(Operator::Or, node, right);
        }
        Ok(node)
    }

    fn parse_term(&mut self) -> RuleResult<AstNode> {
        let mut node = self.parse_factor()?;
        while matches!(self.peek(), Some(Token::And)) {
            self.bump();
            let right = self.parse_factor()?;
            node = AstNode::operator(Operator::And, node, right);
        }
        Ok(node)
    }

    fn parse_factor(&mut self) -> RuleResult<AstNode> {
        match self.peek().cloned() {
            Some(Token::LParen) => {
                self.bump();
                let node = self.parse_expression()?;
                match self.peek() {
                    Some(Token::RParen) => {
                        self.bump();
                        Ok(node)
                    }
                    Some(token) => Err(RuleError::UnexpectedToken(format!(
                        "expected closing parenthesis, found '{token}'"
                    ))),
                    None => Err(RuleError::UnexpectedToken(
                        "expected closing parenthesis, found end of rule".to_string(),
                    )),
                }
            }
            Some(Token::Operand(raw)) => {
                self.bump();
                validate_operand(&raw)?;
                Ok(AstNode::Operand { value: raw })
            }
            Some(token) => Err(RuleError::UnexpectedToken(format!(
                "expected operand or '(', found '{token}'"
            ))),
            None => Err(RuleError::UnexpectedToken(
                "unexpected end of rule".to_string(),
            )),
        }
    }
}
