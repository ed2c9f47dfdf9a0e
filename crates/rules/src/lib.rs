pub mod combiner;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod operand;
pub mod parser;
pub mod tokenizer;

pub use combiner::CombineStrategy;
pub use engine::{combine_rules, combine_rules_with, evaluate_rule, parse_rule, validate_rule};
pub use error::{RuleError, RuleResult};
pub use evaluator::{evaluate, AttributeMap};
pub use operand::{validate_operand, Comparator, Operand};
pub use parser::{parse, AstNode, Operator};
pub use tokenizer::{tokenize, Token};
