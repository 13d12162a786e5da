//! Sigma Loader/Parser (C1): YAML text -> validated `SigmaRule` AST, plus
//! the field-modifier and condition-expression sub-parsers it shares with
//! the condition compiler (C4).

mod condition;
mod field;
mod yaml;

pub use condition::parse_condition;
pub use field::parse_field_ref;
pub use yaml::parse_sigma_yaml;
