use serde::Serialize;
use std::fmt::Display;

/// Scalar payload of a populated cell.
///
/// The grid never stores blank text: a cell whose value serializes to the
/// empty string is treated as absent, which keeps the empty-row and header
/// predicates in the engine purely presence-based.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    /// Inline or shared string values
    Text(String),
    /// Numeric values
    Number(f64),
    /// Boolean values (true/false)
    Boolean(bool),
}

impl Scalar {
    /// Returns the text content when the scalar is a string.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }
}

impl Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(value) => write!(f, "{value}"),
            Self::Number(value) => write!(f, "{value}"),
            Self::Boolean(value) => write!(f, "{value}"),
        }
    }
}
