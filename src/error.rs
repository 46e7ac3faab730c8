use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::ParseError as UrlParseError;

/// Errors surfaced by the Literate parser and the identifier resolver.
///
/// Variants are structured so callers can branch on kind: grammar failures
/// carry their source line, resolution failures carry the offending prefix or
/// reference text. All variants are fatal to the parse call that raised them;
/// see [`crate::literate::parse`] for the partial-mutation hazard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum OnyaError {
    /// The input text does not match the Literate grammar.
    #[error("Literate syntax error at line {line}: {detail}")]
    Syntax { line: usize, detail: String },

    /// An abbreviated reference used a prefix with no `@iri` registration.
    #[error("unknown IRI abbreviation prefix '{prefix}'")]
    UnknownPrefix { prefix: String },

    /// A reference in a disambiguated position (e.g. an edge target) does not
    /// satisfy IRI reference syntax.
    #[error("invalid IRI reference for {context}: \"{text}\"")]
    InvalidReferenceSyntax { context: String, text: String },

    /// A base IRI could not be parsed, or joining a reference against it
    /// failed.
    #[error("IRI resolution error: {0}")]
    Resolution(String),
}

impl OnyaError {
    /// Create a [`OnyaError::Syntax`] with a 1-indexed source line.
    pub fn syntax(line: usize, detail: impl Into<String>) -> Self {
        OnyaError::Syntax {
            line,
            detail: detail.into(),
        }
    }
}

impl From<UrlParseError> for OnyaError {
    fn from(src: UrlParseError) -> OnyaError {
        OnyaError::Resolution(format!("invalid IRI: {src}"))
    }
}
