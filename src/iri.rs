//! Identifier handling: the [`Iri`] newtype and the reference resolver.
//!
//! Everything the graph stores is named by an absolute IRI. The Literate
//! notation lets documents use several relative spellings — bare words,
//! explicit `<…>` references, `@`-vocabulary terms, and `@prefix#rest`
//! abbreviations — which [`resolve`] expands against the per-document bases
//! before anything reaches the graph.

use std::{
    borrow::Borrow,
    collections::BTreeMap,
    fmt::{self, Display, Formatter},
    ops::Deref,
};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{
    error::OnyaError,
    terms::{ONYA_BASEIRI, ONYA_NULL},
};

/// Table of registered abbreviation prefixes (`@iri` docheader section).
pub type AbbrevMap = BTreeMap<String, String>;

/// An absolute identifier. Immutable once created; ordering and hashing
/// delegate to the underlying string so `Iri` works directly as a map key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Iri(String);

impl Iri {
    pub fn new(iri: impl Into<String>) -> Self {
        Iri(iri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for Iri {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Iri {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Iri {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for Iri {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Iri {
    fn from(src: &str) -> Iri {
        Iri(src.to_string())
    }
}

impl From<String> for Iri {
    fn from(src: String) -> Iri {
        Iri(src)
    }
}

impl PartialEq<str> for Iri {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Iri {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Abbreviated reference: `@prefix#rest`, `@prefix/rest` or `@prefix@rest`.
static URI_ABBR_PAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^@([\-_0-9A-Za-z]+)([#/@])(.+)$").expect("static pattern"));

/// Explicit reference: `<…>`.
static URI_EXPLICIT_PAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^<(.+)>$").expect("static pattern"));

/// Whether `text` satisfies IRI reference syntax: no whitespace, control
/// characters, or the delimiters RFC 3987 excludes from references.
pub fn matches_iri_ref_syntax(text: &str) -> bool {
    !text.is_empty()
        && text.chars().all(|c| {
            !c.is_control()
                && !c.is_whitespace()
                && !matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\')
        })
}

/// Absolutize `reference` against `base`.
///
/// An already-absolute reference is returned as-is, and a missing base leaves
/// the reference verbatim. A base ending in `#` concatenates rather than
/// RFC-joining: fragment namespaces would lose their fragment under RFC 3986
/// reference merging.
pub fn absolutize(reference: &str, base: Option<&str>) -> Result<Iri, OnyaError> {
    let Some(base) = base else {
        return Ok(Iri::new(reference));
    };
    if Url::parse(reference).is_ok() {
        return Ok(Iri::new(reference));
    }
    if base.ends_with('#') {
        return Ok(Iri::new(format!("{base}{reference}")));
    }
    let joined = Url::parse(base)?.join(reference)?;
    Ok(Iri::new(String::from(joined)))
}

/// Expand a raw document reference into an absolute [`Iri`].
///
/// Rules, in order:
///
/// 1. An absent reference resolves to [`ONYA_NULL`](crate::terms::ONYA_NULL).
/// 2. `@prefix{#,/,@}rest` substitutes the prefix's registered IRI,
///    preserving separator and remainder ([`OnyaError::UnknownPrefix`] if the
///    prefix is not in `abbreviations`). Checked before rule 3 because it is
///    strictly more specific.
/// 3. `@term` absolutizes `term` against the Onya vocabulary namespace,
///    ignoring `base`.
/// 4. `<…>` absolutizes the inner text against `base`.
/// 5. Anything else absolutizes against `base`; when `context` names a
///    disambiguated position (an edge target), the text must first satisfy
///    IRI reference syntax or the resolution fails with
///    [`OnyaError::InvalidReferenceSyntax`].
pub fn resolve(
    reference: Option<&str>,
    base: Option<&str>,
    context: Option<&str>,
    abbreviations: &AbbrevMap,
) -> Result<Iri, OnyaError> {
    let Some(text) = reference else {
        return Ok(ONYA_NULL.clone());
    };

    if let Some(caps) = URI_ABBR_PAT.captures(text) {
        let prefix = &caps[1];
        let Some(expansion) = abbreviations.get(prefix) else {
            return Err(OnyaError::UnknownPrefix {
                prefix: prefix.to_string(),
            });
        };
        return Ok(Iri::new(format!("{expansion}{}{}", &caps[2], &caps[3])));
    }

    if let Some(stripped) = text.strip_prefix('@') {
        return absolutize(stripped, Some(ONYA_BASEIRI));
    }

    if let Some(caps) = URI_EXPLICIT_PAT.captures(text) {
        return absolutize(&caps[1], base);
    }

    if let Some(context) = context {
        if !matches_iri_ref_syntax(text) {
            return Err(OnyaError::InvalidReferenceSyntax {
                context: context.to_string(),
                text: text.to_string(),
            });
        }
    }
    absolutize(text, base)
}
