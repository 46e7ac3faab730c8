//! Fixed vocabulary terms.
//!
//! The system names a handful of concepts with its own IRIs — the `type` and
//! `source` relations, the `Document` class auto-applied to document nodes,
//! and the `null` value used for absent references. All of them live in the
//! Onya vocabulary namespace ([`ONYA_BASEIRI`]); [`vocab`] builds a term in
//! that namespace. Common RDF/RDFS namespace constants are kept here too for
//! downstream emitters.
//!
//! Modeled on `original_source/pylib/terms.py`.

use once_cell::sync::Lazy;

use crate::iri::Iri;

/// The Onya vocabulary namespace. Terms concatenate onto it directly, so it
/// ends in `#`: the resolver's absolutization treats a `#`-terminated base as
/// a fragment namespace and appends the term rather than RFC-merging it.
pub const ONYA_BASEIRI: &str = "http://purl.org/onya/vocab#";

/// Build the vocabulary term `name` in the Onya namespace.
pub fn vocab(name: &str) -> Iri {
    Iri::new(format!("{ONYA_BASEIRI}{name}"))
}

/// The `type` relation: a node's declared types.
pub static ONYA_TYPE: Lazy<Iri> = Lazy::new(|| vocab("type"));

/// The `source` relation: provenance tagging of an assertion's origin document.
pub static SOURCE_REL: Lazy<Iri> = Lazy::new(|| vocab("source"));

/// The `Document` class, auto-applied to a parsed document's node.
pub static ONYA_DOCUMENT: Lazy<Iri> = Lazy::new(|| vocab("Document"));

/// The null value IRI: the resolution of an absent reference.
pub static ONYA_NULL: Lazy<Iri> = Lazy::new(|| vocab("null"));

/// The RDF namespace.
pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

/// The RDF Schema namespace.
pub const RDFS_NS: &str = "http://www.w3.org/2000/01/rdf-schema#";

/// The `rdf:type` property.
pub static RDF_TYPE: Lazy<Iri> = Lazy::new(|| Iri::new(format!("{RDF_NS}type")));
