//! Parsing Literate notation into Onya graphs.
//!
//! Literate is a Markdown-adjacent, indentation-structured notation for
//! describing property graphs. A document is a sequence of header blocks
//! (`# subject [Type]`) whose bulleted entries assert properties
//! (`* key: value`), edges (`* key -> target`) and text-block references
//! (`* key :: name`), with deeper-indented entries annotating the assertion
//! above them. A distinguished `# @docheader` block carries document-level
//! directives instead of graph data.
//!
//! ## Key components
//!
//! - [`parse`] / [`LiterateParser`] — entry points turning text into graph
//!   mutations plus a [`ParseResult`]
//! - [`lex`] — the tokenizer producing the intermediate block list
//! - [`ParseOptions`] — per-call switches (provenance tagging)
//!
//! ## Two-pass resolution
//!
//! 1. **Pre-pass**: collect every `:name = """…"""` text-reference
//!    definition, document-wide, before resolving anything.
//! 2. **Resolution pass**: walk header blocks in order, maintaining the
//!    per-document scoping context (document IRI, node/schema/type bases,
//!    abbreviation table) and emitting nodes and assertions.
//!
//! ## Failure semantics
//!
//! Errors are fatal to the parse call, and the graph is **not** rolled back:
//! nodes and assertions created before the failing entry remain. Callers
//! needing atomicity should parse into a scratch [`Graph`] and merge on
//! success.
//!
//! ```rust
//! use onya_core::{graph::Graph, literate::LiterateParser};
//!
//! let text = "\
//! ## @docheader
//! * @document: http://example.org/base/
//! * @schema: https://schema.org/
//!
//! ## A [Person]
//! * name: Alice
//! * knows -> B
//! ";
//! let mut graph = Graph::new();
//! let result = LiterateParser::new().parse(text, &mut graph)?;
//! assert_eq!(result.doc_iri.as_deref(), Some("http://example.org/base/"));
//! assert!(graph.contains("http://example.org/base/A"));
//! # Ok::<(), onya_core::OnyaError>(())
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{error::OnyaError, graph::Graph, iri::Iri};

pub mod lex;
mod resolve;

/// Per-call parse switches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOptions {
    /// Tag every assertion created by the parse with a child `source`
    /// property recording the document IRI. Off by default.
    pub document_source_assertions: bool,
}

/// Summary of one parse call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseResult {
    /// The `@document` IRI, when the document declared one.
    pub doc_iri: Option<Iri>,
    /// Nodes created by this call. Nodes merely re-referenced from an
    /// earlier parse into the same graph are excluded.
    pub nodes_added: BTreeSet<Iri>,
}

/// Reusable Literate parser holding a set of [`ParseOptions`].
#[derive(Debug, Clone, Default)]
pub struct LiterateParser {
    options: ParseOptions,
}

impl LiterateParser {
    pub fn new() -> Self {
        LiterateParser::default()
    }

    pub fn with_options(options: ParseOptions) -> Self {
        LiterateParser { options }
    }

    /// Enable or disable provenance tagging (see
    /// [`ParseOptions::document_source_assertions`]).
    pub fn document_source_assertions(mut self, enabled: bool) -> Self {
        self.options.document_source_assertions = enabled;
        self
    }

    /// Parse Literate text into `graph`; see the free function [`parse`].
    pub fn parse(&self, text: &str, graph: &mut Graph) -> Result<ParseResult, OnyaError> {
        parse(text, graph, &self.options)
    }
}

/// Translate Literate text into graph mutations.
///
/// Runs tokenization and resolution to completion synchronously. The graph
/// is mutated incrementally: on error, mutations performed before the
/// failure point are kept (no rollback).
#[tracing::instrument(skip_all)]
pub fn parse(
    text: &str,
    graph: &mut Graph,
    options: &ParseOptions,
) -> Result<ParseResult, OnyaError> {
    let blocks = lex::tokenize(text)?;
    resolve::resolve_blocks(&blocks, graph, options)
}
