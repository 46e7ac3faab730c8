//! # onya-core
//!
//! A Rust library for compiling Onya Literate documents into an in-memory
//! property graph.
//!
//! ## Overview
//!
//! Onya Literate is a Markdown-adjacent notation for writing knowledge
//! graphs by hand: `#` headings declare nodes, bulleted `key: value` entries
//! declare properties, `key -> target` entries declare edges, and deeper
//! indentation annotates the assertion above it. onya-core is the compiler
//! front end for that notation — it tokenizes the text, resolves every
//! relative identifier against the document's declared bases, and
//! materializes nodes and assertions into a [`graph::Graph`].
//!
//! ### Key features
//!
//! - **IRI-identified nodes**: one node per absolute identifier per graph,
//!   created on first reference and shared thereafter — parsing several
//!   documents into one graph merges them on identity
//! - **Reified assertions**: properties and edges can carry their own
//!   properties and edges (metadata on metadata)
//! - **Scoped resolution**: per-document node/schema/type bases,
//!   `@prefix#rest` abbreviations and `@`-vocabulary terms
//! - **Text-block references**: multi-line literals declared once with
//!   `:name = """…"""` and substituted wherever `key :: name` appears
//! - **Provenance tagging**: optionally record the source document IRI on
//!   every assertion a parse creates
//!
//! ## Quick start
//!
//! ```rust
//! use onya_core::{graph::Graph, literate::LiterateParser};
//!
//! let text = r#"
//! ## @docheader
//! * @document: http://example.org/books/
//! * @schema: https://schema.org/
//!
//! ## TFA [Book]
//! * name: Things Fall Apart
//! * author -> CAchebe
//! "#;
//!
//! let mut graph = Graph::new();
//! let parser = LiterateParser::new();
//! let result = parser.parse(text, &mut graph)?;
//!
//! assert_eq!(result.doc_iri.as_deref(), Some("http://example.org/books/"));
//! for node in graph.iter() {
//!     println!("{}", node.iri());
//! }
//! # Ok::<(), onya_core::OnyaError>(())
//! ```
//!
//! ## Concurrency
//!
//! Parsing is single-threaded and synchronous. A graph instance assumes at
//! most one in-flight parse mutating it; wrap shared graphs in external
//! exclusion. Independent parses into independent graphs share nothing.
//!
//! ## Module guide
//!
//! Start with [`literate::LiterateParser`] for parsing documents, then
//! explore [`graph::Graph`] for reading and building graphs directly. See
//! [`iri`] for identifier resolution and [`terms`] for the fixed vocabulary.

pub mod error;
pub mod graph;
pub mod iri;
pub mod literate;
pub mod terms;

pub use error::*;
