//! Semantic resolution: walk the tokenized block list and populate a
//! [`Graph`].
//!
//! Resolution is a two-pass affair over one document-wide [`DocContext`]:
//! the first pass collects every text-reference definition (definitions are
//! document-global, independent of lexical position), the second walks
//! header blocks in order, resolving subjects, labels and values against the
//! context's bases and emitting nodes and assertions. The context is created
//! fresh per parse call and threaded explicitly through every step; nothing
//! here is ambient state.

use std::collections::BTreeMap;

use crate::{
    error::OnyaError,
    graph::{AssertionId, Graph, NodeId, Origin},
    iri::{self, AbbrevMap, Iri},
    literate::{
        lex::{Block, Entry, EntryData, EntryForm, HeaderBlock, ValueKind},
        ParseOptions, ParseResult,
    },
    terms::{ONYA_DOCUMENT, SOURCE_REL},
};

/// Subject sentinel dispatching a header block to directive resolution.
const DOCHEADER: &str = "@docheader";

/// Reserved docheader key whose nested entries register IRI abbreviations.
const IRI_SECTION: &str = "@iri";

/// Per-parse scoping state. Dropped when the parse call returns.
#[derive(Debug, Default)]
struct DocContext {
    /// IRI of the document being parsed, itself. Also the fallback base for
    /// node and type resolution.
    iri: Option<String>,
    /// Base for resolving relative node IRIs (subjects and edge targets).
    nodebase: Option<String>,
    /// Base for resolving relative assertion label IRIs.
    schemabase: Option<String>,
    /// Base for resolving relative type IRIs.
    typebase: Option<String>,
    /// Default language tag. Carried for future literal annotation.
    #[allow(dead_code)]
    lang: Option<String>,
    /// Registered IRI abbreviation prefixes.
    abbreviations: AbbrevMap,
    /// Text-reference definitions collected by the pre-pass.
    text_refs: BTreeMap<String, String>,
}

impl DocContext {
    fn node_base(&self) -> Option<&str> {
        self.nodebase.as_deref().or(self.iri.as_deref())
    }

    fn type_base(&self) -> Option<&str> {
        self.typebase.as_deref().or(self.iri.as_deref())
    }
}

/// Look a node up by IRI, creating it on first reference and recording the
/// creation so the parse result can report exactly what this call added.
fn fetch_node(graph: &mut Graph, id: Iri, created: &mut ParseResult) -> NodeId {
    match graph.node_id(&id) {
        Some(existing) => existing,
        None => {
            created.nodes_added.insert(id.clone());
            graph.get_or_create(id)
        }
    }
}

pub(super) fn resolve_blocks(
    blocks: &[Block],
    graph: &mut Graph,
    options: &ParseOptions,
) -> Result<ParseResult, OnyaError> {
    let mut ctx = DocContext::default();
    let mut result = ParseResult::default();

    // Pre-pass: text references are visible to every block, including ones
    // lexically preceding their definition. Later definitions win.
    for block in blocks {
        if let Block::TextRef { name, content } = block {
            ctx.text_refs.insert(name.clone(), content.clone());
        }
    }

    for block in blocks {
        let Block::Header(header) = block else {
            continue;
        };
        if header.subject.as_deref() == Some(DOCHEADER) {
            process_docheader(header, graph, &mut ctx, &mut result)?;
        } else {
            process_block(header, graph, &ctx, options, &mut result)?;
        }
    }

    result.doc_iri = ctx.iri.map(Iri::new);
    Ok(result)
}

/// Resolve one regular header block into subject node, types and assertions.
fn process_block(
    header: &HeaderBlock,
    graph: &mut Graph,
    ctx: &DocContext,
    options: &ParseOptions,
    result: &mut ParseResult,
) -> Result<(), OnyaError> {
    let subject_iri = iri::resolve(
        header.subject.as_deref(),
        ctx.node_base(),
        None,
        &ctx.abbreviations,
    )?;
    tracing::debug!(subject = %subject_iri, line = header.line, "resolving header block");
    let subject = fetch_node(graph, subject_iri, result);

    if let Some(annotation) = &header.node_type {
        let type_iri = iri::resolve(Some(annotation), ctx.type_base(), None, &ctx.abbreviations)?;
        graph.add_type(subject, type_iri);
    }

    // The first assertion entry fixes the outer indent; anything deeper
    // attaches to the most recent top-level assertion, however deep it is
    // visually nested.
    let mut outer_indent: Option<usize> = None;
    let mut current_top: Option<AssertionId> = None;

    for entry in &header.entries {
        let Entry::Assertion(entry) = entry else {
            continue;
        };
        let outer = *outer_indent.get_or_insert(entry.indent);
        let label = iri::resolve(
            Some(&entry.key),
            ctx.schemabase.as_deref(),
            None,
            &ctx.abbreviations,
        )?;

        let origin = if entry.indent == outer {
            Origin::Node(subject)
        } else {
            match current_top {
                Some(assertion) => Origin::Assertion(assertion),
                // Nested entry with no top-level assertion to hang off of.
                None => continue,
            }
        };

        let Some(assertion) = emit_assertion(entry, origin, label, graph, ctx, result)? else {
            continue;
        };
        if entry.indent == outer {
            current_top = Some(assertion);
        }
        if options.document_source_assertions {
            if let Some(doc_iri) = &ctx.iri {
                graph.add_property(
                    Origin::Assertion(assertion),
                    SOURCE_REL.clone(),
                    doc_iri.clone(),
                );
            }
        }
    }
    Ok(())
}

/// Create the property or edge an entry denotes, per the value kind decided
/// at tokenization. Returns `None` for entries with no value.
fn emit_assertion(
    entry: &EntryData,
    origin: Origin,
    label: Iri,
    graph: &mut Graph,
    ctx: &DocContext,
    result: &mut ParseResult,
) -> Result<Option<AssertionId>, OnyaError> {
    let Some(value) = &entry.value else {
        return Ok(None);
    };
    let assertion = match entry.form {
        EntryForm::Edge => {
            let target = resolve_target(&value.verbatim, &entry.key, graph, ctx, result)?;
            graph.add_edge(origin, label, target)
        }
        EntryForm::Property => match value.kind {
            // An explicit reference in value position asserts a connection,
            // not a literal.
            ValueKind::Reference => {
                let target = resolve_target(&value.verbatim, &entry.key, graph, ctx, result)?;
                graph.add_edge(origin, label, target)
            }
            ValueKind::Text | ValueKind::Unknown => {
                graph.add_property(origin, label, value.verbatim.clone())
            }
        },
        EntryForm::TextRef => {
            // Unregistered names substitute empty text rather than failing.
            let content = ctx
                .text_refs
                .get(&value.verbatim)
                .cloned()
                .unwrap_or_default();
            graph.add_property(origin, label, content)
        }
    };
    Ok(Some(assertion))
}

fn resolve_target(
    verbatim: &str,
    context_label: &str,
    graph: &mut Graph,
    ctx: &DocContext,
    result: &mut ParseResult,
) -> Result<NodeId, OnyaError> {
    let target_iri = iri::resolve(
        Some(verbatim),
        ctx.node_base(),
        Some(context_label),
        &ctx.abbreviations,
    )?;
    Ok(fetch_node(graph, target_iri, result))
}

/// Resolve a `@docheader` block: entries are configuration, not graph data.
fn process_docheader(
    header: &HeaderBlock,
    graph: &mut Graph,
    ctx: &mut DocContext,
    result: &mut ParseResult,
) -> Result<(), OnyaError> {
    let mut outer_indent: Option<usize> = None;
    let mut current_outer_key: Option<&str> = None;

    for entry in &header.entries {
        let Entry::Assertion(entry) = entry else {
            continue;
        };
        let outer = *outer_indent.get_or_insert(entry.indent);
        let value = entry.value.as_ref().map(|v| v.verbatim.clone());

        if entry.indent == outer {
            current_outer_key = Some(&entry.key);
            match entry.key.as_str() {
                "@document" => ctx.iri = value,
                "@language" => ctx.lang = value,
                "@base" => {
                    ctx.nodebase.clone_from(&value);
                    ctx.typebase = value;
                }
                "@nodebase" => ctx.nodebase = value,
                "@schema" => ctx.schemabase = value,
                "@resource-type" | "@type-base" | "@typebase" => ctx.typebase = value,
                other => {
                    // With a document node to attach them to, any other
                    // directive becomes a literal property of the document.
                    let Some(doc_iri) = ctx.iri.clone() else {
                        continue;
                    };
                    let Some(value) = value else {
                        continue;
                    };
                    let doc_node = fetch_node(graph, Iri::new(doc_iri), result);
                    let label = iri::absolutize(other, ctx.schemabase.as_deref())?;
                    graph.add_property(Origin::Node(doc_node), label, value);
                }
            }
        } else if current_outer_key == Some(IRI_SECTION) {
            match entry.key.as_str() {
                "@base" => {
                    ctx.nodebase.clone_from(&value);
                    ctx.typebase = value;
                }
                "@nodebase" => ctx.nodebase = value,
                "@schema" => ctx.schemabase = value,
                "@resource-type" | "@type-base" | "@typebase" => ctx.typebase = value,
                prefix => {
                    if let Some(expansion) = value {
                        ctx.abbreviations.insert(prefix.to_string(), expansion);
                    }
                }
            }
        }
        // Nested entries under any other outer directive carry no meaning.
    }

    if let Some(doc_iri) = ctx.iri.clone() {
        let doc_node = fetch_node(graph, Iri::new(doc_iri), result);
        graph.add_type(doc_node, ONYA_DOCUMENT.clone());
    }
    Ok(())
}
