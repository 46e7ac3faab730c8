//! Basic usage example for onya-core
//!
//! This example demonstrates:
//! - Parsing two Literate documents into one shared graph
//! - Node deduplication by IRI across documents
//! - Reading properties, edges and provenance annotations back out
//!
//! Run with: cargo run --example basic_usage

use onya_core::{
    graph::{AssertionOwner, Graph},
    literate::LiterateParser,
    terms::SOURCE_REL,
    OnyaError,
};

const THINGS_FALL_APART: &str = "\
# @docheader

* @document: http://example.org/classics/things-fall-apart
* @nodebase: http://example.org/classics/
* @schema: https://schema.org/
* @iri:
  * ppl: http://example.org/people/

# TFA [Book]

* name: Things Fall Apart
* isbn: 9781841593272
* author -> @ppl/CAchebe
* publisher -> Heinemann
  * when: 1958

# @ppl/CAchebe [Person]

* name: Chinụalụmọgụ Achebe
";

const ACHEBE_BIO: &str = "\
# @docheader

* @document: http://example.org/classics/achebe-bio
* @nodebase: http://example.org/classics/
* @schema: https://schema.org/
* @iri:
  * ppl: http://example.org/people/

# @ppl/CAchebe [Person]

* birthDate: 1930
* award: Man Booker International Prize
";

fn main() -> Result<(), OnyaError> {
    // Set up logging to see what's happening
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    println!("=== onya-core Basic Usage Example ===\n");

    // 1. Parse both documents into one graph, recording provenance
    let mut graph = Graph::new();
    let parser = LiterateParser::new().document_source_assertions(true);

    for (label, text) in [
        ("things-fall-apart", THINGS_FALL_APART),
        ("achebe-bio", ACHEBE_BIO),
    ] {
        let result = parser.parse(text, &mut graph)?;
        println!(
            "Parsed {label}: @document={:?}, nodes added: {}",
            result.doc_iri,
            result.nodes_added.len()
        );
    }

    println!(
        "\nMerged graph: {} nodes, {} assertions\n",
        graph.len(),
        graph.size()
    );

    // 2. Walk every node with its properties and edges
    for node in graph.iter() {
        println!("{}", node.iri());
        for type_iri in node.types() {
            println!("  a {type_iri}");
        }
        for prop in node.properties() {
            println!("  {} = {:?}", prop.label(), prop.text().unwrap_or(""));
        }
        for edge in node.edges() {
            println!(
                "  {} -> {}",
                edge.label(),
                edge.target().expect("edges always have targets").iri()
            );
        }
    }

    // 3. Provenance: which document asserted each fact about Achebe?
    let achebe = "http://example.org/people/CAchebe";
    println!("\nAssertions about {achebe}, with @source:");
    for m in graph.match_assertions(Some(achebe), None, None) {
        let source = m
            .annotations
            .get(&*SOURCE_REL)
            .copied()
            .unwrap_or("(unknown)");
        println!("  {} = {:?}  [from {source}]", m.label, m.value.as_str());
    }

    println!("\n=== Example Complete ===");
    Ok(())
}
