//! Tests for the ontology-merge output path
//!
//! The ontology strategy buffers axioms in memory and serializes once on
//! finalization, so these tests check merge idempotence across repeated
//! inputs and that the configured document format is the one written.

use std::io::Read;
use std::path::Path;

use rdf_splice::compression::open_input;
use rdf_splice::{Compression, TransformatorBuilder};

const ONTOLOGY_TTL: &str = r#"
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix ex: <http://example.org/> .

ex:onto a owl:Ontology .
ex:A a owl:Class ;
    rdfs:label "class A" ;
    rdfs:subClassOf ex:B .
ex:B a owl:Class .
ex:p a owl:ObjectProperty ;
    rdfs:domain ex:A ;
    rdfs:range ex:B .
"#;

fn write_ontology(path: &Path) {
    std::fs::write(path, ONTOLOGY_TTL).unwrap();
}

fn read_text(path: &Path) -> String {
    // open_input strips a compression layer detected from the name
    let (mut reader, _) = open_input(path).unwrap();
    let mut text = String::new();
    reader.read_to_string(&mut text).unwrap();
    text
}

#[test]
fn owl_xml_output_merges_and_dedups() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("onto.ttl");
    write_ontology(&input);

    let mut transformator = TransformatorBuilder::new()
        .with_output_format("application/owl+xml")
        .with_output_directory(dir.path())
        .with_output_file_name("merged")
        .build()
        .unwrap();
    // The same document twice: duplicate axioms must collapse
    transformator.add_path(&input, None).unwrap();
    transformator.add_path(&input, None).unwrap();
    let output = transformator.output_file().to_path_buf();
    transformator.finish().unwrap();

    assert_eq!(output, dir.path().join("merged.owl"));
    let xml = read_text(&output);
    assert!(xml.contains(r#"ontologyIRI="http://example.org/onto""#));
    assert_eq!(xml.matches("<SubClassOf>").count(), 1);
    assert_eq!(
        xml.matches(r#"<Declaration><Class IRI="http://example.org/A"/></Declaration>"#)
            .count(),
        1
    );
    assert!(xml.contains("<ObjectPropertyDomain>"));
    assert!(xml.contains("<ObjectPropertyRange>"));
}

#[test]
fn manchester_output_honors_configured_format() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("onto.ttl");
    write_ontology(&input);

    let mut transformator = TransformatorBuilder::new()
        .with_output_format("text/owl-manchester")
        .with_output_directory(dir.path())
        .with_output_file_name("merged")
        .build()
        .unwrap();
    transformator.add_path(&input, None).unwrap();
    let output = transformator.output_file().to_path_buf();
    transformator.finish().unwrap();

    // The requested format is the one written, not an OWL/XML fallback
    assert_eq!(output, dir.path().join("merged.omn"));
    let text = read_text(&output);
    assert!(text.starts_with("Ontology: <http://example.org/onto>"));
    assert!(text.contains("Class: <http://example.org/A>"));
    assert!(text.contains("    SubClassOf: <http://example.org/B>"));
    assert!(text.contains("ObjectProperty: <http://example.org/p>"));
    assert!(!text.contains("<?xml"));
}

#[test]
fn compressed_ontology_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("onto.ttl");
    write_ontology(&input);

    let mut transformator = TransformatorBuilder::new()
        .with_output_format("application/owl+xml")
        .with_output_directory(dir.path())
        .with_output_file_name("merged")
        .with_compression(Compression::Gzip)
        .build()
        .unwrap();
    transformator.add_path(&input, None).unwrap();
    let output = transformator.output_file().to_path_buf();
    transformator.finish().unwrap();

    assert_eq!(output, dir.path().join("merged.owl.gz"));
    let xml = read_text(&output);
    assert!(xml.starts_with("<?xml"));
    assert!(xml.contains("<SubClassOf>"));
}

#[test]
fn data_property_axioms_keep_their_flavor() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("data.ttl");
    std::fs::write(
        &input,
        r#"
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .
@prefix ex: <http://example.org/> .

ex:Person a owl:Class .
ex:age a owl:DatatypeProperty ;
    rdfs:domain ex:Person ;
    rdfs:range xsd:integer ;
    rdfs:subPropertyOf ex:measurement .
ex:measurement a owl:DatatypeProperty .
"#,
    )
    .unwrap();

    let mut transformator = TransformatorBuilder::new()
        .with_output_format("application/owl+xml")
        .with_output_directory(dir.path())
        .with_output_file_name("merged")
        .build()
        .unwrap();
    transformator.add_path(&input, None).unwrap();
    let output = transformator.output_file().to_path_buf();
    transformator.finish().unwrap();

    let xml = read_text(&output);
    assert!(xml.contains(r#"<Declaration><DataProperty IRI="http://example.org/age"/></Declaration>"#));
    // The declared property kind carries through to its domain, range and
    // sub-property axioms
    assert!(xml.contains(
        r#"<DataPropertyDomain><DataProperty IRI="http://example.org/age"/><Class IRI="http://example.org/Person"/></DataPropertyDomain>"#
    ));
    assert!(xml.contains(
        r#"<DataPropertyRange><DataProperty IRI="http://example.org/age"/><Datatype IRI="http://www.w3.org/2001/XMLSchema#integer"/></DataPropertyRange>"#
    ));
    assert!(xml.contains(
        r#"<SubDataPropertyOf><DataProperty IRI="http://example.org/age"/><DataProperty IRI="http://example.org/measurement"/></SubDataPropertyOf>"#
    ));
    assert!(!xml.contains("<ObjectPropertyDomain>"));
    assert!(!xml.contains("<ObjectPropertyRange>"));
    assert!(!xml.contains("<SubObjectPropertyOf>"));
}

#[test]
fn punned_entity_gets_a_single_manchester_frame() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("punned.ttl");
    std::fs::write(
        &input,
        r#"
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix ex: <http://example.org/> .

ex:Species a owl:Class, owl:NamedIndividual ;
    rdfs:subClassOf ex:Taxon .
ex:Taxon a owl:Class .
"#,
    )
    .unwrap();

    let mut transformator = TransformatorBuilder::new()
        .with_output_format("text/owl-manchester")
        .with_output_directory(dir.path())
        .with_output_file_name("merged")
        .build()
        .unwrap();
    transformator.add_path(&input, None).unwrap();
    let output = transformator.output_file().to_path_buf();
    transformator.finish().unwrap();

    let text = read_text(&output);
    let frame_headers = text
        .lines()
        .filter(|line| line.ends_with(": <http://example.org/Species>"))
        .count();
    assert_eq!(frame_headers, 1);
    assert_eq!(
        text.matches("    SubClassOf: <http://example.org/Taxon>")
            .count(),
        1
    );
}

#[test]
fn malformed_ontology_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("broken.ttl");
    std::fs::write(&input, "this is not turtle at all {{{").unwrap();

    let mut transformator = TransformatorBuilder::new()
        .with_output_format("application/owl+xml")
        .with_output_directory(dir.path())
        .with_output_file_name("merged")
        .build()
        .unwrap();
    assert!(transformator.add_path(&input, None).is_err());
}
