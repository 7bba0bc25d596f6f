//! Ontology merging and document serialization
//!
//! The counterpart of the streaming strategy for output formats that cannot
//! be written incrementally: every input is parsed fully, its axioms are
//! merged into one in-memory [`Ontology`], and the merged result is
//! serialized exactly once when the transformator is finished, in the
//! document format configured at build time.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use oxrdf::Quad;
use tracing::debug;

use crate::compression::CompressedWriter;
use crate::error::SpliceError;
use crate::format::OntologyFormat;
use crate::owl::{AnnotationValue, Axiom, EntityKind, Ontology};
use crate::streaming::parse_quads;
use crate::transform::Transformator;

/// Transformator that buffers a merged axiom set and writes it on finish
pub struct OntologyTransformator {
    ontology: Ontology,
    format: OntologyFormat,
    out: CompressedWriter,
    output_file: PathBuf,
}

impl OntologyTransformator {
    pub fn new(format: OntologyFormat, out: CompressedWriter, output_file: PathBuf) -> Self {
        OntologyTransformator {
            ontology: Ontology::new(),
            format,
            out,
            output_file,
        }
    }
}

impl Transformator for OntologyTransformator {
    fn add_file(&mut self, path: &Path, content_type: Option<&str>) -> Result<(), SpliceError> {
        let mut quads: Vec<Quad> = Vec::new();
        parse_quads(path, content_type, |quad| {
            quads.push(quad);
            Ok(())
        })?;
        let skipped = self.ontology.merge_quads(&quads);
        if skipped > 0 {
            debug!(
                "Skipped {skipped} statement(s) of {} outside the supported axiom subset",
                path.display()
            );
        }
        Ok(())
    }

    fn output_file(&self) -> &Path {
        &self.output_file
    }

    fn finish(self: Box<Self>) -> Result<(), SpliceError> {
        let this = *self;
        let mut out = this.out;
        let write_result = match this.format {
            OntologyFormat::OwlXml => write_owl_xml(&this.ontology, &mut out),
            OntologyFormat::Manchester => write_manchester(&this.ontology, &mut out),
        };
        write_result.map_err(|e| SpliceError::Write {
            path: this.output_file.clone(),
            reason: e.to_string(),
        })?;
        out.finish()?;
        Ok(())
    }
}

/// Serialize the merged ontology as OWL/XML
pub fn write_owl_xml(ontology: &Ontology, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    write!(out, r#"<Ontology xmlns="http://www.w3.org/2002/07/owl#""#)?;
    if let Some(iri) = ontology.iri() {
        write!(out, r#" ontologyIRI="{}""#, escape_xml(iri.as_str()))?;
    }
    writeln!(out, ">")?;

    for import in ontology.imports() {
        writeln!(out, "    <Import>{}</Import>", escape_xml(import))?;
    }

    for axiom in ontology.axioms_sorted() {
        write_owl_xml_axiom(ontology, axiom, out)?;
    }

    writeln!(out, "</Ontology>")
}

fn write_owl_xml_axiom(ontology: &Ontology, axiom: &Axiom, out: &mut impl Write) -> io::Result<()> {
    match axiom {
        Axiom::Declaration(kind, entity) => {
            writeln!(
                out,
                "    <Declaration><{tag} IRI=\"{iri}\"/></Declaration>",
                tag = entity_tag(*kind),
                iri = escape_xml(entity.as_str())
            )
        }
        Axiom::SubClassOf { sub, sup } => writeln!(
            out,
            "    <SubClassOf><Class IRI=\"{}\"/><Class IRI=\"{}\"/></SubClassOf>",
            escape_xml(sub.as_str()),
            escape_xml(sup.as_str())
        ),
        Axiom::EquivalentClasses(a, b) => writeln!(
            out,
            "    <EquivalentClasses><Class IRI=\"{}\"/><Class IRI=\"{}\"/></EquivalentClasses>",
            escape_xml(a.as_str()),
            escape_xml(b.as_str())
        ),
        Axiom::DisjointClasses(a, b) => writeln!(
            out,
            "    <DisjointClasses><Class IRI=\"{}\"/><Class IRI=\"{}\"/></DisjointClasses>",
            escape_xml(a.as_str()),
            escape_xml(b.as_str())
        ),
        // Property axioms come in an object and a data flavor; the declared
        // kind of the property decides which one the output carries, so the
        // axiom never contradicts the property's own declaration
        Axiom::SubPropertyOf { sub, sup } => {
            if is_data_property(ontology, sub) || is_data_property(ontology, sup) {
                writeln!(
                    out,
                    "    <SubDataPropertyOf><DataProperty IRI=\"{}\"/><DataProperty IRI=\"{}\"/></SubDataPropertyOf>",
                    escape_xml(sub.as_str()),
                    escape_xml(sup.as_str())
                )
            } else {
                writeln!(
                    out,
                    "    <SubObjectPropertyOf><ObjectProperty IRI=\"{}\"/><ObjectProperty IRI=\"{}\"/></SubObjectPropertyOf>",
                    escape_xml(sub.as_str()),
                    escape_xml(sup.as_str())
                )
            }
        }
        Axiom::Domain { property, class } => {
            if is_data_property(ontology, property) {
                writeln!(
                    out,
                    "    <DataPropertyDomain><DataProperty IRI=\"{}\"/><Class IRI=\"{}\"/></DataPropertyDomain>",
                    escape_xml(property.as_str()),
                    escape_xml(class.as_str())
                )
            } else {
                writeln!(
                    out,
                    "    <ObjectPropertyDomain><ObjectProperty IRI=\"{}\"/><Class IRI=\"{}\"/></ObjectPropertyDomain>",
                    escape_xml(property.as_str()),
                    escape_xml(class.as_str())
                )
            }
        }
        Axiom::Range { property, range } => {
            if is_data_property(ontology, property) {
                writeln!(
                    out,
                    "    <DataPropertyRange><DataProperty IRI=\"{}\"/><Datatype IRI=\"{}\"/></DataPropertyRange>",
                    escape_xml(property.as_str()),
                    escape_xml(range.as_str())
                )
            } else {
                writeln!(
                    out,
                    "    <ObjectPropertyRange><ObjectProperty IRI=\"{}\"/><Class IRI=\"{}\"/></ObjectPropertyRange>",
                    escape_xml(property.as_str()),
                    escape_xml(range.as_str())
                )
            }
        }
        Axiom::ClassAssertion { individual, class } => writeln!(
            out,
            "    <ClassAssertion><Class IRI=\"{}\"/><NamedIndividual IRI=\"{}\"/></ClassAssertion>",
            escape_xml(class.as_str()),
            escape_xml(individual.as_str())
        ),
        Axiom::ObjectPropertyAssertion {
            subject,
            property,
            object,
        } => writeln!(
            out,
            "    <ObjectPropertyAssertion><ObjectProperty IRI=\"{}\"/><NamedIndividual IRI=\"{}\"/><NamedIndividual IRI=\"{}\"/></ObjectPropertyAssertion>",
            escape_xml(property.as_str()),
            escape_xml(subject.as_str()),
            escape_xml(object.as_str())
        ),
        Axiom::DataPropertyAssertion {
            subject,
            property,
            value,
        } => {
            write!(
                out,
                "    <DataPropertyAssertion><DataProperty IRI=\"{}\"/><NamedIndividual IRI=\"{}\"/>",
                escape_xml(property.as_str()),
                escape_xml(subject.as_str())
            )?;
            write_xml_literal(value, out)?;
            writeln!(out, "</DataPropertyAssertion>")
        }
        Axiom::AnnotationAssertion {
            subject,
            property,
            value,
        } => {
            write!(
                out,
                "    <AnnotationAssertion><AnnotationProperty IRI=\"{}\"/><IRI>{}</IRI>",
                escape_xml(property.as_str()),
                escape_xml(subject.as_str())
            )?;
            match value {
                AnnotationValue::Iri(iri) => {
                    write!(out, "<IRI>{}</IRI>", escape_xml(iri.as_str()))?
                }
                AnnotationValue::Literal(l) => write_xml_literal(l, out)?,
            }
            writeln!(out, "</AnnotationAssertion>")
        }
    }
}

fn write_xml_literal(literal: &oxrdf::Literal, out: &mut impl Write) -> io::Result<()> {
    if let Some(language) = literal.language() {
        write!(
            out,
            "<Literal xml:lang=\"{}\">{}</Literal>",
            escape_xml(language),
            escape_xml(literal.value())
        )
    } else {
        write!(
            out,
            "<Literal datatypeIRI=\"{}\">{}</Literal>",
            escape_xml(literal.datatype().as_str()),
            escape_xml(literal.value())
        )
    }
}

fn is_data_property(ontology: &Ontology, property: &oxrdf::NamedNode) -> bool {
    ontology.kind_of(property) == Some(EntityKind::DataProperty)
}

fn entity_tag(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Class => "Class",
        EntityKind::ObjectProperty => "ObjectProperty",
        EntityKind::DataProperty => "DataProperty",
        EntityKind::AnnotationProperty => "AnnotationProperty",
        EntityKind::NamedIndividual => "NamedIndividual",
        EntityKind::Datatype => "Datatype",
    }
}

fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Serialize the merged ontology in Manchester syntax, grouped into frames
pub fn write_manchester(ontology: &Ontology, out: &mut impl Write) -> io::Result<()> {
    if let Some(iri) = ontology.iri() {
        writeln!(out, "Ontology: <{}>", iri.as_str())?;
    } else {
        writeln!(out, "Ontology:")?;
    }
    for import in ontology.imports() {
        writeln!(out, "Import: <{import}>")?;
    }
    writeln!(out)?;

    // Frames keyed by (frame keyword, entity IRI); axioms_sorted keeps the
    // clause order within a frame stable
    let axioms = ontology.axioms_sorted();

    // A punned entity carries several declarations; its clauses go under a
    // single frame, keyed by the first declaration in sort order
    let mut framed: Vec<&oxrdf::NamedNode> = Vec::new();
    for &axiom in &axioms {
        if let Axiom::Declaration(kind, entity) = axiom {
            if framed.contains(&entity) {
                continue;
            }
            framed.push(entity);
            writeln!(out, "{}: <{}>", frame_keyword(*kind), entity.as_str())?;
            for &other in &axioms {
                write_manchester_clause(entity, other, out)?;
            }
            writeln!(out)?;
        }
    }

    // Axioms about entities that were never declared still need a frame
    let mut undeclared: Vec<(oxrdf::NamedNode, &'static str)> = Vec::new();
    for &axiom in &axioms {
        if let Some(subject) = undeclared_subject(ontology, axiom) {
            if !undeclared.iter().any(|(s, _)| s == &subject) {
                undeclared.push((subject, implied_frame_keyword(ontology, axiom)));
            }
        }
    }
    for (subject, keyword) in undeclared {
        writeln!(out, "{}: <{}>", keyword, subject.as_str())?;
        for &axiom in &axioms {
            write_manchester_clause(&subject, axiom, out)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Subject of an axiom whose entity carries no declaration, if any
fn undeclared_subject(ontology: &Ontology, axiom: &Axiom) -> Option<oxrdf::NamedNode> {
    let subject = match axiom {
        Axiom::SubClassOf { sub, .. } => sub,
        Axiom::SubPropertyOf { sub, .. } => sub,
        Axiom::Domain { property, .. } | Axiom::Range { property, .. } => property,
        Axiom::ClassAssertion { individual, .. } => individual,
        Axiom::ObjectPropertyAssertion { subject, .. }
        | Axiom::DataPropertyAssertion { subject, .. }
        | Axiom::AnnotationAssertion { subject, .. } => subject,
        _ => return None,
    };
    if ontology.kind_of(subject).is_none() {
        Some(subject.clone())
    } else {
        None
    }
}

fn implied_frame_keyword(ontology: &Ontology, axiom: &Axiom) -> &'static str {
    match axiom {
        Axiom::SubClassOf { .. } => "Class",
        // An undeclared sub-property inherits the declared kind of its
        // super-property when one is known
        Axiom::SubPropertyOf { sup, .. } if is_data_property(ontology, sup) => "DataProperty",
        Axiom::SubPropertyOf { .. } | Axiom::Domain { .. } | Axiom::Range { .. } => {
            "ObjectProperty"
        }
        _ => "Individual",
    }
}

fn frame_keyword(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Class => "Class",
        EntityKind::ObjectProperty => "ObjectProperty",
        EntityKind::DataProperty => "DataProperty",
        EntityKind::AnnotationProperty => "AnnotationProperty",
        EntityKind::NamedIndividual => "Individual",
        EntityKind::Datatype => "Datatype",
    }
}

/// Write the clause of `axiom` belonging to the frame of `entity`, if any
fn write_manchester_clause(
    entity: &oxrdf::NamedNode,
    axiom: &Axiom,
    out: &mut impl Write,
) -> io::Result<()> {
    match axiom {
        Axiom::SubClassOf { sub, sup } if sub == entity => {
            writeln!(out, "    SubClassOf: <{}>", sup.as_str())
        }
        Axiom::EquivalentClasses(a, b) if a == entity => {
            writeln!(out, "    EquivalentTo: <{}>", b.as_str())
        }
        Axiom::EquivalentClasses(a, b) if b == entity => {
            writeln!(out, "    EquivalentTo: <{}>", a.as_str())
        }
        Axiom::DisjointClasses(a, b) if a == entity => {
            writeln!(out, "    DisjointWith: <{}>", b.as_str())
        }
        Axiom::DisjointClasses(a, b) if b == entity => {
            writeln!(out, "    DisjointWith: <{}>", a.as_str())
        }
        Axiom::SubPropertyOf { sub, sup } if sub == entity => {
            writeln!(out, "    SubPropertyOf: <{}>", sup.as_str())
        }
        Axiom::Domain { property, class } if property == entity => {
            writeln!(out, "    Domain: <{}>", class.as_str())
        }
        Axiom::Range { property, range } if property == entity => {
            writeln!(out, "    Range: <{}>", range.as_str())
        }
        Axiom::ClassAssertion { individual, class } if individual == entity => {
            writeln!(out, "    Types: <{}>", class.as_str())
        }
        Axiom::ObjectPropertyAssertion {
            subject,
            property,
            object,
        } if subject == entity => {
            writeln!(out, "    Facts: <{}> <{}>", property.as_str(), object.as_str())
        }
        Axiom::DataPropertyAssertion {
            subject,
            property,
            value,
        } if subject == entity => {
            writeln!(
                out,
                "    Facts: <{}> {}",
                property.as_str(),
                manchester_literal(value)
            )
        }
        Axiom::AnnotationAssertion {
            subject,
            property,
            value,
        } if subject == entity => {
            let rendered = match value {
                AnnotationValue::Iri(iri) => format!("<{}>", iri.as_str()),
                AnnotationValue::Literal(l) => manchester_literal(l),
            };
            writeln!(out, "    Annotations: <{}> {}", property.as_str(), rendered)
        }
        _ => Ok(()),
    }
}

fn manchester_literal(literal: &oxrdf::Literal) -> String {
    let escaped = literal.value().replace('\\', "\\\\").replace('"', "\\\"");
    if let Some(language) = literal.language() {
        format!("\"{escaped}\"@{language}")
    } else if literal.datatype() == oxrdf::vocab::xsd::STRING {
        format!("\"{escaped}\"")
    } else {
        format!("\"{escaped}\"^^<{}>", literal.datatype().as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::owl::{OWL_CLASS, RDFS_SUB_CLASS_OF};
    use oxrdf::vocab::rdf;
    use oxrdf::{GraphName, NamedNode, Quad, Term};

    fn sample_ontology() -> Ontology {
        let node = |iri: &str| NamedNode::new(iri).unwrap();
        let mut ontology = Ontology::new();
        ontology.merge_quads(&[
            Quad::new(
                node("http://example.org/A"),
                rdf::TYPE.into_owned(),
                Term::NamedNode(OWL_CLASS.into_owned()),
                GraphName::DefaultGraph,
            ),
            Quad::new(
                node("http://example.org/B"),
                rdf::TYPE.into_owned(),
                Term::NamedNode(OWL_CLASS.into_owned()),
                GraphName::DefaultGraph,
            ),
            Quad::new(
                node("http://example.org/A"),
                node(RDFS_SUB_CLASS_OF.as_str()),
                Term::NamedNode(node("http://example.org/B")),
                GraphName::DefaultGraph,
            ),
        ]);
        ontology
    }

    #[test]
    fn test_owl_xml_output() {
        let mut buffer = Vec::new();
        write_owl_xml(&sample_ontology(), &mut buffer).unwrap();
        let xml = String::from_utf8(buffer).unwrap();
        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains(r#"<Declaration><Class IRI="http://example.org/A"/></Declaration>"#));
        assert!(xml.contains("<SubClassOf>"));
        assert!(xml.trim_end().ends_with("</Ontology>"));
    }

    #[test]
    fn test_manchester_output() {
        let mut buffer = Vec::new();
        write_manchester(&sample_ontology(), &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("Class: <http://example.org/A>"));
        assert!(text.contains("    SubClassOf: <http://example.org/B>"));
    }

    #[test]
    fn test_xml_escaping() {
        assert_eq!(escape_xml("a&b<c>\"d\""), "a&amp;b&lt;c&gt;&quot;d&quot;");
    }

    #[test]
    fn test_manchester_literals() {
        use oxrdf::Literal;
        assert_eq!(
            manchester_literal(&Literal::new_simple_literal("hi \"x\"")),
            "\"hi \\\"x\\\"\""
        );
        assert_eq!(
            manchester_literal(&Literal::new_language_tagged_literal("hallo", "de").unwrap()),
            "\"hallo\"@de"
        );
        assert_eq!(
            manchester_literal(&Literal::new_typed_literal(
                "4",
                oxrdf::vocab::xsd::INTEGER
            )),
            "\"4\"^^<http://www.w3.org/2001/XMLSchema#integer>"
        );
    }
}
