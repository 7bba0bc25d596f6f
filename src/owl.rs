//! In-memory ontology model
//!
//! A deliberately small OWL subset: named entities, class and property
//! axioms, assertions and annotations, extracted from the RDF mapping of an
//! ontology document. Axioms are compared by logical equality, so the same
//! axiom read from two files collapses into one. Symmetric axioms
//! (equivalence, disjointness) are stored with their operands in IRI order so
//! that direction does not defeat the dedup.

use std::collections::{BTreeSet, HashMap, HashSet};

use oxrdf::vocab::rdf;
use oxrdf::{Literal, NamedNode, NamedNodeRef, Quad, Subject, Term};

pub const OWL_CLASS: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#Class");
pub const OWL_OBJECT_PROPERTY: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#ObjectProperty");
pub const OWL_DATATYPE_PROPERTY: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#DatatypeProperty");
pub const OWL_ANNOTATION_PROPERTY: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#AnnotationProperty");
pub const OWL_NAMED_INDIVIDUAL: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#NamedIndividual");
pub const OWL_ONTOLOGY: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#Ontology");
pub const OWL_EQUIVALENT_CLASS: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#equivalentClass");
pub const OWL_DISJOINT_WITH: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#disjointWith");
pub const OWL_IMPORTS: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#imports");
pub const RDFS_SUB_CLASS_OF: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2000/01/rdf-schema#subClassOf");
pub const RDFS_SUB_PROPERTY_OF: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2000/01/rdf-schema#subPropertyOf");
pub const RDFS_DOMAIN: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2000/01/rdf-schema#domain");
pub const RDFS_RANGE: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2000/01/rdf-schema#range");
pub const RDFS_DATATYPE: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2000/01/rdf-schema#Datatype");

/// Built-in annotation properties that are always treated as annotations
const BUILTIN_ANNOTATION_PROPERTIES: [&str; 5] = [
    "http://www.w3.org/2000/01/rdf-schema#label",
    "http://www.w3.org/2000/01/rdf-schema#comment",
    "http://www.w3.org/2000/01/rdf-schema#seeAlso",
    "http://www.w3.org/2000/01/rdf-schema#isDefinedBy",
    "http://www.w3.org/2002/07/owl#versionInfo",
];

/// The kind of a declared entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Class,
    ObjectProperty,
    DataProperty,
    AnnotationProperty,
    NamedIndividual,
    Datatype,
}

impl EntityKind {
    fn from_type(ty: &NamedNode) -> Option<Self> {
        if ty.as_ref() == OWL_CLASS {
            Some(EntityKind::Class)
        } else if ty.as_ref() == OWL_OBJECT_PROPERTY {
            Some(EntityKind::ObjectProperty)
        } else if ty.as_ref() == OWL_DATATYPE_PROPERTY {
            Some(EntityKind::DataProperty)
        } else if ty.as_ref() == OWL_ANNOTATION_PROPERTY {
            Some(EntityKind::AnnotationProperty)
        } else if ty.as_ref() == OWL_NAMED_INDIVIDUAL {
            Some(EntityKind::NamedIndividual)
        } else if ty.as_ref() == RDFS_DATATYPE {
            Some(EntityKind::Datatype)
        } else {
            None
        }
    }
}

/// An atomic logical assertion; the unit of merge and dedup
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Axiom {
    Declaration(EntityKind, NamedNode),
    SubClassOf {
        sub: NamedNode,
        sup: NamedNode,
    },
    EquivalentClasses(NamedNode, NamedNode),
    DisjointClasses(NamedNode, NamedNode),
    SubPropertyOf {
        sub: NamedNode,
        sup: NamedNode,
    },
    Domain {
        property: NamedNode,
        class: NamedNode,
    },
    Range {
        property: NamedNode,
        range: NamedNode,
    },
    ClassAssertion {
        individual: NamedNode,
        class: NamedNode,
    },
    ObjectPropertyAssertion {
        subject: NamedNode,
        property: NamedNode,
        object: NamedNode,
    },
    DataPropertyAssertion {
        subject: NamedNode,
        property: NamedNode,
        value: Literal,
    },
    AnnotationAssertion {
        subject: NamedNode,
        property: NamedNode,
        value: AnnotationValue,
    },
}

/// Value position of an annotation: an IRI or a literal
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AnnotationValue {
    Iri(NamedNode),
    Literal(Literal),
}

impl Axiom {
    /// Key used to order axioms deterministically at serialization time
    pub(crate) fn sort_key(&self) -> (u8, String, String, String) {
        match self {
            Axiom::Declaration(kind, e) => (0, format!("{kind:?}"), e.as_str().into(), String::new()),
            Axiom::SubClassOf { sub, sup } => (1, sub.as_str().into(), sup.as_str().into(), String::new()),
            Axiom::EquivalentClasses(a, b) => (2, a.as_str().into(), b.as_str().into(), String::new()),
            Axiom::DisjointClasses(a, b) => (3, a.as_str().into(), b.as_str().into(), String::new()),
            Axiom::SubPropertyOf { sub, sup } => (4, sub.as_str().into(), sup.as_str().into(), String::new()),
            Axiom::Domain { property, class } => (5, property.as_str().into(), class.as_str().into(), String::new()),
            Axiom::Range { property, range } => (6, property.as_str().into(), range.as_str().into(), String::new()),
            Axiom::ClassAssertion { individual, class } => {
                (7, individual.as_str().into(), class.as_str().into(), String::new())
            }
            Axiom::ObjectPropertyAssertion { subject, property, object } => {
                (8, subject.as_str().into(), property.as_str().into(), object.as_str().into())
            }
            Axiom::DataPropertyAssertion { subject, property, value } => {
                (9, subject.as_str().into(), property.as_str().into(), value.to_string())
            }
            Axiom::AnnotationAssertion { subject, property, value } => {
                (10, subject.as_str().into(), property.as_str().into(), format!("{value:?}"))
            }
        }
    }
}

/// Order the operands of a symmetric axiom by IRI
fn ordered_pair(a: NamedNode, b: NamedNode) -> (NamedNode, NamedNode) {
    if a.as_str() <= b.as_str() {
        (a, b)
    } else {
        (b, a)
    }
}

/// A single in-memory axiom set, grown monotonically by merging documents
#[derive(Debug, Default)]
pub struct Ontology {
    iri: Option<NamedNode>,
    imports: BTreeSet<String>,
    axioms: HashSet<Axiom>,
    kinds: HashMap<NamedNode, EntityKind>,
}

impl Ontology {
    pub fn new() -> Self {
        Self::default()
    }

    /// The ontology IRI, taken from the first `owl:Ontology` header seen
    pub fn iri(&self) -> Option<&NamedNode> {
        self.iri.as_ref()
    }

    /// Imported ontology IRIs, in sorted order
    pub fn imports(&self) -> impl Iterator<Item = &str> {
        self.imports.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.axioms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.axioms.is_empty()
    }

    pub fn insert(&mut self, axiom: Axiom) -> bool {
        if let Axiom::Declaration(kind, entity) = &axiom {
            self.kinds.entry(entity.clone()).or_insert(*kind);
        }
        self.axioms.insert(axiom)
    }

    /// The declared kind of an entity, if any declaration has been merged
    pub fn kind_of(&self, entity: &NamedNode) -> Option<EntityKind> {
        self.kinds.get(entity).copied()
    }

    /// Axioms in a stable order for serialization
    pub fn axioms_sorted(&self) -> Vec<&Axiom> {
        let mut axioms: Vec<&Axiom> = self.axioms.iter().collect();
        axioms.sort_by_key(|a| a.sort_key());
        axioms
    }

    /// Merge the RDF mapping of an ontology document into this axiom set.
    /// Returns the number of statements that fell outside the supported
    /// subset and were skipped.
    pub fn merge_quads(&mut self, quads: &[Quad]) -> usize {
        // Declarations first, so that property kinds known anywhere in the
        // document guide the interpretation of assertions
        for quad in quads {
            if quad.predicate.as_ref() != rdf::TYPE {
                continue;
            }
            let (Subject::NamedNode(subject), Term::NamedNode(ty)) = (&quad.subject, &quad.object)
            else {
                continue;
            };
            if ty.as_ref() == OWL_ONTOLOGY {
                if self.iri.is_none() {
                    self.iri = Some(subject.clone());
                }
            } else if let Some(kind) = EntityKind::from_type(ty) {
                self.insert(Axiom::Declaration(kind, subject.clone()));
            }
        }

        let mut skipped = 0;
        for quad in quads {
            if !self.merge_quad(quad) {
                skipped += 1;
            }
        }
        skipped
    }

    /// Map one RDF statement onto an axiom; false if it has no counterpart
    /// in the supported subset
    fn merge_quad(&mut self, quad: &Quad) -> bool {
        let Subject::NamedNode(subject) = &quad.subject else {
            // Anonymous class expressions and RDF lists are not supported
            return false;
        };
        let subject = subject.clone();
        let predicate = quad.predicate.as_ref();

        if predicate == rdf::TYPE {
            return match &quad.object {
                Term::NamedNode(ty) => {
                    if ty.as_ref() == OWL_ONTOLOGY || EntityKind::from_type(ty).is_some() {
                        true // handled in the declaration pass
                    } else {
                        self.insert(Axiom::ClassAssertion {
                            individual: subject,
                            class: ty.clone(),
                        });
                        true
                    }
                }
                _ => false,
            };
        }
        if predicate == OWL_IMPORTS {
            if let Term::NamedNode(target) = &quad.object {
                self.imports.insert(target.as_str().to_string());
                return true;
            }
            return false;
        }
        if predicate == RDFS_SUB_CLASS_OF {
            if let Term::NamedNode(sup) = &quad.object {
                self.insert(Axiom::SubClassOf {
                    sub: subject,
                    sup: sup.clone(),
                });
                return true;
            }
            return false;
        }
        if predicate == OWL_EQUIVALENT_CLASS {
            if let Term::NamedNode(other) = &quad.object {
                let (a, b) = ordered_pair(subject, other.clone());
                self.insert(Axiom::EquivalentClasses(a, b));
                return true;
            }
            return false;
        }
        if predicate == OWL_DISJOINT_WITH {
            if let Term::NamedNode(other) = &quad.object {
                let (a, b) = ordered_pair(subject, other.clone());
                self.insert(Axiom::DisjointClasses(a, b));
                return true;
            }
            return false;
        }
        if predicate == RDFS_SUB_PROPERTY_OF {
            if let Term::NamedNode(sup) = &quad.object {
                self.insert(Axiom::SubPropertyOf {
                    sub: subject,
                    sup: sup.clone(),
                });
                return true;
            }
            return false;
        }
        if predicate == RDFS_DOMAIN {
            if let Term::NamedNode(class) = &quad.object {
                self.insert(Axiom::Domain {
                    property: subject,
                    class: class.clone(),
                });
                return true;
            }
            return false;
        }
        if predicate == RDFS_RANGE {
            if let Term::NamedNode(range) = &quad.object {
                self.insert(Axiom::Range {
                    property: subject,
                    range: range.clone(),
                });
                return true;
            }
            return false;
        }

        if self.is_annotation_property(&quad.predicate) {
            let value = match &quad.object {
                Term::NamedNode(n) => AnnotationValue::Iri(n.clone()),
                Term::Literal(l) => AnnotationValue::Literal(l.clone()),
                _ => return false,
            };
            self.insert(Axiom::AnnotationAssertion {
                subject,
                property: quad.predicate.clone(),
                value,
            });
            return true;
        }

        // Remaining statements are property assertions; the declared kind of
        // the predicate decides, falling back on the shape of the object
        match (&quad.object, self.kind_of(&quad.predicate)) {
            (Term::Literal(value), Some(EntityKind::DataProperty) | None) => {
                self.insert(Axiom::DataPropertyAssertion {
                    subject,
                    property: quad.predicate.clone(),
                    value: value.clone(),
                });
                true
            }
            (Term::NamedNode(object), Some(EntityKind::ObjectProperty) | None) => {
                self.insert(Axiom::ObjectPropertyAssertion {
                    subject,
                    property: quad.predicate.clone(),
                    object: object.clone(),
                });
                true
            }
            _ => false,
        }
    }

    fn is_annotation_property(&self, property: &NamedNode) -> bool {
        BUILTIN_ANNOTATION_PROPERTIES.contains(&property.as_str())
            || self.kind_of(property) == Some(EntityKind::AnnotationProperty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxrdf::GraphName;

    fn node(iri: &str) -> NamedNode {
        NamedNode::new(iri).unwrap()
    }

    fn quad(s: &str, p: &str, o: Term) -> Quad {
        Quad::new(node(s), node(p), o, GraphName::DefaultGraph)
    }

    fn sample_quads() -> Vec<Quad> {
        vec![
            quad(
                "http://example.org/onto",
                rdf::TYPE.as_str(),
                Term::NamedNode(OWL_ONTOLOGY.into_owned()),
            ),
            quad(
                "http://example.org/A",
                rdf::TYPE.as_str(),
                Term::NamedNode(OWL_CLASS.into_owned()),
            ),
            quad(
                "http://example.org/B",
                rdf::TYPE.as_str(),
                Term::NamedNode(OWL_CLASS.into_owned()),
            ),
            quad(
                "http://example.org/A",
                RDFS_SUB_CLASS_OF.as_str(),
                Term::NamedNode(node("http://example.org/B")),
            ),
            quad(
                "http://example.org/A",
                "http://www.w3.org/2000/01/rdf-schema#label",
                Term::Literal(Literal::new_simple_literal("class A")),
            ),
        ]
    }

    #[test]
    fn test_extraction() {
        let mut ontology = Ontology::new();
        let skipped = ontology.merge_quads(&sample_quads());
        assert_eq!(skipped, 0);
        assert_eq!(ontology.iri().unwrap().as_str(), "http://example.org/onto");
        // 2 declarations + subclass + annotation
        assert_eq!(ontology.len(), 4);
        assert_eq!(
            ontology.kind_of(&node("http://example.org/A")),
            Some(EntityKind::Class)
        );
    }

    #[test]
    fn test_merge_is_idempotent() {
        let mut ontology = Ontology::new();
        ontology.merge_quads(&sample_quads());
        let once = ontology.len();
        ontology.merge_quads(&sample_quads());
        assert_eq!(ontology.len(), once);
    }

    #[test]
    fn test_symmetric_axioms_dedup_regardless_of_direction() {
        let mut ontology = Ontology::new();
        ontology.merge_quads(&[quad(
            "http://example.org/A",
            OWL_EQUIVALENT_CLASS.as_str(),
            Term::NamedNode(node("http://example.org/B")),
        )]);
        ontology.merge_quads(&[quad(
            "http://example.org/B",
            OWL_EQUIVALENT_CLASS.as_str(),
            Term::NamedNode(node("http://example.org/A")),
        )]);
        assert_eq!(ontology.len(), 1);
    }

    #[test]
    fn test_blank_node_subjects_are_skipped() {
        let mut ontology = Ontology::new();
        let skipped = ontology.merge_quads(&[Quad::new(
            oxrdf::BlankNode::default(),
            node(RDFS_SUB_CLASS_OF.as_str()),
            Term::NamedNode(node("http://example.org/B")),
            GraphName::DefaultGraph,
        )]);
        assert_eq!(skipped, 1);
        assert!(ontology.is_empty());
    }

    #[test]
    fn test_property_kind_guides_assertions() {
        let mut ontology = Ontology::new();
        ontology.merge_quads(&[
            quad(
                "http://example.org/p",
                rdf::TYPE.as_str(),
                Term::NamedNode(OWL_OBJECT_PROPERTY.into_owned()),
            ),
            quad(
                "http://example.org/x",
                "http://example.org/p",
                Term::NamedNode(node("http://example.org/y")),
            ),
        ]);
        let axioms = ontology.axioms_sorted();
        assert!(axioms
            .iter()
            .any(|a| matches!(a, Axiom::ObjectPropertyAssertion { .. })));
    }
}
