//! Vocabulary definitions for the result record
//!
//! IRIs used to describe the produced artifact towards the coordination
//! service: PROV-O and DCAT terms plus a small module namespace for the
//! location and output links.

use oxrdf::NamedNodeRef;

/// Base namespace of the splice module vocabulary
pub const SPLICE_NS: &str = "http://w3id.org/rdf-splice/vocab#";

/// Shared-storage location of a file
pub const LOCATION: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://w3id.org/rdf-splice/vocab#location");

/// Links a job to the file it produced
pub const OUTPUT: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://w3id.org/rdf-splice/vocab#output");

/// prov:Entity, the type of the produced artifact
pub const PROV_ENTITY: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://www.w3.org/ns/prov#Entity");

/// prov:wasGeneratedBy, links the artifact back to the job
pub const PROV_WAS_GENERATED_BY: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://www.w3.org/ns/prov#wasGeneratedBy");

/// dcat:mediaType, the resolved media type of the artifact
pub const DCAT_MEDIA_TYPE: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://www.w3.org/ns/dcat#mediaType");

/// dcat:byteSize, size of the artifact when determinable
pub const DCAT_BYTE_SIZE: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://www.w3.org/ns/dcat#byteSize");
