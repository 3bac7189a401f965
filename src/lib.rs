//! This library reads the [AAMVA DL/ID][aamva] payload of a driver license
//! PDF417 barcode and turns it into a normalized document record.
//!
//! [aamva]: <https://www.aamva.org/assets/best-practices,-guides,-standards,-manuals,-whitepapers/aamva-dl-id-card-design-standard-(2020)>
//!
//! Decoding the barcode image itself is left to the caller, as is storing
//! the resulting document (see [`ingest::DocumentSink`]).
//!
//! ```
//! let parsed = aamva_license::parse_aamva("@\nDCSDOE\nDACJOHN\nDBB01012000\nDAJCA\n");
//! let document = aamva_license::map_to_document(&parsed, "pdf417").unwrap();
//! assert_eq!(document.last_name, "DOE");
//! assert_eq!(document.dob.as_deref(), Some("2000-01-01"));
//! ```
pub mod aamva;
pub mod document;
pub mod ingest;

pub use aamva::{parse as parse_aamva, ParsedRecord};
pub use document::{
    map_to_document, map_to_document_with, DocumentDraft, MappingOptions, NormalizedDocument,
    SourcePathway, ValidationError,
};
pub use ingest::{ingest, DocumentSink, IngestError, IngestParameters, StoredDocument};
