//! Tolerant AAMVA DL/ID payload parser.
//!
//! The payload is whatever text a PDF417 decoder (or another extraction
//! pathway) produced. Nothing here fails: missing structure simply leaves
//! the corresponding fields empty.
use serde::Serialize;

pub mod dlid;
pub mod elements;
mod header;

pub use dlid::DataElement;
pub use elements::{ElementMap, ElementTag};
pub use header::FileType;

/// Result of parsing a payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedRecord {
    /// Unmodified input payload.
    pub raw: String,

    /// AAMVA version number, two digits.
    pub version: Option<String>,

    /// Issuer identification number, 4 to 6 digits.
    pub issuer_identification_number: Option<String>,

    pub file_type: Option<FileType>,

    /// Whether an `AAMVA` or `ANSI` header was recognized.
    pub aamva: bool,

    pub elements: ElementMap,
}

impl ParsedRecord {
    pub fn get(&self, element: DataElement) -> Option<&str> {
        self.elements.get_element(element)
    }

    /// First non-empty value among `elements`, in order of precedence.
    pub fn first_of(&self, elements: &[DataElement]) -> Option<&str> {
        self.elements.first_of(elements)
    }

    /// Elements of the record that map to a [`DataElement`], in tag order.
    ///
    /// Jurisdiction-specific (`Z*`) and other unmapped tags are skipped.
    pub fn known_elements(&self) -> impl Iterator<Item = (DataElement, &str)> {
        self.elements
            .iter()
            .filter_map(|(tag, value)| Some((DataElement::from_tag(&tag)?, value)))
    }
}

/// Parses an AAMVA payload.
pub fn parse(payload: &str) -> ParsedRecord {
    let lines = header::split_lines(payload);
    let header = header::Header::detect(&lines, payload);
    let elements = ElementMap::scan(&lines.join("\n"));

    let record = ParsedRecord {
        raw: payload.to_owned(),
        version: header.version,
        issuer_identification_number: header.issuer_id,
        file_type: header.file_type,
        aamva: header.recognized,
        elements,
    };

    tracing::debug!(
        aamva = record.aamva,
        version = record.version.as_deref(),
        file_type = record.file_type.map(|t| t.as_str()),
        elements = record.elements.len(),
        known = record.known_elements().count(),
        "parsed AAMVA payload"
    );

    record
}
