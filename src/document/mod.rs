//! Normalized driver license / ID card document.
//!
//! Mapping goes through two explicit phases: [`DocumentDraft::from_record`]
//! picks and normalizes values from the parsed elements, leaving anything
//! missing as `None`, then [`DocumentDraft::finalize`] fills the defaults and
//! validates the result.
use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::aamva::{DataElement, ParsedRecord};

pub mod normalize;

pub use normalize::{is_canonical_date, normalize_date, normalize_postal_code, normalize_sex};

/// Confidence assigned to documents when nothing better is known.
pub const DEFAULT_CONFIDENCE: f64 = 0.98;

/// Pathway that produced the raw text of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourcePathway {
    /// Decoded from the PDF417 barcode.
    #[serde(rename = "pdf417")]
    Pdf417,

    /// Read from the card face by OCR followed by a language model.
    #[serde(rename = "ocr+llm")]
    OcrLlm,
}

impl SourcePathway {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf417 => "pdf417",
            Self::OcrLlm => "ocr+llm",
        }
    }
}

impl FromStr for SourcePathway {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pdf417" => Ok(Self::Pdf417),
            "ocr+llm" => Ok(Self::OcrLlm),
            _ => Err(ValidationError::UnknownSource(s.to_owned())),
        }
    }
}

impl fmt::Display for SourcePathway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A document violating a hard schema constraint.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("`rawSource`: unknown source pathway {0:?}")]
    UnknownSource(String),

    #[error("`confidence`: {0} is not within [0, 1]")]
    Confidence(f64),

    #[error("`{field}`: {value:?} is not a YYYY-MM-DD date")]
    Date { field: &'static str, value: String },
}

impl ValidationError {
    /// Name of the offending field, as it appears in JSON.
    pub fn field(&self) -> &'static str {
        match self {
            Self::UnknownSource(_) => "rawSource",
            Self::Confidence(_) => "confidence",
            Self::Date { field, .. } => *field,
        }
    }
}

/// Mapping configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MappingOptions {
    /// Confidence used when the draft does not carry one.
    pub default_confidence: f64,

    /// Copy the raw payload into [`NormalizedDocument::raw_text`].
    pub echo_raw_text: bool,
}

impl Default for MappingOptions {
    fn default() -> Self {
        Self {
            default_confidence: DEFAULT_CONFIDENCE,
            echo_raw_text: true,
        }
    }
}

fn default_confidence() -> f64 {
    DEFAULT_CONFIDENCE
}

/// Canonical driver license / ID card record.
///
/// Mandatory string fields are empty when unknown, never missing. Dates are
/// `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedDocument {
    /// Region code, or the issuer identification number when the region is
    /// unknown.
    #[serde(default)]
    pub jurisdiction: String,

    #[serde(default)]
    pub id_number: String,

    #[serde(default)]
    pub first_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,

    #[serde(default)]
    pub last_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,

    #[serde(default)]
    pub address1: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address2: Option<String>,

    #[serde(default)]
    pub city: String,

    #[serde(default)]
    pub state: String,

    #[serde(default)]
    pub postal_code: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dob: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued_on: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_on: Option<String>,

    #[serde(rename = "class", default, skip_serializing_if = "Option::is_none")]
    pub license_class: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restrictions: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endorsements: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sex: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eye_color: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,

    pub raw_source: SourcePathway,

    /// Raw payload the document was mapped from. Absent when the payload is
    /// empty or echoing is turned off in [`MappingOptions`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,

    #[serde(default = "default_confidence")]
    pub confidence: f64,
}

impl NormalizedDocument {
    /// Checks the hard constraints of the schema.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(ValidationError::Confidence(self.confidence));
        }

        let dates = [
            ("dob", &self.dob),
            ("issuedOn", &self.issued_on),
            ("expiresOn", &self.expires_on),
        ];

        for (field, value) in dates {
            if let Some(value) = value {
                if !is_canonical_date(value) {
                    return Err(ValidationError::Date {
                        field,
                        value: value.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    /// JSON form handed over to storage.
    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// Document fields before defaults are applied.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DocumentDraft {
    pub jurisdiction: Option<String>,
    pub id_number: Option<String>,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub suffix: Option<String>,
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub dob: Option<String>,
    pub issued_on: Option<String>,
    pub expires_on: Option<String>,
    pub license_class: Option<String>,
    pub restrictions: Option<String>,
    pub endorsements: Option<String>,
    pub sex: Option<String>,
    pub eye_color: Option<String>,
    pub height: Option<String>,
    pub raw_text: Option<String>,
    pub confidence: Option<f64>,
}

impl DocumentDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Picks and normalizes the document fields of a parsed record.
    ///
    /// Empty values count as missing.
    pub fn from_record(parsed: &ParsedRecord) -> Self {
        use DataElement::*;

        let value = |element: DataElement| {
            parsed
                .get(element)
                .filter(|v| !v.is_empty())
                .map(str::to_owned)
        };
        let first_of = |elements: &[DataElement]| parsed.first_of(elements).map(str::to_owned);
        let normalized = |element: DataElement, f: fn(&str) -> Option<String>| {
            parsed
                .get(element)
                .and_then(f)
                .filter(|v| !v.is_empty())
        };

        let state = value(AddressJurisdictionCode);

        // The issuer identification number is a registry id, not a region
        // code, but it is the only jurisdiction hint left when `DAJ` is
        // missing.
        let jurisdiction = state.clone().or_else(|| {
            let iin = parsed.issuer_identification_number.clone();
            if iin.is_some() {
                tracing::debug!("jurisdiction taken from the issuer identification number");
            }
            iin
        });

        Self {
            jurisdiction,
            id_number: value(CustomerIdNumber),
            first_name: value(CustomerFirstName),
            middle_name: value(CustomerMiddleName),
            last_name: value(CustomerFamilyName),
            suffix: first_of(&[LegacyNameSuffix, NameSuffix]),
            address1: value(AddressStreet1),
            address2: value(AddressStreet2),
            city: value(AddressCity),
            state,
            postal_code: normalized(AddressPostalCode, normalize_postal_code),
            dob: normalized(DateOfBirth, normalize_date),
            issued_on: normalized(DocumentIssueDate, normalize_date),
            expires_on: normalized(DocumentExpirationDate, normalize_date),
            license_class: first_of(&[VehicleClass, LegacyVehicleClass]),
            restrictions: first_of(&[RestrictionCodes, LegacyRestrictionCodes]),
            endorsements: first_of(&[EndorsementCodes, LegacyEndorsementCodes]),
            sex: normalized(Sex, normalize_sex),
            eye_color: value(EyeColor),
            height: value(Height),
            raw_text: Some(parsed.raw.clone()).filter(|raw| !raw.is_empty()),
            confidence: None,
        }
    }

    /// Fills defaults and validates the document.
    ///
    /// The confidence falls back to `default_confidence` and is clamped to
    /// `[0, 1]`. A NaN confidence is rejected.
    pub fn finalize(
        self,
        source: SourcePathway,
        default_confidence: f64,
    ) -> Result<NormalizedDocument, ValidationError> {
        let confidence = self
            .confidence
            .unwrap_or(default_confidence)
            .clamp(0.0, 1.0);

        let document = NormalizedDocument {
            jurisdiction: self.jurisdiction.unwrap_or_default(),
            id_number: self.id_number.unwrap_or_default(),
            first_name: self.first_name.unwrap_or_default(),
            middle_name: self.middle_name,
            last_name: self.last_name.unwrap_or_default(),
            suffix: self.suffix,
            address1: self.address1.unwrap_or_default(),
            address2: self.address2,
            city: self.city.unwrap_or_default(),
            state: self.state.unwrap_or_default(),
            postal_code: self.postal_code.unwrap_or_default(),
            dob: self.dob,
            issued_on: self.issued_on,
            expires_on: self.expires_on,
            license_class: self.license_class,
            restrictions: self.restrictions,
            endorsements: self.endorsements,
            sex: self.sex,
            eye_color: self.eye_color,
            height: self.height,
            raw_source: source,
            raw_text: self.raw_text,
            confidence,
        };

        if let Err(e) = document.validate() {
            tracing::warn!(field = e.field(), "normalized document failed validation");
            return Err(e);
        }

        Ok(document)
    }
}

/// Maps a parsed record to a normalized document.
///
/// `source_pathway` is the label of the pathway that produced the payload,
/// `"pdf417"` or `"ocr+llm"`.
pub fn map_to_document(
    parsed: &ParsedRecord,
    source_pathway: &str,
) -> Result<NormalizedDocument, ValidationError> {
    let source = source_pathway.parse()?;
    map_to_document_with(parsed, source, &MappingOptions::default())
}

pub fn map_to_document_with(
    parsed: &ParsedRecord,
    source: SourcePathway,
    options: &MappingOptions,
) -> Result<NormalizedDocument, ValidationError> {
    let mut draft = DocumentDraft::from_record(parsed);
    if !options.echo_raw_text {
        draft.raw_text = None;
    }

    draft.finalize(source, options.default_confidence)
}
