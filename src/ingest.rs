//! Hand-off between the barcode decoder, the mapper and storage.
//!
//! The decoder gives us the text of every barcode it found in an image. The
//! first usable one is parsed, mapped and handed to a [`DocumentSink`]
//! together with the upload metadata.
use std::convert::Infallible;

use serde::{Deserialize, Serialize};

use crate::{
    aamva,
    document::{map_to_document_with, MappingOptions, NormalizedDocument, SourcePathway, ValidationError},
};

const UNKNOWN_MIME_TYPE: &str = "unknown";

/// Metadata of the uploaded file the payload was read from.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadMetadata {
    pub file_key: Option<String>,
    pub mime_type: Option<String>,
}

/// Everything storage receives for one document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredDocument {
    pub file_key: Option<String>,
    pub mime_type: String,
    pub source: SourcePathway,
    pub payload_raw: String,
    pub document: NormalizedDocument,
    pub confidence: f64,
}

/// Storage collaborator.
pub trait DocumentSink {
    /// Opaque identifier of a stored document.
    type Id;

    type Error;

    fn store(&mut self, document: StoredDocument) -> Result<Self::Id, Self::Error>;
}

/// In-memory sink, the id is the index of the document.
impl DocumentSink for Vec<StoredDocument> {
    type Id = usize;
    type Error = Infallible;

    fn store(&mut self, document: StoredDocument) -> Result<usize, Infallible> {
        self.push(document);
        Ok(self.len() - 1)
    }
}

/// Ingestion parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestParameters {
    pub source: SourcePathway,
    pub metadata: UploadMetadata,
    pub options: MappingOptions,
}

impl IngestParameters {
    pub fn new(source: SourcePathway) -> Self {
        Self {
            source,
            metadata: UploadMetadata::default(),
            options: MappingOptions::default(),
        }
    }

    pub fn new_with(source: SourcePathway, metadata: UploadMetadata) -> Self {
        Self {
            source,
            metadata,
            options: MappingOptions::default(),
        }
    }
}

/// A stored document.
#[derive(Debug, Clone, PartialEq)]
pub struct Ingested<I> {
    pub id: I,
    pub document: NormalizedDocument,
}

#[derive(Debug, thiserror::Error)]
pub enum IngestError<E> {
    #[error("no barcode payload found")]
    NoPayload,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("storage failed: {0}")]
    Sink(E),
}

/// First non-empty payload among the decoder's candidates.
pub fn select_payload<I, S>(candidates: I) -> Option<S>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    candidates.into_iter().find(|c| !c.as_ref().is_empty())
}

/// Parses the first usable candidate, maps it and stores the result.
///
/// Errors are returned as they are; nothing is retried.
pub fn ingest<I, S, K>(
    candidates: I,
    params: IngestParameters,
    sink: &mut K,
) -> Result<Ingested<K::Id>, IngestError<K::Error>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    K: DocumentSink,
{
    let payload = select_payload(candidates).ok_or(IngestError::NoPayload)?;
    let parsed = aamva::parse(payload.as_ref());
    let document = map_to_document_with(&parsed, params.source, &params.options)?;

    let stored = StoredDocument {
        file_key: params.metadata.file_key,
        mime_type: params
            .metadata
            .mime_type
            .unwrap_or_else(|| UNKNOWN_MIME_TYPE.to_owned()),
        source: params.source,
        payload_raw: parsed.raw,
        document: document.clone(),
        confidence: document.confidence,
    };

    let id = sink.store(stored).map_err(IngestError::Sink)?;
    tracing::debug!(source = params.source.as_str(), "stored normalized document");

    Ok(Ingested { id, document })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_first_non_empty() {
        assert_eq!(select_payload(["", "DAQ1", "DAQ2"]), Some("DAQ1"));
        assert_eq!(select_payload(Vec::<String>::new()), None);
        assert_eq!(select_payload([""]), None);
    }

    #[test]
    fn ingest_into_vec() {
        let mut sink: Vec<StoredDocument> = Vec::new();
        let metadata = UploadMetadata {
            file_key: Some("back.png".to_owned()),
            mime_type: None,
        };

        let ingested = ingest(
            ["DAQ1\nDAJNY"],
            IngestParameters::new_with(SourcePathway::Pdf417, metadata),
            &mut sink,
        )
        .unwrap();

        assert_eq!(ingested.id, 0);
        assert_eq!(ingested.document.jurisdiction, "NY");
        assert_eq!(sink.len(), 1);
        assert_eq!(sink[0].mime_type, "unknown");
        assert_eq!(sink[0].file_key.as_deref(), Some("back.png"));
        assert_eq!(sink[0].payload_raw, "DAQ1\nDAJNY");
        assert_eq!(sink[0].document, ingested.document);
    }

    #[test]
    fn ingest_without_payload() {
        let mut sink: Vec<StoredDocument> = Vec::new();
        let result = ingest(Vec::<&str>::new(), IngestParameters::new(SourcePathway::Pdf417), &mut sink);
        assert!(matches!(result, Err(IngestError::NoPayload)));
        assert!(sink.is_empty());
    }
}
