mod common;

use aamva_license::{
    ingest,
    ingest::{select_payload, DocumentSink, UploadMetadata},
    IngestError, IngestParameters, SourcePathway, StoredDocument,
};
use common::*;

/// Sink refusing everything, standing in for an unavailable database.
struct UnavailableStorage;

#[derive(Debug, PartialEq, thiserror::Error)]
#[error("storage unavailable")]
struct Unavailable;

impl DocumentSink for UnavailableStorage {
    type Id = u64;
    type Error = Unavailable;

    fn store(&mut self, _document: StoredDocument) -> Result<u64, Unavailable> {
        Err(Unavailable)
    }
}

#[test]
fn ingest_first_candidate() {
    let california = load_payload("tests/aamva/california.txt");
    let legacy = load_payload("tests/aamva/legacy.txt");
    let candidates = vec![String::new(), california.clone(), legacy];

    assert_eq!(select_payload(candidates.iter()), Some(&california));

    let mut storage: Vec<StoredDocument> = Vec::new();
    let metadata = UploadMetadata {
        file_key: None,
        mime_type: Some("image/png".to_owned()),
    };
    let ingested = ingest(
        candidates,
        IngestParameters::new_with(SourcePathway::Pdf417, metadata),
        &mut storage,
    )
    .unwrap();

    assert_eq!(ingested.id, 0);
    assert_eq!(ingested.document.last_name, "SMITH");

    let stored = &storage[0];
    assert_eq!(stored.mime_type, "image/png");
    assert_eq!(stored.source, SourcePathway::Pdf417);
    assert_eq!(stored.payload_raw, california);
    assert_eq!(stored.confidence, 0.98);
}

#[test]
fn storage_error_is_surfaced() {
    let result = ingest(
        ["DAQ1"],
        IngestParameters::new(SourcePathway::Pdf417),
        &mut UnavailableStorage,
    );

    match result {
        Err(IngestError::Sink(e)) => assert_eq!(e, Unavailable),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn validation_error_is_surfaced() {
    let mut params = IngestParameters::new(SourcePathway::Pdf417);
    params.options.default_confidence = f64::NAN;

    let mut storage: Vec<StoredDocument> = Vec::new();
    let result = ingest(["DAQ1"], params, &mut storage);

    match result {
        Err(IngestError::Validation(e)) => assert_eq!(e.field(), "confidence"),
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(storage.is_empty());
}

#[test]
fn nothing_decoded() {
    let mut storage: Vec<StoredDocument> = Vec::new();
    let result = ingest(["", ""], IngestParameters::new(SourcePathway::Pdf417), &mut storage);
    assert!(matches!(result, Err(IngestError::NoPayload)));
}
