//! Integration tests for archive discovery and document navigation.

mod common;

use common::{alto, mets, three_documents, write_dir, write_zip};
use unalto::{Archive, DocumentHandle, Error, ErrorKind, ParseOptions};

fn three_document_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_dir(dir.path(), &three_documents());
    dir
}

#[test]
fn test_len_counts_structural_files() {
    let dir = three_document_dir();
    let archive = Archive::open(dir.path()).unwrap();

    assert_eq!(archive.len(), 3);
    assert!(!archive.is_empty());
    assert_eq!(archive.manifest().orphans(), ["0009_0009_0001.xml"]);
    assert!(archive.contains("0002_0001"));
    assert!(!archive.contains("0009_0009"));
}

#[test]
fn test_codes_are_sorted_and_stable() {
    let dir = three_document_dir();
    let archive = Archive::open(dir.path()).unwrap();

    let first: Vec<_> = (0..archive.len())
        .map(|i| archive.get(i).unwrap().code().to_string())
        .collect();
    let second: Vec<_> = archive.iter().map(|doc| doc.code().to_string()).collect();

    assert_eq!(first, ["0001_0001", "0002_0001", "0003_0001"]);
    assert_eq!(first, second);
    assert_eq!(archive.codes(), first.as_slice());

    let reopened = Archive::open(dir.path()).unwrap();
    assert_eq!(reopened.codes(), archive.codes());
}

#[test]
fn test_slice_never_fails() {
    let dir = three_document_dir();
    let archive = Archive::open(dir.path()).unwrap();

    assert_eq!(archive.slice(0..1_000_000_000).count(), 3);
    assert_eq!(archive.slice(1..).len(), 2);
    assert_eq!(archive.slice(5..10).count(), 0);
    let codes: Vec<_> = archive.slice(..2).rev().map(|d| d.code().to_string()).collect();
    assert_eq!(codes, ["0002_0001", "0001_0001"]);
}

#[test]
fn test_iteration_is_restartable() {
    let dir = three_document_dir();
    let archive = Archive::open(dir.path()).unwrap();

    let mut titles = Vec::new();
    for document in &archive {
        titles.push(document.metadata().unwrap().title.clone().unwrap());
    }
    assert_eq!(titles, ["Issue 0001_0001", "Issue 0002_0001", "Issue 0003_0001"]);
    assert_eq!((&archive).into_iter().count(), 3);
}

#[test]
fn test_index_out_of_range() {
    let dir = three_document_dir();
    let archive = Archive::open(dir.path()).unwrap();

    let err = archive.get(3).unwrap_err();
    assert!(matches!(err, Error::IndexOutOfRange { index: 3, len: 3 }));
    assert_eq!(err.kind(), ErrorKind::Range);
    assert!(archive.document_handle(3).is_err());
}

#[test]
fn test_unknown_document_code() {
    let dir = three_document_dir();
    let archive = Archive::open(dir.path()).unwrap();

    let err = archive.document("0009_0009").unwrap_err();
    assert!(matches!(err, Error::UnknownDocumentCode(_)));
    assert!(err.is_not_found());
}

#[test]
fn test_open_errors() {
    let dir = tempfile::tempdir().unwrap();

    let err = Archive::open(dir.path().join("missing")).unwrap_err();
    assert!(matches!(err, Error::ArchiveNotFound(_)));

    let text = dir.path().join("notes.txt");
    std::fs::write(&text, "plain text").unwrap();
    let err = Archive::open(&text).unwrap_err();
    assert!(matches!(err, Error::UnsupportedContainer(_)));

    let err = Archive::open(dir.path()).unwrap_err();
    assert!(matches!(err, Error::EmptyArchive(_)));
}

#[test]
fn test_page_order_preserves_duplicates() {
    let dir = tempfile::tempdir().unwrap();
    write_dir(
        dir.path(),
        &[
            ("0001_0001_mets.xml".into(), mets("0001_0001", &["0002", "0001", "0002"])),
            ("0001_0001_0001.xml".into(), alto(&[("TB1", "alpha")])),
            ("0001_0001_0002.xml".into(), alto(&[("TB1", "beta")])),
        ],
    );
    let archive = Archive::open(dir.path()).unwrap();
    let document = archive.get(0).unwrap();

    let codes: Vec<_> = document.pages().unwrap().iter().map(|p| p.code()).collect();
    assert_eq!(codes, ["0002", "0001", "0002"]);
    let words: Vec<_> = document.textblocks().map(|r| r.unwrap().1.content()).collect();
    assert_eq!(words, ["beta", "alpha", "beta"]);
}

#[test]
fn test_missing_page_degrades_to_empty() {
    let dir = tempfile::tempdir().unwrap();
    write_dir(
        dir.path(),
        &[
            ("0001_0001_mets.xml".into(), mets("0001_0001", &["0001", "0002"])),
            ("0001_0001_0002.xml".into(), alto(&[("TB1", "present")])),
        ],
    );
    let archive = Archive::open(dir.path()).unwrap();
    let document = archive.get(0).unwrap();

    let missing = document.page(0).unwrap();
    assert!(missing.textblocks().unwrap().is_empty());
    assert!(missing.areas().unwrap().is_empty());
    assert_eq!(document.words().unwrap(), ["present"]);
}

#[test]
fn test_malformed_page_is_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    write_dir(
        dir.path(),
        &[
            ("0001_0001_mets.xml".into(), mets("0001_0001", &["0001"])),
            ("0001_0001_0001.xml".into(), "<alto><Layout><Page>".into()),
        ],
    );
    let archive = Archive::open(dir.path()).unwrap();
    let document = archive.get(0).unwrap();

    let err = document.page(0).unwrap().textblocks().unwrap_err();
    assert!(matches!(err, Error::PageParse { .. }));
    assert_eq!(err.kind(), ErrorKind::Parse);
}

#[test]
fn test_structural_errors_are_lazy() {
    let dir = tempfile::tempdir().unwrap();
    write_dir(
        dir.path(),
        &[
            ("0001_0001_mets.xml".into(), "<mets:mets xmlns:mets=\"m\">".into()),
            ("0002_0001_mets.xml".into(), "<mets/>".into()),
        ],
    );
    let archive = Archive::open(dir.path()).unwrap();

    let broken = archive.get(0).unwrap();
    assert!(matches!(broken.pages(), Err(Error::StructuralParse { .. })));

    let unordered = archive.get(1).unwrap();
    let err = unordered.metadata().unwrap_err();
    assert!(matches!(err, Error::MissingPageOrder(_)));
    assert_eq!(err.kind(), ErrorKind::Structure);
}

#[test]
fn test_self_referencing_area_is_structure_error() {
    let page = r#"<alto><Layout><Page><PrintSpace>
        <ComposedBlock ID="CB1"><ComposedBlock ID="CB1"><TextBlock ID="TB1"/></ComposedBlock></ComposedBlock>
    </PrintSpace></Page></Layout></alto>"#;
    let dir = tempfile::tempdir().unwrap();
    write_dir(
        dir.path(),
        &[
            ("0001_0001_mets.xml".into(), mets("0001_0001", &["0001"])),
            ("0001_0001_0001.xml".into(), page.into()),
        ],
    );
    let archive = Archive::open(dir.path()).unwrap();
    let document = archive.get(0).unwrap();

    let err = document.page(0).unwrap().areas().unwrap_err();
    assert!(matches!(err, Error::MalformedStructure(_)));
    assert_eq!(err.kind(), ErrorKind::Structure);
}

#[test]
fn test_zip_matches_directory() {
    let dir = three_document_dir();
    let zip_dir = tempfile::tempdir().unwrap();
    let zip_path = zip_dir.path().join("archive.zip");
    write_zip(&zip_path, &three_documents());

    let from_dir = Archive::open(dir.path()).unwrap();
    let from_zip = Archive::open(&zip_path).unwrap();

    assert_eq!(from_zip.manifest(), from_dir.manifest());
    for (a, b) in from_dir.iter().zip(from_zip.iter()) {
        assert_eq!(a.content().unwrap(), b.content().unwrap());
    }
}

#[test]
fn test_zip_with_folders() {
    let files: Vec<_> = three_documents()
        .into_iter()
        .map(|(name, contents)| (format!("batch/{name}"), contents))
        .collect();
    let dir = tempfile::tempdir().unwrap();
    let zip_path = dir.path().join("archive.zip");
    write_zip(&zip_path, &files);

    let archive = Archive::open(&zip_path).unwrap();
    assert_eq!(archive.len(), 3);
    let document = archive.document("0002_0001").unwrap();
    assert_eq!(document.structural_file(), "batch/0002_0001_mets.xml");
    assert_eq!(document.page(0).unwrap().file_name(), "batch/0002_0001_0001.xml");
    assert_eq!(document.content().unwrap(), "second");
}

#[test]
fn test_handles_reopen_documents() {
    let dir = three_document_dir();
    let archive = Archive::open_with_options(dir.path(), ParseOptions::new().sequential()).unwrap();

    let handle = archive.document_handle(1).unwrap();
    let json = serde_json::to_string(&handle).unwrap();
    let restored: DocumentHandle = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, handle);

    let document = restored.open().unwrap();
    assert_eq!(document.code(), "0002_0001");
    assert_eq!(document.content().unwrap(), "second");
    assert_eq!(document.handle(), handle);

    let again = restored.open_in(&archive).unwrap();
    assert_eq!(again.year().unwrap(), Some(1870));

    let reopened = archive.handle().open().unwrap();
    assert_eq!(reopened.options(), archive.options());
    assert_eq!(reopened.len(), 3);
}

#[test]
fn test_documents_are_independent() {
    let dir = three_document_dir();
    let archive = Archive::open(dir.path()).unwrap();

    let first = archive.document("0001_0001").unwrap();
    assert_eq!(first.content().unwrap(), "first");

    std::fs::write(
        dir.path().join("0001_0001_0001.xml"),
        alto(&[("TB1", "rewritten")]),
    )
    .unwrap();

    assert_eq!(first.content().unwrap(), "first");
    let fresh = archive.document("0001_0001").unwrap();
    assert_eq!(fresh.content().unwrap(), "rewritten");
}
