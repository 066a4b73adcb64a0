//! Fixture builders shared by the integration tests.

#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Structural file declaring `pages` in order, linked through the file section.
pub fn mets(code: &str, pages: &[&str]) -> String {
    let mut files = String::new();
    let mut seen = Vec::new();
    for page in pages {
        if !seen.contains(page) {
            seen.push(*page);
            files.push_str(&format!(
                r#"<mets:file ID="alto{page}"><mets:FLocat LOCTYPE="URL" xlink:href="file://./{code}_{page}.xml"/></mets:file>"#
            ));
        }
    }

    let divs: String = pages
        .iter()
        .enumerate()
        .map(|(i, page)| {
            format!(
                r#"<mets:div ID="phys{n}" TYPE="page" ORDER="{n}"><mets:fptr FILEID="alto{page}"/></mets:div>"#,
                n = i + 1
            )
        })
        .collect();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<mets:mets xmlns:mets="http://www.loc.gov/METS/" xmlns:mods="http://www.loc.gov/mods/v3" xmlns:xlink="http://www.w3.org/1999/xlink">
  <mets:dmdSec ID="dmd1"><mets:mdWrap><mets:xmlData><mods:mods>
    <mods:titleInfo><mods:title>Issue {code}</mods:title></mods:titleInfo>
    <mods:originInfo><mods:dateIssued>1870-09-01</mods:dateIssued></mods:originInfo>
  </mods:mods></mets:xmlData></mets:mdWrap></mets:dmdSec>
  <mets:fileSec><mets:fileGrp USE="alto">{files}</mets:fileGrp></mets:fileSec>
  <mets:structMap TYPE="PHYSICAL"><mets:div TYPE="issue">{divs}</mets:div></mets:structMap>
</mets:mets>
"#
    )
}

/// Content file with one text block per `(id, words)` entry of `blocks`,
/// words separated by spaces.
pub fn alto(blocks: &[(&str, &str)]) -> String {
    let body: String = blocks
        .iter()
        .map(|(id, words)| {
            let strings: String = words
                .split_whitespace()
                .enumerate()
                .map(|(i, word)| {
                    format!(
                        r#"<String CONTENT="{word}" HPOS="{x}" VPOS="10" WIDTH="40" HEIGHT="20" WC="0.9"/>"#,
                        x = i * 50
                    )
                })
                .collect();
            format!(r#"<TextBlock ID="{id}"><TextLine>{strings}</TextLine></TextBlock>"#)
        })
        .collect();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<alto xmlns="http://www.loc.gov/standards/alto/ns-v2#"><Layout>
  <Page ID="P1" WIDTH="3000" HEIGHT="4000"><PrintSpace>{body}</PrintSpace></Page>
</Layout></alto>
"#
    )
}

/// Write `(name, contents)` files into a directory.
pub fn write_dir(dir: &Path, files: &[(String, String)]) {
    for (name, contents) in files {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, contents).unwrap();
    }
}

/// Write `(name, contents)` entries into a ZIP file.
pub fn write_zip(path: &Path, files: &[(String, String)]) {
    let file = File::create(path).unwrap();
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    for (name, contents) in files {
        writer.start_file(name.as_str(), options).unwrap();
        writer.write_all(contents.as_bytes()).unwrap();
    }
    writer.finish().unwrap();
}

/// Three single-page documents, plus an orphan and an unrelated file.
pub fn three_documents() -> Vec<(String, String)> {
    let mut files = Vec::new();
    for (code, word) in [("0003_0001", "third"), ("0001_0001", "first"), ("0002_0001", "second")] {
        files.push((format!("{code}_mets.xml"), mets(code, &["0001"])));
        files.push((format!("{code}_0001.xml"), alto(&[("TB1", word)])));
    }
    files.push(("0009_0009_0001.xml".to_string(), alto(&[("TB1", "orphan")])));
    files.push(("README.txt".to_string(), "not part of the archive".to_string()));
    files
}
