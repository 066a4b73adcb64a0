//! Manifest built from one scan of a container's entry names.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::naming::{self, FileName};

/// The files belonging to one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Metadata code
    pub code: String,

    /// Container entry name of the structural file
    pub structural_file: String,

    /// `(file_code, entry name)` of each content file, by numeric file code
    pub content_files: Vec<(String, String)>,
}

impl ManifestEntry {
    /// Container entry name of the content file with this file code.
    ///
    /// Falls back to the conventional name next to the structural file
    /// when the scan found no such entry.
    pub fn content_file(&self, file_code: &str) -> String {
        self.content_files
            .iter()
            .find(|(code, _)| code == file_code)
            .map(|(_, name)| name.clone())
            .unwrap_or_else(|| {
                format!(
                    "{}{}",
                    naming::parent_prefix(&self.structural_file),
                    naming::content_file_name(&self.code, file_code)
                )
            })
    }

    /// File codes of the discovered content files.
    pub fn file_codes(&self) -> impl Iterator<Item = &str> + '_ {
        self.content_files.iter().map(|(code, _)| code.as_str())
    }
}

/// Mapping from metadata code to the files of that document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    entries: BTreeMap<String, ManifestEntry>,
    codes: Vec<String>,
    orphans: Vec<String>,
}

impl Manifest {
    /// Group entry names by metadata code.
    ///
    /// Names outside the naming convention are ignored. Content files whose
    /// code has no structural file are kept aside as orphans.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut structural: BTreeMap<String, String> = BTreeMap::new();
        let mut content: BTreeMap<String, Vec<(String, String)>> = BTreeMap::new();

        for name in names {
            let name = name.as_ref();
            match FileName::parse(name) {
                Some(FileName::Structural { metadata_code }) => {
                    if let Some(previous) = structural.get(&metadata_code) {
                        log::warn!(
                            "Duplicate structural file {} for {}, keeping {}",
                            name,
                            metadata_code,
                            previous
                        );
                        continue;
                    }
                    structural.insert(metadata_code, name.to_string());
                }
                Some(FileName::Content {
                    metadata_code,
                    file_code,
                }) => content
                    .entry(metadata_code)
                    .or_default()
                    .push((file_code, name.to_string())),
                None => {}
            }
        }

        let mut orphans = Vec::new();
        for (code, files) in &content {
            if !structural.contains_key(code) {
                log::warn!(
                    "Ignoring {} content file(s) for {} without a structural file",
                    files.len(),
                    code
                );
                orphans.extend(files.iter().map(|(_, name)| name.clone()));
            }
        }

        let entries: BTreeMap<String, ManifestEntry> = structural
            .into_iter()
            .map(|(code, structural_file)| {
                let mut content_files = content.remove(&code).unwrap_or_default();
                content_files.sort_by(|a, b| naming::compare_file_codes(&a.0, &b.0));
                let entry = ManifestEntry {
                    code: code.clone(),
                    structural_file,
                    content_files,
                };
                (code, entry)
            })
            .collect();
        let codes = entries.keys().cloned().collect();

        Self {
            entries,
            codes,
            orphans,
        }
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Check if the manifest holds no documents.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Metadata codes in lexicographic order.
    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    /// Entry for a metadata code.
    pub fn get(&self, code: &str) -> Option<&ManifestEntry> {
        self.entries.get(code)
    }

    /// Entry at a position in code order.
    pub fn get_index(&self, index: usize) -> Option<&ManifestEntry> {
        self.codes.get(index).and_then(|code| self.entries.get(code))
    }

    /// Entries in code order.
    pub fn entries(&self) -> impl Iterator<Item = &ManifestEntry> + '_ {
        self.entries.values()
    }

    /// Content files ignored for lack of a structural file.
    pub fn orphans(&self) -> &[String] {
        &self.orphans
    }
}
