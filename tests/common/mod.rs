//! Shared fixtures for the integration suites.
#![allow(dead_code)]

use rbsgen::{ProjectIndex, SignatureTable};

/// Builds a module index from in-memory fixture files.
pub fn project(files: &[(&str, &str)]) -> ProjectIndex {
    let mut index = ProjectIndex::default();
    for (path, source) in files {
        index.add_file(path, source).expect("fixture source parses");
    }
    index
}

/// Builds a signature table from YAML fixture text.
pub fn signatures(yaml: &str) -> SignatureTable {
    SignatureTable::from_yaml(yaml).expect("fixture table parses")
}
