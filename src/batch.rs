//! Batch boundary.
//!
//! Discovers Ruby sources under the configured input directories, runs the
//! per-file generator, and mirrors non-empty results into the output tree
//! (`<output>/<input-dir-name>/<relative path>.rbs`). A file whose
//! synthesis fails is logged and skipped; the batch itself only fails on
//! environmental problems (an unloadable signature table, an unwritable
//! output tree).

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::errors::{Error, Result};
use crate::gen::Generator;
use crate::model::ProjectIndex;
use crate::sig::SignatureTable;

#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub output_root: PathBuf,
    pub inputs: Vec<PathBuf>,
    pub signatures: Option<PathBuf>,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub written: usize,
    pub empty: usize,
    pub failed: usize,
}

/// Runs generation over every input directory.
pub fn generate_all(config: &BatchConfig) -> Result<Summary> {
    let index = ProjectIndex::scan_dirs(&config.inputs);
    let signatures = match &config.signatures {
        Some(path) => SignatureTable::load(path)?,
        None => SignatureTable::default(),
    };
    let generator = Generator::new(&index, &signatures);

    let mut summary = Summary::default();
    for dir in &config.inputs {
        for path in ruby_files(dir) {
            match generator.generate_file(&path) {
                Ok(Some(document)) => {
                    let target = output_path(&config.output_root, dir, &path);
                    if let Some(parent) = target.parent() {
                        fs::create_dir_all(parent)
                            .map_err(|source| Error::write(parent.display().to_string(), source))?;
                    }
                    fs::write(&target, document)
                        .map_err(|source| Error::write(target.display().to_string(), source))?;
                    info!(source = %path.display(), target = %target.display(), "wrote signatures");
                    summary.written += 1;
                }
                Ok(None) => {
                    debug!(source = %path.display(), "nothing to emit");
                    summary.empty += 1;
                }
                Err(error) => {
                    warn!(source = %path.display(), %error, "signature synthesis failed");
                    summary.failed += 1;
                }
            }
        }
    }
    Ok(summary)
}

/// Deletes the generated output tree.
pub fn clean(output_root: &Path) -> Result<()> {
    if output_root.exists() {
        fs::remove_dir_all(output_root)
            .map_err(|source| Error::write(output_root.display().to_string(), source))?;
    }
    Ok(())
}

fn ruby_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().map(|ext| ext == "rb").unwrap_or(false))
        .collect()
}

fn output_path(root: &Path, input_dir: &Path, file: &Path) -> PathBuf {
    let relative = file.strip_prefix(input_dir).unwrap_or(file);
    let base = input_dir.file_name().map(PathBuf::from).unwrap_or_default();
    root.join(base).join(relative).with_extension("rbs")
}
