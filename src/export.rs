//! YAML output artifact.
//!
//! The whole file is rewritten on every export. Nothing is appended and the
//! format carries no schema version.

use std::fs;
use std::path::Path;

use crate::database::ProjectRecord;
use crate::error::{ExporterError, Result};

/// Render records as a block-style YAML sequence; an empty slice gives `[]`
///
/// Scalars are quoted by YAML 1.2 core schema rules. Values such as `yes`,
/// `on`, `NO` or `1_000` are strings under 1.2 and are emitted plain; a YAML
/// 1.1 reader (PyYAML, for one) resolves them to booleans or integers.
/// Consumers should read the artifact as YAML 1.2 or with string-typed
/// fields.
pub fn render_yaml(records: &[ProjectRecord]) -> Result<String> {
    Ok(serde_yaml::to_string(records)?)
}

/// Overwrite `path` with the YAML rendering of `records`
///
/// The parent directory must already exist.
pub fn write_yaml(path: &Path, records: &[ProjectRecord]) -> Result<()> {
    let rendered = render_yaml(records)?;
    fs::write(path, rendered).map_err(|source| ExporterError::Write {
        path: path.to_path_buf(),
        source,
    })
}
