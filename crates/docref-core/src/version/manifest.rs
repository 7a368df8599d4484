//! Read the documented package's version from its manifest.

use camino::Utf8Path;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::version::{VersionError, VersionResult};

#[derive(Deserialize)]
struct PackageManifest {
    version: Option<String>,
}

/// Read the `version` field of a `package.json`-style manifest.
///
/// Only the field's presence is checked. The value is returned as written
/// so the best-effort range formatter sees exactly what the package
/// declares.
#[instrument]
pub fn read_version(path: &Utf8Path) -> VersionResult<String> {
    let raw = std::fs::read_to_string(path).map_err(|source| VersionError::ReadManifest {
        path: path.to_string(),
        source,
    })?;
    let manifest: PackageManifest =
        serde_json::from_str(&raw).map_err(|source| VersionError::ParseManifest {
            path: path.to_string(),
            source,
        })?;
    let version = manifest
        .version
        .filter(|v| !v.is_empty())
        .ok_or_else(|| VersionError::MissingVersion {
            path: path.to_string(),
        })?;
    debug!(%version, "manifest version");
    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    fn manifest(tmp: &TempDir, body: &str) -> Utf8PathBuf {
        let path = tmp.path().join("package.json");
        std::fs::write(&path, body).unwrap();
        Utf8PathBuf::try_from(path).unwrap()
    }

    #[test]
    fn reads_version_field() {
        let tmp = TempDir::new().unwrap();
        let path = manifest(&tmp, r#"{"name": "frames.js", "version": "0.19.2"}"#);
        assert_eq!(read_version(&path).unwrap(), "0.19.2");
    }

    #[test]
    fn missing_file_is_read_error() {
        let tmp = TempDir::new().unwrap();
        let path = Utf8PathBuf::try_from(tmp.path().join("nope.json")).unwrap();
        assert!(matches!(
            read_version(&path),
            Err(VersionError::ReadManifest { .. })
        ));
    }

    #[test]
    fn invalid_json_is_parse_error() {
        let tmp = TempDir::new().unwrap();
        let path = manifest(&tmp, "{ not json");
        assert!(matches!(
            read_version(&path),
            Err(VersionError::ParseManifest { .. })
        ));
    }

    #[test]
    fn absent_or_empty_version_is_missing() {
        let tmp = TempDir::new().unwrap();
        let path = manifest(&tmp, r#"{"name": "x"}"#);
        assert!(matches!(
            read_version(&path),
            Err(VersionError::MissingVersion { .. })
        ));

        let path = manifest(&tmp, r#"{"version": ""}"#);
        assert!(matches!(
            read_version(&path),
            Err(VersionError::MissingVersion { .. })
        ));
    }
}
