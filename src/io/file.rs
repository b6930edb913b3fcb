use std::path::{Path, PathBuf};

use log::info;

use super::{ExportArtifact, ExportError};

/// Write an export to `path`, creating missing parent directories.
pub fn write_artifact(artifact: &ExportArtifact, path: &Path) -> Result<(), ExportError> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(path, &artifact.bytes)?;
    info!("wrote {} bytes to {}", artifact.bytes.len(), path.display());
    Ok(())
}

/// Write an export into `dir` under its own file name.
pub fn write_artifact_in(artifact: &ExportArtifact, dir: &Path) -> Result<PathBuf, ExportError> {
    let path = dir.join(&artifact.file_name);
    write_artifact(artifact, &path)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_bytes_under_the_artifact_name() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = ExportArtifact {
            file_name: "plan.csv".to_string(),
            mime: "text/csv",
            bytes: b"Type,Section\n".to_vec(),
        };
        let path = write_artifact_in(&artifact, &dir.path().join("out")).unwrap();
        assert_eq!(path, dir.path().join("out").join("plan.csv"));
        assert_eq!(std::fs::read(&path).unwrap(), artifact.bytes);
    }
}
