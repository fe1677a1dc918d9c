use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

/// Largest job description file accepted.
pub const MAX_JOB_FILE_BYTES: u64 = 1024 * 1024;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("Please provide {0}")]
    Missing(&'static str),

    #[error("Please upload a text (.txt) file")]
    NotPlainText(PathBuf),

    #[error("File too large. Please upload a file smaller than 1MB")]
    TooLarge { path: PathBuf, bytes: u64 },

    #[error("Error reading file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// `@path` reads the file at `path`; anything else is taken literally.
pub async fn read_text_arg(value: &str) -> Result<String, InputError> {
    match value.strip_prefix('@') {
        Some(path) => {
            let path = Path::new(path);
            debug!("Reading input from {}", path.display());
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| InputError::Read {
                    path: path.to_path_buf(),
                    source,
                })
        }
        None => Ok(value.to_string()),
    }
}

/// Loads a job description upload: plain text only, at most 1 MiB.
pub async fn load_job_description(path: &Path) -> Result<String, InputError> {
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    if mime != mime_guess::mime::TEXT_PLAIN {
        return Err(InputError::NotPlainText(path.to_path_buf()));
    }

    let read_err = |source: std::io::Error| InputError::Read {
        path: path.to_path_buf(),
        source,
    };
    let bytes = tokio::fs::metadata(path).await.map_err(read_err)?.len();
    if bytes > MAX_JOB_FILE_BYTES {
        return Err(InputError::TooLarge {
            path: path.to_path_buf(),
            bytes,
        });
    }

    let content = tokio::fs::read_to_string(path).await.map_err(read_err)?;
    info!("Successfully uploaded: {}", file_name(path));
    Ok(content)
}

/// Rejects blank text before anything goes over the network.
pub fn require_text<'a>(field: &'static str, value: &'a str) -> Result<&'a str, InputError> {
    if value.trim().is_empty() {
        Err(InputError::Missing(field))
    } else {
        Ok(value)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
