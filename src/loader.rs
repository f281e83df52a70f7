//! Reading schemas and edit scripts.
//!
//! Both are plain JSON documents. A schema may come from a file or an
//! HTTP(S) URL and is handed to the builder as read: `$ref` values are kept
//! verbatim and never fetched. Edit scripts are always local files.

use std::io::ErrorKind;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::builder::SchemaBuilder;
use crate::error::LoadError;

#[cfg(feature = "remote")]
use std::time::Duration;

/// How long a remote schema fetch may take before it is abandoned.
#[cfg(feature = "remote")]
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Read a JSON document (schema or edit script) from disk.
///
/// # Errors
///
/// A missing file is `LoadError::FileNotFound`; any other IO failure is
/// `LoadError::ReadError`. Text that does not parse is `LoadError::InvalidJson`.
pub fn load_json(path: &Path) -> Result<Value, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => LoadError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => LoadError::ReadError {
            path: path.to_path_buf(),
            source,
        },
    })?;

    debug!(path = %path.display(), bytes = content.len(), "read document");
    load_json_str(&content)
}

/// Parse a JSON document held in memory. `true` and `false` are valid schemas.
pub fn load_json_str(content: &str) -> Result<Value, LoadError> {
    serde_json::from_str(content).map_err(|source| LoadError::InvalidJson { source })
}

/// Fetch a schema over HTTP(S).
///
/// Requires the `remote` feature (enabled by default). Only the document at
/// `url` is fetched; references inside it stay unresolved.
///
/// # Errors
///
/// Returns `LoadError::NetworkError` when the request fails, the server
/// answers with an error status, or the body is not JSON.
#[cfg(feature = "remote")]
pub fn load_json_url(url: &str) -> Result<Value, LoadError> {
    let network = |source: reqwest::Error| LoadError::NetworkError {
        url: url.to_string(),
        source,
    };

    let schema = reqwest::blocking::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .and_then(|client| client.get(url).send())
        .and_then(|response| response.error_for_status())
        .and_then(|response| response.json())
        .map_err(network)?;

    debug!(url, "fetched schema");
    Ok(schema)
}

/// True for `http://` and `https://` sources.
pub fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Read a schema from a URL or a file path, whichever `source` looks like.
///
/// Without the `remote` feature a URL is reported as a missing file.
pub fn load_json_auto(source: &str) -> Result<Value, LoadError> {
    if !is_url(source) {
        return load_json(Path::new(source));
    }

    #[cfg(feature = "remote")]
    {
        load_json_url(source)
    }
    #[cfg(not(feature = "remote"))]
    {
        Err(LoadError::FileNotFound {
            path: std::path::PathBuf::from(source),
        })
    }
}

/// Read a schema and wrap it in a builder ready for editing.
pub fn load_schema(source: &str) -> Result<SchemaBuilder, LoadError> {
    load_json_auto(source).map(SchemaBuilder::from)
}
