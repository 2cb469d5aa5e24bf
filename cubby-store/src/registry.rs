use std::sync::Arc;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use cubby_common::{
    data_uri::{self, DataUriError},
    size::format_size,
    time,
};
use dashmap::DashMap;
use faststr::FastStr;
use serde_json::json;
use tracing::debug;

use crate::{CodeError, FileEntry, MemorySequencer, ShareCode};

/// Bounded attempts at drawing a share code that is not already in use.
pub const MAX_CODE_ATTEMPTS: usize = 10;

pub type RegistryRef = Arc<Registry>;

/// In-memory mapping from share code to stored file. Entries are never
/// evicted; the registry lives and dies with the process.
pub struct Registry {
    files: DashMap<FastStr, FileEntry>,
    sequencer: MemorySequencer,
    max_file_size: u64,
}

impl Registry {
    pub fn new(max_file_size: u64) -> Registry {
        Registry {
            files: DashMap::new(),
            sequencer: MemorySequencer::new(),
            max_file_size,
        }
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    /// Stores one uploaded file and returns the record, share code included.
    ///
    /// The size gate runs before anything else; a rejected upload leaves the
    /// registry untouched. Insertion itself is a single map write.
    pub fn put(
        &self,
        name: FastStr,
        mime: FastStr,
        data: Bytes,
    ) -> Result<FileEntry, RegistryError> {
        let size = data.len() as u64;
        if size > self.max_file_size {
            return Err(RegistryError::SizeExceeded {
                size,
                limit: self.max_file_size,
            });
        }

        let code = self.unused_code()?;
        let entry = FileEntry {
            fid: self.sequencer.next_file_id(),
            name,
            size,
            mime: mime.clone(),
            data: FastStr::new(data_uri::encode(&mime, &data)),
            code: code.clone(),
            created_at: time::now_millis(),
        };
        debug!("storing {} byte entry {} under {code}", size, entry.fid);

        self.files.insert(code.to_fast_str(), entry.clone());
        Ok(entry)
    }

    /// Case-insensitive lookup. Pure read, no side effects.
    pub fn get(&self, code: &str) -> Result<FileEntry, RegistryError> {
        let code = ShareCode::normalize(code)?;
        match self.files.get(&code.to_fast_str()) {
            Some(entry) => Ok(entry.clone()),
            None => Err(RegistryError::NotFound(code.to_fast_str())),
        }
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Total bytes of encoded content currently held.
    pub fn stored_bytes(&self) -> u64 {
        self.files
            .iter()
            .map(|entry| entry.data.len() as u64)
            .sum()
    }

    fn unused_code(&self) -> Result<ShareCode, RegistryError> {
        for _ in 0..MAX_CODE_ATTEMPTS {
            let code = ShareCode::generate();
            if !self.files.contains_key(&code.to_fast_str()) {
                return Ok(code);
            }
        }
        Err(RegistryError::CodeExhausted(MAX_CODE_ATTEMPTS))
    }
}

#[derive(thiserror::Error, Debug)]
pub enum RegistryError {
    #[error(
        "File size exceeds the {} limit. Your file is {}.",
        format_size(*.limit),
        format_size(*.size)
    )]
    SizeExceeded { size: u64, limit: u64 },
    #[error("No file found for code {0}. Check the code and try again.")]
    NotFound(FastStr),
    #[error("no unused share code after {0} attempts")]
    CodeExhausted(usize),
    #[error("Share code error: {0}")]
    Code(#[from] CodeError),
    #[error("Data uri error: {0}")]
    DataUri(#[from] DataUriError),
}

impl IntoResponse for RegistryError {
    fn into_response(self) -> Response {
        let status = match &self {
            RegistryError::SizeExceeded { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            RegistryError::NotFound(_) => StatusCode::NOT_FOUND,
            RegistryError::DataUri(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        };
        let error = json!({
            "error": self.to_string()
        });
        (status, Json(error)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use cubby_common::{data_uri, size::DEFAULT_MAX_FILE_SIZE};
    use faststr::FastStr;

    use crate::{CODE_LENGTH, Registry, registry::RegistryError};

    fn registry() -> Registry {
        Registry::new(DEFAULT_MAX_FILE_SIZE)
    }

    #[test]
    pub fn test_put_then_get_roundtrip() {
        let registry = registry();
        let stored = registry
            .put(
                FastStr::new("a.txt"),
                FastStr::new("text/plain"),
                Bytes::from_static(b"0123456789"),
            )
            .unwrap();

        assert_eq!(stored.code.as_str().len(), CODE_LENGTH);
        assert_eq!(stored.size, 10);

        let found = registry.get(stored.code.as_str()).unwrap();
        assert_eq!(found.fid, stored.fid);
        assert_eq!(found.name, "a.txt");
        assert_eq!(found.size, 10);
        assert_eq!(found.mime, "text/plain");

        let (mime, data) = data_uri::decode(&found.data).unwrap();
        assert_eq!(mime, "text/plain");
        assert_eq!(data, b"0123456789");
    }

    #[test]
    pub fn test_get_is_case_insensitive() {
        let registry = registry();
        let stored = registry
            .put(
                FastStr::new("a.txt"),
                FastStr::new("text/plain"),
                Bytes::from_static(b"case"),
            )
            .unwrap();

        let lowered = stored.code.as_str().to_lowercase();
        let found = registry.get(&lowered).unwrap();
        assert_eq!(found.fid, stored.fid);
    }

    #[test]
    pub fn test_get_unknown_code() {
        let registry = registry();
        assert!(matches!(
            registry.get("ZZZZZZ"),
            Err(RegistryError::NotFound(_))
        ));
        assert_eq!(registry.file_count(), 0);

        // malformed input is rejected before lookup
        assert!(matches!(
            registry.get("nope"),
            Err(RegistryError::Code(_))
        ));
    }

    #[test]
    pub fn test_size_boundary() {
        let registry = registry();

        let at_limit = Bytes::from(vec![0u8; DEFAULT_MAX_FILE_SIZE as usize]);
        assert!(registry
            .put(FastStr::new("big.bin"), FastStr::new("application/octet-stream"), at_limit)
            .is_ok());

        let over_limit = Bytes::from(vec![0u8; DEFAULT_MAX_FILE_SIZE as usize + 1]);
        let err = registry
            .put(
                FastStr::new("too-big.bin"),
                FastStr::new("application/octet-stream"),
                over_limit,
            )
            .unwrap_err();
        assert!(matches!(err, RegistryError::SizeExceeded { .. }));
        assert_eq!(
            err.to_string(),
            "File size exceeds the 50 MB limit. Your file is 50 MB."
        );

        // the rejected upload left no partial state behind
        assert_eq!(registry.file_count(), 1);
    }

    #[test]
    pub fn test_small_limit_message() {
        let registry = Registry::new(1024);
        let err = registry
            .put(
                FastStr::new("b.bin"),
                FastStr::new("application/octet-stream"),
                Bytes::from(vec![0u8; 1536]),
            )
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "File size exceeds the 1 KB limit. Your file is 1.5 KB."
        );
        assert_eq!(registry.file_count(), 0);
    }

    #[test]
    pub fn test_codes_remain_distinct() {
        let registry = registry();
        for i in 0..64 {
            let stored = registry
                .put(
                    FastStr::new(format!("file-{i}.txt")),
                    FastStr::new("text/plain"),
                    Bytes::from(format!("payload {i}")),
                )
                .unwrap();
            let found = registry.get(stored.code.as_str()).unwrap();
            assert_eq!(found.size, stored.size);
        }
        assert_eq!(registry.file_count(), 64);
    }
}
