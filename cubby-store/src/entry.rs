use faststr::FastStr;

use crate::{FileId, ShareCode};

/// One uploaded file, held in memory until the process exits.
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub fid: FileId,
    /// Original filename, untrusted.
    pub name: FastStr,
    /// Byte length of the raw content, always equal to the decoded length of
    /// `data`'s payload.
    pub size: u64,
    /// Media type as reported by the uploader. Not verified.
    pub mime: FastStr,
    /// Full content as a `data:<mime>;base64,` uri.
    pub data: FastStr,
    pub code: ShareCode,
    /// Wall-clock milliseconds at upload time.
    pub created_at: u64,
}
