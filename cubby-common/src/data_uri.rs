use base64::{Engine as _, engine::general_purpose::STANDARD};
use faststr::FastStr;

const SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

/// Encodes raw bytes as a self-describing `data:<mime>;base64,<payload>`
/// string, directly usable as a downloadable resource.
pub fn encode(mime: &str, data: &[u8]) -> String {
    let mut uri = String::with_capacity(SCHEME.len() + mime.len() + BASE64_MARKER.len());
    uri.push_str(SCHEME);
    uri.push_str(mime);
    uri.push_str(BASE64_MARKER);
    STANDARD.encode_string(data, &mut uri);
    uri
}

/// Decodes a data uri back into its media type and raw bytes.
pub fn decode(uri: &str) -> Result<(FastStr, Vec<u8>), DataUriError> {
    let rest = uri
        .strip_prefix(SCHEME)
        .ok_or(DataUriError::MissingScheme)?;
    let marker = rest
        .find(BASE64_MARKER)
        .ok_or(DataUriError::MissingPayload)?;

    let mime = FastStr::new(&rest[..marker]);
    let data = STANDARD.decode(&rest[marker + BASE64_MARKER.len()..])?;

    Ok((mime, data))
}

#[derive(thiserror::Error, Debug)]
pub enum DataUriError {
    #[error("content is not a data uri")]
    MissingScheme,
    #[error("data uri has no base64 payload")]
    MissingPayload,
    #[error("Base64 decode error: {0}")]
    Decode(#[from] base64::DecodeError),
}
