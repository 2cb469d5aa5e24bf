use std::{convert::Infallible, result::Result as StdResult};

use axum::{
    Json,
    body::Body,
    extract::{Path, State},
    http::{
        Response, StatusCode,
        header::{CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE, HeaderValue},
    },
};
use bytes::Bytes;
use cubby_common::{data_uri, size::format_size};
use cubby_store::{FileEntry, RegistryError, RegistryRef};
use faststr::FastStr;
use futures::stream::once;
use multer::Multipart;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::{errors::ShareError, http::extractor::PostExtractor};

mod extractor;

#[derive(Clone)]
pub struct ServerState {
    pub registry: RegistryRef,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UploadResult {
    pub fid: String,
    pub code: String,
    pub name: String,
    pub size: u64,
    pub error: String,
}

struct ParseUpload {
    filename: FastStr,
    data: Vec<u8>,
    mime_type: FastStr,
}

pub async fn upload_handler(
    State(state): State<ServerState>,
    extractor: PostExtractor,
) -> Result<Json<UploadResult>, ShareError> {
    let parse_upload = parse_upload(&extractor).await?;
    debug!(
        "parsed upload file -> name: {}, mime_type: {}, data_len: {}",
        parse_upload.filename,
        parse_upload.mime_type,
        parse_upload.data.len()
    );

    let entry = state.registry.put(
        parse_upload.filename,
        parse_upload.mime_type,
        Bytes::from(parse_upload.data),
    )?;
    info!(
        "stored {} ({}) as {} under code {}",
        entry.name,
        format_size(entry.size),
        entry.fid,
        entry.code
    );

    Ok(Json(UploadResult {
        fid: entry.fid.to_string(),
        code: entry.code.to_string(),
        name: entry.name.to_string(),
        size: entry.size,
        error: String::new(),
    }))
}

async fn parse_upload(extractor: &PostExtractor) -> Result<ParseUpload, ShareError> {
    let content_type = extractor
        .headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    let boundary = multer::parse_boundary(content_type)?;

    let stream = once(async move { StdResult::<Bytes, Infallible>::Ok(extractor.body.clone()) });
    let mut mpart = Multipart::new(stream, boundary);

    // first field with a filename wins
    let mut filename = String::new();
    let mut data = vec![];
    let mut post_mtype = String::new();
    while let Ok(Some(field)) = mpart.next_field().await {
        if let Some(name) = field.file_name() {
            if !name.is_empty() {
                filename = name.to_string();
                if let Some(content_type) = field.content_type() {
                    post_mtype.push_str(content_type.type_().as_str());
                    post_mtype.push('/');
                    post_mtype.push_str(content_type.subtype().as_str());
                }
                data.extend(field.bytes().await?);
                break;
            }
        }
    }

    if filename.is_empty() {
        return Err(ShareError::MissingFile);
    }

    // the uploader's content type wins, then an extension guess
    let mime_type = if post_mtype.is_empty() {
        guess_mime_type(&filename)
    } else {
        post_mtype
    };

    Ok(ParseUpload {
        filename: FastStr::new(filename),
        data,
        mime_type: FastStr::new(mime_type),
    })
}

fn guess_mime_type(filename: &str) -> String {
    let mut guess = String::new();
    if let Some(idx) = filename.rfind('.') {
        let m = mime_guess::from_ext(&filename[idx + 1..]).first_or_octet_stream();
        guess.push_str(m.type_().as_str());
        guess.push('/');
        guess.push_str(m.subtype().as_str());
    } else {
        guess.push_str("application/octet-stream");
    }
    guess
}

pub async fn lookup_handler(
    State(state): State<ServerState>,
    Path(code): Path<String>,
) -> Result<Json<Value>, ShareError> {
    let entry = state.registry.get(&code)?;
    Ok(Json(entry_meta(&entry)))
}

fn entry_meta(entry: &FileEntry) -> Value {
    json!({
        "fid": entry.fid.to_string(),
        "code": entry.code.as_str(),
        "name": entry.name,
        "size": entry.size,
        "sizeHuman": format_size(entry.size),
        "mime": entry.mime,
        "createdAt": entry.created_at,
    })
}

pub async fn download_handler(
    State(state): State<ServerState>,
    Path(code): Path<String>,
) -> Result<Response<Body>, ShareError> {
    let entry = state.registry.get(&code)?;
    let (mime, data) = data_uri::decode(&entry.data).map_err(RegistryError::DataUri)?;
    debug!("serving {} bytes for code {}", data.len(), entry.code);

    let mut response = Response::new(Body::empty());
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_str(&mime)?);
    response
        .headers_mut()
        .insert(CONTENT_LENGTH, HeaderValue::from(data.len() as u64));
    response.headers_mut().insert(
        CONTENT_DISPOSITION,
        HeaderValue::from_str(&format!("attachment; filename=\"{}\"", entry.name))?,
    );
    *response.body_mut() = Body::from(data);

    Ok(response)
}

pub async fn status_handler(State(state): State<ServerState>) -> Json<Value> {
    let stat = json!({
        "version": "0.1",
        "files": state.registry.file_count(),
        "storedBytes": state.registry.stored_bytes(),
        "maxFileSize": state.registry.max_file_size(),
    });

    Json(stat)
}

pub async fn default_handler() -> (StatusCode, Json<Value>) {
    let error = json!({
        "error": "no such endpoint"
    });
    (StatusCode::NOT_FOUND, Json(error))
}
