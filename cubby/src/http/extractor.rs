use axum::http::HeaderMap;
use axum_macros::FromRequest;
use bytes::Bytes;

#[derive(Debug, FromRequest)]
pub struct PostExtractor {
    // only the last field can implement `FromRequest`
    // other fields must only implement `FromRequestParts`
    pub headers: HeaderMap,
    pub body: Bytes,
}
