use axum::extract::FromRequest;

use crate::server::ApiError;

/// JSON body extractor whose rejections render as `ApiError` (400 with
/// `{success: false, error}`) instead of axum's plain-text 4xx responses.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);
