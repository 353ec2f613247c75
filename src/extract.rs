// src/extract.rs

use axum::extract::FromRequest;

use crate::error::AppError;

/// JSON body extractor whose rejections go through `AppError`, so a missing
/// field or a wrong type answers 400 with the usual `{"message"}` body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
