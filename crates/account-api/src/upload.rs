//! In-memory multipart bodies for file uploads.

use std::path::Path;

use reqwest::multipart::{Form, Part};

use crate::error::ErrorKind;

/// Form field the store expects uploaded files under.
const FILE_FIELD: &str = "file";

/// Reads a file completely, returning its base name and contents.
///
/// The file handle is closed before this returns.
pub(crate) async fn read_upload(path: &Path) -> Result<(String, Vec<u8>), ErrorKind> {
    let data = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok((file_name, data))
}

/// Builds a single-file multipart form.
///
/// `reqwest` sets the `multipart/form-data; boundary=...` content type
/// when the form is attached to a request.
pub(crate) fn file_form(file_name: String, data: Vec<u8>) -> Result<Form, ErrorKind> {
    let part = Part::bytes(data)
        .file_name(file_name)
        .mime_str("application/octet-stream")?;
    Ok(Form::new().part(FILE_FIELD, part))
}
