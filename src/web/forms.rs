use axum::extract::multipart::{Field, MultipartError};
use axum::extract::Multipart;
use axum::http::StatusCode;
use std::collections::HashMap;

pub struct FilePart {
    pub file_name: String,
    /// At most `max_file_bytes` plus one chunk; the rest is discarded.
    pub data: Vec<u8>,
    /// Bytes seen on the wire, including any that were discarded.
    pub size: usize,
    /// False when the request body was cut off inside this part.
    pub complete: bool,
}

impl FilePart {
    pub fn exceeds(&self, max_bytes: usize) -> bool {
        !self.complete || self.size > max_bytes
    }
}

/// A multipart editor submission: text fields by name plus file parts.
#[derive(Default)]
pub struct MultipartForm {
    fields: HashMap<String, Vec<String>>,
    files: HashMap<String, FilePart>,
    truncated: bool,
}

fn body_limit_hit(err: &MultipartError) -> bool {
    err.status() == StatusCode::PAYLOAD_TOO_LARGE
}

impl MultipartForm {
    /// Reads the whole submission. File parts are streamed and only their
    /// first `max_file_bytes` are kept. When the request body limit cuts
    /// the stream short, the fields read so far are returned and the form
    /// is marked truncated so the editor can be shown again.
    pub async fn read(
        mut multipart: Multipart,
        max_file_bytes: usize,
    ) -> Result<Self, MultipartError> {
        let mut form = Self::default();
        loop {
            let field = match multipart.next_field().await {
                Ok(Some(field)) => field,
                Ok(None) => break,
                Err(e) if body_limit_hit(&e) => {
                    form.truncated = true;
                    break;
                }
                Err(e) => return Err(e),
            };
            let name = field.name().unwrap_or_default().to_string();
            match field.file_name().map(|f| f.to_string()) {
                Some(file_name) => {
                    let part = read_file(field, file_name, max_file_bytes).await?;
                    let complete = part.complete;
                    form.files.insert(name, part);
                    if !complete {
                        form.truncated = true;
                        break;
                    }
                }
                None => match field.text().await {
                    Ok(value) => form.fields.entry(name).or_default().push(value),
                    Err(e) if body_limit_hit(&e) => {
                        form.truncated = true;
                        break;
                    }
                    Err(e) => return Err(e),
                },
            }
        }
        if form.truncated {
            tracing::warn!("Multipart submission cut off at the request body limit");
        }
        Ok(form)
    }

    /// True when the request body limit stopped reading before the end.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .and_then(|v| v.first())
            .map(|s| s.as_str())
    }

    /// First value of a text field, or `""`.
    pub fn text(&self, name: &str) -> String {
        self.get(name).unwrap_or_default().to_string()
    }

    /// Every value of a repeated field (checkboxes, multi-selects); values
    /// that are themselves comma-joined are split.
    pub fn list(&self, name: &str) -> Vec<String> {
        self.fields
            .get(name)
            .into_iter()
            .flatten()
            .flat_map(|v| v.split(','))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Checkbox semantics: present with a truthy value.
    pub fn flag(&self, name: &str) -> bool {
        self.fields
            .get(name)
            .into_iter()
            .flatten()
            .any(|v| matches!(v.trim(), "on" | "true" | "1"))
    }

    pub fn take_file(&mut self, name: &str) -> Option<FilePart> {
        self.files.remove(name)
    }
}

async fn read_file(
    mut field: Field<'_>,
    file_name: String,
    max_file_bytes: usize,
) -> Result<FilePart, MultipartError> {
    let mut part = FilePart {
        file_name,
        data: Vec::new(),
        size: 0,
        complete: true,
    };
    loop {
        match field.chunk().await {
            Ok(Some(chunk)) => {
                part.size += chunk.len();
                if part.data.len() <= max_file_bytes {
                    part.data.extend_from_slice(&chunk);
                }
            }
            Ok(None) => break,
            Err(e) if body_limit_hit(&e) => {
                part.complete = false;
                break;
            }
            Err(e) => return Err(e),
        }
    }
    Ok(part)
}
