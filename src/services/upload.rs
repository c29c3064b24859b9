use crate::models::ImageUpload;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("File too large: {size} bytes (max {max} bytes)")]
    TooLarge { size: usize, max: usize },

    #[error("File too large: the submission exceeds the upload limit of {max} bytes")]
    SubmissionTooLarge { max: usize },

    #[error("'{file_name}' is not a supported image")]
    NotAnImage {
        file_name: String,
        detected: Option<String>,
    },
}

/// Validate a file part before it is forwarded to the backend.
///
/// An empty part means no file was chosen and yields `Ok(None)`. The MIME
/// type is sniffed from the bytes; the browser's declared type is ignored.
pub fn accept_image(
    field: &'static str,
    file_name: &str,
    data: Vec<u8>,
    max_bytes: usize,
) -> Result<Option<ImageUpload>, UploadError> {
    if data.is_empty() {
        return Ok(None);
    }
    if data.len() > max_bytes {
        return Err(UploadError::TooLarge {
            size: data.len(),
            max: max_bytes,
        });
    }

    let detected = infer::get(&data);
    let kind = match detected {
        Some(kind) if kind.matcher_type() == infer::MatcherType::Image => kind,
        other => {
            return Err(UploadError::NotAnImage {
                file_name: file_name.to_string(),
                detected: other.map(|k| k.mime_type().to_string()),
            })
        }
    };

    Ok(Some(ImageUpload {
        field,
        file_name: upload_file_name(file_name, kind.extension()),
        mime_type: kind.mime_type().to_string(),
        data,
    }))
}

/// The backend names stored files after the upload's extension, so make sure
/// there is one. Directory components from the browser are dropped.
fn upload_file_name(original: &str, extension: &str) -> String {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or("")
        .trim();

    let has_extension = std::path::Path::new(base)
        .extension()
        .map(|e| !e.is_empty())
        .unwrap_or(false);

    match (base.is_empty(), has_extension) {
        (true, _) => format!("upload.{}", extension),
        (false, true) => base.to_string(),
        (false, false) => format!("{}.{}", base, extension),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_keep_or_gain_an_extension() {
        assert_eq!(upload_file_name("photo.png", "png"), "photo.png");
        assert_eq!(upload_file_name("photo", "jpg"), "photo.jpg");
        assert_eq!(upload_file_name("", "gif"), "upload.gif");
        assert_eq!(upload_file_name("C:\\Users\\me\\cat.webp", "webp"), "cat.webp");
        assert_eq!(upload_file_name("a/b/c.jpeg", "jpg"), "c.jpeg");
    }
}
