/// A validated image on its way to the backend's upload sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// Multipart field the backend reads the file from.
    pub field: &'static str,
    pub file_name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}
