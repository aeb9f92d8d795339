use crate::error::Result;
use crate::response::Collection;
use crate::rest::{check_status, read_body, AdminClient};
use crate::types::Image;
use reqwest::blocking::multipart::{Form, Part};
use reqwest::Method;
use std::io::Read;
use std::path::Path;
use std::time::Instant;

/// Upload endpoint relative to the base URL
pub const UPLOAD_PATH: &str = "/images/upload/";

/// Multipart field the server reads the image from
pub const FILE_FIELD: &str = "file";

impl AdminClient {
    /// Upload the image at `path`.
    ///
    /// The file is opened before anything is sent, so a missing or unreadable
    /// file fails with [`GhostError::Io`](crate::GhostError::Io) without
    /// touching the network. The part's content type is guessed from the
    /// file extension.
    pub fn upload_image(&self, path: impl AsRef<Path>) -> Result<Collection<Image>> {
        let part = Part::file(path)?;
        self.upload_part(part)
    }

    /// Upload an image read from `reader` under the given file name.
    ///
    /// The data is streamed into the request body as it is read.
    pub fn upload_image_reader<R>(&self, reader: R, filename: &str) -> Result<Collection<Image>>
    where
        R: Read + Send + 'static,
    {
        let part = Part::reader(reader)
            .file_name(filename.to_string())
            .mime_str("application/octet-stream")?;
        self.upload_part(part)
    }

    fn upload_part(&self, part: Part) -> Result<Collection<Image>> {
        let form = Form::new().part(FILE_FIELD, part);

        let start = Instant::now();
        let response = self
            .authorized(Method::POST, UPLOAD_PATH)?
            .multipart(form)
            .send()
            .inspect_err(|e| tracing::warn!(error = %e, "image upload failed"))?;
        let status = response.status();
        let bytes = read_body(response)?;

        tracing::debug!(
            status = status.as_u16(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "image upload"
        );

        let bytes = check_status(status, bytes)?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GhostError;

    #[test]
    fn test_upload_missing_file_is_io_error() {
        // Port 9 (discard) is never contacted: the file open fails first
        let client = AdminClient::new("http://127.0.0.1:9", "id:abcd").unwrap();
        let err = client
            .upload_image("/nonexistent/definitely/missing.png")
            .unwrap_err();
        assert!(matches!(err, GhostError::Io(_)), "got {:?}", err);
    }

    #[test]
    fn test_upload_bad_key_is_token_error() {
        let client = AdminClient::new("http://127.0.0.1:9", "broken").unwrap();
        let err = client
            .upload_image_reader(std::io::Cursor::new(vec![1u8, 2, 3]), "a.png")
            .unwrap_err();
        assert!(matches!(err, GhostError::Token(_)), "got {:?}", err);
    }
}
