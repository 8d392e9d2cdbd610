//! Download presentation: disposition mode and response metadata.

use serde::Deserialize;

use drivehub_core::traits::ByteStream;

/// How the client wants the file presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadMode {
    /// Display inline in the browser.
    Open,
    /// Save as an attachment under the original name.
    #[default]
    Download,
}

/// A file ready to be streamed to the client.
pub struct FileDownload {
    /// File content.
    pub stream: ByteStream,
    /// Size in bytes.
    pub size: u64,
    /// The user-visible name.
    pub filename: String,
    /// MIME type guessed from the name.
    pub content_type: String,
    /// Requested presentation.
    pub mode: DownloadMode,
}

impl std::fmt::Debug for FileDownload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileDownload")
            .field("size", &self.size)
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .field("mode", &self.mode)
            .finish()
    }
}

impl FileDownload {
    /// The `Content-Disposition` header value for this download.
    ///
    /// Carries an ASCII fallback `filename` plus an RFC 5987 `filename*`
    /// with the exact UTF-8 name.
    pub fn content_disposition(&self) -> String {
        let kind = match self.mode {
            DownloadMode::Open => "inline",
            DownloadMode::Download => "attachment",
        };
        format!(
            "{kind}; filename=\"{}\"; filename*=UTF-8''{}",
            ascii_fallback(&self.filename),
            urlencoding::encode(&self.filename)
        )
    }
}

fn ascii_fallback(name: &str) -> String {
    name.chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
