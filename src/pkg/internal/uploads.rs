use std::path::{Path, PathBuf};

use axum::body::Bytes;
use tokio::fs;
use uuid::Uuid;

use crate::{conf::settings, errors::Error, prelude::Result};

pub const MAX_CV_BYTES: usize = 10 * 1024 * 1024;

pub struct CvUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl CvUpload {
    /// PDF only, checked against both the filename and the declared
    /// content type, and at most 10 MiB of actual bytes.
    pub fn validate(&self) -> Result<()> {
        let extension = Path::new(&self.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_lowercase();
        if extension != "pdf" {
            return Err(Error::BadUpload("only PDF files are allowed".into()));
        }
        if let Some(content_type) = &self.content_type {
            if content_type != "application/pdf" {
                return Err(Error::BadUpload("only PDF files are allowed".into()));
            }
        }
        if self.data.len() > MAX_CV_BYTES {
            return Err(Error::BadUpload("file size must be less than 10MB".into()));
        }
        Ok(())
    }
}

/// CV files live under a flat server-local directory; stored names are
/// generated, never taken from the client.
pub struct CvStore {
    dir: PathBuf,
}

impl CvStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        CvStore { dir: dir.into() }
    }

    pub fn from_settings() -> Self {
        Self::new(&settings.upload_dir)
    }

    pub async fn store(&self, upload: &CvUpload) -> Result<String> {
        upload.validate()?;
        fs::create_dir_all(&self.dir).await?;
        let name = format!("{}.pdf", Uuid::new_v4());
        fs::write(self.dir.join(&name), &upload.data).await?;
        tracing::debug!("stored cv {} ({} bytes)", &name, upload.data.len());
        Ok(name)
    }

    /// Best effort: a missing file is not an error.
    pub async fn remove(&self, name: &str) {
        if let Err(e) = fs::remove_file(self.dir.join(name)).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("could not remove cv {}: {}", name, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::Result;

    fn temp_store() -> CvStore {
        CvStore::new(std::env::temp_dir().join(format!("joblite-cv-{}", Uuid::new_v4())))
    }

    fn pdf_upload(size: usize) -> CvUpload {
        CvUpload {
            file_name: "resume.pdf".into(),
            content_type: Some("application/pdf".into()),
            data: Bytes::from(vec![b'x'; size]),
        }
    }

    #[tokio::test]
    async fn test_store_and_replace() -> Result<()> {
        let store = temp_store();
        let first = store.store(&pdf_upload(128)).await?;
        let second = store.store(&pdf_upload(256)).await?;
        assert_ne!(first, second);

        store.remove(&first).await;
        store.remove("never-existed.pdf").await;
        Ok(())
    }

    #[test]
    fn test_oversized_cv_rejected() {
        let upload = pdf_upload(MAX_CV_BYTES + 1);
        assert!(matches!(upload.validate(), Err(Error::BadUpload(_))));
    }

    #[test]
    fn test_non_pdf_rejected() {
        let upload = CvUpload {
            file_name: "resume.docx".into(),
            content_type: Some("application/msword".into()),
            data: Bytes::from_static(b"hi"),
        };
        assert!(matches!(upload.validate(), Err(Error::BadUpload(_))));

        let mislabeled = CvUpload {
            file_name: "resume.pdf".into(),
            content_type: Some("text/html".into()),
            data: Bytes::from_static(b"hi"),
        };
        assert!(matches!(mislabeled.validate(), Err(Error::BadUpload(_))));
    }
}
