use std::path::PathBuf;

use bytes::Bytes;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Storage collaborator for resume files. The core never interprets the
/// returned locator; it is stored on the candidate verbatim.
#[async_trait::async_trait]
pub trait ResumeStorage: Send + Sync {
    async fn store(
        &self,
        job_id: Uuid,
        candidate_name: &str,
        content_type: &str,
        data: Bytes,
    ) -> Result<String>;
}

/// Writes resumes under the uploads directory as
/// `{jobId}/{candidateName}_{timestamp}.{extension}` and returns a public
/// URL under `/uploads/`, which the server exposes as a static directory.
pub struct LocalResumeStorage {
    uploads_dir: PathBuf,
    public_base_url: String,
}

impl LocalResumeStorage {
    pub fn new(uploads_dir: impl Into<PathBuf>, public_base_url: String) -> Self {
        Self {
            uploads_dir: uploads_dir.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }
}

pub fn extension_for(content_type: &str) -> Option<&'static str> {
    match content_type {
        "application/pdf" => Some("pdf"),
        "application/msword" => Some("doc"),
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => Some("docx"),
        _ => None,
    }
}

fn sanitize_name(name: &str) -> String {
    let safe: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    if safe.is_empty() {
        "candidate".to_string()
    } else {
        safe
    }
}

#[async_trait::async_trait]
impl ResumeStorage for LocalResumeStorage {
    async fn store(
        &self,
        job_id: Uuid,
        candidate_name: &str,
        content_type: &str,
        data: Bytes,
    ) -> Result<String> {
        let extension = extension_for(content_type).ok_or_else(|| {
            Error::BadRequest(format!("Unsupported resume content type: {}", content_type))
        })?;

        let file_name = format!(
            "{}_{}.{}",
            sanitize_name(candidate_name),
            Utc::now().timestamp_millis(),
            extension
        );
        let dir = self.uploads_dir.join(job_id.to_string());
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(&file_name), &data).await?;
        info!(%job_id, file = %file_name, "resume stored");

        Ok(format!(
            "{}/uploads/{}/{}",
            self.public_base_url, job_id, file_name
        ))
    }
}
