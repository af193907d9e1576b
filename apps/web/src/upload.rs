//! Multipart upload form shared by the upload page and the extract endpoint.

use axum::extract::Multipart;
use bytes::Bytes;

use crate::errors::AppError;

pub const RESUME_FIELD: &str = "resume";
pub const JOB_DESCRIPTION_FIELD: &str = "job_description";
pub const NUM_QUESTIONS_FIELD: &str = "num_questions";

#[derive(Debug)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

#[derive(Debug, Default)]
pub struct UploadForm {
    /// `None` when the field is missing or the browser sent an empty file input.
    pub resume: Option<UploadedFile>,
    pub job_description: String,
    pub num_questions: Option<String>,
}

impl UploadForm {
    /// Reads every field of the form. Unknown fields are drained and ignored.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                RESUME_FIELD => {
                    let file_name = field.file_name().map(str::to_string);
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field.bytes().await?;
                    let has_file = !bytes.is_empty() || file_name.as_deref().is_some_and(|n| !n.is_empty());
                    if has_file {
                        form.resume = Some(UploadedFile {
                            file_name,
                            content_type,
                            bytes,
                        });
                    }
                }
                JOB_DESCRIPTION_FIELD => form.job_description = field.text().await?,
                NUM_QUESTIONS_FIELD => form.num_questions = Some(field.text().await?),
                _ => {
                    field.bytes().await?;
                }
            }
        }

        Ok(form)
    }

    /// The job description with surrounding whitespace removed, if any is left.
    pub fn job_description(&self) -> Option<&str> {
        Some(self.job_description.trim()).filter(|jd| !jd.is_empty())
    }
}
