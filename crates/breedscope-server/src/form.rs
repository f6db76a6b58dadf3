//! Multipart form reading with file/field separation.
//!
//! A part that carries a filename is a file upload; any other part is a plain
//! form field. The first part with a given name wins. A body that is not
//! multipart at all reads as an empty form, so the handlers report the
//! missing fields themselves.

use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::Multipart;
use axum::extract::multipart::MultipartRejection;
use tracing::debug;

use crate::ApiError;

/// One uploaded file, fully buffered.
#[derive(Debug)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Bytes,
}

#[derive(Debug, Default)]
pub struct UploadForm {
    files: HashMap<String, Upload>,
    fields: HashMap<String, String>,
}

impl UploadForm {
    pub async fn read(
        multipart: Result<Multipart, MultipartRejection>,
    ) -> Result<Self, ApiError> {
        let mut form = Self::default();
        let mut multipart = match multipart {
            Ok(m) => m,
            Err(rejection) => {
                debug!(%rejection, "request body is not multipart");
                return Ok(form);
            }
        };

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };
            match field.file_name().map(str::to_owned) {
                Some(file_name) => {
                    let bytes = field.bytes().await?;
                    form.files
                        .entry(name)
                        .or_insert(Upload { file_name, bytes });
                }
                None => {
                    let text = field.text().await?;
                    form.fields.entry(name).or_insert(text);
                }
            }
        }
        Ok(form)
    }

    pub fn take_file(&mut self, name: &str) -> Option<Upload> {
        self.files.remove(name)
    }

    pub fn take_field(&mut self, name: &str) -> Option<String> {
        self.fields.remove(name)
    }
}
