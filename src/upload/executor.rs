//! Single-photo upload: read the file, send it, pull the photo id out of
//! the response.

use std::path::Path;

use super::error::UploadError;
use crate::flickr::responses::{parse_upload_response, UploadResponse};
use crate::flickr::{FlickrError, PhotoService, UploadRequest};
use crate::license::LicenseCode;
use crate::manifest::UploadRecord;
use crate::types::Visibility;

/// Fail with [`UploadError::MissingFile`] unless `path` is an existing file.
pub async fn ensure_source_exists(path: &Path) -> Result<(), UploadError> {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_file() => Ok(()),
        _ => Err(UploadError::MissingFile(path.to_path_buf())),
    }
}

/// Upload one record and return the new photo id.
///
/// `tags` must already be normalized. The file's final path component is
/// used as the multipart file name.
pub async fn upload(
    service: &dyn PhotoService,
    record: &UploadRecord,
    tags: String,
    license: LicenseCode,
    visibility: Visibility,
) -> Result<String, UploadError> {
    let bytes = tokio::fs::read(&record.source_path)
        .await
        .map_err(|source| UploadError::Read {
            path: record.source_path.clone(),
            source,
        })?;

    let filename = record
        .source_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "photo".to_string());

    tracing::debug!(
        path = %record.source_path.display(),
        size = bytes.len(),
        "Uploading"
    );

    let request = UploadRequest {
        filename,
        bytes,
        title: record.title.clone(),
        description: record.description.clone(),
        tags,
        visibility,
        license,
    };
    let body = service.upload_photo(request).await?;

    match parse_upload_response(&body) {
        Ok(UploadResponse::Ok {
            photo_id: Some(id),
        }) => Ok(id),
        Ok(UploadResponse::Ok { photo_id: None }) => Err(UploadError::InvalidResponse(
            "response has no photoid".to_string(),
        )),
        Ok(UploadResponse::Fail { code, message }) => {
            Err(UploadError::Remote(FlickrError::Api { code, message }))
        }
        Err(e) => Err(UploadError::InvalidResponse(e.to_string())),
    }
}
