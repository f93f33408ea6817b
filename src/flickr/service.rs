use async_trait::async_trait;

use super::error::FlickrError;
use crate::license::LicenseCode;
use crate::types::Visibility;

/// An existing photoset (album) on the account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photoset {
    pub id: String,
    pub title: String,
}

/// Everything needed to create one photo.
#[derive(Clone)]
pub struct UploadRequest {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub title: String,
    pub description: String,
    /// Space-separated, already normalized.
    pub tags: String,
    pub visibility: Visibility,
    pub license: LicenseCode,
}

impl std::fmt::Debug for UploadRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadRequest")
            .field("filename", &self.filename)
            .field("bytes", &self.bytes.len())
            .field("title", &self.title)
            .field("tags", &self.tags)
            .field("visibility", &self.visibility)
            .field("license", &self.license)
            .finish_non_exhaustive()
    }
}

/// The remote operations the uploader depends on. The concrete
/// implementation is [`super::FlickrClient`]; tests substitute an in-memory
/// fake.
#[async_trait]
pub trait PhotoService: Send + Sync {
    /// All photosets on the account.
    async fn list_photosets(&self) -> Result<Vec<Photoset>, FlickrError>;

    /// Create a photo and return the raw response body. Validating that body
    /// is the caller's job.
    async fn upload_photo(&self, request: UploadRequest) -> Result<String, FlickrError>;

    async fn add_photo_to_photoset(
        &self,
        photoset_id: &str,
        photo_id: &str,
    ) -> Result<(), FlickrError>;

    /// Create a photoset seeded with `primary_photo_id` and return its id.
    async fn create_photoset(
        &self,
        title: &str,
        primary_photo_id: &str,
    ) -> Result<String, FlickrError>;
}
