//! Flickr client, the OAuth-signed implementation of [`PhotoService`].
//!
//! REST methods are POSTed as signed forms and answered in JSON. Uploads go
//! to a separate endpoint as multipart forms and are answered in XML, which
//! the upload executor validates.

pub mod endpoints;
pub mod error;
pub mod responses;
pub mod service;

pub use endpoints::Endpoints;
pub use error::FlickrError;
pub use service::{PhotoService, Photoset, UploadRequest};

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::Value;

use crate::auth::{oauth, Credentials};
use responses::{check_stat, LoginUser, PhotosetCreateResponse, PhotosetListResponse};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

const PHOTOSETS_PER_PAGE: u64 = 500;

pub struct FlickrClient {
    client: Client,
    credentials: Credentials,
    endpoints: Endpoints,
}

impl std::fmt::Debug for FlickrClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlickrClient")
            .field("endpoints", &self.endpoints)
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

impl FlickrClient {
    pub fn new(
        credentials: Credentials,
        endpoints: Endpoints,
        timeout: Duration,
    ) -> Result<Self, FlickrError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            credentials,
            endpoints,
        })
    }

    /// Call a REST method and return the JSON body once `stat` is `ok`.
    async fn call(&self, method: &str, args: &[(&str, &str)]) -> Result<Value, FlickrError> {
        let mut params: Vec<(String, String)> = vec![
            ("method".to_string(), method.to_string()),
            ("format".to_string(), "json".to_string()),
            ("nojsoncallback".to_string(), "1".to_string()),
        ];
        params.extend(args.iter().map(|(k, v)| (k.to_string(), v.to_string())));
        oauth::sign(&self.credentials, "POST", &self.endpoints.rest, &mut params);

        tracing::debug!(method, "POST {}", self.endpoints.rest);
        let response = self
            .client
            .post(&self.endpoints.rest)
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FlickrError::HttpStatus {
                status: status.as_u16(),
                method: method.to_string(),
            });
        }

        let value: Value = response.json().await?;
        check_stat(method, value)
    }

    /// Confirm the token set is accepted and return the account it belongs to.
    pub async fn test_login(&self) -> Result<LoginUser, FlickrError> {
        let value = self.call("flickr.test.login", &[]).await?;
        let resp: responses::LoginResponse = serde_json::from_value(value)?;
        Ok(resp.user)
    }
}

fn flag(b: bool) -> &'static str {
    if b {
        "1"
    } else {
        "0"
    }
}

#[async_trait]
impl PhotoService for FlickrClient {
    async fn list_photosets(&self) -> Result<Vec<Photoset>, FlickrError> {
        let mut photosets = Vec::new();
        let mut page = 1u64;
        let per_page = PHOTOSETS_PER_PAGE.to_string();

        loop {
            let page_str = page.to_string();
            let value = self
                .call(
                    "flickr.photosets.getList",
                    &[("page", &page_str), ("per_page", &per_page)],
                )
                .await?;
            let resp: PhotosetListResponse = serde_json::from_value(value)?;
            let pages = resp.photosets.pages.as_ref().map_or(1, |p| p.value());
            tracing::trace!(
                page = resp.photosets.page.as_ref().map(|p| p.value()),
                pages,
                "Fetched photoset page"
            );
            photosets.extend(resp.photosets.photoset.into_iter().map(|p| Photoset {
                id: p.id,
                title: p.title.content,
            }));

            if page >= pages {
                break;
            }
            page += 1;
        }

        tracing::debug!(count = photosets.len(), "Listed photosets");
        Ok(photosets)
    }

    async fn upload_photo(&self, request: UploadRequest) -> Result<String, FlickrError> {
        let (is_public, is_friend, is_family) = request.visibility.flags();
        let mut params: Vec<(String, String)> = vec![
            ("title".to_string(), request.title),
            ("description".to_string(), request.description),
            ("tags".to_string(), request.tags),
            ("is_public".to_string(), flag(is_public).to_string()),
            ("is_friend".to_string(), flag(is_friend).to_string()),
            ("is_family".to_string(), flag(is_family).to_string()),
            ("license".to_string(), request.license.id().to_string()),
        ];
        // The file part is excluded from the OAuth signature.
        oauth::sign(&self.credentials, "POST", &self.endpoints.upload, &mut params);

        let mut form = Form::new();
        for (k, v) in params {
            form = form.text(k, v);
        }
        form = form.part("photo", Part::bytes(request.bytes).file_name(request.filename));

        tracing::debug!("POST {}", self.endpoints.upload);
        let response = self
            .client
            .post(&self.endpoints.upload)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FlickrError::HttpStatus {
                status: status.as_u16(),
                method: "upload".to_string(),
            });
        }
        Ok(response.text().await?)
    }

    async fn add_photo_to_photoset(
        &self,
        photoset_id: &str,
        photo_id: &str,
    ) -> Result<(), FlickrError> {
        self.call(
            "flickr.photosets.addPhoto",
            &[("photoset_id", photoset_id), ("photo_id", photo_id)],
        )
        .await?;
        Ok(())
    }

    async fn create_photoset(
        &self,
        title: &str,
        primary_photo_id: &str,
    ) -> Result<String, FlickrError> {
        let value = self
            .call(
                "flickr.photosets.create",
                &[("title", title), ("primary_photo_id", primary_photo_id)],
            )
            .await?;
        let resp: PhotosetCreateResponse = serde_json::from_value(value)?;
        Ok(resp.photoset.id)
    }
}
