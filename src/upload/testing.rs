//! In-memory [`PhotoService`] that records every call.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::flickr::{FlickrError, PhotoService, Photoset, UploadRequest};

pub fn ok_body(photo_id: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\" ?>\n<rsp stat=\"ok\">\n<photoid>{}</photoid>\n</rsp>",
        photo_id
    )
}

fn api_error(message: &str) -> FlickrError {
    FlickrError::Api {
        code: "1".to_string(),
        message: message.to_string(),
    }
}

#[derive(Debug, Clone, Default)]
pub struct Calls {
    pub lists: usize,
    pub uploads: Vec<UploadRequest>,
    pub adds: Vec<(String, String)>,
    pub creates: usize,
    /// `(title, primary_photo_id)` per create, failed ones included.
    pub created: Vec<(String, String)>,
}

#[derive(Default)]
pub struct FakeService {
    photosets: Vec<Photoset>,
    fail_list: bool,
    fail_adds: bool,
    create_failures: Mutex<usize>,
    create_delay: Duration,
    upload_bodies: Mutex<VecDeque<String>>,
    calls: Mutex<Calls>,
}

impl FakeService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_photosets(mut self, photosets: Vec<Photoset>) -> Self {
        self.photosets = photosets;
        self
    }

    pub fn failing_list(mut self) -> Self {
        self.fail_list = true;
        self
    }

    pub fn failing_adds(mut self) -> Self {
        self.fail_adds = true;
        self
    }

    /// Fail the next `n` creates.
    pub fn failing_creates(self, n: usize) -> Self {
        *self.create_failures.lock().unwrap() = n;
        self
    }

    pub fn with_create_delay_ms(mut self, ms: u64) -> Self {
        self.create_delay = Duration::from_millis(ms);
        self
    }

    /// Bodies returned by successive uploads. Once exhausted, uploads get a
    /// well-formed body with the next sequential id.
    pub fn with_upload_bodies(self, bodies: Vec<String>) -> Self {
        *self.upload_bodies.lock().unwrap() = bodies.into();
        self
    }

    pub fn calls(&self) -> Calls {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PhotoService for FakeService {
    async fn list_photosets(&self) -> Result<Vec<Photoset>, FlickrError> {
        self.calls.lock().unwrap().lists += 1;
        if self.fail_list {
            return Err(api_error("Service unavailable"));
        }
        Ok(self.photosets.clone())
    }

    async fn upload_photo(&self, request: UploadRequest) -> Result<String, FlickrError> {
        let mut calls = self.calls.lock().unwrap();
        calls.uploads.push(request);
        let scripted = self.upload_bodies.lock().unwrap().pop_front();
        Ok(scripted.unwrap_or_else(|| ok_body(&(1000 + calls.uploads.len()).to_string())))
    }

    async fn add_photo_to_photoset(
        &self,
        photoset_id: &str,
        photo_id: &str,
    ) -> Result<(), FlickrError> {
        self.calls
            .lock()
            .unwrap()
            .adds
            .push((photoset_id.to_string(), photo_id.to_string()));
        if self.fail_adds {
            return Err(api_error("Photoset not found"));
        }
        Ok(())
    }

    async fn create_photoset(
        &self,
        title: &str,
        primary_photo_id: &str,
    ) -> Result<String, FlickrError> {
        if !self.create_delay.is_zero() {
            tokio::time::sleep(self.create_delay).await;
        }
        let n = {
            let mut calls = self.calls.lock().unwrap();
            calls.creates += 1;
            calls
                .created
                .push((title.to_string(), primary_photo_id.to_string()));
            calls.creates
        };
        {
            let mut failures = self.create_failures.lock().unwrap();
            if *failures > 0 {
                *failures -= 1;
                return Err(api_error("Create failed"));
            }
        }
        Ok(format!("set-{}", n))
    }
}
