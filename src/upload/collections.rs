//! Album (photoset) registry: name → id for the duration of one run.
//!
//! Seeded from the account's existing photosets, then extended as rows
//! create new albums. Each name has its own lock so that two workers
//! uploading into the same new album produce one `create` and one `add`,
//! never two albums.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::flickr::{FlickrError, PhotoService, Photoset};

/// Where a photo was filed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionAssignment {
    pub id: String,
    /// True when this row created the album.
    pub created: bool,
}

/// `None` until the album exists remotely.
type Slot = Arc<Mutex<Option<String>>>;

#[derive(Default)]
pub struct CollectionRegistry {
    slots: Mutex<HashMap<String, Slot>>,
}

impl CollectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from existing photosets. Titles are matched exactly; when the
    /// account has duplicate titles the first one listed wins.
    pub fn from_photosets(photosets: Vec<Photoset>) -> Self {
        let mut slots: HashMap<String, Slot> = HashMap::new();
        for set in photosets {
            if slots.contains_key(&set.title) {
                tracing::warn!(
                    album = %set.title,
                    ignored_id = %set.id,
                    "Duplicate album title on account, keeping the first"
                );
                continue;
            }
            slots.insert(set.title, Arc::new(Mutex::new(Some(set.id))));
        }
        Self {
            slots: Mutex::new(slots),
        }
    }

    /// Load existing albums from the service. A failure here is not fatal:
    /// the registry starts empty and every album name is treated as new.
    pub async fn load(service: &dyn PhotoService) -> Self {
        match service.list_photosets().await {
            Ok(photosets) => {
                tracing::info!(count = photosets.len(), "Loaded existing albums");
                Self::from_photosets(photosets)
            }
            Err(e) => {
                tracing::error!(
                    "Failed to list existing albums, treating every album as new: {}",
                    e
                );
                Self::new()
            }
        }
    }

    async fn slot(&self, name: &str) -> Slot {
        let mut slots = self.slots.lock().await;
        Arc::clone(slots.entry(name.to_string()).or_default())
    }

    /// Cached id for `name`, if the album is known to exist.
    #[cfg(test)]
    pub async fn get(&self, name: &str) -> Option<String> {
        let slot = self.slots.lock().await.get(name).cloned()?;
        let id = slot.lock().await.clone();
        id
    }

    /// File `photo_id` under album `name`, creating the album with the photo
    /// as its cover if it does not exist yet.
    ///
    /// A failed create leaves the name unresolved, so a later row retries
    /// the create rather than adding to an album that was never made.
    pub async fn resolve_or_create(
        &self,
        service: &dyn PhotoService,
        name: &str,
        photo_id: &str,
    ) -> Result<CollectionAssignment, FlickrError> {
        let slot = self.slot(name).await;
        let mut cached = slot.lock().await;

        if let Some(id) = cached.as_ref() {
            service.add_photo_to_photoset(id, photo_id).await?;
            tracing::info!(album = name, photo_id, "Added photo to existing album");
            return Ok(CollectionAssignment {
                id: id.clone(),
                created: false,
            });
        }

        let id = service.create_photoset(name, photo_id).await?;
        tracing::info!(album = name, album_id = %id, photo_id, "Created new album");
        *cached = Some(id.clone());
        Ok(CollectionAssignment { id, created: true })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::testing::FakeService;

    fn set(id: &str, title: &str) -> Photoset {
        Photoset {
            id: id.to_string(),
            title: title.to_string(),
        }
    }

    #[tokio::test]
    async fn test_seeded_name_adds_to_existing() {
        let service = FakeService::new().with_photosets(vec![set("s1", "Trip")]);
        let registry = CollectionRegistry::load(&service).await;

        let assignment = registry.resolve_or_create(&service, "Trip", "p1").await.unwrap();
        assert_eq!(assignment, CollectionAssignment { id: "s1".into(), created: false });

        let calls = service.calls();
        assert_eq!(calls.creates, 0);
        assert_eq!(calls.adds, vec![("s1".to_string(), "p1".to_string())]);
    }

    #[tokio::test]
    async fn test_new_name_created_once() {
        let service = FakeService::new();
        let registry = CollectionRegistry::new();

        let first = registry.resolve_or_create(&service, "Regatta", "p1").await.unwrap();
        let second = registry.resolve_or_create(&service, "Regatta", "p2").await.unwrap();

        assert!(first.created);
        assert!(!second.created);
        assert_eq!(first.id, second.id);
        let calls = service.calls();
        assert_eq!(calls.creates, 1);
        assert_eq!(calls.created, vec![("Regatta".to_string(), "p1".to_string())]);
        assert_eq!(calls.adds, vec![(first.id.clone(), "p2".to_string())]);
        assert_eq!(registry.get("Regatta").await, Some(first.id));
    }

    #[tokio::test]
    async fn test_names_are_case_sensitive() {
        let service = FakeService::new().with_photosets(vec![set("s1", "Trip")]);
        let registry = CollectionRegistry::load(&service).await;

        let assignment = registry.resolve_or_create(&service, "trip", "p1").await.unwrap();
        assert!(assignment.created);
        assert_ne!(assignment.id, "s1");
    }

    #[tokio::test]
    async fn test_duplicate_titles_keep_first() {
        let registry =
            CollectionRegistry::from_photosets(vec![set("s1", "Trip"), set("s2", "Trip")]);
        assert_eq!(registry.get("Trip").await.as_deref(), Some("s1"));
    }

    #[tokio::test]
    async fn test_load_failure_starts_empty() {
        let service = FakeService::new()
            .with_photosets(vec![set("s1", "Trip")])
            .failing_list();
        let registry = CollectionRegistry::load(&service).await;
        assert_eq!(registry.get("Trip").await, None);
        assert_eq!(service.calls().lists, 1);
    }

    #[tokio::test]
    async fn test_failed_create_is_retried_by_next_row() {
        let service = FakeService::new().failing_creates(1);
        let registry = CollectionRegistry::new();

        assert!(registry.resolve_or_create(&service, "Trip", "p1").await.is_err());
        assert_eq!(registry.get("Trip").await, None);

        let assignment = registry.resolve_or_create(&service, "Trip", "p2").await.unwrap();
        assert!(assignment.created);
        assert_eq!(service.calls().creates, 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_rows_share_one_new_album() {
        let service = Arc::new(FakeService::new().with_create_delay_ms(20));
        let registry = Arc::new(CollectionRegistry::new());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let service = Arc::clone(&service);
                let registry = Arc::clone(&registry);
                tokio::spawn(async move {
                    registry
                        .resolve_or_create(service.as_ref(), "Shared", &format!("p{i}"))
                        .await
                })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().unwrap().id);
        }

        assert_eq!(service.calls().creates, 1);
        assert_eq!(service.calls().adds.len(), 7);
        assert!(ids.iter().all(|id| id == &ids[0]));
    }
}
