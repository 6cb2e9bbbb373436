//! Gallery service - community images and voting
//!
//! Tallies and every voter's choices are kept together in the
//! `guava_gallery` slot. Voting earns no coins.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::adapters::demo::generate_demo_gallery;
use crate::domain::result::{Error, Result};
use crate::domain::{GalleryImage, Vote};
use crate::ports::{load_json, store_json, KeyValueStore};
use crate::services::SessionService;

/// Slot holding gallery tallies and votes
pub const GALLERY_SLOT: &str = "guava_gallery";

/// Persisted gallery state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct GalleryState {
    images: Vec<GalleryImage>,
    /// identity id -> image id -> vote
    #[serde(default)]
    votes: HashMap<String, HashMap<String, Vote>>,
}

/// A gallery image as seen by the current viewer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GalleryEntry {
    #[serde(flatten)]
    pub image: GalleryImage,
    pub my_vote: Option<Vote>,
}

/// Gallery service for browsing and voting
pub struct GalleryService {
    store: Arc<dyn KeyValueStore>,
    session: Arc<SessionService>,
}

impl GalleryService {
    pub fn new(store: Arc<dyn KeyValueStore>, session: Arc<SessionService>) -> Self {
        Self { store, session }
    }

    /// All images, with the signed-in viewer's votes if any
    pub fn list(&self) -> Result<Vec<GalleryEntry>> {
        let state = self.load()?;
        let viewer = self.session.current().map(|s| s.identity().id.clone());
        let my_votes = viewer.and_then(|id| state.votes.get(&id).cloned()).unwrap_or_default();

        Ok(state
            .images
            .into_iter()
            .map(|image| {
                let my_vote = my_votes.get(&image.id).copied();
                GalleryEntry { image, my_vote }
            })
            .collect())
    }

    /// Vote on an image as the signed-in user
    ///
    /// Repeating a vote is a no-op; voting the other way moves the vote.
    pub fn vote(&self, image_id: &str, vote: Vote) -> Result<GalleryEntry> {
        let session = self.session.require()?;
        let voter = session.identity().id.clone();
        let mut state = self.load()?;

        let previous = state
            .votes
            .get(&voter)
            .and_then(|votes| votes.get(image_id))
            .copied();

        let image = state
            .images
            .iter_mut()
            .find(|img| img.id == image_id)
            .ok_or_else(|| Error::not_found(format!("image '{}'", image_id)))?;

        if previous == Some(vote) {
            return Ok(GalleryEntry {
                image: image.clone(),
                my_vote: previous,
            });
        }

        image.apply_vote(previous, vote);
        let entry = GalleryEntry {
            image: image.clone(),
            my_vote: Some(vote),
        };

        state
            .votes
            .entry(voter)
            .or_default()
            .insert(image_id.to_string(), vote);
        store_json(self.store.as_ref(), GALLERY_SLOT, &state)?;

        Ok(entry)
    }

    fn load(&self) -> Result<GalleryState> {
        Ok(load_json(self.store.as_ref(), GALLERY_SLOT)?.unwrap_or_else(|| GalleryState {
            images: generate_demo_gallery(),
            votes: HashMap::new(),
        }))
    }
}
