//! Demo data and demo identity provider
//!
//! Everything a fresh install shows before any real activity:
//! - the fixed demo identity returned by the simulated Google sign-in
//! - 6 community images with their starting vote tallies
//! - 6 historical uploads for the dashboard

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::result::Result;
use crate::domain::{GalleryImage, Identity, UploadRecord, UploadStatus};
use crate::ports::IdentityProvider;

/// Default simulated sign-in round trip
pub const DEFAULT_SIGN_IN_LATENCY: Duration = Duration::from_millis(1000);

/// The identity every demo sign-in resolves to
pub fn demo_identity() -> Identity {
    Identity::new(
        "1",
        "Kwame Asante",
        "kwame@example.com",
        "/african-male-portrait.jpg",
    )
}

/// Simulated identity provider: waits, then always succeeds
pub struct DemoIdentityProvider {
    latency: Duration,
}

impl DemoIdentityProvider {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

impl Default for DemoIdentityProvider {
    fn default() -> Self {
        Self::new(DEFAULT_SIGN_IN_LATENCY)
    }
}

#[async_trait]
impl IdentityProvider for DemoIdentityProvider {
    fn name(&self) -> &str {
        "demo"
    }

    async fn authenticate(&self) -> Result<Identity> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Ok(demo_identity())
    }
}

/// Generate the seeded community gallery
pub fn generate_demo_gallery() -> Vec<GalleryImage> {
    vec![
        GalleryImage::new("1", "/street-food-vendor-in-ghana.jpg", "Street Food Vendor", 24, 2),
        GalleryImage::new("2", "/bustling-african-marketplace.jpg", "Local Market Scene", 18, 1),
        GalleryImage::new("3", "/colorful-kente-cloth-pattern.jpg", "Kente Cloth Pattern", 45, 3),
        GalleryImage::new(
            "4",
            "/colonial-architecture-building-africa.jpg",
            "Colonial Architecture",
            31,
            5,
        ),
        GalleryImage::new("5", "/african-wildlife-safari-elephant.jpg", "Wildlife Safari", 67, 4),
        GalleryImage::new("6", "/tropical-beach-sunset-africa.jpg", "Beach Sunset", 52, 2),
    ]
}

/// Generate the seeded upload history (newest first)
pub fn generate_demo_uploads() -> Vec<UploadRecord> {
    let day = |d: u32| NaiveDate::from_ymd_opt(2025, 1, d).unwrap_or_default();

    vec![
        UploadRecord::new("1", "Street Food Vendor", day(10), 1, UploadStatus::Approved),
        UploadRecord::new("2", "Local Market Scene", day(9), 1, UploadStatus::Approved),
        UploadRecord::new("3", "Traditional Craft", day(8), 0, UploadStatus::Pending),
        UploadRecord::new("4", "Beach Landscape", day(7), 1, UploadStatus::Approved),
        UploadRecord::new("5", "City Architecture", day(6), 0, UploadStatus::Rejected),
        UploadRecord::new("6", "Wildlife Photo", day(5), 1, UploadStatus::Approved),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_gallery() {
        let gallery = generate_demo_gallery();
        assert_eq!(gallery.len(), 6);
        assert_eq!(gallery[4].label, "Wildlife Safari");
        assert_eq!((gallery[4].upvotes, gallery[4].downvotes), (67, 4));
    }

    #[test]
    fn test_demo_uploads() {
        let uploads = generate_demo_uploads();
        assert_eq!(uploads.len(), 6);
        let approved = uploads.iter().filter(|u| u.status == UploadStatus::Approved).count();
        let earned: u64 = uploads.iter().map(|u| u.coins).sum();
        assert_eq!(approved, 4);
        assert_eq!(earned, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_demo_provider_waits_for_latency() {
        let provider = DemoIdentityProvider::default();
        let start = tokio::time::Instant::now();
        let identity = provider.authenticate().await.unwrap();
        assert!(start.elapsed() >= DEFAULT_SIGN_IN_LATENCY);
        assert_eq!(identity, demo_identity());
    }
}
