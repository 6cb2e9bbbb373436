//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on a specific use case or feature area.

mod gallery;
pub mod logging;
pub mod migration;
mod session;
mod upload;
mod wallet;

pub use gallery::{GalleryEntry, GalleryService, GALLERY_SLOT};
pub use logging::{LogEntry, LogEvent, LoggingService};
pub use migration::{MigrationResult, MigrationService};
pub use session::{RestoreOutcome, SessionService, SESSION_SLOT, STARTING_COINS};
pub use upload::{UploadOutcome, UploadService, UploadStats, DEFAULT_UPLOAD_LATENCY, UPLOADS_SLOT};
pub use wallet::WalletService;
