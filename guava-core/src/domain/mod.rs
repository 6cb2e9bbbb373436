//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with validation logic - no I/O or external dependencies.

mod gallery;
mod identity;
mod session;
pub mod result;
pub mod upload;
pub mod wallet;

pub use gallery::{GalleryImage, Vote};
pub use identity::Identity;
pub use session::{Session, SessionSnapshot};
pub use upload::{
    Category, FieldError, ImageFile, ImageFormat, UploadRecord, UploadStatus, UploadSubmission,
};
pub use wallet::{WalletSummary, WithdrawalReceipt};
