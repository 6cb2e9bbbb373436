//! Upload domain model - image submissions and upload history
//!
//! Submissions are validated as a whole so every failing field can be
//! reported at once. Free-text fields are sanitized (HTML tags stripped,
//! whitespace trimmed) before validation and storage.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::result::Error;

/// Largest accepted image, in bytes (5 MB)
pub const MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

/// Coins credited when an upload is approved
pub const UPLOAD_REWARD_COINS: u64 = 1;

/// Review state of an upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    Approved,
    Pending,
    Rejected,
}

impl UploadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadStatus::Approved => "approved",
            UploadStatus::Pending => "pending",
            UploadStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Image categories offered on the upload form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Food & Cuisine")]
    FoodCuisine,
    #[serde(rename = "Markets & Commerce")]
    MarketsCommerce,
    #[serde(rename = "Architecture")]
    Architecture,
    #[serde(rename = "Nature & Wildlife")]
    NatureWildlife,
    #[serde(rename = "People & Culture")]
    PeopleCulture,
    #[serde(rename = "Transportation")]
    Transportation,
    #[serde(rename = "Arts & Crafts")]
    ArtsCrafts,
    #[serde(rename = "Other")]
    Other,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::FoodCuisine,
        Category::MarketsCommerce,
        Category::Architecture,
        Category::NatureWildlife,
        Category::PeopleCulture,
        Category::Transportation,
        Category::ArtsCrafts,
        Category::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::FoodCuisine => "Food & Cuisine",
            Category::MarketsCommerce => "Markets & Commerce",
            Category::Architecture => "Architecture",
            Category::NatureWildlife => "Nature & Wildlife",
            Category::PeopleCulture => "People & Culture",
            Category::Transportation => "Transportation",
            Category::ArtsCrafts => "Arts & Crafts",
            Category::Other => "Other",
        }
    }

    /// Command-line friendly name, e.g. "food-cuisine"
    pub fn slug(&self) -> String {
        self.label()
            .to_lowercase()
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("-")
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = Error;

    /// Accepts either the display label (case-insensitive) or the slug
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.label().to_lowercase() == wanted || c.slug() == wanted)
            .ok_or_else(|| Error::validation(format!("unknown category '{}'", s.trim())))
    }
}

/// Accepted image encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpeg,
    Png,
}

impl ImageFormat {
    /// Detect the format from the file's leading magic bytes
    pub fn detect(bytes: &[u8]) -> Option<Self> {
        const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];
        const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

        if bytes.starts_with(JPEG_MAGIC) {
            Some(ImageFormat::Jpeg)
        } else if bytes.starts_with(PNG_MAGIC) {
            Some(ImageFormat::Png)
        } else {
            None
        }
    }

    /// Map a file name's extension to a format
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let ext = file_name.rsplit_once('.')?.1.to_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "png" => Some(ImageFormat::Png),
            _ => None,
        }
    }
}

/// Raw image picked for upload
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Format when the extension and the content agree, None otherwise
    pub fn format(&self) -> Option<ImageFormat> {
        let by_name = ImageFormat::from_file_name(&self.file_name)?;
        let by_content = ImageFormat::detect(&self.bytes)?;
        (by_name == by_content).then_some(by_content)
    }

    /// SHA-256 of the file content, hex encoded
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&self.bytes);
        hex::encode(hasher.finalize())
    }
}

/// A single failing field on the upload form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Strip HTML tags and surrounding whitespace from user input
pub fn sanitize_input(input: &str) -> String {
    let tag_re = Regex::new(r"<[^>]*>?").unwrap();
    tag_re.replace_all(input, "").trim().to_string()
}

/// Everything the contributor filled in on the upload form
#[derive(Debug, Clone, Default)]
pub struct UploadSubmission {
    pub file: Option<ImageFile>,
    pub name: String,
    pub category: Option<Category>,
    pub description: String,
    pub location: String,
    pub consent: bool,
}

impl UploadSubmission {
    /// Copy of this submission with all free-text fields sanitized
    pub fn sanitized(&self) -> Self {
        Self {
            file: self.file.clone(),
            name: sanitize_input(&self.name),
            category: self.category,
            description: sanitize_input(&self.description),
            location: sanitize_input(&self.location),
            consent: self.consent,
        }
    }

    /// Validate the form, returning every failing field
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        match &self.file {
            None => errors.push(FieldError::new("file", "Please upload an image")),
            Some(file) => {
                if file.format().is_none() {
                    errors.push(FieldError::new("file", "Please upload a JPEG or PNG image"));
                } else if file.size() > MAX_FILE_SIZE {
                    errors.push(FieldError::new("file", "File size must be less than 5MB"));
                }
            }
        }

        if sanitize_input(&self.name).is_empty() {
            errors.push(FieldError::new("imageName", "Image name is required"));
        }

        if !self.consent {
            errors.push(FieldError::new("consent", "You must agree to the terms"));
        }

        errors
    }
}

/// An entry in the contributor's upload history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadRecord {
    pub id: String,
    pub name: String,
    pub date: NaiveDate,
    pub coins: u64,
    pub status: UploadStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Content hash used to reject duplicate uploads
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
}

impl UploadRecord {
    /// Historical record without form details
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        date: NaiveDate,
        coins: u64,
        status: UploadStatus,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            date,
            coins,
            status,
            category: None,
            description: None,
            location: None,
            fingerprint: None,
        }
    }

    /// Record for an approved submission (expects a sanitized submission)
    pub fn approved(id: impl Into<String>, submission: &UploadSubmission, date: NaiveDate) -> Self {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
        Self {
            id: id.into(),
            name: submission.name.clone(),
            date,
            coins: UPLOAD_REWARD_COINS,
            status: UploadStatus::Approved,
            category: submission.category,
            description: non_empty(&submission.description),
            location: non_empty(&submission.location),
            fingerprint: submission.file.as_ref().map(|f| f.fingerprint()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];
    const JPEG_HEADER: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0, 0x10];

    fn valid_submission() -> UploadSubmission {
        UploadSubmission {
            file: Some(ImageFile::new("market.png", PNG_HEADER.to_vec())),
            name: "Makola Market".to_string(),
            category: Some(Category::MarketsCommerce),
            description: String::new(),
            location: "Accra".to_string(),
            consent: true,
        }
    }

    #[test]
    fn test_valid_submission_has_no_errors() {
        assert!(valid_submission().validate().is_empty());
    }

    #[test]
    fn test_empty_submission_reports_every_field() {
        let errors = UploadSubmission::default().validate();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["file", "imageName", "consent"]);
        assert_eq!(errors[0].message, "Please upload an image");
    }

    #[test]
    fn test_rejects_wrong_type() {
        let mut submission = valid_submission();
        submission.file = Some(ImageFile::new("notes.gif", b"GIF89a".to_vec()));
        let errors = submission.validate();
        assert_eq!(errors, vec![FieldError::new("file", "Please upload a JPEG or PNG image")]);

        // Extension says JPEG, content says PNG
        submission.file = Some(ImageFile::new("market.jpg", PNG_HEADER.to_vec()));
        assert_eq!(submission.validate().len(), 1);
    }

    #[test]
    fn test_rejects_oversized_file() {
        let mut bytes = JPEG_HEADER.to_vec();
        bytes.resize(MAX_FILE_SIZE as usize + 1, 0);
        let mut submission = valid_submission();
        submission.file = Some(ImageFile::new("big.jpeg", bytes));
        let errors = submission.validate();
        assert_eq!(errors, vec![FieldError::new("file", "File size must be less than 5MB")]);
    }

    #[test]
    fn test_exactly_max_size_is_accepted() {
        let mut bytes = JPEG_HEADER.to_vec();
        bytes.resize(MAX_FILE_SIZE as usize, 0);
        let mut submission = valid_submission();
        submission.file = Some(ImageFile::new("edge.JPG", bytes));
        assert!(submission.validate().is_empty());
    }

    #[test]
    fn test_name_of_only_markup_is_required() {
        let mut submission = valid_submission();
        submission.name = "  <b></b> ".to_string();
        let errors = submission.validate();
        assert_eq!(errors, vec![FieldError::new("imageName", "Image name is required")]);
    }

    #[test]
    fn test_sanitize_input() {
        assert_eq!(sanitize_input("  <script>alert(1)</script>Kente "), "alert(1)Kente");
        assert_eq!(sanitize_input("Street <i>Food"), "Street Food");
        assert_eq!(sanitize_input("trailing <b"), "trailing");
    }

    #[test]
    fn test_category_parsing() {
        assert_eq!("Food & Cuisine".parse::<Category>().unwrap(), Category::FoodCuisine);
        assert_eq!("arts-crafts".parse::<Category>().unwrap(), Category::ArtsCrafts);
        assert_eq!("other".parse::<Category>().unwrap(), Category::Other);
        assert!("pets".parse::<Category>().is_err());
        assert_eq!(Category::NatureWildlife.slug(), "nature-wildlife");
    }

    #[test]
    fn test_approved_record_from_submission() {
        let submission = valid_submission().sanitized();
        let date = NaiveDate::from_ymd_opt(2025, 1, 11).unwrap();
        let record = UploadRecord::approved("abc", &submission, date);
        assert_eq!(record.status, UploadStatus::Approved);
        assert_eq!(record.coins, UPLOAD_REWARD_COINS);
        assert_eq!(record.description, None);
        assert_eq!(record.location.as_deref(), Some("Accra"));
        assert_eq!(record.fingerprint.as_ref().map(|f| f.len()), Some(64));
    }
}
