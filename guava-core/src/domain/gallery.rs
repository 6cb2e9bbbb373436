//! Gallery domain model - community images and votes

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::result::Error;

/// Direction of a vote on a gallery image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vote {
    Up,
    Down,
}

impl Vote {
    pub fn as_str(&self) -> &'static str {
        match self {
            Vote::Up => "up",
            Vote::Down => "down",
        }
    }
}

impl fmt::Display for Vote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Vote {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "up" | "upvote" | "+" => Ok(Vote::Up),
            "down" | "downvote" | "-" => Ok(Vote::Down),
            other => Err(Error::validation(format!(
                "unknown vote '{}', expected 'up' or 'down'",
                other
            ))),
        }
    }
}

/// A community-submitted image with its vote tallies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryImage {
    pub id: String,
    pub src: String,
    pub label: String,
    pub upvotes: u64,
    pub downvotes: u64,
}

impl GalleryImage {
    pub fn new(
        id: impl Into<String>,
        src: impl Into<String>,
        label: impl Into<String>,
        upvotes: u64,
        downvotes: u64,
    ) -> Self {
        Self {
            id: id.into(),
            src: src.into(),
            label: label.into(),
            upvotes,
            downvotes,
        }
    }

    /// Net score (upvotes minus downvotes)
    pub fn score(&self) -> i64 {
        self.upvotes as i64 - self.downvotes as i64
    }

    /// Apply a voter's new vote given their previous one
    ///
    /// Repeating the same vote changes nothing. Switching direction moves
    /// the voter's single vote from one tally to the other.
    pub fn apply_vote(&mut self, previous: Option<Vote>, next: Vote) {
        if previous == Some(next) {
            return;
        }
        match previous {
            Some(Vote::Up) => self.upvotes = self.upvotes.saturating_sub(1),
            Some(Vote::Down) => self.downvotes = self.downvotes.saturating_sub(1),
            None => {}
        }
        match next {
            Vote::Up => self.upvotes += 1,
            Vote::Down => self.downvotes += 1,
        }
    }
}
