//! Core data types for the recipe catalog.
//!
//! A recipe is mostly opaque: only the identifier and the two vote
//! counters are interpreted, every other field is carried through
//! untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field holding the upvote counter
pub const UP_VOTES_FIELD: &str = "upVotes";

/// Field holding the downvote counter
pub const DOWN_VOTES_FIELD: &str = "downVotes";

/// A single recipe document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    /// Externally supplied identity, also used as the primary key
    pub id: String,

    #[serde(rename = "upVotes", default)]
    pub up_votes: i64,

    #[serde(rename = "downVotes", default)]
    pub down_votes: i64,

    /// Descriptive fields (title, image, ingredients, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Recipe {
    /// Create a recipe with no votes and no descriptive fields
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            up_votes: 0,
            down_votes: 0,
            extra: Map::new(),
        }
    }

    /// Attach a descriptive field
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Increment the counter for `direction` by one
    pub fn record_vote(&mut self, direction: VoteDirection) {
        match direction {
            VoteDirection::Up => self.up_votes += 1,
            VoteDirection::Down => self.down_votes += 1,
        }
    }
}

/// Which counter a vote increments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteDirection {
    Up,
    Down,
}

impl VoteDirection {
    /// Document field incremented by this vote
    pub fn field(self) -> &'static str {
        match self {
            VoteDirection::Up => UP_VOTES_FIELD,
            VoteDirection::Down => DOWN_VOTES_FIELD,
        }
    }

    /// Path segment used by the HTTP API
    pub fn as_str(self) -> &'static str {
        match self {
            VoteDirection::Up => "up",
            VoteDirection::Down => "down",
        }
    }
}

/// Outcome of a bulk load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    /// Records handed to the store
    pub submitted: usize,

    /// Records that did not exist before
    pub inserted: usize,

    /// Records skipped because their key already existed
    pub duplicates: usize,
}

/// Error body returned on server-side failures
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub status: u16,
}
