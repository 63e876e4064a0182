use serde::{Deserialize, Serialize};

use crate::model::ids::GameId;

//
// ─── BROWSE LIST ENTITIES ──────────────────────────────────────────────────────
//

/// A published game as it appears in the browse list.
///
/// `is_liked` and `total_liked` are the fields subject to optimistic
/// mutation; the server remains the source of truth for both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub id: GameId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub thumbnail_image: Option<String>,
    #[serde(rename = "game_template_name")]
    pub template_name: String,
    #[serde(rename = "game_template_slug")]
    pub template_slug: String,
    #[serde(default)]
    pub creator_name: String,
    #[serde(default)]
    pub total_liked: u32,
    #[serde(default)]
    pub total_played: u32,
    #[serde(rename = "is_game_liked", default)]
    pub is_liked: bool,
}

impl GameSummary {
    /// Set the liked flag, keeping `total_liked` consistent with it.
    ///
    /// A no-op when the flag already has the desired value, so applying the
    /// same speculative transform twice cannot double-count. The count
    /// saturates at zero.
    pub fn set_liked(&mut self, liked: bool) {
        if self.is_liked == liked {
            return;
        }
        self.is_liked = liked;
        self.total_liked = if liked {
            self.total_liked.saturating_add(1)
        } else {
            self.total_liked.saturating_sub(1)
        };
    }
}

/// Catalog entry for a game template (quiz, anagram, ...). Drives the
/// type filter in the browse view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameTemplate {
    pub id: GameId,
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

//
// ─── CREATOR PROJECTS ──────────────────────────────────────────────────────────
//

/// A creator-owned draft or published game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: GameId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub thumbnail_image: Option<String>,
    pub is_published: bool,
    #[serde(rename = "game_template_slug")]
    pub template_slug: String,
}

impl Project {
    pub fn set_published(&mut self, published: bool) {
        self.is_published = published;
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
