//! Game settings served behind the response cache.

use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Game {
    pub name: String,
    pub slug: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSettings {
    pub game: Game,
    pub betrates: Vec<u32>,
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("unknown game `{0}`")]
    UnknownGame(String),
}

/// Read-only catalog of game settings keyed by slug.
#[derive(Debug, Clone)]
pub struct SettingsService {
    games: HashMap<String, GameSettings>,
}

impl SettingsService {
    pub fn new(games: impl IntoIterator<Item = GameSettings>) -> Self {
        Self {
            games: games
                .into_iter()
                .map(|settings| (settings.game.slug.clone(), settings))
                .collect(),
        }
    }

    /// Catalog containing the built-in blackjack table.
    pub fn with_defaults() -> Self {
        Self::new([GameSettings {
            game: Game {
                name: "Blackjack".to_string(),
                slug: "blackjack".to_string(),
                description: "The classic casino game".to_string(),
            },
            betrates: vec![1, 2, 3, 4, 5],
        }])
    }

    pub fn find(&self, slug: &str) -> Result<&GameSettings, SettingsError> {
        self.games
            .get(slug)
            .ok_or_else(|| SettingsError::UnknownGame(slug.to_string()))
    }
}

impl Default for SettingsService {
    fn default() -> Self {
        Self::with_defaults()
    }
}
