pub mod bgg;
pub mod collection;
pub mod filter;
pub mod finder;
pub mod poll;
pub mod things;
pub mod thumbs;

#[cfg(test)]
mod testing;

use failure::{ensure, Error};
use serde_derive::Serialize;
use std::collections::BTreeSet;

pub type GameId = u32; // bgg object id

#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct Game {
    pub id: GameId,
    pub name: String,
    pub thumbnail: Option<String>, // remote url, local copy lives in thumbs
    pub description: String,
    pub min_players: u32,
    pub max_players: u32,
    pub best_players: BTreeSet<u32>, // empty when the poll had no usable votes
    pub rating: f64,
    pub complexity: f64
}

/// Parameters of a single recommendation request.
#[derive(Debug, PartialEq, Clone)]
pub struct Query {
    pub username: String,
    pub players: u32,
    pub best_only: bool,
    pub hide_played: bool,
    pub min_complexity: f64,
    pub max_complexity: f64
}

impl Query {
    /// Builds a query for `username` with the full complexity range,
    /// refusing names bgg would never accept.
    pub fn new(username: &str, players: u32) -> Result<Query, Error> {
        let len = username.chars().count();
        ensure!(len >= 2 && len <= 20, "Username must be 2 to 20 characters long: {}", username);
        ensure!(username.chars().all(|c| c.is_alphanumeric() || c == '_'),
            "Username can only include alphanumeric characters or underscores: {}", username);
        ensure!(players > 0, "Player count must be at least 1.");
        Ok(Query {
            username: username.to_string(),
            players,
            best_only: false,
            hide_played: false,
            min_complexity: 0.0,
            max_complexity: 5.0
        })
    }
}
