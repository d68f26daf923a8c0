use crate::Game;

/// What a game must satisfy to be recommended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Criteria {
    pub players: u32,
    pub best_only: bool,
    pub min_complexity: f64,
    pub max_complexity: f64
}

impl Criteria {
    pub fn accepts(&self, game: &Game) -> bool {
        if game.min_players > self.players || game.max_players < self.players {
            return false;
        }
        if self.best_only && !game.best_players.contains(&self.players) {
            return false;
        }
        self.min_complexity <= game.complexity && game.complexity <= self.max_complexity
    }
}

/// Games playable under `criteria`, best rated first. Equal ratings
/// keep the order they came in.
pub fn filter_games(games: &[Game], criteria: &Criteria) -> Vec<Game> {
    let mut picked: Vec<Game> = games.iter()
        .filter(|g| criteria.accepts(g))
        .cloned()
        .collect();
    picked.sort_by(|a, b| b.rating.total_cmp(&a.rating));
    picked
}
