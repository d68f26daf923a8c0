use structopt::StructOpt;

#[derive(Debug, StructOpt)]
/// Finds games from your bgg collection
/// worth playing tonight.
pub enum Cli {
    #[structopt(name = "new")]
    /// Creates new .config file and thumbnail folder.
    New { },
    #[structopt(name = "recommend")]
    /// Lists owned games that fit the player count,
    /// best rated first.
    Recommend {
        /// BGG username.
        username: String,
        #[structopt(short = "p", long = "players")]
        /// Number of players.
        players: u32,
        #[structopt(long = "best")]
        /// Only games the community rates best at this count.
        best_only: bool,
        #[structopt(long = "hide-played")]
        /// Skip games with logged plays.
        hide_played: bool,
        #[structopt(long = "min-complexity", default_value = "0")]
        min_complexity: f64,
        #[structopt(long = "max-complexity", default_value = "5")]
        max_complexity: f64,
        #[structopt(long = "json")]
        /// Print games as json.
        json: bool
    }
}
