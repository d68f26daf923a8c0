use crate::bgg::{CatalogClient, Transport};
use crate::poll::{best_player_counts, PollEntry};
use crate::{Game, GameId};
use failure::{bail, format_err, Error, ResultExt};
use select::document::Document;
use select::node::Node;
use select::predicate::{Attr, Name, Predicate};
use std::slice::Chunks;
use tracing::debug;

/// Max number of ids bgg accepts in one thing request.
pub const IDS_PER_QUERY: usize = 750;

/// Fetches every game in `ids`, one request per batch, in order.
/// Any failed batch fails the whole fetch.
pub fn get_games<T: Transport>(client: &CatalogClient<T>, ids: &[GameId]) -> Result<Vec<Game>, Error> {
    let mut games = Vec::with_capacity(ids.len());
    for batch in ThingBatches::new(client, ids) {
        // Error will be elevated and next() will be never called again
        games.extend(batch?);
    }
    Ok(games)
}

pub struct ThingBatches<'a, T> {
    client: &'a CatalogClient<T>,
    chunks: Chunks<'a, GameId>,
    batch: usize
}

impl<'a, T: Transport> ThingBatches<'a, T> {
    pub fn new(client: &'a CatalogClient<T>, ids: &'a [GameId]) -> ThingBatches<'a, T> {
        ThingBatches { client, chunks: ids.chunks(IDS_PER_QUERY), batch: 0 }
    }
}

impl<'a, T: Transport> Iterator for ThingBatches<'a, T> {
    type Item = Result<Vec<Game>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let ids = self.chunks.next()?;
        self.batch += 1;
        debug!(batch = self.batch, size = ids.len(), "fetching game batch");
        Some(get_batch(self.client, ids))
    }
}

fn get_batch<T: Transport>(client: &CatalogClient<T>, ids: &[GameId]) -> Result<Vec<Game>, Error> {
    let body = client.query(&thing_query(ids))?;
    filter_games(&Document::from(body.as_str()))
}

fn thing_query(ids: &[GameId]) -> String {
    let ids: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
    format!("thing?id={}&type=boardgame,boardgameexpansion&stats=1", ids.join(","))
}

fn filter_games(doc: &Document) -> Result<Vec<Game>, Error> {
    let mut games = Vec::new();
    for item in doc.find(Name("item")) {
        let id = match item.attr("id") {
            Some(id) => id.parse::<GameId>()?,
            None => bail!("Can't find id of a game")
        };
        let game = parse_game(id, &item).with_context(|_| format!("could not parse game {}", id))?;
        games.push(game);
    }
    Ok(games)
}

fn parse_game(id: GameId, item: &Node) -> Result<Game, Error> {
    let name = item.find(Name("name").and(Attr("type", "primary"))).next()
        .or_else(|| item.find(Name("name")).next())
        .and_then(|n| n.attr("value"))
        .ok_or_else(|| format_err!("Can't find name."))?;
    let thumbnail = item.find(Name("thumbnail")).next()
        .map(|t| t.text().trim().to_string())
        .filter(|t| !t.is_empty());
    let description = item.find(Name("description")).next()
        .map(|d| strip_tags(&d.text()))
        .unwrap_or_default();
    let min_players = value_of(item, "minplayers")?.parse::<u32>()?;
    let max_players = value_of(item, "maxplayers")?.parse::<u32>()?;
    let rating = value_of(item, "average")?.parse::<f64>()?;
    let complexity = value_of(item, "averageweight")?.parse::<f64>()?;
    let best_players = best_player_counts(&player_poll(item)?, min_players, max_players);

    Ok(Game {
        id,
        name: name.to_string(),
        thumbnail,
        description,
        min_players,
        max_players,
        best_players,
        rating,
        complexity
    })
}

fn value_of<'a>(item: &Node<'a>, tag: &str) -> Result<&'a str, Error> {
    match item.find(Name(tag)).next().and_then(|n| n.attr("value")) {
        Some(v) => Ok(v),
        None => bail!("Can't find {}.", tag)
    }
}

/// "Best" votes of the suggested_numplayers poll, in bgg order.
fn player_poll(item: &Node) -> Result<Vec<PollEntry>, Error> {
    let poll = match item.find(Name("poll").and(Attr("name", "suggested_numplayers"))).next() {
        Some(p) => p,
        None => return Ok(Vec::new())
    };
    let mut entries = Vec::new();
    for results in poll.find(Name("results")) {
        let label = match results.attr("numplayers") {
            Some(l) => l,
            None => continue
        };
        let votes = match results.find(Name("result").and(Attr("value", "Best"))).next()
                .and_then(|r| r.attr("numvotes")) {
            Some(v) => v.parse::<u32>()?,
            None => bail!("Can't find best votes for {} players.", label)
        };
        entries.push(PollEntry::new(label, votes));
    }
    Ok(entries)
}

/// Descriptions come entity encoded, once decoded they are html.
/// Keeps only the text, whitespace collapsed.
fn strip_tags(html: &str) -> String {
    let doc = Document::from(html);
    let text: String = doc.find(Name("body")).map(|b| b.text()).collect();
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
