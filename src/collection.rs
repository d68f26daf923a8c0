use crate::bgg::{BggError, CatalogClient, Transport};
use crate::GameId;
use failure::{bail, Error, ResultExt};
use select::document::Document;
use select::predicate::Name;
use tracing::info;

/// Ids of the games `username` owns, in bgg order. With `hide_played`
/// anything the user has logged a play of is left out.
pub fn get_collection<T: Transport>(client: &CatalogClient<T>, username: &str,
        hide_played: bool) -> Result<Vec<GameId>, Error> {
    let query = format!("collection?username={}&own=1", username);
    let body = client.query(&query)?;
    let doc = Document::from(body.as_str());
    if let Some(message) = doc.find(Name("error")).flat_map(|e| e.find(Name("message"))).next() {
        // bgg answers 200 with an error document for unknown users
        let text = message.text();
        info!(username, message = text.trim(), "BGG refused collection");
        return Err(BggError::NotFound { query, code: 200 }.into());
    }
    let ids = filter_ids(&doc, hide_played)
        .with_context(|_| format!("could not read collection of `{}`", username))?;
    info!(username, games = ids.len(), "Got collection");
    Ok(ids)
}

fn filter_ids(doc: &Document, hide_played: bool) -> Result<Vec<GameId>, Error> {
    let mut ids = Vec::new();
    for item in doc.find(Name("item")) {
        let id = match item.attr("objectid") {
            Some(id) => id.parse::<GameId>()?,
            None => bail!("Can't find object id of a collection item")
        };
        let plays = match item.find(Name("numplays")).next() {
            Some(n) => n.text().trim().parse::<u32>()?,
            None => 0
        };
        if hide_played && plays != 0 {
            continue;
        }
        ids.push(id);
    }
    Ok(ids)
}
