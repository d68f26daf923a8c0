use crate::bgg::{Response, Transport};
use failure::{bail, Error};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Scripted transport: hands out queued responses in order and
/// remembers every url asked for.
#[derive(Clone, Default)]
pub struct FakeTransport {
    responses: Arc<Mutex<VecDeque<Response>>>,
    requests: Arc<Mutex<Vec<String>>>
}

impl FakeTransport {
    pub fn new(responses: Vec<Response>) -> FakeTransport {
        FakeTransport {
            responses: Arc::new(Mutex::new(responses.into_iter().collect())),
            requests: Arc::new(Mutex::new(Vec::new()))
        }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for FakeTransport {
    fn get(&self, url: &str) -> Result<Response, Error> {
        self.requests.lock().unwrap().push(url.to_string());
        match self.responses.lock().unwrap().pop_front() {
            Some(resp) => Ok(resp),
            None => bail!("no response queued for {}", url)
        }
    }
}

pub fn ok(body: &str) -> Response {
    Response { status: 200, body: body.as_bytes().to_vec() }
}

pub fn status(code: u16) -> Response {
    Response { status: code, body: Vec::new() }
}

/// One `thing` item the way bgg renders it with stats=1.
pub fn thing_item(id: u32, name: &str, min: u32, max: u32, rating: f64, weight: f64) -> String {
    format!(r#"<item type="boardgame" id="{id}">
        <thumbnail>https://cf.geekdo-images.com/{id}_t.jpg</thumbnail>
        <image>https://cf.geekdo-images.com/{id}.jpg</image>
        <name type="primary" sortindex="1" value="{name}" />
        <name type="alternate" sortindex="1" value="{name} Alt" />
        <description>A game about {name}.</description>
        <yearpublished value="2001" />
        <minplayers value="{min}" />
        <maxplayers value="{max}" />
        <poll name="suggested_numplayers" title="User Suggested Number of Players" totalvotes="20">
            <results numplayers="2">
                <result value="Best" numvotes="10" />
                <result value="Recommended" numvotes="5" />
                <result value="Not Recommended" numvotes="1" />
            </results>
            <results numplayers="3">
                <result value="Best" numvotes="12" />
                <result value="Recommended" numvotes="3" />
                <result value="Not Recommended" numvotes="0" />
            </results>
            <results numplayers="3+">
                <result value="Best" numvotes="40" />
                <result value="Recommended" numvotes="0" />
                <result value="Not Recommended" numvotes="0" />
            </results>
        </poll>
        <poll name="suggested_playerage" title="User Suggested Player Age" totalvotes="3">
            <results>
                <result value="2" numvotes="99" />
            </results>
        </poll>
        <link type="boardgamecategory" id="1021" value="Economic" />
        <statistics page="1">
            <ratings>
                <usersrated value="100" />
                <average value="{rating}" />
                <bayesaverage value="5.5" />
                <averageweight value="{weight}" />
            </ratings>
        </statistics>
    </item>"#, id = id, name = name, min = min, max = max, rating = rating, weight = weight)
}

pub fn things(items: &[String]) -> String {
    format!(r#"<?xml version="1.0" encoding="utf-8"?><items termsofuse="https://boardgamegeek.com/xmlapi/termsofuse">{}</items>"#,
        items.concat())
}

/// A collection item; `plays` None leaves numplays out.
pub fn collection_item(id: u32, plays: Option<u32>) -> String {
    let plays = match plays {
        Some(n) => format!("<numplays>{}</numplays>", n),
        None => String::new()
    };
    format!(r#"<item objecttype="thing" objectid="{id}" subtype="boardgame" collid="9{id}">
        <name sortindex="1">Game {id}</name>
        <yearpublished>2001</yearpublished>
        <status own="1" prevowned="0" fortrade="0" want="0" lastmodified="2020-01-01 00:00:00" />
        {plays}
    </item>"#, id = id, plays = plays)
}

pub fn collection(items: &[String]) -> String {
    format!(r#"<?xml version="1.0" encoding="utf-8" standalone="yes"?><items totalitems="{}" termsofuse="https://boardgamegeek.com/xmlapi/termsofuse">{}</items>"#,
        items.len(), items.concat())
}
