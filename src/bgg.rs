use failure::{Error, Fail, ResultExt};
use reqwest::blocking::Client;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

pub const BGG_API: &str = "https://boardgamegeek.com/xmlapi2";
// slice of a retry wait between checks of the running flag
const WAIT_SLICE: Duration = Duration::from_millis(100);

#[derive(Debug, Fail)]
pub enum BggError {
    #[fail(display = "{} not found on BGG. Status: {}", query, code)]
    NotFound { query: String, code: u16 },
    #[fail(display = "Unexpected response from BGG for {}. Status: {}", query, code)]
    UnexpectedResponse { query: String, code: u16 },
    #[fail(display = "BGG is still preparing {} after {} retries", query, attempts)]
    RetriesExhausted { query: String, attempts: u32 },
    #[fail(display = "Request for {} was cancelled", query)]
    Cancelled { query: String }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub body: Vec<u8>
}

impl Response {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    fn is_empty(&self) -> bool {
        self.body.iter().all(u8::is_ascii_whitespace)
    }
}

/// Anything able to GET a url. Only network failures are errors here,
/// statuses are left to the caller.
pub trait Transport {
    fn get(&self, url: &str) -> Result<Response, Error>;
}

#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: Client
}

impl HttpTransport {
    pub fn new() -> HttpTransport {
        HttpTransport { client: Client::new() }
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<Response, Error> {
        let resp = self.client.get(url).send()
            .with_context(|_| format!("could not download page `{}`", url))?;
        let status = resp.status().as_u16();
        let body = resp.bytes()
            .with_context(|_| format!("could not read body of `{}`", url))?
            .to_vec();
        Ok(Response { status, body })
    }
}

pub struct CatalogClient<T> {
    transport: T,
    api: String,
    attempts: u32,
    delay_step: Duration,
    running: Arc<AtomicBool>
}

impl<T: Transport> CatalogClient<T> {
    pub fn new(transport: T, api: &str, attempts: u32, delay_step: Duration,
            running: Arc<AtomicBool>) -> CatalogClient<T> {
        CatalogClient {
            transport,
            api: api.trim_end_matches('/').to_string(),
            attempts,
            delay_step,
            running
        }
    }

    /// Asks BGG for `query` (path relative to the api root) and returns
    /// the body. Empty bodies and 202 mean BGG is preparing the data,
    /// those are retried with a growing delay until attempts run out.
    pub fn query(&self, query: &str) -> Result<String, Error> {
        let url = format!("{}/{}", self.api, query);
        let mut tkn = RegulationToken::new(self.attempts, self.delay_step);
        loop {
            debug!(%url, "asking BGG");
            let resp = self.transport.get(&url)?;
            match resp.status {
                200 if !resp.is_empty() => return Ok(resp.text()),
                200 | 202 => {},
                404 => return Err(BggError::NotFound { query: query.to_string(), code: 404 }.into()),
                code => return Err(BggError::UnexpectedResponse { query: query.to_string(), code }.into())
            }
            tkn.harden();
            if tkn.is_stopped() {
                warn!(query, attempts = self.attempts, "BGG never delivered");
                return Err(BggError::RetriesExhausted { query: query.to_string(), attempts: self.attempts }.into());
            }
            debug!(status = resp.status, delay_ms = tkn.delay().as_millis() as u64, "BGG is busy, retrying");
            self.wait(query, tkn.delay())?;
        }
    }

    /// Sleeps for `delay` unless the running flag drops first.
    fn wait(&self, query: &str, delay: Duration) -> Result<(), Error> {
        let mut left = delay;
        loop {
            if !self.running.load(Ordering::SeqCst) {
                return Err(BggError::Cancelled { query: query.to_string() }.into());
            }
            if left == Duration::from_millis(0) {
                return Ok(());
            }
            let nap = if left < WAIT_SLICE { left } else { WAIT_SLICE };
            thread::sleep(nap);
            left -= nap;
        }
    }
}

struct RegulationToken {
    limit: u32,
    delay_step: Duration,
    i: u32,
}

impl RegulationToken {
    fn new(limit: u32, delay_step: Duration) -> RegulationToken {
        RegulationToken { limit, delay_step, i: 0 }
    }
    fn delay(&self) -> Duration {
        self.delay_step * self.i
    }
    fn is_stopped(&self) -> bool {
        self.i > self.limit
    }
    fn harden(&mut self) -> () {
        self.i += 1;
    }
}
