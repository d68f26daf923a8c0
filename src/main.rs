mod cli;

use cli::Cli;
use game_finder::bgg::HttpTransport;
use game_finder::finder::{self, Message, Thumbnails};
use game_finder::thumbs::{self, ThumbnailStore};
use game_finder::{Game, Query};
use structopt::StructOpt;
use failure::Error;
use exitfailure::ExitFailure;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use tracing_subscriber::EnvFilter;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::io::Write;

fn main() -> Result<(), ExitFailure> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::from_args();
    match cli {
        Cli::New { } => create_structure()?,
        Cli::Recommend { username, players, best_only, hide_played,
                min_complexity, max_complexity, json } => {
            let mut query = Query::new(&username, players)?;
            query.best_only = best_only;
            query.hide_played = hide_played;
            query.min_complexity = min_complexity;
            query.max_complexity = max_complexity;
            recommend(&query, json)?
        }
    }
    Ok(())
}

fn create_structure() -> Result<(), Error> {
    finder::create_structure()?;
    println!("Created initial structure files.");
    Ok(())
}

fn recommend(query: &Query, json: bool) -> Result<(), Error> {
    // Cancellation token
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    // Bind cancellation token with ctrl+c command
    ctrlc::set_handler(move || {
         r.store(false, Ordering::SeqCst);
    })?;
    let config = finder::config()?;
    let transport = HttpTransport::new();
    let client = config.client(transport.clone(), running.clone());
    let store = config.thumbnails.as_ref().map(|dir| ThumbnailStore::new(dir, transport.clone()));
    let thumbnails = store.as_ref().map(|store| Thumbnails {
        store,
        threads: config.threads,
        running: running.clone()
    });

    let mut stderr = StandardStream::stderr(ColorChoice::Auto);
    let mut failed_thumbnails: u32 = 0;
    let games = finder::recommend(&client, query, thumbnails, |m| match m {
        Message::NoteCollection(n) => {
            stderr.set_color(ColorSpec::new().set_fg(Some(Color::Green))).unwrap();
            writeln!(&mut stderr, "Found {} games in collection.", n).unwrap();
        },
        Message::NoteGames(n) => {
            stderr.set_color(ColorSpec::new().set_fg(Some(Color::Green))).unwrap();
            writeln!(&mut stderr, "Got details on {} games.", n).unwrap();
        },
        Message::NoteThumbnail(thumbs::Message::Failed(id, error)) => {
            failed_thumbnails += 1;
            stderr.set_color(ColorSpec::new().set_fg(Some(Color::Red))).unwrap();
            writeln!(&mut stderr, "No thumbnail for {}: {}", id, error).unwrap();
        },
        _ => {}
    })?;
    stderr.reset()?;
    if failed_thumbnails > 0 {
        println!("{} thumbnails could not be saved.", failed_thumbnails);
    }

    match games {
        Some(ref games) if !games.is_empty() => print_games(games, json),
        _ => {
            println!("Could not find games for {} :(", query.username);
            Ok(())
        }
    }
}

fn print_games(games: &[Game], json: bool) -> Result<(), Error> {
    if json {
        println!("{}", serde_json::to_string_pretty(games)?);
        return Ok(());
    }
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    stdout.set_color(ColorSpec::new().set_bold(true))?;
    writeln!(&mut stdout, "Id\tName\tRating\tComplexity\tPlayers\tBest with")?;
    stdout.reset()?;
    for game in games {
        let best: Vec<String> = game.best_players.iter().map(|p| p.to_string()).collect();
        writeln!(&mut stdout, "{}\t{}\t{:.2}\t{:.2}\t{}-{}\t{}",
            game.id, game.name, game.rating, game.complexity,
            game.min_players, game.max_players, best.join(","))?;
    }
    Ok(())
}
