use learn_core::model::{PhaseId, Resolution};
use services::{AppServices, Clock, NavOutcome, NavigationController};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod args;
mod render;

use args::{Args, ArgsError, Command, EnvDefaults, TopicRef, print_usage};

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();
}

fn show_navigation(app: &AppServices, nav: &NavigationController, outcome: &NavOutcome) {
    if let Some(line) = render::outcome(outcome) {
        println!("{line}\n");
    }
    match nav.current() {
        Some(view) => print!("{}", render::topic(&view)),
        None => print!(
            "{}",
            render::overview(&app.overview(), app.progress().theme())
        ),
    }
}

fn complete(app: &AppServices, nav: &mut NavigationController, topic: Option<TopicRef>) {
    let Some(topic) = topic else {
        nav.resume();
        match nav.complete_current() {
            Some(true) => println!("Marked step {} complete.", app.progress().current_step()),
            Some(false) => println!("Already complete."),
            None => println!("Nothing to complete: the learning path is empty."),
        }
        return;
    };

    let catalog = app.catalog();
    let sequence = catalog.flatten();
    let resolution = match &topic {
        TopicRef::Address(address) => sequence.resolve(address),
        TopicRef::Id(id) => sequence.resolve_topic(id),
    };
    let Some(entry) = resolution.index().and_then(|index| sequence.get(index)) else {
        println!("No such topic. Run `learn path` to list topics.");
        return;
    };

    if app.progress().complete_module(entry.topic().id().clone()) {
        println!("Marked {} complete.", entry.address());
    } else {
        println!("{} is already complete.", entry.address());
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let parsed = Args::parse(std::env::args().skip(1), EnvDefaults::from_env()).map_err(
        |e: ArgsError| {
            eprintln!("{e}");
            print_usage();
            e
        },
    )?;

    if parsed.command == Command::Help {
        print_usage();
        return Ok(());
    }

    prepare_sqlite_file(&parsed.db_url)?;
    let app = AppServices::new_sqlite(&parsed.db_url, &parsed.catalog, Clock::default()).await?;
    debug!(db = %parsed.db_url, command = ?parsed.command, "services ready");

    let mut nav = app.navigator();
    match parsed.command {
        Command::Path => print!(
            "{}",
            render::overview(&app.overview(), app.progress().theme())
        ),
        Command::Current => {
            let outcome = nav.resume();
            show_navigation(&app, &nav, &outcome);
        }
        Command::Open(TopicRef::Address(address)) => {
            let outcome = nav.open(&address);
            show_navigation(&app, &nav, &outcome);
        }
        Command::Open(TopicRef::Id(id)) => {
            let catalog = app.catalog();
            let sequence = catalog.flatten();
            let address = match sequence.resolve_topic(&id) {
                Resolution::Found(index) => sequence.get(index).map(|t| t.address()),
                Resolution::NotFound => None,
            };
            let outcome = match address {
                Some(address) => nav.open(&address),
                // A bare word that names no topic is tried as a phase.
                None => nav.open_phase(&PhaseId::new(id.as_str())?),
            };
            show_navigation(&app, &nav, &outcome);
        }
        Command::Next => {
            nav.resume();
            let outcome = nav.next();
            show_navigation(&app, &nav, &outcome);
        }
        Command::Prev => {
            nav.resume();
            let outcome = nav.previous();
            show_navigation(&app, &nav, &outcome);
        }
        Command::Complete(topic) => complete(&app, &mut nav, topic),
        Command::Theme => {
            let theme = app.progress().toggle_theme();
            println!("Theme is now {}.", theme.as_str());
        }
        Command::Reset => {
            app.progress().reset();
            println!("Progress cleared.");
        }
        Command::Help => print_usage(),
    }

    app.progress().flush().await;
    Ok(())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
