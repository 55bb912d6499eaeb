use std::fmt;
use std::path::PathBuf;

use learn_core::model::{TopicAddress, TopicId};
use services::CatalogSource;

#[derive(Debug, PartialEq, Eq)]
pub enum ArgsError {
    MissingValue { flag: &'static str },
    MissingTopic { command: &'static str },
    UnknownArg(String),
    UnknownCommand(String),
    InvalidTopic { raw: String },
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingTopic { command } => {
                write!(f, "{command} requires a topic (phase/topic)")
            }
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown subcommand: {cmd}"),
            ArgsError::InvalidTopic { raw } => write!(f, "invalid topic: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

pub fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  learn [command] [--db <sqlite_url>] [--catalog <course.toml>]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  path                 show the learning path (default)");
    eprintln!("  current              show the topic at the saved step");
    eprintln!("  open <phase/topic>   jump to a topic");
    eprintln!("  next | prev          step through the path");
    eprintln!("  complete [topic]     mark a topic (or the current one) finished");
    eprintln!("  theme                toggle light/dark");
    eprintln!("  reset                forget position and completions");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite://learn.sqlite3");
    eprintln!("  --catalog <built-in course>");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  LEARN_DB_URL, LEARN_CATALOG, RUST_LOG");
}

/// A topic named on the command line, either by full address or bare id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicRef {
    Address(TopicAddress),
    Id(TopicId),
}

impl TopicRef {
    fn parse(raw: String) -> Result<Self, ArgsError> {
        let parsed = if raw.contains('/') {
            raw.parse().map(TopicRef::Address)
        } else {
            raw.parse().map(TopicRef::Id)
        };
        parsed.map_err(|_| ArgsError::InvalidTopic { raw })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Path,
    Current,
    Open(TopicRef),
    Next,
    Prev,
    Complete(Option<TopicRef>),
    Theme,
    Reset,
    Help,
}

/// Values picked up from the environment before flags are applied.
#[derive(Debug, Clone, Default)]
pub struct EnvDefaults {
    pub db_url: Option<String>,
    pub catalog: Option<String>,
}

impl EnvDefaults {
    pub fn from_env() -> Self {
        Self {
            db_url: std::env::var("LEARN_DB_URL").ok(),
            catalog: std::env::var("LEARN_CATALOG").ok(),
        }
    }
}

#[derive(Debug)]
pub struct Args {
    pub command: Command,
    pub db_url: String,
    pub catalog: CatalogSource,
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

impl Args {
    pub fn parse(
        argv: impl IntoIterator<Item = String>,
        env: EnvDefaults,
    ) -> Result<Self, ArgsError> {
        let mut db_url = env
            .db_url
            .map_or_else(|| normalize_sqlite_url("learn.sqlite3".into()), normalize_sqlite_url);
        let mut catalog = env
            .catalog
            .map_or(CatalogSource::Builtin, |path| CatalogSource::File(PathBuf::from(path)));
        let mut command = None;
        let mut operand: Option<String> = None;

        let mut args = argv.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--catalog" => {
                    let value = require_value(&mut args, "--catalog")?;
                    catalog = CatalogSource::File(PathBuf::from(value));
                }
                "--help" | "-h" => command = Some("help".to_owned()),
                flag if flag.starts_with("--") => return Err(ArgsError::UnknownArg(arg)),
                _ if command.is_none() => command = Some(arg),
                _ if operand.is_none() => operand = Some(arg),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let command = match (command.as_deref(), operand) {
            (None | Some("path"), None) => Command::Path,
            (Some("help"), _) => Command::Help,
            (Some("current"), None) => Command::Current,
            (Some("open"), Some(raw)) => Command::Open(TopicRef::parse(raw)?),
            (Some("open"), None) => return Err(ArgsError::MissingTopic { command: "open" }),
            (Some("next"), None) => Command::Next,
            (Some("prev" | "previous"), None) => Command::Prev,
            (Some("complete"), raw) => Command::Complete(raw.map(TopicRef::parse).transpose()?),
            (Some("theme"), None) => Command::Theme,
            (Some("reset"), None) => Command::Reset,
            (Some(other), _) if !is_known(other) => {
                return Err(ArgsError::UnknownCommand(other.to_owned()));
            }
            (_, Some(raw)) => return Err(ArgsError::UnknownArg(raw)),
            (Some(other), None) => return Err(ArgsError::UnknownCommand(other.to_owned())),
        };

        Ok(Self {
            command,
            db_url,
            catalog,
        })
    }
}

fn is_known(command: &str) -> bool {
    matches!(
        command,
        "path" | "current" | "open" | "next" | "prev" | "previous" | "complete" | "theme" | "reset"
    )
}

pub fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}
