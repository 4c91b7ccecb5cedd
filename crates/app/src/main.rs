use std::fmt;
use std::sync::Arc;

use fianca_core::QuizPhase;
use fianca_core::model::OptionId;
use services::quiz::{LOADING_CAPTION, REWARD_BODY, REWARD_HEADLINE, REWARD_SUBTITLE};
use services::{AppServices, QuizEngine, QuizView};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

const REPLAY_PROMPT: &str = "\nJogar de novo? (s/n) ";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct Args {
    db_url: String,
    reset: bool,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- play [--db <sqlite_url>]");
    eprintln!("  cargo run -p app -- seed [--db <sqlite_url>] [--reset]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite:fianca.sqlite3");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  FIANCA_DB_URL, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Play,
    Seed,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "play" => Some(Self::Play),
            "seed" => Some(Self::Seed),
            _ => None,
        }
    }
}

impl Args {
    fn parse(cmd: Command, args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("FIANCA_DB_URL")
            .ok()
            .map_or_else(|| normalize_sqlite_url("fianca.sqlite3".into()), normalize_sqlite_url);
        let mut reset = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--reset" if cmd == Command::Seed => reset = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { db_url, reset })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
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
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
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

/// Map a typed line to an option: a 1-based choice number or an option id.
fn parse_choice(view: &QuizView, input: &str) -> Option<OptionId> {
    let n: usize = input.trim().parse().ok()?;
    if let Some(id) = view.option_at(n) {
        return Some(id);
    }
    // Unknown ids still go to the engine, which counts them as wrong.
    input.parse().ok()
}

/// Answer to the replay prompt; anything but "s"/"sim" ends the game.
fn wants_replay(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "s" | "sim")
}

fn render_question(view: &QuizView) -> String {
    let mut out = String::new();
    if let Some(label) = &view.progress_label {
        out.push_str(&format!("\n{label}\n"));
    }
    if let Some(question) = &view.question {
        out.push_str(&format!("{question}\n"));
    }
    for (i, option) in view.options.iter().enumerate() {
        out.push_str(&format!("  {}) {}\n", i + 1, option.text));
    }
    out.push_str("> ");
    out
}

async fn play(engine: Arc<QuizEngine>) -> Result<(), Box<dyn std::error::Error>> {
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let mut state = engine.subscribe();
    let _load = engine.spawn_load();
    if state.borrow().is_loading() {
        stdout
            .write_all(format!("{LOADING_CAPTION}\n").as_bytes())
            .await?;
    }
    state.wait_for(|s| !s.is_loading()).await?;
    engine.reset();

    loop {
        let view = engine.view();
        match view.phase {
            QuizPhase::Completed => {
                let reward = format!("\n{REWARD_HEADLINE}\n{REWARD_SUBTITLE}\n\n{REWARD_BODY}\n");
                stdout.write_all(reward.as_bytes()).await?;
                stdout.write_all(REPLAY_PROMPT.as_bytes()).await?;
                stdout.flush().await?;

                match lines.next_line().await? {
                    Some(line) if wants_replay(&line) => {
                        engine.reset();
                        continue;
                    }
                    _ => return Ok(()),
                }
            }
            QuizPhase::ErrorShown { .. } => {
                if let Some(dialog) = &view.error {
                    let text = format!("\n[{}] {}\n", dialog.title, dialog.message);
                    stdout.write_all(text.as_bytes()).await?;
                }
                engine.dismiss_error();
                continue;
            }
            QuizPhase::Loading | QuizPhase::Ready { .. } => {}
        }

        stdout.write_all(render_question(&view).as_bytes()).await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            return Ok(());
        };
        let line = line.trim();
        if line.eq_ignore_ascii_case("q") {
            return Ok(());
        }
        let Some(option_id) = parse_choice(&view, line) else {
            stdout
                .write_all(b"type a choice number or an option id, q to quit\n")
                .await?;
            continue;
        };

        engine.submit_answer(
            option_id,
            || log::info!("quiz completed"),
            || log::info!("quiz restarted after two wrong answers"),
        );
    }
}

async fn seed(services: &AppServices, reset: bool) -> Result<(), Box<dyn std::error::Error>> {
    let bank = services.question_bank();
    if reset {
        bank.reseed().await?;
    } else if !bank.ensure_seeded().await? {
        log::info!("question bank already populated, nothing to seed");
    }
    println!("questions: {}", bank.count().await?);
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // Default behavior: play when no subcommand is provided.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Play,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Play,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(cmd, &mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    // Open + migrate SQLite at startup. Keep this in the binary glue so core/services stay pure.
    prepare_sqlite_file(&parsed.db_url)?;
    let services = AppServices::new_sqlite(&parsed.db_url).await?;
    log::debug!("using database {}", parsed.db_url);

    let result = match cmd {
        Command::Play => play(services.new_quiz_engine()).await,
        Command::Seed => seed(&services, parsed.reset).await,
    };

    services.close().await;
    result
}

#[tokio::main]
async fn main() {
    pretty_env_logger::init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fianca_core::QuizState;
    use fianca_core::catalog::default_questions;

    #[test]
    fn memory_and_absolute_urls_are_kept() {
        assert_eq!(normalize_sqlite_url("sqlite::memory:".into()), "sqlite::memory:");
        assert_eq!(
            normalize_sqlite_url("sqlite:///tmp/q.db".into()),
            "sqlite:///tmp/q.db"
        );
    }

    #[test]
    fn relative_paths_become_absolute() {
        let url = normalize_sqlite_url("sqlite:quiz.db".into());
        assert!(url.starts_with("sqlite:///"));
        assert!(url.ends_with("quiz.db"));
    }

    #[test]
    fn seed_accepts_reset_but_play_does_not() {
        let mut args = vec!["--reset".to_string()].into_iter();
        assert!(Args::parse(Command::Seed, &mut args).unwrap().reset);

        let mut args = vec!["--reset".to_string()].into_iter();
        assert!(matches!(
            Args::parse(Command::Play, &mut args),
            Err(ArgsError::UnknownArg(_))
        ));
    }

    #[test]
    fn db_flag_requires_value() {
        let mut args = vec!["--db".to_string()].into_iter();
        assert!(matches!(
            Args::parse(Command::Play, &mut args),
            Err(ArgsError::MissingValue { flag: "--db" })
        ));
    }

    #[test]
    fn replay_needs_a_yes() {
        assert!(wants_replay("s"));
        assert!(wants_replay(" Sim\n"));
        assert!(!wants_replay("n"));
        assert!(!wants_replay(""));
        assert!(!wants_replay("q"));
    }

    #[test]
    fn choices_map_to_option_ids() {
        let view = QuizView::from_state(&QuizState::ready(default_questions()));
        assert_eq!(parse_choice(&view, "2"), Some(OptionId::new(102)));
        assert_eq!(parse_choice(&view, "103"), Some(OptionId::new(103)));
        assert_eq!(parse_choice(&view, "7"), Some(OptionId::new(7)));
        assert_eq!(parse_choice(&view, "x"), None);
    }
}
