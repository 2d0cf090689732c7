use std::fmt;
use std::io::{self, BufRead, Write};
use std::time::Duration;

use backend::{ApiConfig, HttpBackend};
use quiz_core::model::Question;
use quiz_core::session::NextQuestion;
use quiz_core::time::Clock;
use services::{QuizLoopService, SessionEvents, UniformPicker};

/// Pause between feedback and the next question, long enough to read the
/// correct answer.
const FEEDBACK_DELAY: Duration = Duration::from_millis(2000);

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
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
    base_url: String,
    username: Option<String>,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut base_url = std::env::var("QUIZ_API_BASE_URL")
            .unwrap_or_else(|_| ApiConfig::DEFAULT_BASE_URL.into());
        let mut username = std::env::var("QUIZ_USERNAME").ok();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--base-url" => {
                    base_url = require_value(args, "--base-url")?;
                }
                "--user" => {
                    username = Some(require_value(args, "--user")?);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { base_url, username })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--base-url <url>] [--user <name>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --base-url {}", ApiConfig::DEFAULT_BASE_URL);
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_API_BASE_URL, QUIZ_USERNAME");
}

//
// ─── CONSOLE PRESENTATION ──────────────────────────────────────────────────────
//

struct ConsoleEvents;

impl SessionEvents for ConsoleEvents {
    fn question_ready(&self, question: &Question) {
        println!();
        println!("{}", question.prompt());
        for (index, option) in question.options().iter().enumerate() {
            println!("  {}) {option}", index + 1);
        }
    }

    fn answer_feedback(&self, is_correct: bool, correct_answer: &str) {
        if is_correct {
            println!("Correct!");
        } else {
            println!("Incorrect. Correct: {correct_answer}");
        }
    }

    fn session_complete(&self, incorrect_attempts: u32) {
        println!();
        println!("All questions answered correctly!");
        println!("Incorrect attempts this session: {incorrect_attempts}");
    }

    fn load_error(&self, reason: &str) {
        eprintln!("Error loading quiz data: {reason}");
    }
}

/// Prompt until the user picks one of the listed options (or quits).
fn read_choice(question: &Question) -> Option<String> {
    let stdin = io::stdin();
    loop {
        print!("answer [1-{}] (q to quit): ", question.options().len());
        let _ = io::stdout().flush();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).is_err() {
            return None;
        }
        let trimmed = line.trim();
        if trimmed.eq_ignore_ascii_case("q") {
            return None;
        }
        if let Ok(number) = trimmed.parse::<usize>() {
            if (1..=question.options().len()).contains(&number) {
                return Some(question.options()[number - 1].clone());
            }
        }
        println!("please enter a number between 1 and {}", question.options().len());
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let args = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    // The username comes from prior authentication; without it the user
    // belongs in the external login flow, not in a session.
    let Some(username) = args.username else {
        eprintln!("login required: set QUIZ_USERNAME or pass --user <name>");
        std::process::exit(1);
    };

    let http = HttpBackend::new(&ApiConfig::new(args.base_url));
    let service = QuizLoopService::new(Clock::default_clock(), http.into_backend(), username);
    let events = ConsoleEvents;

    let mut session = match service.start_session().await {
        Ok(session) => session,
        Err(e) => {
            events.load_error(&e.to_string());
            std::process::exit(1);
        }
    };
    println!(
        "Welcome back, {}! {} of {} questions remaining.",
        service.username(),
        session.working_pool().len(),
        session.catalog().len()
    );

    let mut picker = UniformPicker::new();
    loop {
        match session.select_next(&mut picker)? {
            NextQuestion::Complete => {
                events.session_complete(session.incorrect_attempts());
                break;
            }
            NextQuestion::Ask(question) => {
                events.question_ready(&question);
                let Some(choice) = read_choice(&question) else {
                    println!("Goodbye!");
                    break;
                };
                let result = service.answer(&mut session, question.id(), &choice)?;
                events.answer_feedback(result.outcome.is_correct, &result.outcome.correct_answer);
                tokio::time::sleep(FEEDBACK_DELAY).await;
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
