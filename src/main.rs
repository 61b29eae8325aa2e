use std::sync::Arc;
use std::time::Instant;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use ramp_expenses::api::{CachedSource, RampClient};
use ramp_expenses::commands::{self, LoadGate, Outcome};
use ramp_expenses::config::Config;
use ramp_expenses::views::{self, instructions};
use ramp_expenses::{App, AppError};

fn init_tracing() {
    let mut filter = EnvFilter::from_default_env();
    for directive in ["ramp_expenses=info", "reqwest=warn"] {
        if let Ok(directive) = directive.parse::<Directive>() {
            filter = filter.add_directive(directive);
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

/// Read stdin on its own task so lines typed during a fetch are stamped
/// with the time they arrived
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<std::io::Result<(Instant, String)>> {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            let item = match lines.next_line().await {
                Ok(Some(line)) => Ok((Instant::now(), line)),
                Ok(None) => break,
                Err(e) => Err(e),
            };
            let failed = item.is_err();
            if tx.send(item).is_err() || failed {
                break;
            }
        }
    });
    rx
}

async fn run() -> Result<(), AppError> {
    let config = Config::from_env()?;
    info!("Using expenses API at {}", config.api_url);

    let source = Arc::new(CachedSource::new(RampClient::new(&config)?));
    let mut app = App::new(source);

    let mut input = spawn_stdin_reader();
    let mut gate = LoadGate::default();

    println!("{}\n", instructions::render());
    if let Some(pending) = app.begin_mount() {
        println!("{}", views::render(&app));
        if let Err(e) = app.finish(pending).await {
            error!("Initial load failed: {}", e);
        }
        gate.settled(Instant::now());
    }
    println!("{}", views::render(&app));

    while let Some(item) = input.recv().await {
        let (received_at, line) = item?;
        if !gate.admits(&line, received_at) {
            continue;
        }

        let mut loaded = false;
        let outcome = commands::handle_line(&mut app, &line, &mut |app: &App| {
            loaded = true;
            println!("{}", views::render(app));
        })
        .await;
        if loaded {
            gate.settled(Instant::now());
        }

        match outcome {
            Outcome::Render => println!("{}", views::render(&app)),
            Outcome::Print(message) if message.is_empty() => {}
            Outcome::Print(message) => println!("{}", message),
            Outcome::Quit => break,
        }
    }

    info!("Goodbye");
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenv::dotenv().ok();
    init_tracing();

    info!("Starting ramp-expenses...");
    if let Err(e) = run().await {
        error!("{}", e);
        std::process::exit(1);
    }
}
