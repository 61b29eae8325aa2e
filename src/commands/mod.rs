pub mod approve;
pub mod filter;
pub mod help;
pub mod more;

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::api::ApiError;
use crate::app::{App, PendingLoad};
use crate::error::AppError;
use crate::utils::user_message;

/// What the terminal loop should do after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// State may have changed, redraw the screen
    Render,
    /// Show a message without redrawing
    Print(String),
    Quit,
}

/// Parse one input line and run the matching command
///
/// Commands that load data call `show_loading` once the loading state is
/// applied and before any request is sent.
pub async fn handle_line<F>(app: &mut App, line: &str, show_loading: &mut F) -> Outcome
where
    F: FnMut(&App),
{
    let parts: Vec<&str> = line.split_whitespace().collect();
    let Some((&command, args)) = parts.split_first() else {
        return Outcome::Print(String::new());
    };

    let result = match command.to_lowercase().as_str() {
        "filter" | "f" => filter::execute(app, args, show_loading).await,
        "more" | "m" => more::execute(app, show_loading).await,
        "approve" => approve::execute(app, args, true).await,
        "unapprove" => approve::execute(app, args, false).await,
        "help" | "h" | "?" => help::execute(),
        "quit" | "q" | "exit" => return Outcome::Quit,
        other => Err(AppError::Usage(format!(
            "unknown command `{}`, type `help` for the list",
            other
        ))),
    };

    match result {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!("Error executing command {}: {}", command, e);
            Outcome::Print(user_message(&e))
        }
    }
}

pub fn is_view_more(line: &str) -> bool {
    line.split_whitespace()
        .next()
        .is_some_and(|command| matches!(command.to_lowercase().as_str(), "more" | "m"))
}

/// Drops `more` lines that were typed while a load was in flight, the way a
/// disabled button swallows clicks
#[derive(Debug, Default)]
pub struct LoadGate {
    settled_at: Option<Instant>,
}

impl LoadGate {
    /// Record when the last load finished
    pub fn settled(&mut self, at: Instant) {
        self.settled_at = Some(at);
    }

    pub fn admits(&self, line: &str, received_at: Instant) -> bool {
        match self.settled_at {
            Some(settled_at) if received_at < settled_at && is_view_more(line) => {
                info!("Ignoring `{}` typed while transactions were loading", line.trim());
                false
            }
            _ => true,
        }
    }
}

/// Show the loading screen, then run the fetches
pub(crate) async fn run_load<F>(
    app: &mut App,
    pending: PendingLoad,
    show_loading: &mut F,
) -> Outcome
where
    F: FnMut(&App),
{
    show_loading(app);
    surfaced(app.finish(pending).await)
}

/// Load failures are already recorded in the view state and shown as a
/// banner, so they only need a redraw
pub(crate) fn surfaced(result: Result<(), ApiError>) -> Outcome {
    if let Err(e) = result {
        debug!("Load failed, shown as banner: {}", e);
    }
    Outcome::Render
}
