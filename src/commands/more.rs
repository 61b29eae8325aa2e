use super::{run_load, Outcome};
use crate::app::{App, ViewMoreButton};
use crate::error::AppError;

pub async fn execute<F>(app: &mut App, show_loading: &mut F) -> Result<Outcome, AppError>
where
    F: FnMut(&App),
{
    let button = app.view_more_button();
    let Some(pending) = app.begin_view_more() else {
        let message = match button {
            ViewMoreButton::Hidden => {
                "View More is not shown while an employee filter is active"
            }
            _ => "No more transactions to load",
        };
        return Ok(Outcome::Print(message.to_string()));
    };

    Ok(run_load(app, pending, show_loading).await)
}
