use super::Outcome;
use crate::app::App;
use crate::error::AppError;

pub async fn execute(app: &mut App, args: &[&str], value: bool) -> Result<Outcome, AppError> {
    let Some(&transaction_id) = args.first() else {
        let command = if value { "approve" } else { "unapprove" };
        return Err(AppError::Usage(format!("{} <transaction id>", command)));
    };

    app.set_transaction_approval(transaction_id, value).await?;
    Ok(Outcome::Render)
}
