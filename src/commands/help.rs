use super::Outcome;
use crate::error::AppError;
use crate::views::instructions;

pub fn execute() -> Result<Outcome, AppError> {
    Ok(Outcome::Print(instructions::render().to_string()))
}
