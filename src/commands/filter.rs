use super::{run_load, Outcome};
use crate::api::Employee;
use crate::app::App;
use crate::error::AppError;
use crate::views;

pub async fn execute<F>(
    app: &mut App,
    args: &[&str],
    show_loading: &mut F,
) -> Result<Outcome, AppError>
where
    F: FnMut(&App),
{
    if args.is_empty() {
        return Err(AppError::Usage(
            "filter <employee id | full name | all>".to_string(),
        ));
    }

    let query = args.join(" ");
    let selection = if query.eq_ignore_ascii_case("all") {
        None
    } else {
        let all = Employee::all_employees();
        let items = views::employee_items(app.employees(), &all);
        let employee = views::employee_select(app, &items)
            .resolve(&query)
            .cloned()
            .ok_or_else(|| {
                AppError::Usage(format!(
                    "no employee matches `{}`; use an id or full name from the list",
                    query
                ))
            })?;
        Some(employee)
    };

    let pending = app.begin_select_employee(selection.as_ref());
    Ok(run_load(app, pending, show_loading).await)
}
