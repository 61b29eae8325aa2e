//! Text rendering of the coordinator's current view

pub mod input_select;
pub mod instructions;
pub mod transactions;

pub use input_select::{InputSelect, SelectOption};

use crate::api::Employee;
use crate::app::{App, ViewMoreButton};

const RULE: &str = "================================================================";

pub fn employee_option(item: &Employee) -> SelectOption {
    SelectOption {
        value: item.id.clone(),
        label: item.full_name(),
    }
}

/// Dropdown entries: the "All Employees" entry followed by every employee,
/// or nothing while employees are not loaded
pub fn employee_items(employees: Option<&[Employee]>, all: &Employee) -> Vec<Employee> {
    match employees {
        Some(employees) => std::iter::once(all.clone())
            .chain(employees.iter().cloned())
            .collect(),
        None => Vec::new(),
    }
}

pub fn employee_select<'a>(app: &'a App, items: &'a [Employee]) -> InputSelect<'a, Employee> {
    InputSelect {
        label: "Filter by employee",
        loading_label: "Loading employees",
        is_loading: app.is_loading(),
        items: items.iter().collect(),
        selected: app.selected_employee_id(),
        parse_item: employee_option,
    }
}

pub fn render_view_more(button: ViewMoreButton) -> Option<&'static str> {
    match button {
        ViewMoreButton::Hidden => None,
        ViewMoreButton::Disabled => Some("[ View More ] (unavailable)"),
        ViewMoreButton::Enabled => Some("[ View More ] type `more`"),
    }
}

/// Compose the whole screen
pub fn render(app: &App) -> String {
    let all = Employee::all_employees();
    let items = employee_items(app.employees(), &all);
    let mut sections = Vec::new();

    if let Some(message) = app.error_message() {
        sections.push(format!("!! {}", message));
    }
    sections.push(employee_select(app, &items).render());
    sections.push(transactions::render(app.transactions()));
    if let Some(button) = render_view_more(app.view_more_button()) {
        sections.push(button.to_string());
    }

    format!("{}\n{}\n{}", RULE, sections.join("\n\n"), RULE)
}
