//! Root coordinator: decides which transaction set is on screen
//!
//! The coordinator owns the three accessors and an explicit [`ViewState`].
//! Every change happens through one of the event methods (`mount`,
//! `select_employee`, `view_more`, `set_transaction_approval`); each takes
//! `&mut self`, so events are handled strictly one after another and a
//! response can never land after a newer selection.
//!
//! Loads are split in two: a `begin_*` method applies the loading state and
//! returns a [`PendingLoad`], and [`App::finish`] runs the fetches. The
//! caller can draw the loading screen in between.

use std::sync::Arc;

use tracing::{debug, info};

use crate::accessors::{
    EmployeesAccessor, PaginatedTransactionsAccessor, TransactionsByEmployeeAccessor,
};
use crate::api::{ApiError, Employee, ExpenseSource, Transaction};

/// Which listing a state belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    All,
    Employee(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    Initial,
    LoadingAll,
    ShowingAll,
    LoadingByEmployee { employee_id: String },
    ShowingByEmployee { employee_id: String },
    /// Last load failed; `filter` keeps the listing the user asked for
    Failed { filter: Filter, message: String },
}

/// A load whose state change is applied but whose fetches have not run
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum PendingLoad {
    All,
    ByEmployee(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMoreButton {
    Hidden,
    Disabled,
    Enabled,
}

pub struct App {
    source: Arc<dyn ExpenseSource>,
    employees: EmployeesAccessor,
    paginated: PaginatedTransactionsAccessor,
    by_employee: TransactionsByEmployeeAccessor,
    state: ViewState,
}

impl App {
    pub fn new(source: Arc<dyn ExpenseSource>) -> Self {
        Self {
            employees: EmployeesAccessor::new(source.clone()),
            paginated: PaginatedTransactionsAccessor::new(source.clone()),
            by_employee: TransactionsByEmployeeAccessor::new(source.clone()),
            source,
            state: ViewState::Initial,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn employees(&self) -> Option<&[Employee]> {
        self.employees.data()
    }

    pub fn paginated(&self) -> &PaginatedTransactionsAccessor {
        &self.paginated
    }

    pub fn by_employee(&self) -> &TransactionsByEmployeeAccessor {
        &self.by_employee
    }

    /// Drives the employee dropdown's loading label
    pub fn is_loading(&self) -> bool {
        self.state == ViewState::LoadingAll
    }

    pub fn is_employee_filter_active(&self) -> bool {
        self.filter() != Filter::All
    }

    pub fn filter(&self) -> Filter {
        match &self.state {
            ViewState::LoadingByEmployee { employee_id }
            | ViewState::ShowingByEmployee { employee_id } => {
                Filter::Employee(employee_id.clone())
            }
            ViewState::Failed { filter, .. } => filter.clone(),
            _ => Filter::All,
        }
    }

    pub fn selected_employee_id(&self) -> Option<&str> {
        match &self.state {
            ViewState::LoadingByEmployee { employee_id }
            | ViewState::ShowingByEmployee { employee_id }
            | ViewState::Failed {
                filter: Filter::Employee(employee_id),
                ..
            } => Some(employee_id.as_str()),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            ViewState::Failed { message, .. } => Some(message.as_str()),
            _ => None,
        }
    }

    /// Paginated data if present, else by-employee data, else nothing
    pub fn transactions(&self) -> Option<&[Transaction]> {
        self.paginated
            .data()
            .map(|page| page.data.as_slice())
            .or_else(|| self.by_employee.data())
    }

    pub fn view_more_button(&self) -> ViewMoreButton {
        if self.transactions().is_none() || self.is_employee_filter_active() {
            return ViewMoreButton::Hidden;
        }

        let exhausted = self
            .paginated
            .data()
            .map_or(true, |page| page.next_page.is_none());
        if self.is_loading() || self.paginated.loading() || exhausted {
            ViewMoreButton::Disabled
        } else {
            ViewMoreButton::Enabled
        }
    }

    /// Initial load. Only acts in `Initial` while no employees are cached or
    /// loading, so it fires at most once per session.
    pub async fn mount(&mut self) -> Result<(), ApiError> {
        match self.begin_mount() {
            Some(pending) => self.finish(pending).await,
            None => Ok(()),
        }
    }

    /// `None` or the "All Employees" entry clears the filter
    pub async fn select_employee(&mut self, selection: Option<&Employee>) -> Result<(), ApiError> {
        let pending = self.begin_select_employee(selection);
        self.finish(pending).await
    }

    /// Append the next page; returns false when the control is not enabled
    pub async fn view_more(&mut self) -> Result<bool, ApiError> {
        match self.begin_view_more() {
            Some(pending) => {
                self.finish(pending).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn begin_mount(&mut self) -> Option<PendingLoad> {
        if self.state != ViewState::Initial
            || self.employees.data().is_some()
            || self.employees.loading()
        {
            debug!("Mount ignored in state {:?}", self.state);
            return None;
        }

        Some(self.begin_load_all())
    }

    pub fn begin_select_employee(&mut self, selection: Option<&Employee>) -> PendingLoad {
        match selection {
            Some(employee) if !employee.is_all_employees() => {
                info!("Filtering by employee {}", employee.id);
                self.state = ViewState::LoadingByEmployee {
                    employee_id: employee.id.clone(),
                };
                self.paginated.invalidate_data();
                PendingLoad::ByEmployee(employee.id.clone())
            }
            _ => {
                info!("Showing all employees");
                // a fresh "all" listing starts again at the first page
                self.paginated.invalidate_data();
                self.begin_load_all()
            }
        }
    }

    /// `None` while the control is hidden or disabled, which also covers a
    /// page that is still loading
    pub fn begin_view_more(&mut self) -> Option<PendingLoad> {
        let button = self.view_more_button();
        if button != ViewMoreButton::Enabled {
            debug!("View more ignored, control is {:?}", button);
            return None;
        }

        Some(self.begin_load_all())
    }

    /// Run the fetches of a load started by one of the `begin_*` methods
    pub async fn finish(&mut self, pending: PendingLoad) -> Result<(), ApiError> {
        match pending {
            PendingLoad::All => {
                let result = match self.employees.fetch_all().await {
                    Ok(_) => self.paginated.fetch_all().await,
                    Err(e) => Err(e),
                };
                self.settle(result, ViewState::ShowingAll, Filter::All)
            }
            PendingLoad::ByEmployee(employee_id) => {
                let result = self.by_employee.fetch_by_id(&employee_id).await;
                if result.is_err() {
                    // never show another employee's rows under this filter
                    self.by_employee.invalidate_data();
                }
                self.settle(
                    result,
                    ViewState::ShowingByEmployee {
                        employee_id: employee_id.clone(),
                    },
                    Filter::Employee(employee_id),
                )
            }
        }
    }

    /// Approve or un-approve one of the transactions on screen
    pub async fn set_transaction_approval(
        &mut self,
        transaction_id: &str,
        value: bool,
    ) -> Result<(), ApiError> {
        let listed = self
            .transactions()
            .is_some_and(|txs| txs.iter().any(|tx| tx.id == transaction_id));
        if !listed {
            return Err(ApiError::InvalidRequest(format!(
                "Transaction {} is not listed",
                transaction_id
            )));
        }

        self.source
            .set_transaction_approval(transaction_id, value)
            .await?;

        self.paginated.set_approved(transaction_id, value);
        self.by_employee.set_approved(transaction_id, value);
        info!("Transaction {} approved = {}", transaction_id, value);
        Ok(())
    }

    fn begin_load_all(&mut self) -> PendingLoad {
        self.state = ViewState::LoadingAll;
        self.by_employee.invalidate_data();
        PendingLoad::All
    }

    fn settle(
        &mut self,
        result: Result<(), ApiError>,
        on_success: ViewState,
        filter: Filter,
    ) -> Result<(), ApiError> {
        match result {
            Ok(()) => {
                self.state = on_success;
                Ok(())
            }
            Err(e) => {
                self.state = ViewState::Failed {
                    filter,
                    message: e.to_string(),
                };
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{employee, MockSource};

    fn app_with(source: &Arc<MockSource>) -> App {
        App::new(source.clone())
    }

    #[tokio::test]
    async fn mount_loads_everything_exactly_once() {
        let source = Arc::new(MockSource::with_pages(12, 5));
        let mut app = app_with(&source);

        app.mount().await.unwrap();
        app.mount().await.unwrap();
        app.mount().await.unwrap();

        assert_eq!(source.employee_calls(), 1);
        assert_eq!(source.pages_requested(), vec![0]);
        assert_eq!(app.state(), &ViewState::ShowingAll);
        assert_eq!(app.employees().unwrap().len(), 3);
        assert_eq!(app.transactions().unwrap().len(), 5);
        assert!(!app.is_loading());
    }

    #[tokio::test]
    async fn selecting_employee_invalidates_paginated_data() {
        let source = Arc::new(MockSource::with_pages(12, 5));
        let mut app = app_with(&source);
        app.mount().await.unwrap();

        let alice = employee("2", "Alice", "Doe");
        app.select_employee(Some(&alice)).await.unwrap();

        assert_eq!(source.by_employee_calls(), vec!["2"]);
        assert!(app.paginated().data().is_none());
        assert!(app.is_employee_filter_active());
        assert_eq!(
            app.state(),
            &ViewState::ShowingByEmployee {
                employee_id: "2".to_string()
            }
        );
        let visible = app.transactions().unwrap();
        assert_eq!(visible.len(), 4);
        assert!(visible.iter().all(|tx| tx.employee.id == "2"));
        assert_eq!(app.view_more_button(), ViewMoreButton::Hidden);
    }

    #[tokio::test]
    async fn paginated_cache_is_cleared_even_when_employee_fetch_fails() {
        let source = Arc::new(MockSource::with_pages(12, 5));
        let mut app = app_with(&source);
        app.mount().await.unwrap();

        source.fail_by_employee(true);
        let alice = employee("2", "Alice", "Doe");
        assert!(app.select_employee(Some(&alice)).await.is_err());

        assert!(app.paginated().data().is_none());
        assert!(app.transactions().is_none());
        assert!(app.is_employee_filter_active());
        assert!(app.error_message().is_some());
    }

    #[tokio::test]
    async fn selecting_all_refetches_and_clears_employee_data() {
        let source = Arc::new(MockSource::with_pages(12, 5));
        let mut app = app_with(&source);
        app.mount().await.unwrap();
        let alice = employee("2", "Alice", "Doe");
        app.select_employee(Some(&alice)).await.unwrap();

        app.select_employee(Some(&Employee::all_employees()))
            .await
            .unwrap();

        assert!(!app.is_employee_filter_active());
        assert!(app.by_employee().data().is_none());
        assert_eq!(source.pages_requested(), vec![0, 0]);
        assert_eq!(app.transactions().unwrap().len(), 5);
        assert_eq!(app.view_more_button(), ViewMoreButton::Enabled);
    }

    #[tokio::test]
    async fn selecting_none_behaves_like_all() {
        let source = Arc::new(MockSource::with_pages(12, 5));
        let mut app = app_with(&source);
        app.mount().await.unwrap();
        app.view_more().await.unwrap();

        app.select_employee(None).await.unwrap();

        assert_eq!(app.state(), &ViewState::ShowingAll);
        assert_eq!(source.pages_requested(), vec![0, 1, 0]);
        assert_eq!(app.transactions().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn view_more_appends_until_disabled() {
        let source = Arc::new(MockSource::with_pages(12, 5));
        let mut app = app_with(&source);
        app.mount().await.unwrap();

        assert!(app.view_more().await.unwrap());
        assert_eq!(app.transactions().unwrap().len(), 10);
        assert!(app.view_more().await.unwrap());
        assert_eq!(app.transactions().unwrap().len(), 12);

        assert_eq!(app.view_more_button(), ViewMoreButton::Disabled);
        assert!(!app.view_more().await.unwrap());
        assert_eq!(source.pages_requested(), vec![0, 1, 2]);
        // employees stay cached across page loads
        assert_eq!(source.employee_calls(), 1);
    }

    #[tokio::test]
    async fn view_more_is_hidden_before_any_data() {
        let source = Arc::new(MockSource::with_pages(12, 5));
        let mut app = app_with(&source);

        assert_eq!(app.view_more_button(), ViewMoreButton::Hidden);
        assert!(!app.view_more().await.unwrap());
        assert_eq!(source.paginated_calls(), 0);
    }

    #[tokio::test]
    async fn failed_mount_surfaces_error_and_is_not_retried_by_mount() {
        let source = Arc::new(MockSource::with_pages(12, 5));
        source.fail_employees(true);
        let mut app = app_with(&source);

        assert!(app.mount().await.is_err());
        assert!(!app.is_loading());
        assert!(app.error_message().is_some());
        assert_eq!(source.paginated_calls(), 0);

        app.mount().await.unwrap();
        assert_eq!(source.employee_calls(), 1);

        source.fail_employees(false);
        app.select_employee(None).await.unwrap();
        assert_eq!(app.state(), &ViewState::ShowingAll);
        assert!(app.error_message().is_none());
    }

    #[tokio::test]
    async fn failed_page_keeps_view_more_for_retry() {
        let source = Arc::new(MockSource::with_pages(12, 5));
        let mut app = app_with(&source);
        app.mount().await.unwrap();

        source.fail_paginated(true);
        assert!(app.view_more().await.is_err());
        assert_eq!(app.transactions().unwrap().len(), 5);
        assert_eq!(app.view_more_button(), ViewMoreButton::Enabled);

        source.fail_paginated(false);
        assert!(app.view_more().await.unwrap());
        assert_eq!(app.transactions().unwrap().len(), 10);
        assert_eq!(app.state(), &ViewState::ShowingAll);
    }

    #[tokio::test]
    async fn approval_updates_visible_transaction() {
        let source = Arc::new(MockSource::with_pages(12, 5));
        let mut app = app_with(&source);
        app.mount().await.unwrap();

        app.set_transaction_approval("tx-3", true).await.unwrap();

        let tx = app
            .transactions()
            .unwrap()
            .iter()
            .find(|tx| tx.id == "tx-3")
            .unwrap();
        assert!(tx.approved);
        assert_eq!(source.approvals(), vec![("tx-3".to_string(), true)]);
    }

    #[tokio::test]
    async fn approval_of_unlisted_transaction_is_rejected() {
        let source = Arc::new(MockSource::with_pages(12, 5));
        let mut app = app_with(&source);
        app.mount().await.unwrap();

        let err = app.set_transaction_approval("tx-11", true).await.unwrap_err();

        assert!(matches!(err, ApiError::InvalidRequest(_)));
        assert!(source.approvals().is_empty());
    }

    #[tokio::test]
    async fn view_more_is_disabled_while_page_loads() {
        let source = Arc::new(MockSource::with_pages(12, 5));
        let mut app = app_with(&source);
        app.mount().await.unwrap();

        let pending = app.begin_view_more().unwrap();

        assert!(app.is_loading());
        assert_eq!(app.state(), &ViewState::LoadingAll);
        assert_eq!(app.view_more_button(), ViewMoreButton::Disabled);
        assert_eq!(app.transactions().unwrap().len(), 5);
        // a second request before the first settles is refused
        assert_eq!(app.begin_view_more(), None);

        app.finish(pending).await.unwrap();

        assert!(!app.is_loading());
        assert_eq!(app.view_more_button(), ViewMoreButton::Enabled);
        assert_eq!(app.transactions().unwrap().len(), 10);
        assert_eq!(source.pages_requested(), vec![0, 1]);
    }

    #[tokio::test]
    async fn loading_state_is_applied_before_fetching() {
        let source = Arc::new(MockSource::with_pages(12, 5));
        let mut app = app_with(&source);

        let pending = app.begin_mount().unwrap();
        assert!(app.is_loading());
        assert_eq!(source.employee_calls(), 0);
        assert_eq!(app.begin_mount(), None);
        app.finish(pending).await.unwrap();

        let alice = employee("2", "Alice", "Doe");
        let pending = app.begin_select_employee(Some(&alice));
        assert_eq!(pending, PendingLoad::ByEmployee("2".to_string()));
        assert!(app.is_employee_filter_active());
        assert!(!app.is_loading());
        assert!(app.transactions().is_none());
        assert_eq!(app.selected_employee_id(), Some("2"));
        assert!(source.by_employee_calls().is_empty());

        app.finish(pending).await.unwrap();
        assert_eq!(app.transactions().unwrap().len(), 4);
    }
}
