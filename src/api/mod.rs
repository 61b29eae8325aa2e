pub mod cache;
pub mod client;
pub mod models;

use async_trait::async_trait;

pub use cache::CachedSource;
pub use client::RampClient;
pub use models::{ApiError, Employee, PaginatedResponse, Transaction};

pub const EMPLOYEES_ENDPOINT: &str = "employees";
pub const PAGINATED_TRANSACTIONS_ENDPOINT: &str = "paginatedTransactions";
pub const TRANSACTIONS_BY_EMPLOYEE_ENDPOINT: &str = "transactionsByEmployee";
pub const SET_TRANSACTION_APPROVAL_ENDPOINT: &str = "setTransactionApproval";

/// Everything the accessors need from the expenses backend
#[async_trait]
pub trait ExpenseSource: Send + Sync {
    async fn fetch_employees(&self) -> Result<Vec<Employee>, ApiError>;

    async fn fetch_paginated_transactions(
        &self,
        page: u32,
    ) -> Result<PaginatedResponse<Transaction>, ApiError>;

    async fn fetch_transactions_by_employee(
        &self,
        employee_id: &str,
    ) -> Result<Vec<Transaction>, ApiError>;

    async fn set_transaction_approval(
        &self,
        transaction_id: &str,
        value: bool,
    ) -> Result<(), ApiError>;
}
