//! Stateful wrappers around the remote source
//!
//! Each accessor owns one cache, a loading flag and the operations that
//! refill or invalidate it. Nothing else mutates an accessor's cache.

pub mod employees;
pub mod paginated_transactions;
pub mod transactions_by_employee;

pub use employees::EmployeesAccessor;
pub use paginated_transactions::PaginatedTransactionsAccessor;
pub use transactions_by_employee::TransactionsByEmployeeAccessor;
