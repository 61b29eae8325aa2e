//! In-memory backend used by unit tests

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::api::{ApiError, Employee, ExpenseSource, PaginatedResponse, Transaction};

pub struct MockSource {
    employees: Vec<Employee>,
    transactions: Mutex<Vec<Transaction>>,
    page_size: usize,
    employee_calls: AtomicUsize,
    pages_requested: Mutex<Vec<u32>>,
    by_employee_requested: Mutex<Vec<String>>,
    approvals: Mutex<Vec<(String, bool)>>,
    fail_employees: AtomicBool,
    fail_paginated: AtomicBool,
    fail_by_employee: AtomicBool,
}

pub fn employee(id: &str, first_name: &str, last_name: &str) -> Employee {
    Employee {
        id: id.to_string(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
    }
}

impl MockSource {
    /// Three employees (ids "1".."3", Alice is "2") and `total` transactions
    /// handed out `page_size` at a time
    pub fn with_pages(total: usize, page_size: usize) -> Self {
        let employees = vec![
            employee("1", "James", "Smith"),
            employee("2", "Alice", "Doe"),
            employee("3", "Mary", "Jones"),
        ];
        let transactions = (0..total)
            .map(|i| Transaction {
                id: format!("tx-{}", i),
                amount: 10.0 * (i as f64 + 1.0),
                employee: employees[i % employees.len()].clone(),
                merchant: "Uber".to_string(),
                date: NaiveDate::from_ymd_opt(2021, 9, 1 + (i % 28) as u32).unwrap(),
                approved: false,
            })
            .collect();

        Self {
            employees,
            transactions: Mutex::new(transactions),
            page_size,
            employee_calls: AtomicUsize::new(0),
            pages_requested: Mutex::new(Vec::new()),
            by_employee_requested: Mutex::new(Vec::new()),
            approvals: Mutex::new(Vec::new()),
            fail_employees: AtomicBool::new(false),
            fail_paginated: AtomicBool::new(false),
            fail_by_employee: AtomicBool::new(false),
        }
    }

    pub fn employee_calls(&self) -> usize {
        self.employee_calls.load(Ordering::SeqCst)
    }

    pub fn paginated_calls(&self) -> usize {
        self.pages_requested.lock().unwrap().len()
    }

    pub fn pages_requested(&self) -> Vec<u32> {
        self.pages_requested.lock().unwrap().clone()
    }

    pub fn by_employee_calls(&self) -> Vec<String> {
        self.by_employee_requested.lock().unwrap().clone()
    }

    pub fn approvals(&self) -> Vec<(String, bool)> {
        self.approvals.lock().unwrap().clone()
    }

    pub fn fail_employees(&self, fail: bool) {
        self.fail_employees.store(fail, Ordering::SeqCst);
    }

    pub fn fail_paginated(&self, fail: bool) {
        self.fail_paginated.store(fail, Ordering::SeqCst);
    }

    pub fn fail_by_employee(&self, fail: bool) {
        self.fail_by_employee.store(fail, Ordering::SeqCst);
    }
}

fn unavailable() -> ApiError {
    ApiError::ServerError(503, "unavailable".to_string())
}

#[async_trait]
impl ExpenseSource for MockSource {
    async fn fetch_employees(&self) -> Result<Vec<Employee>, ApiError> {
        self.employee_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_employees.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(self.employees.clone())
    }

    async fn fetch_paginated_transactions(
        &self,
        page: u32,
    ) -> Result<PaginatedResponse<Transaction>, ApiError> {
        self.pages_requested.lock().unwrap().push(page);
        if self.fail_paginated.load(Ordering::SeqCst) {
            return Err(unavailable());
        }

        let transactions = self.transactions.lock().unwrap();
        let start = page as usize * self.page_size;
        let end = (start + self.page_size).min(transactions.len());
        let data = transactions.get(start..end).unwrap_or_default().to_vec();
        let next_page = (end < transactions.len()).then_some(page + 1);

        Ok(PaginatedResponse { data, next_page })
    }

    async fn fetch_transactions_by_employee(
        &self,
        employee_id: &str,
    ) -> Result<Vec<Transaction>, ApiError> {
        self.by_employee_requested
            .lock()
            .unwrap()
            .push(employee_id.to_string());
        if self.fail_by_employee.load(Ordering::SeqCst) {
            return Err(unavailable());
        }

        Ok(self
            .transactions
            .lock()
            .unwrap()
            .iter()
            .filter(|tx| tx.employee.id == employee_id)
            .cloned()
            .collect())
    }

    async fn set_transaction_approval(
        &self,
        transaction_id: &str,
        value: bool,
    ) -> Result<(), ApiError> {
        let mut transactions = self.transactions.lock().unwrap();
        let tx = transactions
            .iter_mut()
            .find(|tx| tx.id == transaction_id)
            .ok_or_else(|| ApiError::NotFound(transaction_id.to_string()))?;
        tx.approved = value;

        self.approvals
            .lock()
            .unwrap()
            .push((transaction_id.to_string(), value));
        Ok(())
    }
}
