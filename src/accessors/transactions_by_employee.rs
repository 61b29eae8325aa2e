use std::sync::Arc;

use tracing::{info, warn};

use crate::api::{ApiError, ExpenseSource, Transaction};

pub struct TransactionsByEmployeeAccessor {
    source: Arc<dyn ExpenseSource>,
    data: Option<Vec<Transaction>>,
    loading: bool,
}

impl TransactionsByEmployeeAccessor {
    pub fn new(source: Arc<dyn ExpenseSource>) -> Self {
        Self {
            source,
            data: None,
            loading: false,
        }
    }

    pub fn data(&self) -> Option<&[Transaction]> {
        self.data.as_deref()
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    /// Replace the cache with the transactions of exactly one employee
    pub async fn fetch_by_id(&mut self, employee_id: &str) -> Result<(), ApiError> {
        if employee_id.is_empty() {
            return Err(ApiError::InvalidRequest(
                "Employee id cannot be empty".to_string(),
            ));
        }

        self.loading = true;
        let result = self.source.fetch_transactions_by_employee(employee_id).await;
        self.loading = false;

        match result {
            Ok(transactions) => {
                info!(
                    "Loaded {} transactions for employee {}",
                    transactions.len(),
                    employee_id
                );
                self.data = Some(transactions);
                Ok(())
            }
            Err(e) => {
                warn!("Failed to load transactions for employee {}: {}", employee_id, e);
                Err(e)
            }
        }
    }

    pub fn invalidate_data(&mut self) {
        self.data = None;
    }

    pub fn set_approved(&mut self, transaction_id: &str, value: bool) -> bool {
        self.data
            .as_mut()
            .and_then(|txs| txs.iter_mut().find(|tx| tx.id == transaction_id))
            .map(|tx| tx.approved = value)
            .is_some()
    }
}
