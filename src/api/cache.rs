use std::collections::HashMap;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::models::{ApiError, Employee, PaginatedResponse, Transaction};
use super::{
    ExpenseSource, EMPLOYEES_ENDPOINT, PAGINATED_TRANSACTIONS_ENDPOINT,
    TRANSACTIONS_BY_EMPLOYEE_ENDPOINT,
};

/// Memoises successful reads of the wrapped source, keyed by endpoint and params
pub struct CachedSource<S> {
    inner: S,
    entries: Mutex<HashMap<String, Value>>,
}

fn cache_key(endpoint: &str, param: Option<&str>) -> String {
    match param {
        Some(param) => format!("{}:{}", endpoint, param),
        None => endpoint.to_string(),
    }
}

impl<S: ExpenseSource> CachedSource<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Drop every cached entry belonging to one of `endpoints`
    pub async fn clear_by_endpoint(&self, endpoints: &[&str]) {
        let mut entries = self.entries.lock().await;
        entries.retain(|key, _| {
            let endpoint = key.split(':').next().unwrap_or(key.as_str());
            !endpoints.contains(&endpoint)
        });
    }

    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    async fn lookup<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let entries = self.entries.lock().await;
        let value = entries.get(key)?;
        match serde_json::from_value(value.clone()) {
            Ok(hit) => {
                debug!("Cache hit for {}", key);
                Some(hit)
            }
            Err(e) => {
                warn!("Discarding unreadable cache entry {}: {}", key, e);
                None
            }
        }
    }

    async fn store<T: Serialize>(&self, key: String, value: &T) {
        match serde_json::to_value(value) {
            Ok(value) => {
                self.entries.lock().await.insert(key, value);
            }
            Err(e) => warn!("Could not cache {}: {}", key, e),
        }
    }
}

#[async_trait]
impl<S: ExpenseSource> ExpenseSource for CachedSource<S> {
    async fn fetch_employees(&self) -> Result<Vec<Employee>, ApiError> {
        let key = cache_key(EMPLOYEES_ENDPOINT, None);
        if let Some(hit) = self.lookup(&key).await {
            return Ok(hit);
        }

        let employees = self.inner.fetch_employees().await?;
        self.store(key, &employees).await;
        Ok(employees)
    }

    async fn fetch_paginated_transactions(
        &self,
        page: u32,
    ) -> Result<PaginatedResponse<Transaction>, ApiError> {
        let key = cache_key(PAGINATED_TRANSACTIONS_ENDPOINT, Some(&page.to_string()));
        if let Some(hit) = self.lookup(&key).await {
            return Ok(hit);
        }

        let response = self.inner.fetch_paginated_transactions(page).await?;
        self.store(key, &response).await;
        Ok(response)
    }

    async fn fetch_transactions_by_employee(
        &self,
        employee_id: &str,
    ) -> Result<Vec<Transaction>, ApiError> {
        let key = cache_key(TRANSACTIONS_BY_EMPLOYEE_ENDPOINT, Some(employee_id));
        if let Some(hit) = self.lookup(&key).await {
            return Ok(hit);
        }

        let transactions = self.inner.fetch_transactions_by_employee(employee_id).await?;
        self.store(key, &transactions).await;
        Ok(transactions)
    }

    async fn set_transaction_approval(
        &self,
        transaction_id: &str,
        value: bool,
    ) -> Result<(), ApiError> {
        self.inner
            .set_transaction_approval(transaction_id, value)
            .await?;

        // approval state is embedded in every cached transaction listing
        self.clear_by_endpoint(&[
            PAGINATED_TRANSACTIONS_ENDPOINT,
            TRANSACTIONS_BY_EMPLOYEE_ENDPOINT,
        ])
        .await;
        Ok(())
    }
}
