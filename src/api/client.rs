use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, RETRY_AFTER};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::models::{
    ApiError, Employee, ErrorResponse, PaginatedResponse, SetTransactionApprovalRequest,
    Transaction,
};
use super::{
    ExpenseSource, EMPLOYEES_ENDPOINT, PAGINATED_TRANSACTIONS_ENDPOINT,
    SET_TRANSACTION_APPROVAL_ENDPOINT, TRANSACTIONS_BY_EMPLOYEE_ENDPOINT,
};
use crate::config::Config;

/// HTTP/JSON client for the expenses backend
pub struct RampClient {
    http_client: HttpClient,
    api_token: Option<String>,
    base_url: String,
}

impl RampClient {
    /// Create a client from loaded configuration
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ApiError::Request(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_token: config.api_token.clone(),
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a client against an arbitrary base URL (for testing)
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_token: None,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn create_headers(&self) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = &self.api_token {
            let auth_value =
                HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|e| {
                    ApiError::InvalidRequest(format!("Failed to create auth header: {}", e))
                })?;
            headers.insert(AUTHORIZATION, auth_value);
        }

        Ok(headers)
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    /// Map a non-success response to the matching error variant
    async fn handle_error_response(response: reqwest::Response) -> ApiError {
        let status_code = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok());
        let body_text = response.text().await.unwrap_or_default();

        match status_code {
            400 => {
                let message = serde_json::from_str::<ErrorResponse>(&body_text)
                    .ok()
                    .and_then(|e| e.message.or(e.error))
                    .unwrap_or(body_text);
                ApiError::BadRequest(message)
            }
            401 => ApiError::Unauthorized(body_text),
            403 => ApiError::Forbidden(body_text),
            404 => ApiError::NotFound(body_text),
            429 => {
                let retry_after = retry_after.unwrap_or(1);
                warn!("Rate limited, retry after {} s", retry_after);
                ApiError::RateLimited { retry_after }
            }
            500..=599 => {
                warn!("Server error {}: {}", status_code, body_text);
                ApiError::ServerError(status_code, body_text)
            }
            _ => ApiError::HttpError(status_code, body_text),
        }
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        if !response.status().is_success() {
            return Err(Self::handle_error_response(response).await);
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Deserialization(format!("Failed to parse response: {}", e)))
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.url(endpoint);
        debug!("GET {} {:?}", url, query);

        let response = self
            .http_client
            .get(&url)
            .headers(self.create_headers()?)
            .query(query)
            .send()
            .await
            .map_err(|e| ApiError::Request(format!("Request failed: {}", e)))?;

        Self::read_json(response).await
    }
}

#[async_trait]
impl ExpenseSource for RampClient {
    /// GET /employees
    async fn fetch_employees(&self) -> Result<Vec<Employee>, ApiError> {
        self.get(EMPLOYEES_ENDPOINT, &[]).await
    }

    /// GET /paginatedTransactions?page={page}
    async fn fetch_paginated_transactions(
        &self,
        page: u32,
    ) -> Result<PaginatedResponse<Transaction>, ApiError> {
        self.get(PAGINATED_TRANSACTIONS_ENDPOINT, &[("page", page.to_string())])
            .await
    }

    /// GET /transactionsByEmployee?employeeId={id}
    async fn fetch_transactions_by_employee(
        &self,
        employee_id: &str,
    ) -> Result<Vec<Transaction>, ApiError> {
        self.get(
            TRANSACTIONS_BY_EMPLOYEE_ENDPOINT,
            &[("employeeId", employee_id.to_string())],
        )
        .await
    }

    /// POST /setTransactionApproval
    ///
    /// The backend answers with an empty body, so only the status is checked.
    async fn set_transaction_approval(
        &self,
        transaction_id: &str,
        value: bool,
    ) -> Result<(), ApiError> {
        let url = self.url(SET_TRANSACTION_APPROVAL_ENDPOINT);
        let body = SetTransactionApprovalRequest {
            transaction_id: transaction_id.to_string(),
            value,
        };
        debug!("POST {} {:?}", url, body);

        let response = self
            .http_client
            .post(&url)
            .headers(self.create_headers()?)
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::Request(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::handle_error_response(response).await);
        }

        Ok(())
    }
}
