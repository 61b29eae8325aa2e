use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Employee record as returned by `GET /employees`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
}

impl Employee {
    /// Placeholder entry standing for "no filter applied"
    pub fn all_employees() -> Self {
        Employee {
            id: String::new(),
            first_name: "All".to_string(),
            last_name: "Employees".to_string(),
        }
    }

    pub fn is_all_employees(&self) -> bool {
        self.id.is_empty()
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A single expense transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub amount: f64,
    pub employee: Employee,
    pub merchant: String,
    pub date: NaiveDate,
    pub approved: bool,
}

/// One page of results plus the cursor of the following page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub next_page: Option<u32>,
}

/// Request body for `POST /setTransactionApproval`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetTransactionApprovalRequest {
    pub transaction_id: String,
    pub value: bool,
}

/// Error body some backends return alongside 4xx statuses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: Option<String>,
    pub message: Option<String>,
}

/// Errors produced while talking to the expenses backend
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("Bad Request: {0}")]
    BadRequest(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Not Found: {0}")]
    NotFound(String),
    #[error("Rate Limited. Retry after {retry_after} s")]
    RateLimited { retry_after: u64 },
    #[error("Server Error ({0}): {1}")]
    ServerError(u16, String),
    #[error("HTTP Error ({0}): {1}")]
    HttpError(u16, String),
    /// Rejected locally, no request was sent
    #[error("Invalid Request: {0}")]
    InvalidRequest(String),
    #[error("Request Error: {0}")]
    Request(String),
    #[error("Deserialization Error: {0}")]
    Deserialization(String),
}
