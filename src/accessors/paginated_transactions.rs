use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::api::{ApiError, ExpenseSource, PaginatedResponse, Transaction};

/// Accumulates pages of all transactions as "load more" is requested
pub struct PaginatedTransactionsAccessor {
    source: Arc<dyn ExpenseSource>,
    data: Option<PaginatedResponse<Transaction>>,
    loading: bool,
}

impl PaginatedTransactionsAccessor {
    pub fn new(source: Arc<dyn ExpenseSource>) -> Self {
        Self {
            source,
            data: None,
            loading: false,
        }
    }

    pub fn data(&self) -> Option<&PaginatedResponse<Transaction>> {
        self.data.as_ref()
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    /// True when the cache says the listing is exhausted
    pub fn is_exhausted(&self) -> bool {
        matches!(&self.data, Some(page) if page.next_page.is_none())
    }

    /// Fetch the next page: page 0 on an empty cache, otherwise the cached
    /// cursor. Later pages are appended to what is already cached.
    pub async fn fetch_all(&mut self) -> Result<(), ApiError> {
        let page = match &self.data {
            None => 0,
            Some(cached) => match cached.next_page {
                Some(next) => next,
                None => {
                    debug!("No further transaction pages");
                    return Ok(());
                }
            },
        };

        self.loading = true;
        let result = self.source.fetch_paginated_transactions(page).await;
        self.loading = false;

        let response = result.map_err(|e| {
            warn!("Failed to load transaction page {}: {}", page, e);
            e
        })?;
        info!(
            "Loaded transaction page {} ({} items, next page {:?})",
            page,
            response.data.len(),
            response.next_page
        );

        match &mut self.data {
            Some(cached) => {
                cached.data.extend(response.data);
                cached.next_page = response.next_page;
            }
            None => self.data = Some(response),
        }

        Ok(())
    }

    pub fn invalidate_data(&mut self) {
        self.data = None;
    }

    /// Apply an approval change to a cached transaction, if present
    pub fn set_approved(&mut self, transaction_id: &str, value: bool) -> bool {
        self.data
            .as_mut()
            .and_then(|page| page.data.iter_mut().find(|tx| tx.id == transaction_id))
            .map(|tx| tx.approved = value)
            .is_some()
    }
}
