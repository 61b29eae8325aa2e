use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::api::{ApiError, Employee, ExpenseSource};

pub struct EmployeesAccessor {
    source: Arc<dyn ExpenseSource>,
    data: Option<Vec<Employee>>,
    loading: bool,
}

impl EmployeesAccessor {
    pub fn new(source: Arc<dyn ExpenseSource>) -> Self {
        Self {
            source,
            data: None,
            loading: false,
        }
    }

    pub fn data(&self) -> Option<&[Employee]> {
        self.data.as_deref()
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    /// Load the employee list once; later calls return the cached list
    pub async fn fetch_all(&mut self) -> Result<&[Employee], ApiError> {
        if self.data.is_none() {
            self.loading = true;
            let result = self.source.fetch_employees().await;
            self.loading = false;

            match result {
                Ok(employees) => {
                    info!("Loaded {} employees", employees.len());
                    self.data = Some(employees);
                }
                Err(e) => {
                    warn!("Failed to load employees: {}", e);
                    return Err(e);
                }
            }
        } else {
            debug!("Employees already cached, skipping fetch");
        }

        Ok(self.data.as_deref().unwrap_or_default())
    }

    pub fn invalidate_data(&mut self) {
        self.data = None;
    }
}
