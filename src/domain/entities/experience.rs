use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// end_date >= start_date is not enforced; rows come straight from the store.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Experience {
    pub id: i64,
    pub company: String,
    pub position: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub location: Option<String>,
    pub company_url: Option<String>,
    pub order_priority: i32,
}

impl Experience {
    /// A missing end date marks the current position.
    pub fn is_current(&self) -> bool {
        self.end_date.is_none()
    }
}
