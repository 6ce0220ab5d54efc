use serde::{Deserialize, Serialize};

use super::Schema;

/// One page of a list endpoint: `{ items, totalItems }`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(rename = "totalItems")]
    pub total: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64) -> Self {
        Self { items, total }
    }
}

impl<T: Schema> Schema for Page<T> {
    fn check(self) -> Result<Self, String> {
        let items = self
            .items
            .into_iter()
            .map(Schema::check)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            items,
            total: self.total,
        })
    }
}
