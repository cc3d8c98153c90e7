//! LIMIT / OFFSET.

use super::Rendered;
use crate::sql::dialect::SqlDialect;

/// Independently optional limit and offset; setting either twice keeps the
/// last value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pagination {
    limit: Option<u64>,
    offset: Option<u64>,
}

impl Pagination {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn limit(&mut self, limit: u64) {
        self.limit = Some(limit);
    }

    pub fn offset(&mut self, offset: u64) {
        self.offset = Some(offset);
    }

    pub fn is_empty(&self) -> bool {
        self.limit.is_none() && self.offset.is_none()
    }

    pub fn render(self, dialect: &dyn SqlDialect) -> Rendered {
        Rendered::new(dialect.emit_limit_offset(self.limit, self.offset), vec![])
    }
}
