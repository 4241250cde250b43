//! Request context threaded through every remote call

use std::fmt;

/// Correlates the log events of one provider operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub log_id: String,
}

impl RequestContext {
    pub fn new() -> Self {
        Self {
            log_id: uuid::Uuid::new_v4().to_string(),
        }
    }

    pub fn with_log_id(log_id: impl Into<String>) -> Self {
        Self {
            log_id: log_id.into(),
        }
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.log_id)
    }
}
