//! Resolve - Collapse a lookup by unique key into zero or one entity

use crate::context::RequestContext;
use crate::provider::{ProviderError, ProviderResult};

/// Return the only candidate, `None` when there is none, and an integrity
/// error when the key matched more than one entity
pub fn resolve_one<T>(
    ctx: &RequestContext,
    entity: &str,
    key: &str,
    mut candidates: Vec<T>,
) -> ProviderResult<Option<T>> {
    match candidates.len() {
        0 => Ok(None),
        1 => Ok(candidates.pop()),
        count => {
            tracing::warn!(
                log_id = %ctx.log_id,
                entity,
                key,
                count,
                "lookup by unique key matched several entities"
            );
            Err(ProviderError::integrity(entity, key, count))
        }
    }
}
