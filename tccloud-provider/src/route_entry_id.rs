//! Composite identifier of a route entry: `{entry_id}.{route_table_id}`

use std::fmt;
use std::str::FromStr;

use tccloud_core::provider::ProviderError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteEntryId {
    /// Id the API assigned to the entry inside its table
    pub entry_id: u64,
    pub route_table_id: String,
}

impl RouteEntryId {
    pub fn new(entry_id: u64, route_table_id: impl Into<String>) -> Self {
        Self {
            entry_id,
            route_table_id: route_table_id.into(),
        }
    }
}

impl fmt::Display for RouteEntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.entry_id, self.route_table_id)
    }
}

impl FromStr for RouteEntryId {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('.').collect();
        let [entry_id, route_table_id] = parts.as_slice() else {
            return Err(ProviderError::validation(format!(
                "route entry id '{}' must look like <entry_id>.<route_table_id>",
                s
            )));
        };
        if route_table_id.is_empty() {
            return Err(ProviderError::validation(format!(
                "route entry id '{}' has an empty route table id",
                s
            )));
        }
        let non_numeric = || {
            ProviderError::validation(format!(
                "route entry id '{}' has a non-numeric entry id '{}'",
                s, entry_id
            ))
        };
        if entry_id.is_empty() || !entry_id.bytes().all(|b| b.is_ascii_digit()) {
            return Err(non_numeric());
        }
        let entry_id = entry_id.parse::<u64>().map_err(|_| non_numeric())?;
        Ok(Self::new(entry_id, *route_table_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_and_parse() {
        let id = RouteEntryId::new(42, "rtb-1");
        assert_eq!(id.to_string(), "42.rtb-1");
        assert_eq!("42.rtb-1".parse::<RouteEntryId>().unwrap(), id);
    }

    #[test]
    fn non_numeric_entry_id_is_validation_error() {
        let err = "abc.rtb-1".parse::<RouteEntryId>().unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn signed_or_padded_entry_id_is_validation_error() {
        for input in ["+42.rtb-1", "-42.rtb-1", " 42.rtb-1", "4 2.rtb-1"] {
            let err = input.parse::<RouteEntryId>().unwrap_err();
            assert!(err.is_validation(), "{input} should be rejected");
        }
    }

    #[test]
    fn entry_id_beyond_u64_is_validation_error() {
        let err = "18446744073709551616.rtb-1".parse::<RouteEntryId>().unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn wrong_part_count_is_validation_error() {
        for input in ["42", "42.rtb-1.x", "", "42."] {
            let err = input.parse::<RouteEntryId>().unwrap_err();
            assert!(err.is_validation(), "{input} should be rejected");
        }
    }
}
