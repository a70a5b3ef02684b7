//! Outcome shapes of mutating collection operations.

use serde::{Deserialize, Serialize};

/// Outcome of an update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    /// Documents selected by the filter (0 or 1)
    pub matched_count:  u64,
    /// Documents rewritten (0 or 1)
    pub modified_count: u64,
}

impl UpdateResult {
    pub(crate) const fn none() -> Self {
        Self {
            matched_count:  0,
            modified_count: 0,
        }
    }

    pub(crate) const fn one() -> Self {
        Self {
            matched_count:  1,
            modified_count: 1,
        }
    }
}

/// Outcome of a delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    /// Documents removed
    pub deleted_count: u64,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_serialize_camel_case() {
        assert_eq!(
            serde_json::to_value(UpdateResult::one()).unwrap(),
            json!({"matchedCount": 1, "modifiedCount": 1})
        );
        assert_eq!(
            serde_json::to_value(DeleteResult {
                deleted_count: 3,
            })
            .unwrap(),
            json!({"deletedCount": 3})
        );
    }

    #[test]
    fn test_none_is_default() {
        assert_eq!(UpdateResult::none(), UpdateResult::default());
    }
}
