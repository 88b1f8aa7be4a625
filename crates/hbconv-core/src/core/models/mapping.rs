use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use tracing::warn;

/// A member identifier as it appears in a serialized group mapping.
///
/// Lookups always go through the stringified form, so `12` and `"12"` refer to the
/// same atom.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum MemberId {
    Integer(i64),
    Text(String),
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberId::Integer(value) => write!(f, "{}", value),
            MemberId::Text(value) => f.write_str(value),
        }
    }
}

impl From<u64> for MemberId {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(v) => MemberId::Integer(v),
            Err(_) => MemberId::Text(value.to_string()),
        }
    }
}

impl From<&str> for MemberId {
    fn from(value: &str) -> Self {
        MemberId::Text(value.to_string())
    }
}

/// Group name to member identifiers, in file order.
///
/// This is the shape of the mapping files users provide, e.g.
/// `{"ARG12": [181, 182, 183], "GLU40": [610, 611]}`.
pub type GroupMapping = IndexMap<String, Vec<MemberId>>;

/// Identifier to group name, the inverse of a [`GroupMapping`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentifierMapping {
    groups_by_id: HashMap<String, String>,
}

impl IdentifierMapping {
    /// Inverts a group mapping.
    ///
    /// When an identifier is listed in several groups, the group that comes later in
    /// iteration order wins. Every such overwrite is logged as a warning.
    pub fn from_groups(groups: &GroupMapping) -> Self {
        let mut groups_by_id: HashMap<String, String> = HashMap::new();
        for (group, members) in groups {
            for member in members {
                let key = member.to_string();
                if let Some(previous) = groups_by_id.insert(key.clone(), group.clone()) {
                    if previous != *group {
                        warn!(
                            "Identifier '{}' is listed in groups '{}' and '{}'; using '{}'.",
                            key, previous, group, group
                        );
                    }
                }
            }
        }
        Self { groups_by_id }
    }

    pub fn group_of(&self, identifier: &str) -> Option<&str> {
        self.groups_by_id.get(identifier).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.groups_by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups_by_id.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for IdentifierMapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            groups_by_id: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
