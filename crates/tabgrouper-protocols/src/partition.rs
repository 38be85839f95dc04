//! Wire shapes for the categorizer's proposed partition.
//!
//! Two shapes are accepted:
//!
//! - group map: `{"Work": [0, 2], "Fun": [1]}`
//! - group list: `{"groups": ["Work", "Fun"], "tabs": {"0": "Work", "1": "Fun", "2": "Work"}}`
//!
//! Decoding keeps object key order and duplicate keys so the normalizer can
//! report collisions instead of losing them.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde_json::value::RawValue;
use serde_json::Value;

#[cfg(test)]
#[path = "partition_tests.rs"]
mod tests;

/// Untrusted partition decoded from the categorizer's fenced JSON block.
///
/// Values are kept as raw JSON; type checking is the normalizer's job.
#[derive(Debug, Clone, PartialEq)]
pub enum RawPartition {
    /// Group name to index array, in object key order.
    GroupMap(Vec<(String, Value)>),
    /// Declared group order plus a stringified-index to group-name mapping.
    GroupList {
        groups: Value,
        tabs: Vec<(String, Value)>,
    },
}

impl RawPartition {
    /// Decode a JSON object into one of the two partition shapes.
    ///
    /// An object whose keys are exactly `groups` and `tabs` is the group-list
    /// shape; any other object is a group map. Non-object input is an error.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let top: OrderedEntries<Box<RawValue>> = serde_json::from_str(text)?;
        let entries = top.0;

        let is_group_list = entries.len() == 2
            && entries.iter().any(|(k, _)| k == "groups")
            && entries.iter().any(|(k, _)| k == "tabs");

        if is_group_list {
            let mut groups = Value::Null;
            let mut tabs = Vec::new();
            for (key, raw) in entries {
                match key.as_str() {
                    "groups" => groups = serde_json::from_str(raw.get())?,
                    _ => tabs = serde_json::from_str::<OrderedEntries<Value>>(raw.get())?.0,
                }
            }
            return Ok(RawPartition::GroupList { groups, tabs });
        }

        let groups = entries
            .into_iter()
            .map(|(key, raw)| Ok((key, serde_json::from_str(raw.get())?)))
            .collect::<Result<Vec<_>, serde_json::Error>>()?;
        Ok(RawPartition::GroupMap(groups))
    }

    /// Short name of the wire shape, for logging.
    pub fn shape(&self) -> &'static str {
        match self {
            RawPartition::GroupMap(_) => "group-map",
            RawPartition::GroupList { .. } => "group-list",
        }
    }
}

/// A JSON object as an ordered list of entries, duplicates retained.
struct OrderedEntries<V>(Vec<(String, V)>);

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedEntries<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for EntriesVisitor<V> {
            type Value = OrderedEntries<V>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry::<String, V>()? {
                    entries.push((key, value));
                }
                Ok(OrderedEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor(PhantomData))
    }
}
