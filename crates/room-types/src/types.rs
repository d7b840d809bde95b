use serde::{Deserialize, Deserializer, Serialize};
use std::collections::btree_map;
use std::collections::BTreeMap;

/// Structured form of a free-text room request.
///
/// Produced by the query parser. Every field is optional on the wire: a
/// missing or `null` value becomes the empty/unconstrained default, so a
/// partially filled model response is never a deserialization error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredQuery {
    /// Requested room type. Empty or "any" means unconstrained.
    #[serde(default, deserialize_with = "null_as_default")]
    pub room_type: String,
    /// Minimum number of guests the room must hold. Absent or 0 means unconstrained.
    #[serde(default, deserialize_with = "lenient_capacity")]
    pub max_capacity: Option<u32>,
    /// Requested view. Empty, "any" or "standard" means unconstrained.
    #[serde(default, deserialize_with = "null_as_default")]
    pub view_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub features: Vec<String>,
    /// Free-text summary used by the semantic channel.
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
}

impl StructuredQuery {
    /// Requested capacity, with absence read as 0.
    pub fn capacity(&self) -> u32 {
        self.max_capacity.unwrap_or(0)
    }
}

/// Structured description of one room image.
///
/// Same shape as [`StructuredQuery`]; produced by the image analyzer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub room_type: String,
    #[serde(default, deserialize_with = "lenient_capacity")]
    pub max_capacity: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub view_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub features: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
}

impl CandidateRecord {
    pub fn capacity(&self) -> u32 {
        self.max_capacity.unwrap_or(0)
    }
}

/// Search corpus: candidate records keyed by a unique identifier
/// (typically the image URL or path).
///
/// Iteration is in identifier order, which makes every ranking over a corpus
/// deterministic, including the order of equal scores.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Corpus {
    records: BTreeMap<String, CandidateRecord>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, returning the one previously stored under `id`.
    pub fn insert(&mut self, id: impl Into<String>, record: CandidateRecord) -> Option<CandidateRecord> {
        self.records.insert(id.into(), record)
    }

    pub fn get(&self, id: &str) -> Option<&CandidateRecord> {
        self.records.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, CandidateRecord> {
        self.records.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<(String, CandidateRecord)> for Corpus {
    fn from_iter<I: IntoIterator<Item = (String, CandidateRecord)>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = (&'a String, &'a CandidateRecord);
    type IntoIter = btree_map::Iter<'a, String, CandidateRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Treat an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Models sometimes answer with `2.0`, `"2"` or `-1` for a capacity.
/// Anything that is not a non-negative whole number fitting in u32 is absent.
fn lenient_capacity<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| match value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| *f >= 0.0 && f.fract() == 0.0)
                    .map(|f| f as u64)
            })
            .and_then(|n| u32::try_from(n).ok()),
        serde_json::Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    }))
}
