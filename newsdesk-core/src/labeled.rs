//! Labeled example sets for topic learning

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

/// One labeled news article used to learn a topic direction
///
/// Field names follow the external tabular schema: `Categories`, `Negative`
/// (0/1), `Links`, `Titles`, `Summary`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabeledExample {
    /// Topic category this example belongs to
    #[serde(rename = "Categories")]
    pub category: String,
    /// Whether this is a negative (counter) example
    #[serde(
        rename = "Negative",
        deserialize_with = "flag_from_int",
        serialize_with = "flag_to_int"
    )]
    pub negative: bool,
    /// Article link, unique within a (category, flag) group
    #[serde(rename = "Links")]
    pub link: String,
    /// Article title
    #[serde(rename = "Titles")]
    pub title: String,
    /// Article summary; must be non-empty for profile building
    #[serde(rename = "Summary")]
    pub summary: String,
}

impl LabeledExample {
    /// Text embedded for this example
    pub fn embedding_text(&self) -> String {
        format!("{} {}", self.title, self.summary)
    }
}

fn flag_from_int<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match u8::deserialize(deserializer)? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(serde::de::Error::custom(format!(
            "Negative flag must be 0 or 1, got {}",
            other
        ))),
    }
}

fn flag_to_int<S>(flag: &bool, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u8(u8::from(*flag))
}

/// Positive and negative examples for one category
#[derive(Debug, Clone, Default)]
pub struct CategoryExamples {
    /// Examples the topic should match
    pub positives: Vec<LabeledExample>,
    /// Counter examples the topic should steer away from
    pub negatives: Vec<LabeledExample>,
}

impl CategoryExamples {
    /// Total number of examples in this category
    pub fn len(&self) -> usize {
        self.positives.len() + self.negatives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positives.is_empty() && self.negatives.is_empty()
    }
}

/// A labeled set, pre-grouped by (category, negative flag) at load time
///
/// Categories keep their first-seen order. The content fingerprint keys the
/// session-scoped topic-vector cache: any change to the rows changes the
/// fingerprint.
#[derive(Debug, Clone)]
pub struct LabeledSet {
    groups: IndexMap<String, CategoryExamples>,
    fingerprint: String,
}

impl LabeledSet {
    /// Build a labeled set from rows, grouping them by category and flag
    pub fn new(rows: Vec<LabeledExample>) -> Self {
        let mut hasher = Sha256::new();
        for row in &rows {
            for field in [
                row.category.as_str(),
                if row.negative { "1" } else { "0" },
                row.link.as_str(),
                row.title.as_str(),
                row.summary.as_str(),
            ] {
                hasher.update(field.as_bytes());
                hasher.update([0u8]);
            }
        }
        let fingerprint = hex::encode(hasher.finalize());

        let mut groups: IndexMap<String, CategoryExamples> = IndexMap::new();
        for row in rows {
            let group = groups.entry(row.category.clone()).or_default();
            if row.negative {
                group.negatives.push(row);
            } else {
                group.positives.push(row);
            }
        }

        Self {
            groups,
            fingerprint,
        }
    }

    /// Parse a labeled set from a JSON array of rows
    pub fn from_json(data: &str) -> serde_json::Result<Self> {
        let rows: Vec<LabeledExample> = serde_json::from_str(data)?;
        Ok(Self::new(rows))
    }

    /// Categories in first-seen order
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Iterate (category, examples) pairs in first-seen order
    pub fn groups(&self) -> impl Iterator<Item = (&str, &CategoryExamples)> {
        self.groups.iter().map(|(cat, group)| (cat.as_str(), group))
    }

    /// Examples for one category
    pub fn get(&self, category: &str) -> Option<&CategoryExamples> {
        self.groups.get(category)
    }

    /// SHA-256 fingerprint of the row contents
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Number of categories
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
