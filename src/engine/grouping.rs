//! Transformer Grouping Module
//! Insertion-ordered transformer id to readings mapping for chart rendering.

use crate::engine::loading::EnrichedReading;
use std::collections::HashMap;

/// Enriched rows grouped by transformer id.
///
/// Group order is the first-appearance order of each id in the input, and
/// rows inside a group keep their input order. Stored as a sequence of
/// (id, rows) pairs with a side index, so iteration order never depends on
/// hashing.
#[derive(Debug, Clone, Default)]
pub struct TransformerGroups {
    groups: Vec<(String, Vec<EnrichedReading>)>,
    index: HashMap<String, usize>,
}

impl TransformerGroups {
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = EnrichedReading>,
    {
        let mut this = Self::default();
        for row in rows {
            let id = row.reading.transformer.clone();
            let slot = match this.index.get(&id) {
                Some(&slot) => slot,
                None => {
                    this.groups.push((id.clone(), Vec::new()));
                    this.index.insert(id, this.groups.len() - 1);
                    this.groups.len() - 1
                }
            };
            this.groups[slot].1.push(row);
        }
        this
    }

    /// Number of distinct transformers.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, transformer: &str) -> Option<&[EnrichedReading]> {
        self.index
            .get(transformer)
            .map(|&slot| self.groups[slot].1.as_slice())
    }

    /// Groups in first-appearance order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[EnrichedReading])> {
        self.groups
            .iter()
            .map(|(id, rows)| (id.as_str(), rows.as_slice()))
    }

    pub fn transformer_ids(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(id, _)| id.as_str())
    }
}
