//! Paged key→value image pairs, loaded once from a static JSON resource.

use std::{
    collections::{BTreeMap, HashSet},
    fs,
    path::Path,
};

use tracing::debug;

use crate::{
    domain::{KeyId, PageNumber, ValueId},
    error::DatasetError,
};

/// The correct key→value pairing for one round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pairs: Vec<(KeyId, ValueId)>,
}

impl Page {
    pub fn new<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<KeyId>,
        V: Into<ValueId>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[(KeyId, ValueId)] {
        &self.pairs
    }

    pub fn keys(&self) -> impl Iterator<Item = &KeyId> {
        self.pairs.iter().map(|(key, _)| key)
    }

    pub fn values(&self) -> impl Iterator<Item = &ValueId> {
        self.pairs.iter().map(|(_, value)| value)
    }

    pub fn value_for(&self, key: &KeyId) -> Option<&ValueId> {
        self.pairs
            .iter()
            .find(|(candidate, _)| candidate == key)
            .map(|(_, value)| value)
    }

    /// Linear scan; pages hold a handful of pairs.
    pub fn key_for_value(&self, value: &ValueId) -> Option<&KeyId> {
        self.pairs
            .iter()
            .find(|(_, candidate)| candidate == value)
            .map(|(key, _)| key)
    }

    pub fn contains_key(&self, key: &KeyId) -> bool {
        self.keys().any(|candidate| candidate == key)
    }

    pub fn contains_value(&self, value: &ValueId) -> bool {
        self.values().any(|candidate| candidate == value)
    }

    fn validate(&self, page: usize) -> Result<(), DatasetError> {
        if self.pairs.is_empty() {
            return Err(DatasetError::EmptyPage { page });
        }

        let mut seen_keys = HashSet::with_capacity(self.pairs.len());
        for key in self.keys() {
            if !seen_keys.insert(key) {
                return Err(DatasetError::DuplicateKey {
                    page,
                    key: key.0.clone(),
                });
            }
        }

        let mut seen = HashSet::with_capacity(self.pairs.len());
        for value in self.values() {
            if !seen.insert(value) {
                return Err(DatasetError::DuplicateValue {
                    page,
                    value: value.0.clone(),
                });
            }
        }

        Ok(())
    }
}

/// Ordered pages, addressed from page 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    pages: Vec<Page>,
}

impl Dataset {
    pub fn from_pages(pages: Vec<Page>) -> Result<Self, DatasetError> {
        if pages.is_empty() {
            return Err(DatasetError::Empty);
        }
        for (index, page) in pages.iter().enumerate() {
            page.validate(index + 1)?;
        }
        Ok(Self { pages })
    }

    /// Parses `{"1": {"a.png": "1.png", ...}, "2": {...}}`.
    ///
    /// A key repeated inside one JSON object keeps only its last value, as
    /// `serde_json` maps do; the earlier pair is dropped before validation.
    pub fn from_json_str(raw: &str) -> Result<Self, DatasetError> {
        let parsed: BTreeMap<String, BTreeMap<String, String>> = serde_json::from_str(raw)?;

        let mut numbered = BTreeMap::new();
        for (raw_number, pairs) in parsed {
            let number = raw_number
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|number| *number > 0)
                .ok_or_else(|| DatasetError::InvalidPageNumber {
                    raw: raw_number.clone(),
                })?;
            numbered.insert(number, Page::new(pairs));
        }

        let page_count = numbered.len();
        let mut pages = Vec::with_capacity(page_count);
        for expected in 1..=page_count {
            let page = numbered.remove(&expected).ok_or(DatasetError::MissingPage {
                missing: expected,
                page_count,
            })?;
            pages.push(page);
        }

        let dataset = Self::from_pages(pages)?;
        debug!(pages = dataset.page_count(), "parsed dataset");
        Ok(dataset)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn page(&self, number: PageNumber) -> Option<&Page> {
        number
            .0
            .checked_sub(1)
            .and_then(|index| self.pages.get(index))
    }

    /// Construction rejects datasets without pages, so this always exists.
    pub fn first_page(&self) -> &Page {
        &self.pages[0]
    }

    pub fn pages(&self) -> impl Iterator<Item = (PageNumber, &Page)> {
        self.pages
            .iter()
            .enumerate()
            .map(|(index, page)| (PageNumber(index + 1), page))
    }

    pub fn is_last_page(&self, number: PageNumber) -> bool {
        number.0 >= self.pages.len()
    }
}

#[cfg(test)]
#[path = "tests/dataset_tests.rs"]
mod tests;
