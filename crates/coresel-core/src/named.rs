//! Dataset identity shared by every dataset kind: name, size and item headers.

use std::collections::HashMap;

use crate::error::{CoreselError, Result};
use crate::identity::{ItemHeader, ItemKey};

/// Identity capability implemented by every dataset kind.
pub trait NamedDataset {
    fn named(&self) -> &NamedData;

    fn dataset_name(&self) -> &str {
        self.named().name()
    }

    fn size(&self) -> usize {
        self.named().size()
    }

    fn header(&self, index: usize) -> &ItemHeader {
        self.named().header(index)
    }

    fn ids(&self) -> &[ItemKey] {
        self.named().ids()
    }
}

/// Name, size and per-item headers of a dataset.
#[derive(Clone, Debug, PartialEq)]
pub struct NamedData {
    name: String,
    headers: Vec<ItemHeader>,
    ids: Vec<ItemKey>,
    index: HashMap<ItemKey, usize>,
}

impl NamedData {
    /// Create dataset identity for `size` items.
    ///
    /// Without headers all items are unidentified. Given headers must have
    /// exactly `size` entries and explicit identifiers must be unique.
    pub fn new(
        name: impl Into<String>,
        size: usize,
        headers: Option<Vec<ItemHeader>>,
    ) -> Result<Self> {
        if size == 0 {
            return Err(CoreselError::validation("dataset size must be at least 1"));
        }
        let headers = match headers {
            Some(h) if h.len() != size => {
                return Err(CoreselError::validation(format!(
                    "incorrect number of headers: expected {}, got {}",
                    size,
                    h.len()
                )));
            }
            Some(h) => h,
            None => vec![ItemHeader::Unidentified; size],
        };

        let mut ids = Vec::with_capacity(size);
        let mut index = HashMap::with_capacity(size);
        for (i, header) in headers.iter().enumerate() {
            let key = ItemKey::for_item(i, header);
            if let Some(prev) = index.insert(key.clone(), i) {
                return Err(CoreselError::validation(format!(
                    "duplicate identifier '{}' for items {} and {}",
                    key, prev, i
                )));
            }
            ids.push(key);
        }

        Ok(Self {
            name: name.into(),
            headers,
            ids,
            index,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> usize {
        self.headers.len()
    }

    /// Header of item `index`. Panics if `index >= size`.
    pub fn header(&self, index: usize) -> &ItemHeader {
        &self.headers[index]
    }

    pub fn headers(&self) -> &[ItemHeader] {
        &self.headers
    }

    /// True if at least one item carries a name or an identifier.
    pub fn has_headers(&self) -> bool {
        self.headers.iter().any(|h| *h != ItemHeader::Unidentified)
    }

    /// The id-set, one key per item in index order.
    pub fn ids(&self) -> &[ItemKey] {
        &self.ids
    }

    pub fn index_of(&self, key: &ItemKey) -> Option<usize> {
        self.index.get(key).copied()
    }

    pub fn find_by_id(&self, id: &str) -> Option<usize> {
        self.index_of(&ItemKey::Explicit(id.to_string()))
    }
}

impl NamedDataset for NamedData {
    fn named(&self) -> &NamedData {
        self
    }
}
