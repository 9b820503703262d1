//! Entries paired with their coordination-service version.

/// An entry together with the version of the record it was read from.
///
/// A handle without a version is not tied to any stored record yet. The
/// version must be handed back unchanged on update so the write only lands if
/// nobody else modified the record in between.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryHandle<E> {
    entry: E,
    version: Option<u64>,
}

impl<E> EntryHandle<E> {
    /// Wrap an entry that has not been read from the store.
    pub fn new(entry: E) -> Self {
        Self {
            entry,
            version: None,
        }
    }

    /// Wrap an entry read from a record at `version`.
    pub fn with_version(entry: E, version: u64) -> Self {
        Self {
            entry,
            version: Some(version),
        }
    }

    pub fn entry(&self) -> &E {
        &self.entry
    }

    pub fn entry_mut(&mut self) -> &mut E {
        &mut self.entry
    }

    pub fn into_entry(self) -> E {
        self.entry
    }

    /// Version of the backing record, if any.
    pub fn version(&self) -> Option<u64> {
        self.version
    }

    pub fn has_version(&self) -> bool {
        self.version.is_some()
    }
}
