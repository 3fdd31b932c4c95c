//! In-memory [`Storage`] implementation.

use std::collections::HashMap;

use common::{
    operations::{By, Perform, Select},
    Signal,
};
use tracerr::Traced;

use super::{Batch, Error, Key, Storage};

/// [`Storage`] keeping values in memory only.
///
/// Clones share the same values.
#[derive(Clone, Debug, Default)]
pub struct Memory {
    /// Stored entries.
    entries: Signal<HashMap<Key, String>>,
}

impl Memory {
    /// Creates a new empty [`Memory`] storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all the stored entries.
    #[must_use]
    pub fn snapshot(&self) -> HashMap<Key, String> {
        self.entries.get()
    }
}

impl Storage<Select<By<Option<String>, Key>>> for Memory {
    type Ok = Option<String>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<String>, Key>>,
    ) -> Result<Self::Ok, Self::Err> {
        let key = by.into_inner();
        Ok(self.entries.with(|e| e.get(&key).cloned()))
    }
}

impl Storage<Perform<Batch>> for Memory {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Perform(batch): Perform<Batch>,
    ) -> Result<Self::Ok, Self::Err> {
        self.entries.update(|entries| {
            for (key, value) in batch {
                match value {
                    Some(v) => drop(entries.insert(key, v)),
                    None => drop(entries.remove(&key)),
                }
            }
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use common::operations::{By, Perform, Select};

    use super::{Batch, Key, Memory, Storage as _};

    #[tokio::test]
    async fn applies_batches_in_order() {
        let storage = Memory::new();

        storage
            .execute(Perform(
                Batch::new()
                    .set(Key::AccessToken, "a")
                    .set(Key::RefreshToken, "r")
                    .remove(Key::AccessToken),
            ))
            .await
            .unwrap();

        let token = storage
            .execute(Select(By::new(Key::RefreshToken)))
            .await
            .unwrap();
        assert_eq!(token.as_deref(), Some("r"));
        assert!(!storage.snapshot().contains_key(&Key::AccessToken));
    }
}
