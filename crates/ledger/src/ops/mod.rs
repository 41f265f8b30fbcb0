use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{ExpenseStore, InMemoryStore};

mod analytics;
mod expenses;
mod list;

/// Produces identifiers for new expenses. Uniqueness is the only contract.
pub type IdGenerator = Arc<dyn Fn() -> String + Send + Sync>;
/// Source of "now" for `created_at` / `updated_at` stamps.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// The expense ledger service.
///
/// Holds no state besides its collaborators: the record store and the
/// identifier/clock generators.
#[derive(Clone)]
pub struct Ledger {
    store: Arc<dyn ExpenseStore>,
    id_generator: IdGenerator,
    clock: Clock,
}

impl Ledger {
    /// Return a builder for `Ledger`. Help to build the struct.
    pub fn builder() -> LedgerBuilder {
        LedgerBuilder::default()
    }

    fn next_id(&self) -> String {
        (self.id_generator)()
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }
}

fn default_id_generator() -> String {
    format!("exp_{}", uuid::Uuid::new_v4().simple())
}

/// The builder for `Ledger`
#[derive(Default)]
pub struct LedgerBuilder {
    store: Option<Arc<dyn ExpenseStore>>,
    id_generator: Option<IdGenerator>,
    clock: Option<Clock>,
}

impl LedgerBuilder {
    /// Pass the record store. Defaults to an empty [`InMemoryStore`].
    pub fn store(mut self, store: Arc<dyn ExpenseStore>) -> LedgerBuilder {
        self.store = Some(store);
        self
    }

    /// Replace the identifier generator.
    pub fn id_generator<F>(mut self, generator: F) -> LedgerBuilder
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        self.id_generator = Some(Arc::new(generator));
        self
    }

    /// Replace the clock.
    pub fn clock<F>(mut self, clock: F) -> LedgerBuilder
    where
        F: Fn() -> DateTime<Utc> + Send + Sync + 'static,
    {
        self.clock = Some(Arc::new(clock));
        self
    }

    /// Construct `Ledger`
    pub fn build(self) -> Ledger {
        Ledger {
            store: self
                .store
                .unwrap_or_else(|| Arc::new(InMemoryStore::new())),
            id_generator: self
                .id_generator
                .unwrap_or_else(|| Arc::new(default_id_generator)),
            clock: self.clock.unwrap_or_else(|| Arc::new(Utc::now)),
        }
    }
}
