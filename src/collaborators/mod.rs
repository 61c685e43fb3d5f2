// External collaborators invoked by the round-trip scenarios.
// Only the narrow request/response traits matter to the engine; the
// in-memory implementations let the binary run without real services.

pub mod persistence;
pub mod cache;

pub use cache::{CacheStore, InMemoryCache};
pub use persistence::{InMemoryPersonStore, PersistenceStore, PersonRecord};
