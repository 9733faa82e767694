//! # Foresight Memory
//!
//! The two shared stores behind the scoring pipelines:
//!
//! - [`CacheGateway`] over a [`CacheStore`]: tenant/entity-keyed
//!   read-through/write-through cache with TTL. Strictly advisory — a
//!   cache outage degrades to the miss path, never to an error.
//! - [`PersistenceSink`]: append-only audit trail of every scoring event,
//!   queryable per tenant and entity, newest first.
//!
//! Redis (via deadpool) and SQLite are the production backends; the
//! in-memory twins serve development and tests.

pub mod cache;
pub mod sink;

pub use cache::{CacheGateway, CacheStore, InMemoryCache, RedisCache};
pub use sink::{InMemorySink, PersistenceSink, SqliteSink};
