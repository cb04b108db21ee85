//! # staffgate-database
//!
//! The account store contract consumed by the identity core, with a
//! PostgreSQL implementation, a process-local implementation, connection
//! management, and embedded migrations.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryAccountStore;
pub use repositories::account::PgAccountRepository;
pub use store::{AccountStore, AccountUpdate};
