//! Reference persistence collaborator and game service for Paddock.
//!
//! [`paddock_logic`] never touches storage. This crate supplies the pieces
//! around it:
//!
//! - [`store`]: the [`Store`] lookup/save interface and an in-memory
//!   implementation with all-or-nothing transactions.
//! - [`snapshot`]: versioned binary save/load of a whole store, plus JSON
//!   export.
//! - [`service`]: [`GameService`], the caller that loads entities, invokes
//!   the core, and persists the outcome of each request atomically.

pub mod error;
pub mod service;
pub mod snapshot;
pub mod store;

pub use error::{ServiceError, StoreError};
pub use service::GameService;
pub use store::{MemoryStore, Store};
