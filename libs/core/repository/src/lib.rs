//! Repository Core
//!
//! Shared building blocks every domain uses to store and query its entities.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────┐
//! │ InMemorySearchableRepository │  ← filter → sort → paginate
//! └──────────────┬───────────────┘
//!                │
//! ┌──────────────▼───────────────┐
//! │      InMemoryRepository      │  ← ordered CRUD keyed by identity
//! └──────────────┬───────────────┘
//!                │
//! ┌──────────────▼───────────────┐
//! │  Repository contracts        │  ← Repository / SearchableRepository
//! └──────────────┬───────────────┘
//!                │
//! ┌──────────────▼───────────────┐
//! │          Entity<P>           │  ← identity + property bag
//! └──────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use core_repository::{
//!     Entity, InMemorySearchableRepository, SearchInput, SearchParams, SearchableRepository,
//!     SortKey, Sortable,
//! };
//! use serde::Serialize;
//!
//! #[derive(Debug, Clone, Serialize)]
//! struct Product {
//!     name: String,
//! }
//!
//! impl Sortable for Product {
//!     fn sort_key(&self, field: &str) -> Option<SortKey> {
//!         match field {
//!             "name" => Some(SortKey::from(self.name.as_str())),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! # async fn run() -> core_repository::RepositoryResult<()> {
//! let repository = InMemorySearchableRepository::new(
//!     |item: &Entity<Product>, filter: &str| item.props().name.contains(filter),
//!     ["name"],
//! );
//!
//! let params = SearchParams::new(SearchInput::default().sort("name").per_page(10));
//! let page = repository.search(params).await?;
//! # Ok(())
//! # }
//! ```

pub mod contracts;
pub mod entity;
pub mod error;
pub mod in_memory;
pub mod search;
pub mod searchable;

// Re-export commonly used types
pub use contracts::{Repository, SearchableRepository};
pub use entity::Entity;
pub use error::{FieldErrors, RepositoryError, RepositoryResult};
pub use in_memory::InMemoryRepository;
pub use search::{DEFAULT_PER_PAGE, SearchInput, SearchParams, SearchResult, SortDirection};
pub use searchable::{FilterFn, InMemorySearchableRepository, SortKey, Sortable};
