//! Users Domain
//!
//! This module provides the user account use cases on top of the shared
//! repository core.
//!
//! # Features
//!
//! - Sign-up with Argon2 password hashing and unique emails
//! - Sign-in by email and password
//! - Profile and password updates
//! - Deletion
//! - Paged, sorted and filtered listing
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │   Service   │  ← Use cases, input checks, password hashing
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← UserRepository trait + in-memory implementation
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← User entity, validation rules, DTOs
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_users::{Argon2HashProvider, InMemoryUserRepository, SignUpInput, UserService};
//!
//! # async fn run() -> domain_users::UserResult<()> {
//! let service = UserService::new(InMemoryUserRepository::new(), Argon2HashProvider::new());
//!
//! let user = service
//!     .sign_up(SignUpInput {
//!         name: "Jane".to_string(),
//!         email: "jane@example.com".to_string(),
//!         password: "secret".to_string(),
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod hash;
pub mod models;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{UserError, UserResult};
pub use hash::{Argon2HashProvider, HashProvider};
pub use models::{
    SignInInput, SignUpInput, UpdatePasswordInput, UpdateUserInput, User, UserEntity, UserOutput,
    UserProps,
};
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
