//! # mercato-db: Database Layer for Mercato
//!
//! This crate provides database access for the Mercato platform core.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Mercato Data Flow                                │
//! │                                                                         │
//! │  API route (publish-report)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     mercato-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐   ┌───────────────┐   ┌──────────────────┐ │   │
//! │  │   │   Database    │   │  Repositories │   │ ReportPublisher  │ │   │
//! │  │   │   (pool.rs)   │   │ (product.rs,  │   │  (publish.rs)    │ │   │
//! │  │   │               │   │  report.rs)   │   │                  │ │   │
//! │  │   │ SqlitePool    │◄──│ ProductRepo   │◄──│ one atomic       │ │   │
//! │  │   │ Migrations    │   │ ReportRepo    │   │ reconciliation   │ │   │
//! │  │   └───────────────┘   └───────────────┘   └──────────────────┘ │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database (one file per deployment)                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (product, report)
//! - [`publish`] - The publish-report reconciliation engine
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mercato_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/mercato.db")).await?;
//!
//! let outcome = db
//!     .publisher()
//!     .publish_report(&transaction_id, &items, &params, &ctx, &user_id)
//!     .await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod publish;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::DbError;
pub use pool::{Database, DbConfig};
pub use publish::{PublishError, PublishOutcome, ReportPublisher};

// Repository re-exports for convenience
pub use repository::product::ProductRepository;
pub use repository::report::ReportRepository;
