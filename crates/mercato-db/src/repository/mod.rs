//! # Repository Module
//!
//! Database repository implementations for Mercato.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  Route handler / publish engine                                        │
//! │       │                                                                 │
//! │       │  db.products().get_by_id("uuid")                               │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  ProductRepository                                                     │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── insert(&self, product)                                            │
//! │  └── adjust_inventory(&self, id, delta)                                │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each repository also exposes crate-private connection-level functions
//! so the publish engine can run the same queries on its own transaction
//! handle. One query, two entry points - the pool methods just acquire a
//! connection and delegate.
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Product CRUD and inventory deltas
//! - [`report::ReportRepository`] - Transaction and transaction-item operations

pub mod product;
pub mod report;
