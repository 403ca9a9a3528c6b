//! # cartwise-engine: Cart Reconciliation Against the Live Catalog
//!
//! This crate wires the pure logic of `cartwise-core` to a catalog that
//! lives somewhere else (database, service, in-process map).
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cartwise Checkout Flow                           │
//! │                                                                         │
//! │  Storefront (cart page, checkout page)                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  cartwise-engine (THIS CRATE)                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │ CheckoutEngine│    │  Reconciler   │    │ EngineConfig │  │   │
//! │  │   │  (engine.rs)  │───►│(reconciler.rs)│    │ (config.rs)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ quote()       │    │ one fetch,    │    │ TOML + env   │  │   │
//! │  │   │ price()       │    │ deadline      │    │ fee policy   │  │   │
//! │  │   └───────────────┘    └───────┬───────┘    └──────────────┘  │   │
//! │  │                                │                               │   │
//! │  └────────────────────────────────┼───────────────────────────────┘   │
//! │                                   ▼                                     │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │            dyn CatalogReader (catalog.rs)                       │   │
//! │  │            InMemoryCatalog or any store-backed impl             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`catalog`] - The catalog reader trait and an in-memory catalog
//! - [`reconciler`] - Async reconciliation with a single batched fetch
//! - [`engine`] - Reconcile-then-price facade
//! - [`config`] - Fee policy and fetch deadline from TOML and environment
//! - [`error`] - Engine error types
//! - [`telemetry`] - Tracing subscriber setup
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use cartwise_engine::{CheckoutEngine, EngineConfig, InMemoryCatalog};
//!
//! let config = EngineConfig::load_or_default(None);
//! let engine = CheckoutEngine::from_config(&config, Arc::new(InMemoryCatalog::new()))?;
//!
//! let quote = engine.quote(&requests).await?;
//! println!("Total: {}", quote.pricing.grand_total);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod reconciler;
pub mod telemetry;

// =============================================================================
// Re-exports
// =============================================================================

pub use catalog::{CatalogError, CatalogReader, CatalogResult, InMemoryCatalog, StockAdjustment};
pub use config::EngineConfig;
pub use engine::{CheckoutEngine, Quote};
pub use error::{EngineError, EngineResult};
pub use reconciler::Reconciler;

/// Default deadline for the catalog fetch of one reconciliation.
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 2000;
