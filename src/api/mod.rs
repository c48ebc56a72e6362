//! Remote backend integration.
//!
//! Completed fasts are uploaded to an optional HTTP backend. The
//! [`RemoteSync`] trait is the seam between the sync engine and the
//! transport; [`backend::BackendClient`] is the reqwest implementation.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use fastline::api::{BackendClient, RemoteSync, SyncConfig};
//! # async fn run(fast: fastline::libs::fast::CompletedFast) -> anyhow::Result<()> {
//! let client = BackendClient::new(&SyncConfig::default())?;
//! client.upsert_fast(&fast).await?;
//! # Ok(())
//! # }
//! ```

use crate::libs::fast::CompletedFast;
use anyhow::Result;

pub mod backend;

pub use backend::{BackendClient, SyncConfig};

/// Destination for completed fasts.
///
/// Uploads are idempotent upserts keyed by the fast id, so delivering the
/// same fast twice is harmless.
#[allow(async_fn_in_trait)]
pub trait RemoteSync {
    async fn upsert_fast(&self, fast: &CompletedFast) -> Result<()>;
}
