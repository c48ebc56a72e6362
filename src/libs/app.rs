//! Composition root.
//!
//! [`AppState`] wires the stores to their storage, clock, configuration and
//! the sync outbox. Commands build one per invocation; tests build one over a
//! scratch directory with a [`MockClock`](crate::libs::clock::MockClock).

use crate::api::{BackendClient, RemoteSync};
use crate::db::db::{Db, DB_FILE_NAME};
use crate::db::outbox::Outbox;
use crate::libs::clock::{Clock, SystemClock};
use crate::libs::config::Config;
use crate::libs::data_storage::{DataStorage, FileStateStore};
use crate::libs::fast::CompletedFast;
use crate::libs::fasting::FastingStore;
use crate::libs::messages::Message;
use crate::libs::sync::{enqueue_fast, flush, SyncReport};
use crate::libs::weight::WeightStore;
use crate::msg_error_anyhow;
use anyhow::Result;
use std::sync::Arc;
use tracing::warn;

/// What happened when a fast was ended.
#[derive(Debug, Clone, PartialEq)]
pub struct EndOutcome {
    pub fast: CompletedFast,
    /// `None` when the fast could not be queued or sync is not configured.
    pub sync: Option<SyncReport>,
}

/// Everything a command needs, opened from one data directory.
///
/// ## Components
///
/// - **`fasting`**: current fast, history and preferences (`fasting-state.json`)
/// - **`weight`**: weight entries, goal and unit (`weight-state.json`)
/// - **`config`**: optional sync and timer modules from `config.json`
/// - **outbox**: opened on demand from `fastline.db` through [`AppState::outbox`]
///
/// Both stores share the same clock, so elapsed times and weight trends are
/// computed against one notion of "now".
///
/// ## Usage
///
/// ```rust,no_run
/// use fastline::libs::app::AppState;
///
/// # async fn run() -> anyhow::Result<()> {
/// let mut app = AppState::open()?;
/// if let Some(outcome) = app.end_fast().await? {
///     println!("ended fast {}", outcome.fast.id);
/// }
/// # Ok(())
/// # }
/// ```
pub struct AppState {
    pub fasting: FastingStore,
    pub weight: WeightStore,
    pub config: Config,
    data: DataStorage,
}

impl AppState {
    /// Opens everything from the platform data directory.
    pub fn open() -> Result<Self> {
        Ok(Self::open_at(DataStorage::new(), Arc::new(SystemClock), Config::read()?))
    }

    /// Opens the stores under `data` with an explicit clock and config.
    ///
    /// Used by tests to point the app at a scratch directory and a
    /// [`MockClock`](crate::libs::clock::MockClock).
    pub fn open_at(data: DataStorage, clock: Arc<dyn Clock>, config: Config) -> Self {
        let fasting = FastingStore::open(Box::new(FileStateStore::new(data.clone())), clock.clone());
        let weight = WeightStore::open(Box::new(FileStateStore::new(data.clone())), clock);
        Self {
            fasting,
            weight,
            config,
            data,
        }
    }

    /// Opens the sync outbox, running any pending migrations.
    pub fn outbox(&self) -> Result<Outbox> {
        let db = Db::open(self.data.get_path(DB_FILE_NAME)?)?;
        Ok(Outbox::with_db(db))
    }

    /// Ends the current fast, queues it for upload and tries to deliver the queue.
    ///
    /// The fast is ended locally no matter what happens to the upload.
    pub async fn end_fast(&mut self) -> Result<Option<EndOutcome>> {
        let client = self.config.sync_config().and_then(|sync| match BackendClient::new(sync) {
            Ok(client) => Some(client),
            Err(e) => {
                warn!(error = %e, "backend client unavailable, fast stays queued");
                None
            }
        });
        self.end_fast_with(client.as_ref()).await
    }

    /// [`AppState::end_fast`] with an explicit remote.
    ///
    /// With `remote` set to `None` the fast is ended and queued but nothing is
    /// delivered. Queue and delivery failures are logged and reported as
    /// `sync: None`; they never undo the local end.
    ///
    /// # Returns
    ///
    /// `Ok(None)` when no fast was in progress.
    pub async fn end_fast_with<R: RemoteSync>(&mut self, remote: Option<&R>) -> Result<Option<EndOutcome>> {
        let Some(fast) = self.fasting.end_fast() else {
            return Ok(None);
        };

        let mut outbox = match self.outbox() {
            Ok(outbox) => outbox,
            Err(e) => {
                warn!(fast_id = %fast.id, error = %e, "cannot open outbox, fast not queued");
                return Ok(Some(EndOutcome { fast, sync: None }));
            }
        };
        if let Err(e) = enqueue_fast(&mut outbox, &fast) {
            warn!(fast_id = %fast.id, error = %e, "failed to queue fast for sync");
            return Ok(Some(EndOutcome { fast, sync: None }));
        }

        let sync = match remote {
            Some(remote) => match flush(&mut outbox, remote, self.batch_size()).await {
                Ok(report) => Some(report),
                Err(e) => {
                    warn!(error = %e, "outbox flush failed");
                    None
                }
            },
            None => None,
        };
        Ok(Some(EndOutcome { fast, sync }))
    }

    /// Flushes the outbox using the configured backend.
    pub async fn sync(&self) -> Result<SyncReport> {
        let Some(sync) = self.config.sync_config() else {
            return Err(msg_error_anyhow!(Message::SyncNotConfigured));
        };
        let client = BackendClient::new(sync)?;
        self.sync_with(&client).await
    }

    /// Delivers queued records to `remote` in batches of the configured size.
    pub async fn sync_with<R: RemoteSync>(&self, remote: &R) -> Result<SyncReport> {
        let mut outbox = self.outbox()?;
        flush(&mut outbox, remote, self.batch_size()).await
    }

    fn batch_size(&self) -> usize {
        self.config.sync.as_ref().map(|sync| sync.batch_size).unwrap_or(20)
    }
}
