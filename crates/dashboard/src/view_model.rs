//! Aggregation and reporting state behind the admin dashboard.
//!
//! [`AccountsView`] owns the derived state (role partitions, stats, the last
//! error) and decides which listing results are applied. [`AccountsViewModel`]
//! drives it: it fetches the listing, either inline or in a background task
//! whose result is picked up by [`AccountsViewModel::poll`], and exports
//! reports.

use std::{fmt, path::PathBuf};

use api_types::account::AccountRecord;
use chrono::{DateTime, Local};
use chrono_tz::Tz;
use reporting::{
    ExportError, ExportFormat, NormalizedRecord, Report, ReportKind, Snapshot, SummaryStats,
};
use tokio::{sync::mpsc, task::JoinHandle};

use crate::client::{Client, ClientError};

type Listing = std::result::Result<Vec<AccountRecord>, ClientError>;

/// Bearer credential attached to listing requests.
#[derive(Clone)]
pub struct Credential(String);

impl Credential {
    pub fn bearer(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn token(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No listing applied yet.
    Loading,
    /// Data is present; later refreshes keep it visible.
    Ready,
}

/// Identifies one listing request. Only the latest one is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    Failed,
    /// Another request was in flight, or the result was stale.
    Ignored,
}

#[derive(Debug)]
pub struct AccountsView {
    pub phase: Phase,
    pub refreshing: bool,
    pub snapshot: Snapshot,
    pub error: Option<String>,
    pub last_refresh: Option<DateTime<Local>>,
    issued: u64,
    in_flight: Option<Ticket>,
}

impl Default for AccountsView {
    fn default() -> Self {
        Self {
            phase: Phase::Loading,
            refreshing: false,
            snapshot: Snapshot::default(),
            error: None,
            last_refresh: None,
            issued: 0,
            in_flight: None,
        }
    }
}

impl AccountsView {
    /// Starts a request, or returns `None` while one is already in flight.
    pub fn begin(&mut self) -> Option<Ticket> {
        if self.in_flight.is_some() {
            tracing::debug!("account listing already in flight, ignoring request");
            return None;
        }
        self.issued += 1;
        let ticket = Ticket(self.issued);
        self.in_flight = Some(ticket);
        self.refreshing = self.phase == Phase::Ready;
        Some(ticket)
    }

    /// Applies the result of `ticket`. On failure the previous data stays.
    pub fn apply(&mut self, ticket: Ticket, result: Listing, tz: Tz) -> LoadOutcome {
        if self.in_flight != Some(ticket) {
            tracing::debug!(?ticket, "discarding stale account listing");
            return LoadOutcome::Ignored;
        }
        self.in_flight = None;
        self.refreshing = false;

        match result {
            Ok(records) => {
                self.snapshot = Snapshot::build(&records, tz);
                self.phase = Phase::Ready;
                self.error = None;
                self.last_refresh = Some(Local::now());
                tracing::info!(
                    users = self.snapshot.stats.total_users,
                    providers = self.snapshot.stats.total_providers,
                    "accounts loaded"
                );
                LoadOutcome::Applied
            }
            Err(err) => {
                tracing::error!("failed to load accounts: {err}");
                self.error = Some(message_for_error(&err));
                LoadOutcome::Failed
            }
        }
    }

    /// Gives up on `ticket` when its task died without reporting back.
    fn abandon(&mut self, ticket: Ticket) {
        if self.in_flight == Some(ticket) {
            tracing::error!(?ticket, "account listing task ended without a result");
            self.in_flight = None;
            self.refreshing = false;
            self.error = Some("Loading stopped unexpectedly. Press r to retry.".to_string());
        }
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn stats(&self) -> SummaryStats {
        self.snapshot.stats
    }

    pub fn records(&self, kind: ReportKind) -> &[NormalizedRecord] {
        self.snapshot.records(kind)
    }
}

pub struct AccountsViewModel {
    client: Client,
    credential: Credential,
    tz: Tz,
    export_dir: PathBuf,
    view: AccountsView,
    tx: mpsc::UnboundedSender<(Ticket, Listing)>,
    rx: mpsc::UnboundedReceiver<(Ticket, Listing)>,
    task: Option<(Ticket, JoinHandle<()>)>,
}

impl AccountsViewModel {
    pub fn new(client: Client, credential: Credential, tz: Tz, export_dir: PathBuf) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            client,
            credential,
            tz,
            export_dir,
            view: AccountsView::default(),
            tx,
            rx,
            task: None,
        }
    }

    pub fn view(&self) -> &AccountsView {
        &self.view
    }

    /// Fetches the listing and applies it before returning.
    pub async fn load_accounts(&mut self) -> LoadOutcome {
        let Some(ticket) = self.view.begin() else {
            return LoadOutcome::Ignored;
        };
        let result = self.client.accounts_list(self.credential.token()).await;
        self.view.apply(ticket, result, self.tz)
    }

    /// Starts a background fetch. Returns `false` when one is already running.
    pub fn refresh(&mut self) -> bool {
        let Some(ticket) = self.view.begin() else {
            return false;
        };

        let client = self.client.clone();
        let credential = self.credential.clone();
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            let result = client.accounts_list(credential.token()).await;
            if tx.send((ticket, result)).is_err() {
                tracing::debug!("dashboard closed, dropping account listing");
            }
        });
        self.task = Some((ticket, handle));
        true
    }

    /// Applies a finished background fetch, if any. Never blocks.
    pub fn poll(&mut self) -> Option<LoadOutcome> {
        let finished = self
            .task
            .as_ref()
            .filter(|(_, handle)| handle.is_finished())
            .map(|(ticket, _)| *ticket);

        let mut outcome = None;
        while let Ok((ticket, result)) = self.rx.try_recv() {
            outcome = Some(self.view.apply(ticket, result, self.tz));
        }

        if let Some(ticket) = finished {
            self.task = None;
            self.view.abandon(ticket);
        }
        outcome
    }

    /// Waits for the background fetch started by [`refresh`](Self::refresh).
    /// A task that died without reporting back counts as a failed load.
    #[cfg(test)]
    pub async fn settle(&mut self) -> Option<LoadOutcome> {
        let (ticket, handle) = self.task.take()?;
        if let Err(err) = handle.await {
            tracing::error!(?ticket, "account listing task failed: {err}");
        }

        let mut outcome = None;
        while let Ok((ticket, result)) = self.rx.try_recv() {
            outcome = Some(self.view.apply(ticket, result, self.tz));
        }
        if self.view.in_flight == Some(ticket) {
            self.view.abandon(ticket);
            return Some(LoadOutcome::Failed);
        }
        outcome
    }

    /// Records of a partition matching `query`.
    pub fn filtered(&self, kind: ReportKind, query: &str) -> Vec<NormalizedRecord> {
        reporting::filter(self.view.records(kind), query)
    }

    /// Writes the matching records of a partition to the export directory.
    pub fn export(
        &self,
        kind: ReportKind,
        query: &str,
        format: ExportFormat,
    ) -> std::result::Result<PathBuf, ExportError> {
        let report = Report::build(kind, &self.filtered(kind, query));
        report
            .write_to(&self.export_dir, format, Local::now().date_naive())
            .inspect_err(|err| tracing::error!(%kind, "export failed: {err}"))
    }
}

impl Drop for AccountsViewModel {
    fn drop(&mut self) {
        if let Some((_, handle)) = self.task.take() {
            handle.abort();
        }
    }
}

pub fn message_for_error(err: &ClientError) -> String {
    match err {
        ClientError::Unauthorized | ClientError::Forbidden => {
            "Not authorized: check the admin token.".to_string()
        }
        ClientError::NotFound => "Account listing endpoint not found.".to_string(),
        ClientError::Server(message) => format!("Server error: {message}"),
        ClientError::Decode(message) => format!("Unexpected response: {message}"),
        ClientError::Transport(err) => format!("Server unreachable: {err}"),
    }
}
