use api_types::account::{AccountRecord, Role};
use chrono_tz::Tz;
use serde::Serialize;

use crate::{ReportKind, record::NormalizedRecord};

/// Counts shown on the dashboard overview.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SummaryStats {
    pub total_users: usize,
    pub total_providers: usize,
    pub active_users: usize,
    pub active_providers: usize,
    /// Accounts whose role is missing or unrecognized.
    pub unclassified: usize,
}

impl SummaryStats {
    pub fn compute(
        users: &[NormalizedRecord],
        providers: &[NormalizedRecord],
        unclassified: usize,
    ) -> Self {
        Self {
            total_users: users.len(),
            total_providers: providers.len(),
            active_users: users.iter().filter(|r| r.is_active()).count(),
            active_providers: providers.iter().filter(|r| r.is_active()).count(),
            unclassified,
        }
    }
}

/// Role partitions of one account listing, with their stats.
///
/// A snapshot is rebuilt from scratch on every fetch; it is never patched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub users: Vec<NormalizedRecord>,
    pub providers: Vec<NormalizedRecord>,
    pub unclassified: Vec<NormalizedRecord>,
    pub stats: SummaryStats,
}

impl Snapshot {
    /// Partitions `records` by role, keeping arrival order inside each
    /// partition.
    ///
    /// Admin accounts are left out of every partition. Accounts with a
    /// missing or unknown role land in `unclassified`.
    pub fn build(records: &[AccountRecord], tz: Tz) -> Self {
        let mut users = Vec::new();
        let mut providers = Vec::new();
        let mut unclassified = Vec::new();
        let mut admins = 0usize;

        for record in records {
            match record.role() {
                Some(Role::User) => users.push(NormalizedRecord::from_record(record, tz)),
                Some(Role::ServiceProvider) => {
                    providers.push(NormalizedRecord::from_record(record, tz))
                }
                Some(Role::Admin) => admins += 1,
                None => unclassified.push(NormalizedRecord::from_record(record, tz)),
            }
        }

        if admins > 0 {
            tracing::debug!("left {admins} admin accounts out of the report");
        }
        if !unclassified.is_empty() {
            tracing::warn!(
                count = unclassified.len(),
                "accounts with a missing or unknown role are not counted as users or providers"
            );
        }

        let stats = SummaryStats::compute(&users, &providers, unclassified.len());
        Self {
            users,
            providers,
            unclassified,
            stats,
        }
    }

    /// Records backing a report of the given kind.
    pub fn records(&self, kind: ReportKind) -> &[NormalizedRecord] {
        match kind {
            ReportKind::Users => &self.users,
            ReportKind::Providers => &self.providers,
        }
    }
}
