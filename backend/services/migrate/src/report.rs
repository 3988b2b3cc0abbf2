/// Counters for one migration run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    pub pages_fetched: usize,
    pub page_failures: usize,
    pub tickets_seen: usize,
    /// Status outside the migratable set.
    pub filtered: usize,
    /// Zero recipient or last-updater id.
    pub skipped_invalid: usize,
    /// Recipient or last-updater email lookup failed.
    pub skipped_lookup: usize,
    pub migrated: usize,
    pub failed: usize,
    pub participants_created: usize,
    pub followups_created: usize,
    pub unresolved_authors: usize,
    /// Stopped on the page cap while the last page was still full.
    pub truncated: bool,
}
