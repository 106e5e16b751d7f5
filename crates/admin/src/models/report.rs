//! Content moderation reports.
//!
//! The backend has no moderation endpoint yet, so the Reports view works on
//! an in-process queue seeded from the sample dataset.

use chrono::NaiveDate;
use tunenest_core::{ReportId, ReportKind, ReportStatus};

use crate::views::Searchable;

/// A moderation report against a song or a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub id: ReportId,
    pub kind: ReportKind,
    /// Song title or reported username.
    pub title: String,
    /// Artist of a reported song.
    pub artist: Option<String>,
    pub reported_by: String,
    pub reason: String,
    pub status: ReportStatus,
    pub date: NaiveDate,
}

impl Searchable for Report {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str(), self.reported_by.as_str()];
        if let Some(artist) = &self.artist {
            fields.push(artist);
        }
        fields
    }
}

/// Status and type filters of the Reports view; `None` means "All".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportFilter {
    pub status: Option<ReportStatus>,
    pub kind: Option<ReportKind>,
}

impl ReportFilter {
    /// Whether a report passes both filters.
    #[must_use]
    pub fn matches(&self, report: &Report) -> bool {
        self.status.is_none_or(|status| report.status == status)
            && self.kind.is_none_or(|kind| report.kind == kind)
    }
}

/// The in-memory moderation queue.
#[derive(Debug, Clone, Default)]
pub struct ReportQueue {
    reports: Vec<Report>,
}

impl ReportQueue {
    #[must_use]
    pub const fn new(reports: Vec<Report>) -> Self {
        Self { reports }
    }

    #[must_use]
    pub fn all(&self) -> &[Report] {
        &self.reports
    }

    /// Move a report to a new status. Returns `false` if the id is unknown.
    pub fn set_status(&mut self, id: &ReportId, status: ReportStatus) -> bool {
        self.reports
            .iter_mut()
            .find(|report| &report.id == id)
            .map(|report| report.status = status)
            .is_some()
    }

    /// Drop a report. Returns `false` if the id is unknown.
    pub fn remove(&mut self, id: &ReportId) -> bool {
        let before = self.reports.len();
        self.reports.retain(|report| &report.id != id);
        self.reports.len() != before
    }

    /// Number of reports still awaiting a decision.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.reports
            .iter()
            .filter(|report| report.status == ReportStatus::Pending)
            .count()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::sample_data::SampleData;

    fn queue() -> ReportQueue {
        ReportQueue::new(SampleData::new(true).reports())
    }

    #[test]
    fn test_set_status_and_remove() {
        let mut queue = queue();
        assert_eq!(queue.pending_count(), 3);

        assert!(queue.set_status(&ReportId::new("1"), ReportStatus::Resolved));
        assert_eq!(queue.pending_count(), 2);
        assert!(!queue.set_status(&ReportId::new("99"), ReportStatus::Resolved));

        assert!(queue.remove(&ReportId::new("2")));
        assert!(!queue.remove(&ReportId::new("2")));
        assert_eq!(queue.all().len(), 4);
    }

    #[test]
    fn test_filter_all_means_no_filter() {
        let queue = queue();
        let all = ReportFilter::default();
        assert!(queue.all().iter().all(|r| all.matches(r)));

        let songs = ReportFilter {
            status: None,
            kind: Some(ReportKind::Song),
        };
        assert_eq!(queue.all().iter().filter(|r| songs.matches(r)).count(), 3);

        let resolved_users = ReportFilter {
            status: Some(ReportStatus::Resolved),
            kind: Some(ReportKind::User),
        };
        let matched: Vec<_> = queue
            .all()
            .iter()
            .filter(|r| resolved_users.matches(r))
            .collect();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].title, "troll_account");
    }

    #[test]
    fn test_search_fields_include_artist() {
        let queue = queue();
        let fake_love = &queue.all()[0];
        assert_eq!(fake_love.search_fields(), vec!["Fake Love", "user123", "BTS"]);
    }
}
