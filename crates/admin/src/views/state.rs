//! Per-request view state.
//!
//! A view's read goes through a [`ViewState`]: `begin` hands out a ticket,
//! `commit` applies the response only if that ticket is still the latest
//! and the view has not been torn down. Late responses are dropped.
//!
//! Handlers read through [`ViewState::load`]. When the client disconnects,
//! hyper drops the handler future mid-read, so the ticket is never
//! committed. `teardown` covers owners that hold a view across several
//! reads and must reject any reply still in flight.

/// Result of a view's read requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState<T> {
    Loading,
    Loaded(T),
    /// Read failed; holds the message shown in the toast.
    Failed(String),
}

impl<T> LoadState<T> {
    #[must_use]
    pub const fn loaded(&self) -> Option<&T> {
        match self {
            Self::Loaded(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Identifies one fetch started by [`ViewState::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a fetch ticket must be passed to ViewState::commit"]
pub struct FetchTicket {
    generation: u64,
}

/// What `commit` did with a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    Applied,
    /// Superseded by a newer fetch or the view was torn down.
    Discarded,
}

/// Generation-guarded holder of a view's data.
#[derive(Debug)]
pub struct ViewState<T> {
    generation: u64,
    torn_down: bool,
    state: LoadState<T>,
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ViewState<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            generation: 0,
            torn_down: false,
            state: LoadState::Loading,
        }
    }

    /// Start a fetch. Any ticket handed out earlier becomes stale.
    pub fn begin(&mut self) -> FetchTicket {
        self.generation += 1;
        self.state = LoadState::Loading;
        FetchTicket {
            generation: self.generation,
        }
    }

    /// Apply a fetch outcome if its ticket is current.
    ///
    /// A failure leaves no partial data behind: the state becomes
    /// [`LoadState::Failed`] with the given message.
    pub fn commit(&mut self, ticket: FetchTicket, outcome: Result<T, String>) -> Commit {
        if self.torn_down || ticket.generation != self.generation {
            tracing::debug!(
                ticket = ticket.generation,
                current = self.generation,
                torn_down = self.torn_down,
                "Discarding stale view response"
            );
            return Commit::Discarded;
        }

        self.state = match outcome {
            Ok(value) => LoadState::Loaded(value),
            Err(message) => LoadState::Failed(message),
        };
        Commit::Applied
    }

    /// Run one read under a fresh ticket and commit its outcome.
    ///
    /// If the returned future is dropped before `fetch` finishes, nothing
    /// is committed and the state stays [`LoadState::Loading`].
    pub async fn load<F>(&mut self, fetch: F) -> Commit
    where
        F: Future<Output = Result<T, String>>,
    {
        let ticket = self.begin();
        let outcome = fetch.await;
        self.commit(ticket, outcome)
    }

    /// Load a fresh view in one step.
    pub async fn resolve<F>(fetch: F) -> LoadState<T>
    where
        F: Future<Output = Result<T, String>>,
    {
        let mut view = Self::new();
        view.load(fetch).await;
        view.into_state()
    }

    /// Invalidate every outstanding ticket.
    pub const fn teardown(&mut self) {
        self.torn_down = true;
    }

    #[must_use]
    pub const fn state(&self) -> &LoadState<T> {
        &self.state
    }

    #[must_use]
    pub fn into_state(self) -> LoadState<T> {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_current_ticket() {
        let mut view = ViewState::new();
        let ticket = view.begin();
        assert_eq!(*view.state(), LoadState::Loading);

        assert_eq!(view.commit(ticket, Ok(vec![1, 2])), Commit::Applied);
        assert_eq!(view.state().loaded(), Some(&vec![1, 2]));
    }

    #[test]
    fn test_stale_ticket_is_discarded() {
        let mut view = ViewState::new();
        let first = view.begin();
        let second = view.begin();

        assert_eq!(view.commit(first, Ok("old")), Commit::Discarded);
        assert_eq!(*view.state(), LoadState::Loading);
        assert_eq!(view.commit(second, Ok("new")), Commit::Applied);
        assert_eq!(view.state().loaded(), Some(&"new"));
    }

    #[test]
    fn test_torn_down_view_ignores_responses() {
        let mut view: ViewState<u32> = ViewState::new();
        let ticket = view.begin();
        view.teardown();

        assert_eq!(view.commit(ticket, Ok(7)), Commit::Discarded);
        assert_eq!(*view.state(), LoadState::Loading);
    }

    #[tokio::test]
    async fn test_load_commits_outcome() {
        let mut view = ViewState::new();
        assert_eq!(view.load(async { Ok(3) }).await, Commit::Applied);
        assert_eq!(view.state().loaded(), Some(&3));

        let state = ViewState::<u32>::resolve(async { Err("Failed to fetch".to_string()) }).await;
        assert_eq!(state.error(), Some("Failed to fetch"));
    }

    #[tokio::test]
    async fn test_dropped_load_commits_nothing() {
        let mut view: ViewState<u32> = ViewState::new();
        let read = view.load(std::future::pending());
        let timed_out = tokio::time::timeout(std::time::Duration::from_millis(10), read).await;
        assert!(timed_out.is_err());
        assert_eq!(*view.state(), LoadState::Loading);

        // A later read still applies.
        assert_eq!(view.load(async { Ok(1) }).await, Commit::Applied);
        assert_eq!(view.state().loaded(), Some(&1));
    }

    #[test]
    fn test_failure_keeps_no_data() {
        let mut view: ViewState<Vec<u32>> = ViewState::new();
        let ticket = view.begin();
        let _ = view.commit(ticket, Ok(vec![1]));

        let ticket = view.begin();
        let _ = view.commit(ticket, Err("Failed to load data".to_string()));
        assert_eq!(view.state().error(), Some("Failed to load data"));
        assert!(view.into_state().loaded().is_none());
    }
}
