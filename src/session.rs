use log::debug;
use std::future::Future;
use tokio::sync::watch;

use crate::error::SearchError;
use crate::model::RecipeSummary;

/// What a view shows for the current query
#[derive(Debug, Clone, PartialEq)]
pub enum QueryState<T> {
    /// No query has been started yet
    Idle,
    Loading,
    Error(String),
    Success(T),
}

impl<T> QueryState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, QueryState::Loading)
    }
}

/// Handle for one started query; only the newest ticket may commit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryTicket {
    generation: u64,
}

impl QueryTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone)]
pub struct Snapshot<T> {
    pub generation: u64,
    pub state: QueryState<T>,
}

/// Visible state for a sequence of queries.
///
/// Each [`begin`](Self::begin) supersedes every earlier query. A result
/// arriving for a superseded ticket is dropped, so a slow stale response
/// can never overwrite a newer one.
#[derive(Debug)]
pub struct SearchSession<T> {
    tx: watch::Sender<Snapshot<T>>,
}

pub type RecipeListSession = SearchSession<Vec<RecipeSummary>>;

impl<T> Default for SearchSession<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SearchSession<T> {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Snapshot {
            generation: 0,
            state: QueryState::Idle,
        });
        SearchSession { tx }
    }

    /// Start a new query and publish `Loading`
    pub fn begin(&self) -> QueryTicket {
        let mut generation = 0;
        self.tx.send_modify(|snapshot| {
            snapshot.generation += 1;
            snapshot.state = QueryState::Loading;
            generation = snapshot.generation;
        });
        QueryTicket { generation }
    }

    pub fn is_current(&self, ticket: QueryTicket) -> bool {
        self.tx.borrow().generation == ticket.generation
    }

    /// Commit a result. Returns `false` and changes nothing when a newer
    /// query has started since `ticket` was issued.
    pub fn finish(&self, ticket: QueryTicket, result: Result<T, SearchError>) -> bool {
        let state = match result {
            Ok(data) => QueryState::Success(data),
            Err(e) => QueryState::Error(e.user_message()),
        };

        let committed = self.tx.send_if_modified(|snapshot| {
            if snapshot.generation != ticket.generation {
                return false;
            }
            snapshot.state = state;
            true
        });

        if !committed {
            debug!("Discarding result of superseded query {}", ticket.generation);
        }
        committed
    }

    /// Begin a query, await it, and commit its result if still current
    pub async fn run<F>(&self, query: F) -> bool
    where
        F: Future<Output = Result<T, SearchError>>,
    {
        let ticket = self.begin();
        let result = query.await;
        self.finish(ticket, result)
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot<T>> {
        self.tx.subscribe()
    }

    pub fn generation(&self) -> u64 {
        self.tx.borrow().generation
    }
}

impl<T: Clone> SearchSession<T> {
    pub fn state(&self) -> QueryState<T> {
        self.tx.borrow().state.clone()
    }
}
