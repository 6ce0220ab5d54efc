//! Load bookkeeping shared by the feed and comment controllers.
//!
//! [`PagedList`] pairs a [`PaginatedCollection`] with the page cursor, the
//! [`LoadState`] machine and a generation counter. Controllers call
//! [`begin`](PagedList::begin) under their lock, release the lock for the
//! request, then hand the result to [`finish`](PagedList::finish) under the
//! lock again. A replacing load bumps the generation, so a response that was
//! started before it comes back with a stale [`LoadTicket`] and is dropped.
//!
//! Items removed through [`remove`](PagedList::remove) after the server
//! confirmed the delete shift the server's list left, so the next-page offset
//! is lowered by that count until the next replacing load.

use api::{ApiError, Identified, Page};

use crate::collection::PaginatedCollection;

/// Parameters of one page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadRequest {
    pub skip: u32,
    pub limit: u32,
    pub append: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading(LoadRequest),
    Error {
        message: String,
        request: LoadRequest,
    },
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading(_))
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Error { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// Handed out by [`PagedList::begin`] and returned to [`PagedList::finish`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct LoadTicket {
    pub request: LoadRequest,
    generation: u64,
    removed: u32,
}

/// What happened to a finished load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    Stale,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct PagedList<T> {
    items: PaginatedCollection<T>,
    page_size: u32,
    /// Zero-based index of the last page merged.
    page: u32,
    /// Confirmed deletes since the last replacing load.
    removed: u32,
    generation: u64,
    state: LoadState,
}

impl<T: Identified> PagedList<T> {
    pub fn new(page_size: u32) -> Self {
        Self {
            items: PaginatedCollection::new(),
            page_size: page_size.max(1),
            page: 0,
            removed: 0,
            generation: 0,
            state: LoadState::Idle,
        }
    }

    pub fn items(&self) -> &PaginatedCollection<T> {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut PaginatedCollection<T> {
        &mut self.items
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    /// Drop every item and invalidate loads in flight.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.items.clear();
        self.page = 0;
        self.removed = 0;
        self.state = LoadState::Idle;
    }

    /// Drop an item the server has deleted. Returns it if it was loaded.
    pub fn remove(&mut self, id: &str) -> Option<T> {
        let removed = self.items.remove(id)?;
        self.removed += 1;
        Some(removed)
    }

    /// Start a load. A replacing load invalidates every earlier ticket.
    pub fn begin(&mut self, request: LoadRequest) -> LoadTicket {
        if !request.append {
            self.generation += 1;
        }
        self.state = LoadState::Loading(request);
        LoadTicket {
            request,
            generation: self.generation,
            removed: self.removed,
        }
    }

    /// Ticket for the page after the last merged one, or `None` when nothing
    /// is left to load or a load is already running.
    pub fn begin_next(&mut self) -> Option<LoadTicket> {
        if self.is_loading() || !self.items.has_more() {
            return None;
        }
        let next = self.page + 1;
        let skip = next.saturating_mul(self.page_size).saturating_sub(self.removed);
        Some(self.begin(LoadRequest {
            skip,
            limit: self.page_size,
            append: true,
        }))
    }

    /// Re-issue the request that last failed.
    pub fn begin_retry(&mut self) -> Option<LoadTicket> {
        match &self.state {
            LoadState::Error { request, .. } => {
                let request = *request;
                Some(self.begin(request))
            }
            _ => None,
        }
    }

    pub fn finish(&mut self, ticket: LoadTicket, result: Result<Page<T>, ApiError>) -> LoadOutcome {
        if ticket.generation != self.generation {
            tracing::debug!(
                "Discarding stale page (skip {}, generation {} != {})",
                ticket.request.skip,
                ticket.generation,
                self.generation
            );
            return LoadOutcome::Stale;
        }

        match result {
            Ok(page) => {
                let count = page.items.len();
                let skip = if ticket.request.append {
                    self.items.merge(page);
                    ticket.request.skip + ticket.removed
                } else {
                    self.items.replace(page);
                    self.removed = 0;
                    ticket.request.skip
                };
                self.page = skip / ticket.request.limit.max(1);
                self.state = LoadState::Idle;
                tracing::debug!(
                    "Merged {} items at page {} ({}/{})",
                    count,
                    self.page,
                    self.items.len(),
                    self.items.total()
                );
                LoadOutcome::Applied
            }
            Err(e) => {
                let message = e.to_string();
                tracing::error!("Page load failed: {}", message);
                self.state = LoadState::Error {
                    message: message.clone(),
                    request: ticket.request,
                };
                LoadOutcome::Failed(message)
            }
        }
    }
}
