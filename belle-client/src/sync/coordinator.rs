//! Request coordinator
//!
//! Tracks the one request a store may have in flight: a busy flag, the
//! cancellation token of the running request and a generation counter. A
//! result is applied only while its ticket is still current. The busy flag
//! belongs to an [`ActiveRequest`] and is released when it drops, including
//! when the future driving the request is dropped mid-await.

use std::ops::Deref;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio_util::sync::CancellationToken;

#[derive(Debug, Default)]
struct CoordinatorState {
    busy: bool,
    generation: u64,
    token: Option<CancellationToken>,
}

/// Handle for one admitted request
#[derive(Debug, Clone)]
pub struct RequestTicket {
    generation: u64,
    token: CancellationToken,
}

impl RequestTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves when the request is cancelled
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }
}

/// An admitted request. Dropping it releases the busy flag if no newer
/// request has taken over.
#[derive(Debug)]
pub struct ActiveRequest<'a> {
    coordinator: &'a RequestCoordinator,
    ticket: RequestTicket,
}

impl ActiveRequest<'_> {
    pub fn ticket(&self) -> &RequestTicket {
        &self.ticket
    }
}

impl Deref for ActiveRequest<'_> {
    type Target = RequestTicket;

    fn deref(&self) -> &RequestTicket {
        &self.ticket
    }
}

impl Drop for ActiveRequest<'_> {
    fn drop(&mut self) {
        self.coordinator.finish(&self.ticket);
    }
}

/// Result of asking to start a request
#[derive(Debug)]
pub enum Admission<'a> {
    Started(ActiveRequest<'a>),
    /// Another request is in flight; nothing should be issued
    Rejected,
}

#[derive(Debug, Default)]
pub struct RequestCoordinator {
    state: Mutex<CoordinatorState>,
}

impl RequestCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, CoordinatorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn admit(&self, state: &mut CoordinatorState) -> ActiveRequest<'_> {
        if let Some(leftover) = state.token.take() {
            leftover.cancel();
        }
        let token = CancellationToken::new();
        state.generation += 1;
        state.busy = true;
        state.token = Some(token.clone());
        ActiveRequest {
            coordinator: self,
            ticket: RequestTicket {
                generation: state.generation,
                token,
            },
        }
    }

    /// Entity policy: a second request while one is running is rejected
    pub fn start_or_reject(&self) -> Admission<'_> {
        let mut state = self.lock();
        if state.busy {
            return Admission::Rejected;
        }
        Admission::Started(self.admit(&mut state))
    }

    /// Chart policy: a second request while one is running is ignored
    pub fn start_or_ignore(&self) -> Option<ActiveRequest<'_>> {
        let mut state = self.lock();
        if state.busy {
            return None;
        }
        Some(self.admit(&mut state))
    }

    /// True iff the ticket was not cancelled and no newer request started
    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        !ticket.is_cancelled() && self.lock().generation == ticket.generation
    }

    /// Release the busy flag if `ticket` still owns it
    fn finish(&self, ticket: &RequestTicket) {
        let mut state = self.lock();
        if state.generation == ticket.generation && state.busy {
            state.busy = false;
            state.token = None;
        }
    }

    /// Cancel whatever is in flight and allow the next request to start
    pub fn cancel(&self) {
        let mut state = self.lock();
        if let Some(token) = state.token.take() {
            token.cancel();
        }
        state.busy = false;
    }

    pub fn is_busy(&self) -> bool {
        self.lock().busy
    }
}
