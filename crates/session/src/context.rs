//! Session context: one per signed-in client.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_stream::wrappers::WatchStream;

use planboard_auth::{resolve_identity, Identity};

use crate::error::SessionError;
use crate::provider::{IdentityProvider, RawIdentity};
use crate::state::SessionState;

struct Inner {
    provider: Arc<dyn IdentityProvider>,
    state_tx: watch::Sender<SessionState>,
    /// Newest resolution ticket. Only the holder of the newest ticket may commit.
    ticket: Mutex<u64>,
    last_error: Mutex<Option<String>>,
    torn_down: AtomicBool,
}

impl Inner {
    fn next_ticket(&self) -> u64 {
        match self.ticket.lock() {
            Ok(mut t) => {
                *t += 1;
                *t
            }
            Err(poisoned) => {
                let mut t = poisoned.into_inner();
                *t += 1;
                *t
            }
        }
    }

    /// Publish `state` if `ticket` is still the newest. Returns whether it was published.
    fn commit(&self, ticket: u64, state: SessionState) -> bool {
        let guard = match self.ticket.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        if *guard != ticket || self.torn_down.load(Ordering::SeqCst) {
            tracing::debug!("discarding stale session resolution (ticket {ticket}, newest {})", *guard);
            return false;
        }

        let previous = self.state_tx.send_replace(state);
        let current = self.state_tx.borrow();
        if previous.label() != current.label() {
            tracing::info!("session {} -> {}", previous.label(), current.label());
        }
        true
    }

    async fn resolve(&self, raw: &RawIdentity, force_refresh: bool) -> SessionState {
        let token = match self.provider.fetch_token(raw, force_refresh).await {
            Ok(token) => token,
            Err(err) => {
                tracing::warn!("could not fetch token for {}: {err:#}", raw.subject_id);
                return SessionState::Unauthenticated;
            }
        };

        match resolve_identity(&token) {
            Ok(identity) => {
                if identity.tenant_id.is_none() {
                    tracing::info!("subject {} is signed in without a tenant", identity.subject_id);
                }
                SessionState::Authenticated(identity)
            }
            Err(err) => {
                tracing::warn!("could not resolve claims for {}: {err}", raw.subject_id);
                SessionState::Unauthenticated
            }
        }
    }

    fn record_error(&self, err: &SessionError) {
        tracing::warn!("{err}");
        if let Ok(mut slot) = self.last_error.lock() {
            *slot = Some(err.to_string());
        }
    }
}

/// Session lifecycle over an identity provider.
///
/// Provider events are handled strictly in delivery order. A newer event
/// arriving while a claims resolution is in flight cancels that resolution,
/// and a forced refresh is discarded if an event overtakes it.
pub struct SessionContext {
    inner: Arc<Inner>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl SessionContext {
    /// Enter `Loading` and start observing `provider`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn init(provider: Arc<dyn IdentityProvider>) -> Self {
        let (state_tx, _) = watch::channel(SessionState::Uninitialized);
        let events = provider.subscribe();

        let inner = Arc::new(Inner {
            provider,
            state_tx,
            ticket: Mutex::new(0),
            last_error: Mutex::new(None),
            torn_down: AtomicBool::new(false),
        });
        inner.state_tx.send_replace(SessionState::Loading);
        tracing::info!("session uninitialized -> loading");

        let task = tokio::spawn(run_events(Arc::clone(&inner), events));

        Self {
            inner,
            task: Mutex::new(Some(task)),
        }
    }

    pub fn state(&self) -> SessionState {
        self.inner.state_tx.borrow().clone()
    }

    pub fn identity(&self) -> Option<Identity> {
        self.inner.state_tx.borrow().identity().cloned()
    }

    pub fn watch(&self) -> watch::Receiver<SessionState> {
        self.inner.state_tx.subscribe()
    }

    /// The current state followed by every change.
    pub fn state_stream(&self) -> WatchStream<SessionState> {
        WatchStream::new(self.watch())
    }

    /// Wait for the first settled state (`Authenticated` or `Unauthenticated`).
    pub async fn ready(&self) -> SessionState {
        let mut rx = self.watch();
        match rx.wait_for(SessionState::is_settled).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<(), SessionError> {
        self.begin()?;
        self.inner
            .provider
            .sign_in(email, password)
            .await
            .map(|_| ())
            .map_err(|e| self.fail(SessionError::provider(e)))
    }

    /// Create an account, then set its display name.
    ///
    /// Like `login`, the resulting state comes from the provider's sign-up
    /// event. A name set after that event was resolved shows up on the next
    /// resolution.
    pub async fn register(&self, email: &str, password: &str, display_name: &str) -> Result<(), SessionError> {
        self.begin()?;
        let provider = &self.inner.provider;

        let raw = provider
            .sign_up(email, password)
            .await
            .map_err(|e| self.fail(SessionError::provider(e)))?;
        provider
            .update_display_name(&raw, display_name)
            .await
            .map_err(|e| self.fail(SessionError::provider(e)))
    }

    pub async fn logout(&self) -> Result<(), SessionError> {
        self.begin()?;
        self.inner
            .provider
            .sign_out()
            .await
            .map_err(|e| self.fail(SessionError::provider(e)))
    }

    /// Re-resolve claims from a freshly issued token without waiting for a
    /// provider event. Required after claims are provisioned out of band.
    pub async fn force_claims_refresh(&self) -> Result<Option<Identity>, SessionError> {
        if self.inner.torn_down.load(Ordering::SeqCst) {
            return Err(SessionError::TornDown);
        }
        let raw = self.inner.provider.current().ok_or(SessionError::NotSignedIn)?;

        let ticket = self.inner.next_ticket();
        let state = self.inner.resolve(&raw, true).await;
        if !self.inner.commit(ticket, state.clone()) {
            return Ok(self.identity());
        }
        Ok(state.identity().cloned())
    }

    pub fn last_error(&self) -> Option<String> {
        self.inner.last_error.lock().ok().and_then(|e| e.clone())
    }

    pub fn clear_error(&self) {
        if let Ok(mut slot) = self.inner.last_error.lock() {
            *slot = None;
        }
    }

    /// Stop observing the provider. No state changes are published afterwards.
    pub fn teardown(&self) {
        if self.inner.torn_down.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Ok(mut task) = self.task.lock() {
            if let Some(handle) = task.take() {
                handle.abort();
            }
        }
        tracing::info!("session torn down");
    }

    pub fn is_torn_down(&self) -> bool {
        self.inner.torn_down.load(Ordering::SeqCst)
    }

    fn begin(&self) -> Result<(), SessionError> {
        if self.is_torn_down() {
            return Err(SessionError::TornDown);
        }
        self.clear_error();
        Ok(())
    }

    fn fail(&self, err: SessionError) -> SessionError {
        self.inner.record_error(&err);
        err
    }
}

impl Drop for SessionContext {
    fn drop(&mut self) {
        self.teardown();
    }
}

async fn run_events(inner: Arc<Inner>, mut events: mpsc::UnboundedReceiver<Option<RawIdentity>>) {
    let mut pending: Option<Option<RawIdentity>> = None;

    loop {
        let event = match pending.take() {
            Some(event) => event,
            None => match events.recv().await {
                Some(event) => event,
                None => break,
            },
        };

        let ticket = inner.next_ticket();
        let Some(raw) = event else {
            inner.commit(ticket, SessionState::Unauthenticated);
            continue;
        };

        let resolution = inner.resolve(&raw, false);
        tokio::pin!(resolution);

        tokio::select! {
            biased;
            newer = events.recv() => match newer {
                Some(event) => {
                    tracing::debug!("provider event superseded resolution for {}", raw.subject_id);
                    pending = Some(event);
                }
                None => {
                    let state = resolution.await;
                    inner.commit(ticket, state);
                    break;
                }
            },
            state = &mut resolution => {
                inner.commit(ticket, state);
            }
        }
    }

    tracing::debug!("identity provider closed its event stream");
}
