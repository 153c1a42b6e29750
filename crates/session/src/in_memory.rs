use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use anyhow::{anyhow, bail, Context};
use chrono::Duration;
use serde_json::{Map, Value};
use tokio::sync::{mpsc, watch, Notify};

use planboard_auth::{CustomClaims, VerifiedToken};
use planboard_core::{Clock, SubjectId, SystemClock};

use crate::provider::{IdentityAdmin, IdentityProvider, RawIdentity, UserRecord};

const MIN_PASSWORD_LEN: usize = 6;
const TOKEN_LIFETIME_HOURS: i64 = 1;

#[derive(Debug, Clone)]
struct Account {
    subject_id: SubjectId,
    email: String,
    password: String,
    display_name: Option<String>,
    /// Claims as last set by the admin side.
    claims: Map<String, Value>,
    /// Claims embedded in the most recently issued token.
    issued_claims: Map<String, Value>,
}

impl Account {
    fn raw(&self) -> RawIdentity {
        RawIdentity {
            subject_id: self.subject_id.clone(),
            email: Some(self.email.clone()),
            display_name: self.display_name.clone(),
        }
    }

    fn record(&self) -> UserRecord {
        UserRecord {
            subject_id: self.subject_id.clone(),
            email: Some(self.email.clone()),
            display_name: self.display_name.clone(),
            custom_claims: self.claims.clone(),
        }
    }
}

/// In-memory identity provider for tests/dev.
///
/// Tokens behave like real ones: claims set through [`IdentityAdmin`] are only
/// visible after a forced refresh. Token fetches can be paused or made to fail.
pub struct InMemoryIdentityProvider {
    accounts: RwLock<HashMap<String, Account>>,
    current: RwLock<Option<String>>,
    subscribers: Mutex<Vec<mpsc::UnboundedSender<Option<RawIdentity>>>>,
    next_subject: AtomicU64,
    fail_tokens: AtomicBool,
    tokens_paused: watch::Sender<bool>,
    fetch_started: Notify,
    clock: Arc<dyn Clock>,
}

impl Default for InMemoryIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryIdentityProvider {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
            current: RwLock::new(None),
            subscribers: Mutex::new(Vec::new()),
            next_subject: AtomicU64::new(1),
            fail_tokens: AtomicBool::new(false),
            tokens_paused: watch::channel(false).0,
            fetch_started: Notify::new(),
            clock,
        }
    }

    /// Seed an account without signing it in.
    pub fn add_user(&self, email: &str, password: &str, display_name: Option<&str>) -> anyhow::Result<SubjectId> {
        let account = self.create_account(email, password)?;
        let subject_id = account.subject_id.clone();
        let mut accounts = self.accounts.write().map_err(|_| anyhow!("accounts lock poisoned"))?;
        if accounts.contains_key(&account.email) {
            bail!("email already in use: {}", account.email);
        }
        accounts.insert(
            account.email.clone(),
            Account {
                display_name: display_name.map(str::to_string),
                ..account
            },
        );
        Ok(subject_id)
    }

    /// Make token fetches fail until reset.
    pub fn set_token_failure(&self, fail: bool) {
        self.fail_tokens.store(fail, Ordering::SeqCst);
    }

    /// Hold every token fetch until [`Self::resume_tokens`].
    pub fn pause_tokens(&self) {
        self.tokens_paused.send_replace(true);
    }

    pub fn resume_tokens(&self) {
        self.tokens_paused.send_replace(false);
    }

    /// Wait until a token fetch has started since the last call.
    pub async fn fetch_started(&self) {
        self.fetch_started.notified().await;
    }

    fn create_account(&self, email: &str, password: &str) -> anyhow::Result<Account> {
        let email = email.trim().to_lowercase();
        if !email.contains('@') {
            bail!("invalid email: {email}");
        }
        if password.len() < MIN_PASSWORD_LEN {
            bail!("password must be at least {MIN_PASSWORD_LEN} characters");
        }
        let n = self.next_subject.fetch_add(1, Ordering::SeqCst);
        Ok(Account {
            subject_id: SubjectId::new(format!("uid-{n}"))?,
            email,
            password: password.to_string(),
            display_name: None,
            claims: Map::new(),
            issued_claims: Map::new(),
        })
    }

    fn broadcast(&self, event: Option<RawIdentity>) {
        let Ok(mut subs) = self.subscribers.lock() else {
            return;
        };
        // Drop any dead subscribers while publishing.
        subs.retain(|tx| tx.send(event.clone()).is_ok());
    }

    fn set_current(&self, email: Option<String>) -> anyhow::Result<()> {
        let mut current = self.current.write().map_err(|_| anyhow!("session lock poisoned"))?;
        *current = email;
        Ok(())
    }

    fn account_by_subject<'a>(accounts: &'a mut HashMap<String, Account>, subject_id: &SubjectId) -> anyhow::Result<&'a mut Account> {
        accounts
            .values_mut()
            .find(|a| &a.subject_id == subject_id)
            .with_context(|| format!("no user with subject {subject_id}"))
    }
}

#[async_trait::async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    fn subscribe(&self) -> mpsc::UnboundedReceiver<Option<RawIdentity>> {
        let (tx, rx) = mpsc::unbounded_channel();
        let _ = tx.send(self.current());
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.push(tx);
        }
        rx
    }

    fn current(&self) -> Option<RawIdentity> {
        let email = self.current.read().ok()?.clone()?;
        let accounts = self.accounts.read().ok()?;
        accounts.get(&email).map(Account::raw)
    }

    async fn fetch_token(&self, identity: &RawIdentity, force_refresh: bool) -> anyhow::Result<VerifiedToken> {
        self.fetch_started.notify_one();
        let mut paused = self.tokens_paused.subscribe();
        paused
            .wait_for(|p| !*p)
            .await
            .map_err(|_| anyhow!("token service shut down"))?;

        if self.fail_tokens.load(Ordering::SeqCst) {
            bail!("token service unavailable");
        }

        let mut accounts = self.accounts.write().map_err(|_| anyhow!("accounts lock poisoned"))?;
        let account = Self::account_by_subject(&mut accounts, &identity.subject_id)?;
        if force_refresh {
            account.issued_claims = account.claims.clone();
        }

        let now = self.clock.now();
        Ok(VerifiedToken {
            subject: account.subject_id.to_string(),
            email: Some(account.email.clone()),
            display_name: account.display_name.clone(),
            issued_at: now,
            expires_at: now + Duration::hours(TOKEN_LIFETIME_HOURS),
            claims: account.issued_claims.clone(),
        })
    }

    async fn sign_in(&self, email: &str, password: &str) -> anyhow::Result<RawIdentity> {
        let key = email.trim().to_lowercase();
        let raw = {
            let mut accounts = self.accounts.write().map_err(|_| anyhow!("accounts lock poisoned"))?;
            let account = accounts
                .get_mut(&key)
                .filter(|a| a.password == password)
                .ok_or_else(|| anyhow!("invalid email or password"))?;
            account.issued_claims = account.claims.clone();
            account.raw()
        };
        self.set_current(Some(key))?;
        self.broadcast(Some(raw.clone()));
        Ok(raw)
    }

    async fn sign_up(&self, email: &str, password: &str) -> anyhow::Result<RawIdentity> {
        let account = self.create_account(email, password)?;
        let raw = account.raw();
        {
            let mut accounts = self.accounts.write().map_err(|_| anyhow!("accounts lock poisoned"))?;
            if accounts.contains_key(&account.email) {
                bail!("email already in use: {}", account.email);
            }
            accounts.insert(account.email.clone(), account.clone());
        }
        self.set_current(Some(account.email))?;
        self.broadcast(Some(raw.clone()));
        Ok(raw)
    }

    async fn update_display_name(&self, identity: &RawIdentity, display_name: &str) -> anyhow::Result<()> {
        let mut accounts = self.accounts.write().map_err(|_| anyhow!("accounts lock poisoned"))?;
        let account = Self::account_by_subject(&mut accounts, &identity.subject_id)?;
        account.display_name = Some(display_name.to_string());
        Ok(())
    }

    async fn sign_out(&self) -> anyhow::Result<()> {
        self.set_current(None)?;
        self.broadcast(None);
        Ok(())
    }
}

#[async_trait::async_trait]
impl IdentityAdmin for InMemoryIdentityProvider {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<UserRecord>> {
        let accounts = self.accounts.read().map_err(|_| anyhow!("accounts lock poisoned"))?;
        Ok(accounts.get(&email.trim().to_lowercase()).map(Account::record))
    }

    async fn set_custom_claims(&self, subject_id: &SubjectId, claims: &CustomClaims) -> anyhow::Result<()> {
        let mut accounts = self.accounts.write().map_err(|_| anyhow!("accounts lock poisoned"))?;
        let account = Self::account_by_subject(&mut accounts, subject_id)?;
        account.claims = claims.to_claims();
        Ok(())
    }

    async fn list_users(&self, limit: usize) -> anyhow::Result<Vec<UserRecord>> {
        let accounts = self.accounts.read().map_err(|_| anyhow!("accounts lock poisoned"))?;
        let mut users: Vec<UserRecord> = accounts.values().map(Account::record).collect();
        users.sort_by(|a, b| a.email.cmp(&b.email));
        users.truncate(limit);
        Ok(users)
    }
}
