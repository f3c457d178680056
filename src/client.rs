//! Client handle and builder.
//!
//! A [`Client`] owns the engine connection and the session state every
//! submission carries. It is a cheap handle over shared state: clone it into
//! as many tasks as needed, all clones share one engine and one session.
//! A call never closes or consumes the client.
//!
//! # Example
//!
//! ```ignore
//! use ledger_sdk::transaction::TokenPauseTransaction;
//! use ledger_sdk::{AccountId, Client, FramedEngine, TokenId};
//!
//! #[tokio::main]
//! async fn main() -> ledger_sdk::Result<()> {
//!     let stream = connect_to_engine().await?;
//!
//!     let client = Client::builder(FramedEngine::spawn(stream))
//!         .payer_account_id(AccountId::from(2))
//!         .default_max_transaction_fee(100_000_000)
//!         .build();
//!
//!     let response = TokenPauseTransaction::new()
//!         .token_id(TokenId::from(1001))
//!         .execute(&client)
//!         .await?;
//!
//!     let receipt = response.get_receipt(&client).await?;
//!     println!("{}", receipt.status);
//!     Ok(())
//! }
//! ```

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::engine::{CorrelationId, Engine};
use crate::entity_id::AccountId;
use crate::error::Result;
use crate::request::Request;

/// Session state sent to the engine with every submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Session {
    /// Account paying for transactions and query payments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payer_account_id: Option<AccountId>,

    /// Fee ceiling for transactions that do not set their own.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_max_transaction_fee: Option<u64>,

    /// Ceiling for what a single query may cost.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_query_payment: Option<u64>,
}

/// Builder for a [`Client`].
pub struct ClientBuilder {
    engine: Arc<dyn Engine>,
    session: Session,
}

impl ClientBuilder {
    /// Start building a client around `engine`.
    pub fn new<E: Engine>(engine: E) -> Self {
        Self::with_shared_engine(Arc::new(engine))
    }

    /// Start building a client around an engine already shared elsewhere.
    pub fn with_shared_engine(engine: Arc<dyn Engine>) -> Self {
        Self {
            engine,
            session: Session::default(),
        }
    }

    /// Set the paying account.
    pub fn payer_account_id(mut self, account_id: impl Into<AccountId>) -> Self {
        self.session.payer_account_id = Some(account_id.into());
        self
    }

    /// Set the default fee ceiling for transactions.
    pub fn default_max_transaction_fee(mut self, fee: u64) -> Self {
        self.session.default_max_transaction_fee = Some(fee);
        self
    }

    /// Set the cost ceiling for queries.
    pub fn max_query_payment(mut self, amount: u64) -> Self {
        self.session.max_query_payment = Some(amount);
        self
    }

    /// Build the client.
    pub fn build(self) -> Client {
        Client {
            inner: Arc::new(ClientInner {
                engine: self.engine,
                session: RwLock::new(self.session),
                next_correlation: AtomicU64::new(1),
                in_flight: AtomicUsize::new(0),
                violations: Arc::new(AtomicU64::new(0)),
            }),
        }
    }
}

struct ClientInner {
    engine: Arc<dyn Engine>,
    session: RwLock<Session>,
    next_correlation: AtomicU64,
    in_flight: AtomicUsize,
    violations: Arc<AtomicU64>,
}

/// Shared handle to an engine and its session.
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

impl Client {
    /// Start building a client around `engine`.
    pub fn builder<E: Engine>(engine: E) -> ClientBuilder {
        ClientBuilder::new(engine)
    }

    /// Client with an empty session.
    pub fn new<E: Engine>(engine: E) -> Self {
        ClientBuilder::new(engine).build()
    }

    /// Execute a request and decode its declared response type.
    ///
    /// # Errors
    ///
    /// See [`crate::Error`] for the four failure kinds.
    pub async fn execute<R: Request + ?Sized>(&self, request: &R) -> Result<R::Response> {
        crate::execute::execute(self, request).await
    }

    /// Execute a request and decode the response as `T`.
    pub async fn execute_as<T, R>(&self, request: &R) -> Result<T>
    where
        T: DeserializeOwned,
        R: Request + ?Sized,
    {
        crate::execute::execute(self, request).await
    }

    /// Snapshot of the current session state.
    pub fn session(&self) -> Session {
        self.inner.session.read().clone()
    }

    /// Replace the paying account for later submissions.
    pub fn set_payer_account_id(&self, account_id: impl Into<AccountId>) {
        self.inner.session.write().payer_account_id = Some(account_id.into());
    }

    /// Replace the default transaction fee ceiling for later submissions.
    pub fn set_default_max_transaction_fee(&self, fee: Option<u64>) {
        self.inner.session.write().default_max_transaction_fee = fee;
    }

    /// Replace the query cost ceiling for later submissions.
    pub fn set_max_query_payment(&self, amount: Option<u64>) {
        self.inner.session.write().max_query_payment = amount;
    }

    /// Completion contract violations observed on this client.
    pub fn protocol_violations(&self) -> u64 {
        self.inner.violations.load(Ordering::Relaxed)
    }

    /// Calls currently waiting on the engine.
    pub fn in_flight(&self) -> usize {
        self.inner.in_flight.load(Ordering::Acquire)
    }

    pub(crate) fn engine(&self) -> &dyn Engine {
        &*self.inner.engine
    }

    pub(crate) fn next_correlation(&self) -> CorrelationId {
        CorrelationId(self.inner.next_correlation.fetch_add(1, Ordering::Relaxed))
    }

    pub(crate) fn violation_monitor(&self) -> Arc<AtomicU64> {
        self.inner.violations.clone()
    }

    /// Count a call as in flight until the guard drops.
    pub(crate) fn track_in_flight(&self) -> InFlight<'_> {
        self.inner.in_flight.fetch_add(1, Ordering::AcqRel);
        InFlight {
            counter: &self.inner.in_flight,
        }
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("session", &*self.inner.session.read())
            .field("in_flight", &self.in_flight())
            .finish_non_exhaustive()
    }
}

pub(crate) struct InFlight<'a> {
    counter: &'a AtomicUsize,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::AcqRel);
    }
}
