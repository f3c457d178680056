//! # ledger-sdk
//!
//! Request/response execution core for a distributed-ledger client SDK.
//!
//! Typed requests (transactions and queries) are serialized to JSON payloads
//! and submitted to an [`Engine`], which does the networking, signing and
//! retries. The engine answers each submission exactly once, through a
//! [`CompletionSlot`], with either a JSON result or an error code.
//!
//! ## Architecture
//!
//! - **Requests**: `Transaction<D>` and `Query<D>`, each a variant data type
//!   plus shared base fields, encoded as one tagged JSON object
//! - **Execution**: [`Client::execute`] correlates a submission with its
//!   completion and decodes the result
//! - **Engines**: anything implementing [`Engine`]; [`FramedEngine`] talks to
//!   an engine process over a length-prefixed binary stream
//!
//! ## Example
//!
//! ```ignore
//! use ledger_sdk::transaction::TokenWipeTransaction;
//! use ledger_sdk::{AccountId, Client, FramedEngine, TokenId};
//!
//! #[tokio::main]
//! async fn main() -> ledger_sdk::Result<()> {
//!     let engine = FramedEngine::spawn(connect_to_engine().await?);
//!     let client = Client::builder(engine).payer_account_id(AccountId::from(5006)).build();
//!
//!     let mut wipe = TokenWipeTransaction::new();
//!     wipe.token_id(TokenId::from(1001)).amount(100);
//!
//!     let receipt = wipe.execute(&client).await?.get_receipt(&client).await?;
//!     println!("{}", receipt.status);
//!     Ok(())
//! }
//! ```

pub mod codec;
pub mod engine;
pub mod error;
pub mod protocol;
pub mod query;
pub mod request;
pub mod transaction;
pub mod writer;

mod client;
mod entity_id;
mod execute;
mod semantic_version;
mod transaction_id;

pub use client::{Client, ClientBuilder, Session};
pub use engine::{
    Completion, CompletionReceiver, CompletionSlot, CorrelationId, Engine, EngineErrorCode,
    FramedEngine, FramedEngineConfig, Submission,
};
pub use entity_id::{AccountId, ContractId, EntityId, ScheduleId, TokenId, TopicId};
pub use error::{Error, Result};
pub use request::Request;
pub use semantic_version::SemanticVersion;
pub use transaction_id::{Timestamp, TransactionId};
