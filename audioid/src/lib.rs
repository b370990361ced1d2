//! # Audio identification matching engine
//!
//! Turns payloads from identification services into a ranked, de-duplicated
//! list of match candidates for one known song.
//!
//! Data flow:
//! [`LookupOrchestrator`] → per source [`parse`] → [`ResponsePool`] →
//! [`scorer`] → [`RankedIndex`] → [`dedup`] → final ranked order.
//!
//! Network transport is supplied by the caller through
//! [`sources::LookupTransport`].

pub mod dedup;
pub mod descriptor;
pub mod error;
pub mod orchestrator;
pub mod parse;
pub mod pool;
pub mod ranked;
pub mod scorer;
pub mod sources;
pub mod types;

pub use crate::error::{LookupError, LookupResult, ParseError, TransportError};
pub use crate::orchestrator::{LookupOrchestrator, LookupState};
pub use crate::parse::{DocumentParser, PayloadFormat};
pub use crate::pool::{CandidateRecord, ResponsePool, SetOutcome};
pub use crate::ranked::RankedIndex;
pub use crate::sources::{LookupTransport, ReplayTransport, SourceResponse};
pub use crate::types::{AttributeKey, SourceId, Value};
