//! Deterministic signal model and recommendation rule
//!
//! This crate is the decision core of advisor-rs: it normalizes raw
//! indicator values into three-valued `Signal`s, aggregates them into a
//! fundamental and a technical outlook, and maps the pair onto a closed
//! set of recommendation labels with a fixed decision table.
//!
//! Everything here is pure and synchronous: no I/O, no clock, no shared
//! state. Identical inputs always produce identical outputs, and every
//! reachable input maps to a defined output - a missing datum becomes a
//! Neutral signal rather than an error.
//!
//! # Example
//!
//! ```
//! use advisor_signals::{classify, recommend, Recommendation};
//!
//! let signals = vec![
//!     classify::valuation(Some(18.0), Some(6.1)),
//!     classify::trend(Some(192.0), Some(175.0)),
//!     classify::momentum(Some(55.0)),
//! ];
//!
//! let verdict = recommend(&signals);
//! assert_eq!(verdict.recommendation, Recommendation::StrongBuy);
//! ```

pub mod classify;
pub mod outlook;
pub mod recommendation;
pub mod signal;

pub use outlook::outlook;
pub use recommendation::{recommend, Recommendation, Verdict};
pub use signal::{Polarity, Signal, SignalCategory, SignalKind};
