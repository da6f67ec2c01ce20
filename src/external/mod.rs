//! External fraud signals
//!
//! Per-claim fraud scores, triggered fraud rules and financial amounts
//! supplied from outside the network analysis. Tables are read from CSV
//! or JSON files or simulated from the ground-truth fraud flags for demos.

pub mod files;
pub mod signals;
pub mod simulate;

pub use files::FileSignalSource;
pub use signals::{
    ClaimFinancials, ExternalSignals, FraudRule, RulePriority, SignalError, SignalResult, SignalSource,
};
pub use simulate::{SimulatedSignalSource, RULE_CATALOG};
