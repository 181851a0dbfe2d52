//! Safety filters: prompt-injection detection and PII scrubbing.
//!
//! Both are stateless-per-call pattern matchers built from fixed, ordered
//! regex catalogues. Callers act on the returned reports; neither filter
//! mutates anything beyond its own output.

pub mod injection;
pub mod pii;

pub use injection::{InjectionGuard, InjectionReport, RiskLevel};
pub use pii::{PiiCategory, PiiScrubber, ScrubResult};
