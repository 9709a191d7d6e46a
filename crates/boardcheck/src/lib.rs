//! boardcheck - black-box conformance harness for browser-style board games
//!
//! A game under test is injected as a [`Browser`](boardcheck_contract::Browser)
//! whose pages implement the capability interface of
//! [`boardcheck_contract`]. The harness drives each page through a fixed
//! catalogue of scenarios and reports a verdict per scenario.
//!
//! # Architecture
//!
//! - **Driver**: capability calls with fault capture, invariant checks and
//!   bounded polling
//! - **Scenarios**: one module per group, each run in a fresh context
//! - **Suite**: filtering, sequencing and the run report
//! - **Config**: TOML harness configuration
//!
//! # Example
//!
//! ```no_run
//! use boardcheck::{Filter, HarnessConfig, Suite};
//! use boardcheck_reference::ReferenceBrowser;
//!
//! # async fn example() {
//! let suite = Suite::new(ReferenceBrowser::default(), HarnessConfig::default());
//! let report = suite.run(&Filter::all()).await;
//! assert!(report.is_success());
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod catalogue;
mod config;
mod driver;
mod error;
pub mod expect;
mod report;
mod scenarios;
mod suite;

pub use catalogue::{Filter, Group, ScenarioId};
pub use config::{ConfigError, HarnessConfig, Timing};
pub use driver::{Driver, summarize};
pub use error::{ArtifactError, AssertionFailure, DeadlineExceeded, FaultReport, HarnessError};
pub use report::{ScenarioReport, SuiteReport, Verdict};
pub use scenarios::Scene;
pub use suite::Suite;
