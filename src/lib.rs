//! # Chainman
//!
//! Chain-based REST API test harness: ordered HTTP steps threading extracted
//! values through a per-chain context, declarative response assertions, and
//! structured per-step reporting. The HTTP transport, fixture generation and
//! report rendering sit behind interfaces; the core only orchestrates call
//! sequences and checks concrete response properties.

pub mod assertions;
pub mod chain;
pub mod error;
pub mod fixtures;
pub mod http;
pub mod report;
pub mod suite;
pub mod template;

pub use assertions::{Assertion, AssertionOutcome, Expected, FieldLookup, FieldPath, Verdict, evaluate};
pub use chain::context::Context;
pub use chain::result::{ChainResult, StepResult};
pub use chain::runner::{ChainRunner, RunnerConfig};
pub use chain::{Chain, ExtractSource, Extraction, Step};
pub use error::{ChainError, ExtractionError, StepError};
pub use fixtures::faker::FakerFixtures;
pub use fixtures::{Credentials, FixtureKind, FixtureProvider, MIN_PASSWORD_LEN};
pub use http::client::ReqwestTransport;
pub use http::method::HttpMethod;
pub use http::request::{RequestBody, RequestSpec, ResolvedRequest};
pub use http::response::{ResponseBody, ResponseView};
pub use http::transport::{Transport, TransportError};
pub use report::{OutputFormat, RunReport, render};
pub use suite::default_suite;
