//! Consent orchestration: validation, id and status assignment, persistence, mapping.

mod clock;
mod service;
mod validator;

pub use clock::{Clock, SystemClock};
#[cfg(feature = "test-util")]
pub use clock::FixedClock;
pub use consent_types::ConsentServiceError;
pub use service::DefaultConsentService;
pub use validator::{validate, ValidatedRequest};
