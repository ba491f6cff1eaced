//! OTP login: verification and credential issuance.
//!
//! The flow has two halves sharing one user record:
//!
//! - **Verification** checks the submitted code against the stored
//!   challenge, capping failed comparisons at three per challenge and
//!   rejecting codes past their deadline.
//! - **Issuance** runs only on acceptance: it signs a short-lived access
//!   token, persists a long-lived refresh session with request provenance,
//!   garbage-collects expired sessions, and clears the challenge. In this
//!   deployment a completed OTP login also activates the account.
//!
//! Stores are behind traits so the decision logic is testable without
//! Postgres; the handler receives them through [`AuthState`].

mod issue;
pub(crate) mod otp_login;
mod state;
pub(crate) mod storage;
pub(crate) mod types;
mod utils;
mod verify;

pub use state::{AuthConfig, AuthState};
pub use storage::PgAuthStore;
