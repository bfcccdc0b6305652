//! Access tokens and deep links: issuing, verifying and the `/start` gate.

pub mod gate;
pub mod issuer;
pub mod link;
pub mod payload;
pub mod shortener;
pub mod verifier;

pub use gate::{AccessGate, GateOutcome, IssueReason};
pub use issuer::{generate_token, TokenIssuer};
pub use link::{decode, deep_link, encode, LinkBuilder};
pub use payload::{ContentRequest, StartPayload};
pub use shortener::LinkShortener;
pub use verifier::{AccessStatus, TokenVerifier, Verification, VerificationResult};
