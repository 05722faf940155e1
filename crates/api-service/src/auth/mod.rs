//! Bearer token authentication.
//!
//! Request pipeline: [`filter`] turns the `Authorization` header into an
//! [`Authentication`] outcome, [`access`] admits or rejects the request, and
//! [`entry_point`] renders the 401 for unauthenticated rejections.

pub mod access;
pub mod claims;
pub mod entry_point;
pub mod failure;
pub mod filter;
pub mod principal;
pub mod token_provider;

pub use access::AccessPolicy;
pub use claims::Claims;
pub use failure::FailureReason;
pub use filter::JwtAuthenticationFilter;
pub use principal::{Authentication, Principal};
pub use token_provider::JwtTokenProvider;
