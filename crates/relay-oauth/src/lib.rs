//! OAuth 1.0a signing core for the relay proxy.
//!
//! Three pieces, layered bottom-up:
//!
//! - [`signature`]: pure RFC 5849 base-string construction and
//!   HMAC-SHA1 / RSA-SHA1 signing. Synchronous and CPU-only.
//! - [`FlowClient`]: the request-token and access-token legs of the
//!   three-legged flow against a fixed upstream.
//! - [`SignedClient`]: ad-hoc GET/POST/DELETE resource calls signed with a
//!   caller-supplied access token pair.
//!
//! Upstream non-2xx statuses on resource calls are not errors here: they
//! resolve to a [`FetchOutcome::HttpStatus`] carrying the human-readable
//! text from [`status::status_text`], so callers can branch without
//! exception handling. Only transport failures surface as `Err`.

mod error;
mod executor;
mod flows;
pub mod key;
pub mod signature;
pub mod status;

#[cfg(test)]
pub(crate) mod testutil;

pub use error::{OAuthError, RsaKeyError};
pub use executor::{FetchOutcome, GetOptions, SignedClient, TokenPair};
pub use flows::{AccessToken, FlowClient, FlowEndpoints, RequestToken};
pub use key::{load_private_key, load_private_key_from_file};
pub use signature::{Credentials, SignatureMethod};
