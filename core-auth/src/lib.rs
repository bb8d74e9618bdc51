//! # Device Link & Session Tokens
//!
//! Implements the account-linking side of the gateway:
//!
//! - OAuth 2.0 device-authorization grant against the identity provider
//!   (request a user code, poll for a token, refresh a token)
//! - The compact encoding used to fit oversized bearer tokens into the
//!   protocol's 2048-character token field
//!
//! The gateway holds no link state of its own: the identity provider owns
//! the device-code session, and every later call carries its own
//! [`CredentialBundle`].

pub mod device_link;
pub mod error;
pub mod token_codec;
pub mod types;

pub use device_link::{AuthConfig, DeviceLinkFlow};
pub use error::{AuthError, Result};
pub use token_codec::{compress, decompress, TOKEN_LENGTH_LIMIT};
pub use types::{CredentialBundle, DeviceLinkCode, LinkedTokens};
