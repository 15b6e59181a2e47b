pub mod error;
pub mod oidc;
pub mod token;

pub use error::{Error, Result};
