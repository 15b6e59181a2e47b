use jsonwebtoken::errors::Error as JwtError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
    #[error("Login state does not match")]
    InvalidState,
    #[error("OIDC claim validation error: {0}")]
    OidcClaimError(#[from] openidconnect::ClaimsVerificationError),
}

impl Error {
    /// Token was well formed but its validity ended
    pub fn is_expired(&self) -> bool {
        matches!(self, Error::JwtError(e) if matches!(
            e.kind(),
            jsonwebtoken::errors::ErrorKind::ExpiredSignature
        ))
    }
}
