use anyhow::anyhow;
use lingo_types::oidc::OIDCProviderConfig;
use openidconnect::{
    core::{CoreAuthenticationFlow, CoreClient, CoreGenderClaim, CoreProviderMetadata},
    AccessTokenHash, AuthorizationCode, ClientId, ClientSecret, CsrfToken, EmptyAdditionalClaims,
    EndpointMaybeSet, EndpointNotSet, EndpointSet, IdTokenClaims, IssuerUrl, Nonce,
    OAuth2TokenResponse, PkceCodeChallenge, PkceCodeVerifier, RedirectUrl, Scope, TokenResponse,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;
type Result<T, E = BoxError> = std::result::Result<T, E>;

/// Scopes needed to get user's name and email
pub const PROFILE_SCOPES: [&str; 2] = ["email", "profile"];

type ConfiguredClient = CoreClient<
    EndpointSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointMaybeSet,
    EndpointMaybeSet,
>;

#[derive(Debug, Clone)]
pub struct OIDCClient {
    client: ConfiguredClient,
    http_client: reqwest::Client,
}

impl OIDCClient {
    pub async fn discover(
        provider: &OIDCProviderConfig,
        redirect_url: impl Into<String>,
    ) -> Result<Self> {
        let http_client = reqwest::ClientBuilder::new()
            // Following redirects opens the client up to SSRF vulnerabilities.
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        let provider_metadata = CoreProviderMetadata::discover_async(
            IssuerUrl::new(provider.issuer_url.clone())?,
            &http_client,
        )
        .await?;

        let client = CoreClient::from_provider_metadata(
            provider_metadata,
            ClientId::new(provider.client_id.clone()),
            provider
                .client_secret
                .as_ref()
                .map(|s| ClientSecret::new(s.to_string())),
        )
        .set_redirect_uri(RedirectUrl::new(redirect_url.into())?);

        debug!("Discovered OIDC provider {}", provider.issuer_url);

        Ok(Self {
            client,
            http_client,
        })
    }

    pub fn client_id(&self) -> &str {
        self.client.client_id().as_str()
    }

    /// Provider consent page URL asking for profile scopes, secrets must be kept until callback
    pub fn auth_url(&self) -> (Url, OIDCSecrets) {
        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();
        let mut url_builder = self
            .client
            .authorize_url(
                CoreAuthenticationFlow::AuthorizationCode,
                CsrfToken::new_random,
                Nonce::new_random,
            )
            .set_pkce_challenge(pkce_challenge);

        for scope in PROFILE_SCOPES {
            url_builder = url_builder.add_scope(Scope::new(scope.to_string()));
        }
        let (url, csrf_token, nonce) = url_builder.url();
        debug!("Login redirects to {}", url);
        (
            url,
            OIDCSecrets {
                csrf_token,
                nonce,
                pkce_verifier,
            },
        )
    }

    /// Exchanges authorization code for verified identity of the user.
    ///
    /// `state` must match the one sent with the auth URL.
    pub async fn exchange_code(
        &self,
        code: String,
        state: &str,
        secrets: OIDCSecrets,
    ) -> Result<Identity> {
        if !secrets.matches_state(state) {
            return Err(Error::InvalidState.into());
        }
        let response = self
            .client
            .exchange_code(AuthorizationCode::new(code))?
            .set_pkce_verifier(secrets.pkce_verifier)
            .request_async(&self.http_client)
            .await?;

        let id_token = response
            .id_token()
            .ok_or_else(|| anyhow!("Provider did not return an ID token"))?;
        let verifier = self.client.id_token_verifier();
        let claims = id_token
            .claims(&verifier, &secrets.nonce)
            .map_err(Error::from)?;

        // Access token must be issued for the same login as ID token
        if let Some(expected_hash) = claims.access_token_hash() {
            let actual_hash = AccessTokenHash::from_token(
                response.access_token(),
                id_token.signing_alg()?,
                id_token.signing_key(&verifier)?,
            )?;
            if actual_hash != *expected_hash {
                return Err(anyhow!("Access token does not match ID token").into());
            }
        }
        Ok(Identity::from_claims(claims))
    }
}

/// User identity as asserted by provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl Identity {
    fn from_claims(claims: &IdTokenClaims<EmptyAdditionalClaims, CoreGenderClaim>) -> Self {
        Identity {
            subject: claims.subject().as_str().to_string(),
            name: claims
                .name()
                .and_then(|name| name.get(None))
                .map(|name| name.as_str().to_string()),
            email: claims.email().map(|email| email.as_str().to_string()),
        }
    }

    /// Name to show for the user, falls back to email and then to subject
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .or_else(|| self.email.clone())
            .unwrap_or_else(|| self.subject.clone())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OIDCSecrets {
    csrf_token: CsrfToken,
    nonce: Nonce,
    pkce_verifier: PkceCodeVerifier,
}

impl OIDCSecrets {
    fn matches_state(&self, state: &str) -> bool {
        self.csrf_token.secret() == state
    }
}

#[cfg(test)]
mod tests {
    use lingo_types::oidc::{OIDCConfig, GOOGLE_PROVIDER};
    use tracing_test::traced_test;

    use super::*;

    #[test]
    fn test_display_name() {
        let mut identity = Identity {
            subject: "1234".into(),
            name: None,
            email: Some("jan@example.com".into()),
        };
        assert_eq!(identity.display_name(), "jan@example.com");
        identity.email = None;
        assert_eq!(identity.display_name(), "1234");
        identity.name = Some("Jan".into());
        assert_eq!(identity.display_name(), "Jan");
    }

    #[test]
    fn test_state_check() {
        let secrets = OIDCSecrets {
            csrf_token: CsrfToken::new("state-123".into()),
            nonce: Nonce::new("nonce".into()),
            pkce_verifier: PkceCodeVerifier::new("verifier".into()),
        };
        assert!(secrets.matches_state("state-123"));
        assert!(!secrets.matches_state("state-124"));
    }

    #[tokio::test]
    #[traced_test]
    #[ignore = "needs network access to provider"]
    async fn test_discovery() {
        let config = OIDCConfig::load_config("../../test-data/oidc-config").unwrap();
        let config = config.get_provider(GOOGLE_PROVIDER).unwrap();
        let client = OIDCClient::discover(config, "http://localhost:3000/auth/google/redirect")
            .await
            .unwrap();
        assert_eq!(client.client_id(), "ABCDE");
        let (url, _secrets) = client.auth_url();
        assert!(url.to_string().contains("email"));
    }
}
