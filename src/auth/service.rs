use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{watch, RwLock};
use tracing::{debug, info, instrument, warn};

use super::{
    generators::DisplayNameGenerator,
    models::{Principal, SignInMethod},
    token::TokenConfig,
};
use crate::shared::AppError;

/// A successful sign-in: the principal plus a bearer token for it
#[derive(Debug, Clone)]
pub struct SignedIn {
    pub principal: Principal,
    pub token: String,
}

/// Who the current viewer is
///
/// Independent of room membership and playback; nothing in the sync path
/// consults it.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Sign in, replacing any current principal
    async fn sign_in(&self, method: SignInMethod) -> Result<SignedIn, AppError>;

    /// Sign out; a no-op when nobody is signed in
    async fn sign_out(&self) -> Result<(), AppError>;

    async fn current_principal(&self) -> Option<Principal>;

    /// Resolve a bearer token to the principal it was issued for
    async fn authenticate(&self, token: &str) -> Result<Principal, AppError>;

    /// Principal changes, starting from the current value
    fn subscribe_changes(&self) -> watch::Receiver<Option<Principal>>;
}

/// Identity provider that issues its own tokens
///
/// Anonymous viewers get a generated name; federated sign-ins trust the asserted
/// provider and subject.
pub struct LocalIdentityProvider {
    token_config: TokenConfig,
    name_generator: Arc<dyn DisplayNameGenerator>,
    changes: watch::Sender<Option<Principal>>,
    current: RwLock<Option<Principal>>,
}

impl LocalIdentityProvider {
    pub fn new(token_config: TokenConfig, name_generator: Arc<dyn DisplayNameGenerator>) -> Self {
        let (changes, _) = watch::channel(None);
        Self {
            token_config,
            name_generator,
            changes,
            current: RwLock::new(None),
        }
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    #[instrument(skip(self, method))]
    async fn sign_in(&self, method: SignInMethod) -> Result<SignedIn, AppError> {
        let principal = match method {
            SignInMethod::Anonymous => Principal::anonymous(self.name_generator.generate()),
            SignInMethod::Federated {
                provider,
                subject,
                display_name,
            } => {
                if provider.trim().is_empty() || subject.trim().is_empty() {
                    return Err(AppError::InvalidRequest(
                        "federated sign-in needs a provider and subject".to_string(),
                    ));
                }
                let display_name = self.name_generator.resolve(display_name.as_deref());
                Principal::federated(&provider, &subject, display_name)
            }
        };

        let token = self.token_config.create_token(&principal)?;

        *self.current.write().await = Some(principal.clone());
        self.changes.send_replace(Some(principal.clone()));

        info!(
            uid = %principal.uid,
            provider = %principal.provider,
            display_name = %principal.display_name,
            "Signed in"
        );

        Ok(SignedIn { principal, token })
    }

    #[instrument(skip(self))]
    async fn sign_out(&self) -> Result<(), AppError> {
        let previous = self.current.write().await.take();

        match previous {
            Some(principal) => {
                self.changes.send_replace(None);
                info!(uid = %principal.uid, "Signed out");
            }
            None => debug!("Sign out requested with nobody signed in"),
        }

        Ok(())
    }

    async fn current_principal(&self) -> Option<Principal> {
        self.current.read().await.clone()
    }

    #[instrument(skip(self, token))]
    async fn authenticate(&self, token: &str) -> Result<Principal, AppError> {
        let claims = self.token_config.validate_token(token)?;

        match self.current.read().await.as_ref() {
            Some(principal) if principal.uid == claims.sub => Ok(principal.clone()),
            _ => {
                warn!(uid = %claims.sub, "Token does not belong to the current principal");
                Err(AppError::Unauthorized(
                    "Token is not for the signed-in principal".to_string(),
                ))
            }
        }
    }

    fn subscribe_changes(&self) -> watch::Receiver<Option<Principal>> {
        self.changes.subscribe()
    }
}
