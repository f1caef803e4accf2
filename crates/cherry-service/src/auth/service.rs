//! Authentication service: registration, login, token verification, and
//! password recovery.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::Deserialize;
use tracing::{error, info, warn};

use cherry_auth::reset::hash_reset_token;
use cherry_auth::{
    Capability, JwtDecoder, JwtEncoder, PasswordHasher, PasswordValidator, RbacEnforcer,
    ResetToken,
};
use cherry_core::config::AppConfig;
use cherry_core::error::AppError;
use cherry_core::result::AppResult;
use cherry_core::traits::Mailer;
use cherry_database::{ResetOutcome, UserStore};
use cherry_entity::user::{NewUser, User, UserRole, normalize_email};

use crate::context::RequestContext;
use crate::mail::reset_message;
use crate::validation;

/// Message for a bad email/password pair. Unknown emails get the same text.
pub const BAD_CREDENTIALS_MESSAGE: &str = "Incorrect email or password";

/// Settings the auth service derives from configuration at startup.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    /// Reset token lifetime.
    pub reset_ttl: Duration,
    /// Link prefix; the raw token is appended as the last path segment.
    pub reset_url_base: String,
    /// `From` mailbox for account mail.
    pub mail_from: String,
}

impl AuthSettings {
    /// Derive settings from the application configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            reset_ttl: Duration::minutes(config.auth.reset_token_ttl_minutes as i64),
            reset_url_base: format!(
                "{}{}/auth/reset-password",
                config.server.public_url.trim_end_matches('/'),
                config.server.normalized_prefix(),
            ),
            mail_from: config.mail.from_mailbox(),
        }
    }
}

/// A freshly issued identity token together with its subject.
#[derive(Debug, Clone)]
pub struct AuthSession {
    /// Signed bearer token.
    pub token: String,
    /// The authenticated user.
    pub user: User,
}

/// Registration form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Login form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Password change form for a signed-in user.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

/// Handles identity: who the caller is and how they prove it.
#[derive(Debug, Clone)]
pub struct AuthService {
    /// Credential store.
    users: Arc<dyn UserStore>,
    /// Outbound mail.
    mailer: Arc<dyn Mailer>,
    /// Password hasher.
    hasher: Arc<PasswordHasher>,
    /// Password validator.
    validator: Arc<PasswordValidator>,
    /// Token signer.
    encoder: Arc<JwtEncoder>,
    /// Token verifier.
    decoder: Arc<JwtDecoder>,
    /// RBAC enforcer.
    rbac: Arc<RbacEnforcer>,
    settings: AuthSettings,
}

impl AuthService {
    /// Creates a new auth service.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        users: Arc<dyn UserStore>,
        mailer: Arc<dyn Mailer>,
        hasher: Arc<PasswordHasher>,
        validator: Arc<PasswordValidator>,
        encoder: Arc<JwtEncoder>,
        decoder: Arc<JwtDecoder>,
        rbac: Arc<RbacEnforcer>,
        settings: AuthSettings,
    ) -> Self {
        Self {
            users,
            mailer,
            hasher,
            validator,
            encoder,
            decoder,
            rbac,
            settings,
        }
    }

    /// Create a `user` account and sign it in.
    pub async fn register(&self, req: RegisterRequest) -> AppResult<AuthSession> {
        let name = validation::display_name(req.name.as_deref().unwrap_or_default())?;
        let email = validation::email_address(req.email.as_deref().unwrap_or_default())?;
        let password = validation::required(req.password.as_deref(), "Password is required")?;
        self.validator.validate(password)?;

        let user = self
            .users
            .create(&NewUser {
                email,
                password_hash: self.hasher.hash_password(password)?,
                name,
                role: UserRole::User,
            })
            .await?;

        info!(user_id = %user.id, "User registered");
        self.session_for(user)
    }

    /// Exchange an email/password pair for a token.
    pub async fn login(&self, req: LoginRequest) -> AppResult<AuthSession> {
        let (Some(email), Some(password)) = (
            req.email.as_deref().filter(|e| !e.trim().is_empty()),
            req.password.as_deref().filter(|p| !p.is_empty()),
        ) else {
            return Err(AppError::validation("Please provide email and password"));
        };

        let Some(user) = self.users.find_by_email(&normalize_email(email)).await? else {
            self.hasher.verify_decoy(password);
            return Err(AppError::authentication(BAD_CREDENTIALS_MESSAGE));
        };
        if !self.hasher.verify_password(password, &user.password_hash)? {
            warn!(user_id = %user.id, "Login failed: wrong password");
            return Err(AppError::authentication(BAD_CREDENTIALS_MESSAGE));
        }

        info!(user_id = %user.id, "User logged in");
        self.session_for(user)
    }

    /// Verify a bearer token and load its subject.
    ///
    /// The user is re-read on every call so that deletions and role changes
    /// take effect immediately, whatever the token says.
    pub async fn authenticate(&self, token: &str) -> AppResult<RequestContext> {
        let user_id = self.decoder.verify(token)?;
        let user = self.users.find_by_id(user_id).await?.ok_or_else(|| {
            AppError::authentication("The user belonging to this token no longer exists")
        })?;
        Ok(RequestContext::new(user))
    }

    /// Require that the caller's current role grants `capability`.
    pub fn authorize(&self, ctx: &RequestContext, capability: Capability) -> AppResult<()> {
        self.rbac.require(ctx.role(), capability)
    }

    /// Start password recovery: store a reset token hash and mail the raw
    /// token to the account's address.
    pub async fn forgot_password(&self, email: Option<&str>) -> AppResult<()> {
        let email = validation::required(email, "Please provide your email address")?;
        let user = self
            .users
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or_else(|| AppError::not_found("There is no user with that email address"))?;

        let token = ResetToken::generate(Utc::now(), self.settings.reset_ttl);
        self.users
            .set_reset_token(user.id, Some((&token.hash, token.expires_at)))
            .await?;

        let message = reset_message(
            &self.settings.mail_from,
            &user.email,
            &user.name,
            &format!("{}/{}", self.settings.reset_url_base, token.raw),
            self.settings.reset_ttl.num_minutes().max(0) as u64,
        );
        if let Err(e) = self.mailer.send(&message).await {
            error!(
                user_id = %user.id,
                transport = self.mailer.transport(),
                error = %e,
                "Failed to send reset email"
            );
            self.users.set_reset_token(user.id, None).await?;
            return Err(AppError::external("Error sending the email. Try again later."));
        }

        info!(user_id = %user.id, "Password reset requested");
        Ok(())
    }

    /// Redeem a reset token, set the new password, and sign the user in.
    pub async fn reset_password(
        &self,
        raw_token: &str,
        password: Option<&str>,
    ) -> AppResult<AuthSession> {
        let password = validation::required(password, "Please provide a new password")?;
        self.validator.validate(password)?;

        let outcome = self
            .users
            .consume_reset_token(
                &hash_reset_token(raw_token),
                Utc::now(),
                &self.hasher.hash_password(password)?,
            )
            .await?;
        match outcome {
            ResetOutcome::Consumed(user) => {
                info!(user_id = %user.id, "Password reset completed");
                self.session_for(user)
            }
            ResetOutcome::Expired => Err(AppError::validation("Token has expired")),
            ResetOutcome::Invalid => Err(AppError::validation("Token is invalid")),
        }
    }

    /// Change the signed-in user's password after re-checking the current one.
    pub async fn update_password(
        &self,
        ctx: &RequestContext,
        req: UpdatePasswordRequest,
    ) -> AppResult<AuthSession> {
        let (Some(current), Some(new)) = (
            req.current_password.as_deref().filter(|p| !p.is_empty()),
            req.new_password.as_deref().filter(|p| !p.is_empty()),
        ) else {
            return Err(AppError::validation(
                "Please provide your current password and a new password",
            ));
        };

        if !self.hasher.verify_password(current, &ctx.user.password_hash)? {
            return Err(AppError::authentication("Your current password is wrong"));
        }
        self.validator.validate(new)?;

        let user = self
            .users
            .set_password(ctx.user_id(), &self.hasher.hash_password(new)?)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        info!(user_id = %user.id, "Password changed");
        self.session_for(user)
    }

    fn session_for(&self, user: User) -> AppResult<AuthSession> {
        Ok(AuthSession {
            token: self.encoder.issue(user.id)?,
            user,
        })
    }
}
