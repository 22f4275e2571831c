//! # Mutation actions
//!
//! Each action is one request/response round trip that, on success, writes
//! through to local state: the session store for login, logout and profile
//! edits, a loader's data for notification changes.
//!
//! | Action | Needs session | Local effect on success |
//! |--------|---------------|-------------------------|
//! | [`login`](Actions::login) | no | token and user persisted |
//! | [`logout`](Actions::logout) | no | session cleared (no request) |
//! | [`update_profile`](Actions::update_profile) | yes | cached user rewritten |
//! | [`change_password`](Actions::change_password) | yes | form reset |
//! | [`mark_notification_read`](Actions::mark_notification_read) | yes | `is_read = true` on that entry |
//! | [`delete_notification`](Actions::delete_notification) | yes | that entry removed |
//!
//! Nothing is applied optimistically. A failed call leaves local state exactly
//! as it was and returns an [`AppError`] whose text the caller shows.
//!
//! A login whose account role differs from `auth.required_role` is rejected
//! locally after the server answered. The issued token is dropped without being
//! stored; the backend is not told.

use std::sync::Arc;

use api::models::{LoginRequest, LoginResponse, PasswordChange, ProfileUpdate};
use api::{ApiClient, FetchError, Id, Method, Transport};
use serde_json::json;
use store::{KeyValueStore, SessionStore, UserInfo};

use crate::error::AppError;
use crate::resources::NotificationsLoader;
use crate::validation;

pub struct Actions<T: Transport, S: KeyValueStore> {
    client: Arc<ApiClient<T>>,
    session: SessionStore<S>,
    required_role: String,
}

impl<T: Transport, S: KeyValueStore> Actions<T, S> {
    pub fn new(
        client: Arc<ApiClient<T>>,
        session: SessionStore<S>,
        required_role: impl Into<String>,
    ) -> Self {
        Self {
            client,
            session,
            required_role: required_role.into(),
        }
    }

    /// Sign in and persist the session.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserInfo, AppError> {
        validation::check_login(email, password)?;

        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let response: LoginResponse = self
            .client
            .send_json(Method::POST, self.client.endpoints().login(), None, &request)
            .await
            .and_then(|envelope| envelope.decode())
            .map_err(|e| match e {
                // A 2xx that still failed means the server rejected the credentials.
                FetchError::Http { status, .. } if (200..300).contains(&status) => {
                    AppError::from_fetch(e, "Login failed")
                }
                other => AppError::from(other),
            })?;

        if response.token.is_empty() {
            return Err(AppError::Parse("login response carried no token".into()));
        }

        if !self.role_allowed(response.user.role.as_deref()) {
            tracing::warn!(
                expected = %self.required_role,
                actual = response.user.role.as_deref().unwrap_or("none"),
                "rejecting login for account with wrong role"
            );
            return Err(AppError::RoleMismatch {
                expected: self.required_role.clone(),
                actual: response.user.role.clone(),
            });
        }

        self.session.set(&response.token, &response.user).await?;
        tracing::info!(user = %response.user.display_name(), "signed in");
        Ok(response.user)
    }

    /// Forget the session. Safe without one.
    pub async fn logout(&self) -> Result<(), AppError> {
        self.session.clear().await?;
        tracing::info!("signed out");
        Ok(())
    }

    /// Save profile fields and refresh the cached user. Returns the server's message.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<String, AppError> {
        let session = self.session.get().await;
        let (Some(token), Some(user)) = (session.token, session.user) else {
            return Err(AppError::AuthorizationMissing);
        };
        let Some(id) = user.id.clone() else {
            return Err(AppError::AuthorizationMissing);
        };

        let path = self.client.endpoints().update_user(&id);
        let message = self
            .client
            .send_json(Method::PUT, &path, Some(&token), update)
            .await
            .map(|envelope| envelope.message)
            .map_err(|e| {
                AppError::from_fetch(e, "Failed to update user profile. Please try again later.")
            })?;

        self.session.replace_user(&update.apply_to(&user)).await?;
        Ok(message.unwrap_or_else(|| "Profile updated successfully".to_string()))
    }

    /// Change the password; clears `form` on success.
    pub async fn change_password(&self, form: &mut PasswordChange) -> Result<String, AppError> {
        let token = self.require_token().await?;
        validation::check_password_change(&form.new_password, &form.confirm_password)?;

        let path = self.client.endpoints().change_password();
        let message = self
            .client
            .send_json(Method::PUT, path, Some(&token), &*form)
            .await
            .map(|envelope| envelope.message)
            .map_err(|e| {
                AppError::from_fetch(e, "Failed to change password. Please try again later.")
            })?;

        *form = PasswordChange::default();
        Ok(message.unwrap_or_else(|| "Password changed successfully".to_string()))
    }

    /// Mark one notification read, then reflect it in `notifications`.
    pub async fn mark_notification_read(
        &self,
        notifications: &NotificationsLoader<T, S>,
        id: &Id,
    ) -> Result<(), AppError> {
        let token = self.require_token().await?;
        let path = self.client.endpoints().notification_read(id);

        self.client
            .request(Method::PUT, &path, Some(&token), Some(json!({})))
            .await
            .map_err(|e| AppError::from_fetch(e, "Failed to mark as read"))?;

        notifications.modify(|list| {
            if let Some(n) = list.iter_mut().find(|n| &n.id == id) {
                n.is_read = true;
            }
        });
        Ok(())
    }

    /// Delete one notification, then drop it from `notifications`.
    pub async fn delete_notification(
        &self,
        notifications: &NotificationsLoader<T, S>,
        id: &Id,
    ) -> Result<(), AppError> {
        let token = self.require_token().await?;
        let path = self.client.endpoints().notification_delete(id);

        self.client
            .delete(&path, Some(&token))
            .await
            .map_err(|e| AppError::from_fetch(e, "Failed to delete notification"))?;

        notifications.modify(|list| {
            if let Some(pos) = list.iter().position(|n| &n.id == id) {
                list.remove(pos);
            }
        });
        Ok(())
    }

    async fn require_token(&self) -> Result<String, AppError> {
        self.session
            .get()
            .await
            .token
            .ok_or(AppError::AuthorizationMissing)
    }

    fn role_allowed(&self, role: Option<&str>) -> bool {
        role.is_some_and(|r| r.trim().eq_ignore_ascii_case(self.required_role.trim()))
    }
}
