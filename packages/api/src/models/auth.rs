use serde::{Deserialize, Serialize};
use store::UserInfo;

/// Body of `POST /api/v1/auth/login`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful login payload. `success: false` never reaches this type; the
/// envelope turns it into an error first.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
    #[serde(default)]
    pub message: Option<String>,
}

/// Editable profile fields, sent as-is to `PUT /api/v1/users/update/{id}`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

impl ProfileUpdate {
    /// Prefill from the cached user, as the profile form does.
    pub fn from_user(user: &UserInfo) -> Self {
        Self {
            firstname: user.firstname.clone(),
            lastname: user.lastname.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            address: user.address.clone(),
        }
    }

    /// `user` with these fields written over it; id, role and extra fields are kept.
    pub fn apply_to(&self, user: &UserInfo) -> UserInfo {
        UserInfo {
            firstname: self.firstname.clone(),
            lastname: self.lastname.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            address: self.address.clone(),
            ..user.clone()
        }
    }
}

/// Body of `PUT /api/v1/users/changePassword`, also used as the form state.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    pub old_password: String,
    pub new_password: String,
    pub confirm_password: String,
}
