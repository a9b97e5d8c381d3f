use tracing::{info, warn};

use crate::{
    auth::{
        claims::Claims,
        dto::{AuthData, ChangePasswordRequest, LoginRequest, PublicUser, RegisterRequest},
        identifier::Identifier,
        jwt::JwtKeys,
        password::MIN_PASSWORD_LEN,
        repo::{UniqueField, UserStore},
        repo_types::{NewUser, User},
    },
    error::AppError,
};

pub const MIN_USERNAME_LEN: usize = 3;

const REGISTER_FAILED: &str = "Server error during registration.";
const LOGIN_FAILED: &str = "Server error during login.";
const PASSWORD_CHANGE_FAILED: &str = "Server error during password change.";
const PROFILE_FAILED: &str = "Server error while loading profile.";

const INVALID_IDENTIFIER: &str = "Please provide a valid email address or phone number.";
const USER_NOT_FOUND: &str = "User not found.";

/// Trimmed, non-empty value or `None`.
fn present(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Passwords are never trimmed; only emptiness counts as missing.
fn present_secret(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.is_empty())
}

fn check_password_len(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters."
        )));
    }
    Ok(())
}

fn issue_for(keys: &JwtKeys, user: &User, context: &str) -> Result<AuthData, AppError> {
    let token = keys
        .issue(user.id, &user.username)
        .map_err(|e| AppError::internal(context, e))?;
    Ok(AuthData {
        token,
        user: PublicUser::from(user),
    })
}

pub async fn register(
    users: &dyn UserStore,
    keys: &JwtKeys,
    req: RegisterRequest,
) -> Result<AuthData, AppError> {
    let (Some(name), Some(username), Some(identifier), Some(password)) = (
        present(req.name),
        present(req.username),
        present(req.identifier),
        present_secret(req.password),
    ) else {
        return Err(AppError::Validation(
            "Please provide all required fields: name, username, identifier, and password."
                .into(),
        ));
    };

    let username = username.to_lowercase();
    if username.chars().count() < MIN_USERNAME_LEN {
        return Err(AppError::Validation(format!(
            "Username must be at least {MIN_USERNAME_LEN} characters."
        )));
    }
    check_password_len(&password)?;

    let identifier = Identifier::parse(&identifier).ok_or_else(|| {
        warn!("registration with unrecognised identifier");
        AppError::Validation(INVALID_IDENTIFIER.into())
    })?;

    // Courtesy checks; the store's unique constraints have the final word.
    if users
        .find_by_username(&username)
        .await
        .map_err(|e| e.into_app_error(REGISTER_FAILED))?
        .is_some()
    {
        warn!(%username, "username already registered");
        return Err(AppError::Conflict(
            UniqueField::Username.conflict_message().into(),
        ));
    }
    if users
        .find_by_identifier(&identifier)
        .await
        .map_err(|e| e.into_app_error(REGISTER_FAILED))?
        .is_some()
    {
        let field = match identifier {
            Identifier::Email(_) => UniqueField::Email,
            Identifier::Phone(_) => UniqueField::PhoneNumber,
        };
        warn!(?field, "identifier already registered");
        return Err(AppError::Conflict(field.conflict_message().into()));
    }

    let user = User::create(NewUser {
        name,
        username,
        identifier,
        password,
    })
    .map_err(|e| AppError::internal(REGISTER_FAILED, e))?;

    users
        .insert(&user)
        .await
        .map_err(|e| e.into_app_error(REGISTER_FAILED))?;

    info!(user_id = %user.id, username = %user.username, "user registered");
    issue_for(keys, &user, REGISTER_FAILED)
}

/// Unknown identifier and wrong password are both 401s but keep distinct
/// messages.
pub async fn login(
    users: &dyn UserStore,
    keys: &JwtKeys,
    req: LoginRequest,
) -> Result<AuthData, AppError> {
    let (Some(identifier), Some(password)) =
        (present(req.identifier), present_secret(req.password))
    else {
        return Err(AppError::Validation(
            "Please provide identifier and password.".into(),
        ));
    };

    let identifier = Identifier::parse(&identifier)
        .ok_or_else(|| AppError::Validation(INVALID_IDENTIFIER.into()))?;

    let user = match users
        .find_by_identifier(&identifier)
        .await
        .map_err(|e| e.into_app_error(LOGIN_FAILED))?
    {
        Some(u) => u,
        None => {
            warn!(kind = ?identifier.kind(), "login unknown identifier");
            return Err(AppError::Unauthorized(
                "No account found with this email or phone number.".into(),
            ));
        }
    };

    let ok = user
        .verify_password(&password)
        .map_err(|e| AppError::internal(LOGIN_FAILED, e))?;
    if !ok {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AppError::Unauthorized("Incorrect password.".into()));
    }

    info!(user_id = %user.id, username = %user.username, "user logged in");
    issue_for(keys, &user, LOGIN_FAILED)
}

pub async fn current_user(users: &dyn UserStore, claims: &Claims) -> Result<PublicUser, AppError> {
    users
        .find_by_id(claims.user_id)
        .await
        .map_err(|e| e.into_app_error(PROFILE_FAILED))?
        .map(|u| PublicUser::from(&u))
        .ok_or_else(|| AppError::NotFound(USER_NOT_FOUND.into()))
}

pub async fn change_password(
    users: &dyn UserStore,
    claims: &Claims,
    req: ChangePasswordRequest,
) -> Result<(), AppError> {
    let (Some(current), Some(new)) = (
        present_secret(req.current_password),
        present_secret(req.new_password),
    ) else {
        return Err(AppError::Validation(
            "Please provide currentPassword and newPassword.".into(),
        ));
    };
    check_password_len(&new)?;

    let mut user = users
        .find_by_id(claims.user_id)
        .await
        .map_err(|e| e.into_app_error(PASSWORD_CHANGE_FAILED))?
        .ok_or_else(|| AppError::NotFound(USER_NOT_FOUND.into()))?;

    let ok = user
        .verify_password(&current)
        .map_err(|e| AppError::internal(PASSWORD_CHANGE_FAILED, e))?;
    if !ok {
        warn!(user_id = %user.id, "password change with wrong current password");
        return Err(AppError::Unauthorized(
            "Current password is incorrect.".into(),
        ));
    }

    user.change_password(&new)
        .map_err(|e| AppError::internal(PASSWORD_CHANGE_FAILED, e))?;
    users
        .update(&user)
        .await
        .map_err(|e| e.into_app_error(PASSWORD_CHANGE_FAILED))?;

    info!(user_id = %user.id, "password changed");
    Ok(())
}
