use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    dto::{LoginRequest, RegisterRequest},
    model::{NewUser, PublicUser, Role},
    repo::UserStore,
};
use crate::{
    auth::{
        password::{hash_password, meets_policy, verify_password, PASSWORD_POLICY_MESSAGE},
        JwtKeys,
    },
    error::AppError,
};

fn present(field: Option<String>) -> Option<String> {
    field.filter(|v| !v.is_empty())
}

/// Validate, hash and persist a new user.
#[instrument(skip(store, req))]
pub async fn register(store: &dyn UserStore, req: RegisterRequest) -> Result<PublicUser, AppError> {
    let (
        Some(name),
        Some(email),
        Some(password),
        Some(repassword),
        Some(phone_number),
        Some(role),
    ) = (
        present(req.name),
        present(req.email),
        present(req.password),
        present(req.repassword),
        present(req.phone_number),
        present(req.role),
    )
    else {
        warn!("registration with missing fields");
        return Err(AppError::Validation("All fields are required".into()));
    };

    if password != repassword {
        warn!("registration passwords differ");
        return Err(AppError::Validation("Passwords do not match".into()));
    }

    if !meets_policy(&password) {
        warn!("registration password fails policy");
        return Err(AppError::Validation(PASSWORD_POLICY_MESSAGE.into()));
    }

    let role: Role = role.parse().map_err(|_| {
        warn!(%role, "registration with unknown role");
        AppError::Validation("Invalid role. Allowed roles: user, admin".into())
    })?;

    // The unique index is authoritative; this lookup only avoids hashing for
    // an obvious duplicate.
    if store.find_by_email(&email).await?.is_some() {
        warn!(%email, "email already registered");
        return Err(AppError::Conflict("Email already in use".into()));
    }

    let password_hash = hash_password(&password)?;
    let user = store
        .insert(NewUser {
            name,
            email,
            password_hash,
            phone_number,
            role,
        })
        .await?;

    info!(user_id = %user.id, role = %user.role, "user registered");
    Ok(user.into())
}

/// Check credentials and issue a one-week token.
#[instrument(skip(store, keys, req))]
pub async fn login(
    store: &dyn UserStore,
    keys: &JwtKeys,
    req: LoginRequest,
) -> Result<(String, Role), AppError> {
    let (Some(email), Some(password)) = (present(req.email), present(req.password)) else {
        return Err(AppError::Validation("Email and password are required".into()));
    };

    let Some(user) = store.find_by_email(&email).await? else {
        warn!(%email, "login unknown email");
        return Err(AppError::NotFound("User not found".into()));
    };

    if !verify_password(&password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AppError::InvalidCredentials);
    }

    let token = keys.sign(user.id, user.role)?;
    info!(user_id = %user.id, "user logged in");
    Ok((token, user.role))
}

pub async fn list_users(store: &dyn UserStore) -> Result<Vec<PublicUser>, AppError> {
    let users = store.list().await?;
    Ok(users.into_iter().map(PublicUser::from).collect())
}

#[instrument(skip(store))]
pub async fn delete_user(store: &dyn UserStore, id: Uuid) -> Result<(), AppError> {
    if !store.delete(id).await? {
        return Err(AppError::NotFound("User not found".into()));
    }
    info!(user_id = %id, "user deleted");
    Ok(())
}
