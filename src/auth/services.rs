use tracing::{info, warn};

use crate::{
    auth::{
        claims::Claims,
        dto::{AuthSession, LoginRequest, RegisterRequest},
        jwt::JwtKeys,
        password::{hash_password_blocking, verify_password_blocking},
        validation::{validate_login, validate_registration},
    },
    error::AppError,
    users::{
        repo::{StoreError, UserStore},
        repo_types::{NewUser, PublicUser},
    },
};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

pub async fn register(
    store: &dyn UserStore,
    keys: &JwtKeys,
    req: RegisterRequest,
) -> Result<AuthSession, AppError> {
    let input = validate_registration(req.email, req.first_name, req.last_name, req.password)?;

    let password_hash = hash_password_blocking(input.password).await?;
    let user = store
        .create_user(NewUser {
            email: input.email,
            first_name: input.first_name,
            last_name: input.last_name,
            password_hash,
        })
        .await
        .map_err(|e| {
            if matches!(e, StoreError::DuplicateEmail) {
                warn!("email already registered");
            }
            AppError::from(e)
        })?;

    let token = keys.issue(&user)?;
    info!(user_id = user.id, email = %user.email, "user registered");
    Ok(AuthSession {
        user: user.into(),
        token,
    })
}

pub async fn login(
    store: &dyn UserStore,
    keys: &JwtKeys,
    req: LoginRequest,
) -> Result<AuthSession, AppError> {
    let input = validate_login(req.email, req.password)?;

    let user = store.find_by_email(&input.email).await?;
    let hash = user.as_ref().map(|u| u.password_hash.clone());
    let ok = verify_password_blocking(input.password, hash).await?;

    let user = match user {
        Some(user) if ok => user,
        Some(user) => {
            warn!(user_id = user.id, "login invalid password");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
        }
        None => {
            warn!(email = %input.email, "login unknown email");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
        }
    };

    let token = keys.issue(&user)?;
    info!(user_id = user.id, email = %user.email, "user logged in");
    Ok(AuthSession {
        user: user.into(),
        token,
    })
}

/// Resolves already-verified claims to the stored user.
pub async fn current_user(store: &dyn UserStore, claims: &Claims) -> Result<PublicUser, AppError> {
    match store.find_by_id(claims.id).await? {
        Some(user) => Ok(user.into()),
        None => {
            warn!(user_id = claims.id, "token refers to missing user");
            Err(AppError::NotFound("User not found".into()))
        }
    }
}
