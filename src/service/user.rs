//! Identity and session service: registration and login against the user
//! half of the record store.

use crate::dto::{LoginRequest, RegisterRequest, SessionResponse, UserResponse};
use crate::errors::ApiError;
use crate::models::{Session, User};
use crate::store::{NewUser, UserStore};

use super::{auth::jwt, crypto};

/// Well-formed hash verified against when the email is unknown, so lookup
/// misses take as long as password mismatches.
const DUMMY_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$gZiV/M1gPc22ElAH/Jh1Hw$CWOrkoo7oJBQ/iyh7uJ0LO2aLEfrHwTWllSAxT0zRno";

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn session_response(user: User, secret: &str) -> Result<SessionResponse, ApiError> {
    let session = Session {
        id: user.id,
        name: user.name,
        email: user.email,
    };
    let token = jwt::issue(secret, &session)?;
    Ok(SessionResponse {
        id: session.id,
        name: session.name,
        email: session.email,
        token,
    })
}

pub async fn register(
    store: &dyn UserStore,
    secret: &str,
    request: RegisterRequest,
) -> Result<SessionResponse, ApiError> {
    let name = request.name.trim().to_string();
    let email = normalize_email(&request.email);
    if name.is_empty() || email.is_empty() || request.password.is_empty() {
        return Err(ApiError::Validation(
            "Please provide name, email and password".to_string(),
        ));
    }
    let password_hash = crypto::hash_password(&request.password)?;
    let user = store
        .create(NewUser {
            name,
            email,
            password_hash,
        })
        .await?;
    session_response(user, secret)
}

pub async fn login(
    store: &dyn UserStore,
    secret: &str,
    request: LoginRequest,
) -> Result<SessionResponse, ApiError> {
    let email = normalize_email(&request.email);
    let user = match store.find_by_email(&email).await? {
        Some(user) => user,
        None => {
            let _ = crypto::verify_password(&request.password, DUMMY_HASH);
            return Err(ApiError::Unauthorized);
        }
    };
    if !crypto::verify_password(&request.password, &user.password_hash) {
        return Err(ApiError::Unauthorized);
    }
    session_response(user, secret)
}

pub async fn me(store: &dyn UserStore, session: &Session) -> Result<UserResponse, ApiError> {
    let user = store.get(session.id).await.map_err(|err| match err {
        crate::store::StoreError::NotFound => ApiError::Unauthorized,
        other => other.into(),
    })?;
    Ok(user.into())
}
