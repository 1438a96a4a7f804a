use std::sync::Arc;

use time::Duration;
use tracing::{info, warn};

use crate::error::AppError;

use super::password::Hasher;
use super::store::{NewUser, StoreError, UserPatch, UserStore};
use super::token::TokenKeys;
use super::validate;

/// Tokens minted at login are valid for one hour.
const LOGIN_TOKEN_TTL: Duration = Duration::hours(1);

#[derive(Debug)]
pub struct LoginOutcome {
    pub user_id: i64,
    pub token: String,
}

#[derive(Debug)]
pub struct Profile {
    pub full_name: String,
    pub phone_number: String,
}

/// Orchestrates validation, hashing, tokens and storage for the four user
/// flows. Presence checks run before content checks, and content checks run
/// before any token or storage call.
pub struct UserService {
    store: Arc<dyn UserStore>,
    tokens: Arc<TokenKeys>,
    hasher: Hasher,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>, tokens: Arc<TokenKeys>, hasher: Hasher) -> Self {
        Self {
            store,
            tokens,
            hasher,
        }
    }

    pub async fn register(
        &self,
        full_name: &str,
        phone_number: &str,
        password: &str,
    ) -> Result<i64, AppError> {
        if full_name.is_empty() || phone_number.is_empty() || password.is_empty() {
            return Err(AppError::missing(
                "Phone Number or Full Name or Password is missing.",
            ));
        }

        let messages = validate::validate_registration(full_name, phone_number, password);
        if !messages.is_empty() {
            warn!(count = messages.len(), "registration rejected by validation");
            return Err(AppError::invalid_fields(messages));
        }

        let password_hash = self.hasher.hash(password)?;

        let user_id = self
            .store
            .insert_user(NewUser {
                full_name,
                phone_number,
                password_hash: &password_hash,
            })
            .await?;

        info!(user_id, "user registered");
        Ok(user_id)
    }

    pub async fn login(&self, phone_number: &str, password: &str) -> Result<LoginOutcome, AppError> {
        if phone_number.is_empty() || password.is_empty() {
            return Err(AppError::missing("Phone Number or Password is missing."));
        }

        let row = match self.store.find_by_phone(phone_number).await {
            Ok(row) => row,
            // An unknown phone number gets the same outcome as a wrong
            // password.
            Err(StoreError::NotFound) => {
                warn!("login attempt for unknown phone number");
                return Err(AppError::InvalidCredentials);
            }
            Err(e) => return Err(e.into()),
        };

        if !self.hasher.verify(password, &row.password_hash)? {
            warn!(user_id = row.id, "login with wrong password");
            return Err(AppError::InvalidCredentials);
        }

        let token = self.tokens.issue(row.id, LOGIN_TOKEN_TTL)?;
        self.store.increment_login_count(phone_number).await?;

        info!(user_id = row.id, "user logged in");
        Ok(LoginOutcome {
            user_id: row.id,
            token,
        })
    }

    pub async fn fetch_profile(&self, token: &str) -> Result<Profile, AppError> {
        if token.is_empty() {
            return Err(AppError::Forbidden);
        }
        let user_id = self.tokens.verify(token).map_err(|_| AppError::Forbidden)?;

        let row = self.store.find_by_id(user_id).await?;
        Ok(Profile {
            full_name: row.full_name,
            phone_number: row.phone_number,
        })
    }

    pub async fn update_profile(&self, token: &str, patch: UserPatch) -> Result<(), AppError> {
        if token.is_empty() {
            return Err(AppError::Forbidden);
        }
        if patch.is_empty() {
            return Err(AppError::missing(
                "Phone Number and Full Name is missing. Nothing to update",
            ));
        }

        // Field content is checked before the token or storage is touched;
        // the first failing field terminates the request.
        if let Some(phone_number) = &patch.phone_number {
            let messages = validate::validate_phone_number(phone_number);
            if !messages.is_empty() {
                return Err(AppError::joined(messages));
            }
        }
        if let Some(full_name) = &patch.full_name {
            let messages = validate::validate_full_name(full_name);
            if !messages.is_empty() {
                return Err(AppError::joined(messages));
            }
        }

        let user_id = self.tokens.verify(token).map_err(|_| AppError::Forbidden)?;
        self.store.apply_patch(user_id, &patch).await?;

        info!(user_id, "user profile updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::store::memory::MemoryStore;

    const PRIVATE_PEM: &str = include_str!("../../testdata/jwt_rsa.pem");
    const PUBLIC_PEM: &str = include_str!("../../testdata/jwt_rsa.pub.pem");

    fn make_service() -> (UserService, Arc<MemoryStore>, Arc<TokenKeys>) {
        let store = Arc::new(MemoryStore::default());
        let tokens = Arc::new(
            TokenKeys::from_pem(PRIVATE_PEM.as_bytes(), PUBLIC_PEM.as_bytes())
                .expect("test key pair should parse"),
        );
        let service = UserService::new(store.clone(), tokens.clone(), Hasher::min_cost());
        (service, store, tokens)
    }

    async fn register_john(service: &UserService) -> i64 {
        service
            .register("John Doe", "+628123456789", "P@ssw0rd")
            .await
            .expect("registration should succeed")
    }

    #[tokio::test]
    async fn register_assigns_id_and_stores_digest() {
        let (service, store, _) = make_service();
        let user_id = register_john(&service).await;

        let stored = store.user_by_id(user_id).expect("user should exist");
        assert_eq!(stored.full_name, "John Doe");
        assert_eq!(stored.phone_number, "+628123456789");
        assert_ne!(stored.password_hash, "P@ssw0rd");
        assert!(stored.password_hash.starts_with("$argon2id$"));
        assert_eq!(stored.successful_login, 0);
    }

    #[tokio::test]
    async fn register_duplicate_phone_is_conflict() {
        let (service, _, _) = make_service();
        register_john(&service).await;

        let err = service
            .register("Jane Doe", "+628123456789", "P@ssw0rd")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict));
    }

    #[tokio::test]
    async fn register_missing_fields_fails_before_validation() {
        let (service, store, _) = make_service();
        let err = service.register("", "+628123456789", "P@ssw0rd").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Phone Number or Full Name or Password is missing."
        );
        assert!(store.user_by_id(1).is_none());
    }

    #[tokio::test]
    async fn register_reports_itemized_messages() {
        let (service, _, _) = make_service();
        let err = service.register("Jo", "0812", "abc").await.unwrap_err();
        match err {
            AppError::Validation { message, details } => {
                assert_eq!(message, "Invalid Request. Please meet the criteria");
                assert_eq!(details.len(), 7);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn login_returns_verifiable_token_and_increments_counter_once() {
        let (service, store, tokens) = make_service();
        let user_id = register_john(&service).await;

        let outcome = service
            .login("+628123456789", "P@ssw0rd")
            .await
            .expect("login should succeed");
        assert_eq!(outcome.user_id, user_id);
        assert_eq!(tokens.verify(&outcome.token).expect("token"), user_id);
        assert_eq!(store.login_count("+628123456789"), Some(1));
    }

    #[tokio::test]
    async fn login_wrong_password_leaves_counter_unchanged() {
        let (service, store, _) = make_service();
        register_john(&service).await;

        let err = service.login("+628123456789", "Wr0ng!pass").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
        assert_eq!(store.login_count("+628123456789"), Some(0));
    }

    #[tokio::test]
    async fn login_unknown_phone_gets_same_outcome_as_wrong_password() {
        let (service, _, _) = make_service();
        register_john(&service).await;

        let unknown = service.login("+628999999999", "P@ssw0rd").await.unwrap_err();
        let mismatch = service.login("+628123456789", "Wr0ng!pass").await.unwrap_err();
        assert_eq!(unknown.to_string(), mismatch.to_string());
        assert!(matches!(unknown, AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn login_missing_fields() {
        let (service, _, _) = make_service();
        let err = service.login("+628123456789", "").await.unwrap_err();
        assert_eq!(err.to_string(), "Phone Number or Password is missing.");
    }

    #[tokio::test]
    async fn fetch_profile_roundtrip() {
        let (service, _, _) = make_service();
        register_john(&service).await;
        let outcome = service.login("+628123456789", "P@ssw0rd").await.expect("login");

        let profile = service
            .fetch_profile(&outcome.token)
            .await
            .expect("profile should be readable");
        assert_eq!(profile.full_name, "John Doe");
        assert_eq!(profile.phone_number, "+628123456789");
    }

    #[tokio::test]
    async fn fetch_profile_rejects_bad_token() {
        let (service, _, _) = make_service();
        register_john(&service).await;

        let err = service.fetch_profile("garbage").await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden));

        let err = service.fetch_profile("").await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
    }

    #[tokio::test]
    async fn update_patch_contains_exactly_the_present_fields() {
        let (service, store, _) = make_service();
        register_john(&service).await;
        let outcome = service.login("+628123456789", "P@ssw0rd").await.expect("login");

        service
            .update_profile(
                &outcome.token,
                UserPatch {
                    full_name: None,
                    phone_number: Some("+628987654321".into()),
                },
            )
            .await
            .expect("update should succeed");

        let patches = store.applied_patches();
        assert_eq!(patches.len(), 1);
        let (user_id, patch) = &patches[0];
        assert_eq!(*user_id, outcome.user_id);
        assert_eq!(patch.full_name, None);
        assert_eq!(patch.phone_number.as_deref(), Some("+628987654321"));

        let stored = store.user_by_id(outcome.user_id).expect("user");
        assert_eq!(stored.phone_number, "+628987654321");
        assert_eq!(stored.full_name, "John Doe");
    }

    #[tokio::test]
    async fn update_with_empty_patch_reports_nothing_to_update() {
        let (service, _, _) = make_service();
        register_john(&service).await;
        let outcome = service.login("+628123456789", "P@ssw0rd").await.expect("login");

        let err = service
            .update_profile(&outcome.token, UserPatch::default())
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Phone Number and Full Name is missing. Nothing to update"
        );
    }

    #[tokio::test]
    async fn update_validates_fields_before_verifying_token() {
        let (service, store, _) = make_service();
        register_john(&service).await;

        // Invalid field plus invalid token: the field failure must win and
        // the store must stay untouched.
        let err = service
            .update_profile(
                "garbage-token",
                UserPatch {
                    full_name: None,
                    phone_number: Some("0812".into()),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Phone number must be between 10 and 13 characters & Invalid phone number"
        );
        assert!(store.applied_patches().is_empty());
    }

    #[tokio::test]
    async fn update_to_taken_phone_is_conflict() {
        let (service, _, _) = make_service();
        register_john(&service).await;
        service
            .register("Jane Doe", "+628987654321", "P@ssw0rd")
            .await
            .expect("second registration");
        let outcome = service.login("+628123456789", "P@ssw0rd").await.expect("login");

        let err = service
            .update_profile(
                &outcome.token,
                UserPatch {
                    full_name: None,
                    phone_number: Some("+628987654321".into()),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict));
    }

    #[tokio::test]
    async fn update_rejects_bad_token_after_valid_fields() {
        let (service, store, _) = make_service();
        register_john(&service).await;

        let err = service
            .update_profile(
                "garbage-token",
                UserPatch {
                    full_name: Some("Jane Doe".into()),
                    phone_number: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
        assert!(store.applied_patches().is_empty());
    }
}
