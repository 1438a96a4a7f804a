use serde::{Deserialize, Serialize};

/// Request body for user registration. Fields default to empty so missing
/// keys surface as presence failures, not deserialization errors.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub password: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub password: String,
}

/// Sparse profile update; absent fields are left untouched.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub message: String,
    pub user_id: i64,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
}

/// Public part of the profile. The password hash is never serialized.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub full_name: String,
    pub phone_number: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_request_defaults_missing_fields_to_empty() {
        let req: RegisterRequest =
            serde_json::from_str(r#"{"phoneNumber": "+628123456789"}"#).expect("deserialize");
        assert_eq!(req.phone_number, "+628123456789");
        assert!(req.full_name.is_empty());
        assert!(req.password.is_empty());
    }

    #[test]
    fn update_request_keeps_absent_fields_none() {
        let req: UpdateUserRequest =
            serde_json::from_str(r#"{"fullName": "Jane Doe"}"#).expect("deserialize");
        assert_eq!(req.full_name.as_deref(), Some("Jane Doe"));
        assert_eq!(req.phone_number, None);
    }

    #[test]
    fn profile_response_uses_camel_case() {
        let json = serde_json::to_string(&ProfileResponse {
            full_name: "John Doe".into(),
            phone_number: "+628123456789".into(),
        })
        .expect("serialize");
        assert!(json.contains("fullName"));
        assert!(json.contains("phoneNumber"));
    }
}
