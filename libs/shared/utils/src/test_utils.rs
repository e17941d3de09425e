use std::sync::Arc;
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use base64::{Engine as _, engine::general_purpose};
use serde_json::json;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::User;

pub struct TestConfig {
    pub jwt_secret: String,
    pub supabase_url: String,
    pub supabase_service_key: String,
    pub gemini_api_key: String,
    pub gemini_base_url: String,
    pub skip_document_check: bool,
    pub heygen_api_key: String,
    pub heygen_base_url: String,
    pub jogg_api_key: String,
    pub jogg_base_url: String,
    pub admin_email: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            supabase_url: "http://localhost:54321".to_string(),
            supabase_service_key: "test-service-key".to_string(),
            gemini_api_key: "test-gemini-key".to_string(),
            gemini_base_url: "http://localhost:54322".to_string(),
            skip_document_check: false,
            heygen_api_key: "test-heygen-key".to_string(),
            heygen_base_url: "http://localhost:54323".to_string(),
            jogg_api_key: "test-jogg-key".to_string(),
            jogg_base_url: "http://localhost:54324".to_string(),
            admin_email: "admin@example.com".to_string(),
        }
    }
}

impl TestConfig {
    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_service_key: self.supabase_service_key.clone(),
            supabase_jwt_secret: self.jwt_secret.clone(),
            gemini_api_key: self.gemini_api_key.clone(),
            gemini_base_url: self.gemini_base_url.clone(),
            skip_document_check: self.skip_document_check,
            heygen_api_key: self.heygen_api_key.clone(),
            heygen_base_url: self.heygen_base_url.clone(),
            jogg_api_key: self.jogg_api_key.clone(),
            jogg_base_url: self.jogg_base_url.clone(),
            admin_email: self.admin_email.clone(),
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct TestUser {
    pub id: String,
    pub email: String,
    pub role: String,
}

impl Default for TestUser {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: "test@example.com".to_string(),
            role: "authenticated".to_string(),
        }
    }
}

impl TestUser {
    pub fn new(email: &str, role: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            role: role.to_string(),
        }
    }

    pub fn patient(email: &str) -> Self {
        Self::new(email, "authenticated")
    }

    pub fn admin(email: &str) -> Self {
        Self::new(email, "authenticated")
    }

    pub fn to_user(&self) -> User {
        User {
            id: self.id.clone(),
            email: Some(self.email.clone()),
            role: Some(self.role.clone()),
            metadata: None,
            created_at: Some(Utc::now()),
        }
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(user: &TestUser, secret: &str, exp_hours: Option<i64>) -> String {
        let now = Utc::now();
        let exp = now + Duration::hours(exp_hours.unwrap_or(24));

        let header = json!({
            "alg": "HS256",
            "typ": "JWT"
        });

        let payload = json!({
            "sub": user.id,
            "email": user.email,
            "role": user.role,
            "iat": now.timestamp(),
            "exp": exp.timestamp()
        });

        let header_encoded = general_purpose::URL_SAFE_NO_PAD.encode(header.to_string());
        let payload_encoded = general_purpose::URL_SAFE_NO_PAD.encode(payload.to_string());

        let signing_input = format!("{}.{}", header_encoded, payload_encoded);

        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(signing_input.as_bytes());
        let signature = mac.finalize().into_bytes();
        let signature_encoded = general_purpose::URL_SAFE_NO_PAD.encode(signature);

        format!("{}.{}", signing_input, signature_encoded)
    }

    pub fn create_expired_token(user: &TestUser, secret: &str) -> String {
        Self::create_test_token(user, secret, Some(-1))
    }

    pub fn create_invalid_signature_token(user: &TestUser) -> String {
        Self::create_test_token(user, "wrong-secret", Some(24))
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }
}

pub struct MockSupabaseResponses;

impl MockSupabaseResponses {
    pub fn health_report_row(user_id: Option<&str>) -> serde_json::Value {
        json!({
            "id": Uuid::new_v4(),
            "user_id": user_id,
            "user_email": user_id.map(|_| "test@example.com"),
            "file_name": "blood-panel.pdf",
            "file_size": 48213,
            "file_type": "application/pdf",
            "analysis": "## Report Summary\nAll values within normal range.",
            "family_member_name": "Self",
            "relationship": "Self",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn booking_row(user_id: Option<&str>, status: &str, payment_status: &str) -> serde_json::Value {
        json!({
            "id": Uuid::new_v4(),
            "booking_id": "DOC-1700000000000-A1B2C3D4E",
            "user_id": user_id,
            "name": "Test Patient",
            "phone": "9876543210",
            "email": "test@example.com",
            "concern": "Recurring headaches",
            "preferred_time": "2030-06-01T10:00:00Z",
            "booking_time": "2024-01-01T00:00:00Z",
            "status": status,
            "payment_status": payment_status,
            "amount": 199,
            "whatsapp_number": "9876543210",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn subscription_row(user_id: &str, status: &str) -> serde_json::Value {
        let (start_date, end_date) = if status == "approved" {
            let start = Utc::now();
            let end = start + Duration::days(30);
            (Some(start.to_rfc3339()), Some(end.to_rfc3339()))
        } else {
            (None, None)
        };

        json!({
            "id": Uuid::new_v4(),
            "user_id": user_id,
            "user_email": "test@example.com",
            "user_name": "Test User",
            "plan": "pro",
            "amount": 999,
            "transaction_id": "TXN123456",
            "upi_id": "test@paytm",
            "status": status,
            "start_date": start_date,
            "end_date": end_date,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn error_response(message: &str, code: &str) -> serde_json::Value {
        json!({
            "error": {
                "message": message,
                "code": code
            }
        })
    }
}
