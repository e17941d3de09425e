use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_service_key: String,
    pub supabase_jwt_secret: String,
    pub gemini_api_key: String,
    pub gemini_base_url: String,
    pub skip_document_check: bool,
    pub heygen_api_key: String,
    pub heygen_base_url: String,
    pub jogg_api_key: String,
    pub jogg_base_url: String,
    pub admin_email: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            supabase_url: env::var("SUPABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_URL not set, using empty value");
                    String::new()
                }),
            supabase_service_key: env::var("SUPABASE_SERVICE_ROLE_KEY")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_SERVICE_ROLE_KEY not set, using empty value");
                    String::new()
                }),
            supabase_jwt_secret: env::var("SUPABASE_JWT_SECRET")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_JWT_SECRET not set, using empty value");
                    String::new()
                }),
            gemini_api_key: env::var("GOOGLE_GENERATIVE_AI_API_KEY")
                .unwrap_or_else(|_| {
                    warn!("GOOGLE_GENERATIVE_AI_API_KEY not set, report analysis will be unavailable");
                    String::new()
                }),
            gemini_base_url: env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".to_string()),
            skip_document_check: env::var("SKIP_DOCUMENT_CHECK")
                .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            heygen_api_key: env::var("HEYGEN_API_KEY")
                .unwrap_or_else(|_| {
                    warn!("HEYGEN_API_KEY not set, using empty value");
                    String::new()
                }),
            heygen_base_url: env::var("HEYGEN_BASE_URL")
                .unwrap_or_else(|_| "https://api.heygen.com".to_string()),
            jogg_api_key: env::var("JOGG_API_KEY")
                .unwrap_or_else(|_| {
                    warn!("JOGG_API_KEY not set, using empty value");
                    String::new()
                }),
            jogg_base_url: env::var("JOGG_BASE_URL")
                .unwrap_or_else(|_| "https://api.jogg.ai".to_string()),
            admin_email: env::var("ADMIN_EMAIL")
                .unwrap_or_else(|_| {
                    warn!("ADMIN_EMAIL not set, admin routes will reject every caller");
                    String::new()
                }),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.supabase_url.is_empty()
            && !self.supabase_service_key.is_empty()
            && !self.supabase_jwt_secret.is_empty()
    }

    pub fn is_ai_configured(&self) -> bool {
        !self.gemini_api_key.is_empty()
    }

    pub fn is_heygen_configured(&self) -> bool {
        !self.heygen_api_key.is_empty() && !self.heygen_base_url.is_empty()
    }

    pub fn is_jogg_configured(&self) -> bool {
        !self.jogg_api_key.is_empty() && !self.jogg_base_url.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank_config() -> AppConfig {
        AppConfig {
            supabase_url: String::new(),
            supabase_service_key: String::new(),
            supabase_jwt_secret: String::new(),
            gemini_api_key: String::new(),
            gemini_base_url: "https://generativelanguage.googleapis.com".to_string(),
            skip_document_check: false,
            heygen_api_key: String::new(),
            heygen_base_url: "https://api.heygen.com".to_string(),
            jogg_api_key: String::new(),
            jogg_base_url: "https://api.jogg.ai".to_string(),
            admin_email: String::new(),
        }
    }

    #[test]
    fn unconfigured_when_store_credentials_missing() {
        let config = blank_config();
        assert!(!config.is_configured());
        assert!(!config.is_ai_configured());
    }

    #[test]
    fn configured_when_store_triple_present() {
        let mut config = blank_config();
        config.supabase_url = "http://localhost:54321".to_string();
        config.supabase_service_key = "service-key".to_string();
        config.supabase_jwt_secret = "jwt-secret".to_string();
        assert!(config.is_configured());
    }

    #[test]
    fn vendor_checks_require_key_and_base_url() {
        let mut config = blank_config();
        assert!(!config.is_heygen_configured());
        config.heygen_api_key = "key".to_string();
        assert!(config.is_heygen_configured());

        assert!(!config.is_jogg_configured());
        config.jogg_api_key = "key".to_string();
        assert!(config.is_jogg_configured());
    }
}
