use anyhow::{Result, anyhow};
use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION},
    Method,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use shared_config::AppConfig;

/// Thin PostgREST client over the Supabase REST API.
///
/// All requests authenticate with the service credential, so row level
/// security is bypassed and callers are responsible for scoping queries
/// to the requesting user.
pub struct SupabaseClient {
    client: Client,
    base_url: String,
    service_key: String,
}

impl SupabaseClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.supabase_url.clone(),
            service_key: config.supabase_service_key.clone(),
        }
    }

    fn get_headers(&self, returning: bool) -> HeaderMap {
        let mut headers = HeaderMap::new();

        headers.insert("apikey", HeaderValue::from_str(&self.service_key).unwrap());
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.service_key)).unwrap()
        );

        if returning {
            headers.insert("Prefer", HeaderValue::from_static("return=representation"));
        }

        headers
    }

    pub async fn request<T>(&self, method: Method, path: &str, body: Option<Value>) -> Result<T>
    where T: DeserializeOwned {
        self.execute(method, path, body, false).await
    }

    async fn execute<T>(&self, method: Method, path: &str,
                        body: Option<Value>, returning: bool)
                        -> Result<T>
    where T: DeserializeOwned {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making request to {}", url);

        let headers = self.get_headers(returning);

        let mut req = self.client.request(method, &url)
            .headers(headers);

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("API error ({}): {}", status, error_text);

            return Err(match status.as_u16() {
                401 | 403 => anyhow!("Authentication error: {}", error_text),
                404 => anyhow!("Resource not found: {}", error_text),
                _ => anyhow!("API error ({}): {}", status, error_text),
            });
        }

        let data = response.json::<T>().await?;
        Ok(data)
    }

    /// Insert a single row and return the stored representation.
    pub async fn insert_row(&self, table: &str, row: Value) -> Result<Value> {
        let path = format!("/rest/v1/{}", table);

        let rows: Vec<Value> = self.execute(Method::POST, &path, Some(row), true).await?;

        rows.into_iter()
            .next()
            .ok_or_else(|| anyhow!("Insert into {} returned no rows", table))
    }

    /// Run a filtered select, e.g. `select("/rest/v1/doctor_bookings?user_id=eq.abc")`.
    pub async fn select(&self, path: &str) -> Result<Vec<Value>> {
        self.execute(Method::GET, path, None, false).await
    }

    /// Patch every row matched by the query and return the updated rows.
    pub async fn update_rows(&self, path: &str, patch: Value) -> Result<Vec<Value>> {
        self.execute(Method::PATCH, path, Some(patch), true).await
    }

    pub fn get_base_url(&self) -> &str {
        &self.base_url
    }
}
