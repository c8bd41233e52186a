use std::fmt;

use gloo::net::http::{Request, Response};
use serde::de::DeserializeOwned;
use shared::{ErrorBody, Resource};

const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Body of a failed response
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorPayload {
    Structured(ErrorBody),
    Text(String),
}

impl ErrorPayload {
    pub fn parse(raw: &str) -> Self {
        match serde_json::from_str::<ErrorBody>(raw) {
            Ok(body) => ErrorPayload::Structured(body),
            Err(_) => ErrorPayload::Text(raw.to_string()),
        }
    }
}

/// A non-OK response, or a request that never got one (`status` 0)
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub status: u16,
    pub body: ErrorPayload,
}

impl ApiError {
    fn network(message: impl fmt::Display) -> Self {
        Self {
            status: 0,
            body: ErrorPayload::Text(message.to_string()),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.body {
            ErrorPayload::Structured(body) => {
                write!(f, "{} ({})", body.error.message, self.status)?;
                for detail in &body.error.details {
                    write!(f, "\n- {}: {}", detail.field, detail.message)?;
                }
                Ok(())
            }
            ErrorPayload::Text(text) if self.status == 0 => write!(f, "Network error: {}", text),
            ErrorPayload::Text(text) => write!(f, "{} ({})", text, self.status),
        }
    }
}

/// API client for the catalog endpoints. Paths come from each resource's `PATH`.
#[derive(Clone, PartialEq)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    /// Client for `GEOWIKI_API_URL` as set at build time, or the local backend
    pub fn new() -> Self {
        Self {
            base_url: option_env!("GEOWIKI_API_URL")
                .unwrap_or(DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
        }
    }

    fn collection_url<R: Resource>(&self) -> String {
        format!("{}{}", self.base_url, R::PATH)
    }

    fn item_url<R: Resource>(&self, id: i64) -> String {
        format!("{}{}/{}", self.base_url, R::PATH, id)
    }

    pub async fn list<R: Resource>(&self) -> Result<Vec<R>, ApiError> {
        let response = Request::get(&self.collection_url::<R>())
            .send()
            .await
            .map_err(ApiError::network)?;
        read(response).await
    }

    pub async fn get<R: Resource>(&self, id: i64) -> Result<R, ApiError> {
        let response = Request::get(&self.item_url::<R>(id))
            .send()
            .await
            .map_err(ApiError::network)?;
        read(response).await
    }

    pub async fn create<R: Resource>(&self, input: &R::Create) -> Result<R, ApiError> {
        let response = Request::post(&self.collection_url::<R>())
            .json(input)
            .map_err(ApiError::network)?
            .send()
            .await
            .map_err(ApiError::network)?;
        read(response).await
    }

    pub async fn update<R: Resource>(&self, id: i64, changes: &R::Update) -> Result<R, ApiError> {
        let response = Request::patch(&self.item_url::<R>(id))
            .json(changes)
            .map_err(ApiError::network)?
            .send()
            .await
            .map_err(ApiError::network)?;
        read(response).await
    }

    pub async fn delete<R: Resource>(&self, id: i64) -> Result<R, ApiError> {
        let response = Request::delete(&self.item_url::<R>(id))
            .send()
            .await
            .map_err(ApiError::network)?;
        read(response).await
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

async fn read<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    if response.ok() {
        return response.json::<T>().await.map_err(|e| ApiError {
            status,
            body: ErrorPayload::Text(format!("Failed to parse response: {}", e)),
        });
    }

    let raw = response.text().await.unwrap_or_default();
    Err(ApiError {
        status,
        body: ErrorPayload::parse(&raw),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{City, Country, ErrorDetail, FieldError};

    #[test]
    fn test_urls_follow_resource_paths() {
        let client = ApiClient {
            base_url: "http://geo.test".to_string(),
        };
        assert_eq!(client.collection_url::<Country>(), "http://geo.test/country");
        assert_eq!(client.item_url::<City>(7), "http://geo.test/city/7");
    }

    #[test]
    fn test_error_payload_prefers_structured_body() {
        let payload = ErrorPayload::parse(
            r#"{"error":{"code":"not_found","message":"city 9 not found"}}"#,
        );
        assert_eq!(
            payload,
            ErrorPayload::Structured(ErrorBody {
                error: ErrorDetail {
                    code: "not_found".to_string(),
                    message: "city 9 not found".to_string(),
                    details: Vec::new(),
                }
            })
        );

        assert_eq!(
            ErrorPayload::parse("Bad Gateway"),
            ErrorPayload::Text("Bad Gateway".to_string())
        );
    }

    #[test]
    fn test_error_display_lists_field_details() {
        let error = ApiError {
            status: 400,
            body: ErrorPayload::Structured(ErrorBody {
                error: ErrorDetail {
                    code: "validation_error".to_string(),
                    message: "validation failed".to_string(),
                    details: vec![FieldError::new("name", "name must not be empty")],
                },
            }),
        };
        assert_eq!(error.to_string(), "validation failed (400)\n- name: name must not be empty");

        assert_eq!(ApiError::network("offline").to_string(), "Network error: offline");
    }
}
