//! Stateless HTTP request builder and response parser for the portal API.
//!
//! # Design
//! `PortalClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! The caller executes the actual HTTP round-trip, keeping the core
//! deterministic and free of I/O dependencies.

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Program, Requirement, RequirementPayload};

const PROGRAMS_PATH: &str = "/api/carreras";
const REQUIREMENTS_PATH: &str = "/api/requerimientos";

/// Synchronous, stateless client for the portal API.
#[derive(Debug, Clone)]
pub struct PortalClient {
    base_url: String,
}

impl PortalClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /api/carreras`. Sent without credentials.
    pub fn build_list_programs(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}{PROGRAMS_PATH}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_create_requirement(&self, token: &str, input: &RequirementPayload) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}{REQUIREMENTS_PATH}", self.base_url),
            headers: json_headers(token),
            body: Some(body),
        })
    }

    pub fn build_update_requirement(
        &self,
        token: &str,
        id: i64,
        input: &RequirementPayload,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Patch,
            path: format!("{}{REQUIREMENTS_PATH}/{id}", self.base_url),
            headers: json_headers(token),
            body: Some(body),
        })
    }

    /// `GET /api/requerimientos/mios`: the signed-in client's own requirements.
    pub fn build_list_my_requirements(&self, token: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}{REQUIREMENTS_PATH}/mios", self.base_url),
            headers: vec![bearer(token)],
            body: None,
        }
    }

    pub fn parse_list_programs(&self, response: HttpResponse) -> Result<Vec<Program>, ApiError> {
        check_success(&response)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    /// Create and update share this parser: any 2xx is success and the body
    /// is ignored.
    pub fn parse_submit_requirement(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_success(&response)
    }

    pub fn parse_list_my_requirements(&self, response: HttpResponse) -> Result<Vec<Requirement>, ApiError> {
        check_success(&response)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }
}

fn bearer(token: &str) -> (String, String) {
    ("authorization".to_string(), format!("Bearer {token}"))
}

fn json_headers(token: &str) -> Vec<(String, String)> {
    vec![
        ("content-type".to_string(), "application/json".to_string()),
        bearer(token),
    ]
}

/// Map non-2xx status codes to `ApiError::HttpError`.
fn check_success(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> PortalClient {
        PortalClient::new("http://localhost:3000")
    }

    fn payload() -> RequirementPayload {
        RequirementPayload {
            title: "Logo design".to_string(),
            description: "Need a logo".to_string(),
            program_id: 3,
            budget: Some(150.5),
        }
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn build_list_programs_sends_no_credentials() {
        let req = client().build_list_programs();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:3000/api/carreras");
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_create_requirement_produces_correct_request() {
        let req = client().build_create_requirement("tok", &payload()).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:3000/api/requerimientos");
        assert_eq!(req.header("Content-Type"), Some("application/json"));
        assert_eq!(req.header("authorization"), Some("Bearer tok"));
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["titulo"], "Logo design");
        assert_eq!(body["id_carrera"], 3);
        assert_eq!(body["presupuesto"], 150.5);
    }

    #[test]
    fn build_update_requirement_targets_item() {
        let req = client().build_update_requirement("tok", 42, &payload()).unwrap();
        assert_eq!(req.method, HttpMethod::Patch);
        assert_eq!(req.path, "http://localhost:3000/api/requerimientos/42");
        assert_eq!(req.header("authorization"), Some("Bearer tok"));
    }

    #[test]
    fn build_list_my_requirements_is_authenticated() {
        let req = client().build_list_my_requirements("tok");
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:3000/api/requerimientos/mios");
        assert_eq!(req.header("Authorization"), Some("Bearer tok"));
    }

    #[test]
    fn parse_list_programs_success() {
        let programs = client()
            .parse_list_programs(response(200, r#"[{"id_carrera":1,"nombre_carrera":"Derecho"}]"#))
            .unwrap();
        assert_eq!(programs, vec![Program { id: 1, name: "Derecho".into() }]);
    }

    #[test]
    fn parse_list_programs_bad_json() {
        let err = client().parse_list_programs(response(200, "not json")).unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }

    #[test]
    fn parse_submit_accepts_any_2xx_and_ignores_body() {
        assert!(client().parse_submit_requirement(response(201, "garbage")).is_ok());
        assert!(client().parse_submit_requirement(response(204, "")).is_ok());
        assert!(client().parse_submit_requirement(response(200, "{}")).is_ok());
    }

    #[test]
    fn parse_submit_failure_keeps_status_and_body() {
        let err = client()
            .parse_submit_requirement(response(409, r#"{"message":"Duplicate title"}"#))
            .unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 409, .. }));
        assert_eq!(err.server_message().as_deref(), Some("Duplicate title"));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = PortalClient::new("http://localhost:3000/");
        assert_eq!(client.build_list_programs().path, "http://localhost:3000/api/carreras");
    }
}
