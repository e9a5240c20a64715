//! Garment model catalogue.
//!
//! Fetched once at session start from the listing endpoint. The catalogue
//! is decorative availability data, not a hard dependency: any failure —
//! connection, bad status, malformed JSON, empty list — falls back to the
//! single built-in model so the designer always loads.

use std::sync::Arc;

use tracing::{info, warn};

use teekit_designer::ModelRef;

use crate::http::{HttpRequest, HttpTransport};

pub struct CatalogClient {
    transport: Arc<dyn HttpTransport>,
    endpoint: String,
}

impl CatalogClient {
    pub fn new(transport: Arc<dyn HttpTransport>, endpoint: impl Into<String>) -> Self {
        Self {
            transport,
            endpoint: endpoint.into(),
        }
    }

    /// Fetches `[{ path, displayName }]` entries, falling back to the
    /// built-in model on any failure.
    pub fn fetch_models(&self) -> Vec<ModelRef> {
        match self.try_fetch() {
            Ok(models) => {
                info!(count = models.len(), "model catalogue loaded");
                models
            }
            Err(reason) => {
                warn!(%reason, "model catalogue unavailable, using built-in model");
                vec![ModelRef::builtin()]
            }
        }
    }

    fn try_fetch(&self) -> Result<Vec<ModelRef>, String> {
        let response = self
            .transport
            .execute(&HttpRequest::get(&self.endpoint))
            .map_err(|e| e.to_string())?;
        if !response.is_success() {
            return Err(format!("listing endpoint returned {}", response.status));
        }
        let models: Vec<ModelRef> =
            serde_json::from_slice(&response.body).map_err(|e| e.to_string())?;
        if models.is_empty() {
            return Err("listing endpoint returned no models".to_string());
        }
        Ok(models)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpResponse;
    use teekit_core::SubmissionError;

    struct StaticTransport(Result<HttpResponse, SubmissionError>);

    impl HttpTransport for StaticTransport {
        fn execute(&self, _request: &HttpRequest) -> Result<HttpResponse, SubmissionError> {
            self.0.clone()
        }
    }

    fn client(result: Result<HttpResponse, SubmissionError>) -> CatalogClient {
        CatalogClient::new(Arc::new(StaticTransport(result)), "http://shop.internal/api/models")
    }

    #[test]
    fn healthy_listing_is_returned() {
        let body = br#"[
            {"path": "models/classic.stl", "displayName": "Classic Tee"},
            {"path": "models/vneck.stl", "displayName": "V-Neck"}
        ]"#;
        let models = client(Ok(HttpResponse {
            status: 200,
            body: body.to_vec(),
        }))
        .fetch_models();
        assert_eq!(models.len(), 2);
        assert_eq!(models[1].display_name, "V-Neck");
    }

    #[test]
    fn connection_failure_falls_back_to_builtin() {
        let models = client(Err(SubmissionError::Connect {
            endpoint: "shop.internal:80".to_string(),
            reason: "refused".to_string(),
        }))
        .fetch_models();
        assert_eq!(models, vec![ModelRef::builtin()]);
    }

    #[test]
    fn garbage_listing_falls_back_to_builtin() {
        let models = client(Ok(HttpResponse {
            status: 200,
            body: b"<html>oops</html>".to_vec(),
        }))
        .fetch_models();
        assert_eq!(models, vec![ModelRef::builtin()]);
    }

    #[test]
    fn empty_listing_falls_back_to_builtin() {
        let models = client(Ok(HttpResponse {
            status: 200,
            body: b"[]".to_vec(),
        }))
        .fetch_models();
        assert_eq!(models, vec![ModelRef::builtin()]);
    }
}
