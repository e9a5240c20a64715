//! Order submission.
//!
//! Validates the form, renders the export bytes, posts the multipart
//! order, and only on a confirmed success resets the design store. Every
//! failure leaves the store untouched so the user can retry without
//! redoing the design; the rendered bytes are dropped either way, so a
//! retry always re-exports rather than resubmitting stale pixels.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use teekit_core::{Error, SubmissionError};
use teekit_designer::GarmentConfiguration;
use teekit_viewport::ExportRenderer;

use crate::http::{HttpRequest, HttpTransport};
use crate::multipart::encode_order;
use crate::order::OrderForm;

/// `{ success, message, data? }` envelope every shop endpoint answers with.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceResponse {
    pub success: bool,
    pub message: String,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

pub struct OrderClient {
    transport: Arc<dyn HttpTransport>,
    endpoint: String,
}

impl OrderClient {
    pub fn new(transport: Arc<dyn HttpTransport>, endpoint: impl Into<String>) -> Self {
        Self {
            transport,
            endpoint: endpoint.into(),
        }
    }

    /// Runs the full submit pipeline. The caller is expected to hold the
    /// UI in a busy state for the duration; overlapping submissions are
    /// refused by the export renderer's in-flight lock.
    pub fn submit_order(
        &self,
        exporter: &ExportRenderer,
        config: &mut GarmentConfiguration,
        form: &OrderForm,
    ) -> Result<ServiceResponse, Error> {
        form.validate()?;

        let design_png = exporter.render_png_bytes(config)?;

        let boundary = format!("teekit-{}", Uuid::new_v4().simple());
        let body = encode_order(&boundary, &design_png, config.base_color, form)?;
        let request = HttpRequest::post(
            &self.endpoint,
            &format!("multipart/form-data; boundary={boundary}"),
            body,
        );

        let response = self.transport.execute(&request)?;
        if !response.is_success() {
            warn!(status = response.status, "order endpoint refused the request");
            return Err(SubmissionError::Rejected {
                message: rejection_message(&response.body, response.status),
            }
            .into());
        }

        let envelope: ServiceResponse =
            serde_json::from_slice(&response.body).map_err(|e| SubmissionError::Protocol {
                reason: format!("unreadable order response: {e}"),
            })?;
        if !envelope.success {
            warn!(message = %envelope.message, "order rejected by the service");
            return Err(SubmissionError::Rejected {
                message: envelope.message,
            }
            .into());
        }

        // Confirmed: the design now belongs to the order. Start fresh.
        config.store.clear();
        info!(design = %config.design_id, message = %envelope.message, "order submitted");
        Ok(envelope)
    }
}

/// Prefers the service's own envelope message when the error body carries
/// one; falls back to the bare status code.
fn rejection_message(body: &[u8], status: u16) -> String {
    serde_json::from_slice::<ServiceResponse>(body)
        .map(|e| e.message)
        .unwrap_or_else(|_| format!("order service returned status {status}"))
}
