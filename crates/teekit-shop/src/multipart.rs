//! Multipart/form-data encoding of an order.
//!
//! Pure function from order parts to body bytes, with the boundary
//! supplied by the caller so tests can pin it. Fields, in order:
//! `design` (PNG bytes), `tshirtColor`, `shippingAddress` (JSON),
//! `billingInfo` (JSON), and `notes` when present.

use teekit_core::{Color, SubmissionError};

use crate::order::OrderForm;

pub fn encode_order(
    boundary: &str,
    design_png: &[u8],
    base_color: Color,
    form: &OrderForm,
) -> Result<Vec<u8>, SubmissionError> {
    let shipping = serde_json::to_vec(&form.shipping).map_err(json_err)?;
    let billing = serde_json::to_vec(&form.billing).map_err(json_err)?;

    let mut body = Vec::with_capacity(design_png.len() + 1024);
    file_part(
        &mut body,
        boundary,
        "design",
        "design.png",
        "image/png",
        design_png,
    );
    text_part(&mut body, boundary, "tshirtColor", base_color.to_hex().as_bytes());
    typed_part(&mut body, boundary, "shippingAddress", "application/json", &shipping);
    typed_part(&mut body, boundary, "billingInfo", "application/json", &billing);
    if let Some(notes) = &form.notes {
        text_part(&mut body, boundary, "notes", notes.as_bytes());
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    Ok(body)
}

fn json_err(e: serde_json::Error) -> SubmissionError {
    SubmissionError::Protocol {
        reason: format!("failed to encode order json: {e}"),
    }
}

fn text_part(body: &mut Vec<u8>, boundary: &str, name: &str, value: &[u8]) {
    body.extend_from_slice(
        format!("--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
    );
    body.extend_from_slice(value);
    body.extend_from_slice(b"\r\n");
}

fn typed_part(body: &mut Vec<u8>, boundary: &str, name: &str, content_type: &str, value: &[u8]) {
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(value);
    body.extend_from_slice(b"\r\n");
}

fn file_part(
    body: &mut Vec<u8>,
    boundary: &str,
    name: &str,
    filename: &str,
    content_type: &str,
    value: &[u8],
) {
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(value);
    body.extend_from_slice(b"\r\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::{BillingInfo, OrderForm, ShippingAddress};

    fn form() -> OrderForm {
        OrderForm {
            billing: BillingInfo {
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                phone: "+1 555 0100".to_string(),
                phone_alt: None,
                email: "ada@example.com".to_string(),
            },
            shipping: ShippingAddress {
                street: "1 Analytical Way".to_string(),
                city: "London".to_string(),
                state: "LDN".to_string(),
                zip_code: "EC1A".to_string(),
                country: "UK".to_string(),
            },
            notes: None,
        }
    }

    #[test]
    fn body_carries_every_field_and_the_design_bytes() {
        let png = b"\x89PNG fake bytes";
        let body = encode_order("XBOUNDARYX", png, Color::parse("#E63946").unwrap(), &form())
            .unwrap();
        let text = String::from_utf8_lossy(&body);

        for field in ["design", "tshirtColor", "shippingAddress", "billingInfo"] {
            assert!(text.contains(&format!("name=\"{field}\"")), "missing {field}");
        }
        assert!(text.contains("filename=\"design.png\""));
        assert!(text.contains("#E63946"));
        assert!(text.contains("\"zipCode\":\"EC1A\""));
        assert!(body.windows(png.len()).any(|w| w == png), "png bytes must be embedded verbatim");
        assert!(text.ends_with("--XBOUNDARYX--\r\n"));
    }

    #[test]
    fn notes_part_is_optional() {
        let without = encode_order("B", b"png", Color::WHITE, &form()).unwrap();
        assert!(!String::from_utf8_lossy(&without).contains("name=\"notes\""));

        let mut with_notes = form();
        with_notes.notes = Some("gift wrap".to_string());
        let with = encode_order("B", b"png", Color::WHITE, &with_notes).unwrap();
        let text = String::from_utf8_lossy(&with);
        assert!(text.contains("name=\"notes\""));
        assert!(text.contains("gift wrap"));
    }
}
