//! HTTP checkout gateway - talks to the backend's create-payment endpoint.
//!
//! Wire format:
//!
//! ```text
//! POST {endpoint}
//! Content-Type: application/json
//!
//! {"priceId": "price_pro_monthly"}
//!
//! 200 OK
//! {"sessionId": "cs_test_..."}
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};

use crate::domain::checkout::CheckoutError;
use crate::domain::foundation::{CheckoutSessionId, PriceId};
use crate::ports::CheckoutSessionGateway;

/// Longest error body excerpt kept on `CheckoutError::HttpStatus`.
const MAX_ERROR_BODY_CHARS: usize = 200;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateCheckoutBody<'a> {
    price_id: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateCheckoutResponse {
    session_id: String,
}

/// Maps the endpoint's response to a checkout session token.
pub(crate) fn parse_checkout_response(
    status: StatusCode,
    body: &[u8],
) -> Result<CheckoutSessionId, CheckoutError> {
    if !status.is_success() {
        let excerpt: String = String::from_utf8_lossy(body)
            .chars()
            .take(MAX_ERROR_BODY_CHARS)
            .collect();
        return Err(CheckoutError::HttpStatus {
            status: status.as_u16(),
            body: (!excerpt.trim().is_empty()).then_some(excerpt),
        });
    }

    let parsed: CreateCheckoutResponse = serde_json::from_slice(body)
        .map_err(|e| CheckoutError::malformed(e.to_string()))?;
    CheckoutSessionId::new(parsed.session_id).map_err(|e| CheckoutError::malformed(e.to_string()))
}

/// `CheckoutSessionGateway` over HTTP with `reqwest`.
pub struct HttpCheckoutGateway {
    endpoint: Url,
    http_client: reqwest::Client,
}

impl HttpCheckoutGateway {
    pub fn new(endpoint: Url, request_timeout: Duration) -> Result<Self, CheckoutError> {
        let http_client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| CheckoutError::network(e.to_string()))?;
        Ok(Self {
            endpoint,
            http_client,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl CheckoutSessionGateway for HttpCheckoutGateway {
    async fn create_checkout_session(
        &self,
        price_id: &PriceId,
    ) -> Result<CheckoutSessionId, CheckoutError> {
        tracing::debug!(endpoint = %self.endpoint, %price_id, "Requesting checkout session");

        let response = self
            .http_client
            .post(self.endpoint.clone())
            .json(&CreateCheckoutBody {
                price_id: price_id.as_str(),
            })
            .send()
            .await
            .map_err(|e| CheckoutError::network(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| CheckoutError::network(e.to_string()))?;

        parse_checkout_response(status, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_uses_camel_case_price_id() {
        let body = CreateCheckoutBody {
            price_id: "price_pro_monthly",
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"priceId": "price_pro_monthly"})
        );
    }

    #[test]
    fn success_response_yields_session_id() {
        let id = parse_checkout_response(StatusCode::OK, br#"{"sessionId":"cs_123"}"#).unwrap();
        assert_eq!(id.as_str(), "cs_123");
    }

    #[test]
    fn extra_fields_are_ignored() {
        let body = br#"{"sessionId":"cs_123","url":"https://checkout.stripe.com/x"}"#;
        assert!(parse_checkout_response(StatusCode::OK, body).is_ok());
    }

    #[test]
    fn non_success_status_is_http_error_with_excerpt() {
        let err =
            parse_checkout_response(StatusCode::INTERNAL_SERVER_ERROR, b"stripe key missing")
                .unwrap_err();
        assert_eq!(
            err,
            CheckoutError::HttpStatus {
                status: 500,
                body: Some("stripe key missing".to_string()),
            }
        );
    }

    #[test]
    fn error_body_excerpt_is_bounded() {
        let long = "x".repeat(1000);
        let err = parse_checkout_response(StatusCode::BAD_REQUEST, long.as_bytes()).unwrap_err();
        match err {
            CheckoutError::HttpStatus { body: Some(body), .. } => {
                assert_eq!(body.len(), MAX_ERROR_BODY_CHARS)
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn missing_session_id_is_malformed() {
        let err = parse_checkout_response(StatusCode::OK, br#"{"error":"nope"}"#).unwrap_err();
        assert!(matches!(err, CheckoutError::MalformedResponse(_)));
    }

    #[test]
    fn empty_session_id_is_malformed() {
        let err = parse_checkout_response(StatusCode::OK, br#"{"sessionId":""}"#).unwrap_err();
        assert!(matches!(err, CheckoutError::MalformedResponse(_)));
    }

    #[test]
    fn non_json_body_is_malformed() {
        let err = parse_checkout_response(StatusCode::OK, b"<html>oops</html>").unwrap_err();
        assert_eq!(err.kind(), "malformed_response");
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_network_error() {
        let gateway = HttpCheckoutGateway::new(
            Url::parse("http://127.0.0.1:9/api/create-payment").unwrap(),
            Duration::from_millis(500),
        )
        .unwrap();
        let err = gateway
            .create_checkout_session(&PriceId::new("price_pro_monthly").unwrap())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "network");
    }
}
