//! Client Credential Extraction
//!
//! Normalizes the client identity of a revoke request from either a
//! Basic-style authorization header or explicit body fields.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use reqwest::header::HeaderValue;

use crate::error::{InputError, RevocationError};
use crate::types::ClientCredentials;

/// Credentials plus the header to forward to the provider, if any.
#[derive(Clone, Debug)]
pub struct ExtractedCredentials {
    pub credentials: ClientCredentials,
    /// The inbound header, unchanged. `None` when body fields were used.
    pub forward_header: Option<String>,
}

/// Standard alphabet, trailing `=` padding optional on decode.
const BASIC_PAYLOAD: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Client credential extractor.
pub struct ClientCredentialExtractor;

impl ClientCredentialExtractor {
    /// Extract credentials. A present header wins over body fields.
    pub fn extract(
        authorization_header: Option<&str>,
        body_client_id: Option<&str>,
        body_client_secret: Option<&str>,
    ) -> Result<ExtractedCredentials, RevocationError> {
        if let Some(header) = authorization_header {
            // The header is forwarded verbatim, so it must be a valid header value.
            HeaderValue::from_str(header)
                .map_err(|_| malformed("header contains invalid characters".to_string()))?;
            let credentials = Self::decode_header(header)?;
            return Ok(ExtractedCredentials {
                credentials,
                forward_header: Some(header.to_string()),
            });
        }

        let client_id = body_client_id.ok_or_else(|| InputError::MissingField {
            field: "client_id".to_string(),
        })?;

        Ok(ExtractedCredentials {
            credentials: match body_client_secret {
                Some(secret) => ClientCredentials::new(client_id, secret),
                None => ClientCredentials::public(client_id),
            },
            forward_header: None,
        })
    }

    /// Decode `Basic <base64(id:secret)>` or a bare base64 payload.
    ///
    /// Splits once on `:`; an empty remainder means no secret.
    pub fn decode_header(header: &str) -> Result<ClientCredentials, RevocationError> {
        let payload = header.strip_prefix("Basic ").unwrap_or(header).trim();

        let decoded = BASIC_PAYLOAD
            .decode(payload)
            .map_err(|e| malformed(format!("invalid base64: {}", e)))?;
        let decoded = String::from_utf8(decoded)
            .map_err(|_| malformed("decoded value is not UTF-8".to_string()))?;

        let (client_id, secret) = decoded
            .split_once(':')
            .ok_or_else(|| malformed("missing ':' separator".to_string()))?;

        if secret.is_empty() {
            Ok(ClientCredentials::public(client_id))
        } else {
            Ok(ClientCredentials::new(client_id, secret))
        }
    }
}

fn malformed(message: String) -> RevocationError {
    RevocationError::Input(InputError::MalformedAuthorizationHeader { message })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic(raw: &str) -> String {
        format!(
            "Basic {}",
            base64::engine::general_purpose::STANDARD.encode(raw)
        )
    }

    #[test]
    fn test_basic_header() {
        let header = basic("abc:secret123");
        let extracted = ClientCredentialExtractor::extract(Some(&header), None, None).unwrap();

        assert_eq!(extracted.credentials.client_id, "abc");
        assert_eq!(extracted.credentials.secret(), Some("secret123"));
        assert_eq!(extracted.forward_header.as_deref(), Some(header.as_str()));
    }

    #[test]
    fn test_header_wins_over_body() {
        let header = basic("abc:secret123");
        let extracted =
            ClientCredentialExtractor::extract(Some(&header), Some("body-id"), Some("body-secret"))
                .unwrap();

        assert_eq!(extracted.credentials.client_id, "abc");
        assert_eq!(extracted.credentials.secret(), Some("secret123"));
    }

    #[test]
    fn test_bare_payload_with_whitespace() {
        let payload = format!(
            "  {}  ",
            base64::engine::general_purpose::STANDARD.encode("abc:s3")
        );
        let extracted = ClientCredentialExtractor::extract(Some(&payload), None, None).unwrap();

        assert_eq!(extracted.credentials.client_id, "abc");
        assert_eq!(extracted.credentials.secret(), Some("s3"));
        assert_eq!(extracted.forward_header.as_deref(), Some(payload.as_str()));
    }

    #[test]
    fn test_unpadded_payload() {
        let extracted =
            ClientCredentialExtractor::extract(Some("Basic YWJjOnM"), None, None).unwrap();

        assert_eq!(extracted.credentials.client_id, "abc");
        assert_eq!(extracted.credentials.secret(), Some("s"));
        assert_eq!(extracted.forward_header.as_deref(), Some("Basic YWJjOnM"));
    }

    #[test]
    fn test_control_character_in_header() {
        let header = format!("{}\n", basic("abc:s"));
        let err = ClientCredentialExtractor::extract(Some(&header), None, None).unwrap_err();

        assert!(matches!(
            err,
            RevocationError::Input(InputError::MalformedAuthorizationHeader { .. })
        ));
    }

    #[test]
    fn test_secret_keeps_later_colons() {
        let header = basic("abc:pa:ss");
        let credentials = ClientCredentialExtractor::decode_header(&header).unwrap();
        assert_eq!(credentials.secret(), Some("pa:ss"));
    }

    #[test]
    fn test_empty_secret_is_public_client() {
        let credentials = ClientCredentialExtractor::decode_header(&basic("abc:")).unwrap();
        assert_eq!(credentials.client_id, "abc");
        assert!(credentials.secret().is_none());
    }

    #[test]
    fn test_missing_separator() {
        let err = ClientCredentialExtractor::extract(Some(&basic("abcsecret")), None, None)
            .unwrap_err();
        assert!(matches!(
            err,
            RevocationError::Input(InputError::MalformedAuthorizationHeader { .. })
        ));
    }

    #[test]
    fn test_invalid_base64() {
        let err = ClientCredentialExtractor::extract(Some("Basic !!!not-base64"), None, None)
            .unwrap_err();
        assert!(err.is_input_error());
    }

    #[test]
    fn test_body_fields() {
        let extracted = ClientCredentialExtractor::extract(None, Some("abc"), None).unwrap();
        assert_eq!(extracted.credentials.client_id, "abc");
        assert!(extracted.credentials.secret().is_none());
        assert!(extracted.forward_header.is_none());

        let extracted =
            ClientCredentialExtractor::extract(None, Some("abc"), Some("secret123")).unwrap();
        assert_eq!(extracted.credentials.secret(), Some("secret123"));
    }

    #[test]
    fn test_body_without_client_id() {
        let err = ClientCredentialExtractor::extract(None, None, Some("secret")).unwrap_err();
        assert!(matches!(
            err,
            RevocationError::Input(InputError::MissingField { .. })
        ));
    }
}
