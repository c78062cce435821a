//! OCR provider plumbing that does not touch the network: request
//! preparation with HMAC-SHA256 signing, and response decoding into the raw
//! text fed to [`crate::ReceiptExtractor`].
//!
//! Signature scheme (API gateway "X-Ca" headers):
//!   base64(HMAC-SHA256(secret, "POST\n{accept}\n{content-type}\n{timestamp}\n
//!   x-ca-key:{key}\nx-ca-nonce:{nonce}\n{path}"))

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, SecondsFormat, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use visualcents_core::{Error, Result};

type HmacSha256 = Hmac<Sha256>;

pub const DEFAULT_ENDPOINT: &str = "https://ocrapi-advanced.taobao.com";
pub const DEFAULT_PATH: &str = "/ocrservice/advanced";

const ACCEPT: &str = "application/json";
const CONTENT_TYPE: &str = "application/json; charset=UTF-8";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcrCredentials {
    #[serde(default)]
    pub access_key_id: String,
    #[serde(default)]
    pub access_key_secret: String,
}

impl OcrCredentials {
    pub fn new(access_key_id: impl Into<String>, access_key_secret: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            access_key_secret: access_key_secret.into(),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.access_key_id.is_empty() && !self.access_key_secret.is_empty()
    }
}

/// A fully signed request, ready for any HTTP client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreparedRequest {
    pub method: String,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl PreparedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Serialize)]
struct RequestBody<'a> {
    img: &'a str,
    prob: bool,
    #[serde(rename = "charInfo")]
    char_info: bool,
}

pub struct OcrRequestBuilder {
    endpoint: String,
    path: String,
    credentials: OcrCredentials,
}

impl OcrRequestBuilder {
    pub fn new(credentials: OcrCredentials) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            path: DEFAULT_PATH.to_string(),
            credentials,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>, path: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self.path = path.into();
        self
    }

    /// Build the signed POST for one image.
    pub fn prepare(
        &self,
        image: &[u8],
        timestamp: DateTime<Utc>,
        nonce: &str,
    ) -> Result<PreparedRequest> {
        if !self.credentials.is_configured() {
            return Err(Error::MissingCredentials);
        }
        if image.is_empty() {
            return Err(Error::invalid("image is empty"));
        }

        let img = STANDARD.encode(image);
        let body = serde_json::to_string(&RequestBody {
            img: &img,
            prob: false,
            char_info: false,
        })
        .map_err(|e| Error::Signing(format!("encode body: {e}")))?;

        let timestamp = timestamp.to_rfc3339_opts(SecondsFormat::Secs, true);
        let signature = self.sign(&self.string_to_sign(&timestamp, nonce))?;

        let headers = vec![
            ("Content-Type".to_string(), CONTENT_TYPE.to_string()),
            ("Accept".to_string(), ACCEPT.to_string()),
            ("X-Ca-Timestamp".to_string(), timestamp),
            ("X-Ca-Nonce".to_string(), nonce.to_string()),
            ("X-Ca-Key".to_string(), self.credentials.access_key_id.clone()),
            ("X-Ca-Signature".to_string(), signature),
        ];

        Ok(PreparedRequest {
            method: "POST".to_string(),
            url: format!("{}{}", self.endpoint, self.path),
            headers,
            body,
        })
    }

    pub fn string_to_sign(&self, timestamp: &str, nonce: &str) -> String {
        format!(
            "POST\n{ACCEPT}\n{CONTENT_TYPE}\n{timestamp}\nx-ca-key:{}\nx-ca-nonce:{nonce}\n{}",
            self.credentials.access_key_id, self.path
        )
    }

    pub fn sign(&self, string_to_sign: &str) -> Result<String> {
        let mut mac = HmacSha256::new_from_slice(self.credentials.access_key_secret.as_bytes())
            .map_err(|e| Error::Signing(format!("invalid HMAC key: {e}")))?;
        mac.update(string_to_sign.as_bytes());
        Ok(STANDARD.encode(mac.finalize().into_bytes()))
    }
}

#[derive(Deserialize)]
struct OcrResponse {
    content: Option<String>,
    #[serde(rename = "prism_wordsInfo")]
    prism_words_info: Option<Vec<WordInfo>>,
}

#[derive(Deserialize)]
struct WordInfo {
    word: Option<String>,
}

/// Turn a provider response body into raw recognised text.
///
/// Word-level results are joined with single spaces and take precedence
/// over the flat `content` field. A body that does not decode at all but
/// still carries a string `content` is accepted.
pub fn decode_response(body: &[u8]) -> Result<String> {
    match serde_json::from_slice::<OcrResponse>(body) {
        Ok(resp) => {
            if let Some(words) = resp.prism_words_info {
                let joined: Vec<String> = words.into_iter().filter_map(|w| w.word).collect();
                Ok(joined.join(" "))
            } else {
                Ok(resp.content.unwrap_or_default())
            }
        }
        Err(e) => {
            let value: serde_json::Value =
                serde_json::from_slice(body).map_err(|_| Error::Decode(e.to_string()))?;
            value
                .get("content")
                .and_then(|c| c.as_str())
                .map(str::to_string)
                .ok_or_else(|| Error::Decode(e.to_string()))
        }
    }
}
