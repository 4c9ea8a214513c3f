//! Speech-to-text (Deepgram) and text generation (Gemini) over HTTPS.

use core::time::Duration;

use embedded_svc::http::client::Client as HttpClient;
use embedded_svc::http::{Headers, Status};
use esp_idf_svc::http::client::{Configuration as HttpConfiguration, EspHttpConnection};
use esp_idf_svc::io::{Read, Write};
use serde::{Deserialize, Serialize};

use camdeck_ui::{AssistantError, AssistantService};

use crate::config::cloud;
use crate::wifi::WifiLink;

#[derive(Deserialize)]
struct ListenResponse {
    results: ListenResults,
}

#[derive(Deserialize)]
struct ListenResults {
    channels: Vec<ListenChannel>,
}

#[derive(Deserialize)]
struct ListenChannel {
    alternatives: Vec<ListenAlternative>,
}

#[derive(Deserialize)]
struct ListenAlternative {
    transcript: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

/// The voice assistant backend. `wifi` is `None` when the radio failed to
/// come up at boot; every call then reports [`AssistantError::NotConnected`].
pub struct CloudAssistant {
    wifi: Option<WifiLink>,
}

impl CloudAssistant {
    pub fn new(wifi: Option<WifiLink>) -> Self {
        Self { wifi }
    }

    fn ensure_connected(&self) -> Result<(), AssistantError> {
        if self.is_connected() {
            Ok(())
        } else {
            Err(AssistantError::NotConnected)
        }
    }

    fn post(
        &mut self,
        url: &str,
        headers: &[(&str, &str)],
        body: &[u8],
    ) -> Result<Vec<u8>, AssistantError> {
        self.ensure_connected()?;

        let config = HttpConfiguration {
            use_global_ca_store: true,
            crt_bundle_attach: Some(esp_idf_svc::sys::esp_crt_bundle_attach),
            timeout: Some(Duration::from_millis(cloud::HTTP_TIMEOUT_MS)),
            ..Default::default()
        };
        let conn = EspHttpConnection::new(&config).map_err(network)?;
        let mut client = HttpClient::wrap(conn);

        let content_length = body.len().to_string();
        let mut all_headers = headers.to_vec();
        all_headers.push(("content-length", &content_length));

        let mut request = client.post(url, &all_headers).map_err(network)?;
        request.write_all(body).map_err(network)?;
        request.flush().map_err(network)?;
        let mut response = request.submit().map_err(network)?;

        let status = response.status();
        if status != 200 {
            log::warn!("POST {} -> HTTP {}", strip_query(url), status);
            return Err(AssistantError::Http(status));
        }

        let content_length = response.content_len().unwrap_or(0) as usize;
        let mut reply = Vec::with_capacity(content_length.clamp(1024, cloud::MAX_RESPONSE_BYTES));
        let mut buf = [0u8; 4096];
        loop {
            let read = response.read(&mut buf).map_err(network)?;
            if read == 0 {
                break;
            }
            if reply.len() + read > cloud::MAX_RESPONSE_BYTES {
                return Err(AssistantError::Parse(format!(
                    "response larger than {} bytes",
                    cloud::MAX_RESPONSE_BYTES
                )));
            }
            reply.extend_from_slice(&buf[..read]);
        }
        Ok(reply)
    }
}

fn network<E: core::fmt::Debug>(err: E) -> AssistantError {
    AssistantError::Network(format!("{:?}", err))
}

fn parse<E: core::fmt::Display>(err: E) -> AssistantError {
    AssistantError::Parse(err.to_string())
}

/// Keeps API keys out of the log.
fn strip_query(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}

impl AssistantService for CloudAssistant {
    fn connect(&mut self) -> bool {
        let Some(wifi) = self.wifi.as_mut() else {
            log::warn!("Wi-Fi unavailable");
            return false;
        };
        match wifi.connect() {
            Ok(()) => true,
            Err(err) => {
                log::warn!("Wi-Fi connection failed: {}", err);
                false
            }
        }
    }

    fn is_connected(&self) -> bool {
        self.wifi.as_ref().is_some_and(WifiLink::is_connected)
    }

    fn transcribe(&mut self, audio: &[u8]) -> Result<String, AssistantError> {
        let auth = format!("Token {}", cloud::DEEPGRAM_API_KEY);
        let headers = [("content-type", "audio/wav"), ("authorization", auth.as_str())];
        let body = self.post(cloud::DEEPGRAM_URL, &headers, audio)?;

        let reply: ListenResponse = serde_json::from_slice(&body).map_err(parse)?;
        let transcript = reply
            .results
            .channels
            .into_iter()
            .next()
            .and_then(|channel| channel.alternatives.into_iter().next())
            .map(|alternative| alternative.transcript.trim().to_string())
            .unwrap_or_default();
        log::info!("Transcript: {} chars", transcript.len());
        Ok(transcript)
    }

    fn complete(&mut self, prompt: &str) -> Result<String, AssistantError> {
        let request = GenerateRequest {
            contents: [Content {
                parts: [RequestPart { text: prompt }],
            }],
        };
        let payload = serde_json::to_vec(&request).map_err(parse)?;
        let url = format!("{}?key={}", cloud::GEMINI_URL, cloud::GEMINI_API_KEY);
        let headers = [("content-type", "application/json")];
        let body = self.post(&url, &headers, &payload)?;

        let reply: GenerateResponse = serde_json::from_slice(&body).map_err(parse)?;
        let text: String = reply
            .candidates
            .into_iter()
            .next()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .into_iter()
                    .map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();
        if text.trim().is_empty() {
            return Err(AssistantError::Parse("no candidates in reply".into()));
        }
        Ok(text.trim().to_string())
    }
}
