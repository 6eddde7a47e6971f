//! Pluggable request transports.

use async_trait::async_trait;

use crate::{FetchError, Request, Response};

/// Sends a built [`Request`] and returns the raw [`Response`].
///
/// Non-2xx statuses are returned as responses, not errors; callers decide
/// with [`Response::error_for_status`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: Request) -> Result<Response, FetchError>;
}

/// Production transport backed by `reqwest`.
#[cfg(feature = "reqwest")]
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

#[cfg(feature = "reqwest")]
impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(feature = "reqwest")]
#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: Request) -> Result<Response, FetchError> {
        use crate::Method;

        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, &request.url);
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        if let Some(form) = request.form {
            builder = builder.multipart(encode_form(form)?);
        } else if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| FetchError::RequestError(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::RequestError(e.to_string()))?
            .to_vec();

        Ok(Response::new(status, headers, body))
    }
}

#[cfg(feature = "reqwest")]
fn encode_form(form: crate::Multipart) -> Result<reqwest::multipart::Form, FetchError> {
    use crate::FormValue;
    use reqwest::multipart::{Form, Part};

    form.into_parts()
        .into_iter()
        .try_fold(Form::new(), |encoded, part| match part.value {
            FormValue::Text(value) => Ok(encoded.text(part.name, value)),
            FormValue::File {
                filename,
                content_type,
                data,
            } => {
                let file = Part::bytes(data)
                    .file_name(filename)
                    .mime_str(&content_type)
                    .map_err(|e| FetchError::RequestError(e.to_string()))?;
                Ok(encoded.part(part.name, file))
            }
        })
}

/// Scripted transport: replays queued responses and records every request.
#[cfg(any(test, feature = "mock"))]
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: std::sync::Mutex<std::collections::VecDeque<Result<Response, FetchError>>>,
    requests: std::sync::Mutex<Vec<Request>>,
}

#[cfg(any(test, feature = "mock"))]
impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response with a JSON body.
    pub fn push_json<T: serde::Serialize>(&self, status: u16, body: &T) {
        let bytes = serde_json::to_vec(body).unwrap_or_default();
        self.push(Ok(Response::new(status, Default::default(), bytes)));
    }

    /// Queue a response with an empty body.
    pub fn push_status(&self, status: u16) {
        self.push(Ok(Response::new(status, Default::default(), Vec::new())));
    }

    /// Queue a transport-level failure.
    pub fn push_error(&self, error: FetchError) {
        self.push(Err(error));
    }

    /// Requests sent so far, oldest first.
    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    fn push(&self, response: Result<Response, FetchError>) {
        if let Ok(mut queue) = self.responses.lock() {
            queue.push_back(response);
        }
    }
}

#[cfg(any(test, feature = "mock"))]
#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: Request) -> Result<Response, FetchError> {
        let description = format!("{} {}", request.method.as_str(), request.url);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }
        self.responses
            .lock()
            .ok()
            .and_then(|mut queue| queue.pop_front())
            .unwrap_or_else(|| {
                Err(FetchError::RequestError(format!(
                    "no scripted response for {}",
                    description
                )))
            })
    }
}

#[cfg(all(test, feature = "reqwest"))]
mod tests {
    use super::*;
    use crate::Multipart;

    #[test]
    fn test_encode_form_sets_multipart_boundary() {
        let form = Multipart::new()
            .text("nombre", "Ana")
            .file("attachment", "living.jpg", "image/jpeg", vec![0xFF, 0xD8]);
        let encoded = encode_form(form).unwrap();
        assert!(!encoded.boundary().is_empty());
    }

    #[test]
    fn test_encode_form_rejects_bad_content_type() {
        let form = Multipart::new().file("attachment", "x.bin", "not a mime", vec![1]);
        assert!(matches!(encode_form(form), Err(FetchError::RequestError(_))));
    }
}
