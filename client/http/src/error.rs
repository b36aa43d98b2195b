//! Errors encountered during API requests or reported by the remote server.
use anyhow::Result;
use reqwest::Response;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// The client sent an invalid API request.
#[derive(Debug, thiserror::Error)]
#[error("the client sent an invalid API request")]
pub struct ClientError;

/// The server returned an empty API response.
#[derive(Debug, thiserror::Error)]
#[error("the server returned an empty API response")]
pub struct EmptyResponse;

/// Invalid API response received.
#[derive(Debug, thiserror::Error)]
#[error("invalid API response received: {response}")]
pub struct InvalidResponse {
    pub response: String,
}

/// The resource is not available, or access to it is restricted.
#[derive(Debug, thiserror::Error)]
#[error("the resource is not available, or access to it is restricted")]
pub struct ResourceNotFound;

/// The server failed to process the API request.
#[derive(Debug, thiserror::Error)]
#[error("the server failed to process the API request")]
pub struct ServerError;

/// The server rejected the request, with its reasons verbatim.
#[derive(Debug, thiserror::Error)]
#[error("the server rejected the request: {reason}")]
pub struct ValidationError {
    /// Reasons reported by the server, verbatim.
    pub reason: String,
}

/// Error payload shape returned by the Datadog API.
#[derive(Debug, Default, Deserialize)]
struct ErrorPayload {
    #[serde(default)]
    errors: Vec<String>,
}

/// Decode the body of an HTTP response and correctly handle errors in the process.
pub async fn inspect<T>(response: Response) -> Result<Option<T>>
where
    T: DeserializeOwned,
{
    let code = response.status();
    let text = response.text().await?;

    // Expect 404 errors to not have a response body.
    if matches!(code, reqwest::StatusCode::NOT_FOUND) {
        anyhow::bail!(ResourceNotFound);
    }

    // On error, attempt to decode the reasons reported by the server.
    if code.is_client_error() || code.is_server_error() {
        let payload = serde_json::from_str::<ErrorPayload>(&text).map_err(|error| {
            let response = text.clone();
            let decode = InvalidResponse { response };
            anyhow::anyhow!(error).context(decode)
        })?;
        let reason = match payload.errors.is_empty() {
            true => text,
            false => payload.errors.join("; "),
        };
        let error = anyhow::anyhow!(ValidationError { reason });
        let error = match code.is_client_error() {
            true => error.context(ClientError),
            false => error.context(ServerError),
        };
        return Err(error);
    }

    // On success decode the payload, if any, into the requested type.
    if text.is_empty() {
        return Ok(None);
    }
    serde_json::from_str::<T>(&text)
        .map_err(|error| {
            let decode = InvalidResponse { response: text };
            anyhow::anyhow!(error).context(decode)
        })
        .map(Some)
}
