use gloo_net::http::Request;
use streaming::protocol::{Endpoint, FetchPayload, ProtocolError};
use tracing::{debug, warn};

/// GETs `endpoint` against `base` and decodes the body.
pub async fn fetch_payload(base: &str, endpoint: &Endpoint) -> Result<FetchPayload, ProtocolError> {
    let path = endpoint.path();
    let url = endpoint.url(base);
    debug!(%url, "fetch");

    let transport = |e: gloo_net::Error| ProtocolError::Transport {
        path: path.clone(),
        message: e.to_string(),
    };
    let resp = Request::get(&url).send().await.map_err(transport)?;
    if !resp.ok() {
        let err = ProtocolError::Status {
            path: path.clone(),
            status: resp.status(),
        };
        warn!(%err, "fetch failed");
        return Err(err);
    }
    let body = resp.text().await.map_err(transport)?;
    endpoint.decode(&body).inspect_err(|err| warn!(%err, "fetch failed"))
}
