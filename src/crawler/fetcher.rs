use reqwest::Client;
use std::time::Duration;

/// Outcome of one page fetch
///
/// Deliberately not a `Result`: a bad status or a dropped connection is an
/// expected, recoverable event for a scraper, handled by the engines'
/// continuation logic rather than propagated.
#[derive(Debug)]
pub enum FetchOutcome {
    /// 2xx response with a decoded body
    Success { status: u16, body: String },

    /// Any non-2xx status
    HttpStatus { status: u16 },

    /// Timeout, connection failure, or body decode failure
    Transport { error: String },
}

/// Builds the HTTP client shared by all engines
///
/// One browser-like User-Agent header, a per-request timeout from
/// configuration, and connection reuse across requests. Redirects follow
/// reqwest's default policy.
pub fn build_http_client(user_agent: &str, timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches one URL and classifies the outcome
pub async fn fetch_page(client: &Client, url: &str) -> FetchOutcome {
    match client.get(url).send().await {
        Ok(response) => {
            let status = response.status();
            if !status.is_success() {
                return FetchOutcome::HttpStatus {
                    status: status.as_u16(),
                };
            }

            match response.text().await {
                Ok(body) => FetchOutcome::Success {
                    status: status.as_u16(),
                    body,
                },
                Err(e) => FetchOutcome::Transport {
                    error: e.to_string(),
                },
            }
        }
        Err(e) => {
            let error = if e.is_timeout() {
                "Request timeout".to_string()
            } else if e.is_connect() {
                "Connection refused".to_string()
            } else {
                e.to_string()
            };
            FetchOutcome::Transport { error }
        }
    }
}
