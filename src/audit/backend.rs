//! Backend audit: response inspection plus two derived-path probes

use std::time::Duration;

use serde_json::{json, Value};
use tracing::debug;
use url::Url;

use super::probe::{FetchedPage, Prober};
use super::report::Finding;
use super::target::{derived, MUTATION_PATH, PROTECTED_PATH};

/// Latency under which stage 6 gets full marks
pub const LATENCY_BUDGET: Duration = Duration::from_secs(2);

const ENVELOPE_KEYS: [&str; 4] = ["success", "status", "data", "message"];

/// Score a backend for a stage (1-8)
///
/// Stages 4 and 5 issue one extra request each against a derived path on the
/// same origin. Every other stage inspects `page` only.
pub async fn score(stage: u8, base: &Url, page: &FetchedPage, prober: &Prober) -> Finding {
    match stage.clamp(1, 8) {
        1 => json_content_type(page),
        2 => cors_header(page),
        3 => json_envelope(page),
        4 => protected_path(base, prober).await,
        5 => rejects_invalid_payload(base, prober).await,
        6 => latency(page),
        7 => header_hygiene(page),
        _ => Finding::new(
            100,
            "Capstone API is live. A mentor will look over the full project.",
        ),
    }
}

fn json_content_type(page: &FetchedPage) -> Finding {
    let is_json = page
        .header("content-type")
        .map(|v| v.to_ascii_lowercase().contains("application/json"))
        .unwrap_or(false);
    if is_json {
        Finding::new(100, "API responds with JSON.")
    } else {
        Finding::new(
            30,
            "Respond with Content-Type: application/json from your API root.",
        )
    }
}

fn cors_header(page: &FetchedPage) -> Finding {
    if page.header("access-control-allow-origin").is_some() {
        Finding::new(100, "CORS is configured.")
    } else {
        Finding::new(
            30,
            "Enable CORS so browsers can call your API (Access-Control-Allow-Origin header missing).",
        )
    }
}

fn json_envelope(page: &FetchedPage) -> Finding {
    let has_envelope = serde_json::from_str::<Value>(&page.body)
        .ok()
        .and_then(|v| v.as_object().cloned())
        .map(|obj| ENVELOPE_KEYS.iter().any(|k| obj.contains_key(*k)))
        .unwrap_or(false);
    if has_envelope {
        Finding::new(100, "Responses use a consistent JSON envelope.")
    } else {
        Finding::new(
            30,
            "Wrap responses in a JSON object with a success/status/data/message field.",
        )
    }
}

async fn protected_path(base: &Url, prober: &Prober) -> Finding {
    let Ok(url) = derived(base, PROTECTED_PATH) else {
        return Finding::new(30, "Could not build the admin route URL for your API.");
    };
    match prober.status_of(&url).await {
        Ok(401) | Ok(403) => Finding::new(100, "Admin routes reject unauthenticated requests."),
        Ok(status) => {
            debug!(url = %url, status, "protected path did not reject");
            Finding::new(
                30,
                format!(
                    "{} returned {} without credentials; protect it with authentication (401/403).",
                    PROTECTED_PATH, status
                ),
            )
        }
        Err(failure) => {
            debug!(url = %url, ?failure, "protected path probe failed");
            Finding::new(
                30,
                format!("Could not reach {} to check authentication.", PROTECTED_PATH),
            )
        }
    }
}

async fn rejects_invalid_payload(base: &Url, prober: &Prober) -> Finding {
    let Ok(url) = derived(base, MUTATION_PATH) else {
        return Finding::new(50, "Could not build the users route URL for your API.");
    };
    let payload = json!({ "email": "not-an-email", "password": "" });
    match prober.post_json(&url, &payload).await {
        Ok(status) if (400..500).contains(&status) => {
            Finding::new(100, "Invalid input is rejected with a client error.")
        }
        Ok(status) => Finding::new(
            20,
            format!(
                "POST {} accepted an invalid payload ({}); validate input and return 400.",
                MUTATION_PATH, status
            ),
        ),
        Err(failure) => {
            debug!(url = %url, ?failure, "validation probe failed");
            Finding::new(
                50,
                format!(
                    "Could not reach {} to check input validation; a mentor may follow up.",
                    MUTATION_PATH
                ),
            )
        }
    }
}

fn latency(page: &FetchedPage) -> Finding {
    if page.elapsed < LATENCY_BUDGET {
        Finding::new(100, "API responds quickly.")
    } else {
        Finding::new(
            50,
            format!(
                "API took {} ms to respond; look into slow queries or cold starts.",
                page.elapsed.as_millis()
            ),
        )
    }
}

fn header_hygiene(page: &FetchedPage) -> Finding {
    if page.header("x-powered-by").is_some() {
        Finding::new(
            50,
            "Remove the X-Powered-By header so your stack is not advertised.",
        )
    } else {
        Finding::new(100, "Response headers do not leak server details.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderMap, HeaderValue};

    fn page(headers: &[(&'static str, &'static str)], body: &str, elapsed_ms: u64) -> FetchedPage {
        let mut map = HeaderMap::new();
        for (name, value) in headers {
            map.insert(*name, HeaderValue::from_static(*value));
        }
        FetchedPage {
            status: 200,
            headers: map,
            body: body.to_string(),
            elapsed: Duration::from_millis(elapsed_ms),
        }
    }

    #[test]
    fn test_content_type() {
        assert_eq!(json_content_type(&page(&[("content-type", "application/json; charset=utf-8")], "{}", 5)).score, 100);
        assert_eq!(json_content_type(&page(&[("content-type", "text/html")], "", 5)).score, 30);
    }

    #[test]
    fn test_envelope() {
        assert_eq!(json_envelope(&page(&[], r#"{"success":true,"data":[]}"#, 5)).score, 100);
        assert_eq!(json_envelope(&page(&[], r#"[1,2,3]"#, 5)).score, 30);
        assert_eq!(json_envelope(&page(&[], "<html>", 5)).score, 30);
    }

    #[test]
    fn test_latency_and_hygiene() {
        assert_eq!(latency(&page(&[], "", 100)).score, 100);
        assert_eq!(latency(&page(&[], "", 2500)).score, 50);
        assert_eq!(header_hygiene(&page(&[("x-powered-by", "Express")], "", 5)).score, 50);
        assert_eq!(header_hygiene(&page(&[], "", 5)).score, 100);
    }

    #[test]
    fn test_cors() {
        assert_eq!(cors_header(&page(&[("access-control-allow-origin", "*")], "", 5)).score, 100);
        assert_eq!(cors_header(&page(&[], "", 5)).score, 30);
    }
}
