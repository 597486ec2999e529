//! HTTP server for the interactive dashboard
//!
//! `bingeworthy serve` → loads the feed, starts server, opens browser.
//!
//! The browser page is a thin renderer. It posts every interaction to
//! `/api/event` and draws whatever snapshot comes back, so all the rating
//! logic stays in Rust. Requests are handled one at a time on a single
//! thread; each event runs to completion before the next request is read.

use crate::error::FeedError;
use crate::feed::Dataset;
use crate::rating::ShowView;
use crate::state::{AppState, Outcome, UiEvent};
use serde::{Deserialize, Serialize};
use std::io::Read;
use tiny_http::{Header, Method, Request, Response, Server};

// Embed the UI directly in the binary
const UI_HTML: &str = include_str!("ui.html");

#[derive(Serialize)]
struct ApiResponse<T> {
    ok: bool,
    data: Option<T>,
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self { ok: true, data: Some(data), error: None }
    }
}

impl ApiResponse<()> {
    fn failure(message: impl Into<String>) -> Self {
        Self { ok: false, data: None, error: Some(message.into()) }
    }
}

#[derive(Deserialize, Debug, Default)]
struct SearchParams {
    #[serde(default)]
    q: String,
}

/// Everything the page needs to draw itself.
#[derive(Serialize)]
pub struct Snapshot<'a> {
    pub shows: Vec<&'a str>,
    pub state: &'a AppState,
    /// Address-bar query for the current state
    pub query: String,
    pub view: Option<ShowView>,
    /// Feed load failure, shown as the error banner
    pub error: Option<&'a str>,
}

#[derive(Serialize)]
struct EventReply<'a> {
    outcome: Outcome,
    snapshot: Snapshot<'a>,
}

/// A plain HTTP reply, independent of the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl Reply {
    fn html(body: String) -> Self {
        Self { status: 200, content_type: "text/html; charset=utf-8", body }
    }

    fn json<T: Serialize>(status: u16, value: &T) -> Self {
        let body = serde_json::to_string(value).unwrap_or_else(|e| {
            tracing::error!(error = %e, "failed to serialize response");
            r#"{"ok":false,"data":null,"error":"serialization failed"}"#.to_string()
        });
        Self { status, content_type: "application/json", body }
    }

    fn not_found() -> Self {
        Self { status: 404, content_type: "text/plain", body: "Not found".to_string() }
    }
}

/// Server-side session: the loaded feed plus the dashboard state.
pub struct Dashboard {
    data: Dataset,
    load_error: Option<String>,
    state: AppState,
}

impl Dashboard {
    pub fn new(loaded: Result<Dataset, FeedError>) -> Self {
        let (data, load_error) = match loaded {
            Ok(data) => (data, None),
            Err(e) => {
                tracing::error!(error = %e, "error loading data");
                (Dataset::default(), Some(e.to_string()))
            }
        };
        Self { data, load_error, state: AppState::new() }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            shows: self.data.index.names(),
            state: &self.state,
            query: self.state.query_string(),
            view: self.state.view(&self.data.index),
            error: self.load_error.as_deref(),
        }
    }

    /// Route one request. `url` includes the query string.
    pub fn handle(&mut self, method: &Method, url: &str, body: &str) -> Reply {
        let (path, query) = match url.split_once('?') {
            Some((path, query)) => (path, query),
            None => (url, ""),
        };

        match (method, path) {
            // Serve embedded UI
            (&Method::Get, "/") => Reply::html(UI_HTML.to_string()),

            // API: fresh state from the page's own query string
            (&Method::Get, "/api/state") => {
                self.state = AppState::new();
                self.state.apply_query(&self.data.index, query);
                Reply::json(200, &ApiResponse::success(self.snapshot()))
            }

            // API: current state without resetting it
            (&Method::Get, "/api/view") => Reply::json(200, &ApiResponse::success(self.snapshot())),

            // API: one user interaction
            (&Method::Post, "/api/event") => match serde_json::from_str::<UiEvent>(body) {
                Ok(event) => {
                    let outcome = self.state.update(&self.data.index, event);
                    let reply = EventReply { outcome, snapshot: self.snapshot() };
                    Reply::json(200, &ApiResponse::success(reply))
                }
                Err(e) => {
                    tracing::warn!(error = %e, "rejecting malformed event");
                    Reply::json(400, &ApiResponse::failure(format!("invalid event: {}", e)))
                }
            },

            // API: search dropdown
            (&Method::Get, "/api/shows") => {
                let params: SearchParams = serde_urlencoded::from_str(query).unwrap_or_default();
                Reply::json(200, &ApiResponse::success(self.data.index.search(&params.q)))
            }

            // 404
            _ => Reply::not_found(),
        }
    }
}

/// Start server, open browser, serve UI
pub fn start(port: u16, loaded: Result<Dataset, FeedError>, open_browser: bool) -> std::io::Result<()> {
    let addr = format!("127.0.0.1:{}", port);
    let server = Server::http(&addr).map_err(|e| {
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;

    let url = format!("http://localhost:{}", port);
    let mut dashboard = Dashboard::new(loaded);

    eprintln!("\n\x1b[1;32m📺 Bingeworthy\x1b[0m");
    eprintln!("   {}", url);
    match &dashboard.load_error {
        Some(e) => eprintln!("   \x1b[31mFeed failed to load: {}\x1b[0m\n", e),
        None => eprintln!("   {} shows loaded\n", dashboard.data.index.len()),
    }

    if open_browser {
        let _ = open::that(&url);
    }

    // Handle requests
    for request in server.incoming_requests() {
        if let Err(e) = respond(&mut dashboard, request) {
            tracing::warn!(error = %e, "failed to answer request");
        }
    }

    Ok(())
}

fn respond(dashboard: &mut Dashboard, mut request: Request) -> std::io::Result<()> {
    let method = request.method().clone();
    let url = request.url().to_string();

    let mut body = String::new();
    if method == Method::Post {
        request.as_reader().read_to_string(&mut body)?;
    }

    let reply = dashboard.handle(&method, &url, &body);
    tracing::info!(method = %method, url = %url, status = reply.status, "request");

    let header = Header::from_bytes(&b"Content-Type"[..], reply.content_type.as_bytes())
        .map_err(|_| std::io::Error::new(std::io::ErrorKind::InvalidInput, "bad content type"))?;
    let response = Response::from_string(reply.body)
        .with_status_code(reply.status)
        .with_header(header);
    request.respond(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    const FEED: &str = "Show,Season,Episode,Title,Rating,Votes,IMDB Link\n\
        Foo,1,1,Pilot,9.2,1000,https://www.imdb.com/title/tt0000001/\n\
        Foo,1,2,Second,6.5,800,https://www.imdb.com/title/tt0000002/\n\
        Foo,2,1,Return,8.0,900,https://www.imdb.com/title/tt0000003/\n\
        Bar,1,1,Start,7.7,50,https://www.imdb.com/title/tt0000004/\n";

    fn dashboard() -> Dashboard {
        Dashboard::new(Ok(Dataset::from_csv(FEED)))
    }

    fn json(reply: &Reply) -> Value {
        serde_json::from_str(&reply.body).unwrap()
    }

    // ==========================================================================
    // ROUTING
    // ==========================================================================

    #[test]
    fn test_index_serves_ui() {
        let reply = dashboard().handle(&Method::Get, "/", "");
        assert_eq!(reply.status, 200);
        assert!(reply.content_type.starts_with("text/html"));
        assert!(reply.body.contains("id=\"heatmap\""));
    }

    #[test]
    fn test_unknown_path_404() {
        let reply = dashboard().handle(&Method::Get, "/nope", "");
        assert_eq!(reply.status, 404);
        let reply = dashboard().handle(&Method::Get, "/api/event", "");
        assert_eq!(reply.status, 404);
    }

    // ==========================================================================
    // STATE AND EVENTS
    // ==========================================================================

    #[test]
    fn test_state_applies_query() {
        let mut d = dashboard();
        let body = json(&d.handle(&Method::Get, "/api/state?show=foo&mustWatch=9.0", ""));

        assert_eq!(body["ok"], true);
        assert_eq!(body["data"]["shows"], serde_json::json!(["Bar", "Foo"]));
        assert_eq!(body["data"]["state"]["current_show"], "Foo");
        assert_eq!(body["data"]["view"]["counts"]["must_watch"], 1);
        assert_eq!(body["data"]["query"], "show=Foo&consider=7.0&mustWatch=9.0");
        assert!(body["data"]["error"].is_null());
    }

    #[test]
    fn test_state_resets_between_loads() {
        let mut d = dashboard();
        d.handle(&Method::Get, "/api/state?show=Foo", "");
        let body = json(&d.handle(&Method::Get, "/api/state", ""));
        assert!(body["data"]["view"].is_null());
        assert!(d.state().current_show.is_none());
    }

    #[test]
    fn test_event_updates_state() {
        let mut d = dashboard();
        let reply = d.handle(&Method::Post, "/api/event", r#"{"type":"show_selected","name":"Foo"}"#);
        let body = json(&reply);

        assert_eq!(reply.status, 200);
        assert_eq!(body["data"]["outcome"]["rerender"], true);
        assert_eq!(body["data"]["outcome"]["url"], "show=Foo&consider=7.0&mustWatch=8.0");
        assert_eq!(body["data"]["snapshot"]["view"]["show"], "Foo");

        let reply = d.handle(&Method::Post, "/api/event", r#"{"type":"sort_requested","column":"rating"}"#);
        let body = json(&reply);
        let first = &body["data"]["snapshot"]["view"]["must_watch"][0];
        assert_eq!(first["rating"], 8.0);
    }

    #[test]
    fn test_bad_event_rejected() {
        let mut d = dashboard();
        let reply = d.handle(&Method::Post, "/api/event", r#"{"type":"explode"}"#);
        assert_eq!(reply.status, 400);
        assert_eq!(json(&reply)["ok"], false);
    }

    #[test]
    fn test_show_search() {
        let mut d = dashboard();
        let body = json(&d.handle(&Method::Get, "/api/shows?q=fo", ""));
        assert_eq!(body["data"], serde_json::json!(["Foo"]));

        let body = json(&d.handle(&Method::Get, "/api/shows", ""));
        assert_eq!(body["data"], serde_json::json!(["Bar", "Foo"]));
    }

    // ==========================================================================
    // LOAD FAILURE
    // ==========================================================================

    #[test]
    fn test_load_error_reported_in_snapshot() {
        let mut d = Dashboard::new(Err(FeedError::Status(500)));
        let body = json(&d.handle(&Method::Get, "/api/state?show=Foo", ""));

        assert_eq!(body["data"]["error"], "HTTP error! status: 500");
        assert_eq!(body["data"]["shows"], serde_json::json!([]));
        assert!(body["data"]["view"].is_null());
    }
}
