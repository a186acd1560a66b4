//! Request routing dispatch module
//!
//! Entry point for HTTP request processing, responsible for method
//! validation, route matching, and dispatching to the catalog API or the
//! static storefront front-end.

use crate::catalog;
use crate::config::{AppState, RouteHandler, RoutesConfig};
use crate::handler::static_files;
use crate::http;
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<String>,
}

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();
    let path = uri.path();
    let is_head = method == Method::HEAD;

    // 1. Check HTTP method
    if let Some(resp) = check_http_method(&method, state.config.http.enable_cors) {
        return Ok(resp);
    }

    // 2. Check body size
    if let Some(resp) = check_body_size(&req, state.config.http.max_body_size) {
        return Ok(resp);
    }

    // 3. Log headers if enabled
    logger::log_headers_count(req.headers().len(), state.config.logging.show_headers);

    // 4. Extract conditional request headers
    let ctx = RequestContext {
        path,
        is_head,
        if_none_match: req
            .headers()
            .get("if-none-match")
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string),
    };

    let referer = header_string(&req, "referer");
    let user_agent = header_string(&req, "user-agent");

    // 5. Dispatch
    let response = route_request(&ctx, &state.config.routes, &state).await;

    // 6. Access log
    if state.config.logging.access_log {
        let mut entry = logger::AccessLogEntry::new(
            peer_addr.ip().to_string(),
            method.to_string(),
            path.to_string(),
        );
        entry.query = uri.query().map(ToString::to_string);
        entry.http_version = http_version_label(req.version()).to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes = response_body_bytes(&response);
        entry.referer = referer;
        entry.user_agent = user_agent;
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Check HTTP method and return appropriate response for non-GET/HEAD methods
fn check_http_method(method: &Method, enable_cors: bool) -> Option<Response<Full<Bytes>>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response(enable_cors)),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size(
    req: &Request<hyper::body::Incoming>,
    max_body_size: u64,
) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get("content-length")?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_error(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

/// Route request based on path and configuration
async fn route_request(
    ctx: &RequestContext<'_>,
    routes: &RoutesConfig,
    state: &Arc<AppState>,
) -> Response<Full<Bytes>> {
    // 0. Health check endpoints (highest priority, always fast)
    if routes.health.enabled {
        if ctx.path == routes.health.liveness_path {
            return http::build_health_response("ok");
        }
        if ctx.path == routes.health.readiness_path {
            return http::build_health_response("ok");
        }
    }

    // 1. Catalog API
    if ctx.path == "/api" || ctx.path.starts_with("/api/") {
        return catalog::handle_api_request(ctx.path, &state.catalog, ctx.is_head);
    }

    // 2. Favicon routes
    if routes.favicon_paths.iter().any(|p| ctx.path == p) {
        return static_files::serve_favicon(ctx).await;
    }

    // 3. Custom routes (exact match)
    if let Some(handler) = routes.custom_routes.get(ctx.path) {
        return dispatch_route_handler(ctx, handler, ctx.path, &routes.index_files).await;
    }

    // 4. Custom routes (prefix match)
    if let Some((prefix, handler)) = routes
        .custom_routes
        .iter()
        .find(|(p, _)| ctx.path.starts_with(p.as_str()))
    {
        return dispatch_route_handler(ctx, handler, prefix, &routes.index_files).await;
    }

    // 5. Default: storefront homepage
    let html = static_files::render_homepage(&state.catalog);
    http::build_html_response(html, ctx.is_head)
}

/// Dispatch to specific route handler
async fn dispatch_route_handler(
    ctx: &RequestContext<'_>,
    handler: &RouteHandler,
    route_prefix: &str,
    index_files: &[String],
) -> Response<Full<Bytes>> {
    match handler {
        RouteHandler::Dir { path: dir } => {
            static_files::serve_directory(ctx, dir, route_prefix, index_files).await
        }
        RouteHandler::File { path: file_path } => static_files::serve_file(ctx, file_path).await,
        RouteHandler::Redirect { target } => http::build_redirect_response(target),
    }
}

fn header_string(req: &Request<hyper::body::Incoming>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

/// Body size as reported by the response Content-Length header
fn response_body_bytes(response: &Response<Full<Bytes>>) -> usize {
    response
        .headers()
        .get("content-length")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}

fn http_version_label(version: hyper::Version) -> &'static str {
    if version == hyper::Version::HTTP_10 {
        "1.0"
    } else if version == hyper::Version::HTTP_2 {
        "2"
    } else {
        "1.1"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use hyper::StatusCode;

    fn default_config() -> Config {
        Config::load_from("nonexistent-config").expect("defaults should load")
    }

    fn make_state(config: &Config) -> Arc<AppState> {
        Arc::new(AppState::new(config))
    }

    fn make_ctx(path: &str) -> RequestContext<'_> {
        RequestContext {
            path,
            is_head: false,
            if_none_match: None,
        }
    }

    fn content_type(resp: &Response<Full<Bytes>>) -> &str {
        resp.headers()
            .get("Content-Type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
    }

    #[tokio::test]
    async fn test_health_paths_dispatch() {
        let state = make_state(&default_config());
        for path in ["/healthz", "/readyz"] {
            let resp = route_request(&make_ctx(path), &state.config.routes, &state).await;
            assert_eq!(resp.status(), StatusCode::OK);
            assert_eq!(content_type(&resp), "text/plain");
        }
    }

    #[tokio::test]
    async fn test_health_beats_custom_routes() {
        let mut config = default_config();
        config.routes.custom_routes.insert(
            "/healthz".to_string(),
            RouteHandler::Redirect {
                target: "/elsewhere".to_string(),
            },
        );
        let state = make_state(&config);
        let resp = route_request(&make_ctx("/healthz"), &state.config.routes, &state).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().get("Location").is_none());
    }

    #[tokio::test]
    async fn test_api_paths_dispatch_to_catalog() {
        let state = make_state(&default_config());

        let resp = route_request(&make_ctx("/api/products/1"), &state.config.routes, &state).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(content_type(&resp), "application/json");

        // Bare /api still belongs to the API, answered with the JSON 404
        let resp = route_request(&make_ctx("/api"), &state.config.routes, &state).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(content_type(&resp), "application/json");
    }

    #[tokio::test]
    async fn test_api_prefix_requires_segment_boundary() {
        // /apix is not under /api/ and must fall through to the homepage
        let state = make_state(&default_config());
        let resp = route_request(&make_ctx("/apix"), &state.config.routes, &state).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(content_type(&resp), "text/html; charset=utf-8");
    }

    #[tokio::test]
    async fn test_favicon_dispatch() {
        let state = make_state(&default_config());
        let resp = route_request(&make_ctx("/favicon.svg"), &state.config.routes, &state).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(content_type(&resp), "image/svg+xml");
    }

    #[tokio::test]
    async fn test_custom_route_exact_beats_prefix() {
        let mut config = default_config();
        config.routes.custom_routes.insert(
            "/docs".to_string(),
            RouteHandler::Redirect {
                target: "/prefix-target".to_string(),
            },
        );
        config.routes.custom_routes.insert(
            "/docs/old".to_string(),
            RouteHandler::Redirect {
                target: "/exact-target".to_string(),
            },
        );
        let state = make_state(&config);

        // Exact match wins even though another route prefixes the path
        let resp = route_request(&make_ctx("/docs/old"), &state.config.routes, &state).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(resp.headers().get("Location").unwrap(), "/exact-target");

        // Unmatched sub-path falls back to prefix matching
        let resp = route_request(&make_ctx("/docs/setup"), &state.config.routes, &state).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(resp.headers().get("Location").unwrap(), "/prefix-target");
    }

    #[tokio::test]
    async fn test_homepage_fallback() {
        let state = make_state(&default_config());
        let resp = route_request(&make_ctx("/"), &state.config.routes, &state).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(content_type(&resp), "text/html; charset=utf-8");
    }
}
