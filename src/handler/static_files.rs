//! Static file serving module
//!
//! Serves the storefront front-end: pages, stylesheets, product images, and
//! the favicon. Handles MIME type detection, ETag-based caching, and the
//! generated homepage.

use crate::catalog::Catalog;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::fmt::Write as _;
use std::path::Path;
use tokio::fs;

const FAVICON_PATH: &str = "static/favicon.svg";

/// Serve favicon
pub async fn serve_favicon(ctx: &RequestContext<'_>) -> Response<Full<Bytes>> {
    match fs::read(FAVICON_PATH).await {
        Ok(data) => build_static_file_response(
            &data,
            "image/svg+xml",
            ctx.if_none_match.as_deref(),
            ctx.is_head,
        ),
        Err(_) => http::build_404_response(),
    }
}

/// Serve static files from a directory
pub async fn serve_directory(
    ctx: &RequestContext<'_>,
    dir: &str,
    route_prefix: &str,
    index_files: &[String],
) -> Response<Full<Bytes>> {
    match load_from_directory(dir, ctx.path, route_prefix, index_files).await {
        Some((content, content_type)) => build_static_file_response(
            &content,
            content_type,
            ctx.if_none_match.as_deref(),
            ctx.is_head,
        ),
        None => http::build_404_response(),
    }
}

/// Serve a single file
pub async fn serve_file(ctx: &RequestContext<'_>, file_path: &str) -> Response<Full<Bytes>> {
    match load_single_file(file_path).await {
        Some((content, content_type)) => build_static_file_response(
            &content,
            content_type,
            ctx.if_none_match.as_deref(),
            ctx.is_head,
        ),
        None => http::build_404_response(),
    }
}

/// Load static file from directory with index file support
async fn load_from_directory(
    static_dir: &str,
    path: &str,
    route_prefix: &str,
    index_files: &[String],
) -> Option<(Vec<u8>, &'static str)> {
    // Remove leading slash and prevent directory traversal
    let clean_path = path.trim_start_matches('/').replace("..", "");

    // Remove route prefix from path
    let prefix_clean = route_prefix.trim_matches('/');
    let relative_path = if prefix_clean.is_empty() {
        clean_path.as_str()
    } else {
        clean_path
            .strip_prefix(&format!("{prefix_clean}/"))
            .unwrap_or(&clean_path)
    };

    let mut file_path = Path::new(static_dir).join(relative_path);

    // Security: ensure file_path is within static_dir
    let static_dir_canonical = match Path::new(static_dir).canonicalize() {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Static directory not found or inaccessible '{static_dir}': {e}"
            ));
            return None;
        }
    };

    // Check if path is a directory, try index files
    if file_path.is_dir() || relative_path.is_empty() || relative_path.ends_with('/') {
        for index_file in index_files {
            let index_path = file_path.join(index_file);
            if index_path.exists() && index_path.is_file() {
                file_path = index_path;
                break;
            }
        }
    }

    // File not found is common (404), no need to log at warning level
    let Ok(file_path_canonical) = file_path.canonicalize() else {
        return None;
    };
    if !file_path_canonical.starts_with(&static_dir_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            path,
            file_path_canonical.display()
        ));
        return None;
    }

    let content = fs::read(&file_path).await.ok()?;
    let extension = file_path.extension().and_then(|e| e.to_str());
    Some((content, mime::get_content_type(extension)))
}

/// Load a single configured file
async fn load_single_file(file_path: &str) -> Option<(Vec<u8>, &'static str)> {
    let path = Path::new(file_path);
    let content = fs::read(path).await.ok()?;
    let extension = path.extension().and_then(|e| e.to_str());
    Some((content, mime::get_content_type(extension)))
}

/// Build a static file response with ETag handling
fn build_static_file_response(
    content: &[u8],
    content_type: &'static str,
    if_none_match: Option<&str>,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(content);
    if cache::check_etag_match(if_none_match, &etag) {
        return http::build_304_response(&etag);
    }
    http::response::build_cached_response(
        Bytes::copy_from_slice(content),
        content_type,
        &etag,
        is_head,
    )
}

/// Render the storefront homepage from the catalog
///
/// Served when no configured route matches. Lists every product as a card
/// linking to its API record.
pub fn render_homepage(catalog: &Catalog) -> String {
    let mut cards = String::new();
    for product in catalog.products() {
        let _ = write!(
            cards,
            r#"
      <div class="card">
        <img src="{image}" alt="{name}">
        <h2>{name}</h2>
        <p>{description}</p>
        <p class="price">${price:.2}</p>
        <a href="/api/products/{id}">View JSON</a>
      </div>"#,
            image = product.image,
            name = product.name,
            description = product.description,
            price = product.price,
            id = product.id,
        );
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Storefront</title>
  <style>
    body {{ font-family: sans-serif; margin: 0; background: #f7f7f7; }}
    header {{ background: #1f2937; color: #fff; padding: 1rem 2rem; }}
    .grid {{ display: flex; flex-wrap: wrap; gap: 1rem; padding: 2rem; }}
    .card {{ background: #fff; border-radius: 8px; padding: 1rem; width: 220px;
             box-shadow: 0 1px 3px rgba(0,0,0,0.1); }}
    .card img {{ width: 100%; border-radius: 4px; }}
    .price {{ font-weight: bold; color: #047857; }}
  </style>
</head>
<body>
  <header><h1>Storefront</h1></header>
  <div class="grid">{cards}
  </div>
</body>
</html>"#
    )
}
