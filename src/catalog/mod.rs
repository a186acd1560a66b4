// Catalog module entry
// Product data and the /api/products lookup endpoint

mod handlers;
mod product;
mod response;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

pub use product::{Catalog, Product};

/// Path prefix owned by the catalog API
pub const API_PREFIX: &str = "/api/products";

/// Dispatch a request under `/api/products`
///
/// The lookup is the only endpoint; anything else under the prefix answers
/// 404 with an endpoint hint.
pub fn handle_api_request(path: &str, catalog: &Catalog, is_head: bool) -> Response<Full<Bytes>> {
    let Some(rest) = path.strip_prefix(API_PREFIX) else {
        return response::not_found();
    };
    match rest.strip_prefix('/') {
        Some(raw_id) if !raw_id.is_empty() && !raw_id.contains('/') => {
            handlers::handle_product_get(catalog, raw_id, is_head)
        }
        _ => response::not_found(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::StatusCode;

    #[test]
    fn test_dispatch_lookup() {
        let catalog = Catalog::builtin();
        let resp = handle_api_request("/api/products/2", &catalog, false);
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[test]
    fn test_dispatch_bare_prefix() {
        let catalog = Catalog::builtin();
        let resp = handle_api_request("/api/products", &catalog, false);
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let resp = handle_api_request("/api/products/", &catalog, false);
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_dispatch_extra_segment() {
        let catalog = Catalog::builtin();
        let resp = handle_api_request("/api/products/1/reviews", &catalog, false);
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
