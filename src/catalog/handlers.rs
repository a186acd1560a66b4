//! Catalog API handlers
//!
//! The product lookup: parse the path parameter as an integer and scan the
//! static catalog for the first entry with that id.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

use super::product::Catalog;
use super::response;

/// Handle `GET /api/products/:id`
///
/// A parameter that fails integer parsing matches nothing and is reported
/// the same way as an absent id: 404 with a JSON error body.
pub fn handle_product_get(catalog: &Catalog, raw_id: &str, is_head: bool) -> Response<Full<Bytes>> {
    let Ok(id) = raw_id.parse::<u32>() else {
        return response::product_not_found(raw_id);
    };

    match catalog.find(id) {
        Some(product) => response::json_response(StatusCode::OK, product, is_head),
        None => response::product_not_found(raw_id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(resp: Response<Full<Bytes>>) -> serde_json::Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_get_present_id_returns_exact_record() {
        let catalog = Catalog::builtin();
        let resp = handle_product_get(&catalog, "1", false);
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("Content-Type").unwrap(),
            "application/json"
        );

        let body = body_json(resp).await;
        assert_eq!(body["id"], 1);
        assert_eq!(body["name"], "Product 1");
        assert_eq!(body["description"], "This is product 1");
        assert_eq!(body["price"], 10.0);
        assert_eq!(body["properties"]["color"], "red");
        assert_eq!(body["properties"]["size"], "M");
        assert_eq!(body["properties"]["category"], "clothing");
        assert_eq!(body["image"], "https://via.placeholder.com/150");
    }

    #[tokio::test]
    async fn test_get_every_catalog_id() {
        let catalog = Catalog::builtin();
        for product in catalog.products() {
            let resp = handle_product_get(&catalog, &product.id.to_string(), false);
            assert_eq!(resp.status(), StatusCode::OK);
            let body = body_json(resp).await;
            assert_eq!(body, serde_json::to_value(product).unwrap());
        }
    }

    #[tokio::test]
    async fn test_get_absent_id() {
        let catalog = Catalog::builtin();
        let resp = handle_product_get(&catalog, "999", false);
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body = body_json(resp).await;
        assert_eq!(body["error"], "Not Found");
    }

    #[tokio::test]
    async fn test_get_non_numeric_id() {
        let catalog = Catalog::builtin();
        let resp = handle_product_get(&catalog, "abc", false);
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body = body_json(resp).await;
        assert_eq!(body["error"], "Not Found");
    }

    #[test]
    fn test_head_has_empty_body() {
        let catalog = Catalog::builtin();
        let resp = handle_product_get(&catalog, "1", true);
        assert_eq!(resp.status(), StatusCode::OK);
        // Content-Length still reflects the full representation
        let len: usize = resp
            .headers()
            .get("Content-Length")
            .unwrap()
            .to_str()
            .unwrap()
            .parse()
            .unwrap();
        assert!(len > 0);
    }
}
