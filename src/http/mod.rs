//! HTTP utilities module
//!
//! Response builders, MIME detection, and cache control shared by the
//! storefront handlers.

pub mod cache;
pub mod mime;
pub mod response;

// Re-export commonly used builders
pub use response::{
    build_304_response, build_404_response, build_405_response, build_413_response,
    build_health_response, build_html_response, build_options_response, build_redirect_response,
};
