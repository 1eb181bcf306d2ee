//! Information about this project.

/// The formal name of this product.
pub const PRODUCT_NAME: &str = "stdtest";

/// The version of the product, in string form.
pub const PRODUCT_VERSION: &str = env!("CARGO_PKG_VERSION");

const PRODUCT_REPO: &str = env!("CARGO_PKG_REPOSITORY");

/// Where to report issues.
pub(crate) fn get_support_str() -> String {
    std::format!("please post an issue at {PRODUCT_REPO}/issues/new")
}
