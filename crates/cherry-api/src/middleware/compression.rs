//! Response compression layer.

use tower_http::compression::CompressionLayer;
use tower_http::compression::predicate::{And, NotForContentType, Predicate, SizeAbove};

/// Bodies smaller than this are sent as-is.
const MIN_COMPRESS_BYTES: u16 = 1024;

/// Builds a gzip layer for JSON bodies. Avatar images are already compressed.
pub fn build_compression_layer() -> CompressionLayer<And<SizeAbove, NotForContentType>> {
    CompressionLayer::new()
        .gzip(true)
        .compress_when(SizeAbove::new(MIN_COMPRESS_BYTES).and(NotForContentType::IMAGES))
}
