//! Market page fetching and row extraction for crypts.
//!
//! Retrieves the market page over HTTP and turns its primary table into
//! ordered `RawAssetRecord`s.

pub mod error;
pub mod extractor;
pub mod fetcher;

pub use error::{AssetField, FetchError, FetchResult, ParseError, ParseResult};
pub use extractor::{ExtractorLayout, RowExtractor};
pub use fetcher::{
    BoxFuture, FetcherConfig, HttpFetcher, MockPageSource, PageSource, DEFAULT_URL,
};
