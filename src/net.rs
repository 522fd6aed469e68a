//! Asset fetching.
//!
//! Exhibit images are plain static assets. The network layer resolves an exhibit's logical
//! image path against the configured asset root and fetches the bytes, either over HTTP or
//! from a local directory. Every failure is reported as a [`FetchError`] and never panics.

mod fetch;
mod response;

pub use fetch::*;
pub use response::Response;
