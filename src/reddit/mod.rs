pub mod client;
pub mod errors;
pub mod source;
pub mod types;

pub use client::RedditClient;
pub use errors::RedditError;
#[cfg(test)]
pub use source::MockPostSource;
pub use source::PostSource;
pub use types::RedditConfig;
