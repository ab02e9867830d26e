use async_trait::async_trait;

use crate::facts::RawPost;
use crate::reddit::RedditError;

/// Supplies the newest posts of a community, in the order the service returns them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostSource: Send + Sync {
    async fn fetch_posts(&self, subreddit: &str, limit: u32) -> Result<Vec<RawPost>, RedditError>;
}
