use crate::facts::{
    filter,
    model::{FactRecord, RawPost, RetainedFields},
    normalizer,
};
use crate::reddit::PostSource;
use tracing::{debug, error, info, instrument, warn};

/// Filter, normalize and assemble a batch of posts, keeping input order.
pub fn run(posts: &[RawPost], fields: RetainedFields) -> Vec<FactRecord> {
    posts
        .iter()
        .filter(|post| filter::accept(post))
        .filter_map(|post| {
            let text = normalizer::normalize(&post.title);
            FactRecord::assemble(post, text, fields)
        })
        .collect()
}

/// Pull one batch from `source` and run it through the pipeline.
///
/// A failing source yields an empty batch; the error is logged here and never
/// returned to the caller.
#[instrument(skip(source, retained))]
pub async fn fetch_facts<S>(
    source: &S,
    subreddit: &str,
    limit: u32,
    retained: RetainedFields,
) -> Vec<FactRecord>
where
    S: PostSource + ?Sized,
{
    let posts = match source.fetch_posts(subreddit, limit).await {
        Ok(posts) => posts,
        Err(e) if e.is_fatal() => {
            error!("Failed to fetch posts from r/{}: {}", subreddit, e);
            Vec::new()
        }
        Err(e) => {
            warn!("Fetching r/{} failed, will retry next cycle: {}", subreddit, e);
            Vec::new()
        }
    };

    let facts = run(&posts, retained);
    debug!("Dropped {} of {} posts", posts.len() - facts.len(), posts.len());
    info!("Collected {} facts from r/{}", facts.len(), subreddit);

    facts
}
