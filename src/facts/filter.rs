use crate::facts::model::RawPost;

pub const MAX_TITLE_CHARS: usize = 300;
pub const MIN_SCORE: i64 = 10;

pub fn accept(post: &RawPost) -> bool {
    // Never surface explicit posts, whatever their score
    if post.is_explicit {
        return false;
    }

    // Overlong titles are usually rants, not facts
    if post.title.chars().count() > MAX_TITLE_CHARS {
        return false;
    }

    post.score >= MIN_SCORE
}
