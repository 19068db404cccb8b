//! Feed interaction controller.
//!
//! The single permitted mutator of the feed: visibility toggles, likes, and
//! list membership all go through here, so invariants are enforced in one
//! place and validation failures leave the model untouched.

use crate::feed::{Author, CommentId, CommentTarget, Feed, FeedResult, PostDraft, PostId};

/// Applies user actions to the feed model.
pub struct FeedController<'a> {
    feed: &'a mut Feed,
}

impl<'a> FeedController<'a> {
    pub fn new(feed: &'a mut Feed) -> Self {
        Self { feed }
    }

    /// Flips the comment visibility of a post; applying it twice restores
    /// the original state. Counts and comment content are unaffected.
    pub fn toggle_comments(&mut self, post: PostId) -> FeedResult<bool> {
        self.feed.toggle_comments(post)
    }

    /// Validates that the submission has body text or media, then appends
    /// it. On validation failure the model is not mutated.
    pub fn submit_post(
        &mut self,
        author: Author,
        content: &str,
        media_urls: Vec<String>,
        location: Option<String>,
        tags: Vec<String>,
    ) -> FeedResult<PostId> {
        let content = content.trim();
        let draft = PostDraft {
            content: (!content.is_empty()).then(|| content.to_string()),
            media_urls,
            location: location.filter(|l| !l.trim().is_empty()),
            tags,
        };
        self.feed.add_post(author, draft)
    }

    /// Trims the body and appends a comment under a post or an existing
    /// comment. A whitespace-only body is rejected without mutating.
    pub fn submit_comment(
        &mut self,
        author: Author,
        target: CommentTarget,
        body: &str,
    ) -> FeedResult<CommentId> {
        self.feed.add_comment(target, author, body.trim())
    }

    pub fn like_post(&mut self, post: PostId) -> FeedResult<u32> {
        self.feed.like_post(post)
    }

    pub fn like_comment(&mut self, comment: CommentId) -> FeedResult<u32> {
        self.feed.like_comment(comment)
    }

    /// Removes a post; only its author may do so.
    pub fn delete_post(&mut self, post: PostId, author_name: &str) -> FeedResult<()> {
        self.feed.delete_post(post, author_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::FeedError;

    fn author() -> Author {
        Author::named("Jane Smith")
    }

    #[test]
    fn toggle_parity_matches_call_count() {
        let mut feed = Feed::default();
        let post = FeedController::new(&mut feed)
            .submit_post(author(), "hello", Vec::new(), None, Vec::new())
            .unwrap();

        let initial = feed.post(post).unwrap().comments_visible;
        for calls in 1..=8 {
            FeedController::new(&mut feed).toggle_comments(post).unwrap();
            let expected = initial ^ (calls % 2 == 1);
            assert_eq!(feed.post(post).unwrap().comments_visible, expected);
        }
    }

    #[test]
    fn empty_submission_fails_without_mutating_the_feed() {
        let mut feed = Feed::default();
        let err = FeedController::new(&mut feed)
            .submit_post(author(), "", Vec::new(), Some(String::new()), Vec::new())
            .unwrap_err();
        assert!(matches!(err, FeedError::InvalidPost(_)));
        assert_eq!(feed.post_count(), 0);
    }

    #[test]
    fn media_only_submission_is_accepted() {
        let mut feed = Feed::default();
        let post = FeedController::new(&mut feed)
            .submit_post(
                author(),
                "  ",
                vec!["https://example.com/a.jpg".to_string()],
                None,
                Vec::new(),
            )
            .unwrap();
        let post = feed.post(post).unwrap();
        assert!(post.content.is_none());
        assert_eq!(post.media_urls.len(), 1);
    }

    #[test]
    fn whitespace_only_comment_fails_without_mutating_the_feed() {
        let mut feed = Feed::default();
        let post = FeedController::new(&mut feed)
            .submit_post(author(), "hello", Vec::new(), None, Vec::new())
            .unwrap();

        let err = FeedController::new(&mut feed)
            .submit_comment(author(), CommentTarget::Post(post), "   ")
            .unwrap_err();
        assert!(matches!(err, FeedError::InvalidComment(_)));
        assert!(feed.post(post).unwrap().comments.is_empty());
    }

    #[test]
    fn submitted_comment_lands_under_its_target() {
        let mut feed = Feed::default();
        let mut controller = FeedController::new(&mut feed);
        let post = controller
            .submit_post(author(), "hello", Vec::new(), None, Vec::new())
            .unwrap();
        let comment = controller
            .submit_comment(author(), CommentTarget::Post(post), "  great post!  ")
            .unwrap();
        controller
            .submit_comment(author(), CommentTarget::Comment(comment), "thank you!")
            .unwrap();

        let post = feed.post(post).unwrap();
        assert_eq!(post.comments[0].content, "great post!");
        assert_eq!(post.comments[0].replies[0].content, "thank you!");
    }

    #[test]
    fn likes_and_deletes_pass_through() {
        let mut feed = Feed::default();
        let mut controller = FeedController::new(&mut feed);
        let post = controller
            .submit_post(author(), "hello", Vec::new(), None, Vec::new())
            .unwrap();
        assert_eq!(controller.like_post(post).unwrap(), 1);
        controller.delete_post(post, "Jane Smith").unwrap();
        assert_eq!(feed.post_count(), 0);
    }
}
