//! Feed content model: posts with recursively nested comment trees.
//!
//! Posts and comments are addressed by stable ids assigned at creation, so
//! references held elsewhere survive deletions and reorderings. Comment
//! replies own their children (`Vec<Comment>`); replies are only ever
//! created as children of an existing comment and never re-parented, so the
//! tree cannot contain cycles.
//!
//! Mutating operations are `pub(crate)`: the interaction controller in
//! [`crate::interactions`] is the only mutator the rest of the application
//! sees. The feed is persisted as `${CONNECTLY_HOME}/feed.json` between
//! invocations.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PostId(Uuid);

impl PostId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PostId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Stable identifier of a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommentId(Uuid);

impl CommentId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CommentId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Display identity attached to posts and comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Author {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            avatar_url: None,
            email: None,
        }
    }
}

/// A comment, with replies of the same shape at unbounded depth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub author: Author,
    pub created_at: DateTime<Utc>,
    pub content: String,
    pub likes: u32,
    #[serde(default)]
    pub replies: Vec<Comment>,
}

/// A post on the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub author: Author,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub media_urls: Vec<String>,
    pub likes: u32,
    pub shares: u32,
    /// Root-level comments in insertion order.
    #[serde(default)]
    pub comments: Vec<Comment>,
    /// UI-only: whether the comment tree is expanded.
    #[serde(default)]
    pub comments_visible: bool,
}

impl Post {
    /// Total number of comments in the tree, replies included.
    pub fn comment_count(&self) -> usize {
        fn count(comments: &[Comment]) -> usize {
            comments.len() + comments.iter().map(|c| count(&c.replies)).sum::<usize>()
        }
        count(&self.comments)
    }
}

/// Unsaved post content pending submission.
#[derive(Debug, Clone, Default)]
pub struct PostDraft {
    pub content: Option<String>,
    pub media_urls: Vec<String>,
    pub location: Option<String>,
    pub tags: Vec<String>,
}

impl PostDraft {
    /// A draft is submittable when it has body text or at least one media
    /// reference.
    fn is_empty(&self) -> bool {
        let no_text = self.content.as_deref().is_none_or(|c| c.trim().is_empty());
        no_text && self.media_urls.is_empty()
    }
}

/// Addresses the parent of a new comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentTarget {
    Post(PostId),
    Comment(CommentId),
}

/// Failures of feed operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedError {
    /// The draft has neither body text nor media.
    InvalidPost(String),
    /// The comment body is blank.
    InvalidComment(String),
    /// A referenced post or comment id did not resolve. Reported, never a
    /// crash; given correct wiring it should be unreachable.
    NotFound(String),
}

impl fmt::Display for FeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedError::InvalidPost(msg) => write!(f, "invalid post: {msg}"),
            FeedError::InvalidComment(msg) => write!(f, "invalid comment: {msg}"),
            FeedError::NotFound(msg) => write!(f, "not found: {msg}"),
        }
    }
}

impl std::error::Error for FeedError {}

/// Result type for feed operations.
pub type FeedResult<T> = std::result::Result<T, FeedError>;

/// The ordered collection of posts shown to the user.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Feed {
    posts: Vec<Post>,
}

impl Feed {
    /// Loads the feed from disk; a missing file is an empty feed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents =
            fs::read_to_string(path).with_context(|| format!("read feed from {}", path.display()))?;
        serde_json::from_str(&contents).with_context(|| format!("parse feed at {}", path.display()))
    }

    /// Saves the feed to disk.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create directory {}", parent.display()))?;
        }
        let contents = serde_json::to_string_pretty(self).context("serialize feed")?;
        fs::write(path, contents).with_context(|| format!("write feed to {}", path.display()))?;
        Ok(())
    }

    /// Posts in insertion order.
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn post_count(&self) -> usize {
        self.posts.len()
    }

    pub fn find_post(&self, id: PostId) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == id)
    }

    /// Like [`Feed::find_post`] but reports a missing id as an error.
    pub fn post(&self, id: PostId) -> FeedResult<&Post> {
        self.find_post(id)
            .ok_or_else(|| FeedError::NotFound(format!("post {id}")))
    }

    /// Appends a new post with fresh counters and a hidden comment tree.
    pub(crate) fn add_post(&mut self, author: Author, draft: PostDraft) -> FeedResult<PostId> {
        if draft.is_empty() {
            return Err(FeedError::InvalidPost(
                "a post needs body text or media".to_string(),
            ));
        }

        let id = PostId::new();
        let content = draft
            .content
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        self.posts.push(Post {
            id,
            author,
            created_at: Utc::now(),
            location: draft.location,
            tags: draft.tags,
            content,
            media_urls: draft.media_urls,
            likes: 0,
            shares: 0,
            comments: Vec::new(),
            comments_visible: false,
        });
        tracing::debug!(post = %id, "post added");
        Ok(id)
    }

    /// Appends a comment under a post or an existing comment, preserving
    /// insertion order. Depth is unbounded. A blank body is rejected before
    /// the model changes.
    pub(crate) fn add_comment(
        &mut self,
        target: CommentTarget,
        author: Author,
        content: impl Into<String>,
    ) -> FeedResult<CommentId> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(FeedError::InvalidComment(
                "a comment needs body text".to_string(),
            ));
        }
        let comment = Comment {
            id: CommentId::new(),
            author,
            created_at: Utc::now(),
            content,
            likes: 0,
            replies: Vec::new(),
        };
        let id = comment.id;

        match target {
            CommentTarget::Post(post_id) => {
                let post = self.post_mut(post_id)?;
                post.comments.push(comment);
            }
            CommentTarget::Comment(parent_id) => {
                let parent = self
                    .comment_mut(parent_id)
                    .ok_or_else(|| FeedError::NotFound(format!("comment {parent_id}")))?;
                parent.replies.push(comment);
            }
        }
        tracing::debug!(comment = %id, "comment added");
        Ok(id)
    }

    /// Flips the comment visibility of a post and returns the new state.
    /// Applying it twice restores the original state; nothing else changes.
    pub(crate) fn toggle_comments(&mut self, id: PostId) -> FeedResult<bool> {
        let post = self.post_mut(id)?;
        post.comments_visible = !post.comments_visible;
        Ok(post.comments_visible)
    }

    pub(crate) fn like_post(&mut self, id: PostId) -> FeedResult<u32> {
        let post = self.post_mut(id)?;
        post.likes = post.likes.saturating_add(1);
        Ok(post.likes)
    }

    pub(crate) fn like_comment(&mut self, id: CommentId) -> FeedResult<u32> {
        let comment = self
            .comment_mut(id)
            .ok_or_else(|| FeedError::NotFound(format!("comment {id}")))?;
        comment.likes = comment.likes.saturating_add(1);
        Ok(comment.likes)
    }

    /// Removes a post. Only the author may delete it; anyone else sees the
    /// same `NotFound` as for a missing id.
    pub(crate) fn delete_post(&mut self, id: PostId, author_name: &str) -> FeedResult<()> {
        let index = self
            .posts
            .iter()
            .position(|p| p.id == id && p.author.name == author_name)
            .ok_or_else(|| FeedError::NotFound(format!("post {id}")))?;
        self.posts.remove(index);
        tracing::debug!(post = %id, "post deleted");
        Ok(())
    }

    fn post_mut(&mut self, id: PostId) -> FeedResult<&mut Post> {
        self.posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| FeedError::NotFound(format!("post {id}")))
    }

    fn comment_mut(&mut self, id: CommentId) -> Option<&mut Comment> {
        fn find_in(comments: &mut [Comment], id: CommentId) -> Option<&mut Comment> {
            for comment in comments {
                if comment.id == id {
                    return Some(comment);
                }
                if let Some(found) = find_in(&mut comment.replies, id) {
                    return Some(found);
                }
            }
            None
        }
        self.posts
            .iter_mut()
            .find_map(|p| find_in(&mut p.comments, id))
    }
}
