//! Feed command handlers: rendering, posting, commenting, likes.

use anyhow::{Context, Result, anyhow};
use connectly_core::config::paths;
use connectly_core::feed::{Author, Comment, CommentId, CommentTarget, Feed, Post, PostId};
use connectly_core::interactions::FeedController;
use connectly_core::profile::UserProfile;
use connectly_core::routes;
use connectly_core::session::SessionStore;

pub fn show() -> Result<()> {
    let session = SessionStore::load()?;
    super::enter(routes::HOME, &session)?;

    let feed = Feed::load_from(&paths::feed_path()).context("load feed")?;
    if feed.posts().is_empty() {
        println!("The feed is empty. Run `connectly post <content>` to publish something.");
        return Ok(());
    }

    for post in feed.posts() {
        render_post(post);
    }
    Ok(())
}

pub fn post(
    content: &str,
    media: Vec<String>,
    location: Option<String>,
    tags: Vec<String>,
) -> Result<()> {
    let session = SessionStore::load()?;
    super::enter(routes::HOME, &session)?;

    let mut feed = Feed::load_from(&paths::feed_path()).context("load feed")?;
    let id = FeedController::new(&mut feed)
        .submit_post(current_author()?, content, media, location, tags)
        .context("publish post")?;
    feed.save_to(&paths::feed_path()).context("save feed")?;

    println!("Posted {id}");
    Ok(())
}

pub fn comment(post_id: &str, body: &str, reply_to: Option<&str>) -> Result<()> {
    let session = SessionStore::load()?;
    super::enter(routes::HOME, &session)?;

    let target = match reply_to {
        Some(comment_id) => CommentTarget::Comment(parse_comment_id(comment_id)?),
        None => CommentTarget::Post(parse_post_id(post_id)?),
    };

    let mut feed = Feed::load_from(&paths::feed_path()).context("load feed")?;
    let id = FeedController::new(&mut feed)
        .submit_comment(current_author()?, target, body)
        .context("publish comment")?;
    feed.save_to(&paths::feed_path()).context("save feed")?;

    println!("Commented {id}");
    Ok(())
}

pub fn toggle_comments(post_id: &str) -> Result<()> {
    let session = SessionStore::load()?;
    super::enter(routes::HOME, &session)?;

    let id = parse_post_id(post_id)?;
    let mut feed = Feed::load_from(&paths::feed_path()).context("load feed")?;
    let visible = FeedController::new(&mut feed)
        .toggle_comments(id)
        .context("toggle comments")?;
    feed.save_to(&paths::feed_path()).context("save feed")?;

    if visible {
        println!("Comments are now visible for post {id}");
    } else {
        println!("Comments are now hidden for post {id}");
    }
    Ok(())
}

pub fn like_post(post_id: &str) -> Result<()> {
    let session = SessionStore::load()?;
    super::enter(routes::HOME, &session)?;

    let id = parse_post_id(post_id)?;
    let mut feed = Feed::load_from(&paths::feed_path()).context("load feed")?;
    let likes = FeedController::new(&mut feed)
        .like_post(id)
        .context("like post")?;
    feed.save_to(&paths::feed_path()).context("save feed")?;

    println!("Post {id} now has {likes} like(s)");
    Ok(())
}

pub fn like_comment(comment_id: &str) -> Result<()> {
    let session = SessionStore::load()?;
    super::enter(routes::HOME, &session)?;

    let id = parse_comment_id(comment_id)?;
    let mut feed = Feed::load_from(&paths::feed_path()).context("load feed")?;
    let likes = FeedController::new(&mut feed)
        .like_comment(id)
        .context("like comment")?;
    feed.save_to(&paths::feed_path()).context("save feed")?;

    println!("Comment {id} now has {likes} like(s)");
    Ok(())
}

pub fn delete_post(post_id: &str) -> Result<()> {
    let session = SessionStore::load()?;
    super::enter(routes::HOME, &session)?;

    let id = parse_post_id(post_id)?;
    let author = current_author()?;
    let mut feed = Feed::load_from(&paths::feed_path()).context("load feed")?;
    FeedController::new(&mut feed)
        .delete_post(id, &author.name)
        .context("delete post")?;
    feed.save_to(&paths::feed_path()).context("save feed")?;

    println!("Deleted post {id}");
    Ok(())
}

/// Authorship for new content comes from the local profile.
fn current_author() -> Result<Author> {
    let profile = UserProfile::load_from(&paths::profile_path()).context("load profile")?;
    Ok(Author {
        name: profile.display_name().to_string(),
        avatar_url: (!profile.avatar_url.is_empty()).then(|| profile.avatar_url.clone()),
        email: (!profile.email.is_empty()).then(|| profile.email.clone()),
    })
}

fn parse_post_id(s: &str) -> Result<PostId> {
    s.parse().map_err(|_| anyhow!("'{s}' is not a valid post id"))
}

fn parse_comment_id(s: &str) -> Result<CommentId> {
    s.parse()
        .map_err(|_| anyhow!("'{s}' is not a valid comment id"))
}

fn render_post(post: &Post) {
    let when = post.created_at.format("%Y-%m-%d %H:%M");
    match &post.location {
        Some(location) => println!("{} · {when} · {location}", post.author.name),
        None => println!("{} · {when}", post.author.name),
    }
    if let Some(content) = &post.content {
        println!("{content}");
    }
    for url in &post.media_urls {
        println!("[media] {url}");
    }
    if !post.tags.is_empty() {
        let tags: Vec<String> = post.tags.iter().map(|t| format!("#{t}")).collect();
        println!("{}", tags.join(" "));
    }
    println!(
        "likes: {}  shares: {}  comments: {}",
        post.likes,
        post.shares,
        post.comment_count()
    );

    if post.comments_visible {
        for comment in &post.comments {
            render_comment(comment, 1);
        }
    } else if !post.comments.is_empty() {
        println!(
            "({} comment(s) hidden — `connectly feed --comments {}`)",
            post.comment_count(),
            post.id
        );
    }

    println!("id: {}", post.id);
    println!();
}

fn render_comment(comment: &Comment, depth: usize) {
    let indent = "  ".repeat(depth);
    println!(
        "{indent}{}: {} (likes: {}, id: {})",
        comment.author.name, comment.content, comment.likes, comment.id
    );
    for reply in &comment.replies {
        render_comment(reply, depth + 1);
    }
}
