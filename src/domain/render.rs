//! Indented transcript rendering of a conversation tree
//!
//! Sort rules differ by depth: roots put the paper first and the rest
//! newest-first, direct replies lead with decisions and meta reviews, and
//! deeper levels read chronologically.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::io::{self, Write};

use chrono::DateTime;
use tracing::instrument;

use crate::domain::builder::ConversationTree;
use crate::domain::classify::{classify, Category};
use crate::domain::entities::{text_value, ContentMap, Post};

/// Maximum number of characters taken from a content field for the excerpt.
const EXCERPT_LEN: usize = 100;

/// Indentation per reply level.
const INDENT: &str = "  ";

/// Build the conversation tree for `posts` and render it to `sink`.
///
/// The single entry point for callers that hold a flat post list. Rendering
/// is deterministic: the same posts produce byte-identical output.
#[instrument(level = "debug", skip_all)]
pub fn render_conversation<W: Write>(posts: Vec<Post>, sink: &mut W) -> io::Result<()> {
    let tree = ConversationTree::from_posts(posts);
    render_tree(&tree, sink)
}

/// Render an already-built tree. An empty tree produces empty output.
pub fn render_tree<W: Write>(tree: &ConversationTree, sink: &mut W) -> io::Result<()> {
    for root in order_roots(&tree.roots) {
        write_root_block(root, sink)?;
        render_replies(tree.replies(&root.id), &tree.replies_by_parent, sink, 1)?;
    }
    Ok(())
}

/// Root order: papers first in first-seen order (there should be at most
/// one), then everything else newest-first with stable tie-breaks.
fn order_roots(roots: &[Post]) -> Vec<&Post> {
    let mut papers = Vec::new();
    let mut reviews = Vec::new();
    let mut others = Vec::new();

    for root in roots {
        match classify(&root.content) {
            Category::Paper => papers.push(root),
            Category::OfficialReview => reviews.push(root),
            _ => others.push(root),
        }
    }

    let mut rest: Vec<&Post> = others.into_iter().chain(reviews).collect();
    rest.sort_by_key(|post| Reverse(post.cdate));

    papers.into_iter().chain(rest).collect()
}

/// Direct replies to a root: decisions and meta reviews lead (newest first),
/// then all remaining replies, official reviews included, newest first.
fn order_level_one(replies: &[Post]) -> Vec<&Post> {
    let (mut reviews, mut others): (Vec<&Post>, Vec<&Post>) = replies
        .iter()
        .partition(|reply| classify(&reply.content) == Category::OfficialReview);
    reviews.sort_by_key(|post| Reverse(post.cdate));
    others.sort_by_key(|post| Reverse(post.cdate));

    let (leaders, remainder): (Vec<&Post>, Vec<&Post>) = others.into_iter().partition(|reply| {
        matches!(
            classify(&reply.content),
            Category::Decision | Category::MetaReview
        )
    });

    let mut rest: Vec<&Post> = remainder.into_iter().chain(reviews).collect();
    rest.sort_by_key(|post| Reverse(post.cdate));

    leaders.into_iter().chain(rest).collect()
}

/// Nested discussion reads oldest-first.
fn order_chronological(replies: &[Post]) -> Vec<&Post> {
    let mut ordered: Vec<&Post> = replies.iter().collect();
    ordered.sort_by_key(|post| post.cdate);
    ordered
}

fn render_replies<W: Write>(
    replies: &[Post],
    all_replies: &HashMap<String, Vec<Post>>,
    sink: &mut W,
    level: usize,
) -> io::Result<()> {
    let ordered = if level == 1 {
        order_level_one(replies)
    } else {
        order_chronological(replies)
    };

    for reply in ordered {
        write_reply_block(reply, sink, level)?;
        if let Some(children) = all_replies.get(&reply.id) {
            render_replies(children, all_replies, sink, level + 1)?;
        }
    }
    Ok(())
}

fn write_root_block<W: Write>(post: &Post, sink: &mut W) -> io::Result<()> {
    writeln!(sink, "[{}] {}", classify(&post.content), post.signature())?;
    writeln!(sink, "ID: {}", post.id)?;
    let summary = excerpt(&post.content, &["title", "comment", "review"]);
    if !summary.is_empty() {
        writeln!(sink, "Content: {}...", summary)?;
    }
    writeln!(sink, "Created: {}", format_created(post.cdate))?;
    writeln!(sink)
}

fn write_reply_block<W: Write>(post: &Post, sink: &mut W, level: usize) -> io::Result<()> {
    let indent = INDENT.repeat(level);
    writeln!(
        sink,
        "{indent}↳ [{}] {}",
        classify(&post.content),
        post.signature()
    )?;
    writeln!(sink, "{indent}  ID: {}", post.id)?;
    // No review fallback at reply depth.
    let summary = excerpt(&post.content, &["title", "comment"]);
    if !summary.is_empty() {
        writeln!(sink, "{indent}  Content: {}...", summary)?;
    }
    writeln!(sink, "{indent}  Created: {}", format_created(post.cdate))?;
    writeln!(sink)
}

/// First [`EXCERPT_LEN`] characters of the first present field, in priority
/// order. Empty string when none of the fields is present.
fn excerpt(content: &ContentMap, fields: &[&str]) -> String {
    fields
        .iter()
        .find_map(|name| text_value(content, name))
        .map(|text| text.chars().take(EXCERPT_LEN).collect())
        .unwrap_or_default()
}

/// Raw millisecond timestamp plus a readable UTC rendering when it parses.
fn format_created(cdate: i64) -> String {
    match DateTime::from_timestamp_millis(cdate) {
        Some(ts) => format!("{} ({})", cdate, ts.format("%Y-%m-%d %H:%M UTC")),
        None => cdate.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ContentValue;

    fn post(id: &str, replyto: Option<&str>, cdate: i64, fields: &[(&str, &str)]) -> Post {
        Post {
            id: id.to_string(),
            forum: None,
            replyto: replyto.map(str::to_string),
            signatures: vec![format!("~{id}")],
            readers: vec![],
            writers: vec![],
            invitations: vec![],
            cdate,
            mdate: None,
            content: fields
                .iter()
                .map(|(name, value)| (name.to_string(), ContentValue::text(*value)))
                .collect(),
        }
    }

    fn rendered_ids(output: &str) -> Vec<String> {
        output
            .lines()
            .filter_map(|line| line.trim_start().strip_prefix("ID: "))
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn empty_post_list_renders_nothing() {
        let mut sink = Vec::new();
        render_conversation(vec![], &mut sink).unwrap();
        assert!(sink.is_empty());
    }

    #[test]
    fn paper_leads_then_newest_first() {
        let posts = vec![
            post(
                "paper",
                None,
                1,
                &[("title", "t"), ("authors", "a"), ("abstract", "x")],
            ),
            post("review", None, 5, &[("review", "r")]),
            post("comment", None, 10, &[("comment", "c")]),
        ];
        let mut sink = Vec::new();
        render_conversation(posts, &mut sink).unwrap();
        let output = String::from_utf8(sink).unwrap();
        assert_eq!(rendered_ids(&output), vec!["paper", "comment", "review"]);
    }

    #[test]
    fn excerpt_is_capped_at_hundred_chars() {
        let long_title = "x".repeat(150);
        let posts = vec![post("p", None, 1, &[("title", &long_title)])];
        let mut sink = Vec::new();
        render_conversation(posts, &mut sink).unwrap();
        let output = String::from_utf8(sink).unwrap();
        let line = output
            .lines()
            .find(|line| line.starts_with("Content: "))
            .unwrap();
        assert_eq!(line, format!("Content: {}...", "x".repeat(100)));
    }

    #[test]
    fn missing_excerpt_fields_omit_content_line() {
        let posts = vec![post("p", None, 1, &[("keywords", "k")])];
        let mut sink = Vec::new();
        render_conversation(posts, &mut sink).unwrap();
        let output = String::from_utf8(sink).unwrap();
        assert!(!output.contains("Content:"));
        assert!(output.contains("[Other]"));
    }

    #[test]
    fn root_uses_review_fallback_but_reply_does_not() {
        let posts = vec![
            post("root", None, 1, &[("review", "root review text")]),
            post("child", Some("root"), 2, &[("review", "nested review")]),
        ];
        let mut sink = Vec::new();
        render_conversation(posts, &mut sink).unwrap();
        let output = String::from_utf8(sink).unwrap();
        assert!(output.contains("Content: root review text..."));
        assert!(!output.contains("nested review"));
    }
}
