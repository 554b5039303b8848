//! Conversation tree construction from a flat post list

use std::collections::HashMap;

use tracing::{debug, instrument};

use crate::domain::entities::Post;

/// Reply structure of a forum, reconstructed from a flat post list.
///
/// Every non-root post appears in exactly one `replies_by_parent` bucket,
/// keyed by its `replyto` id. A post whose parent id matches no fetched post
/// stays in its bucket as an orphan; it is tolerated but never rendered as a
/// root. Source order within each bucket is preserved — sorting is the
/// renderer's job.
#[derive(Debug, Clone, Default)]
pub struct ConversationTree {
    pub roots: Vec<Post>,
    pub replies_by_parent: HashMap<String, Vec<Post>>,
}

impl ConversationTree {
    /// Partition posts into roots and per-parent reply buckets.
    ///
    /// Single linear pass; input order must not be assumed meaningful.
    /// An empty input yields an empty tree.
    #[instrument(level = "debug", skip(posts))]
    pub fn from_posts(posts: impl IntoIterator<Item = Post>) -> Self {
        let mut tree = Self::default();
        for post in posts {
            match post.replyto.clone() {
                None => tree.roots.push(post),
                Some(parent) => tree
                    .replies_by_parent
                    .entry(parent)
                    .or_default()
                    .push(post),
            }
        }
        debug!(
            roots = tree.roots.len(),
            reply_buckets = tree.replies_by_parent.len(),
            "conversation tree built"
        );
        tree
    }

    /// Direct replies to the given post, in source order.
    pub fn replies(&self, parent_id: &str) -> &[Post] {
        self.replies_by_parent
            .get(parent_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty() && self.replies_by_parent.is_empty()
    }

    /// Total number of posts held by the tree, orphans included.
    pub fn post_count(&self) -> usize {
        self.roots.len()
            + self
                .replies_by_parent
                .values()
                .map(Vec::len)
                .sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{ContentMap, Post};

    fn post(id: &str, replyto: Option<&str>) -> Post {
        Post {
            id: id.to_string(),
            forum: None,
            replyto: replyto.map(str::to_string),
            signatures: vec![],
            readers: vec![],
            writers: vec![],
            invitations: vec![],
            cdate: 0,
            mdate: None,
            content: ContentMap::new(),
        }
    }

    #[test]
    fn empty_input_yields_empty_tree() {
        let tree = ConversationTree::from_posts(vec![]);
        assert!(tree.is_empty());
        assert_eq!(tree.post_count(), 0);
    }

    #[test]
    fn partitions_roots_from_replies() {
        let tree = ConversationTree::from_posts(vec![
            post("root", None),
            post("r1", Some("root")),
            post("r2", Some("root")),
            post("r1a", Some("r1")),
        ]);
        assert_eq!(tree.roots.len(), 1);
        assert_eq!(tree.replies("root").len(), 2);
        assert_eq!(tree.replies("r1").len(), 1);
        assert_eq!(tree.post_count(), 4);
    }

    #[test]
    fn orphan_reply_is_kept_in_its_bucket() {
        let tree = ConversationTree::from_posts(vec![
            post("root", None),
            post("stray", Some("deleted-post")),
        ]);
        assert_eq!(tree.roots.len(), 1);
        assert_eq!(tree.replies("deleted-post").len(), 1);
        assert!(tree.replies("root").is_empty());
    }
}
