//! Tests for conversation tree construction

use orview::domain::{ConversationTree, ContentMap, Post};
use orview::util::testing;

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

fn post(id: &str, replyto: Option<&str>, cdate: i64) -> Post {
    Post {
        id: id.to_string(),
        forum: None,
        replyto: replyto.map(str::to_string),
        signatures: vec![],
        readers: vec![],
        writers: vec![],
        invitations: vec![],
        cdate,
        mdate: None,
        content: ContentMap::new(),
    }
}

#[test]
fn given_flat_posts_when_building_then_every_post_lands_in_one_place() {
    // Arrange
    let posts = vec![
        post("a", None, 1),
        post("b", Some("a"), 2),
        post("c", Some("a"), 3),
        post("d", Some("b"), 4),
        post("e", None, 5),
    ];

    // Act
    let tree = ConversationTree::from_posts(posts);

    // Assert: 2 roots, 3 replies spread over 2 buckets, nothing lost
    assert_eq!(tree.roots.len(), 2);
    assert_eq!(tree.replies("a").len(), 2);
    assert_eq!(tree.replies("b").len(), 1);
    assert_eq!(tree.post_count(), 5);
}

#[test]
fn given_shuffled_input_when_building_then_bucket_order_follows_source() {
    // Arrange: children arrive before their parent
    let posts = vec![
        post("late-reply", Some("root"), 9),
        post("early-reply", Some("root"), 1),
        post("root", None, 5),
    ];

    // Act
    let tree = ConversationTree::from_posts(posts);

    // Assert: no sorting in the builder, source order preserved
    let ids: Vec<&str> = tree.replies("root").iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["late-reply", "early-reply"]);
}

#[test]
fn given_orphan_reply_when_building_then_it_is_tolerated() {
    // Arrange
    let posts = vec![post("root", None, 1), post("stray", Some("gone"), 2)];

    // Act
    let tree = ConversationTree::from_posts(posts);

    // Assert: orphan sits in its own bucket, never a root
    assert_eq!(tree.roots.len(), 1);
    assert_eq!(tree.replies("gone").len(), 1);
    assert_eq!(tree.post_count(), 2);
}

#[test]
fn given_no_posts_when_building_then_tree_is_empty() {
    let tree = ConversationTree::from_posts(Vec::<Post>::new());
    assert!(tree.is_empty());
    assert!(tree.replies("anything").is_empty());
}
