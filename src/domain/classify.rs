//! Post classification from declared content fields

use std::fmt;

use crate::domain::entities::{text_value, ContentMap};

/// Classification tag assigned to a post based on which content fields it
/// carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Paper,
    Decision,
    MetaReview,
    OfficialReview,
    AuthorResponse,
    Comment,
    Other,
    Unknown,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Category::Paper => "Paper",
            Category::Decision => "Decision",
            Category::MetaReview => "Meta Review",
            Category::OfficialReview => "Official Review",
            Category::AuthorResponse => "Author Response",
            Category::Comment => "Comment",
            Category::Other => "Other",
            Category::Unknown => "Unknown",
        };
        f.write_str(tag)
    }
}

type Predicate = fn(&ContentMap) -> bool;

/// Classification rules in precedence order. First match wins; the explicit
/// ordering is what makes precedence testable in isolation.
const RULES: [(Predicate, Category); 6] = [
    (is_paper, Category::Paper),
    (is_decision, Category::Decision),
    (is_metareview, Category::MetaReview),
    (is_official_review, Category::OfficialReview),
    (is_author_response, Category::AuthorResponse),
    (is_comment, Category::Comment),
];

/// Classify a post by its content fields.
///
/// Pure and total: every field combination maps to exactly one category.
/// An empty map is `Unknown`; no rule matching is `Other`.
pub fn classify(content: &ContentMap) -> Category {
    if content.is_empty() {
        return Category::Unknown;
    }
    RULES
        .iter()
        .find(|(applies, _)| applies(content))
        .map(|&(_, category)| category)
        .unwrap_or(Category::Other)
}

fn is_paper(content: &ContentMap) -> bool {
    content.contains_key("title")
        && content.contains_key("authors")
        && content.contains_key("abstract")
}

fn is_decision(content: &ContentMap) -> bool {
    content.contains_key("decision")
}

fn is_metareview(content: &ContentMap) -> bool {
    content.contains_key("metareview")
}

fn is_official_review(content: &ContentMap) -> bool {
    content.contains_key("review") || content.contains_key("rating")
}

fn is_author_response(content: &ContentMap) -> bool {
    if !(content.contains_key("title") && content.contains_key("comment")) {
        return false;
    }
    let title = text_value(content, "title").unwrap_or("").to_lowercase();
    title.contains("author") || title.contains("response")
}

// Also catches title+comment posts whose title fails the author/response
// substring test, since those fall through the rule above.
fn is_comment(content: &ContentMap) -> bool {
    content.contains_key("comment")
}
