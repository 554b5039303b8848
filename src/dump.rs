//! Raw note structure dump for inspection
//!
//! Writes every fetched record with all its metadata, one section per note.
//! Useful when a forum renders oddly and the classification needs checking
//! against the raw content keys.

use std::io::{self, Write};

use itertools::Itertools;

use crate::domain::Post;

const SECTION_RULE_LEN: usize = 50;

/// Write one annotated section per post to `sink`, in fetch order.
pub fn write_note_structure<W: Write>(posts: &[Post], sink: &mut W) -> io::Result<()> {
    for (index, post) in posts.iter().enumerate() {
        writeln!(sink, "=== Note {} ===", index + 1)?;
        writeln!(sink, "ID: {}", post.id)?;
        writeln!(sink, "Forum: {}", post.forum.as_deref().unwrap_or("-"))?;
        writeln!(sink, "ReplyTo: {}", post.replyto.as_deref().unwrap_or("-"))?;
        writeln!(sink, "Signatures: {:?}", post.signatures)?;
        writeln!(sink, "Readers: {:?}", post.readers)?;
        writeln!(sink, "Writers: {:?}", post.writers)?;
        writeln!(sink, "Invitations: {:?}", post.invitations)?;
        writeln!(sink, "CDate: {}", post.cdate)?;
        match post.mdate {
            Some(mdate) => writeln!(sink, "MDate: {}", mdate)?,
            None => writeln!(sink, "MDate: -")?,
        }
        writeln!(
            sink,
            "Content Keys: [{}]",
            post.content.keys().join(", ")
        )?;
        let content_json = serde_json::to_string(&post.content).map_err(io::Error::other)?;
        writeln!(sink, "Content: {}", content_json)?;
        writeln!(sink, "\n{}\n", "=".repeat(SECTION_RULE_LEN))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ContentValue, Post};

    fn post(id: &str) -> Post {
        Post {
            id: id.to_string(),
            forum: Some("forum1".into()),
            replyto: None,
            signatures: vec!["~Reviewer1".into()],
            readers: vec!["everyone".into()],
            writers: vec![],
            invitations: vec![],
            cdate: 42,
            mdate: None,
            content: [("comment".to_string(), ContentValue::text("hello"))]
                .into_iter()
                .collect(),
        }
    }

    #[test]
    fn writes_one_section_per_note() {
        let posts = vec![post("a"), post("b")];
        let mut sink = Vec::new();
        write_note_structure(&posts, &mut sink).unwrap();
        let output = String::from_utf8(sink).unwrap();

        assert!(output.contains("=== Note 1 ==="));
        assert!(output.contains("=== Note 2 ==="));
        assert!(output.contains("ID: a"));
        assert!(output.contains("Content Keys: [comment]"));
        assert!(output.contains(r#""value":"hello""#));
    }

    #[test]
    fn empty_post_list_writes_nothing() {
        let mut sink = Vec::new();
        write_note_structure(&[], &mut sink).unwrap();
        assert!(sink.is_empty());
    }
}
