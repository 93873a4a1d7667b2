use std::fmt::Write;

use super::schema::{Field, Segment};
use super::types::{ArticleRecord, FeedError};

pub fn format_error(err: &FeedError) -> String {
    format!("ERROR: {}", err.error)
}

/// Render one record following `layout`. The output starts with a newline
/// and each line segment ends with one.
pub fn format_article(record: &ArticleRecord, layout: &[Segment]) -> String {
    let mut out = String::from("\n");
    for segment in layout {
        match *segment {
            Segment::Line(label, field) => {
                let _ = writeln!(out, "{label}: {}", field_text(record, field));
            }
            Segment::Optional(label, field) => {
                let value = field_text(record, field);
                if !value.is_empty() {
                    let _ = writeln!(out, "{label}: {value}");
                }
            }
            Segment::Body(field) => {
                let _ = write!(out, "\n{}\n", field_text(record, field));
            }
            Segment::Recap => {
                if !record.twitter_recap.is_empty() {
                    out.push_str("\n\n");
                    for item in &record.twitter_recap {
                        let _ = write!(out, "Title: {}\nLink: {}\nDescription: {}\n\n", item.title, item.link, item.description);
                    }
                }
            }
            Segment::TrailingList(label, field) => {
                let value = field_text(record, field);
                if !value.is_empty() {
                    let _ = write!(out, "\n{label}: {value}");
                }
            }
        }
    }
    out
}

fn field_text(record: &ArticleRecord, field: Field) -> String {
    match field {
        Field::Title => record.title.clone(),
        Field::Link => record.link.clone(),
        Field::PubDate => record.pub_date.clone(),
        Field::Description => record.description.clone(),
        Field::Author => record.author.clone(),
        Field::Subject => record.subject.clone(),
        Field::Categories => record.categories.join(", "),
        Field::Category => record.category.clone(),
        Field::Guid => record.guid.clone(),
        Field::GuidPermalink => record.guid_permalink.clone(),
        Field::Id => record.id.clone(),
        Field::Image => record.image_url.clone(),
        Field::Content => record.content.clone(),
    }
}
