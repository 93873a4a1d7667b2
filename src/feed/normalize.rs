use super::recap;
use super::schema::{Field, FieldRule, ImageCandidate, ItemPolicy, ItemScope, Lookup, SourceSchema};
use super::types::{ArticleRecord, FeedError};
use super::xml::{self, non_empty_text, Element, Tag};

const CHANNEL: Tag = Tag::plain("channel");
const ITEM: Tag = Tag::plain("item");

enum Value {
    Text(String),
    List(Vec<String>),
    Image { url: String, width: String, height: String },
}

/// Parse a raw feed body and map every item through `schema`.
///
/// A malformed document or a missing `channel` (for channel-scoped sources)
/// yields a single [`FeedError`] instead of any records.
pub fn normalize(raw: &str, schema: &SourceSchema) -> Result<Vec<ArticleRecord>, FeedError> {
    let root = xml::parse_document(raw).map_err(FeedError::parse)?;
    normalize_document(&root, schema)
}

pub fn normalize_document(root: &Element, schema: &SourceSchema) -> Result<Vec<ArticleRecord>, FeedError> {
    let items: Vec<&Element> = match schema.scope {
        ItemScope::Channel => {
            let channel = root.child(CHANNEL).ok_or_else(FeedError::missing_channel)?;
            channel.children(ITEM).collect()
        }
        ItemScope::Anywhere => root.descendants(ITEM),
    };

    let take = match schema.policy {
        ItemPolicy::All => items.len(),
        ItemPolicy::LatestOnly => 1,
    };

    Ok(items
        .into_iter()
        .take(take)
        .map(|item| normalize_item(item, schema))
        .collect())
}

pub fn normalize_item(item: &Element, schema: &SourceSchema) -> ArticleRecord {
    let mut record = ArticleRecord { guid_permalink: "false".to_string(), ..Default::default() };
    for rule in schema.rules {
        assign(&mut record, rule.field, extract(item, rule));
    }
    record.guid_is_permalink = record.guid_permalink.trim().eq_ignore_ascii_case("true");
    if schema.twitter_recap && !record.content.is_empty() {
        record.twitter_recap = recap::extract_recap_items(&record.content);
    }
    record
}

fn extract(item: &Element, rule: &FieldRule) -> Value {
    match rule.lookup {
        Lookup::Child(tag) => Value::Text(item.child_text(tag, rule.default)),
        Lookup::Descendant(tag) => Value::Text(non_empty_text(item.descendant(tag), rule.default)),
        Lookup::Deep(tag) => Value::Text(non_empty_text(item.child_or_descendant(tag), rule.default)),
        Lookup::Join(tag, sep) => {
            let parts: Vec<&str> = item
                .descendants(tag)
                .into_iter()
                .map(Element::text)
                .filter(|t| !t.is_empty())
                .collect();
            if parts.is_empty() { Value::Text(rule.default.to_string()) } else { Value::Text(parts.join(sep)) }
        }
        Lookup::All(tag) => Value::List(
            item.children(tag)
                .map(Element::text)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect(),
        ),
        Lookup::Attr { tag, attr } => Value::Text(
            item.child(tag)
                .and_then(|el| el.attr(attr))
                .unwrap_or(rule.default)
                .to_string(),
        ),
        Lookup::Image(candidates) => candidates
            .iter()
            .filter_map(|candidate| match *candidate {
                ImageCandidate::Child(tag) => item.child(tag),
                ImageCandidate::Anywhere(tag) => item.descendant(tag),
            })
            .find_map(|el| {
                el.attr("url").map(|url| Value::Image {
                    url: url.to_string(),
                    width: el.attr("width").unwrap_or_default().to_string(),
                    height: el.attr("height").unwrap_or_default().to_string(),
                })
            })
            .unwrap_or_else(|| Value::Image {
                url: rule.default.to_string(),
                width: String::new(),
                height: String::new(),
            }),
    }
}

fn assign(record: &mut ArticleRecord, field: Field, value: Value) {
    let text = match value {
        Value::Image { url, width, height } => {
            record.image_url = url;
            record.image_width = width;
            record.image_height = height;
            return;
        }
        Value::List(list) if field == Field::Categories => {
            record.categories = list;
            return;
        }
        Value::List(list) => list.join(", "),
        Value::Text(text) if field == Field::Categories => {
            record.categories = if text.is_empty() { Vec::new() } else { vec![text] };
            return;
        }
        Value::Text(text) => text,
    };

    match field {
        Field::Title => record.title = text,
        Field::Link => record.link = text,
        Field::PubDate => record.pub_date = text,
        Field::Description => record.description = text,
        Field::Author => record.author = text,
        Field::Subject => record.subject = text,
        Field::Category => record.category = text,
        Field::Guid => record.guid = text,
        Field::GuidPermalink => record.guid_permalink = text,
        Field::Id => record.id = text,
        Field::Image => record.image_url = text,
        Field::Content => record.content = text,
        Field::Categories => {}
    }
}
