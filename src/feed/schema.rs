//! Declarative description of how a source's items map onto [`ArticleRecord`]
//! fields and how a record is laid out for display.
//!
//! [`ArticleRecord`]: super::types::ArticleRecord

use super::xml::Tag;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Link,
    PubDate,
    Description,
    Author,
    Subject,
    Categories,
    Category,
    Guid,
    GuidPermalink,
    Id,
    /// Fills url, width and height together.
    Image,
    Content,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// Text of the first direct child.
    Child(Tag),
    /// Text of the first element anywhere below the item.
    Descendant(Tag),
    /// Direct child, falling back to any deeper element.
    Deep(Tag),
    /// Non-empty texts of every matching element below the item, joined.
    Join(Tag, &'static str),
    /// Non-empty texts of every matching direct child, kept as a list.
    All(Tag),
    /// An attribute of the first direct child.
    Attr { tag: Tag, attr: &'static str },
    /// First candidate in priority order whose element carries a `url` attribute.
    Image(&'static [ImageCandidate]),
}

/// Where an image element is looked for relative to the item. Only the first
/// matching element of each candidate is considered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageCandidate {
    Child(Tag),
    Anywhere(Tag),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub field: Field,
    pub lookup: Lookup,
    pub default: &'static str,
}

impl FieldRule {
    pub const fn new(field: Field, lookup: Lookup, default: &'static str) -> Self {
        Self { field, lookup, default }
    }
}

/// Where items are enumerated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemScope {
    /// `item` children of a required top-level `channel`.
    Channel,
    /// Any `item` element in the document.
    Anywhere,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemPolicy {
    All,
    /// Keep only the first item in document order.
    LatestOnly,
}

/// One piece of the display template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    /// `Label: value` line, always present.
    Line(&'static str, Field),
    /// `Label: value` line, only when the value is non-empty.
    Optional(&'static str, Field),
    /// Blank line then the value on its own line.
    Body(Field),
    /// Twitter recap entries, preceded by a blank gap.
    Recap,
    /// `\nLabel: a, b` at the very end, only when the list is non-empty.
    TrailingList(&'static str, Field),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceSchema {
    pub scope: ItemScope,
    pub policy: ItemPolicy,
    pub rules: &'static [FieldRule],
    /// Derive recap items from the extracted `content` field.
    pub twitter_recap: bool,
    pub layout: &'static [Segment],
}
