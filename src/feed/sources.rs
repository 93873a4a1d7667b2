use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::schema::{Field, FieldRule, ImageCandidate, ItemPolicy, ItemScope, Lookup, Segment, SourceSchema};
use super::xml::{ns, Tag};

const TITLE: Tag = Tag::plain("title");
const LINK: Tag = Tag::plain("link");
const PUB_DATE: Tag = Tag::plain("pubDate");
const DESCRIPTION: Tag = Tag::plain("description");
const GUID: Tag = Tag::plain("guid");
const CATEGORY: Tag = Tag::plain("category");
const ID: Tag = Tag::plain("id");
const ENCLOSURE: Tag = Tag::plain("enclosure");
const DC_CREATOR: Tag = Tag::qualified(ns::DUBLIN_CORE, "creator");
const DC_SUBJECT: Tag = Tag::qualified(ns::DUBLIN_CORE, "subject");
const MEDIA_CONTENT: Tag = Tag::qualified(ns::MEDIA_RSS, "content");
const MEDIA_THUMBNAIL: Tag = Tag::qualified(ns::MEDIA_RSS, "thumbnail");
const CONTENT_ENCODED: Tag = Tag::qualified(ns::CONTENT, "encoded");

const fn child(field: Field, tag: Tag, default: &'static str) -> FieldRule {
    FieldRule::new(field, Lookup::Child(tag), default)
}

const BASE: [FieldRule; 4] = [
    child(Field::Title, TITLE, "No title"),
    child(Field::Link, LINK, ""),
    child(Field::Description, DESCRIPTION, "No description"),
    child(Field::PubDate, PUB_DATE, ""),
];

const HN_RULES: &[FieldRule] = &BASE;

const TC_RULES: &[FieldRule] = &[
    BASE[0], BASE[1], BASE[2], BASE[3],
    FieldRule::new(Field::Author, Lookup::Descendant(DC_CREATOR), ""),
    child(Field::Guid, GUID, ""),
    FieldRule::new(Field::GuidPermalink, Lookup::Attr { tag: GUID, attr: "isPermaLink" }, "false"),
    FieldRule::new(Field::Categories, Lookup::All(CATEGORY), ""),
];

const WSJ_RULES: &[FieldRule] = &[
    BASE[0], BASE[1], BASE[2], BASE[3],
    FieldRule::new(Field::Author, Lookup::Join(DC_CREATOR, ", "), ""),
    FieldRule::new(Field::Guid, Lookup::Deep(GUID), ""),
    FieldRule::new(Field::Category, Lookup::Deep(CATEGORY), ""),
    FieldRule::new(Field::Id, Lookup::Deep(ID), ""),
    FieldRule::new(Field::Image, Lookup::Image(&[
        ImageCandidate::Anywhere(MEDIA_CONTENT),
        ImageCandidate::Anywhere(MEDIA_THUMBNAIL),
        ImageCandidate::Child(ENCLOSURE),
    ]), ""),
];

const WIRED_RULES: &[FieldRule] = &[
    BASE[0], BASE[1], BASE[2], BASE[3],
    child(Field::Guid, GUID, ""),
    FieldRule::new(Field::Author, Lookup::Descendant(DC_CREATOR), ""),
    FieldRule::new(Field::Subject, Lookup::Descendant(DC_SUBJECT), ""),
    FieldRule::new(Field::Categories, Lookup::All(CATEGORY), ""),
    FieldRule::new(Field::Image, Lookup::Image(&[ImageCandidate::Anywhere(MEDIA_THUMBNAIL)]), ""),
];

const AINEWS_RULES: &[FieldRule] = &[
    BASE[0], BASE[1], BASE[2], BASE[3],
    FieldRule::new(Field::Content, Lookup::Descendant(CONTENT_ENCODED), ""),
    FieldRule::new(Field::Categories, Lookup::All(CATEGORY), ""),
];

const HN_LAYOUT: &[Segment] = &[
    Segment::Line("Title", Field::Title),
    Segment::Line("Link", Field::Link),
    Segment::Line("Published", Field::PubDate),
];

const TC_LAYOUT: &[Segment] = &[
    Segment::Line("Title", Field::Title),
    Segment::Line("Link", Field::Link),
    Segment::Optional("Author", Field::Author),
    Segment::Line("Published", Field::PubDate),
    Segment::Optional("Categories", Field::Categories),
    Segment::Body(Field::Description),
];

const WSJ_LAYOUT: &[Segment] = &[
    Segment::Line("Title", Field::Title),
    Segment::Line("Link", Field::Link),
    Segment::Optional("Author", Field::Author),
    Segment::Line("Published", Field::PubDate),
    Segment::Body(Field::Description),
];

const WIRED_LAYOUT: &[Segment] = &[
    Segment::Line("Title", Field::Title),
    Segment::Line("Link", Field::Link),
    Segment::Optional("Author", Field::Author),
    Segment::Optional("Subject", Field::Subject),
    Segment::Line("Published", Field::PubDate),
    Segment::Optional("Categories", Field::Categories),
    Segment::Body(Field::Description),
];

const AINEWS_LAYOUT: &[Segment] = &[
    Segment::Line("Title", Field::Title),
    Segment::Line("Link", Field::Link),
    Segment::Line("Description", Field::Description),
    Segment::Line("Published", Field::PubDate),
    Segment::Recap,
    Segment::TrailingList("Categories", Field::Categories),
];

static HN_SCHEMA: SourceSchema = SourceSchema {
    scope: ItemScope::Anywhere,
    policy: ItemPolicy::All,
    rules: HN_RULES,
    twitter_recap: false,
    layout: HN_LAYOUT,
};

static TC_SCHEMA: SourceSchema = SourceSchema {
    scope: ItemScope::Channel,
    policy: ItemPolicy::All,
    rules: TC_RULES,
    twitter_recap: false,
    layout: TC_LAYOUT,
};

static WSJ_SCHEMA: SourceSchema = SourceSchema {
    scope: ItemScope::Channel,
    policy: ItemPolicy::All,
    rules: WSJ_RULES,
    twitter_recap: false,
    layout: WSJ_LAYOUT,
};

static WIRED_SCHEMA: SourceSchema = SourceSchema {
    scope: ItemScope::Channel,
    policy: ItemPolicy::All,
    rules: WIRED_RULES,
    twitter_recap: false,
    layout: WIRED_LAYOUT,
};

static AINEWS_SCHEMA: SourceSchema = SourceSchema {
    scope: ItemScope::Anywhere,
    policy: ItemPolicy::LatestOnly,
    rules: AINEWS_RULES,
    twitter_recap: true,
    layout: AINEWS_LAYOUT,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    HackerNews,
    TechCrunch,
    Wired,
    AiNews,
    Wsj,
}

impl Source {
    pub const ALL: [Source; 5] = [Source::HackerNews, Source::TechCrunch, Source::Wired, Source::AiNews, Source::Wsj];

    pub fn slug(self) -> &'static str {
        match self {
            Source::HackerNews => "hackernews",
            Source::TechCrunch => "techcrunch",
            Source::Wired => "wired",
            Source::AiNews => "ainews",
            Source::Wsj => "wsj",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Source::HackerNews => "Hacker News",
            Source::TechCrunch => "TechCrunch",
            Source::Wired => "Wired",
            Source::AiNews => "AI News",
            Source::Wsj => "Wall Street Journal",
        }
    }

    pub fn default_url(self) -> &'static str {
        match self {
            Source::HackerNews => "https://news.ycombinator.com/rss",
            Source::TechCrunch => "https://techcrunch.com/feed/",
            Source::Wired => "https://www.wired.com/feed/tag/ai/latest/rss",
            Source::AiNews => "https://news.smol.ai/rss.xml",
            Source::Wsj => "https://feeds.content.dowjones.io/public/rss/RSSWSJD",
        }
    }

    pub fn user_agent(self) -> &'static str {
        match self {
            Source::HackerNews => "hackernews-reader/1.0",
            Source::TechCrunch => "techcrunch-reader/1.0",
            Source::Wired => "wired-reader/1.0",
            Source::AiNews => "ainews-reader/1.0",
            Source::Wsj => "wsj-reader/1.0",
        }
    }

    pub fn schema(self) -> &'static SourceSchema {
        match self {
            Source::HackerNews => &HN_SCHEMA,
            Source::TechCrunch => &TC_SCHEMA,
            Source::Wired => &WIRED_SCHEMA,
            Source::AiNews => &AINEWS_SCHEMA,
            Source::Wsj => &WSJ_SCHEMA,
        }
    }

    pub fn layout(self) -> &'static [Segment] {
        self.schema().layout
    }

    pub fn latest_only(self) -> bool {
        self.schema().policy == ItemPolicy::LatestOnly
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Source {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Source::ALL
            .into_iter()
            .find(|src| src.slug().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown source: {s}"))
    }
}
