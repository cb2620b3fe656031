//! WXR document assembly.
//!
//! Produces an RSS 2.0 document with the WordPress export namespaces. The
//! whole tree is serialized in memory; callers write it out in one
//! operation. No validation is performed against the declared WXR version.

use anyhow::{Context, Result};
use chrono::Utc;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Cursor;

use super::slug::slugify;

const WXR_VERSION: &str = "1.2";

const NAMESPACES: &[(&str, &str)] = &[
    ("xmlns:excerpt", "http://wordpress.org/export/1.2/excerpt/"),
    ("xmlns:content", "http://purl.org/rss/1.0/modules/content/"),
    ("xmlns:wfw", "http://wellformedweb.org/CommentAPI/"),
    ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
    ("xmlns:wp", "http://wordpress.org/export/1.2/"),
];

/// A generated post ready for export. Immutable once built.
#[derive(Debug, Clone)]
pub struct Post {
    pub id: u32,
    pub title: String,
    pub content: String,
    pub guid: String,
}

pub struct WxrBuilder {
    site_title: String,
    site_url: String,
    posts: Vec<Post>,
}

impl WxrBuilder {
    pub fn new(site_title: impl Into<String>, site_url: impl Into<String>) -> Self {
        Self {
            site_title: site_title.into(),
            site_url: site_url.into(),
            posts: Vec::new(),
        }
    }

    pub fn posts(mut self, posts: Vec<Post>) -> Self {
        self.posts = posts;
        self
    }

    /// Serialize the export document. pubDate is the build instant for
    /// every item, not the original page's publish date.
    pub fn build(&self) -> Result<String> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let mut rss = BytesStart::new("rss");
        rss.push_attribute(("version", "2.0"));
        for (name, uri) in NAMESPACES {
            rss.push_attribute((*name, *uri));
        }
        writer.write_event(Event::Start(rss))?;

        writer.write_event(Event::Start(BytesStart::new("channel")))?;
        text_element(&mut writer, "title", &self.site_title)?;
        text_element(&mut writer, "link", &self.site_url)?;
        text_element(
            &mut writer,
            "description",
            &format!("Import generated posts for {}", self.site_title),
        )?;
        text_element(&mut writer, "wp:wxr_version", WXR_VERSION)?;

        writer.write_event(Event::Start(BytesStart::new("wp:author")))?;
        text_element(&mut writer, "wp:author_id", "1")?;
        text_element(&mut writer, "wp:author_login", "admin")?;
        writer.write_event(Event::End(BytesEnd::new("wp:author")))?;

        let pub_date = Utc::now().format("%a, %d %b %Y %H:%M:%S +0000").to_string();
        let base = self.site_url.trim_end_matches('/');

        for post in &self.posts {
            writer.write_event(Event::Start(BytesStart::new("item")))?;

            text_element(&mut writer, "title", &post.title)?;
            text_element(
                &mut writer,
                "link",
                &format!("{}/{}/", base, slugify(&post.title)),
            )?;
            text_element(&mut writer, "pubDate", &pub_date)?;
            text_element(&mut writer, "dc:creator", "admin")?;

            let mut guid = BytesStart::new("guid");
            guid.push_attribute(("isPermaLink", "false"));
            writer.write_event(Event::Start(guid))?;
            writer.write_event(Event::Text(BytesText::new(&post.guid)))?;
            writer.write_event(Event::End(BytesEnd::new("guid")))?;

            text_element(&mut writer, "description", "Generated with GPT-4o")?;

            writer.write_event(Event::Start(BytesStart::new("content:encoded")))?;
            writer.write_event(Event::CData(BytesCData::new(post.content.as_str())))?;
            writer.write_event(Event::End(BytesEnd::new("content:encoded")))?;

            text_element(&mut writer, "wp:post_id", &post.id.to_string())?;
            text_element(&mut writer, "wp:post_type", "post")?;
            text_element(&mut writer, "wp:status", "publish")?;

            writer.write_event(Event::End(BytesEnd::new("item")))?;
        }

        writer.write_event(Event::End(BytesEnd::new("channel")))?;
        writer.write_event(Event::End(BytesEnd::new("rss")))?;

        let bytes = writer.into_inner().into_inner();
        String::from_utf8(bytes).context("WXR output was not valid UTF-8")
    }
}

fn text_element<W: std::io::Write>(writer: &mut Writer<W>, name: &str, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}
