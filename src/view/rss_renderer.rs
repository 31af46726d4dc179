use std::io::Cursor;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::{GenError, Result};
use crate::post::Metadata;
use crate::text_utils::{substitute, KeyStyle};

/* Example
<item>
  <link>https://michaelbitzos.com/#/devblog/introductions</link>
  <title>Introduction to my devblog</title>
  <description>Welcome to my blog</description>
  <author>Michael Bitzos</author>
  <guid>https://michaelbitzos.com/#/devblog/introductions</guid>
  <pubDate>Mon, 10 Oct 2022 16:42:08 +0000</pubDate>
  <category>misc</category>
</item>
*/

pub struct FeedEntry<'a> {
    pub post_name: &'a str,
    pub metadata: &'a Metadata,
}

pub struct RssFeed<'a> {
    pub home_url: &'a str,
    pub author: &'a str,
}

impl RssFeed<'_> {
    /// Puts the items into the `{{ITEMS}}` slot of the feed template.
    pub fn render(&self, template: &str, entries: &[FeedEntry]) -> Result<String> {
        let items = self.render_items(entries)?;
        Ok(substitute(template, &[("ITEMS", &items)], KeyStyle::Wrapped))
    }

    pub fn render_items(&self, entries: &[FeedEntry]) -> Result<String> {
        let mut writer = Writer::new(Cursor::new(Vec::new()));

        for entry in entries {
            let date = entry.metadata.date.ok_or_else(|| GenError::MissingDate {
                post: entry.post_name.to_string(),
            })?;
            let link = full_link(self.home_url, entry.post_name);
            self.write_item(&mut writer, &link, entry.metadata, &date.to_rfc2822())?;
        }

        let bytes = writer.into_inner().into_inner();
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn write_item(&self, writer: &mut Writer<Cursor<Vec<u8>>>, link: &str, metadata: &Metadata, pub_date: &str) -> quick_xml::Result<()> {
        // <item>
        writer.write_event(Event::Start(BytesStart::new("item")))?;

        push_text(writer, "link", link)?;
        push_text(writer, "title", &metadata.title)?;
        push_text(writer, "description", metadata.description.as_deref().unwrap_or(""))?;
        push_text(writer, "author", self.author)?;
        push_text(writer, "guid", link)?;
        push_text(writer, "pubDate", pub_date)?;
        for tag in metadata.tag_list() {
            push_text(writer, "category", &tag)?;
        }

        // </item>
        writer.write_event(Event::End(BytesEnd::new("item")))?;
        Ok(())
    }
}

fn full_link(home_url: &str, key: &str) -> String {
    if home_url.ends_with('/') {
        format!("{}{}", home_url, key)
    } else {
        format!("{}/{}", home_url, key)
    }
}

fn push_text(writer: &mut Writer<Cursor<Vec<u8>>>, tag: &str, text: &str) -> quick_xml::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}
