// src/services/digest.rs

//! Digest rendering.
//!
//! Turns a [`ChangeSet`] into the HTML body of the notification mail, one
//! section per non-empty group.

use std::fmt::Write;

use url::Url;

use crate::error::{AppError, Result};
use crate::models::AnimalRecord;
use crate::pipeline::ChangeSet;
use crate::utils::{escape_html, resolve_url, title_case};

const RESERVED_COLOR: &str = "Orange";
const AVAILABLE_COLOR: &str = "Green";
const LINE_STYLE: &str = "margin-top: 0px; margin-bottom: 5px;";

/// Known "can live with other cats" values and their wording.
const CAT_SUITABILITY: &[(&str, &str)] = &[
    ("", "Unknown"),
    ("B - Not To Live With", "I prefer not to live with other cats"),
    ("A - Possibly Live With", "I may be able to live with other cats"),
];

/// Renders classified changes as an HTML document.
#[derive(Debug, Clone)]
pub struct DigestFormatter {
    site_base: Url,
}

impl DigestFormatter {
    /// Create a formatter that links records relative to `site_base_url`.
    pub fn new(site_base_url: &str) -> Result<Self> {
        let site_base = Url::parse(site_base_url).map_err(|e| {
            AppError::config(format!("invalid site base URL '{}': {}", site_base_url, e))
        })?;
        Ok(Self { site_base })
    }

    /// Subject line for the digest mail.
    pub fn subject(changes: &ChangeSet) -> &'static str {
        if changes.has_new() {
            "New cat alert!"
        } else {
            "Cat updates!"
        }
    }

    /// Render every non-empty group, in a fixed order.
    pub fn render(&self, changes: &ChangeSet) -> String {
        let sections: [(&str, &[AnimalRecord]); 5] = [
            ("New Cats", changes.new.as_slice()),
            ("Reserved Cats", changes.reserved.as_slice()),
            ("Unreserved Cats", changes.unreserved.as_slice()),
            ("Re-homed Cats", changes.rehomed.as_slice()),
            ("Removed Cats", changes.removed.as_slice()),
        ];

        let mut html = String::new();
        for (heading, records) in sections {
            self.render_section(&mut html, heading, records);
        }
        html
    }

    fn render_section(&self, html: &mut String, heading: &str, records: &[AnimalRecord]) {
        if records.is_empty() {
            return;
        }

        let _ = write!(
            html,
            r#"<h1 style="margin-bottom: 0px;">{}</h1><hr><table>"#,
            escape_html(heading)
        );
        for (i, record) in records.iter().enumerate() {
            self.render_record(html, record, i > 0);
        }
        html.push_str("</table>");
    }

    fn render_record(&self, html: &mut String, record: &AnimalRecord, spaced: bool) {
        let link = escape_html(&self.link(record));
        let name = escape_html(record.name.as_deref().unwrap_or("Unnamed"));
        let thumbnail = escape_html(record.thumbnail.as_deref().unwrap_or_default());
        let status = record.status_label();
        let color = if status == "Reserved" {
            RESERVED_COLOR
        } else {
            AVAILABLE_COLOR
        };

        let _ = write!(
            html,
            r#"<tr style="{row_style}"><td><a href="{link}"><img style="padding-right: 30px;" src="{thumbnail}" alt="{name}"></a></td><td><a href="{link}"><h1 style="margin: 0px; margin-top: 20px;">{name}</h1></a><hr style="margin-bottom: 10px;">"#,
            row_style = if spaced { "margin-top: 20px;" } else { "" },
        );

        let lines = [
            (record.age.clone().unwrap_or_default(), None),
            (status.to_string(), Some(color)),
            (record.sex.clone().unwrap_or_default(), None),
            (
                map_cat_suitability(record.cat_suitability.as_deref().unwrap_or_default()),
                None,
            ),
            (
                format!(
                    "Location: {}",
                    title_case(record.centre.as_deref().unwrap_or_default())
                ),
                None,
            ),
            (
                format!(
                    "Date added: {}",
                    record.date_published.as_deref().unwrap_or_default()
                ),
                None,
            ),
        ];

        for (text, color) in lines {
            let style = match color {
                Some(color) => format!("{} color: {};", LINE_STYLE, color),
                None => LINE_STYLE.to_string(),
            };
            let _ = write!(html, r#"<h3 style="{}">{}</h3>"#, style, escape_html(&text));
        }

        html.push_str("</td></tr>");
    }

    fn link(&self, record: &AnimalRecord) -> String {
        match record.path.as_deref() {
            Some(path) => resolve_url(&self.site_base, path),
            None => self.site_base.to_string(),
        }
    }
}

/// Word the raw "can live with other cats" value.
///
/// Unrecognized values fall back to their last `-`-delimited segment.
pub fn map_cat_suitability(raw: &str) -> String {
    CAT_SUITABILITY
        .iter()
        .find(|(key, _)| *key == raw)
        .map(|(_, wording)| wording.to_string())
        .unwrap_or_else(|| raw.rsplit('-').next().unwrap_or_default().trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formatter() -> DigestFormatter {
        DigestFormatter::new("https://www.battersea.org.uk").unwrap()
    }

    fn cat(id: &str, name: &str) -> AnimalRecord {
        let mut record = AnimalRecord::new(id);
        record.name = Some(name.to_string());
        record.path = Some(format!("/cats/{}", id));
        record.thumbnail = Some(format!("https://img.example.com/{}.jpg", id));
        record.age = Some("2 years old".to_string());
        record.sex = Some("Male".to_string());
        record.cat_suitability = Some("B - Not To Live With".to_string());
        record.centre = Some("OLD WINDSOR".to_string());
        record.date_published = Some("2026-10-01".to_string());
        record
    }

    #[test]
    fn test_suitability_lookup() {
        assert_eq!(map_cat_suitability(""), "Unknown");
        assert_eq!(
            map_cat_suitability("B - Not To Live With"),
            "I prefer not to live with other cats"
        );
        assert_eq!(
            map_cat_suitability("A - Possibly Live With"),
            "I may be able to live with other cats"
        );
    }

    #[test]
    fn test_suitability_fallback_takes_last_segment() {
        assert_eq!(map_cat_suitability("C - Must Live With "), "Must Live With");
        assert_eq!(map_cat_suitability("Prefers company"), "Prefers company");
    }

    #[test]
    fn test_empty_changes_render_nothing() {
        assert_eq!(formatter().render(&ChangeSet::default()), "");
    }

    #[test]
    fn test_only_non_empty_sections_render() {
        let changes = ChangeSet {
            new: vec![cat("1", "Pip")],
            removed: vec![cat("2", "Moss")],
            ..Default::default()
        };

        let html = formatter().render(&changes);
        assert!(html.contains("New Cats"));
        assert!(html.contains("Removed Cats"));
        assert!(!html.contains("Reserved Cats"));
        assert!(!html.contains("Re-homed Cats"));
        assert!(html.find("New Cats").unwrap() < html.find("Removed Cats").unwrap());
    }

    #[test]
    fn test_record_details() {
        let changes = ChangeSet {
            new: vec![cat("81234", "Biscuit")],
            ..Default::default()
        };

        let html = formatter().render(&changes);
        assert!(html.contains(r#"href="https://www.battersea.org.uk/cats/81234""#));
        assert!(html.contains(r#"src="https://img.example.com/81234.jpg""#));
        assert!(html.contains(">Biscuit</h1>"));
        assert!(html.contains(">2 years old</h3>"));
        assert!(html.contains(">I prefer not to live with other cats</h3>"));
        assert!(html.contains(">Location: Old Windsor</h3>"));
        assert!(html.contains(">Date added: 2026-10-01</h3>"));
        assert!(html.contains("color: Green;"));
    }

    #[test]
    fn test_reserved_status_is_orange() {
        let mut reserved = cat("1", "Pip");
        reserved.reserved = Some("Reserved".to_string());
        let changes = ChangeSet {
            reserved: vec![reserved],
            ..Default::default()
        };

        let html = formatter().render(&changes);
        assert!(html.contains("color: Orange;\">Reserved</h3>"));
    }

    #[test]
    fn test_text_is_escaped() {
        let changes = ChangeSet {
            new: vec![cat("1", "<b>Tom & Jerry</b>")],
            ..Default::default()
        };

        let html = formatter().render(&changes);
        assert!(html.contains("&lt;b&gt;Tom &amp; Jerry&lt;/b&gt;"));
        assert!(!html.contains("<b>Tom"));
    }

    #[test]
    fn test_subject() {
        let mut changes = ChangeSet {
            removed: vec![cat("1", "Pip")],
            ..Default::default()
        };
        assert_eq!(DigestFormatter::subject(&changes), "Cat updates!");

        changes.new.push(cat("2", "Moss"));
        assert_eq!(DigestFormatter::subject(&changes), "New cat alert!");
    }
}
