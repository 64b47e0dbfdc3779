//! Change-set generation for `<databaseChangeLog>` documents.
//!
//! [`ChangelogEntry::render`] produces a `<changeSet>` fragment and [`splice`]
//! inserts it in front of the document's closing tag.

use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;

use chrono::Local;
use chrono::NaiveDate;

use crate::error::Error;
use crate::error::Result;

/// Closing root tag every changelog document must carry.
pub const CLOSING_TAG: &str = "</databaseChangeLog>";

const INDENT: &str = "    ";

// -----------------------------------------------------------------------------
// Types

/// Kind of database object a migration touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectType {
    Table,
    View,
    Procedure,
    /// Anything else. Rendered with the [`ObjectType::Table`] shape but,
    /// unlike tables, referencing bare file names. Only reachable by parsing a
    /// label outside [`ObjectType::CHOICES`].
    Other(String),
}

/// One change-set to add to a changelog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogEntry {
    pub author: String,
    pub story_id: String,
    pub date: NaiveDate,
    pub up_file: String,
    pub down_file: String,
    pub object_type: ObjectType,
}

/// Minimal XML element used to build fragments without string templating.
struct Element {
    name: &'static str,
    attributes: Vec<(&'static str, String)>,
    text: Option<String>,
    children: Vec<Element>,
}

// -----------------------------------------------------------------------------
// ObjectType impl

impl ObjectType {
    /// The types offered to the user.
    pub const CHOICES: [ObjectType; 3] = [ObjectType::Table, ObjectType::View, ObjectType::Procedure];

    /// Views and procedures are re-applied whenever their definition changes.
    pub fn reruns_on_change(&self) -> bool {
        matches!(self, ObjectType::View | ObjectType::Procedure)
    }

    /// Only table migrations reference their files relative to the changelog.
    pub fn uses_relative_paths(&self) -> bool {
        matches!(self, ObjectType::Table)
    }
}

impl Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObjectType::Table => f.write_str("Table"),
            ObjectType::View => f.write_str("View"),
            ObjectType::Procedure => f.write_str("Procedure"),
            ObjectType::Other(name) => f.write_str(name),
        }
    }
}

impl FromStr for ObjectType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "Table" => ObjectType::Table,
            "View" => ObjectType::View,
            "Procedure" => ObjectType::Procedure,
            other => ObjectType::Other(other.to_string()),
        })
    }
}

// -----------------------------------------------------------------------------
// ChangelogEntry impl

impl ChangelogEntry {
    /// Create an entry dated today.
    pub fn new(
        author: impl Into<String>,
        story_id: impl Into<String>,
        up_file: impl Into<String>,
        down_file: impl Into<String>,
        object_type: ObjectType,
    ) -> Self {
        Self {
            author: author.into(),
            story_id: story_id.into(),
            date: Local::now().date_naive(),
            up_file: up_file.into(),
            down_file: down_file.into(),
            object_type,
        }
    }

    /// Change-set identifier, `YYYYMMDD_story`.
    pub fn id(&self) -> String {
        format!("{}_{}", self.date.format("%Y%m%d"), self.story_id)
    }

    /// Render the `<changeSet>` fragment, unindented and without a trailing
    /// newline.
    ///
    /// Attribute values and text are XML-escaped. Values containing `&`, `<`,
    /// `>` or `"` therefore render differently from a plain string template,
    /// which would insert them raw: `author="R&D"` becomes `author="R&amp;D"`.
    pub fn render(&self) -> String {
        let up_file = self.up_file.replace('\\', "/");
        let down_file = self.down_file.replace('\\', "/");

        let mut change_set = Element::new("changeSet")
            .attr("author", &self.author)
            .attr("id", self.id());
        let up = if self.object_type.reruns_on_change() {
            change_set = change_set
                .attr("runOnChange", "true")
                .attr("runInTransaction", "true");
            Element::new("sqlFile")
                .attr("path", up_file)
                .attr("endDelimiter", "")
                .attr("encoding", "UTF-8")
        } else {
            Element::new("sqlFile")
                .attr("path", up_file)
                .attr("relativeToChangelogFile", "true")
        };
        let rollback = Element::new("rollback").child(
            Element::new("sqlFile")
                .attr("path", down_file)
                .attr("relativeToChangelogFile", "true"),
        );

        change_set
            .child(Element::new("comment").text(&self.story_id))
            .child(up)
            .child(rollback)
            .to_xml()
    }
}

// -----------------------------------------------------------------------------
// Element impl

impl Element {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            attributes: vec![],
            text: None,
            children: vec![],
        }
    }

    fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attributes.push((name, value.into()));
        self
    }

    fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    fn to_xml(&self) -> String {
        let mut out = String::new();
        self.write(&mut out, 0);
        out
    }

    fn write(&self, out: &mut String, depth: usize) {
        let indent = INDENT.repeat(depth);
        out.push_str(&indent);
        out.push('<');
        out.push_str(self.name);
        for (name, value) in &self.attributes {
            out.push_str(&format!(" {}=\"{}\"", name, escape(value, true)));
        }

        if let Some(text) = &self.text {
            out.push_str(&format!(">{}</{}>", escape(text, false), self.name));
        } else if self.children.is_empty() {
            out.push_str("/>");
        } else {
            out.push('>');
            for child in &self.children {
                out.push('\n');
                child.write(out, depth + 1);
            }
            out.push_str(&format!("\n{}</{}>", indent, self.name));
        }
    }
}

/// Escape markup characters, plus `"` inside attribute values. Every other
/// character, backslashes included, passes through unchanged.
fn escape(value: &str, attribute: bool) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}

// -----------------------------------------------------------------------------
// Splicing

/// Insert `fragment` on its own lines immediately before the last
/// [`CLOSING_TAG`] of `document`.
///
/// Returns `None` when the document has no closing tag. Everything before the
/// tag is kept byte for byte.
pub fn splice(document: &str, fragment: &str) -> Option<String> {
    let at = document.rfind(CLOSING_TAG)?;
    let (head, tail) = document.split_at(at);

    let mut out = String::with_capacity(document.len() + fragment.len() + 2);
    out.push_str(head);
    if !head.is_empty() && !head.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(fragment);
    out.push('\n');
    out.push_str(tail);
    Some(out)
}

/// Splice `fragment` into the changelog at `path`. The file is only written
/// when splicing succeeds.
pub async fn append_to_file(path: &Path, fragment: &str) -> Result<()> {
    let document = tokio::fs::read_to_string(path).await?;
    let updated =
        splice(&document, fragment).ok_or_else(|| Error::MalformedDocument(path.to_path_buf()))?;
    tokio::fs::write(path, updated).await?;
    Ok(())
}
