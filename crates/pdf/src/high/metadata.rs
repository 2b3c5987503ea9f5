use chrono::{DateTime, FixedOffset};

use crate::{common::PdfString, low};

/// The Metadata/Info
#[derive(Debug, Clone, Default)]
pub struct Metadata {
    /// The title
    pub title: Option<String>,
    /// The author
    pub author: Vec<String>,
    /// The subject
    pub subject: Option<String>,
    /// A list of keywords
    pub keywords: Vec<String>,
    /// The program used to create the source
    pub creator: Option<String>,
    /// The program that produced the file
    pub producer: String,

    /// Date-Time at which the document was created
    pub creation_date: Option<DateTime<FixedOffset>>,
    /// Date-Time at which the document was modified
    pub modify_date: Option<DateTime<FixedOffset>>,
}

fn text_of(o: &Option<String>) -> Option<PdfString> {
    o.as_deref().map(PdfString::from_text)
}

fn list_of(o: &[String]) -> Option<PdfString> {
    if o.is_empty() {
        None
    } else {
        Some(PdfString::from_text(&o.join(", ")))
    }
}

impl Metadata {
    /// Create a new instance without any dates
    pub fn new() -> Self {
        Self {
            producer: String::from(concat!("pdf-forge ", env!("CARGO_PKG_VERSION"))),
            ..Default::default()
        }
    }

    /// Check whether the info contains any meaningful data
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_empty()
            && self.subject.is_none()
            && self.keywords.is_empty()
            && self.creator.is_none()
            && self.producer.is_empty()
            && self.creation_date.is_none()
            && self.modify_date.is_none()
    }

    /// Feed everything but the dates into a hasher
    pub(crate) fn digest_into(&self, ctx: &mut md5::Context) {
        let fields = self
            .title
            .iter()
            .chain(&self.author)
            .chain(&self.subject)
            .chain(&self.keywords)
            .chain(&self.creator);
        for field in fields {
            ctx.consume(field.as_bytes());
            ctx.consume([0u8]);
        }
        ctx.consume(self.producer.as_bytes());
    }

    /// Build the `/Info` dictionary
    pub fn to_info(&self) -> low::Info {
        low::Info {
            title: text_of(&self.title),
            author: list_of(&self.author),
            subject: text_of(&self.subject),
            keywords: list_of(&self.keywords),
            creator: text_of(&self.creator),
            producer: if self.producer.is_empty() {
                None
            } else {
                Some(PdfString::from_text(&self.producer))
            },
            creation_date: self.creation_date,
            mod_date: self.modify_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Metadata;

    #[test]
    fn test_info() {
        let mut meta = Metadata::new();
        assert!(!meta.is_empty());
        meta.author = vec!["Jane".to_string(), "John".to_string()];
        let info = meta.to_info();
        assert_eq!(info.author.unwrap().as_bytes(), b"Jane, John");
        assert!(info.title.is_none());
        assert!(info.producer.is_some());
    }
}
