use pdf_forge::{
    chrono::{DateTime, FixedOffset},
    high::Metadata,
};

use crate::record::{ContentRecord, DEFAULT_CREATED_BY};

/// Information to add into the PDF `/Info` dictionary
#[derive(Debug, Clone, Default)]
pub struct MetaInfo {
    /// Title
    pub title: Option<String>,
    /// Author
    pub author: Vec<String>,
    /// Subject
    pub subject: Option<String>,
    /// Keywords
    pub keywords: Vec<String>,

    /// Creation date of the document
    pub creation_date: Option<DateTime<FixedOffset>>,
    /// Date when the document was last updated
    pub mod_date: Option<DateTime<FixedOffset>>,
}

impl MetaInfo {
    /// Fill in what is missing from a record
    ///
    /// The title defaults to the suggested file name (without extension),
    /// the author to the issuing agency, both dates to `now`.
    pub fn with_record(&mut self, record: &ContentRecord, now: DateTime<FixedOffset>) {
        if self.title.is_none() {
            let name = record.suggested_file_name();
            let title = name.strip_suffix(".pdf").unwrap_or(&name);
            self.title = Some(title.to_owned());
        }
        if self.author.is_empty() {
            let created_by = record.created_by.trim();
            let created_by = if created_by.is_empty() {
                DEFAULT_CREATED_BY
            } else {
                created_by
            };
            self.author.push(created_by.to_owned());
        }
        if self.subject.is_none() && !record.project_name.trim().is_empty() {
            self.subject = Some(record.project_name.trim().to_owned());
        }
        self.creation_date.get_or_insert(now);
        self.mod_date.get_or_insert(now);
    }
}

/// Write PDF info data
pub fn prepare_info(info: &mut Metadata, meta: &MetaInfo) {
    info.author = meta.author.clone();
    info.keywords = meta.keywords.clone();
    if let Some(subject) = &meta.subject {
        info.subject = Some(subject.clone());
    }
    if let Some(title) = &meta.title {
        info.title = Some(title.clone());
    }
    info.creator = Some(String::from("contract-tool"));
    info.producer = String::from(concat!("contract-pdf ", env!("CARGO_PKG_VERSION")));
    if let Some(creation_date) = meta.creation_date {
        info.creation_date = Some(creation_date);
    }
    if let Some(mod_date) = meta.mod_date {
        info.modify_date = Some(mod_date);
    }
}

#[cfg(test)]
mod tests {
    use pdf_forge::{
        chrono::{FixedOffset, TimeZone},
        high::Metadata,
    };

    use super::{prepare_info, MetaInfo};
    use crate::record::ContentRecord;

    #[test]
    fn test_with_record() {
        let now = FixedOffset::east_opt(4 * 3600)
            .unwrap()
            .with_ymd_and_hms(2025, 3, 1, 9, 30, 0)
            .unwrap();
        let record = ContentRecord {
            full_name: String::from("Jane Doe"),
            project_name: String::from("Launch Video"),
            date_start: String::from("2025-03-01"),
            created_by: String::from("  "),
            ..Default::default()
        };
        let mut meta = MetaInfo {
            subject: Some(String::from("Kept")),
            ..Default::default()
        };
        meta.with_record(&record, now);
        assert_eq!(
            meta.title.as_deref(),
            Some("Contract - Jane Doe - Launch Video - 2025-03-01")
        );
        assert_eq!(meta.author, ["Galaxy Way Adv"]);
        assert_eq!(meta.subject.as_deref(), Some("Kept"));
        assert_eq!(meta.creation_date, Some(now));

        let mut info = Metadata::new();
        prepare_info(&mut info, &meta);
        assert_eq!(info.creator.as_deref(), Some("contract-tool"));
        assert!(info.producer.starts_with("contract-pdf "));
        assert_eq!(info.modify_date, Some(now));
    }
}
