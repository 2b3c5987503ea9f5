//! The content of one contract

use std::fmt;

use serde::{
    de::{Error, Visitor},
    Deserialize, Deserializer,
};

const MONTHS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// Who created the contract, when the record doesn't say
pub const DEFAULT_CREATED_BY: &str = "Galaxy Way Adv";

/// Shown in place of a missing name
pub const PLACEHOLDER: &str = "__________________________";

fn default_created_by() -> String {
    String::from(DEFAULT_CREATED_BY)
}

/// Accept a string, a number or null (as the empty string)
fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(TextVisitor)
}

struct TextVisitor;

impl<'de> Visitor<'de> for TextVisitor {
    type Value = String;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "a string, a number or null")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: Error,
    {
        Ok(v.to_owned())
    }

    fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
    where
        E: Error,
    {
        Ok(v)
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
    where
        E: Error,
    {
        Ok(v.to_string())
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where
        E: Error,
    {
        Ok(v.to_string())
    }

    fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
    where
        E: Error,
    {
        Ok(v.to_string())
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E>
    where
        E: Error,
    {
        Ok(String::new())
    }

    fn visit_none<E>(self) -> Result<Self::Value, E>
    where
        E: Error,
    {
        Ok(String::new())
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(TextVisitor)
    }
}

/// Everything that is filled into a contract
///
/// All fields are plain strings as collected by the input form, dates are
/// expected as `YYYY-MM-DD`. Numbers are read as their decimal text and null
/// as the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentRecord {
    /// The agency that issues the contract
    #[serde(deserialize_with = "deserialize_text")]
    pub created_by: String,
    /// The freelancer's full name
    #[serde(deserialize_with = "deserialize_text")]
    pub full_name: String,
    /// The freelancer's ID card number
    #[serde(deserialize_with = "deserialize_text")]
    pub id_card: String,
    /// The project number
    #[serde(deserialize_with = "deserialize_text")]
    pub project_no: String,
    /// The project name
    #[serde(deserialize_with = "deserialize_text")]
    pub project_name: String,
    /// When the contract was signed
    #[serde(deserialize_with = "deserialize_text")]
    pub contract_date: String,
    /// A free text description of the work
    #[serde(deserialize_with = "deserialize_text")]
    pub project_brief: String,
    /// First day of work
    #[serde(deserialize_with = "deserialize_text")]
    pub date_start: String,
    /// Last day of work
    #[serde(deserialize_with = "deserialize_text")]
    pub date_end: String,
    /// The agreed price in Omani rial
    #[serde(alias = "costOMR", deserialize_with = "deserialize_text")]
    pub cost_omr: String,
    /// The freelancer's bank account
    #[serde(deserialize_with = "deserialize_text")]
    pub bank_account: String,
    /// The name of the person signing for the agency
    #[serde(deserialize_with = "deserialize_text")]
    pub employer_name: String,
    /// The employer's signature, base64 or a `data:` URL
    pub signature: Option<String>,
}

impl Default for ContentRecord {
    fn default() -> Self {
        Self {
            created_by: default_created_by(),
            full_name: String::new(),
            id_card: String::new(),
            project_no: String::new(),
            project_name: String::new(),
            contract_date: String::new(),
            project_brief: String::new(),
            date_start: String::new(),
            date_end: String::new(),
            cost_omr: String::new(),
            bank_account: String::new(),
            employer_name: String::new(),
            signature: None,
        }
    }
}

/// Split `YYYY-MM-DD` into its three parts
fn split_date(input: &str) -> Option<(&str, &str, &str)> {
    let mut parts = input.split('-');
    let year = parts.next().filter(|s| !s.is_empty())?;
    let month = parts.next().filter(|s| !s.is_empty())?;
    let day = parts.next().filter(|s| !s.is_empty())?;
    Some((year, month, day))
}

/// Format a date as `DD MMM YYYY`, e.g. `01 MAR 2025`
///
/// Anything that doesn't look like `YYYY-MM-DD` is returned as is.
///
/// ```
/// use contract_pdf::record::cover_date;
/// assert_eq!(cover_date("2025-03-01"), "01 MAR 2025");
/// assert_eq!(cover_date("March 1st"), "March 1st");
/// ```
pub fn cover_date(input: &str) -> String {
    let parsed = split_date(input).and_then(|(y, m, d)| {
        let month: usize = m.trim().parse().ok()?;
        let index = month.max(1).min(12) - 1;
        Some(format!("{} {} {}", d, MONTHS[index], y))
    });
    parsed.unwrap_or_else(|| input.to_owned())
}

/// Format a date as `DD/MM/YYYY`
///
/// Anything that doesn't look like `YYYY-MM-DD` is returned as is.
///
/// ```
/// use contract_pdf::record::slash_date;
/// assert_eq!(slash_date("2025-03-01"), "01/03/2025");
/// assert_eq!(slash_date(""), "");
/// ```
pub fn slash_date(input: &str) -> String {
    match split_date(input) {
        Some((y, m, d)) => format!("{}/{}/{}", d, m, y),
        None => input.to_owned(),
    }
}

/// Keep word characters, `-` and spaces, collapse whitespace and cut at 40
fn sanitize(input: &str) -> String {
    let kept: String = input
        .trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-') || c.is_whitespace())
        .collect();
    let collapsed = kept.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.chars().take(40).collect()
}

fn or_default(value: String, default: &str) -> String {
    if value.is_empty() {
        default.to_owned()
    } else {
        value
    }
}

impl ContentRecord {
    /// The date shown on the cover, the contract date or else the start date
    pub fn cover_date(&self) -> Option<String> {
        let date = if self.contract_date.trim().is_empty() {
            self.date_start.trim()
        } else {
            self.contract_date.trim()
        };
        if date.is_empty() {
            None
        } else {
            Some(cover_date(date))
        }
    }

    /// A file name for the generated PDF
    ///
    /// ```
    /// use contract_pdf::record::ContentRecord;
    /// let record = ContentRecord {
    ///     full_name: String::from("Jane  Doe!"),
    ///     project_name: String::from("Launch Video"),
    ///     date_start: String::from("2025-03-01"),
    ///     ..Default::default()
    /// };
    /// assert_eq!(
    ///     record.suggested_file_name(),
    ///     "Contract - Jane Doe - Launch Video - 2025-03-01.pdf"
    /// );
    /// ```
    pub fn suggested_file_name(&self) -> String {
        let name = or_default(sanitize(&self.full_name), "Unknown");
        let project = or_default(sanitize(&self.project_name), "Project");
        let project_no = sanitize(&self.project_no);
        let start = or_default(sanitize(&self.date_start), "Start");
        let number = if project_no.is_empty() {
            String::new()
        } else {
            format!(" ({})", project_no)
        };
        format!("Contract - {} - {}{} - {}.pdf", name, project, number, start)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        cover_date, deserialize_text, sanitize, slash_date, ContentRecord, DEFAULT_CREATED_BY,
    };

    #[test]
    fn test_cover_date() {
        assert_eq!(cover_date("2025-12-31"), "31 DEC 2025");
        assert_eq!(cover_date("2025-13-01"), "01 DEC 2025");
        assert_eq!(cover_date("2025-00-01"), "01 JAN 2025");
        assert_eq!(cover_date("2025-xx-01"), "2025-xx-01");
        assert_eq!(cover_date("2025-03"), "2025-03");
    }

    #[test]
    fn test_slash_date() {
        assert_eq!(slash_date("2025-03-09"), "09/03/2025");
        assert_eq!(slash_date("tomorrow"), "tomorrow");
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("  a/b\\c  "), "abc");
        assert_eq!(sanitize("Ünïcode name"), "ncode name");
        assert_eq!(sanitize("x\t\n y"), "x y");
        assert_eq!(sanitize(&"z".repeat(50)).len(), 40);
        assert_eq!(sanitize("!!!"), "");
    }

    #[test]
    fn test_file_name() {
        let empty = ContentRecord::default();
        assert_eq!(
            empty.suggested_file_name(),
            "Contract - Unknown - Project - Start.pdf"
        );
        let record = ContentRecord {
            full_name: String::from("Ali"),
            project_name: String::from("Ad"),
            project_no: String::from("P-17"),
            date_start: String::from("2025-01-02"),
            ..Default::default()
        };
        assert_eq!(
            record.suggested_file_name(),
            "Contract - Ali - Ad (P-17) - 2025-01-02.pdf"
        );
    }

    #[test]
    fn test_record_cover_date() {
        let mut record = ContentRecord::default();
        assert_eq!(record.cover_date(), None);
        record.date_start = String::from("2025-03-01");
        assert_eq!(record.cover_date().as_deref(), Some("01 MAR 2025"));
        record.contract_date = String::from("2025-02-20");
        assert_eq!(record.cover_date().as_deref(), Some("20 FEB 2025"));
    }

    #[test]
    fn test_text_visitor() {
        use serde::de::{
            value::{Error, F64Deserializer, U64Deserializer, UnitDeserializer},
            IntoDeserializer,
        };

        let number: U64Deserializer<Error> = 250u64.into_deserializer();
        assert_eq!(deserialize_text(number).unwrap(), "250");
        let number: F64Deserializer<Error> = 12.5f64.into_deserializer();
        assert_eq!(deserialize_text(number).unwrap(), "12.5");
        let null: UnitDeserializer<Error> = ().into_deserializer();
        assert_eq!(deserialize_text(null).unwrap(), "");
    }

    #[test]
    fn test_created_by_default() {
        assert_eq!(ContentRecord::default().created_by, DEFAULT_CREATED_BY);
    }
}
