//! Reading content records
use std::path::Path;

use color_eyre::eyre::{self, WrapErr};
use contract_pdf::record::ContentRecord;
use log::debug;

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case("json"))
}

/// Parse a record from a string
pub fn parse(text: &str, json: bool) -> eyre::Result<ContentRecord> {
    if json {
        let res = serde_json::from_str(text);
        WrapErr::wrap_err(res, "Failed to parse record as JSON")
    } else {
        let res = ron::from_str(text);
        WrapErr::wrap_err(res, "Failed to parse record as RON")
    }
}

/// Read a record from a RON or JSON file
pub fn read(path: &Path) -> eyre::Result<ContentRecord> {
    let text = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read `{}`", path.display()))?;
    debug!("Loading record from `{}`", path.display());
    parse(&text, is_json(path))
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{is_json, parse};

    #[test]
    fn json_by_extension() {
        assert!(is_json(Path::new("jane.json")));
        assert!(is_json(Path::new("dir/JANE.JSON")));
        assert!(!is_json(Path::new("jane.ron")));
        assert!(!is_json(Path::new("jane")));
    }

    #[test]
    fn json_record() {
        let text = r#"{ "fullName": "Jane Doe", "idCard": "12345678", "costOMR": "250" }"#;
        let record = parse(text, true).unwrap();
        assert_eq!(record.full_name, "Jane Doe");
        assert_eq!(record.id_card, "12345678");
        assert_eq!(record.created_by, "Galaxy Way Adv");
    }

    #[test]
    fn ron_record() {
        let text = r#"(fullName: "Jane Doe", projectName: "Launch Video")"#;
        let record = parse(text, false).unwrap();
        assert_eq!(record.project_name, "Launch Video");
        assert!(record.signature.is_none());
    }

    #[test]
    fn numeric_cost() {
        let text = r#"{ "fullName": "Jane Doe", "costOmr": 250, "projectNo": 17 }"#;
        let record = parse(text, true).unwrap();
        assert_eq!(record.cost_omr, "250");
        assert_eq!(record.project_no, "17");
    }

    #[test]
    fn null_fields() {
        let text = r#"{ "fullName": "Jane Doe", "contractDate": null, "signature": null }"#;
        let record = parse(text, true).unwrap();
        assert_eq!(record.full_name, "Jane Doe");
        assert_eq!(record.contract_date, "");
        assert!(record.signature.is_none());
    }

    #[test]
    fn broken_record() {
        assert!(parse("{ fullName: ", true).is_err());
    }
}
