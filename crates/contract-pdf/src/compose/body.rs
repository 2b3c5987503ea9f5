use crate::record::{slash_date, ContentRecord, PLACEHOLDER};

/// A piece of body text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// A bold one-line title
    Heading(String),
    /// Wrapped text
    Paragraph(String),
    /// A list of wrapped items with a marker
    Bullets(Vec<String>),
}

fn heading(text: &str) -> Block {
    Block::Heading(text.to_owned())
}

fn paragraph(text: String) -> Block {
    Block::Paragraph(text)
}

fn bullets(items: &[&str]) -> Block {
    Block::Bullets(items.iter().map(|s| String::from(*s)).collect())
}

/// The clauses of a work contract with the record filled in
pub fn template(record: &ContentRecord) -> Vec<Block> {
    let name = record.full_name.as_str();
    let start = slash_date(&record.date_start);
    let end = slash_date(&record.date_end);
    let brief = if record.project_brief.trim().is_empty() {
        PLACEHOLDER
    } else {
        record.project_brief.as_str()
    };

    vec![
        heading("CONTRACT DETAILS"),
        paragraph(format!("Prepared for: {} (ID: {})", name, record.id_card)),
        paragraph(format!("Project No: {}", record.project_no)),
        paragraph(format!("Project Name: {}", record.project_name)),
        paragraph(format!("Start: {}    End: {}", start, end)),
        heading("1. PROJECT BRIEF"),
        paragraph(brief.to_owned()),
        heading("1.1 Description of Services."),
        paragraph(format!(
            "Beginning on {} {} will provide the services as described.",
            start, name
        )),
        heading("1.2 Completion."),
        paragraph(format!(
            "All Services shall be completed by {} on or before on {}",
            name, end
        )),
        paragraph(String::from("Client Details:")),
        paragraph(String::from("Galaxy Way production responsibility")),
        paragraph(String::from(
            "We are handling the communication with the client and any other creative work.",
        )),
        heading("COMMUNICATION"),
        bullets(&[
            "All the communication should be clear and documented.",
            "GW will communicate with the freelancer through company email.",
            "WhatsApp communication It can be used for fast inquiries.",
            "If required freelancer should be available for online interaction with prior \
             notice by online platforms link Zoom, Teams.",
            "GW or freelancer should reply/respond within 2-4 hours of receiving email/call.",
            "Freelancer will connect with the Head of production.",
        ]),
        heading("CONFIDENTIALITY"),
        bullets(&[
            "All the project materials are strictly confidential and should not be shared \
             with any third party.",
            "At no time will the freelancer use any confidential information obtained \
             through conducting this service contract either directly or indirectly, for \
             personal benefit, or disclose or communicate such information in any manner \
             to any third party.",
            "This provision shall continue to be effective after the termination of this \
             Contract.",
        ]),
        heading("OWNERSHIP OF RIGHTS"),
        bullets(&[
            "The Client continues to own any and all proprietary information it shares with \
             the designer during the term of this Contract. The freelancer has no rights to \
             this proprietary information and may not use it except to complete the \
             designing services. Upon completion of the Contract, the Client will own the \
             final content Deliverables.",
            "Freelancer Not allowed to publish any projects on social media platforms or \
             any online platform.",
        ]),
        heading("PAYMENT"),
        Block::Bullets(vec![
            format!("Contract costing will be {} OMR", record.cost_omr.trim()),
            format!("Bank Muscat: {}", record.bank_account.trim()),
        ]),
        heading("PAYMENT POLICY"),
        bullets(&[
            "Payment will not be sent to any third party other than the freelancer.",
            "Mode of payment will be through the Bank Muscat No cash payment will be made.",
            "Advance payment will be made only on special cases.",
            "Payment will be made within a period not less than 35 working days from the \
             date of signing this contract.",
        ]),
        heading("PROJECT TIMELINE"),
        bullets(&["The project will be going on until the project finishes."]),
        heading("AGREEMENT"),
        bullets(&[
            "Mutual agreement will be made between Galaxy Way and the freelancer.",
            "Agreement will be considered as the legal document for both company and the \
             freelancer.",
            "Agreement cannot be altered once agreed between both parties.",
        ]),
        heading("TERMINATION CLAUSE"),
        bullets(&[
            "If GW or freelancer want to discontinue or cancel the contract, they should \
             inform you with a 1 month notice period.",
            "This Contract may be cancelled/terminated by either Party submitting a written \
             notice to the other Party or may immediately be cancelled under the following \
             circumstances:",
            "If there is a continuous delay to make a required payment when due.",
            "The failure to make available or deliver the services in the time and manner \
             as described in this Contract.",
            "Misuse of the company\u{2019}s portfolio/projects in any cases.",
        ]),
    ]
}

#[cfg(test)]
mod tests {
    use super::{template, Block};
    use crate::record::{ContentRecord, PLACEHOLDER};

    #[test]
    fn test_substitution() {
        let record = ContentRecord {
            full_name: String::from("Jane Doe"),
            id_card: String::from("123"),
            date_start: String::from("2025-03-01"),
            date_end: String::from("2025-03-15"),
            cost_omr: String::from("250"),
            ..Default::default()
        };
        let blocks = template(&record);
        assert_eq!(blocks[0], Block::Heading(String::from("CONTRACT DETAILS")));
        assert_eq!(
            blocks[1],
            Block::Paragraph(String::from("Prepared for: Jane Doe (ID: 123)"))
        );
        assert_eq!(
            blocks[4],
            Block::Paragraph(String::from("Start: 01/03/2025    End: 15/03/2025"))
        );
        assert_eq!(blocks[6], Block::Paragraph(String::from(PLACEHOLDER)));
        assert!(blocks.contains(&Block::Bullets(vec![
            String::from("Contract costing will be 250 OMR"),
            String::from("Bank Muscat: "),
        ])));
    }

    #[test]
    fn test_sections() {
        let blocks = template(&ContentRecord::default());
        let headings: Vec<&str> = blocks
            .iter()
            .filter_map(|b| match b {
                Block::Heading(h) => Some(h.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(
            headings,
            [
                "CONTRACT DETAILS",
                "1. PROJECT BRIEF",
                "1.1 Description of Services.",
                "1.2 Completion.",
                "COMMUNICATION",
                "CONFIDENTIALITY",
                "OWNERSHIP OF RIGHTS",
                "PAYMENT",
                "PAYMENT POLICY",
                "PROJECT TIMELINE",
                "AGREEMENT",
                "TERMINATION CLAUSE",
            ]
        );
        let bullet_counts: Vec<usize> = blocks
            .iter()
            .filter_map(|b| match b {
                Block::Bullets(items) => Some(items.len()),
                _ => None,
            })
            .collect();
        assert_eq!(bullet_counts, [6, 3, 2, 2, 4, 1, 3, 5]);
    }
}
