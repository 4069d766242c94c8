use chrono::NaiveDateTime;

use crate::{
    config::settings::SlipConfig,
    form::state::FormState,
    foundation::clock::{format_clock, format_date, format_time_12_hour},
    receipt::code::TransactionCode,
};

/// Heading printed under the branding block.
pub const RECEIPT_TITLE: &str = "LOCATOR SLIP APPLICATION";

/// Everything printed on a receipt, independent of how it is drawn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReceiptDocument {
    /// Number shown in the transaction-code box.
    pub code: TransactionCode,
    /// `<institution code>-<code>`.
    pub transaction_id: String,
    /// Branding block.
    pub header: ReceiptHeader,
    /// Field/information table, in print order.
    pub rows: Vec<ReceiptRow>,
    /// Left signature line.
    pub applicant: SignatureBlock,
    /// Right signature line.
    pub approver: SignatureBlock,
    /// Present only when the applicant ticked the agreement.
    pub attestation: Option<String>,
    /// Generation stamp and system brand.
    pub footer: ReceiptFooter,
}

/// Branding lines at the top of the page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReceiptHeader {
    /// System acronym, drawn largest.
    pub acronym: String,
    /// Institution name.
    pub institution: String,
    /// Full system name.
    pub system_name: String,
    /// Document title.
    pub title: String,
}

/// One line of the field/information table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReceiptRow {
    /// Left column, e.g. `"Full Name:"`.
    pub label: String,
    /// Right column.
    pub value: String,
    /// Rendered in a heavier weight (the two times).
    pub emphasized: bool,
}

/// A name printed over a signature line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignatureBlock {
    /// Signer.
    pub name: String,
    /// Role under the name.
    pub role: String,
    /// Small print under the role.
    pub note: String,
}

/// Bottom box of the page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReceiptFooter {
    /// `Generated on: <date> at <time>`.
    pub generated: String,
    /// `<acronym> | <system name>`.
    pub brand: String,
}

impl ReceiptDocument {
    /// Every visible string, top to bottom.
    pub fn texts(&self) -> Vec<&str> {
        let mut out = vec![
            "TRANSACTION CODE",
            self.transaction_id.as_str(),
            self.header.acronym.as_str(),
            self.header.institution.as_str(),
            self.header.system_name.as_str(),
            self.header.title.as_str(),
            "FIELD",
            "INFORMATION",
        ];
        for row in &self.rows {
            out.push(&row.label);
            out.push(&row.value);
        }
        for sig in [&self.applicant, &self.approver] {
            out.push(&sig.name);
            out.push(&sig.role);
            out.push(&sig.note);
        }
        if let Some(a) = &self.attestation {
            out.push(a);
        }
        out.push(&self.footer.generated);
        out.push(&self.footer.brand);
        out
    }

    /// Table row with exactly this label.
    pub fn row(&self, label: &str) -> Option<&ReceiptRow> {
        self.rows.iter().find(|r| r.label == label)
    }
}

/// Build the receipt content for a submitted form.
///
/// Pure: the code and timestamp come from the caller so the result is reproducible.
pub fn render_receipt_document(
    form: &FormState,
    code: TransactionCode,
    cfg: &SlipConfig,
    generated_at: NaiveDateTime,
) -> ReceiptDocument {
    let date = format_date(generated_at.date());
    let clock = format_clock(generated_at.time());

    let mut rows = vec![
        row("Full Name:", &form.full_name, false),
        row("Rank/Position:", &form.rank, false),
        row("Time to be Out:", &format_time_12_hour(&form.time_out), true),
        row("Time to Return:", &format_time_12_hour(&form.time_return), true),
        row("Place(s) to be Visited:", &form.places_to_visit, false),
    ];
    if !form.reason_for_visit.is_empty() {
        rows.push(row("Reason(s) for Visit:", &form.reason_for_visit, false));
    }

    let attestation = form.agreed.then(|| {
        format!(
            "Digitally signed and submitted by {} on {date} via {} {}.",
            form.full_name, cfg.institution_code, cfg.system_name
        )
    });

    ReceiptDocument {
        code,
        transaction_id: code.identifier(&cfg.institution_code),
        header: ReceiptHeader {
            acronym: cfg.system_acronym.clone(),
            institution: cfg.institution_name.clone(),
            system_name: cfg.system_name.clone(),
            title: RECEIPT_TITLE.to_string(),
        },
        rows,
        applicant: SignatureBlock {
            name: form.full_name.clone(),
            role: "Applicant's Signature".to_string(),
            note: format!("Date: {date}"),
        },
        approver: SignatureBlock {
            name: cfg.approver_name.clone(),
            role: cfg.approver_title.clone(),
            note: "Approved/Disapproved".to_string(),
        },
        attestation,
        footer: ReceiptFooter {
            generated: format!("Generated on: {date} at {clock}"),
            brand: format!("{} | {}", cfg.system_acronym, cfg.system_name),
        },
    }
}

fn row(label: &str, value: &str, emphasized: bool) -> ReceiptRow {
    ReceiptRow {
        label: label.to_string(),
        value: value.to_string(),
        emphasized,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/receipt/document.rs"]
mod tests;
