use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};
use std::io::Read;

use crate::ranking::{Proposal, ProposalId, ProposalStatus, SolicitationId};

pub(crate) fn parse_proposals<R: Read>(
    reader: R,
    solicitation_id: &SolicitationId,
) -> Result<Vec<Proposal>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut proposals = Vec::new();

    for (index, record) in csv_reader.deserialize::<ProposalRow>().enumerate() {
        let row = record?;
        proposals.push(row.into_proposal(index + 1, solicitation_id));
    }

    Ok(proposals)
}

#[derive(Debug, Deserialize)]
struct ProposalRow {
    #[serde(rename = "Proposal ID", default, deserialize_with = "empty_string_as_none")]
    proposal_id: Option<String>,
    #[serde(
        rename = "Solicitation ID",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    solicitation_id: Option<String>,
    #[serde(rename = "Vendor Email", default)]
    vendor_email: String,
    #[serde(rename = "Vendor Name", default)]
    vendor_name: String,
    #[serde(rename = "Company Name", default)]
    company_name: String,
    #[serde(rename = "Contact Person", default)]
    contact_person: String,
    #[serde(rename = "Email", default)]
    email: String,
    #[serde(rename = "Phone", default)]
    phone: String,
    #[serde(rename = "Title", default)]
    title: String,
    #[serde(rename = "Proposed Budget", default)]
    proposed_budget: String,
    #[serde(rename = "Timeline", default)]
    timeline: String,
    #[serde(rename = "Description", default)]
    description: String,
    #[serde(rename = "Experience", default)]
    experience: String,
    #[serde(rename = "Attachments", default, deserialize_with = "empty_string_as_none")]
    attachments: Option<String>,
    #[serde(rename = "Submitted At", default, deserialize_with = "empty_string_as_none")]
    submitted_at: Option<String>,
}

impl ProposalRow {
    fn into_proposal(self, row_number: usize, fallback: &SolicitationId) -> Proposal {
        let attachments = self
            .attachments
            .as_deref()
            .map(split_attachments)
            .unwrap_or_default();
        let submitted_at = self.submitted_at.as_deref().and_then(parse_datetime);

        Proposal {
            id: ProposalId(
                self.proposal_id
                    .unwrap_or_else(|| format!("proposal-{row_number:04}")),
            ),
            solicitation_id: self
                .solicitation_id
                .map(SolicitationId)
                .unwrap_or_else(|| fallback.clone()),
            vendor_email: self.vendor_email,
            vendor_name: self.vendor_name,
            company_name: self.company_name,
            contact_person: self.contact_person,
            email: self.email,
            phone: self.phone,
            title: self.title,
            proposed_budget: self.proposed_budget,
            timeline: self.timeline,
            description: self.description,
            experience: self.experience,
            attachments,
            status: ProposalStatus::Pending,
            submitted_at,
        }
    }
}

fn split_attachments(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
pub(crate) fn parse_datetime_for_tests(value: &str) -> Option<DateTime<Utc>> {
    parse_datetime(value)
}

#[cfg(test)]
pub(crate) fn split_attachments_for_tests(raw: &str) -> Vec<String> {
    split_attachments(raw)
}
