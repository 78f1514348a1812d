//! Bulk intake of proposals from spreadsheet exports.

mod parser;

use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::ranking::{Proposal, SolicitationId};

#[derive(Debug)]
pub enum ProposalImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for ProposalImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProposalImportError::Io(err) => write!(f, "failed to read proposal export: {}", err),
            ProposalImportError::Csv(err) => write!(f, "invalid proposal CSV data: {}", err),
        }
    }
}

impl std::error::Error for ProposalImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProposalImportError::Io(err) => Some(err),
            ProposalImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ProposalImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ProposalImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Reads proposals from a CSV export with one proposal per row and named header columns.
///
/// Rows without a `Solicitation ID` are attached to the solicitation passed in; rows without a
/// `Proposal ID` get `proposal-NNNN` from their 1-based row number.
pub struct ProposalCsvImporter;

impl ProposalCsvImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        solicitation_id: &SolicitationId,
    ) -> Result<Vec<Proposal>, ProposalImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, solicitation_id)
    }

    pub fn from_reader<R: Read>(
        reader: R,
        solicitation_id: &SolicitationId,
    ) -> Result<Vec<Proposal>, ProposalImportError> {
        let proposals = parser::parse_proposals(reader, solicitation_id)?;
        debug!(
            solicitation = %solicitation_id,
            proposals = proposals.len(),
            "imported proposals"
        );
        Ok(proposals)
    }
}
