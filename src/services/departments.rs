// src/services/departments.rs

//! Report department directory.
//!
//! The selectable departments come from a remote enumeration fetched once
//! per screen activation; they are never cached across activations. The
//! same ticket discipline as the feed loader applies.

use reqwest::Client;

use crate::error::Result;
use crate::models::{DepartmentOption, DepartmentRow};
use crate::services::ApplyOutcome;
use crate::utils::{endpoint, http::get_json};

/// Identifies one issued directory request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectoryTicket {
    seq: u64,
}

/// The currently loaded department options.
pub struct DepartmentDirectory {
    client: Client,
    base_url: String,
    options: Vec<DepartmentOption>,
    latest_seq: u64,
}

impl DepartmentDirectory {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            options: Vec::new(),
            latest_seq: 0,
        }
    }

    /// Options as last applied, in server order.
    pub fn options(&self) -> &[DepartmentOption] {
        &self.options
    }

    /// Issue a ticket superseding every earlier one.
    pub fn begin_fetch(&mut self) -> DirectoryTicket {
        self.latest_seq += 1;
        DirectoryTicket {
            seq: self.latest_seq,
        }
    }

    /// Fetch the department enumeration.
    pub async fn fetch(&self) -> Result<Vec<DepartmentRow>> {
        let url = endpoint(&self.base_url, "api/reportes/dependencias")?;
        get_json(&self.client, url).await
    }

    /// Apply fetched rows unless the ticket has been superseded.
    pub fn apply(&mut self, ticket: DirectoryTicket, rows: Vec<DepartmentRow>) -> ApplyOutcome {
        if ticket.seq != self.latest_seq {
            log::debug!(
                "discarding stale department response: ticket {}, latest is {}",
                ticket.seq,
                self.latest_seq
            );
            return ApplyOutcome::DiscardedStale;
        }
        self.options = rows.into_iter().map(DepartmentOption::from).collect();
        ApplyOutcome::Applied
    }

    /// Fetch and apply end to end.
    pub async fn refresh(&mut self) -> Result<&[DepartmentOption]> {
        let ticket = self.begin_fetch();
        let rows = self.fetch().await?;
        self.apply(ticket, rows);
        Ok(&self.options)
    }
}
