// src/services/feed.rs

//! Paginated feed loader.
//!
//! Fetches feed pages scoped to an organizational context and tracks the
//! current position within the server's page count. Requests carry tickets;
//! a response that is no longer the latest issued for the current context
//! is discarded rather than applied, so a slow request can never overwrite
//! newer state with stale data.

use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::{FeedPage, PagePayload, Post};
use crate::services::ApplyOutcome;
use crate::utils::{endpoint, http::get_json};

/// Identifies one issued feed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedTicket {
    seq: u64,
    context: i64,
    page: u32,
}

/// Screen-level feed state for one organizational context.
pub struct FeedLoader {
    client: Client,
    base_url: String,
    page_size: u32,
    context: Option<i64>,
    page: u32,
    total_pages: u32,
    items: Vec<Post>,
    latest_seq: u64,
}

impl FeedLoader {
    /// Create a loader with no context; nothing loads until one is set.
    pub fn new(client: Client, base_url: impl Into<String>, page_size: u32) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            page_size: page_size.max(1),
            context: None,
            page: 1,
            total_pages: 1,
            items: Vec::new(),
            latest_seq: 0,
        }
    }

    /// Current 1-indexed page number.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Page count as last resolved from the server.
    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Items currently displayed, in server order.
    pub fn items(&self) -> &[Post] {
        &self.items
    }

    pub fn context(&self) -> Option<i64> {
        self.context
    }

    /// Issue a ticket for the current context and page.
    ///
    /// Each ticket supersedes every earlier one; only the newest may be
    /// applied.
    pub fn begin_load(&mut self) -> Result<FeedTicket> {
        let context = self
            .context
            .ok_or_else(|| AppError::session("no organizational context set"))?;
        self.latest_seq += 1;
        Ok(FeedTicket {
            seq: self.latest_seq,
            context,
            page: self.page,
        })
    }

    /// Fetch the page a ticket was issued for.
    pub async fn fetch(&self, ticket: FeedTicket) -> Result<PagePayload> {
        let url = endpoint(
            &self.base_url,
            &format!(
                "api/post/{}?page={}&limit={}",
                ticket.context, ticket.page, self.page_size
            ),
        )?;
        get_json(&self.client, url).await
    }

    /// Apply a completed payload.
    ///
    /// A stale ticket (superseded, or issued for another context) is
    /// discarded. A malformed payload leaves the displayed items intact:
    /// the error is logged and propagated, nothing is overwritten.
    pub fn apply(&mut self, ticket: FeedTicket, payload: &PagePayload) -> Result<ApplyOutcome> {
        if ticket.seq != self.latest_seq || Some(ticket.context) != self.context {
            log::debug!(
                "discarding stale feed response: ticket {} for context {}, latest is {}",
                ticket.seq,
                ticket.context,
                self.latest_seq
            );
            return Ok(ApplyOutcome::DiscardedStale);
        }

        let page = match FeedPage::from_payload(payload, ticket.page, self.page_size) {
            Ok(page) => page,
            Err(e) => {
                log::warn!("feed page for context {} was malformed: {e}", ticket.context);
                return Err(e);
            }
        };

        self.items = page.items;
        self.total_pages = page.total_pages;
        Ok(ApplyOutcome::Applied)
    }

    /// Load the current page end to end.
    pub async fn refresh(&mut self) -> Result<ApplyOutcome> {
        let ticket = self.begin_load()?;
        let payload = self.fetch(ticket).await?;
        self.apply(ticket, &payload)
    }

    /// Switch organizational context.
    ///
    /// A changed (or newly available) context is the only thing that resets
    /// the page number to 1; an immediate load follows either way.
    pub async fn set_context(&mut self, context: i64) -> Result<ApplyOutcome> {
        if self.context != Some(context) {
            self.context = Some(context);
            self.page = 1;
            self.total_pages = 1;
        }
        self.refresh().await
    }

    /// Advance one page, clamped to the page count.
    ///
    /// Returns `false` without issuing a request when already on the last
    /// page.
    pub async fn next_page(&mut self) -> Result<bool> {
        if self.page >= self.total_pages {
            return Ok(false);
        }
        self.page += 1;
        self.refresh().await?;
        Ok(true)
    }

    /// Go back one page, clamped to 1.
    ///
    /// Returns `false` without issuing a request when already on the first
    /// page.
    pub async fn prev_page(&mut self) -> Result<bool> {
        if self.page <= 1 {
            return Ok(false);
        }
        self.page -= 1;
        self.refresh().await?;
        Ok(true)
    }

    /// Near-bottom scroll signal; equivalent to the forward control.
    pub async fn on_near_bottom(&mut self) -> Result<bool> {
        self.next_page().await
    }
}
