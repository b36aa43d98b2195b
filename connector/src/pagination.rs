//! Resumable cursor stack for nested, offset based enumeration.
//!
//! Bags round-trip through opaque string tokens so callers can persist them
//! between invocations and resume exactly where the previous page ended.
use anyhow::Result;
use serde::Deserialize;
use serde::Serialize;

use dogsync_models::ResourceKind;

use crate::errors::InvalidToken;

/// Enumeration state for one nesting level of a paginated listing.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PageState {
    /// Kind of resource enumerated at this level.
    pub kind: ResourceKind,

    /// Specific resource a nested enumeration runs under, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,

    /// Page number to request next, starting from zero.
    #[serde(default)]
    pub page: u64,
}

impl PageState {
    /// Root enumeration state for a resource kind.
    pub fn root(kind: ResourceKind, resource: Option<&str>) -> PageState {
        PageState {
            kind,
            resource: resource.map(String::from),
            page: 0,
        }
    }

    /// Nested enumeration state under a specific resource.
    pub fn nested<S>(kind: ResourceKind, resource: S) -> PageState
    where
        S: Into<String>,
    {
        PageState {
            kind,
            resource: Some(resource.into()),
            page: 0,
        }
    }
}

/// Ordered stack of [`PageState`]s tracking nested enumeration contexts.
///
/// The top frame determines the currently active enumeration context.
/// Page numbers only ever move forward within a frame.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct PaginationBag {
    states: Vec<PageState>,
}

impl PaginationBag {
    /// Decode a bag from an opaque token.
    ///
    /// An empty token yields the empty bag (fresh start).
    pub fn decode(token: &str) -> Result<PaginationBag> {
        if token.is_empty() {
            return Ok(PaginationBag::default());
        }
        serde_json::from_str(token).map_err(|error| anyhow::anyhow!(error).context(InvalidToken))
    }

    /// Encode the bag into an opaque token.
    pub fn encode(&self) -> String {
        serde_json::to_string(self).expect("pagination bag encoding cannot fail")
    }

    /// Current enumeration frame, seeding a root frame when the bag is empty.
    pub fn current(&mut self, kind: ResourceKind, resource: Option<&str>) -> &PageState {
        if self.states.is_empty() {
            self.states.push(PageState::root(kind, resource));
        }
        self.states.last().expect("bag cannot be empty once seeded")
    }

    /// Page number of the current frame, zero when the bag is empty.
    pub fn page(&self) -> u64 {
        self.states.last().map(|state| state.page).unwrap_or(0)
    }

    /// Enter a nested enumeration context.
    pub fn push(&mut self, state: PageState) {
        self.states.push(state);
    }

    /// Leave the current enumeration context.
    pub fn pop(&mut self) -> Option<PageState> {
        self.states.pop()
    }

    /// Encode the bag with the current frame advanced to the given page.
    pub fn next_token(&self, page: u64) -> String {
        let mut bag = self.clone();
        if let Some(state) = bag.states.last_mut() {
            state.page = page;
        }
        bag.encode()
    }
}

/// Decode a token and seed the root frame for a resource kind.
///
/// Returns the bag along with the page number to request upstream.
pub fn parse_token(
    token: Option<&str>,
    kind: ResourceKind,
    resource: Option<&str>,
) -> Result<(PaginationBag, u64)> {
    let mut bag = PaginationBag::decode(token.unwrap_or_default())?;
    bag.current(kind, resource);
    let page = bag.page();
    Ok((bag, page))
}
