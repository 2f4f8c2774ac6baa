use serde::{Deserialize, Serialize};

/// A single Wiki.js page as returned by the `pages.list` GraphQL query.
///
/// Field names stay camelCase on the wire so the timeline can hand the record back to clients in
/// the same shape the upstream API produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: i64,
    pub path: String,
    pub locale: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_published: bool,
    pub is_private: bool,
    pub created_at: String,
    pub updated_at: Option<String>,
    // Wiki.js types this as `[String]`, so individual entries may be null
    pub tags: Option<Vec<Option<String>>>,
}

impl Page {
    // the only visibility gate: published and not private
    pub fn is_publishable(&self) -> bool {
        self.is_published && !self.is_private
    }
}

/// Drops every page that must not be exposed publicly, keeping upstream order.
pub fn publishable(pages: Vec<Page>) -> Vec<Page> {
    pages.into_iter().filter(Page::is_publishable).collect()
}
