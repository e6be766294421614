use serde::Deserialize;

/// Query parameters for `GET /api/recent`.
///
/// `limit` is read as a string so that a malformed value falls back to the
/// default instead of rejecting the request.
#[derive(Debug, Deserialize, Default)]
pub struct RecentParams {
    pub limit: Option<String>,
}

impl RecentParams {
    /// The parsed limit, or `None` when absent or not a non-negative integer.
    pub fn limit(&self) -> Option<usize> {
        self.limit.as_deref().and_then(|l| l.trim().parse().ok())
    }
}
