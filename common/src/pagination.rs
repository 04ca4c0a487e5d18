use serde::{Deserialize, Serialize};

/// Page size the server uses when a listing request does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// One page of a server listing, with its cursor and count metadata.
///
/// `page_count` is established server-side as `ceil(total_count / page_size)`
/// and only mirrored here; the client never recomputes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub current_page: u32,
    pub total_count: u64,
    pub page_count: u32,
    pub page_size: u32,
    pub data: Vec<T>,
}

impl<T> Page<T> {
    /// Project the page's data while keeping the cursor metadata intact.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            current_page: self.current_page,
            total_count: self.total_count,
            page_count: self.page_count,
            page_size: self.page_size,
            data: self.data.into_iter().map(f).collect(),
        }
    }
}
