use serde::{Deserialize, Serialize};

/// One page of a longer list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based
    pub page: usize,
    pub page_count: usize,
    /// Items across all pages
    pub total: usize,
}

/// Slice `items` into the requested page.
///
/// `page` is clamped into `1..=page_count`; an empty list has one empty page.
/// A `per_page` of zero is treated as one.
pub fn paginate<T>(items: Vec<T>, page: usize, per_page: usize) -> Page<T> {
    let per_page = per_page.max(1);
    let total = items.len();
    let page_count = total.div_ceil(per_page).max(1);
    let page = page.clamp(1, page_count);

    let items = items
        .into_iter()
        .skip((page - 1) * per_page)
        .take(per_page)
        .collect();

    Page {
        items,
        page,
        page_count,
        total,
    }
}
