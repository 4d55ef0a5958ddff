//! In-memory pagination for tables rendered from fully fetched lists.

use serde::Serialize;

pub const DEFAULT_ITEMS_PER_PAGE: usize = 20;

/// Page numbers to render in the pager; `None` stands for an ellipsis.
///
/// Shows the first and last `edge` pages plus `around` pages on each side
/// of the current one.
fn page_links(total_pages: usize, current: usize, edge: usize, around: usize) -> Vec<Option<usize>> {
    if total_pages == 0 {
        return Vec::new();
    }

    let mut links = Vec::new();
    let mut previous = 0;
    for page in 1..=total_pages {
        let near_edge = page <= edge || page > total_pages.saturating_sub(edge);
        let near_current = page + around >= current && page <= current + around;
        if !(near_edge || near_current) {
            continue;
        }
        if page > previous + 1 {
            links.push(None);
        }
        links.push(Some(page));
        previous = page;
    }
    links
}

#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pages: Vec<Option<usize>>,
    pub page: usize,
    pub total_items: usize,
}

impl<T> Paginated<T> {
    /// Cuts page `page` (1-based, clamped to the valid range) out of `items`.
    pub fn from_items(items: Vec<T>, page: usize, per_page: usize) -> Self {
        let per_page = per_page.max(1);
        let total_items = items.len();
        let total_pages = total_items.div_ceil(per_page);
        let page = page.clamp(1, total_pages.max(1));

        let items = items
            .into_iter()
            .skip((page - 1) * per_page)
            .take(per_page)
            .collect();

        Self {
            items,
            pages: page_links(total_pages, page, 2, 2),
            page,
            total_items,
        }
    }
}
