use std::cmp::Ordering;

use crate::model::material::{Material, Status};
use crate::ops::normalize::canonical_status;

/// Which statuses the list shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(Status),
}

impl StatusFilter {
    /// Parse `all` or any status label/synonym
    pub fn parse(s: &str) -> Option<StatusFilter> {
        if s.trim().eq_ignore_ascii_case("all") {
            Some(StatusFilter::All)
        } else {
            canonical_status(s).map(StatusFilter::Only)
        }
    }

    pub fn matches(self, status: Status) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(s) => s == status,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Only(s) => s.label(),
        }
    }

    /// Next filter in the order All → To Read → Reading → Completed → Paused → All
    pub fn cycle(self) -> StatusFilter {
        match self {
            StatusFilter::All => StatusFilter::Only(Status::ToRead),
            StatusFilter::Only(Status::ToRead) => StatusFilter::Only(Status::Reading),
            StatusFilter::Only(Status::Reading) => StatusFilter::Only(Status::Completed),
            StatusFilter::Only(Status::Completed) => StatusFilter::Only(Status::Paused),
            StatusFilter::Only(Status::Paused) => StatusFilter::All,
        }
    }
}

/// Sort order for the list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    Title,
    Author,
    /// Highest progress first
    Progress,
    /// Newest first
    #[default]
    DateAdded,
    /// Keep stored order
    Insertion,
}

impl SortKey {
    /// Unknown keys keep the stored order.
    pub fn parse(s: &str) -> SortKey {
        match s.trim().to_lowercase().as_str() {
            "title" => SortKey::Title,
            "author" => SortKey::Author,
            "progress" => SortKey::Progress,
            "dateadded" | "date-added" | "date_added" | "added" => SortKey::DateAdded,
            _ => SortKey::Insertion,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Title => "title",
            SortKey::Author => "author",
            SortKey::Progress => "progress",
            SortKey::DateAdded => "dateAdded",
            SortKey::Insertion => "none",
        }
    }

    pub fn cycle(self) -> SortKey {
        match self {
            SortKey::DateAdded => SortKey::Title,
            SortKey::Title => SortKey::Author,
            SortKey::Author => SortKey::Progress,
            SortKey::Progress => SortKey::Insertion,
            SortKey::Insertion => SortKey::DateAdded,
        }
    }
}

/// Everything the list view depends on besides the records themselves
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewQuery {
    pub status: StatusFilter,
    /// Subject filter, ANDed with the status filter
    pub subject: Option<String>,
    pub search: String,
    pub sort: SortKey,
    /// 1-based page number
    pub page: usize,
    pub page_size: usize,
}

impl Default for ViewQuery {
    fn default() -> Self {
        ViewQuery {
            status: StatusFilter::All,
            subject: None,
            search: String::new(),
            sort: SortKey::DateAdded,
            page: 1,
            page_size: 6,
        }
    }
}

impl ViewQuery {
    /// Whether any filter or search narrows the list
    pub fn is_narrowed(&self) -> bool {
        self.status != StatusFilter::All || self.subject.is_some() || !self.search.is_empty()
    }

    /// Reset filter, subject and search, and go back to the first page
    pub fn clear_filters(&mut self) {
        self.status = StatusFilter::All;
        self.subject = None;
        self.search.clear();
        self.page = 1;
    }
}

/// One page of the filtered, searched and sorted list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewPage<'a> {
    pub items: Vec<&'a Material>,
    pub total_matching: usize,
    pub total_pages: usize,
    pub page: usize,
}

/// Whether a material passes the status/subject filters and the search text
pub fn matches(material: &Material, query: &ViewQuery) -> bool {
    if !query.status.matches(material.status) {
        return false;
    }
    if let Some(subject) = &query.subject
        && !material.category.eq_ignore_ascii_case(subject)
    {
        return false;
    }
    matches_search(material, &query.search)
}

/// Case-insensitive substring match over title, author, type, subject and notes
pub fn matches_search(material: &Material, search: &str) -> bool {
    let needle = search.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    [
        Some(material.title.as_str()),
        Some(material.author.as_str()),
        Some(material.material_type.as_str()),
        Some(material.category.as_str()),
        material.notes.as_deref(),
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(&needle))
}

fn compare(a: &Material, b: &Material, sort: SortKey) -> Ordering {
    match sort {
        SortKey::Title => compare_text(&a.title, &b.title),
        SortKey::Author => compare_text(&a.author, &b.author),
        SortKey::Progress => b.progress.cmp(&a.progress),
        SortKey::DateAdded => b.date_added.cmp(&a.date_added),
        SortKey::Insertion => Ordering::Equal,
    }
}

/// Case-insensitive ordering with the exact text as tie-breaker
fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Filter, search, sort and paginate. Pure: the same inputs always give the
/// same page. A page past the end yields an empty slice.
pub fn compute<'a>(materials: &'a [Material], query: &ViewQuery) -> ViewPage<'a> {
    let mut matching: Vec<&Material> = materials.iter().filter(|m| matches(m, query)).collect();
    // Stable sort keeps insertion order among equal keys
    matching.sort_by(|a, b| compare(a, b, query.sort));

    let page_size = query.page_size.max(1);
    let total_matching = matching.len();
    let total_pages = total_matching.div_ceil(page_size);
    let page = query.page.max(1);

    let items = matching
        .into_iter()
        .skip((page - 1).saturating_mul(page_size))
        .take(page_size)
        .collect();

    ViewPage {
        items,
        total_matching,
        total_pages,
        page,
    }
}

/// A slot in the pagination bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSlot {
    Page(usize),
    Ellipsis,
}

/// Page numbers to show: first, last, and current ±1, with ellipses two pages
/// away from the current one. Empty when everything fits on one page.
pub fn page_window(current: usize, total_pages: usize) -> Vec<PageSlot> {
    if total_pages <= 1 {
        return Vec::new();
    }
    let mut slots = Vec::new();
    for i in 1..=total_pages {
        if i == current || i == 1 || i == total_pages || (i + 1 >= current && i <= current.saturating_add(1)) {
            slots.push(PageSlot::Page(i));
        } else if i + 2 == current || i == current.saturating_add(2) {
            slots.push(PageSlot::Ellipsis);
        }
    }
    slots
}

/// The 1-based inclusive range of items shown on `page`, as in "Showing 7-12 of 14"
pub fn showing_range(page: usize, page_size: usize, total: usize) -> Option<(usize, usize)> {
    let page_size = page_size.max(1);
    let start = (page.max(1) - 1).saturating_mul(page_size).saturating_add(1);
    if total == 0 || start > total {
        return None;
    }
    Some((start, page.max(1).saturating_mul(page_size).min(total)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, Utc};
    use pretty_assertions::assert_eq;

    fn material(id: &str, title: &str, author: &str, status: Status, progress: u8, day: i64) -> Material {
        Material {
            id: id.into(),
            title: title.into(),
            author: author.into(),
            material_type: "Book".into(),
            material_link: None,
            category: "Philosophy".into(),
            status,
            progress,
            notes: None,
            date_added: DateTime::<Utc>::default() + Duration::days(day),
            last_read: None,
        }
    }

    fn seven() -> Vec<Material> {
        (0..7)
            .map(|i| {
                material(
                    &format!("m{}", i),
                    &format!("Title {}", i),
                    "Author",
                    Status::ToRead,
                    0,
                    i,
                )
            })
            .collect()
    }

    fn ids(page: &ViewPage) -> Vec<String> {
        page.items.iter().map(|m| m.id.clone()).collect()
    }

    #[test]
    fn seven_records_make_two_pages() {
        let list = seven();
        let mut query = ViewQuery {
            page_size: 6,
            ..Default::default()
        };
        let first = compute(&list, &query);
        assert_eq!(first.items.len(), 6);
        assert_eq!(first.total_pages, 2);
        assert_eq!(first.total_matching, 7);

        query.page = 2;
        let second = compute(&list, &query);
        assert_eq!(second.items.len(), 1);
        assert_eq!(second.total_pages, 2);
    }

    #[test]
    fn page_past_end_is_empty() {
        let list = seven();
        let query = ViewQuery {
            page: 9,
            ..Default::default()
        };
        let page = compute(&list, &query);
        assert!(page.items.is_empty());
        assert_eq!(page.total_matching, 7);
    }

    #[test]
    fn huge_page_number_is_empty() {
        let list = seven();
        let query = ViewQuery {
            page: usize::MAX,
            page_size: 6,
            ..Default::default()
        };
        let page = compute(&list, &query);
        assert!(page.items.is_empty());
        assert_eq!(page.page, usize::MAX);
        assert_eq!(page.total_pages, 2);

        let wide = ViewQuery {
            page: 2,
            page_size: usize::MAX,
            ..Default::default()
        };
        assert!(compute(&list, &wide).items.is_empty());
    }

    #[test]
    fn showing_range_at_extremes() {
        assert_eq!(showing_range(usize::MAX, 6, 7), None);
        assert_eq!(showing_range(1, usize::MAX, 7), Some((1, 7)));
        assert_eq!(showing_range(2, usize::MAX, 7), None);
        assert_eq!(
            page_window(usize::MAX, 2),
            vec![PageSlot::Page(1), PageSlot::Page(2)]
        );
    }

    #[test]
    fn search_without_hits_is_empty() {
        let list = seven();
        let query = ViewQuery {
            search: "zzz-nothing".into(),
            ..Default::default()
        };
        let page = compute(&list, &query);
        assert!(page.items.is_empty());
        assert_eq!(page.total_matching, 0);
        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let mut list = vec![
            material("a", "The Republic", "Plato", Status::ToRead, 0, 1),
            material("b", "Cosmos", "Carl Sagan", Status::Reading, 10, 2),
            material("c", "Other", "Someone", Status::Reading, 10, 3),
        ];
        list[2].notes = Some("compare with the REPUBLIC".into());
        list[1].material_type = "Video".into();

        let query = |s: &str| ViewQuery {
            search: s.into(),
            sort: SortKey::Insertion,
            ..Default::default()
        };
        assert_eq!(ids(&compute(&list, &query("republic"))), vec!["a", "c"]);
        assert_eq!(ids(&compute(&list, &query("SAGAN"))), vec!["b"]);
        assert_eq!(ids(&compute(&list, &query("video"))), vec!["b"]);
        assert_eq!(ids(&compute(&list, &query("philosophy"))).len(), 3);
    }

    #[test]
    fn status_and_subject_filters_combine() {
        let mut list = vec![
            material("a", "A", "x", Status::Reading, 10, 1),
            material("b", "B", "x", Status::Reading, 10, 2),
            material("c", "C", "x", Status::ToRead, 0, 3),
        ];
        list[1].category = "Physics".into();

        let query = ViewQuery {
            status: StatusFilter::Only(Status::Reading),
            subject: Some("physics".into()),
            ..Default::default()
        };
        assert_eq!(ids(&compute(&list, &query)), vec!["b"]);
    }

    #[test]
    fn sort_orders() {
        let list = vec![
            material("a", "beta", "Zed", Status::Reading, 20, 1),
            material("b", "Alpha", "yann", Status::Reading, 80, 3),
            material("c", "gamma", "Xu", Status::Reading, 50, 2),
        ];
        let sorted = |sort| {
            ids(&compute(
                &list,
                &ViewQuery {
                    sort,
                    ..Default::default()
                },
            ))
        };
        assert_eq!(sorted(SortKey::Title), vec!["b", "a", "c"]);
        assert_eq!(sorted(SortKey::Author), vec!["c", "b", "a"]);
        assert_eq!(sorted(SortKey::Progress), vec!["b", "c", "a"]);
        assert_eq!(sorted(SortKey::DateAdded), vec!["b", "c", "a"]);
        assert_eq!(sorted(SortKey::Insertion), vec!["a", "b", "c"]);
    }

    #[test]
    fn unknown_sort_key_keeps_order() {
        assert_eq!(SortKey::parse("rating"), SortKey::Insertion);
        assert_eq!(SortKey::parse("dateAdded"), SortKey::DateAdded);
    }

    #[test]
    fn compute_is_deterministic() {
        let list = seven();
        let query = ViewQuery {
            search: "title".into(),
            sort: SortKey::Title,
            page: 2,
            page_size: 3,
            ..Default::default()
        };
        assert_eq!(compute(&list, &query), compute(&list, &query));
    }

    #[test]
    fn status_filter_parse() {
        assert_eq!(StatusFilter::parse("ALL"), Some(StatusFilter::All));
        assert_eq!(
            StatusFilter::parse("finished"),
            Some(StatusFilter::Only(Status::Completed))
        );
        assert_eq!(StatusFilter::parse("someday"), None);
    }

    #[test]
    fn page_window_shapes() {
        use PageSlot::*;
        assert!(page_window(1, 1).is_empty());
        assert_eq!(page_window(1, 3), vec![Page(1), Page(2), Page(3)]);
        assert_eq!(
            page_window(5, 10),
            vec![Page(1), Ellipsis, Page(4), Page(5), Page(6), Ellipsis, Page(10)]
        );
        assert_eq!(page_window(1, 5), vec![Page(1), Page(2), Ellipsis, Page(5)]);
    }

    #[test]
    fn showing_range_labels() {
        assert_eq!(showing_range(1, 6, 7), Some((1, 6)));
        assert_eq!(showing_range(2, 6, 7), Some((7, 7)));
        assert_eq!(showing_range(3, 6, 7), None);
        assert_eq!(showing_range(1, 6, 0), None);
    }
}
