//! Page-number pagination with Django's `Paginator.get_page` semantics.
//!
//! Listings never fail on a bad `?page=`: input that is not an integer
//! falls back to the first page, and numbers outside `1..=num_pages` fall
//! back to the last page.

use serde::ser::{Serialize, SerializeStruct, Serializer};

/// Posts shown on every listing page.
pub const POSTS_PER_PAGE: u64 = 10;

/// Splits `count` items into pages of `per_page`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    per_page: u64,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(POSTS_PER_PAGE)
    }
}

impl Paginator {
    /// A page size of zero is treated as one.
    pub fn new(per_page: u64) -> Self {
        Self {
            per_page: per_page.max(1),
        }
    }

    pub fn per_page(&self) -> u64 {
        self.per_page
    }

    /// Number of pages; an empty listing still has one (empty) page.
    pub fn num_pages(&self, count: u64) -> u64 {
        if count == 0 {
            1
        } else {
            count.div_ceil(self.per_page)
        }
    }

    /// Resolve the raw `page` query value against a listing of `count` items.
    pub fn get_page(&self, count: u64, raw_page: Option<&str>) -> PageRequest {
        let num_pages = self.num_pages(count);

        let number = match raw_page.map(str::trim).map(str::parse::<i64>) {
            None | Some(Err(_)) => 1,
            Some(Ok(n)) if n < 1 || n as u64 > num_pages => num_pages,
            Some(Ok(n)) => n as u64,
        };

        PageRequest {
            number,
            num_pages,
            count,
            per_page: self.per_page,
        }
    }
}

/// A resolved page number, ready to be turned into a repository query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub number: u64,
    pub num_pages: u64,
    pub count: u64,
    pub per_page: u64,
}

impl PageRequest {
    pub fn offset(&self) -> u64 {
        (self.number - 1) * self.per_page
    }

    pub fn limit(&self) -> u64 {
        self.per_page
    }

    /// Wrap the items fetched for this request.
    pub fn into_page<T>(self, object_list: Vec<T>) -> Page<T> {
        Page {
            object_list,
            number: self.number,
            num_pages: self.num_pages,
            count: self.count,
            per_page: self.per_page,
        }
    }
}

/// The page object handed to templates as `page_obj`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub object_list: Vec<T>,
    /// Current page number (1-indexed).
    pub number: u64,
    pub num_pages: u64,
    /// Total number of items across all pages.
    pub count: u64,
    pub per_page: u64,
}

impl<T> Page<T> {
    pub fn len(&self) -> usize {
        self.object_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.object_list.is_empty()
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_other_pages(&self) -> bool {
        self.has_previous() || self.has_next()
    }

    pub fn next_page_number(&self) -> Option<u64> {
        self.has_next().then(|| self.number + 1)
    }

    pub fn previous_page_number(&self) -> Option<u64> {
        self.has_previous().then(|| self.number - 1)
    }

    /// 1-based index of the first item on this page, 0 when empty.
    pub fn start_index(&self) -> u64 {
        if self.object_list.is_empty() {
            0
        } else {
            (self.number - 1) * self.per_page + 1
        }
    }

    /// 1-based index of the last item on this page, 0 when empty.
    pub fn end_index(&self) -> u64 {
        if self.object_list.is_empty() {
            0
        } else {
            self.start_index() + self.object_list.len() as u64 - 1
        }
    }

    pub fn page_range(&self) -> std::ops::RangeInclusive<u64> {
        1..=self.num_pages
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.object_list.iter()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            object_list: self.object_list.into_iter().map(f).collect(),
            number: self.number,
            num_pages: self.num_pages,
            count: self.count,
            per_page: self.per_page,
        }
    }
}

impl<'a, T> IntoIterator for &'a Page<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.object_list.iter()
    }
}

// Templates cannot call methods, so the derived values are serialized too.
impl<T: Serialize> Serialize for Page<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Page", 14)?;
        state.serialize_field("object_list", &self.object_list)?;
        state.serialize_field("number", &self.number)?;
        state.serialize_field("num_pages", &self.num_pages)?;
        state.serialize_field("count", &self.count)?;
        state.serialize_field("per_page", &self.per_page)?;
        state.serialize_field("has_next", &self.has_next())?;
        state.serialize_field("has_previous", &self.has_previous())?;
        state.serialize_field("has_other_pages", &self.has_other_pages())?;
        state.serialize_field("next_page_number", &self.next_page_number())?;
        state.serialize_field("previous_page_number", &self.previous_page_number())?;
        state.serialize_field("start_index", &self.start_index())?;
        state.serialize_field("end_index", &self.end_index())?;
        state.serialize_field("page_range", &self.page_range().collect::<Vec<_>>())?;
        state.serialize_field("len", &self.len())?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_of(count: u64, raw: Option<&str>) -> Page<u64> {
        let request = Paginator::default().get_page(count, raw);
        let items = (0..count)
            .skip(request.offset() as usize)
            .take(request.limit() as usize)
            .collect();
        request.into_page(items)
    }

    #[test]
    fn test_fifteen_items_split_ten_and_five() {
        let first = page_of(15, None);
        assert_eq!(first.len(), 10);
        assert_eq!(first.num_pages, 2);
        assert!(first.has_next());
        assert!(!first.has_previous());

        let second = page_of(15, Some("2"));
        assert_eq!(second.len(), 5);
        assert_eq!(second.start_index(), 11);
        assert_eq!(second.end_index(), 15);
        assert_eq!(second.previous_page_number(), Some(1));
        assert_eq!(second.next_page_number(), None);
    }

    #[test]
    fn test_empty_listing_has_one_empty_page() {
        let page = page_of(0, Some("1"));
        assert_eq!(page.num_pages, 1);
        assert!(page.is_empty());
        assert_eq!(page.start_index(), 0);
        assert!(!page.has_other_pages());
    }

    #[test]
    fn test_not_an_integer_gives_first_page() {
        assert_eq!(page_of(25, Some("abc")).number, 1);
        assert_eq!(page_of(25, Some("2.0")).number, 1);
        assert_eq!(page_of(25, Some("")).number, 1);
    }

    #[test]
    fn test_out_of_range_gives_last_page() {
        assert_eq!(page_of(25, Some("99")).number, 3);
        assert_eq!(page_of(25, Some("0")).number, 3);
        assert_eq!(page_of(25, Some("-1")).number, 3);
        assert_eq!(page_of(25, Some(" 2 ")).number, 2);
    }

    #[test]
    fn test_exact_multiple() {
        let paginator = Paginator::new(10);
        assert_eq!(paginator.num_pages(20), 2);
        assert_eq!(paginator.num_pages(21), 3);
        assert_eq!(paginator.get_page(20, Some("2")).offset(), 10);
    }

    #[test]
    fn test_serializes_derived_fields() {
        let page = page_of(15, Some("2"));
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["object_list"].as_array().unwrap().len(), 5);
        assert_eq!(json["has_previous"], true);
        assert_eq!(json["previous_page_number"], 1);
        assert!(json["next_page_number"].is_null());
        assert_eq!(json["page_range"], serde_json::json!([1, 2]));
        assert_eq!(json["len"], 5);
    }

    #[test]
    fn test_map_keeps_position() {
        let page = page_of(15, Some("2")).map(|n| n * 2);
        assert_eq!(page.number, 2);
        assert_eq!(page.object_list.first(), Some(&20));
        assert_eq!(page.page_range().count(), 2);
    }
}
