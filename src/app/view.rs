//! Shared view state: the page being looked at and the active search text.
//!
//! Independent of server data. Constructed explicitly and owned by
//! [`crate::app::AppState`]; nothing here is global.

/// Current page number (1-indexed) and search query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewState {
    current_page: u32,
    search_query: String,
}

impl ViewState {
    pub fn new() -> Self {
        Self {
            current_page: 1,
            search_query: String::new(),
        }
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Set the current page. Page numbers start at 1; lower values are raised.
    pub fn set_current_page(&mut self, page: u32) {
        self.current_page = page.max(1);
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    pub fn push_search_char(&mut self, c: char) {
        self.search_query.push(c);
    }

    pub fn pop_search_char(&mut self) {
        self.search_query.pop();
    }

    pub fn clear_search(&mut self) {
        self.search_query.clear();
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_first_page_without_query() {
        let view = ViewState::new();
        assert_eq!(view.current_page(), 1);
        assert_eq!(view.search_query(), "");
    }

    #[test]
    fn page_zero_is_raised_to_one() {
        let mut view = ViewState::new();
        view.set_current_page(0);
        assert_eq!(view.current_page(), 1);
        view.set_current_page(4);
        assert_eq!(view.current_page(), 4);
    }

    #[test]
    fn instances_are_isolated() {
        let mut a = ViewState::new();
        let b = ViewState::new();
        a.set_search_query("jan");
        a.push_search_char('e');
        assert_eq!(a.search_query(), "jane");
        assert_eq!(b.search_query(), "");
        a.pop_search_char();
        a.clear_search();
        assert_eq!(a, b);
    }
}
