//! Page navigation control under the users table.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::theme::Theme;

/// How many page numbers are shown around the current page.
const WINDOW: u32 = 5;

/// Presenter over the current page and the page count reported by the
/// service. Navigation methods return the requested page, or `None` when it
/// falls outside `1..=total_pages`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    current_page: u32,
    total_pages: u32,
}

impl Pagination {
    pub fn new(current_page: u32, total_pages: u32) -> Self {
        Self { current_page, total_pages }
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn previous(&self) -> Option<u32> {
        self.go_to(self.current_page.saturating_sub(1))
    }

    pub fn next(&self) -> Option<u32> {
        self.go_to(self.current_page.saturating_add(1))
    }

    pub fn first(&self) -> Option<u32> {
        self.go_to(1)
    }

    pub fn last(&self) -> Option<u32> {
        self.go_to(self.total_pages)
    }

    pub fn go_to(&self, page: u32) -> Option<u32> {
        (1..=self.total_pages).contains(&page).then_some(page)
    }

    /// Page numbers to show, centred on the current page where possible.
    pub fn window(&self) -> std::ops::RangeInclusive<u32> {
        if self.total_pages == 0 {
            return 1..=0;
        }
        let span = WINDOW.min(self.total_pages);
        let start = self
            .current_page
            .saturating_sub(span / 2)
            .clamp(1, self.total_pages - span + 1);
        start..=start + span - 1
    }

    pub fn render(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let enabled = Style::default().fg(theme.text);
        let disabled = Style::default().fg(theme.muted);
        let mut spans = vec![Span::styled(
            "◀ Previous",
            if self.has_previous() { enabled } else { disabled },
        )];
        spans.push(Span::raw("  "));
        for page in self.window() {
            if page == self.current_page {
                spans.push(Span::styled(
                    format!("[{page}]"),
                    Style::default()
                        .fg(theme.highlight_fg)
                        .add_modifier(Modifier::BOLD),
                ));
            } else {
                spans.push(Span::styled(format!(" {page} "), enabled));
            }
        }
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            "Next ▶",
            if self.has_next() { enabled } else { disabled },
        ));
        let p = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
        f.render_widget(p, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_stays_in_range() {
        let p = Pagination::new(1, 3);
        assert_eq!(p.previous(), None);
        assert_eq!(p.next(), Some(2));
        assert_eq!(p.first(), Some(1));
        assert_eq!(p.last(), Some(3));
        assert_eq!(p.go_to(0), None);
        assert_eq!(p.go_to(4), None);

        let end = Pagination::new(3, 3);
        assert!(!end.has_next());
        assert_eq!(end.next(), None);
        assert_eq!(end.previous(), Some(2));
    }

    #[test]
    fn window_is_clamped_to_page_count() {
        assert_eq!(Pagination::new(1, 2).window(), 1..=2);
        assert_eq!(Pagination::new(1, 10).window(), 1..=5);
        assert_eq!(Pagination::new(6, 10).window(), 4..=8);
        assert_eq!(Pagination::new(10, 10).window(), 6..=10);
    }

    #[test]
    fn empty_result_has_no_pages() {
        let p = Pagination::new(1, 0);
        assert!(p.window().is_empty());
        assert_eq!(p.last(), None);
        assert!(!p.has_next());
    }
}
