//! List table state: fetched rows plus search, tab filter, sort and paging.
//!
//! The table always holds the whole collection the backend returned. The
//! search text is sent as `q` and matched by the backend, which may match on
//! fields no column shows, so rows are never re-filtered by text here. Tab
//! filtering and pagination are views over the rows; nothing is patched in
//! place, a mutation is followed by a full reload.

use crate::consts::cli_consts::table::{PAGE_SIZE, search_debounce};
use crate::resources::{Resource, SortOrder, ViewContext};
use crate::ui::debounce::Debouncer;
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct TableRow<T> {
    pub entity: T,
    /// Display cells, computed once per load.
    pub cells: Vec<String>,
    pub status: Option<&'static str>,
}

impl<T> TableRow<T> {
    fn in_tab(&self, tab: Option<&str>) -> bool {
        tab.is_none_or(|tab| self.status == Some(tab))
    }
}

#[derive(Debug)]
pub struct ListTable<T> {
    rows: Vec<TableRow<T>>,
    /// Text in the search box, sent to the backend after the debounce delay.
    pub search_input: String,
    applied_search: String,
    /// The search box has keyboard focus.
    pub searching: bool,
    tabs: Vec<&'static str>,
    /// 0 is "all"; `i` selects `tabs[i - 1]`.
    tab: usize,
    /// 1-based.
    page: usize,
    /// Index within the current page.
    selected: usize,
    pub order: SortOrder,
    debouncer: Debouncer,
    pub loading: bool,
}

impl<T> Default for ListTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ListTable<T> {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            search_input: String::new(),
            applied_search: String::new(),
            searching: false,
            tabs: Vec::new(),
            tab: 0,
            page: 1,
            selected: 0,
            order: SortOrder::Desc,
            debouncer: Debouncer::new(search_debounce()),
            loading: false,
        }
    }

    pub fn with_tabs(mut self, tabs: Vec<&'static str>) -> Self {
        self.tabs = tabs;
        self
    }

    /// Starts with `search` already applied, skipping the debounce.
    pub fn with_search(mut self, search: &str) -> Self {
        self.search_input = search.to_string();
        self.applied_search = search.to_string();
        self
    }

    /// Jumps to a 1-based page, clamped to the pages that exist.
    pub fn go_to_page(&mut self, page: usize) {
        self.page = page.clamp(1, self.page_count());
        self.selected = 0;
    }

    /// Replaces the collection with a fresh load.
    pub fn set_rows<R>(&mut self, entities: Vec<T>, ctx: &ViewContext)
    where
        R: Resource<Entity = T>,
    {
        self.rows = entities
            .into_iter()
            .map(|entity| TableRow {
                cells: R::row(&entity, ctx),
                status: R::status(&entity),
                entity,
            })
            .collect();
        self.loading = false;
        self.clamp();
    }

    /// Back to page 1 when the current page no longer exists.
    fn clamp(&mut self) {
        if self.page > self.page_count() {
            self.page = 1;
            self.selected = 0;
        }
        let on_page = self.page_rows().len();
        if self.selected >= on_page {
            self.selected = on_page.saturating_sub(1);
        }
    }

    /// Every loaded row, ignoring the tab.
    pub fn rows(&self) -> &[TableRow<T>] {
        &self.rows
    }

    pub fn applied_search(&self) -> &str {
        &self.applied_search
    }

    pub fn tabs(&self) -> &[&'static str] {
        &self.tabs
    }

    pub fn active_tab(&self) -> usize {
        self.tab
    }

    fn tab_filter(&self) -> Option<&'static str> {
        self.tab.checked_sub(1).and_then(|i| self.tabs.get(i).copied())
    }

    /// Rows of the active tab.
    pub fn filtered_rows(&self) -> impl Iterator<Item = &TableRow<T>> {
        let tab = self.tab_filter();
        self.rows.iter().filter(move |row| row.in_tab(tab))
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered_rows().count()
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// Never zero, so an empty table still renders "1/1".
    pub fn page_count(&self) -> usize {
        self.filtered_len().div_ceil(PAGE_SIZE).max(1)
    }

    pub fn page_rows(&self) -> Vec<&TableRow<T>> {
        let start = (self.page - 1) * PAGE_SIZE;
        self.filtered_rows().skip(start).take(PAGE_SIZE).collect()
    }

    pub fn selected_index(&self) -> Option<usize> {
        (!self.page_rows().is_empty()).then_some(self.selected)
    }

    pub fn selected_row(&self) -> Option<&TableRow<T>> {
        self.page_rows().get(self.selected).copied()
    }

    pub fn select_next(&mut self) {
        let on_page = self.page_rows().len();
        if self.selected + 1 < on_page {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn next_page(&mut self) {
        if self.page < self.page_count() {
            self.page += 1;
            self.selected = 0;
        }
    }

    pub fn prev_page(&mut self) {
        if self.page > 1 {
            self.page -= 1;
            self.selected = 0;
        }
    }

    /// Cycles all → each tab → all.
    pub fn next_tab(&mut self) {
        if self.tabs.is_empty() {
            return;
        }
        self.tab = (self.tab + 1) % (self.tabs.len() + 1);
        self.page = 1;
        self.selected = 0;
    }

    pub fn type_search(&mut self, c: char, now: Instant) {
        self.search_input.push(c);
        self.debouncer.arm(now);
    }

    pub fn backspace_search(&mut self, now: Instant) {
        if self.search_input.pop().is_some() {
            self.debouncer.arm(now);
        }
    }

    /// Empties the box and drops any pending search. Returns whether the
    /// applied search changed, i.e. a reload is due.
    pub fn clear_search(&mut self) -> bool {
        self.debouncer.cancel();
        self.search_input.clear();
        self.searching = false;
        if self.applied_search.is_empty() {
            return false;
        }
        self.applied_search.clear();
        self.page = 1;
        self.selected = 0;
        true
    }

    /// Applies the typed search once the quiet period is over. Returns true
    /// when a reload is due.
    pub fn poll_search(&mut self, now: Instant) -> bool {
        if !self.debouncer.poll(now) || self.search_input == self.applied_search {
            return false;
        }
        self.applied_search = self.search_input.clone();
        self.page = 1;
        self.selected = 0;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Rol, Usuario, wire_names};
    use crate::resources::Usuarios;
    use crate::resources::test_support::admin;
    use std::time::Duration;

    fn usuarios(n: usize) -> Vec<Usuario> {
        (1..=n as i64)
            .map(|id| Usuario {
                id,
                username: format!("user{:02}", id),
                email: None,
                rol: if id % 2 == 0 { Rol::Contador } else { Rol::Cliente },
                activo: true,
            })
            .collect()
    }

    fn table(n: usize) -> ListTable<Usuario> {
        let mut table = ListTable::new().with_tabs(wire_names::<Rol>());
        table.set_rows::<Usuarios>(usuarios(n), &admin());
        table
    }

    #[test]
    fn twelve_rows_make_three_pages() {
        let mut table = table(12);
        assert_eq!(table.page_count(), 3);
        table.next_page();
        table.next_page();
        assert_eq!(table.page(), 3);
        assert_eq!(table.page_rows().len(), 2);
        table.next_page();
        assert_eq!(table.page(), 3);
    }

    #[test]
    fn empty_table_has_one_page() {
        let table = table(0);
        assert_eq!(table.page_count(), 1);
        assert!(table.page_rows().is_empty());
        assert!(table.selected_row().is_none());
    }

    #[test]
    fn reload_resets_out_of_range_page() {
        let mut table = table(12);
        table.next_page();
        table.next_page();
        table.set_rows::<Usuarios>(usuarios(6), &admin());
        assert_eq!(table.page(), 1);

        table.next_page();
        table.select_next();
        table.set_rows::<Usuarios>(usuarios(7), &admin());
        assert_eq!(table.page(), 2);
        assert_eq!(table.selected_row().map(|r| r.entity.id), Some(7));
    }

    #[test]
    fn search_applies_after_quiet_period() {
        let mut table = table(12);
        let start = Instant::now();
        for c in "user1".chars() {
            table.type_search(c, start);
        }
        assert!(!table.poll_search(start + Duration::from_millis(100)));
        assert_eq!(table.applied_search(), "");
        assert!(table.poll_search(start + Duration::from_millis(500)));
        assert_eq!(table.applied_search(), "user1");
    }

    #[test]
    fn rows_matched_by_the_backend_are_kept() {
        // The backend matched these on a field no column shows.
        let mut table = ListTable::new().with_search("20601234567");
        table.set_rows::<Usuarios>(usuarios(3), &admin());
        assert_eq!(table.filtered_len(), 3);
        assert_eq!(table.page_rows().len(), 3);
    }

    #[test]
    fn clearing_cancels_pending_search() {
        let mut table = table(3);
        let start = Instant::now();
        table.type_search('x', start);
        assert!(!table.clear_search());
        assert!(!table.poll_search(start + Duration::from_secs(1)));
        assert_eq!(table.filtered_len(), 3);
    }

    #[test]
    fn tabs_filter_by_status() {
        let mut table = table(12);
        table.next_tab();
        assert_eq!(table.tab_filter(), Some("ADMINISTRADOR"));
        assert_eq!(table.filtered_len(), 0);
        table.next_tab();
        assert_eq!(table.filtered_len(), 6);
        table.next_tab();
        table.next_tab();
        assert_eq!(table.active_tab(), 0);
        assert_eq!(table.filtered_len(), 12);
    }
}
