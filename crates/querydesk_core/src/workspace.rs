use crate::sort::SortState;
use crate::tab::{DraftRow, Tab, TabId};
use crate::traits::ConnectionId;

/// Owns the ordered collection of open tabs and the active-tab pointer.
///
/// Pure list/state operations only; everything that talks to a backend
/// lives on the `Engine`. Tabs keep their relative order across closes.
#[derive(Default)]
pub struct Workspace {
    tabs: Vec<Tab>,
    active: Option<TabId>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a tab and make it active.
    pub fn open(&mut self, tab: Tab) -> TabId {
        let id = tab.id;
        self.tabs.push(tab);
        self.active = Some(id);
        id
    }

    /// Close a tab. When the active tab is closed, the tab occupying the
    /// last position of the remaining sequence becomes active; closing the
    /// only tab leaves no active tab.
    pub fn close(&mut self, id: TabId) -> bool {
        let Some(idx) = self.index_of(id) else {
            return false;
        };

        self.tabs.remove(idx);

        if self.active == Some(id) {
            self.active = self.tabs.last().map(|t| t.id);
        }
        true
    }

    pub fn close_all(&mut self) {
        self.tabs.clear();
        self.active = None;
    }

    /// Close every tab to the right of `id`, keeping `id` itself.
    pub fn close_right_of(&mut self, id: TabId) -> bool {
        let Some(idx) = self.index_of(id) else {
            return false;
        };

        self.tabs.truncate(idx + 1);

        let active_still_open = self
            .active
            .is_some_and(|active| self.index_of(active).is_some());
        if !active_still_open {
            self.active = self.tabs.last().map(|t| t.id);
        }
        true
    }

    pub fn activate(&mut self, id: TabId) -> bool {
        if self.index_of(id).is_none() {
            return false;
        }
        self.active = Some(id);
        true
    }

    pub fn active_id(&self) -> Option<TabId> {
        self.active
    }

    pub fn active_tab(&self) -> Option<&Tab> {
        self.active.and_then(|id| self.tab(id))
    }

    pub fn tab(&self, id: TabId) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == id)
    }

    pub fn tab_mut(&mut self, id: TabId) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|t| t.id == id)
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn rename(&mut self, id: TabId, title: impl Into<String>) {
        if let Some(tab) = self.tab_mut(id) {
            tab.title = title.into();
        }
    }

    pub fn set_statement(&mut self, id: TabId, statement: impl Into<String>) {
        if let Some(tab) = self.tab_mut(id) {
            tab.statement = statement.into();
        }
    }

    pub fn set_connection(&mut self, id: TabId, connection_id: Option<ConnectionId>) {
        if let Some(tab) = self.tab_mut(id) {
            tab.connection_id = connection_id;
        }
    }

    /// Advance the tab's tri-state sort cycle for a column click.
    ///
    /// Mutates only the sort state; stored rows are reordered at render
    /// time so later "load more" appends stay correct.
    pub fn set_sort(&mut self, id: TabId, column: &str) {
        if let Some(tab) = self.tab_mut(id) {
            tab.sort = Some(SortState::advanced(tab.sort.as_ref(), column));
        }
    }

    // --- Draft row authoring ---

    pub fn begin_draft(&mut self, id: TabId) {
        if let Some(tab) = self.tab_mut(id) {
            if tab.draft.is_none() {
                tab.draft = Some(DraftRow::new());
            }
        }
    }

    pub fn set_draft_value(&mut self, id: TabId, column: &str, raw: &str) {
        if let Some(tab) = self.tab_mut(id) {
            if let Some(draft) = tab.draft.as_mut() {
                draft.set(column, raw);
            }
        }
    }

    pub fn cancel_draft(&mut self, id: TabId) {
        if let Some(tab) = self.tab_mut(id) {
            tab.draft = None;
        }
    }

    /// Detach the draft for commit; the tab leaves authoring mode either way.
    pub(crate) fn take_draft(&mut self, id: TabId) -> Option<DraftRow> {
        self.tab_mut(id).and_then(|tab| tab.draft.take())
    }

    fn index_of(&self, id: TabId) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == id)
    }
}
