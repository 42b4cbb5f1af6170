// The log-entry store: bounded entry sequence with text/type filtering,
// duplicate collapsing, and O(1) per-class badge counts.
//
// The filtered view is a list of indices into the backing sequence. When an
// overflow trim evicts the oldest entries, the indices shift down by the
// batch size; evicted view rows surface as `trimmed_rows` so the UI can
// drop them before handling the new row.

use crate::bounded_list::BoundedList;
use crate::entry::{LogEntry, LogType, LogTypeMask};
use crate::error::ConsoleResult;

/// What a single add did to the visible view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddOutcome {
    /// View index of the added or updated row; None when the active filter
    /// rejected the entry.
    pub index: Option<usize>,
    /// True when a collapsed row was updated in place instead of appended.
    pub updated: bool,
    /// View rows evicted from the front by the overflow trim this add.
    pub trimmed_rows: usize,
}

pub struct LogEntryList {
    entries: BoundedList<LogEntry>,
    filter_text: String,
    enabled_types: LogTypeMask,
    collapsed: bool,
    /// Present exactly while a text or type filter is active.
    filtered: Option<Vec<usize>>,
    log_count: usize,
    warning_count: usize,
    error_count: usize,
}

impl LogEntryList {
    /// Contract: `capacity > 0`, `1 <= trim_count <= capacity`.
    pub fn new(capacity: usize, trim_count: usize) -> Self {
        LogEntryList {
            entries: BoundedList::new(capacity, trim_count),
            filter_text: String::new(),
            enabled_types: LogTypeMask::ALL,
            collapsed: false,
            filtered: None,
            log_count: 0,
            warning_count: 0,
            error_count: 0,
        }
    }

    /// Add an entry. With collapsing enabled, a repeat of the most recent
    /// *visible* entry updates that row in place; otherwise the entry is
    /// appended and run through the active filter.
    pub fn add_entry(&mut self, entry: LogEntry) -> AddOutcome {
        self.bump_class_count(entry.log_type);

        if self.collapsed {
            if let Some((full_index, view_index)) = self.last_visible() {
                let matched = self
                    .entries
                    .get(full_index)
                    .is_ok_and(|last| last.same_message(&entry));
                if matched {
                    if let Ok(last) = self.entries.get_mut(full_index) {
                        last.record_repeat(view_index);
                    }
                    return AddOutcome {
                        index: Some(view_index),
                        updated: true,
                        trimmed_rows: 0,
                    };
                }
            }
        }

        let entry = if self.collapsed {
            entry.into_collapsed(0)
        } else {
            entry
        };
        let visible = self.passes_filter(&entry);

        let trimmed_before = self.entries.trimmed_count();
        self.entries.add(entry);
        let trim_delta = self.entries.trimmed_count() - trimmed_before;

        let trimmed_rows = match &mut self.filtered {
            Some(indices) if trim_delta > 0 => {
                let before = indices.len();
                indices.retain(|&full| full >= trim_delta);
                for full in indices.iter_mut() {
                    *full -= trim_delta;
                }
                before - indices.len()
            }
            Some(_) => 0,
            None => trim_delta,
        };

        let full_index = self.entries.count() - 1;
        let view_index = match &mut self.filtered {
            Some(indices) => {
                if visible {
                    indices.push(full_index);
                    Some(indices.len() - 1)
                } else {
                    None
                }
            }
            None => Some(full_index),
        };

        if let Some(view) = view_index {
            if let Ok(stored) = self.entries.get_mut(full_index) {
                stored.record_view_index(view);
            }
        }

        AddOutcome {
            index: view_index,
            updated: false,
            trimmed_rows,
        }
    }

    /// Entry at a view index. Out of range fails fast, never clamps.
    pub fn entry_at(&self, index: usize) -> ConsoleResult<&LogEntry> {
        match &self.filtered {
            Some(indices) => {
                let full = *indices.get(index).ok_or(
                    crate::error::ConsoleError::IndexOutOfRange {
                        index,
                        count: indices.len(),
                    },
                )?;
                self.entries.get(full)
            }
            None => self.entries.get(index),
        }
    }

    /// Drop every entry and reset all counters; filters and the collapse
    /// flag stay in effect.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.log_count = 0;
        self.warning_count = 0;
        self.error_count = 0;
        self.rebuild_filtered();
    }

    // -----------------------------------------------------------------
    // Filters
    // -----------------------------------------------------------------

    /// Set the free-text filter. Returns whether the filter changed; an
    /// empty string restores the unfiltered view.
    pub fn set_filter_text(&mut self, text: &str) -> bool {
        if self.filter_text == text {
            return false;
        }
        self.filter_text = text.to_owned();
        self.rebuild_filtered();
        true
    }

    /// Enable or disable a single log type. Returns whether the mask changed.
    pub fn set_filter_type(&mut self, log_type: LogType, disabled: bool) -> bool {
        self.set_filter_type_mask(log_type.mask(), disabled)
    }

    /// Enable or disable every type in `mask` at once.
    pub fn set_filter_type_mask(&mut self, mask: LogTypeMask, disabled: bool) -> bool {
        let updated = if disabled {
            self.enabled_types.without(mask)
        } else {
            self.enabled_types.with(mask)
        };
        if updated == self.enabled_types {
            return false;
        }
        self.enabled_types = updated;
        self.rebuild_filtered();
        true
    }

    pub fn is_filter_type_enabled(&self, log_type: LogType) -> bool {
        self.enabled_types.contains(log_type)
    }

    #[inline]
    pub fn filter_text(&self) -> &str {
        &self.filter_text
    }

    #[inline]
    pub fn is_filtering(&self) -> bool {
        self.filtered.is_some()
    }

    // -----------------------------------------------------------------
    // Collapse mode
    // -----------------------------------------------------------------

    /// Toggle duplicate collapsing. Enabling merges consecutive duplicate
    /// runs already retained; disabling drops the collapse bookkeeping but
    /// keeps every row. Returns whether the mode changed.
    pub fn set_collapsed(&mut self, collapsed: bool) -> bool {
        if self.collapsed == collapsed {
            return false;
        }
        self.collapsed = collapsed;
        if collapsed {
            let mut merged: Vec<LogEntry> = Vec::with_capacity(self.entries.count());
            for entry in self.entries.iter() {
                let next_index = merged.len();
                match merged.last_mut() {
                    Some(last) if last.same_message(entry) => {
                        last.record_repeat(next_index - 1);
                    }
                    _ => {
                        merged.push(entry.clone().into_collapsed(next_index));
                    }
                }
            }
            self.entries.replace_retained(merged);
        } else {
            for entry in self.entries.iter_mut() {
                entry.uncollapse();
            }
        }
        self.rebuild_filtered();
        true
    }

    #[inline]
    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    // -----------------------------------------------------------------
    // Counts
    // -----------------------------------------------------------------

    /// Visible entry count (filtered view when a filter is active).
    pub fn count(&self) -> usize {
        match &self.filtered {
            Some(indices) => indices.len(),
            None => self.entries.count(),
        }
    }

    #[inline]
    pub fn total_count(&self) -> usize {
        self.entries.total_count()
    }

    #[inline]
    pub fn trimmed_count(&self) -> usize {
        self.entries.trimmed_count()
    }

    #[inline]
    pub fn is_trimmed(&self) -> bool {
        self.entries.is_trimmed()
    }

    #[inline]
    pub fn is_overflowing(&self) -> bool {
        self.entries.is_overflowing()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    #[inline]
    pub fn trim_count(&self) -> usize {
        self.entries.trim_count()
    }

    /// Messages received with plain log severity, maintained incrementally.
    #[inline]
    pub fn log_count(&self) -> usize {
        self.log_count
    }

    #[inline]
    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    /// Errors, asserts, and exceptions combined.
    #[inline]
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    // -----------------------------------------------------------------
    // Export
    // -----------------------------------------------------------------

    /// Render every visible entry into one plain-text blob (share/copy).
    pub fn text(&self) -> String {
        let mut out = String::new();
        let count = self.count();
        for index in 0..count {
            if let Ok(entry) = self.entry_at(index) {
                out.push_str(entry.message.text());
                if entry.has_stack_trace() {
                    if let Some(trace) = &entry.stack_trace {
                        out.push('\n');
                        out.push_str(trace);
                    }
                }
                if index + 1 < count {
                    out.push('\n');
                }
            }
        }
        out
    }

    // -----------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------

    /// Full-list and view index of the most recent visible entry.
    fn last_visible(&self) -> Option<(usize, usize)> {
        match &self.filtered {
            Some(indices) => {
                let full = *indices.last()?;
                Some((full, indices.len() - 1))
            }
            None => {
                if self.entries.is_empty() {
                    None
                } else {
                    let last = self.entries.count() - 1;
                    Some((last, last))
                }
            }
        }
    }

    fn passes_filter(&self, entry: &LogEntry) -> bool {
        if !self.enabled_types.contains(entry.log_type) {
            return false;
        }
        if self.filter_text.is_empty() {
            return true;
        }
        entry
            .message
            .text()
            .to_lowercase()
            .contains(&self.filter_text.to_lowercase())
    }

    fn has_filters(&self) -> bool {
        !self.filter_text.is_empty() || self.enabled_types != LogTypeMask::ALL
    }

    fn rebuild_filtered(&mut self) {
        if self.has_filters() {
            let indices: Vec<usize> = self
                .entries
                .iter()
                .enumerate()
                .filter(|(_, entry)| self.passes_filter(entry))
                .map(|(full, _)| full)
                .collect();
            self.filtered = Some(indices);
        } else {
            self.filtered = None;
        }
    }

    fn bump_class_count(&mut self, log_type: LogType) {
        if log_type.is_error_class() {
            self.error_count += 1;
        } else if log_type == LogType::Warning {
            self.warning_count += 1;
        } else {
            self.log_count += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::EntryDisplay;
    use crate::rich_text::RichText;

    fn entry(log_type: LogType, text: &str) -> LogEntry {
        LogEntry::new(log_type, RichText::plain(text), None)
    }

    fn visible_texts(list: &LogEntryList) -> Vec<String> {
        (0..list.count())
            .map(|i| list.entry_at(i).unwrap().message.text().to_owned())
            .collect()
    }

    #[test]
    fn add_returns_view_indices() {
        let mut list = LogEntryList::new(16, 4);
        let a = list.add_entry(entry(LogType::Log, "a"));
        let b = list.add_entry(entry(LogType::Log, "b"));
        assert_eq!(a.index, Some(0));
        assert_eq!(b.index, Some(1));
        assert!(!a.updated);
        assert_eq!(list.count(), 2);
    }

    #[test]
    fn trim_scenario_capacity_5_trim_2() {
        let mut list = LogEntryList::new(5, 2);
        for i in 0..7 {
            list.add_entry(entry(LogType::Log, &format!("m{i}")));
        }
        assert_eq!(list.count(), 5);
        assert_eq!(list.total_count(), 7);
        assert_eq!(list.trimmed_count(), 2);
        assert_eq!(visible_texts(&list), vec!["m2", "m3", "m4", "m5", "m6"]);
    }

    #[test]
    fn trim_reports_removed_view_rows() {
        let mut list = LogEntryList::new(3, 2);
        for i in 0..3 {
            list.add_entry(entry(LogType::Log, &format!("m{i}")));
        }
        let outcome = list.add_entry(entry(LogType::Log, "m3"));
        assert_eq!(outcome.trimmed_rows, 2);
        assert_eq!(outcome.index, Some(1));
    }

    #[test]
    fn text_filter_builds_subsequence() {
        let mut list = LogEntryList::new(16, 4);
        list.add_entry(entry(LogType::Log, "Loading level"));
        list.add_entry(entry(LogType::Log, "player spawned"));
        list.add_entry(entry(LogType::Log, "Level complete"));
        assert!(list.set_filter_text("level"));
        assert!(list.is_filtering());
        assert_eq!(visible_texts(&list), vec!["Loading level", "Level complete"]);
        // Case-insensitive match on add.
        let outcome = list.add_entry(entry(LogType::Log, "LEVEL up"));
        assert_eq!(outcome.index, Some(2));
        let outcome = list.add_entry(entry(LogType::Log, "nothing"));
        assert_eq!(outcome.index, None);
        assert_eq!(list.count(), 3);
        assert_eq!(list.total_count(), 5);
    }

    #[test]
    fn empty_text_restores_full_view() {
        let mut list = LogEntryList::new(16, 4);
        list.add_entry(entry(LogType::Log, "a"));
        list.add_entry(entry(LogType::Log, "b"));
        assert!(list.set_filter_text("a"));
        assert_eq!(list.count(), 1);
        assert!(list.set_filter_text(""));
        assert!(!list.is_filtering());
        assert_eq!(list.count(), 2);
    }

    #[test]
    fn setting_same_filter_twice_reports_unchanged() {
        let mut list = LogEntryList::new(16, 4);
        list.add_entry(entry(LogType::Log, "a"));
        assert!(list.set_filter_text("a"));
        let before = visible_texts(&list);
        assert!(!list.set_filter_text("a"));
        assert_eq!(visible_texts(&list), before);
    }

    #[test]
    fn type_filter_masks_entries() {
        let mut list = LogEntryList::new(16, 4);
        list.add_entry(entry(LogType::Log, "info"));
        list.add_entry(entry(LogType::Warning, "warn"));
        list.add_entry(entry(LogType::Error, "err"));
        assert!(list.set_filter_type(LogType::Log, true));
        assert_eq!(visible_texts(&list), vec!["warn", "err"]);
        assert!(list.is_filter_type_enabled(LogType::Warning));
        assert!(!list.is_filter_type_enabled(LogType::Log));
        // Disabling again is a no-op.
        assert!(!list.set_filter_type(LogType::Log, true));
    }

    #[test]
    fn all_types_disabled_yields_empty_view() {
        let mut list = LogEntryList::new(16, 4);
        list.add_entry(entry(LogType::Log, "present"));
        assert!(list.set_filter_type_mask(LogTypeMask::ALL, true));
        assert_eq!(list.count(), 0);
        assert!(list.set_filter_text("present"));
        assert_eq!(list.count(), 0);
        let outcome = list.add_entry(entry(LogType::Log, "present"));
        assert_eq!(outcome.index, None);
    }

    #[test]
    fn collapse_merges_consecutive_duplicates() {
        let mut list = LogEntryList::new(16, 4);
        list.set_collapsed(true);
        list.add_entry(entry(LogType::Log, "tick"));
        let second = list.add_entry(entry(LogType::Log, "tick"));
        let third = list.add_entry(entry(LogType::Log, "tick"));
        assert!(second.updated && third.updated);
        assert_eq!(third.index, Some(0));
        assert_eq!(list.count(), 1);
        assert_eq!(list.entry_at(0).unwrap().count(), 3);
        // A different message breaks the run.
        list.add_entry(entry(LogType::Log, "tock"));
        list.add_entry(entry(LogType::Log, "tick"));
        assert_eq!(list.count(), 3);
        assert_eq!(list.entry_at(2).unwrap().count(), 1);
    }

    #[test]
    fn collapse_ignores_type_mismatches() {
        let mut list = LogEntryList::new(16, 4);
        list.set_collapsed(true);
        list.add_entry(entry(LogType::Log, "same"));
        let outcome = list.add_entry(entry(LogType::Warning, "same"));
        assert!(!outcome.updated);
        assert_eq!(list.count(), 2);
    }

    #[test]
    fn collapse_checks_only_most_recent_visible_entry() {
        // Documented behavior: with a filter active, a repeat is matched
        // against the last entry that *passed* the filter, not the true
        // last entry.
        let mut list = LogEntryList::new(16, 4);
        list.set_collapsed(true);
        list.add_entry(entry(LogType::Log, "match me"));
        list.set_filter_text("match");
        // Filtered out, so invisible.
        list.add_entry(entry(LogType::Log, "hidden"));
        // Matches the last *visible* entry and collapses into it even
        // though "hidden" arrived in between.
        let outcome = list.add_entry(entry(LogType::Log, "match me"));
        assert!(outcome.updated);
        assert_eq!(outcome.index, Some(0));
        assert_eq!(list.entry_at(0).unwrap().count(), 2);
    }

    #[test]
    fn enabling_collapse_merges_existing_runs() {
        let mut list = LogEntryList::new(16, 4);
        list.add_entry(entry(LogType::Log, "a"));
        list.add_entry(entry(LogType::Log, "a"));
        list.add_entry(entry(LogType::Log, "b"));
        list.add_entry(entry(LogType::Log, "a"));
        assert!(list.set_collapsed(true));
        assert_eq!(visible_texts(&list), vec!["a", "b", "a"]);
        assert_eq!(list.entry_at(0).unwrap().count(), 2);
        assert!(matches!(
            list.entry_at(0).unwrap().display(),
            EntryDisplay::Collapsed { count: 2, index: 0 }
        ));
        // Totals are history, not visible rows.
        assert_eq!(list.total_count(), 4);

        assert!(list.set_collapsed(false));
        assert_eq!(list.entry_at(0).unwrap().count(), 1);
        assert!(matches!(
            list.entry_at(0).unwrap().display(),
            EntryDisplay::Plain
        ));
    }

    #[test]
    fn class_counts_track_arrivals() {
        let mut list = LogEntryList::new(4, 2);
        list.add_entry(entry(LogType::Log, "l"));
        list.add_entry(entry(LogType::Warning, "w"));
        list.add_entry(entry(LogType::Error, "e"));
        list.add_entry(entry(LogType::Assert, "a"));
        list.add_entry(entry(LogType::Exception, "x"));
        assert_eq!(list.log_count(), 1);
        assert_eq!(list.warning_count(), 1);
        assert_eq!(list.error_count(), 3);
        list.clear();
        assert_eq!(list.log_count(), 0);
        assert_eq!(list.error_count(), 0);
        assert_eq!(list.count(), 0);
        assert_eq!(list.total_count(), 0);
    }

    #[test]
    fn clear_keeps_active_filter() {
        let mut list = LogEntryList::new(8, 2);
        list.set_filter_text("x");
        list.clear();
        assert!(list.is_filtering());
        let outcome = list.add_entry(entry(LogType::Log, "y"));
        assert_eq!(outcome.index, None);
    }

    #[test]
    fn entry_at_out_of_range_fails() {
        let mut list = LogEntryList::new(8, 2);
        list.add_entry(entry(LogType::Log, "only"));
        assert!(list.entry_at(0).is_ok());
        assert!(list.entry_at(1).is_err());
        list.set_filter_text("nomatch");
        assert!(list.entry_at(0).is_err());
    }

    #[test]
    fn text_export_renders_visible_entries() {
        let mut list = LogEntryList::new(8, 2);
        list.add_entry(entry(LogType::Log, "first"));
        list.add_entry(LogEntry::new(
            LogType::Error,
            RichText::plain("boom"),
            Some("at main()".into()),
        ));
        assert_eq!(list.text(), "first\nboom\nat main()");
        list.set_filter_text("boom");
        assert_eq!(list.text(), "boom\nat main()");
    }

    #[test]
    fn filter_survives_trimming() {
        let mut list = LogEntryList::new(4, 2);
        list.set_filter_text("keep");
        list.add_entry(entry(LogType::Log, "keep 0"));
        list.add_entry(entry(LogType::Log, "drop 1"));
        list.add_entry(entry(LogType::Log, "keep 2"));
        list.add_entry(entry(LogType::Log, "drop 3"));
        // Overflows: "keep 0" and "drop 1" evicted, one visible row lost.
        let outcome = list.add_entry(entry(LogType::Log, "keep 4"));
        assert_eq!(outcome.trimmed_rows, 1);
        assert_eq!(visible_texts(&list), vec!["keep 2", "keep 4"]);
    }
}
