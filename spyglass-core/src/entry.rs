// Log entry model. Entries carry a typed severity, a rich-text message,
// and an optional stack trace. The display variant distinguishes plain
// entries, collapsed duplicate runs, and transient overlay entries without
// a class hierarchy.

use std::time::Instant;

use spyglass_ffi as ffi;

use crate::rich_text::RichText;

/// Log severity as reported by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LogType {
    Error,
    Assert,
    Warning,
    Log,
    Exception,
}

impl LogType {
    /// Decode a raw bridge code. Returns None for out-of-range codes.
    pub fn from_raw(raw: u8) -> Option<LogType> {
        match raw {
            ffi::LOG_TYPE_ERROR => Some(LogType::Error),
            ffi::LOG_TYPE_ASSERT => Some(LogType::Assert),
            ffi::LOG_TYPE_WARNING => Some(LogType::Warning),
            ffi::LOG_TYPE_LOG => Some(LogType::Log),
            ffi::LOG_TYPE_EXCEPTION => Some(LogType::Exception),
            _ => None,
        }
    }

    pub fn raw(self) -> u8 {
        match self {
            LogType::Error => ffi::LOG_TYPE_ERROR,
            LogType::Assert => ffi::LOG_TYPE_ASSERT,
            LogType::Warning => ffi::LOG_TYPE_WARNING,
            LogType::Log => ffi::LOG_TYPE_LOG,
            LogType::Exception => ffi::LOG_TYPE_EXCEPTION,
        }
    }

    /// Single-bit mask for this type.
    #[inline]
    pub fn mask(self) -> LogTypeMask {
        LogTypeMask(ffi::log_type_mask(self.raw()))
    }

    /// Exceptions, errors, and asserts all count as errors for badge display.
    pub fn is_error_class(self) -> bool {
        matches!(self, LogType::Error | LogType::Assert | LogType::Exception)
    }

    pub const ALL: [LogType; 5] = [
        LogType::Error,
        LogType::Assert,
        LogType::Warning,
        LogType::Log,
        LogType::Exception,
    ];
}

/// Explicit bit-set over log types, used by the per-type filter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LogTypeMask(pub u8);

impl LogTypeMask {
    pub const NONE: LogTypeMask = LogTypeMask(0);
    pub const ALL: LogTypeMask = LogTypeMask(ffi::LOG_TYPE_MASK_ALL);

    #[inline]
    pub fn contains(self, log_type: LogType) -> bool {
        self.0 & log_type.mask().0 != 0
    }

    #[inline]
    #[must_use]
    pub fn with(self, other: LogTypeMask) -> LogTypeMask {
        LogTypeMask(self.0 | other.0)
    }

    #[inline]
    #[must_use]
    pub fn without(self, other: LogTypeMask) -> LogTypeMask {
        LogTypeMask(self.0 & !other.0)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 & Self::ALL.0 == 0
    }
}

/// How an entry presents in a view.
#[derive(Clone, Debug, PartialEq)]
pub enum EntryDisplay {
    /// An ordinary entry.
    Plain,
    /// A run of consecutive duplicates merged into one row.
    /// `index` is the entry's view position at the time of the last merge.
    Collapsed { count: usize, index: usize },
    /// A transient overlay row, scheduled for removal once visible.
    Overlay { removal_deadline: Instant },
}

/// A single console log entry.
#[derive(Clone, Debug)]
pub struct LogEntry {
    pub log_type: LogType,
    pub message: RichText,
    pub stack_trace: Option<String>,
    display: EntryDisplay,
}

impl LogEntry {
    pub fn new(log_type: LogType, message: RichText, stack_trace: Option<String>) -> Self {
        LogEntry {
            log_type,
            message,
            stack_trace,
            display: EntryDisplay::Plain,
        }
    }

    /// Convert to a collapsed entry with an occurrence count of 1,
    /// recording the view position it was appended at.
    pub fn into_collapsed(mut self, index: usize) -> Self {
        self.display = EntryDisplay::Collapsed { count: 1, index };
        self
    }

    /// Derive a transient overlay copy of this entry (UI-owned).
    pub fn to_overlay(&self, removal_deadline: Instant) -> Self {
        LogEntry {
            log_type: self.log_type,
            message: self.message.clone(),
            stack_trace: self.stack_trace.clone(),
            display: EntryDisplay::Overlay { removal_deadline },
        }
    }

    #[inline]
    pub fn display(&self) -> &EntryDisplay {
        &self.display
    }

    /// Occurrence count: 1 unless collapsed.
    pub fn count(&self) -> usize {
        match self.display {
            EntryDisplay::Collapsed { count, .. } => count,
            _ => 1,
        }
    }

    /// Record another occurrence of a collapsed entry and refresh its
    /// view position. No-op for non-collapsed entries.
    pub fn record_repeat(&mut self, view_index: usize) {
        if let EntryDisplay::Collapsed { count, index } = &mut self.display {
            *count += 1;
            *index = view_index;
        }
    }

    /// Refresh the recorded view position of a collapsed entry.
    /// No-op for non-collapsed entries.
    pub fn record_view_index(&mut self, view_index: usize) {
        if let EntryDisplay::Collapsed { index, .. } = &mut self.display {
            *index = view_index;
        }
    }

    /// Drop collapse bookkeeping, reverting to a plain entry.
    pub fn uncollapse(&mut self) {
        if matches!(self.display, EntryDisplay::Collapsed { .. }) {
            self.display = EntryDisplay::Plain;
        }
    }

    pub fn has_stack_trace(&self) -> bool {
        self.stack_trace.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// Collapse equality: same severity and same plain message text.
    pub fn same_message(&self, other: &LogEntry) -> bool {
        self.log_type == other.log_type && self.message.text() == other.message.text()
    }
}
