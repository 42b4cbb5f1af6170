// Console facade: the log-entry store plus change notifications for the
// UI layer. Listeners are held by explicit handles with defined lifetime
// (no weak-reference delegate pattern): register returns a handle, the
// owner unregisters it when its view goes away.

use std::ops::Range;

use crate::entry::{LogEntry, LogType, LogTypeMask};
use crate::entry_list::{AddOutcome, LogEntryList};
use crate::error::ConsoleResult;
use crate::rich_text::RichText;

/// Identifies a registered [`ConsoleListener`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ConsoleListenerHandle(u64);

/// Change notifications mirroring the store's data-source contract.
/// `trimmed` is the running total of entries evicted by overflow trims.
pub trait ConsoleListener {
    /// A row was appended at `index` (view index).
    fn on_entry_added(&mut self, console: &Console, index: usize, trimmed: usize);

    /// The collapsed row at `index` absorbed a repeat.
    fn on_entry_updated(&mut self, console: &Console, index: usize, trimmed: usize);

    /// `range` view rows were evicted from the front by an overflow trim.
    fn on_entries_removed(&mut self, _console: &Console, _range: Range<usize>) {}

    /// The console was cleared.
    fn on_cleared(&mut self, _console: &Console) {}
}

// Listener boxes carry Send so the console can live behind the bridge's
// global mutex.
type ListenerBox = Box<dyn ConsoleListener + Send>;

pub struct Console {
    entries: LogEntryList,
    listeners: Vec<(u64, ListenerBox)>,
    next_listener_id: u64,
}

impl Console {
    /// Contract: `capacity > 0`, `1 <= trim_count <= capacity`.
    pub fn new(capacity: usize, trim_count: usize) -> Self {
        Console {
            entries: LogEntryList::new(capacity, trim_count),
            listeners: Vec::new(),
            next_listener_id: 1,
        }
    }

    /// The underlying store (read-only data source for the UI).
    #[inline]
    pub fn entries(&self) -> &LogEntryList {
        &self.entries
    }

    pub fn add_listener(&mut self, listener: ListenerBox) -> ConsoleListenerHandle {
        let id = self.next_listener_id;
        self.next_listener_id += 1;
        self.listeners.push((id, listener));
        ConsoleListenerHandle(id)
    }

    /// Returns false when the handle was already removed.
    pub fn remove_listener(&mut self, handle: ConsoleListenerHandle) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(id, _)| *id != handle.0);
        self.listeners.len() != before
    }

    /// Store a log message and notify listeners: evicted rows first, then
    /// the added or updated row (unless the filter swallowed it).
    pub fn log_message(
        &mut self,
        message: RichText,
        stack_trace: Option<String>,
        log_type: LogType,
    ) -> AddOutcome {
        let outcome = self
            .entries
            .add_entry(LogEntry::new(log_type, message, stack_trace));
        if outcome.trimmed_rows > 0 {
            let range = 0..outcome.trimmed_rows;
            self.dispatch(|listener, console| {
                listener.on_entries_removed(console, range.clone());
            });
        }
        if let Some(index) = outcome.index {
            let trimmed = self.entries.trimmed_count();
            if outcome.updated {
                self.dispatch(|listener, console| {
                    listener.on_entry_updated(console, index, trimmed);
                });
            } else {
                self.dispatch(|listener, console| {
                    listener.on_entry_added(console, index, trimmed);
                });
            }
        }
        outcome
    }

    pub fn entry_at(&self, index: usize) -> ConsoleResult<&LogEntry> {
        self.entries.entry_at(index)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.dispatch(|listener, console| listener.on_cleared(console));
    }

    // Filter mutators pass through to the store; the caller reloads its
    // view when a change is reported, so no notification is dispatched.

    pub fn set_filter_text(&mut self, text: &str) -> bool {
        self.entries.set_filter_text(text)
    }

    pub fn set_filter_type(&mut self, log_type: LogType, disabled: bool) -> bool {
        self.entries.set_filter_type(log_type, disabled)
    }

    pub fn set_filter_type_mask(&mut self, mask: LogTypeMask, disabled: bool) -> bool {
        self.entries.set_filter_type_mask(mask, disabled)
    }

    pub fn set_collapsed(&mut self, collapsed: bool) -> bool {
        self.entries.set_collapsed(collapsed)
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.entries.count()
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

    pub fn text(&self) -> String {
        self.entries.text()
    }

    /// Take-execute-replace: listeners run against `&Console` with the
    /// listener list moved out, so a callback reading the console never
    /// aliases the mutable borrow that delivered it.
    fn dispatch(&mut self, mut f: impl FnMut(&mut dyn ConsoleListener, &Console)) {
        let mut listeners = std::mem::take(&mut self.listeners);
        for (_, listener) in listeners.iter_mut() {
            f(listener.as_mut(), self);
        }
        listeners.extend(self.listeners.drain(..));
        self.listeners = listeners;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, PartialEq, Clone)]
    enum Event {
        Added(usize, usize),
        Updated(usize, usize),
        Removed(Range<usize>),
        Cleared,
    }

    struct Recorder(Arc<Mutex<Vec<Event>>>);

    impl ConsoleListener for Recorder {
        fn on_entry_added(&mut self, _console: &Console, index: usize, trimmed: usize) {
            self.0.lock().unwrap().push(Event::Added(index, trimmed));
        }
        fn on_entry_updated(&mut self, _console: &Console, index: usize, trimmed: usize) {
            self.0.lock().unwrap().push(Event::Updated(index, trimmed));
        }
        fn on_entries_removed(&mut self, _console: &Console, range: Range<usize>) {
            self.0.lock().unwrap().push(Event::Removed(range));
        }
        fn on_cleared(&mut self, _console: &Console) {
            self.0.lock().unwrap().push(Event::Cleared);
        }
    }

    fn recorded(console: &mut Console) -> Arc<Mutex<Vec<Event>>> {
        let events = Arc::new(Mutex::new(Vec::new()));
        console.add_listener(Box::new(Recorder(events.clone())));
        events
    }

    #[test]
    fn add_notifies_listeners() {
        let mut console = Console::new(8, 2);
        let events = recorded(&mut console);
        console.log_message(RichText::plain("hello"), None, LogType::Log);
        assert_eq!(*events.lock().unwrap(), vec![Event::Added(0, 0)]);
    }

    #[test]
    fn collapse_repeat_notifies_update() {
        let mut console = Console::new(8, 2);
        console.set_collapsed(true);
        let events = recorded(&mut console);
        console.log_message(RichText::plain("tick"), None, LogType::Log);
        console.log_message(RichText::plain("tick"), None, LogType::Log);
        assert_eq!(
            *events.lock().unwrap(),
            vec![Event::Added(0, 0), Event::Updated(0, 0)]
        );
    }

    #[test]
    fn overflow_notifies_removed_range_before_add() {
        let mut console = Console::new(2, 2);
        let events = recorded(&mut console);
        console.log_message(RichText::plain("a"), None, LogType::Log);
        console.log_message(RichText::plain("b"), None, LogType::Log);
        console.log_message(RichText::plain("c"), None, LogType::Log);
        assert_eq!(
            *events.lock().unwrap(),
            vec![
                Event::Added(0, 0),
                Event::Added(1, 0),
                Event::Removed(0..2),
                Event::Added(0, 2),
            ]
        );
    }

    #[test]
    fn filtered_out_message_adds_silently() {
        let mut console = Console::new(8, 2);
        console.set_filter_text("match");
        let events = recorded(&mut console);
        let outcome = console.log_message(RichText::plain("other"), None, LogType::Log);
        assert_eq!(outcome.index, None);
        assert!(events.lock().unwrap().is_empty());
        assert_eq!(console.total_count(), 1);
    }

    #[test]
    fn clear_notifies() {
        let mut console = Console::new(8, 2);
        let events = recorded(&mut console);
        console.log_message(RichText::plain("x"), None, LogType::Log);
        console.clear();
        assert_eq!(
            *events.lock().unwrap(),
            vec![Event::Added(0, 0), Event::Cleared]
        );
        assert_eq!(console.count(), 0);
    }

    #[test]
    fn removed_listener_stops_receiving() {
        let mut console = Console::new(8, 2);
        let events = Arc::new(Mutex::new(Vec::new()));
        let handle = console.add_listener(Box::new(Recorder(events.clone())));
        assert!(console.remove_listener(handle));
        assert!(!console.remove_listener(handle));
        console.log_message(RichText::plain("x"), None, LogType::Log);
        assert!(events.lock().unwrap().is_empty());
    }
}
