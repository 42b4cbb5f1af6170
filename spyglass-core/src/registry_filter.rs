// Text-filtered view over an ActionRegistry. The filter keeps parallel
// id lists for the actions and variables currently visible, consumes
// registry events to keep them in sync, and re-emits events with indices
// translated into the filtered ordering. Hidden-flagged variables never
// appear regardless of the filter text.

use crate::cvar::{cvar_flags, CVar};
use crate::registry::{Action, ActionRegistry, RegistryEvent};

pub struct RegistryFilter {
    filter_text: String,
    filter_lower: String,
    action_ids: Vec<i32>,
    variable_ids: Vec<i32>,
}

impl RegistryFilter {
    pub fn new(registry: &ActionRegistry) -> Self {
        let mut filter = RegistryFilter {
            filter_text: String::new(),
            filter_lower: String::new(),
            action_ids: Vec::new(),
            variable_ids: Vec::new(),
        };
        filter.rebuild(registry);
        filter
    }

    #[inline]
    pub fn filter_text(&self) -> &str {
        &self.filter_text
    }

    #[inline]
    pub fn is_filtering(&self) -> bool {
        !self.filter_text.is_empty()
    }

    /// Change the filter text and rebuild the view. Returns false when the
    /// text is unchanged (no rebuild happens).
    pub fn set_filter_text(&mut self, registry: &ActionRegistry, text: &str) -> bool {
        if self.filter_text == text {
            return false;
        }
        self.filter_text = text.to_owned();
        self.filter_lower = text.to_lowercase();
        self.rebuild(registry);
        true
    }

    fn rebuild(&mut self, registry: &ActionRegistry) {
        self.action_ids = registry
            .actions()
            .iter()
            .filter(|a| self.matches(a.name()))
            .map(Action::id)
            .collect();
        self.variable_ids = registry
            .variables()
            .iter()
            .filter(|v| self.shows_variable(v))
            .map(CVar::id)
            .collect();
    }

    fn matches(&self, name: &str) -> bool {
        self.filter_lower.is_empty() || name.to_lowercase().contains(&self.filter_lower)
    }

    fn shows_variable(&self, cvar: &CVar) -> bool {
        !cvar.has_flag(cvar_flags::HIDDEN) && self.matches(cvar.name())
    }

    /// Fold a registry event into the view. Returns the event re-indexed
    /// into filtered positions when the view is affected, None otherwise.
    pub fn handle_event(
        &mut self,
        registry: &ActionRegistry,
        event: &RegistryEvent,
    ) -> Option<RegistryEvent> {
        match event {
            RegistryEvent::ActionAdded { id, index } => {
                let action = registry.action_at(*index)?;
                if !self.matches(action.name()) {
                    return None;
                }
                let filtered = self.filtered_action_index(registry, *index);
                self.action_ids.insert(filtered, *id);
                Some(RegistryEvent::ActionAdded {
                    id: *id,
                    index: filtered,
                })
            }
            RegistryEvent::ActionRemoved { id, name, index: _ } => {
                let filtered = self.action_ids.iter().position(|a| a == id)?;
                self.action_ids.remove(filtered);
                Some(RegistryEvent::ActionRemoved {
                    id: *id,
                    name: name.clone(),
                    index: filtered,
                })
            }
            RegistryEvent::VariableRegistered { id, index } => {
                let cvar = registry.variable_at(*index)?;
                if !self.shows_variable(cvar) {
                    return None;
                }
                let filtered = self.filtered_variable_index(registry, *index);
                self.variable_ids.insert(filtered, *id);
                Some(RegistryEvent::VariableRegistered {
                    id: *id,
                    index: filtered,
                })
            }
            RegistryEvent::VariableChanged { id, index: _ } => {
                let filtered = self.variable_ids.iter().position(|v| v == id)?;
                Some(RegistryEvent::VariableChanged {
                    id: *id,
                    index: filtered,
                })
            }
        }
    }

    /// Filtered position for a registry action index: the number of
    /// visible actions that precede it in registry order.
    fn filtered_action_index(&self, registry: &ActionRegistry, index: usize) -> usize {
        registry.actions()[..index]
            .iter()
            .filter(|a| self.matches(a.name()))
            .count()
    }

    fn filtered_variable_index(&self, registry: &ActionRegistry, index: usize) -> usize {
        registry.variables()[..index]
            .iter()
            .filter(|v| self.shows_variable(v))
            .count()
    }

    pub fn action_count(&self) -> usize {
        self.action_ids.len()
    }

    pub fn variable_count(&self) -> usize {
        self.variable_ids.len()
    }

    pub fn action_at<'r>(&self, registry: &'r ActionRegistry, index: usize) -> Option<&'r Action> {
        let id = *self.action_ids.get(index)?;
        registry.find_action(id)
    }

    pub fn variable_at<'r>(&self, registry: &'r ActionRegistry, index: usize) -> Option<&'r CVar> {
        let id = *self.variable_ids.get(index)?;
        registry.find_variable(id)
    }
}
