// Action/variable registry: tracks the remote-controllable actions and
// cvars the game registers over the bridge, keeps them optionally sorted
// by name, and publishes change events to listener callbacks held by
// explicit handles (the registry equivalent of the console's listeners).

use crate::cvar::CVar;
use crate::error::{ConsoleError, ConsoleResult};
use crate::sorted_list::{SortKey, SortedList};

/// A remote-invokable action registered by the game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Action {
    id: i32,
    name: String,
}

impl Action {
    pub fn new(id: i32, name: impl Into<String>) -> Self {
        Action {
            id,
            name: name.into(),
        }
    }

    #[inline]
    pub fn id(&self) -> i32 {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl SortKey for Action {
    fn sort_key(&self) -> &str {
        &self.name
    }
}

/// Change events published to registry listeners. Indices are positions
/// in the registry's current (possibly sorted) order; removal events
/// carry the pre-removal index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegistryEvent {
    ActionAdded { id: i32, index: usize },
    ActionRemoved { id: i32, name: String, index: usize },
    VariableRegistered { id: i32, index: usize },
    VariableChanged { id: i32, index: usize },
}

/// Identifies a registered listener callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RegistryListenerHandle(u64);

// Callback boxes carry Send so the registry can live behind the bridge's
// global mutex.
type RegistryCallback = Box<dyn FnMut(&ActionRegistry, &RegistryEvent) + Send>;

pub struct ActionRegistry {
    actions: SortedList<Action>,
    variables: SortedList<CVar>,
    listeners: Vec<(u64, RegistryCallback)>,
    next_listener_id: u64,
}

impl ActionRegistry {
    pub fn new(sort_actions: bool, sort_variables: bool) -> Self {
        ActionRegistry {
            actions: SortedList::new(sort_actions),
            variables: SortedList::new(sort_variables),
            listeners: Vec::new(),
            next_listener_id: 1,
        }
    }

    // -----------------------------------------------------------------
    // Actions
    // -----------------------------------------------------------------

    /// Register an action. A duplicate id is a no-op returning None;
    /// otherwise returns the index the action landed at.
    pub fn register_action(&mut self, id: i32, name: &str) -> Option<usize> {
        if self.find_action(id).is_some() {
            return None;
        }
        let index = self.actions.add(Action::new(id, name));
        self.dispatch(RegistryEvent::ActionAdded { id, index });
        Some(index)
    }

    /// Remove an action by id. Unknown ids return false.
    pub fn unregister_action(&mut self, id: i32) -> bool {
        let Some(index) = self.actions.iter().position(|a| a.id() == id) else {
            return false;
        };
        let removed = self.actions.remove_at(index);
        if let Some(action) = removed {
            self.dispatch(RegistryEvent::ActionRemoved {
                id,
                name: action.name().to_owned(),
                index,
            });
        }
        true
    }

    pub fn find_action(&self, id: i32) -> Option<&Action> {
        self.actions.iter().find(|a| a.id() == id)
    }

    pub fn action_at(&self, index: usize) -> Option<&Action> {
        self.actions.get(index)
    }

    pub fn actions(&self) -> &[Action] {
        self.actions.as_slice()
    }

    pub fn action_count(&self) -> usize {
        self.actions.len()
    }

    pub fn set_action_sorting_enabled(&mut self, enabled: bool) {
        self.actions.set_sorting_enabled(enabled);
    }

    // -----------------------------------------------------------------
    // Variables
    // -----------------------------------------------------------------

    /// Register a variable. A duplicate id is a no-op returning None.
    pub fn register_variable(&mut self, cvar: CVar) -> Option<usize> {
        if self.find_variable(cvar.id()).is_some() {
            return None;
        }
        let id = cvar.id();
        let index = self.variables.add(cvar);
        self.dispatch(RegistryEvent::VariableRegistered { id, index });
        Some(index)
    }

    /// Update a variable's value in place, returning its current index.
    /// The sort key is the name, so a value change never moves the
    /// variable; listeners are notified with that same index.
    pub fn set_variable_value(&mut self, id: i32, value: &str) -> ConsoleResult<usize> {
        let Some(index) = self.variables.iter().position(|v| v.id() == id) else {
            return Err(ConsoleError::UnknownId(id));
        };
        let variable = self
            .variables
            .get_mut(index)
            .ok_or(ConsoleError::UnknownId(id))?;
        if !variable.set_value(value) {
            return Err(ConsoleError::InvalidValue(value.to_owned()));
        }
        self.dispatch(RegistryEvent::VariableChanged { id, index });
        Ok(index)
    }

    pub fn find_variable(&self, id: i32) -> Option<&CVar> {
        self.variables.iter().find(|v| v.id() == id)
    }

    pub fn variable_at(&self, index: usize) -> Option<&CVar> {
        self.variables.get(index)
    }

    pub fn variables(&self) -> &[CVar] {
        self.variables.as_slice()
    }

    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    pub fn set_variable_sorting_enabled(&mut self, enabled: bool) {
        self.variables.set_sorting_enabled(enabled);
    }

    // -----------------------------------------------------------------
    // Listeners
    // -----------------------------------------------------------------

    pub fn add_listener(
        &mut self,
        listener: impl FnMut(&ActionRegistry, &RegistryEvent) + Send + 'static,
    ) -> RegistryListenerHandle {
        let id = self.next_listener_id;
        self.next_listener_id += 1;
        self.listeners.push((id, Box::new(listener)));
        RegistryListenerHandle(id)
    }

    pub fn remove_listener(&mut self, handle: RegistryListenerHandle) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(id, _)| *id != handle.0);
        self.listeners.len() != before
    }

    /// Drop all actions, variables, and listeners.
    pub fn clear(&mut self) {
        self.actions.clear();
        self.variables.clear();
        self.listeners.clear();
    }

    /// Take-execute-replace, as in the console dispatch: callbacks see the
    /// registry immutably while the listener list is moved out.
    fn dispatch(&mut self, event: RegistryEvent) {
        let mut listeners = std::mem::take(&mut self.listeners);
        for (_, listener) in listeners.iter_mut() {
            listener(self, &event);
        }
        listeners.extend(self.listeners.drain(..));
        self.listeners = listeners;
    }
}
