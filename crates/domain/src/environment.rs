//! Workspace environments.
//!
//! Every environment carries its own request tree, auth presets and
//! variables, plus a base URL that relative request URLs resolve against.
//! The default environment always exists and cannot be deleted.

use crate::auth::{AuthStore, NO_AUTH_KEY};
use crate::error::{DomainError, DomainResult};
use crate::tree::RequestTree;
use crate::variables::VariableScope;

/// Environment identifier. Non-negative for user environments.
pub type EnvironmentId = i32;

/// The reserved id of the always-present default environment.
pub const DEFAULT_ENVIRONMENT_ID: EnvironmentId = -1;

/// One workspace environment and everything scoped to it.
#[derive(Debug, Clone)]
pub struct Environment {
    /// Stable identifier.
    pub id: EnvironmentId,
    /// Display name.
    pub name: String,
    /// Base URL that relative request URLs are joined against.
    pub base_url: String,
    /// Auth key applied to requests that do not pick their own.
    pub default_auth_key: String,
    /// Auth presets of this environment.
    pub auth: AuthStore,
    /// Variables of this environment.
    pub variables: VariableScope,
    /// The request tree of this environment.
    pub tree: RequestTree,
}

impl Environment {
    /// A fresh empty environment.
    #[must_use]
    pub fn new(id: EnvironmentId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            base_url: String::new(),
            default_auth_key: NO_AUTH_KEY.to_string(),
            auth: AuthStore::new(),
            variables: VariableScope::new(),
            tree: RequestTree::new(),
        }
    }
}

/// All environments of a workspace plus the active selection.
#[derive(Debug, Clone)]
pub struct EnvironmentStore {
    environments: std::collections::BTreeMap<EnvironmentId, Environment>,
    selected: EnvironmentId,
}

impl Default for EnvironmentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvironmentStore {
    /// A store containing only the default environment, selected.
    #[must_use]
    pub fn new() -> Self {
        let mut environments = std::collections::BTreeMap::new();
        environments.insert(
            DEFAULT_ENVIRONMENT_ID,
            Environment::new(DEFAULT_ENVIRONMENT_ID, "Default"),
        );
        Self {
            environments,
            selected: DEFAULT_ENVIRONMENT_ID,
        }
    }

    /// The environments in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Environment> {
        self.environments.values()
    }

    /// Number of environments, the default included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.environments.len()
    }

    /// Never true: the default environment always exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.environments.is_empty()
    }

    /// The selected environment's id.
    #[must_use]
    pub const fn selected_id(&self) -> EnvironmentId {
        self.selected
    }

    /// The selected environment.
    #[must_use]
    pub fn selected(&self) -> &Environment {
        if let Some(environment) = self.environments.get(&self.selected) {
            return environment;
        }
        // the default environment is created in new() and never removed
        match self.environments.get(&DEFAULT_ENVIRONMENT_ID) {
            Some(environment) => environment,
            None => unreachable!("default environment always present"),
        }
    }

    /// Mutable access to the selected environment.
    pub fn selected_mut(&mut self) -> &mut Environment {
        let id = if self.environments.contains_key(&self.selected) {
            self.selected
        } else {
            DEFAULT_ENVIRONMENT_ID
        };
        self.environments
            .entry(id)
            .or_insert_with(|| Environment::new(DEFAULT_ENVIRONMENT_ID, "Default"))
    }

    /// Looks up an environment by id.
    #[must_use]
    pub fn get(&self, id: EnvironmentId) -> Option<&Environment> {
        self.environments.get(&id)
    }

    /// Mutable lookup by id.
    pub fn get_mut(&mut self, id: EnvironmentId) -> Option<&mut Environment> {
        self.environments.get_mut(&id)
    }

    /// Switches the selection.
    pub fn select(&mut self, id: EnvironmentId) -> DomainResult<()> {
        if !self.environments.contains_key(&id) {
            return Err(DomainError::UnknownEnvironment(id));
        }
        self.selected = id;
        Ok(())
    }

    /// Creates an empty environment under the smallest free non-negative
    /// id and returns it.
    pub fn create(&mut self, name: impl Into<String>) -> EnvironmentId {
        let id = self.next_free_id();
        self.environments.insert(id, Environment::new(id, name));
        id
    }

    /// Deep-copies an environment under a fresh id with a suffixed name.
    pub fn clone_environment(&mut self, id: EnvironmentId) -> DomainResult<EnvironmentId> {
        let source = self
            .environments
            .get(&id)
            .ok_or(DomainError::UnknownEnvironment(id))?;
        let mut copy = source.clone();
        copy.id = self.next_free_id();
        copy.name = format!("{} (Copy)", copy.name);
        let new_id = copy.id;
        self.environments.insert(new_id, copy);
        Ok(new_id)
    }

    /// Renames an environment.
    pub fn rename(&mut self, id: EnvironmentId, name: impl Into<String>) -> DomainResult<()> {
        let environment = self
            .environments
            .get_mut(&id)
            .ok_or(DomainError::UnknownEnvironment(id))?;
        environment.name = name.into();
        Ok(())
    }

    /// Deletes an environment. The default environment is reserved; if the
    /// deleted environment was selected, selection falls back to the
    /// default.
    pub fn delete(&mut self, id: EnvironmentId) -> DomainResult<()> {
        if id == DEFAULT_ENVIRONMENT_ID {
            return Err(DomainError::DefaultEnvironmentReserved);
        }
        if self.environments.remove(&id).is_none() {
            return Err(DomainError::UnknownEnvironment(id));
        }
        if self.selected == id {
            self.selected = DEFAULT_ENVIRONMENT_ID;
        }
        Ok(())
    }

    /// Re-inserts a fully hydrated environment, as the persistence layer
    /// does when loading.
    pub fn restore(&mut self, environment: Environment) {
        self.environments.insert(environment.id, environment);
    }

    fn next_free_id(&self) -> EnvironmentId {
        let mut id = 0;
        while self.environments.contains_key(&id) {
            id += 1;
        }
        id
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_environment_always_present() {
        let store = EnvironmentStore::new();
        assert_eq!(store.selected_id(), DEFAULT_ENVIRONMENT_ID);
        assert_eq!(store.selected().name, "Default");
    }

    #[test]
    fn test_create_uses_smallest_free_id() {
        let mut store = EnvironmentStore::new();
        assert_eq!(store.create("staging"), 0);
        assert_eq!(store.create("prod"), 1);
        store.delete(0).unwrap();
        assert_eq!(store.create("dev"), 0);
    }

    #[test]
    fn test_delete_default_is_refused() {
        let mut store = EnvironmentStore::new();
        assert_eq!(
            store.delete(DEFAULT_ENVIRONMENT_ID).unwrap_err(),
            DomainError::DefaultEnvironmentReserved
        );
    }

    #[test]
    fn test_delete_selected_falls_back_to_default() {
        let mut store = EnvironmentStore::new();
        let id = store.create("staging");
        store.select(id).unwrap();
        store.delete(id).unwrap();
        assert_eq!(store.selected_id(), DEFAULT_ENVIRONMENT_ID);
    }

    #[test]
    fn test_clone_copies_content_under_fresh_id() {
        let mut store = EnvironmentStore::new();
        let id = store.create("staging");
        if let Some(env) = store.get_mut(id) {
            env.variables.set("k", "v");
        }
        let copy = store.clone_environment(id).unwrap();
        assert_ne!(copy, id);
        let cloned = store.get(copy).unwrap();
        assert_eq!(cloned.name, "staging (Copy)");
        assert_eq!(cloned.variables.get("k"), Some("v"));
    }

    #[test]
    fn test_select_unknown_fails() {
        let mut store = EnvironmentStore::new();
        assert_eq!(
            store.select(9).unwrap_err(),
            DomainError::UnknownEnvironment(9)
        );
    }
}
