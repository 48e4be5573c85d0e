//! Instance registry.
//!
//! An instance is a named connection profile plus its live runtime state. The
//! registry is owned by a session and passed by reference; there is no global
//! instance table.

mod profile;

pub use profile::{ConnectionProfile, PasswordSource, SETTABLE_FIELDS, URL_SCHEME};

use crate::db::{Cursor, DriverConnection};
use std::collections::BTreeMap;

/// An open connection and the cursor derived from it.
///
/// Kept as one value so the connection and its session are always present or
/// absent together.
pub struct LiveHandles {
    /// Native connection, exclusively owned by the instance.
    pub connection: Box<dyn DriverConnection>,
    /// Cursor derived from `connection`.
    pub session: Box<dyn Cursor>,
}

/// Mutable per-instance runtime state.
#[derive(Default)]
pub struct InstanceState {
    handles: Option<LiveHandles>,
    /// Text of the most recently validated query.
    pub last_query: String,
    /// Most recent statement starting with `use `.
    pub last_use: String,
    /// Password typed at the prompt for this instance, if any.
    pub connect_pass: Option<String>,
}

impl InstanceState {
    /// Returns true while a connection is open.
    pub fn is_connected(&self) -> bool {
        self.handles.is_some()
    }

    /// Stores freshly opened handles.
    pub fn attach(&mut self, handles: LiveHandles) {
        self.handles = Some(handles);
    }

    /// Removes and returns the handles, leaving the instance disconnected.
    pub fn detach(&mut self) -> Option<LiveHandles> {
        self.handles.take()
    }

    /// The open cursor, if connected.
    pub fn session_mut(&mut self) -> Option<&mut (dyn Cursor + 'static)> {
        self.handles.as_mut().map(|h| h.session.as_mut())
    }
}

impl std::fmt::Debug for InstanceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstanceState")
            .field("connected", &self.is_connected())
            .field("last_query", &self.last_query)
            .field("last_use", &self.last_use)
            .field("connect_pass", &self.connect_pass.as_ref().map(|_| "****"))
            .finish()
    }
}

/// A named profile with its runtime state.
#[derive(Debug, Default)]
pub struct Instance {
    /// Connection profile.
    pub profile: ConnectionProfile,
    /// Runtime state.
    pub state: InstanceState,
}

impl Instance {
    /// Creates a disconnected instance from a profile.
    pub fn new(profile: ConnectionProfile) -> Self {
        Self {
            profile,
            state: InstanceState::default(),
        }
    }

    /// Whether a password must be available before connecting.
    pub fn requires_password(&self) -> bool {
        !self.profile.integrated_security()
    }
}

/// Owned map of instance name to instance.
#[derive(Debug, Default)]
pub struct InstanceRegistry {
    instances: BTreeMap<String, Instance>,
}

impl InstanceRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a profile. Replacing keeps any open connection.
    pub fn upsert(&mut self, name: impl Into<String>, profile: ConnectionProfile) {
        match self.instances.entry(name.into()) {
            std::collections::btree_map::Entry::Occupied(mut entry) => {
                entry.get_mut().profile = profile;
            }
            std::collections::btree_map::Entry::Vacant(entry) => {
                entry.insert(Instance::new(profile));
            }
        }
    }

    /// Looks up an instance.
    pub fn get(&self, name: &str) -> Option<&Instance> {
        self.instances.get(name)
    }

    /// Looks up an instance mutably.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Instance> {
        self.instances.get_mut(name)
    }

    /// Returns true if the instance exists.
    pub fn contains(&self, name: &str) -> bool {
        self.instances.contains_key(name)
    }

    /// Iterates over instances in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Instance)> {
        self.instances.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of registered instances.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Returns true if no instances are registered.
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}
