//! Connection manager: opens and closes instance connections.

use super::{build_connection_string, redact_connection_string, ConnectResult, KeywordSet};
use crate::db::Driver;
use crate::error::Result;
use crate::instance::{Instance, InstanceRegistry, LiveHandles};
use crate::secrets;
use tracing::{debug, info, warn};

/// Opens and closes connections for instances in a registry.
pub struct ConnectionManager {
    driver: Box<dyn Driver>,
    keywords: KeywordSet,
}

impl ConnectionManager {
    /// Creates a manager over the given driver.
    pub fn new(driver: Box<dyn Driver>, keywords: KeywordSet) -> Self {
        Self { driver, keywords }
    }

    /// The keyword set used for connection strings.
    pub fn keywords(&self) -> KeywordSet {
        self.keywords
    }

    /// Switches the keyword set for subsequent connects.
    pub fn set_keywords(&mut self, keywords: KeywordSet) {
        self.keywords = keywords;
    }

    /// Connects the named instance.
    ///
    /// The password is taken from the instance's prompted password, then its
    /// profile, then the `default_instance`. Any open connection on the
    /// instance is replaced. After a successful connect a recorded `use`
    /// statement is replayed so the database context survives reconnects.
    pub fn connect(
        &self,
        registry: &mut InstanceRegistry,
        name: &str,
        default_instance: &str,
    ) -> ConnectResult {
        if !registry.contains(name) {
            warn!("Instance {} not found in instances - Connection Failed", name);
            return ConnectResult::NotFound;
        }

        let connection_string = match self.prepare_connection_string(registry, name, default_instance)
        {
            Ok(s) => s,
            Err(e) => {
                warn!("Unable to build connection string for {}: {}", name, e);
                return ConnectResult::DriverError(e.to_string());
            }
        };
        debug!(
            "Connecting {} with {}",
            name,
            redact_connection_string(&connection_string)
        );

        let Some(instance) = registry.get_mut(name) else {
            return ConnectResult::NotFound;
        };
        self.disconnect_instance(name, instance);

        let mut connection = match self.driver.connect(&connection_string, true) {
            Ok(c) => c,
            Err(e) => {
                warn!("Unable to connect {}: {}", name, e);
                return ConnectResult::DriverError(e.detail());
            }
        };
        let session = match connection.cursor() {
            Ok(s) => s,
            Err(e) => {
                warn!("Unable to open a cursor for {}: {}", name, e);
                if let Err(close_err) = connection.close() {
                    debug!("Ignoring close error for {}: {}", name, close_err);
                }
                return ConnectResult::DriverError(e.detail());
            }
        };

        instance.state.attach(LiveHandles {
            connection,
            session,
        });
        info!("Connected instance {}", name);

        replay_last_use(name, instance);
        ConnectResult::Ok
    }

    /// Disconnects the named instance. Unknown or already closed instances are a no-op.
    pub fn disconnect(&self, registry: &mut InstanceRegistry, name: &str) {
        if let Some(instance) = registry.get_mut(name) {
            self.disconnect_instance(name, instance);
        }
    }

    fn disconnect_instance(&self, name: &str, instance: &mut Instance) {
        if let Some(mut handles) = instance.state.detach() {
            if let Err(e) = handles.connection.close() {
                debug!("Ignoring close error for {}: {}", name, e);
            }
            info!("Disconnected instance {}", name);
        }
    }

    /// Returns true if a password can be resolved for the instance without prompting.
    pub fn has_password(&self, registry: &InstanceRegistry, name: &str, default_instance: &str) -> bool {
        matches!(
            password_for(registry, name, default_instance),
            Ok(Some(_))
        )
    }

    fn prepare_connection_string(
        &self,
        registry: &mut InstanceRegistry,
        name: &str,
        default_instance: &str,
    ) -> Result<String> {
        let integrated = self.keywords.supports_integrated_security()
            && registry
                .get(name)
                .is_some_and(|i| i.profile.integrated_security());

        let password = if integrated {
            None
        } else {
            password_for(registry, name, default_instance)?
        };

        let Some(instance) = registry.get_mut(name) else {
            return Ok(String::new());
        };
        let connection_string =
            build_connection_string(&instance.profile, password.as_deref(), self.keywords);

        // The full keyword set treats the prompted password as single-use.
        if self.keywords == KeywordSet::Full {
            instance.state.connect_pass = None;
        }
        Ok(connection_string)
    }
}

/// Resolves the password for `name`, falling back to the default instance.
fn password_for(
    registry: &InstanceRegistry,
    name: &str,
    default_instance: &str,
) -> Result<Option<String>> {
    if let Some(password) = own_password(registry.get(name))? {
        return Ok(Some(password));
    }
    if name != default_instance {
        if let Some(password) = own_password(registry.get(default_instance))? {
            debug!("Using password of default instance {} for {}", default_instance, name);
            return Ok(Some(password));
        }
    }
    Ok(None)
}

fn own_password(instance: Option<&Instance>) -> Result<Option<String>> {
    let Some(instance) = instance else {
        return Ok(None);
    };
    if let Some(pass) = instance.state.connect_pass.as_ref().filter(|p| !p.is_empty()) {
        return Ok(Some(pass.clone()));
    }
    match &instance.profile.password {
        Some(source) => secrets::resolve_password(source).map(Some),
        None => Ok(None),
    }
}

fn replay_last_use(name: &str, instance: &mut Instance) {
    if instance.state.last_use.is_empty() {
        return;
    }
    let statement = instance.state.last_use.clone();
    if let Some(session) = instance.state.session_mut() {
        match session.execute(&statement) {
            Ok(()) => debug!("Restored context on {} with '{}'", name, statement),
            Err(e) => warn!("Failed to restore '{}' on {}: {}", statement, name, e),
        }
    }
}
