//! Interactive session: the entry point for line commands and cells.
//!
//! A session owns the instance registry, the connection manager and the
//! session options. Every failure is turned into a [`CommandOutput`] or a
//! result enum so one bad query or connect never ends the session.

use crate::commands::{parse_line, CommandOutput, LineCommand, HELP_TEXT};
use crate::config::{Config, SessionOptions};
use crate::connection::{ConnectResult, ConnectionManager};
use crate::db::Driver;
use crate::instance::{ConnectionProfile, InstanceRegistry, PasswordSource};
use crate::query::{validate_query, ExecutionResult, QueryExecutor, QueryOutcome, Validation};
use crate::secrets::{mask_secret, PasswordPrompt};
use tracing::{debug, info, warn};

/// One notebook session.
pub struct Session {
    registry: InstanceRegistry,
    manager: ConnectionManager,
    options: SessionOptions,
    prompt: Box<dyn PasswordPrompt>,
}

impl Session {
    /// Builds a session from configuration.
    pub fn new(config: Config, driver: Box<dyn Driver>, prompt: Box<dyn PasswordPrompt>) -> Self {
        let mut registry = InstanceRegistry::new();
        for (name, profile) in config.instances {
            registry.upsert(name, profile);
        }
        let manager = ConnectionManager::new(driver, config.options.keywords);
        info!(
            "Session started with {} instance(s), default instance {}",
            registry.len(),
            config.options.conn_default
        );

        Self {
            registry,
            manager,
            options: config.options,
            prompt,
        }
    }

    /// The instance registry.
    pub fn registry(&self) -> &InstanceRegistry {
        &self.registry
    }

    /// Current session options.
    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Name of the instance used when none is given.
    pub fn default_instance(&self) -> &str {
        &self.options.conn_default
    }

    /// Adds or replaces an instance profile.
    pub fn add_instance(&mut self, name: impl Into<String>, profile: ConnectionProfile) {
        let name = name.into();
        debug!("Registering instance {}: {}", name, profile.display_string());
        self.registry.upsert(name, profile);
    }

    /// Returns true if the named instance has an open connection.
    pub fn is_connected(&self, name: &str) -> bool {
        self.registry
            .get(name)
            .is_some_and(|i| i.state.is_connected())
    }

    /// Connects the named instance, prompting for a password when one is
    /// required and none can be resolved.
    pub fn connect(&mut self, name: &str) -> ConnectResult {
        let Some(instance) = self.registry.get(name) else {
            warn!("Instance {} not found in instances - Connection Failed", name);
            return ConnectResult::NotFound;
        };

        let needs_password = instance.requires_password()
            || !self.manager.keywords().supports_integrated_security();
        if needs_password
            && !self
                .manager
                .has_password(&self.registry, name, &self.options.conn_default)
        {
            self.prompt_password(name);
        }

        let result = self
            .manager
            .connect(&mut self.registry, name, &self.options.conn_default);
        if let ConnectResult::DriverError(msg) = &result {
            warn!("Unable to connect Error: {}", msg);
        }
        result
    }

    fn prompt_password(&mut self, name: &str) {
        match self.prompt.prompt(name) {
            Ok(Some(password)) => {
                if let Some(instance) = self.registry.get_mut(name) {
                    instance.state.connect_pass = Some(password);
                }
            }
            Ok(None) => debug!("No password entered for {}", name),
            Err(e) => warn!("Password prompt failed for {}: {}", name, e),
        }
    }

    /// Closes the named instance's connection. Never fails.
    pub fn disconnect(&mut self, name: &str) {
        self.manager.disconnect(&mut self.registry, name);
    }

    /// Closes every open connection.
    pub fn disconnect_all(&mut self) {
        let names: Vec<String> = self
            .registry
            .iter()
            .filter(|(_, i)| i.state.is_connected())
            .map(|(n, _)| n.to_string())
            .collect();
        for name in names {
            self.disconnect(&name);
        }
    }

    /// Validates `query` against the named instance's history.
    ///
    /// Returns `None` for an unknown instance.
    pub fn validate_query(&mut self, name: &str, query: &str) -> Option<Validation> {
        let instance = self.registry.get_mut(name)?;
        Some(validate_query(&mut instance.state, query))
    }

    /// Runs `query` on the named instance's open session.
    pub fn run_query(&mut self, name: &str, query: &str) -> QueryOutcome {
        self.execute(name, query).outcome
    }

    /// Runs `query` and reports its timing alongside the outcome.
    pub fn execute(&mut self, name: &str, query: &str) -> ExecutionResult {
        match self.registry.get_mut(name) {
            Some(instance) => {
                QueryExecutor::new(name, &mut instance.state, self.options.debug).execute(query)
            }
            None => ExecutionResult {
                outcome: QueryOutcome::Error(format!("instance {name} is not connected")),
                execution_time: std::time::Duration::ZERO,
            },
        }
    }

    /// Runs a cell: `line` names the instance (default instance when blank)
    /// and `cell` holds the SQL.
    pub fn handle_cell(&mut self, cell: &str, line: &str) -> CommandOutput {
        let name = match line.trim() {
            "" => self.options.conn_default.clone(),
            other => other.to_string(),
        };
        if cell.trim().is_empty() {
            return CommandOutput::info(HELP_TEXT);
        }
        let query = cell;

        if !self.registry.contains(&name) {
            return CommandOutput::error(format!(
                "Instance {name} not found in instances - Connection Failed"
            ));
        }

        if !self.is_connected(&name) {
            let result = self.connect(&name);
            if !result.is_ok() {
                return CommandOutput::error(result.to_string());
            }
        }

        let mut outputs = Vec::new();
        let Some(validation) = self.validate_query(&name, query) else {
            return CommandOutput::error(format!("Instance {name} not found"));
        };
        if validation.rerun {
            debug!("Rerunning previous query on {}", name);
        }
        for warning in &validation.warnings {
            outputs.push(CommandOutput::warning(warning.message()));
        }
        if !validation.allowed {
            outputs.push(CommandOutput::error("Query not allowed"));
            return CommandOutput::multiple(outputs);
        }

        let result = self.execute(&name, query);
        let status = result.outcome.status();
        let (table, total_rows) = match result.outcome {
            QueryOutcome::Rows(table) => {
                let total = table.row_count();
                let (shown, truncated) = table.truncated(self.options.max_rows);
                if truncated {
                    debug!(
                        "Showing {} of {} rows from {}",
                        shown.row_count(),
                        total,
                        name
                    );
                }
                (Some(shown), total)
            }
            _ => (None, 0),
        };

        outputs.push(CommandOutput::QueryResult {
            instance: name,
            status,
            table,
            total_rows,
            duration: result.execution_time,
        });
        CommandOutput::multiple(outputs)
    }

    /// Runs a line command.
    pub fn handle_line(&mut self, line: &str) -> CommandOutput {
        let command = match parse_line(line) {
            Ok(command) => command,
            Err(e) => return CommandOutput::error(e.to_string()),
        };
        debug!("Line command: {:?}", command);

        match command {
            LineCommand::Help => CommandOutput::info(HELP_TEXT),
            LineCommand::ListInstances => self.list_instances(),
            LineCommand::ShowOptions => {
                let rows = self
                    .options
                    .entries()
                    .into_iter()
                    .map(|(k, v)| vec![k, v])
                    .collect();
                CommandOutput::table(vec!["option".into(), "value".into()], rows)
            }
            LineCommand::Add { name, url } => match ConnectionProfile::from_url(&url) {
                Ok(profile) => {
                    let summary = profile.display_string();
                    self.add_instance(name.clone(), profile);
                    CommandOutput::info(format!("Instance {name} set to {summary}"))
                }
                Err(e) => CommandOutput::error(e.to_string()),
            },
            LineCommand::Connect { name } => {
                let name = name.unwrap_or_else(|| self.options.conn_default.clone());
                match self.connect(&name) {
                    ConnectResult::Ok => CommandOutput::info(format!("Connected to {name}")),
                    ConnectResult::NotFound => CommandOutput::error(format!(
                        "Instance {name} not found in instances - Connection Failed"
                    )),
                    err @ ConnectResult::DriverError(_) => CommandOutput::error(err.to_string()),
                }
            }
            LineCommand::Disconnect { name } => {
                let name = name.unwrap_or_else(|| self.options.conn_default.clone());
                if !self.registry.contains(&name) {
                    return CommandOutput::error(format!("Instance {name} not found"));
                }
                self.disconnect(&name);
                CommandOutput::info(format!("Disconnected {name}"))
            }
            LineCommand::SetOption { name, value } => match self.options.set(&name, &value) {
                Ok(()) => {
                    if name == "keywords" {
                        self.manager.set_keywords(self.options.keywords);
                    }
                    CommandOutput::info(format!("{name} set to {value}"))
                }
                Err(e) => CommandOutput::error(e.to_string()),
            },
            LineCommand::SetField {
                instance,
                field,
                value,
            } => {
                let Some(entry) = self.registry.get_mut(&instance) else {
                    return CommandOutput::error(format!("Instance {instance} not found"));
                };
                match entry.profile.set_field(&field, &value) {
                    Ok(()) => {
                        let shown = if field.eq_ignore_ascii_case("password") {
                            mask_secret(&value)
                        } else {
                            value
                        };
                        CommandOutput::info(format!("{instance}.{field} set to {shown}"))
                    }
                    Err(e) => CommandOutput::error(e.to_string()),
                }
            }
        }
    }

    fn list_instances(&self) -> CommandOutput {
        if self.registry.is_empty() {
            return CommandOutput::info("No instances configured");
        }
        let rows = self
            .registry
            .iter()
            .map(|(name, instance)| {
                let marker = if name == self.options.conn_default {
                    "*"
                } else {
                    ""
                };
                vec![
                    format!("{name}{marker}"),
                    if instance.state.is_connected() {
                        "yes".to_string()
                    } else {
                        "no".to_string()
                    },
                    instance.profile.display_string(),
                    describe_password(instance.profile.password.as_ref()),
                ]
            })
            .collect();
        CommandOutput::table(
            vec![
                "instance".into(),
                "connected".into(),
                "profile".into(),
                "password".into(),
            ],
            rows,
        )
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.disconnect_all();
    }
}

fn describe_password(source: Option<&PasswordSource>) -> String {
    match source {
        None => "-".to_string(),
        Some(PasswordSource::Plain(p)) => mask_secret(p),
        Some(PasswordSource::Encoded { .. }) => "(encoded)".to_string(),
        Some(PasswordSource::Keyring { keyring }) => format!("keyring:{keyring}"),
    }
}
