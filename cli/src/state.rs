use chrono::Local;
use serde::{Deserialize, Serialize};
use sigil_core::{EffectHandle, World};
use std::collections::HashMap;
use tokio::task::JoinHandle;

/// Everything the console holds between commands.
pub struct CliState {
    pub world: World,
    pub settings: CliSettings,
    /// Handles issued by `apply` and `shift`, keyed by their numeric id so
    /// they can be cancelled from the prompt.
    pub handles: HashMap<u64, EffectHandle>,
    pub clock_task: Option<JoinHandle<()>>,
}

impl CliState {
    pub fn new() -> Self {
        let settings = confy::load("sigil", None).unwrap_or_default();
        Self {
            world: World::new(Local::now().naive_local()),
            settings,
            handles: HashMap::new(),
            clock_task: None,
        }
    }

    /// Remembers a handle and returns the id to print.
    pub fn track(&mut self, handle: EffectHandle) -> u64 {
        let id = handle.id().value();
        self.handles.insert(id, handle);
        id
    }
}

impl Default for CliState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize, Deserialize)]
pub struct CliSettings {
    /// Extra directory of effect definition files, on top of the per-user
    /// default location.
    pub definitions_dir: Option<String>,
    /// How often the background clock advances the world.
    pub tick_interval_ms: u64,
}

impl ::std::default::Default for CliSettings {
    fn default() -> Self {
        Self {
            definitions_dir: None,
            tick_interval_ms: 250,
        }
    }
}
