use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangerConfig {
    pub paths: PathsConfig,
    pub run: RunConfig,
    /// Full-id patterns marking elements as non-clonable / non-selectable
    pub exclusions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    pub versions_dir: String,
    pub system_model_file: String,
    pub annotation_file: String,
    pub transitions_file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub seed: u64,
    pub base_version: u32,
    pub group_count: usize,
    /// Per-group edit count bounds, half-open: [changes_low, changes_high)
    pub changes_low: u32,
    pub changes_high: u32,
}

impl Default for ChangerConfig {
    fn default() -> Self {
        Self {
            paths: PathsConfig::default(),
            run: RunConfig::default(),
            exclusions: Vec::new(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            versions_dir: "versions".to_string(),
            system_model_file: "system-model.json".to_string(),
            annotation_file: "annotation.json".to_string(),
            transitions_file: "allowed-transitions.csv".to_string(),
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: 1046,
            base_version: 2,
            group_count: 18,
            changes_low: 1,
            changes_high: 5,
        }
    }
}

impl ChangerConfig {
    /// Load configuration from environment variables and config file
    pub fn load() -> anyhow::Result<Self> {
        let mut config = config::Config::builder();

        // Add default configuration
        config = config.add_source(config::Config::try_from(&ChangerConfig::default())?);

        // Add config file if it exists
        config = config.add_source(config::File::with_name("config").required(false));

        // Add environment variables with prefix "DRIFT_"
        config = config.add_source(
            config::Environment::with_prefix("DRIFT")
                .separator("_")
                .prefix_separator("_"),
        );

        let config = config.build()?;
        let changer_config: ChangerConfig = config.try_deserialize()?;

        Ok(changer_config)
    }
}
