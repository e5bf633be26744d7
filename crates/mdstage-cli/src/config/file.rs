use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileClusterConfig {
    pub name: Option<String>,
    #[serde(rename = "mail-user")]
    pub mail_user: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileLigandPrepConfig {
    pub protein: Option<String>,
    #[serde(rename = "ligand-id")]
    pub ligand_id: Option<String>,
    pub restraints: Option<String>,
    pub water: Option<String>,
    pub ions: Option<String>,
    pub fep: Option<bool>,
    pub ligpargen: Option<PathBuf>,
    pub charge: Option<i32>,
    #[serde(rename = "optimization-rounds")]
    pub optimization_rounds: Option<u32>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileMdSetupConfig {
    #[serde(rename = "simulation-time")]
    pub simulation_time: Option<u32>,
    pub runtime: Option<u32>,
    #[serde(rename = "num-replicas")]
    pub num_replicas: Option<u32>,
    pub seed: Option<u64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub cluster: Option<FileClusterConfig>,
    #[serde(rename = "ligand-prep")]
    pub ligand_prep: Option<FileLigandPrepConfig>,
    #[serde(rename = "md-setup")]
    pub md_setup: Option<FileMdSetupConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }
}
