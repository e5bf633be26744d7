use crate::core::scripts::{ClusterProfile, RestraintScheme};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{parameter}': {reason}")]
    InvalidValue {
        parameter: &'static str,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub executable: PathBuf,
    pub charge: i32,
    pub optimization_rounds: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            executable: PathBuf::from("ligpargen"),
            charge: 0,
            optimization_rounds: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelaxationConfig {
    pub restraints: RestraintScheme,
    pub water_id: String,
    pub ion_id: String,
    pub free_energy: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LigandPrepConfig {
    pub cluster: ClusterProfile,
    pub protein_file: String,
    pub ligand_id: String,
    pub relaxation: RelaxationConfig,
    pub generator: GeneratorConfig,
    pub mail_user: Option<String>,
}

#[derive(Default)]
pub struct LigandPrepConfigBuilder {
    cluster: Option<ClusterProfile>,
    protein_file: Option<String>,
    ligand_id: Option<String>,
    restraints: Option<RestraintScheme>,
    water_id: Option<String>,
    ion_id: Option<String>,
    free_energy: bool,
    generator: Option<GeneratorConfig>,
    mail_user: Option<String>,
}

impl LigandPrepConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cluster(mut self, cluster: ClusterProfile) -> Self {
        self.cluster = Some(cluster);
        self
    }
    pub fn protein_file(mut self, name: impl Into<String>) -> Self {
        self.protein_file = Some(name.into());
        self
    }
    pub fn ligand_id(mut self, id: impl Into<String>) -> Self {
        self.ligand_id = Some(id.into());
        self
    }
    pub fn restraints(mut self, scheme: RestraintScheme) -> Self {
        self.restraints = Some(scheme);
        self
    }
    pub fn water_id(mut self, id: impl Into<String>) -> Self {
        self.water_id = Some(id.into());
        self
    }
    pub fn ion_id(mut self, id: impl Into<String>) -> Self {
        self.ion_id = Some(id.into());
        self
    }
    pub fn free_energy(mut self, enabled: bool) -> Self {
        self.free_energy = enabled;
        self
    }
    pub fn generator(mut self, generator: GeneratorConfig) -> Self {
        self.generator = Some(generator);
        self
    }
    pub fn mail_user(mut self, address: Option<String>) -> Self {
        self.mail_user = address;
        self
    }

    pub fn build(self) -> Result<LigandPrepConfig, ConfigError> {
        let protein_file = self
            .protein_file
            .ok_or(ConfigError::MissingParameter("protein_file"))?;
        if protein_file.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                parameter: "protein_file",
                reason: "must not be empty".to_string(),
            });
        }
        let ligand_id = self
            .ligand_id
            .ok_or(ConfigError::MissingParameter("ligand_id"))?;
        if ligand_id.is_empty() {
            return Err(ConfigError::InvalidValue {
                parameter: "ligand_id",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(LigandPrepConfig {
            cluster: self.cluster.ok_or(ConfigError::MissingParameter("cluster"))?,
            protein_file,
            ligand_id,
            relaxation: RelaxationConfig {
                restraints: self
                    .restraints
                    .ok_or(ConfigError::MissingParameter("restraints"))?,
                water_id: self
                    .water_id
                    .ok_or(ConfigError::MissingParameter("water_id"))?,
                ion_id: self.ion_id.ok_or(ConfigError::MissingParameter("ion_id"))?,
                free_energy: self.free_energy,
            },
            generator: self.generator.unwrap_or_default(),
            mail_user: self.mail_user,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MdSetupConfig {
    pub cluster: ClusterProfile,
    pub simulation_time_ns: u32,
    pub runtime_hours: u32,
    pub num_replicas: u32,
    pub mail_user: Option<String>,
}

#[derive(Default)]
pub struct MdSetupConfigBuilder {
    cluster: Option<ClusterProfile>,
    simulation_time_ns: Option<u32>,
    runtime_hours: Option<u32>,
    num_replicas: Option<u32>,
    mail_user: Option<String>,
}

impl MdSetupConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cluster(mut self, cluster: ClusterProfile) -> Self {
        self.cluster = Some(cluster);
        self
    }
    pub fn simulation_time_ns(mut self, ns: u32) -> Self {
        self.simulation_time_ns = Some(ns);
        self
    }
    pub fn runtime_hours(mut self, hours: u32) -> Self {
        self.runtime_hours = Some(hours);
        self
    }
    pub fn num_replicas(mut self, n: u32) -> Self {
        self.num_replicas = Some(n);
        self
    }
    pub fn mail_user(mut self, address: Option<String>) -> Self {
        self.mail_user = address;
        self
    }

    pub fn build(self) -> Result<MdSetupConfig, ConfigError> {
        let positive = |value: Option<u32>, parameter: &'static str| -> Result<u32, ConfigError> {
            let value = value.ok_or(ConfigError::MissingParameter(parameter))?;
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    parameter,
                    reason: "must be greater than zero".to_string(),
                });
            }
            Ok(value)
        };
        Ok(MdSetupConfig {
            cluster: self.cluster.ok_or(ConfigError::MissingParameter("cluster"))?,
            simulation_time_ns: self
                .simulation_time_ns
                .ok_or(ConfigError::MissingParameter("simulation_time_ns"))?,
            runtime_hours: positive(self.runtime_hours, "runtime_hours")?,
            num_replicas: positive(self.num_replicas, "num_replicas")?,
            mail_user: self.mail_user,
        })
    }
}
