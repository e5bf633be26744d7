use mdstage::core::scripts::{ClusterProfile, RestraintScheme};
use mdstage::engine::config::GeneratorConfig;
use std::path::PathBuf;

pub struct DefaultsConfig {
    pub cluster: ClusterProfile,
    pub protein_file: String,
    pub ligand_id: String,
    pub restraints: RestraintScheme,
    pub water_id: String,
    pub ion_id: String,
    pub ligpargen: PathBuf,
    pub charge: i32,
    pub optimization_rounds: u32,
    pub simulation_time_ns: u32,
    pub runtime_hours: u32,
    pub num_replicas: u32,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        let generator = GeneratorConfig::default();
        Self {
            cluster: ClusterProfile::Tetra,
            protein_file: "protein.pdb".to_string(),
            ligand_id: "LIG".to_string(),
            restraints: RestraintScheme::Ca,
            water_id: "HOH".to_string(),
            ion_id: "NA".to_string(),
            ligpargen: generator.executable,
            charge: generator.charge,
            optimization_rounds: generator.optimization_rounds,
            simulation_time_ns: 25,
            runtime_hours: 36,
            num_replicas: 3,
        }
    }
}
