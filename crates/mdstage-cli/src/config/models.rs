use mdstage::engine::config::{LigandPrepConfig, MdSetupConfig};
use std::path::PathBuf;

pub struct LigandPrepApp {
    pub root: PathBuf,
    pub core_config: LigandPrepConfig,
}

pub struct MdSetupApp {
    pub root: PathBuf,
    pub seed: Option<u64>,
    pub core_config: MdSetupConfig,
}
