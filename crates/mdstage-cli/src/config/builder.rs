use super::defaults::DefaultsConfig;
use super::file::{FileClusterConfig, FileConfig};
use super::models::{LigandPrepApp, MdSetupApp};
use crate::cli::{CommonArgs, SetupMdCli, SetupPymCli};
use crate::error::{CliError, Result};
use mdstage::core::scripts::{ClusterProfile, RestraintScheme};
use mdstage::engine::config::{GeneratorConfig, LigandPrepConfigBuilder, MdSetupConfigBuilder};
use std::str::FromStr;

pub fn build_ligand_prep_config(args: &SetupPymCli) -> Result<LigandPrepApp> {
    let defaults = DefaultsConfig::default();
    let mut file_config = FileConfig::load(args.common.config.as_deref())?;

    let (cluster, mail_user) =
        resolve_cluster(&args.common, file_config.cluster.take(), &defaults)?;

    let prep_file = file_config.ligand_prep.take().unwrap_or_default();

    let restraints = match (args.restraints, prep_file.restraints.as_deref()) {
        (Some(arg), _) => arg.into(),
        (None, Some(name)) => parse_choice::<RestraintScheme>("restraints", name)?,
        (None, None) => defaults.restraints,
    };

    let generator = GeneratorConfig {
        executable: args
            .ligpargen
            .clone()
            .or(prep_file.ligpargen)
            .unwrap_or(defaults.ligpargen),
        charge: args.charge.or(prep_file.charge).unwrap_or(defaults.charge),
        optimization_rounds: prep_file
            .optimization_rounds
            .unwrap_or(defaults.optimization_rounds),
    };

    let core_config = LigandPrepConfigBuilder::new()
        .cluster(cluster)
        .protein_file(
            args.protein
                .clone()
                .or(prep_file.protein)
                .unwrap_or(defaults.protein_file),
        )
        .ligand_id(
            args.ligand_id
                .clone()
                .or(prep_file.ligand_id)
                .unwrap_or(defaults.ligand_id),
        )
        .restraints(restraints)
        .water_id(
            args.water_id
                .clone()
                .or(prep_file.water)
                .unwrap_or(defaults.water_id),
        )
        .ion_id(args.ion_id.clone().or(prep_file.ions).unwrap_or(defaults.ion_id))
        .free_energy(args.fep || prep_file.fep.unwrap_or(false))
        .generator(generator)
        .mail_user(mail_user)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(LigandPrepApp {
        root: args.common.directory.clone(),
        core_config,
    })
}

pub fn build_md_setup_config(args: &SetupMdCli) -> Result<MdSetupApp> {
    let defaults = DefaultsConfig::default();
    let mut file_config = FileConfig::load(args.common.config.as_deref())?;

    let (cluster, mail_user) =
        resolve_cluster(&args.common, file_config.cluster.take(), &defaults)?;

    let md_file = file_config.md_setup.take().unwrap_or_default();

    let core_config = MdSetupConfigBuilder::new()
        .cluster(cluster)
        .simulation_time_ns(
            args.simulation_time
                .or(md_file.simulation_time)
                .unwrap_or(defaults.simulation_time_ns),
        )
        .runtime_hours(
            args.runtime
                .or(md_file.runtime)
                .unwrap_or(defaults.runtime_hours),
        )
        .num_replicas(
            args.num_replicas
                .or(md_file.num_replicas)
                .unwrap_or(defaults.num_replicas),
        )
        .mail_user(mail_user)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(MdSetupApp {
        root: args.common.directory.clone(),
        seed: args.seed.or(md_file.seed),
        core_config,
    })
}

fn resolve_cluster(
    common: &CommonArgs,
    file: Option<FileClusterConfig>,
    defaults: &DefaultsConfig,
) -> Result<(ClusterProfile, Option<String>)> {
    let file = file.unwrap_or_default();
    let cluster = match (common.cluster, file.name.as_deref()) {
        (Some(arg), _) => arg.into(),
        (None, Some(name)) => parse_choice::<ClusterProfile>("cluster", name)?,
        (None, None) => defaults.cluster,
    };
    let mail_user = common.mail_user.clone().or(file.mail_user);
    Ok((cluster, mail_user))
}

fn parse_choice<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| CliError::Config(format!("Invalid value for '{}': {}", key, e)))
}
