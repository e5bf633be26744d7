pub mod ligand_prep;
pub mod md_setup;
