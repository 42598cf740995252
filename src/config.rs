use std::path::PathBuf;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use tracing::info;

use crate::db::DEFAULT_DB_PATH;
use crate::pipeline::features::Taxonomy;
use crate::pipeline::ranking::{DEFAULT_PAGE_SIZE, DEFAULT_REVIEW_THRESHOLD};
use crate::pipeline::PipelineContext;

/// Runtime settings: defaults, then `pho.toml` if present, then `PHO_*` env vars.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub db_path: PathBuf,
    pub page_size: usize,
    pub review_threshold: i64,
    pub taxonomy_path: Option<PathBuf>,
    pub out_dir: PathBuf,
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::from_builder(
            Config::builder()
                .add_source(File::with_name("pho").required(false))
                .add_source(Environment::with_prefix("PHO")),
        )
    }

    fn from_builder(builder: config::ConfigBuilder<config::builder::DefaultState>) -> Result<Self> {
        let settings = builder
            .set_default("db_path", DEFAULT_DB_PATH)?
            .set_default("page_size", DEFAULT_PAGE_SIZE as i64)?
            .set_default("review_threshold", DEFAULT_REVIEW_THRESHOLD)?
            .set_default("out_dir", "out")?
            .build()
            .context("Failed to read settings")?;
        settings
            .try_deserialize()
            .context("Invalid settings")
    }

    /// Built-in taxonomy unless `taxonomy_path` points at a JSON override.
    pub fn taxonomy(&self) -> Result<Taxonomy> {
        match &self.taxonomy_path {
            None => Ok(Taxonomy::default()),
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read taxonomy {:?}", path))?;
                let taxonomy = serde_json::from_str(&raw)
                    .with_context(|| format!("Failed to parse taxonomy {:?}", path))?;
                info!("Loaded taxonomy from {:?}", path);
                Ok(taxonomy)
            }
        }
    }

    pub fn pipeline_context(&self) -> Result<PipelineContext> {
        anyhow::ensure!(self.page_size >= 1, "page_size must be at least 1");
        Ok(PipelineContext {
            taxonomy: self.taxonomy()?,
            page_size: self.page_size,
            review_threshold: self.review_threshold,
        })
    }
}
