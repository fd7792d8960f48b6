// src/cli.rs
use crate::config::AppConfig;
use crate::filter::{Criteria, FlagTaxonomy, RawQuery, RequestError, ShapeDescriptor, ShapeKind};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "recruit-api")]
#[command(about = "Search filter decoding service for the recruiting platform")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Flag group taxonomy (TOML); overrides config.yaml
    #[arg(long, global = true)]
    pub flag_groups: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Decode a query string into a filter and print it as JSON
    Decode {
        /// Filter shape, e.g. job-seeker, sale, agent
        shape: ShapeKind,
        /// Raw query string, e.g. "page_number=1&phases[]=2"
        query: String,
        /// Path parameter as name=value (repeatable)
        #[arg(long = "path", value_parser = parse_path_param)]
        path: Vec<(String, String)>,
    },
    /// List filter shapes and their fields
    Shapes,
}

fn parse_path_param(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected name=value, got '{}'", s))
}

impl Cli {
    /// Taxonomy from `--flag-groups` if given, otherwise from configuration.
    pub fn flag_taxonomy(&self, config: &AppConfig) -> Result<FlagTaxonomy> {
        match &self.flag_groups {
            Some(path) => FlagTaxonomy::load(path),
            None => config.flag_taxonomy(),
        }
    }
}

pub fn decode_query(
    shape: ShapeKind,
    query: &str,
    path: &[(String, String)],
    taxonomy: &FlagTaxonomy,
) -> Result<Criteria, RequestError> {
    let raw = path
        .iter()
        .fold(RawQuery::parse(query), |raw, (name, value)| raw.with_path_param(name, value));
    shape.decode(&raw, taxonomy)
}

pub fn handle_decode_command(
    shape: ShapeKind,
    query: &str,
    path: &[(String, String)],
    taxonomy: &FlagTaxonomy,
) -> Result<()> {
    let criteria = decode_query(shape, query, path, taxonomy)
        .with_context(|| format!("Failed to decode {} filter", shape))?;

    let json = serde_json::to_string_pretty(&criteria).context("Failed to render criteria")?;
    println!("{}", json);
    Ok(())
}

pub fn handle_shapes_command() -> Result<()> {
    let descriptors: Vec<ShapeDescriptor> =
        ShapeKind::ALL.into_iter().map(ShapeKind::descriptor).collect();
    let json = serde_json::to_string_pretty(&descriptors).context("Failed to render shapes")?;
    println!("{}", json);
    Ok(())
}
