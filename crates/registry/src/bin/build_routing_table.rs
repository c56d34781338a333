//! 路由表构建工具
//!
//! `groups` 输出部署计划；`build` 根据各服务的 scoring URI 写出路由表制品。

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use manymodels_registry::{RegisteredModel, deployment_plan, group_models, routing_table_from_groups};
use manymodels_telemetry::init_tracing;
use serde::de::DeserializeOwned;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "build-routing-table")]
#[command(about = "Group registered models and build the forecast router's routing table", version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the deployment plan (service name -> member models) as JSON
    Groups {
        /// JSON array of registered models
        #[arg(long)]
        models: PathBuf,

        /// Comma separated tags used to group models into services
        #[arg(long, value_delimiter = ',')]
        grouping_tags: Option<Vec<String>>,
    },
    /// Write the routing table artifact
    Build {
        /// JSON array of registered models
        #[arg(long)]
        models: PathBuf,

        /// JSON object mapping service name to scoring URI
        #[arg(long)]
        scoring_uris: PathBuf,

        /// Comma separated tags used to group models into services
        #[arg(long, value_delimiter = ',')]
        grouping_tags: Option<Vec<String>>,

        #[arg(long, default_value = "endpoints.json")]
        endpoints_path: PathBuf,
    },
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_slice(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

fn clean_tags(tags: Option<Vec<String>>) -> Option<Vec<String>> {
    tags.map(|tags| tags.into_iter().filter(|t| !t.is_empty()).collect())
}

fn main() -> Result<()> {
    init_tracing("info");
    let args = Args::parse();

    match args.command {
        Command::Groups {
            models,
            grouping_tags,
        } => {
            let models: Vec<RegisteredModel> = read_json(&models)?;
            let grouping_tags = clean_tags(grouping_tags);
            let groups = group_models(&models, grouping_tags.as_deref())?;

            println!("{}", serde_json::to_string_pretty(&deployment_plan(&groups))?);
        }
        Command::Build {
            models,
            scoring_uris,
            grouping_tags,
            endpoints_path,
        } => {
            let models: Vec<RegisteredModel> = read_json(&models)?;
            let scoring_uris: BTreeMap<String, String> = read_json(&scoring_uris)?;
            let grouping_tags = clean_tags(grouping_tags);

            let groups = group_models(&models, grouping_tags.as_deref())?;
            let table = routing_table_from_groups(&groups, &scoring_uris)?;
            table.save(&endpoints_path)?;

            info!(
                groups = groups.len(),
                routes = table.len(),
                path = %endpoints_path.display(),
                "Routing table built"
            );
        }
    }

    Ok(())
}
