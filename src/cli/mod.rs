//! Command-line front end.
//!
//! Every invocation is one request: it opens the store, runs one command
//! inside a fresh [`RequestContext`], and prints a JSON document.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde_json::{json, Value};

use crate::config::MegaGraphConfig;
use crate::error::Result;
use crate::graph::mega::MegaResolver;
use crate::graph::store::GraphStore;
use crate::request::RequestContext;
use crate::types::{Direction, NodeRef};

#[derive(Parser, Debug)]
#[command(
    name = "megagraph",
    version,
    about = "Resolve same-type relatives and automapping decisions for Mega objects",
    long_about = None
)]
pub struct Cli {
    /// SQLite database path (overrides config and MEGAGRAPH_DB).
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// YAML config file (defaults to ./megagraph.yaml when present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Include request metrics in the output.
    #[arg(long, global = true)]
    pub metrics: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Register an object.
    AddNode(AddNodeArgs),
    /// Add a relationship SOURCE -> DEST.
    Link(EdgeArgs),
    /// Remove a relationship SOURCE -> DEST.
    Unlink(EdgeArgs),
    /// List the ids of a node's same-type children or parents.
    Relatives(RelativesArgs),
    /// Check whether CANDIDATE is an ancestor of NODE.
    IsAncestor(IsAncestorArgs),
    /// Decide whether an automapping through DST should be skipped.
    SkipMapping(SkipMappingArgs),
    /// Check whether a node has same-type children.
    IsMega(NodeArgs),
    /// Show object and relationship counts.
    Stats,
}

#[derive(Args, Debug)]
pub struct AddNodeArgs {
    /// Object as TYPE:ID.
    pub node: NodeRef,
    #[arg(long)]
    pub title: Option<String>,
}

#[derive(Args, Debug)]
pub struct EdgeArgs {
    /// Source object as TYPE:ID.
    pub source: NodeRef,
    /// Destination object as TYPE:ID.
    pub dest: NodeRef,
}

#[derive(Args, Debug)]
pub struct NodeArgs {
    /// Object as TYPE:ID.
    pub node: NodeRef,
}

#[derive(Args, Debug)]
pub struct RelativesArgs {
    /// Object as TYPE:ID.
    pub node: NodeRef,
    /// `children` or `parents`.
    #[arg(long, default_value = "children")]
    pub direction: String,
    /// Follow all generations instead of one hop.
    #[arg(long)]
    pub all: bool,
}

#[derive(Args, Debug)]
pub struct IsAncestorArgs {
    pub candidate: NodeRef,
    pub node: NodeRef,
}

#[derive(Args, Debug)]
pub struct SkipMappingArgs {
    #[arg(long)]
    pub source: NodeRef,
    #[arg(long)]
    pub dst: NodeRef,
    #[arg(long)]
    pub related: NodeRef,
}

/// Apply CLI overrides on top of the loaded config.
pub fn effective_config(cli: &Cli, mut config: MegaGraphConfig) -> MegaGraphConfig {
    if let Some(db) = &cli.db {
        config.database.path = db.clone();
    }
    config
}

/// Run `cli.command` against `store` and return the JSON result.
pub fn run(cli: &Cli, store: &GraphStore, config: &MegaGraphConfig) -> Result<Value> {
    let mega = MegaResolver::from_config(store, &config.mega);
    let mut ctx = RequestContext::new();
    let request_id = ctx.id();
    tracing::debug!(request_id, command = ?cli.command, "running command");

    let mut output = match &cli.command {
        Commands::AddNode(args) => {
            store.insert_node(&args.node, args.title.as_deref())?;
            json!({ "node": args.node, "title": args.title })
        }
        Commands::Link(args) => {
            let created = store.insert_relationship(&args.source, &args.dest)?;
            json!({ "source": args.source, "destination": args.dest, "created": created })
        }
        Commands::Unlink(args) => {
            let removed = store.delete_relationship(&args.source, &args.dest)?;
            json!({ "source": args.source, "destination": args.dest, "removed": removed })
        }
        Commands::Relatives(args) => {
            let direction: Direction = args.direction.parse()?;
            let mut ids: Vec<i64> = mega
                .relatives()
                .relatives_ids_counted(&args.node, direction, args.all, ctx.metrics_mut())?
                .into_iter()
                .collect();
            ids.sort_unstable();
            json!({
                "node": args.node,
                "direction": direction,
                "all_generations": args.all,
                "ids": ids,
            })
        }
        Commands::IsAncestor(args) => {
            let result = mega.is_ancestor_of(&mut ctx, &args.candidate, &args.node)?;
            json!({ "candidate": args.candidate, "node": args.node, "is_ancestor": result })
        }
        Commands::SkipMapping(args) => {
            let skip = mega.skip_automapping(&mut ctx, &args.source, &args.dst, &args.related)?;
            json!({
                "source": args.source,
                "dst": args.dst,
                "related": args.related,
                "skip": skip,
            })
        }
        Commands::IsMega(args) => {
            let is_mega = mega.is_mega(&args.node)?;
            json!({ "node": args.node, "is_mega": is_mega })
        }
        Commands::Stats => serde_json::to_value(store.get_stats()?)?,
    };

    let metrics = ctx.finish();
    if cli.metrics {
        if let Value::Object(map) = &mut output {
            map.insert("metrics".to_string(), metrics.to_json());
        }
    }
    Ok(output)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
