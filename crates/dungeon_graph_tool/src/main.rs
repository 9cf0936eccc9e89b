// SPDX-License-Identifier: MIT OR Apache-2.0
//! Dungeon graph tool - headless front end for room node graphs
//!
//! Creates, edits, checks and repairs graph files so layouts can be
//! authored or fixed without the visual editor:
//! - Create a graph with its entrance
//! - Add, retype, connect, disconnect and delete room nodes
//! - Check and repair hand-edited files
//! - Export to JSON for other tools

mod commands;

use clap::{Parser, Subcommand};
use commands::{CommandError, Session};
use std::path::{Path, PathBuf};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Edit and check dungeon room node graphs
#[derive(Parser, Debug)]
#[command(name = "dungeon-graph")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Graph config file (RON) used for new graphs
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Room type catalog file (RON), defaults to the stock catalog
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a graph file holding a single entrance
    New {
        /// Graph file
        graph: PathBuf,
        /// Graph name
        #[arg(long, default_value = "Untitled")]
        name: String,
    },
    /// List the room types offered for new nodes
    Types,
    /// Print the graph breadth-first from the entrance
    List {
        /// Graph file
        graph: PathBuf,
    },
    /// Add an unconnected node
    Add {
        /// Graph file
        graph: PathBuf,
        /// Room type name
        room_type: String,
        /// Horizontal placement
        #[arg(long, default_value_t = 0.0)]
        x: f32,
        /// Vertical placement
        #[arg(long, default_value_t = 0.0)]
        y: f32,
    },
    /// Connect a parent node to a child node
    Connect {
        /// Graph file
        graph: PathBuf,
        /// Parent node ID or prefix
        from: String,
        /// Child node ID or prefix
        to: String,
    },
    /// Remove the edge between two nodes
    Disconnect {
        /// Graph file
        graph: PathBuf,
        /// Parent node ID or prefix
        from: String,
        /// Child node ID or prefix
        to: String,
    },
    /// Change the room type of a node
    Retype {
        /// Graph file
        graph: PathBuf,
        /// Node ID or prefix
        node: String,
        /// New room type name
        room_type: String,
    },
    /// Delete nodes and their edges; entrances are kept
    Delete {
        /// Graph file
        graph: PathBuf,
        /// Node IDs or prefixes
        #[arg(required = true)]
        nodes: Vec<String>,
    },
    /// Remove every edge between the given nodes
    Cut {
        /// Graph file
        graph: PathBuf,
        /// Node IDs or prefixes
        #[arg(required = true)]
        nodes: Vec<String>,
    },
    /// Report structural problems without changing the file
    Check {
        /// Graph file
        graph: PathBuf,
    },
    /// Fix structural problems in place
    Repair {
        /// Graph file
        graph: PathBuf,
    },
    /// Print the graph as JSON
    ExportJson {
        /// Graph file
        graph: PathBuf,
    },
}

fn main() {
    let args = Args::parse();

    // Logs go to stderr so command output can be piped
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("dungeon_graph=info,dungeon_graph_tool=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(args) {
        Ok(true) => {}
        Ok(false) => std::process::exit(2),
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(1);
        }
    }
}

/// Run a command. `Ok(false)` means the command ran but found problems.
fn run(args: Args) -> Result<bool, CommandError> {
    let session = Session::load(args.config.as_deref(), args.catalog.as_deref())?;

    match args.command {
        Command::New { graph, name } => {
            let entrance = session.new_graph(&graph, &name)?;
            println!("{entrance}");
        }
        Command::Types => {
            for line in session.type_lines() {
                println!("{line}");
            }
        }
        Command::List { graph } => {
            for line in session.list(&graph)? {
                println!("{line}");
            }
        }
        Command::Add { graph, room_type, x, y } => {
            let id = session.add_node(&graph, &room_type, [x, y])?;
            println!("{id}");
        }
        Command::Connect { graph, from, to } => {
            session.connect(&graph, &from, &to)?;
            tracing::info!("Connected {} -> {}", from, to);
        }
        Command::Disconnect { graph, from, to } => {
            if !session.disconnect(&graph, &from, &to)? {
                tracing::info!("No edge {} -> {}", from, to);
            }
        }
        Command::Retype { graph, node, room_type } => {
            session.retype(&graph, &node, &room_type)?;
        }
        Command::Delete { graph, nodes } => {
            for node in session.delete(&graph, &nodes)? {
                println!("{}", node.id);
            }
        }
        Command::Cut { graph, nodes } => {
            let removed = session.cut(&graph, &nodes)?;
            tracing::info!("Removed {} edges", removed);
        }
        Command::Check { graph } => return check(&session, &graph),
        Command::Repair { graph } => {
            let fixes = session.repair(&graph)?;
            tracing::info!("Applied {} fixes to {:?}", fixes, graph);
        }
        Command::ExportJson { graph } => {
            println!("{}", session.export_json(&graph)?);
        }
    }

    Ok(true)
}

fn check(session: &Session, graph: &Path) -> Result<bool, CommandError> {
    let report = session.check(graph)?;

    for issue in &report.issues {
        println!("issue: {issue:?}");
    }
    for id in &report.unreachable {
        println!("unreachable: {id}");
    }
    if report.is_clean() {
        println!("ok");
    }

    Ok(report.is_clean())
}
