use pedigree_layout::graph::{GraphOptions, PedigreeGraph, Properties, SerializedVertex, VertexId};
use pedigree_layout::{ChangeSet, LayoutOptions, PositionedGraph, Snapshot};
use serde::Serialize;
use serde_json::Value;
use std::io::Read;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Layout(pedigree_layout::Error),
    Graph(pedigree_layout::graph::Error),
    Json(serde_json::Error),
    BadInput(&'static str),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Layout(err) => write!(f, "{err}"),
            CliError::Graph(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::BadInput(msg) => write!(f, "{msg}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<pedigree_layout::Error> for CliError {
    fn from(value: pedigree_layout::Error) -> Self {
        Self::Layout(value)
    }
}

impl From<pedigree_layout::graph::Error> for CliError {
    fn from(value: pedigree_layout::graph::Error) -> Self {
        Self::Graph(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Layout,
    Edit,
    Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditOp {
    AddChild,
    AddParents,
    AddRelationship,
    AssignParent,
    Reposition,
    Redraw,
}

impl FromStr for EditOp {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "add-child" => Ok(Self::AddChild),
            "add-parents" => Ok(Self::AddParents),
            "add-relationship" | "add-partner" => Ok(Self::AddRelationship),
            "assign-parent" => Ok(Self::AssignParent),
            "reposition" => Ok(Self::Reposition),
            "redraw" => Ok(Self::Redraw),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    config: Option<String>,
    op: Option<EditOp>,
    target: Option<usize>,
    child: Option<usize>,
    prefer_left: bool,
}

#[derive(Serialize)]
struct EditOut<'a> {
    changes: &'a ChangeSet,
    snapshot: &'a Snapshot,
}

#[derive(Serialize)]
struct PositionOut {
    id: VertexId,
    x: f64,
    y: f64,
}

fn usage() -> &'static str {
    "pedigree-cli\n\
\n\
USAGE:\n\
  pedigree-cli layout   [--pretty] [--config <file>] [<graph.json>|-]\n\
  pedigree-cli edit     [--pretty] [--config <file>] --op <op> [--target <id>] [--child <id>] [--prefer-left] [<snapshot.json>|-]\n\
  pedigree-cli position [--pretty] [--config <file>] [<snapshot.json>|-]\n\
\n\
OPS:\n\
  add-child         --target <relationship|childhub>\n\
  add-parents       --target <person>\n\
  add-relationship  --target <person> [--prefer-left]\n\
  assign-parent     --target <relationship|childhub> --child <person>\n\
  reposition\n\
  redraw\n\
\n\
NOTES:\n\
  - If the input path is omitted or '-', input is read from stdin.\n\
  - layout reads a graph (a vertex array or an object with a \"GG\" key) and prints a snapshot.\n\
  - edit prints {\"changes\": ..., \"snapshot\": ...}.\n\
  - --config points to a JSON object with layout options; missing keys keep their defaults.\n\
  - Set PEDIGREE_LOG (e.g. PEDIGREE_LOG=debug) to log to stderr.\n\
"
}

fn parse_id(raw: Option<&String>) -> Result<usize, CliError> {
    let Some(raw) = raw else {
        return Err(CliError::Usage(usage()));
    };
    raw.parse::<usize>().map_err(|_| CliError::Usage(usage()))
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();
    let mut command_seen = false;

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "layout" | "edit" | "position" if !command_seen && args.input.is_none() => {
                command_seen = true;
                args.command = match a.as_str() {
                    "edit" => Command::Edit,
                    "position" => Command::Position,
                    _ => Command::Layout,
                };
            }
            "--pretty" => args.pretty = true,
            "--prefer-left" => args.prefer_left = true,
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(path.clone());
            }
            "--op" => {
                let Some(op) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.op = Some(op.parse::<EditOp>().map_err(|_| CliError::Usage(usage()))?);
            }
            "--target" => args.target = Some(parse_id(it.next())?),
            "--child" => args.child = Some(parse_id(it.next())?),
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            "-" => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some("-".to_string());
            }
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    if matches!(args.command, Command::Edit) {
        let Some(op) = args.op else {
            return Err(CliError::Usage(usage()));
        };
        let needs_target = !matches!(op, EditOp::Reposition | EditOp::Redraw);
        if needs_target && args.target.is_none() {
            return Err(CliError::Usage(usage()));
        }
        if op == EditOp::AssignParent && args.child.is_none() {
            return Err(CliError::Usage(usage()));
        }
    } else if args.op.is_some() {
        return Err(CliError::Usage(usage()));
    }

    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    println!();
    Ok(())
}

fn load_options(path: Option<&str>) -> Result<LayoutOptions, CliError> {
    match path {
        None => Ok(LayoutOptions::default()),
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&text)?)
        }
    }
}

/// Accepts a bare vertex array or a snapshot-like object carrying it under `GG`.
fn parse_graph(text: &str) -> Result<PedigreeGraph, CliError> {
    let value: Value = serde_json::from_str(text)?;
    let vertices = match value {
        Value::Array(_) => value,
        Value::Object(mut map) => map
            .remove("GG")
            .ok_or(CliError::BadInput("graph input has no \"GG\" key"))?,
        _ => return Err(CliError::BadInput("graph input must be an array or an object")),
    };
    let vertices: Vec<SerializedVertex> = serde_json::from_value(vertices)?;
    Ok(PedigreeGraph::from_user_graph(&vertices, GraphOptions::default())?)
}

fn load_snapshot(text: &str, options: LayoutOptions) -> Result<PositionedGraph, CliError> {
    let snapshot = Snapshot::from_json(text)?;
    Ok(PositionedGraph::from_snapshot(
        snapshot,
        GraphOptions::default(),
        options,
    )?)
}

fn apply_edit(pg: &mut PositionedGraph, args: &Args) -> Result<ChangeSet, CliError> {
    let target = || args.target.map(VertexId::new).ok_or(CliError::Usage(usage()));
    let changes = match args.op {
        Some(EditOp::AddChild) => pg.add_new_child(target()?, Properties::new())?,
        Some(EditOp::AddParents) => pg.add_new_parents(target()?)?,
        Some(EditOp::AddRelationship) => {
            pg.add_new_relationship(target()?, Properties::new(), args.prefer_left)?
        }
        Some(EditOp::AssignParent) => {
            let child = args.child.map(VertexId::new).ok_or(CliError::Usage(usage()))?;
            pg.assign_parent(target()?, child)?
        }
        Some(EditOp::Reposition) => pg.reposition_all()?,
        Some(EditOp::Redraw) => pg.redraw_all(Vec::new())?,
        None => return Err(CliError::Usage(usage())),
    };
    Ok(changes)
}

fn run(args: Args) -> Result<(), CliError> {
    let options = load_options(args.config.as_deref())?;
    let text = read_input(args.input.as_deref())?;

    match args.command {
        Command::Layout => {
            let graph = parse_graph(&text)?;
            let pg = PositionedGraph::new(graph, options)?;
            tracing::info!(vertices = pg.graph().num_vertices(), "laid out graph");
            write_json(&pg.to_snapshot(), args.pretty)
        }
        Command::Edit => {
            let mut pg = load_snapshot(&text, options)?;
            let changes = apply_edit(&mut pg, &args)?;
            tracing::info!(
                op = ?args.op,
                new = changes.new.len(),
                moved = changes.moved.len(),
                "applied edit"
            );
            let snapshot = pg.to_snapshot();
            write_json(
                &EditOut {
                    changes: &changes,
                    snapshot: &snapshot,
                },
                args.pretty,
            )
        }
        Command::Position => {
            let pg = load_snapshot(&text, options)?;
            let out: Vec<PositionOut> = pg
                .graph()
                .vertex_ids()
                .filter_map(|v| {
                    pg.position(v).map(|p| PositionOut {
                        id: v,
                        x: p.x,
                        y: p.y,
                    })
                })
                .collect();
            write_json(&out, args.pretty)
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("PEDIGREE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

fn main() {
    init_logging();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    match run(args) {
        Ok(()) => {}
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            if let CliError::Layout(inner) = &err {
                if inner.is_invariant() {
                    tracing::error!(error = %inner, "layout lost internal consistency");
                }
            }
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
