use std::collections::BTreeMap;
use std::io::{self, BufWriter, Write};

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::error;

use planar_autom::planar_code::{PlanarCodeReader, PlanarCodeWriter};
use planar_autom::plane_graph::DecodeOptions;
use planar_autom::point_group::{classify, GroupPattern, PointGroup};
use planar_autom::prelude::*;

#[derive(Parser)]
#[command(name = "planar-group")]
#[command(about = "Determine the symmetry group of plane graphs read as planar code from stdin")]
struct Args {
    /// Write the graphs that have one of the given groups to stdout
    #[arg(short, long)]
    filter: bool,

    /// Write the graphs that have none of the given groups instead
    #[arg(short, long, requires = "filter")]
    invert: bool,

    /// At the end give a summary of the encountered groups
    #[arg(short, long)]
    summary: bool,

    /// Do not show the group of individual graphs
    #[arg(short, long)]
    quiet: bool,

    /// Largest number of vertices of an input graph
    #[arg(long, default_value_t = 1000)]
    max_vertices: usize,

    /// Groups to filter: Cn, Cnh, Cnv, Sn, Dn, Dnh, Dnd with a positive
    /// integer or * for n, or T, Td, Th, O, Oh, I, Ih
    groups: Vec<GroupPattern>,
}

fn group_name(group: Option<PointGroup>) -> String {
    match group {
        Some(group) => group.to_string(),
        None => "UNKNOWN".to_owned(),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    if args.filter {
        if args.groups.is_empty() {
            bail!("--filter needs at least one group name");
        }
        eprintln!(
            "Filtering out graphs that {}have one of the following groups:",
            if args.invert { "do not " } else { "" }
        );
        for group in &args.groups {
            eprintln!("{group}");
        }
    }

    let options = DecodeOptions {
        max_vertices: args.max_vertices,
        ..Default::default()
    };
    let mut graph = PlaneGraph::with_options(&options)?;
    let stdin = io::stdin();
    let reader = PlanarCodeReader::new(stdin.lock());
    let stdout = io::stdout();
    let mut writer = PlanarCodeWriter::new(BufWriter::new(stdout.lock()));
    let mut summary: BTreeMap<Option<PointGroup>, usize> = BTreeMap::new();

    for (idx, code) in reader.enumerate() {
        let nr = idx + 1;
        let code = code.with_context(|| format!("Failed to read graph {nr}"))?;
        if let Err(err) = graph.load_planar_code(&code) {
            if err.is_recoverable() {
                error!("Skipping graph {nr}: {err}");
                continue;
            }
            return Err(err).with_context(|| format!("Failed to decode graph {nr}"));
        }
        let group = (&mut graph).try_into_autom()?;
        let point_group = match classify(&graph, &group) {
            Ok(point_group) => Some(point_group),
            Err(err) => {
                error!("Graph {nr}: {err}");
                None
            }
        };
        if args.filter {
            let selected = point_group
                .is_some_and(|g| args.groups.iter().any(|pattern| pattern.matches(&g)));
            if selected != args.invert {
                writer.write_code(&code)?;
            }
        } else if !args.quiet {
            eprintln!("Graph {nr} has group {}", group_name(point_group));
        }
        if args.summary {
            *summary.entry(point_group).or_default() += 1;
        }
    }
    writer.flush()?;

    if args.summary {
        let mut out = io::stderr().lock();
        for (group, count) in summary {
            writeln!(out, "{:<7} {count:>7}", group_name(group))?;
        }
    }
    Ok(())
}
