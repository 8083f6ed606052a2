use std::io::{self, BufWriter};

use ahash::AHashMap;
use anyhow::{Context, Result};
use clap::Parser;
use log::error;

use planar_autom::planar_code::{PlanarCodeReader, PlanarCodeWriter};
use planar_autom::plane_graph::DecodeOptions;
use planar_autom::prelude::*;

#[derive(Parser)]
#[command(name = "planar-non-iso")]
#[command(about = "Filter non-isomorphic plane graphs read as planar code from stdin")]
#[command(long_about = "Filter non-isomorphic plane graphs read as planar code from stdin.\n\n\
    The first graph of each isomorphism class is written to stdout. A graph and its mirror \
    image are considered isomorphic unless --orientation-preserving is given.")]
struct Args {
    /// Report the numbers of graphs isomorphic to an earlier one
    #[arg(short, long)]
    old: bool,

    /// Report the numbers of graphs not isomorphic to an earlier one
    #[arg(short, long)]
    new: bool,

    /// Do not write the non-isomorphic graphs to stdout
    #[arg(short, long)]
    count_only: bool,

    /// Only accept isomorphisms preserving the orientation, so that a
    /// chiral graph and its mirror image are different
    #[arg(short = 'p', long)]
    orientation_preserving: bool,

    /// Largest number of vertices of an input graph
    #[arg(long, default_value_t = 1000)]
    max_vertices: usize,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let options = DecodeOptions {
        max_vertices: args.max_vertices,
        ..Default::default()
    };
    let mut graph = PlaneGraph::with_options(&options)?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut writer = PlanarCodeWriter::new(BufWriter::new(stdout.lock()));
    let mut seen: AHashMap<CanonPlaneGraph, usize> = AHashMap::new();
    let mut graphs_read = 0;

    for code in PlanarCodeReader::new(stdin.lock()) {
        graphs_read += 1;
        let nr = graphs_read;
        let code = code.with_context(|| format!("Failed to read graph {nr}"))?;
        if let Err(err) = graph.load_planar_code(&code) {
            if err.is_recoverable() {
                error!("Skipping graph {nr}: {err}");
                continue;
            }
            return Err(err).with_context(|| format!("Failed to decode graph {nr}"));
        }
        let group = if args.orientation_preserving {
            graph.make_dual();
            AutomorphismGroup::determine_orientation_preserving(&graph)?
        } else {
            (&mut graph).try_into_autom()?
        };
        let canon = CanonPlaneGraph::from_certificate(group.certificate())?;
        match seen.get(&canon) {
            Some(&first) => {
                if args.old {
                    eprintln!("Graph {nr} is isomorphic to graph {first}");
                }
            }
            None => {
                if args.new {
                    eprintln!("Graph {nr} is new");
                }
                if !args.count_only {
                    writer.write_code(&code)?;
                }
                seen.insert(canon, nr);
            }
        }
    }
    writer.flush()?;
    eprintln!("{graphs_read} graphs read, {} non-isomorphic", seen.len());
    Ok(())
}
