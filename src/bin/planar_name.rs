use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, warn};

use planar_autom::naming::name_graph;
use planar_autom::planar_code::PlanarCodeReader;
use planar_autom::plane_graph::DecodeOptions;
use planar_autom::prelude::*;

#[derive(Parser)]
#[command(name = "planar-name")]
#[command(about = "Name the plane graphs read as planar code from stdin")]
struct Args {
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
    let mut out = BufWriter::new(stdout.lock());

    for (idx, code) in PlanarCodeReader::new(stdin.lock()).enumerate() {
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
        match name_graph(&graph, &group)? {
            Some(name) => writeln!(out, "{name}")?,
            None => {
                writeln!(out, "UNKNOWN")?;
                warn!("Unable to get name for graph {nr}");
            }
        }
    }
    out.flush()?;
    Ok(())
}
