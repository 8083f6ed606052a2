use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use clap::Parser;
use itertools::Itertools;
use log::error;

use planar_autom::orbits::{edge_ends, edge_orbits, vertex_orbits, Orbits};
use planar_autom::planar_code::PlanarCodeReader;
use planar_autom::plane_graph::DecodeOptions;
use planar_autom::prelude::*;

#[derive(Parser)]
#[command(name = "planar-stats")]
#[command(about = "Print statistics of plane graphs read as planar code from stdin")]
struct Args {
    /// Include a summary at the end
    #[arg(short, long)]
    summary: bool,

    /// Only print information for the graph with the given number
    #[arg(short, long, value_name = "NUMBER")]
    filter: Option<usize>,

    /// Give information about the automorphism group of the graphs
    #[arg(short, long)]
    automorphisms: bool,

    /// Give an overview of the vertex orbits
    #[arg(short = 'V', long)]
    vertex_orbits: bool,

    /// Give an overview of the (undirected) edge orbits
    #[arg(short = 'E', long)]
    edge_orbits: bool,

    /// Start each report with the number of the graph
    #[arg(long)]
    numbering: bool,

    /// Largest number of vertices of an input graph
    #[arg(long, default_value_t = 1000)]
    max_vertices: usize,
}

/// Values in descending order, separated by spaces
fn write_sequence(out: &mut impl Write, title: &str, values: &[usize]) -> io::Result<()> {
    let sorted = values.iter().sorted_unstable_by(|a, b| b.cmp(a));
    writeln!(out, "{title}{} ", sorted.format(" "))
}

/// Frequency of each value from 1 to the maximum
fn write_vector(out: &mut impl Write, title: &str, values: &[usize]) -> io::Result<()> {
    let counts = values.iter().counts();
    let max = values.iter().copied().max().unwrap_or(0);
    let frequencies = (1..=max).map(|v| counts.get(&v).copied().unwrap_or(0));
    writeln!(out, "{title}{} ", frequencies.format(" "))
}

fn write_orbits(
    out: &mut impl Write,
    what: &str,
    orbits: &Orbits,
    name: impl Fn(usize) -> String,
) -> io::Result<()> {
    writeln!(out, "{what} orbits:")?;
    for (nr, orbit) in orbits.orbits().iter().enumerate() {
        writeln!(
            out,
            "   Orbit {}: {}",
            nr + 1,
            orbit.iter().map(|&x| name(x)).format(", ")
        )?;
    }
    Ok(())
}

fn write_statistics(
    out: &mut impl Write,
    args: &Args,
    nr: usize,
    graph: &mut PlaneGraph,
) -> Result<()> {
    let need_group = args.automorphisms || args.vertex_orbits || args.edge_orbits;
    let group = if need_group {
        Some((&mut *graph).try_into_autom()?)
    } else {
        graph.make_dual();
        None
    };

    if args.numbering {
        writeln!(out, "Graph {nr}")?;
    }
    writeln!(out, "Number of vertices: {}", graph.vertex_count())?;
    writeln!(out, "Number of edges: {}", graph.edge_count())?;
    writeln!(out, "Number of faces: {}", graph.face_count())?;
    if let (true, Some(group)) = (args.automorphisms, &group) {
        writeln!(out, "Number of automorphisms: {}", group.order())?;
        writeln!(
            out,
            "Number of orientation preserving automorphisms: {}",
            group.orientation_preserving_count()
        )?;
        writeln!(
            out,
            "Number of orientation reversing automorphisms: {}",
            group.orientation_reversing_count()
        )?;
    }
    write_sequence(out, "Degree sequence:    ", graph.degrees())?;
    write_vector(out, "Degree vector:    ", graph.degrees())?;
    write_sequence(out, "Face size sequence: ", graph.face_sizes())?;
    write_vector(out, "Face size vector: ", graph.face_sizes())?;

    if let Some(group) = &group {
        if args.vertex_orbits {
            if group.is_trivial() {
                writeln!(
                    out,
                    "Graph has trivial symmetry, so each vertex corresponds to an orbit."
                )?;
            } else {
                let orbits = vertex_orbits(group);
                write_orbits(out, "Vertex", &orbits, |v| (v + 1).to_string())?;
            }
        }
        if args.edge_orbits {
            if group.is_trivial() {
                writeln!(
                    out,
                    "Graph has trivial symmetry, so each edge corresponds to an orbit."
                )?;
            } else {
                let orbits = edge_orbits(graph, group);
                let ends = edge_ends(graph);
                write_orbits(out, "Edge", &orbits, |idx| {
                    let (v, w) = ends[idx];
                    format!("{}-{}", v + 1, w + 1)
                })?;
            }
        }
    }
    writeln!(out)?;
    Ok(())
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let options = DecodeOptions {
        max_vertices: args.max_vertices,
        compute_dual: false,
        ..Default::default()
    };
    let mut graph = PlaneGraph::with_options(&options)?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut graphs_read = 0;
    let mut reports_written = 0;

    for code in PlanarCodeReader::new(stdin.lock()) {
        graphs_read += 1;
        let nr = graphs_read;
        let code = code.with_context(|| format!("Failed to read graph {nr}"))?;
        if args.filter.is_some_and(|filter| filter != nr) {
            continue;
        }
        if let Err(err) = graph.load_planar_code(&code) {
            if err.is_recoverable() {
                error!("Skipping graph {nr}: {err}");
                continue;
            }
            return Err(err).with_context(|| format!("Failed to decode graph {nr}"));
        }
        write_statistics(&mut out, &args, nr, &mut graph)?;
        reports_written += 1;
    }
    if args.summary {
        writeln!(
            out,
            "{graphs_read} graph{} read, {reports_written} report{} written.",
            plural(graphs_read),
            plural(reports_written)
        )?;
    }
    out.flush()?;
    Ok(())
}
