//! Names for highly symmetric plane graphs
use crate::autom::AutomorphismGroup;
use crate::error::PlanarError;
use crate::orbits::{face_orbits, vertex_orbits, Orbits};
use crate::plane_graph::PlaneGraph;

/// Name a plane graph after the polyhedron it is the skeleton of
///
/// Graphs with a single vertex orbit are named as cycles, Platonic or
/// Archimedean solids, prisms, or antiprisms. Graphs with two vertex
/// orbits are named as pyramids, bipyramids, trapezohedra, or
/// (gyro)elongated bipyramids. All other graphs are just called "Plane
/// graph on n vertices".
///
/// Returns `None` if the graph has one or two vertex orbits, but does
/// not fit any of the known names. The faces of the graph have to be
/// computed first.
pub fn name_graph(
    graph: &PlaneGraph,
    group: &AutomorphismGroup,
) -> Result<Option<String>, PlanarError> {
    let vertices = vertex_orbits(group);
    match vertices.count() {
        1 => name_vertex_transitive(graph, group),
        2 => name_two_orbits(graph, group, &vertices),
        _ => Ok(Some(format!(
            "Plane graph on {} vertices",
            graph.vertex_count()
        ))),
    }
}

// face sizes of the orbit representatives
fn orbit_face_sizes(graph: &PlaneGraph, faces: &Orbits) -> Vec<usize> {
    faces
        .orbits()
        .iter()
        .map(|orbit| graph.face_size(orbit[0]))
        .collect()
}

fn name_vertex_transitive(
    graph: &PlaneGraph,
    group: &AutomorphismGroup,
) -> Result<Option<String>, PlanarError> {
    let nv = graph.vertex_count();
    if graph.degree(0) == 2 {
        return Ok(Some(format!("cycle on {nv} vertices")));
    }
    let faces = face_orbits(graph, group)?;
    let name = match faces.count() {
        1 => platonic(nv).map(str::to_owned),
        2 if faces.sizes().min() == Some(2) => prism_or_antiprism(graph, &faces),
        2 => {
            let mut sizes = orbit_face_sizes(graph, &faces);
            sizes.sort_unstable();
            archimedean_2(sizes[0], sizes[1]).map(str::to_owned)
        }
        _ => {
            let mut sizes = orbit_face_sizes(graph, &faces);
            sizes.truncate(3);
            sizes.sort_unstable();
            archimedean_3(sizes[0], sizes[1], sizes[2]).map(str::to_owned)
        }
    };
    Ok(name)
}

fn platonic(nv: usize) -> Option<&'static str> {
    match nv {
        4 => Some("tetrahedron"),
        6 => Some("octahedron"),
        8 => Some("cube"),
        12 => Some("icosahedron"),
        20 => Some("dodecahedron"),
        _ => None,
    }
}

fn prism_or_antiprism(graph: &PlaneGraph, faces: &Orbits) -> Option<String> {
    let caps = faces.orbits().iter().find(|o| o.len() == 2)?;
    let sides = faces.orbits().iter().find(|o| o.len() != 2)?;
    let n = graph.face_size(caps[0]);
    match graph.face_size(sides[0]) {
        4 => Some(format!("{n}-gonal prism")),
        3 => Some(format!("{n}-gonal antiprism")),
        _ => None,
    }
}

fn archimedean_2(min_face: usize, max_face: usize) -> Option<&'static str> {
    match (min_face, max_face) {
        (3, 4) => Some("cuboctahedron"),
        (3, 5) => Some("icosidodecahedron"),
        (3, 6) => Some("truncated tetrahedron"),
        (3, 8) => Some("truncated cube"),
        (3, 10) => Some("truncated dodecahedron"),
        (4, 6) => Some("truncated octahedron"),
        (5, 6) => Some("truncated icosahedron"),
        _ => None,
    }
}

fn archimedean_3(min_face: usize, middle_face: usize, max_face: usize) -> Option<&'static str> {
    match (min_face, middle_face, max_face) {
        (3, 3, 4) => Some("snub cube"),
        (3, 3, 5) => Some("snub dodecahedron"),
        (3, 4, 4) => Some("rhombicuboctahedron"),
        (3, 4, 5) => Some("rhombicosidodecahedron"),
        (4, 6, 8) => Some("truncated cuboctahedron"),
        (4, 6, 10) => Some("truncated icosidodecahedron"),
        _ => None,
    }
}

fn name_two_orbits(
    graph: &PlaneGraph,
    group: &AutomorphismGroup,
    vertices: &Orbits,
) -> Result<Option<String>, PlanarError> {
    let nv = graph.vertex_count();
    match vertices.sizes().min() {
        Some(1) => Ok(Some(format!("{}-gonal pyramid", nv - 1))),
        Some(2) => name_with_poles(graph, group),
        _ => Ok(None),
    }
}

fn name_with_poles(
    graph: &PlaneGraph,
    group: &AutomorphismGroup,
) -> Result<Option<String>, PlanarError> {
    let nv = graph.vertex_count();
    let faces = face_orbits(graph, group)?;
    let mut sizes = orbit_face_sizes(graph, &faces);
    sizes.sort_unstable();
    let name = match sizes.as_slice() {
        [3] => Some(format!("{}-gonal bipyramid", nv - 2)),
        [4] => Some(format!("{}-gonal trapezohedron", (nv - 2) / 2)),
        [3, 3] => Some(format!("{}-gonal gyroelongated bipyramid", (nv - 2) / 2)),
        [3, 4] => Some(format!("{}-gonal elongated bipyramid", (nv - 2) / 2)),
        [3, 5] if nv == 10 => Some("double-pinched cube".to_owned()),
        _ => None,
    };
    Ok(name)
}
