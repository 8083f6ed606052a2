use std::cmp::Ordering;

use itertools::Itertools;
use log::{debug, trace};
#[cfg(feature = "serde-1")]
use serde::{Deserialize, Serialize};

use crate::certificate::{Certificate, CertificateWalk, Labelling, Orientation};
use crate::error::PlanarError;
use crate::plane_graph::{PlaneGraph, NO_ARC};

/// Automorphism group of a plane graph
///
/// The group is stored as an explicit list of vertex permutations. The
/// first [orientation_preserving_count](Self::orientation_preserving_count)
/// entries preserve the embedding, the remaining ones mirror it. The
/// first entry is always the identity.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-1", derive(Serialize, Deserialize))]
pub struct AutomorphismGroup {
    automorphisms: Vec<Vec<usize>>,
    orientation_preserving: usize,
    orientation_reversing: usize,
    certificate: Certificate,
    start: usize,
    orientation: Orientation,
}

impl AutomorphismGroup {
    /// Determine the automorphism group of a plane graph
    ///
    /// The faces of the graph have to be computed first, see
    /// [PlaneGraph::make_dual] or use [TryIntoAutom].
    pub fn determine(graph: &PlaneGraph) -> Result<Self, PlanarError> {
        Self::search(graph, true)
    }

    /// Determine the orientation-preserving automorphisms only
    ///
    /// The resulting certificate distinguishes a chiral graph from its
    /// mirror image.
    pub fn determine_orientation_preserving(
        graph: &PlaneGraph,
    ) -> Result<Self, PlanarError> {
        Self::search(graph, false)
    }

    fn search(graph: &PlaneGraph, with_mirror: bool) -> Result<Self, PlanarError> {
        if graph.vertex_count() == 0 {
            return Err(PlanarError::MalformedGraph(
                "graph has no vertices".to_owned(),
            ));
        }
        if !graph.has_dual() {
            return Err(PlanarError::MalformedGraph(
                "faces have not been computed".to_owned(),
            ));
        }
        if graph.arc_count() == 0 {
            return Ok(Self::trivial(graph.vertex_count()));
        }

        let candidates = starting_arcs(graph);
        let Some((&first, rest)) = candidates.split_first() else {
            return Err(PlanarError::MalformedGraph(
                "no starting arcs".to_owned(),
            ));
        };
        let mut search = Search::new(graph, first);
        for &e in rest {
            search.try_candidate(e, Orientation::Preserving);
        }
        if with_mirror {
            for &e in &candidates {
                search.try_candidate(graph.arc(e).next, Orientation::Reversing);
            }
        }
        let group = search.finish();
        debug!(
            "{} automorphisms ({} preserving, {} reversing) from {} starting arcs",
            group.order(),
            group.orientation_preserving,
            group.orientation_reversing,
            candidates.len()
        );
        Ok(group)
    }

    /// Group with the given elements, the first `preserving` of which
    /// preserve the orientation
    #[cfg(test)]
    pub(crate) fn from_parts(automorphisms: Vec<Vec<usize>>, preserving: usize) -> Self {
        Self {
            orientation_reversing: automorphisms.len() - preserving,
            orientation_preserving: preserving,
            automorphisms,
            certificate: Certificate::default(),
            start: NO_ARC,
            orientation: Orientation::Preserving,
        }
    }

    fn trivial(vertex_count: usize) -> Self {
        Self {
            automorphisms: vec![(0..vertex_count).collect()],
            orientation_preserving: 1,
            orientation_reversing: 0,
            certificate: Certificate::lone_vertex(),
            start: NO_ARC,
            orientation: Orientation::Preserving,
        }
    }

    /// The size of the automorphism group
    pub fn order(&self) -> usize {
        self.orientation_preserving + self.orientation_reversing
    }

    pub fn automorphisms(&self) -> &[Vec<usize>] {
        &self.automorphisms
    }

    /// Automorphisms preserving the embedding, starting with the identity
    pub fn preserving(&self) -> &[Vec<usize>] {
        &self.automorphisms[..self.orientation_preserving]
    }

    /// Automorphisms mapping the embedding onto its mirror image
    pub fn reversing(&self) -> &[Vec<usize>] {
        &self.automorphisms[self.orientation_preserving..]
    }

    pub fn orientation_preserving_count(&self) -> usize {
        self.orientation_preserving
    }

    pub fn orientation_reversing_count(&self) -> usize {
        self.orientation_reversing
    }

    /// Whether the `i`th automorphism preserves or reverses the embedding
    pub fn orientation_of(&self, i: usize) -> Orientation {
        if i < self.orientation_preserving {
            Orientation::Preserving
        } else {
            Orientation::Reversing
        }
    }

    /// Iterate over all automorphisms together with their orientation
    pub fn iter(&self) -> impl Iterator<Item = (&[usize], Orientation)> + '_ {
        self.automorphisms
            .iter()
            .enumerate()
            .map(|(i, a)| (a.as_slice(), self.orientation_of(i)))
    }

    pub fn is_trivial(&self) -> bool {
        self.order() == 1
    }

    /// Whether the group only contains orientation-preserving elements
    pub fn is_chiral(&self) -> bool {
        self.orientation_reversing == 0
    }

    /// The smallest certificate over all starting arcs and orientations
    ///
    /// Isomorphic plane graphs and their mirror images share the same
    /// certificate.
    pub fn certificate(&self) -> &Certificate {
        &self.certificate
    }

    /// Arc from which the smallest certificate was generated
    ///
    /// `None` if the graph has no arcs.
    pub fn canonical_start(&self) -> Option<usize> {
        (self.start != NO_ARC).then_some(self.start)
    }

    /// Orientation in which the smallest certificate was generated
    pub fn canonical_orientation(&self) -> Orientation {
        self.orientation
    }
}

/// Determine the automorphism group, computing faces if necessary
pub trait TryIntoAutom {
    fn try_into_autom(self) -> Result<AutomorphismGroup, PlanarError>;
}

/// Determine the automorphism group, computing faces if necessary
///
/// # Panics
///
/// Panics if the graph has no vertices.
pub trait IntoAutom {
    fn into_autom(self) -> AutomorphismGroup;
}

impl TryIntoAutom for &mut PlaneGraph {
    fn try_into_autom(self) -> Result<AutomorphismGroup, PlanarError> {
        self.make_dual();
        AutomorphismGroup::determine(self)
    }
}

impl<T: TryIntoAutom> IntoAutom for T {
    fn into_autom(self) -> AutomorphismGroup {
        self.try_into_autom().unwrap()
    }
}

/// Candidate arcs for the canonical certificate
///
/// Among the vertices of the rarest degree (the smallest such degree
/// on ties) look at the incident faces and pick the rarest face size
/// in the same way. The candidates are all arcs starting at one of
/// these vertices with a face of that size on their right.
///
/// For orientation-reversing certificates the candidates are the
/// `next` arcs of the returned ones.
pub fn starting_arcs(graph: &PlaneGraph) -> Vec<usize> {
    let Some(degree) = rarest(graph.degrees().iter().copied()) else {
        return Vec::new();
    };
    let face_size_of = |e: usize| graph.face_size(graph.arc(e).right_face);
    let Some(face_size) = rarest(arcs_at_degree(graph, degree).map(face_size_of)) else {
        return Vec::new();
    };
    arcs_at_degree(graph, degree)
        .filter(|&e| face_size_of(e) == face_size)
        .collect()
}

fn arcs_at_degree(graph: &PlaneGraph, degree: usize) -> impl Iterator<Item = usize> + '_ {
    (0..graph.vertex_count())
        .filter(move |&v| graph.degree(v) == degree && degree > 0)
        .flat_map(move |v| graph.rotation(v))
}

fn rarest(values: impl Iterator<Item = usize>) -> Option<usize> {
    values
        .counts()
        .into_iter()
        .min_by_key(|&(value, count)| (count, value))
        .map(|(value, _)| value)
}

/// Check that `perm` maps the rotation at each vertex onto the
/// rotation at its image, or onto its reverse for orientation-reversing
/// maps
pub fn preserves_embedding(
    graph: &PlaneGraph,
    perm: &[usize],
    orientation: Orientation,
) -> bool {
    let nv = graph.vertex_count();
    if perm.len() != nv {
        return false;
    }
    let mut seen = vec![false; nv];
    for &v in perm {
        if v >= nv || std::mem::replace(&mut seen[v], true) {
            return false;
        }
    }
    (0..nv).all(|v| {
        let mut image: Vec<_> = graph.neighbours(v).map(|w| perm[w]).collect();
        if orientation.is_reversing() {
            image.reverse();
        }
        let target: Vec<_> = graph.neighbours(perm[v]).collect();
        is_cyclic_shift(&image, &target)
    })
}

fn is_cyclic_shift(a: &[usize], b: &[usize]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.is_empty()
        || (0..a.len()).any(|s| a[s..].iter().chain(&a[..s]).eq(b.iter()))
}

// State of the search for the smallest certificate
struct Search<'a> {
    graph: &'a PlaneGraph,
    best: Vec<usize>,
    canonical: Labelling,
    alternate: Labelling,
    start: usize,
    orientation: Orientation,
    automorphisms: Vec<Vec<usize>>,
    preserving: usize,
    reversing: usize,
    chiral: bool,
}

impl<'a> Search<'a> {
    fn new(graph: &'a PlaneGraph, start: usize) -> Self {
        let mut canonical = Labelling::default();
        let best = Certificate::construct_with(
            graph,
            start,
            Orientation::Preserving,
            &mut canonical,
        )
        .into_inner();
        Self {
            graph,
            best,
            canonical,
            alternate: Labelling::default(),
            start,
            orientation: Orientation::Preserving,
            automorphisms: vec![(0..graph.vertex_count()).collect()],
            preserving: 1,
            reversing: 0,
            chiral: false,
        }
    }

    fn try_candidate(&mut self, start: usize, orientation: Orientation) -> Ordering {
        let walk = CertificateWalk::new(self.graph, start, orientation, &mut self.alternate);
        let ord = walk.compare(&self.best);
        match ord {
            Ordering::Less => {
                trace!("arc {start} ({orientation:?}) gives a smaller certificate");
                self.adopt(start, orientation);
            }
            Ordering::Equal => {
                trace!("arc {start} ({orientation:?}) gives an automorphism");
                self.record(orientation);
            }
            Ordering::Greater => {}
        }
        ord
    }

    fn adopt(&mut self, start: usize, orientation: Orientation) {
        self.best = Certificate::construct_with(
            self.graph,
            start,
            orientation,
            &mut self.canonical,
        )
        .into_inner();
        self.start = start;
        self.orientation = orientation;
        self.automorphisms.truncate(1);
        self.preserving = 1;
        self.reversing = 0;
        if orientation.is_reversing() {
            // relative to a mirrored best certificate mirrored candidates
            // preserve the embedding
            self.chiral = true;
        }
    }

    fn record(&mut self, orientation: Orientation) {
        let canonical = self.canonical.vertices();
        let perm = self
            .alternate
            .labels()
            .iter()
            .map(|&label| canonical[label])
            .collect();
        self.automorphisms.push(perm);
        if orientation.is_reversing() && !self.chiral {
            self.reversing += 1;
        } else {
            self.preserving += 1;
        }
    }

    fn finish(self) -> AutomorphismGroup {
        AutomorphismGroup {
            automorphisms: self.automorphisms,
            orientation_preserving: self.preserving,
            orientation_reversing: self.reversing,
            certificate: Certificate::from_labels(self.best),
            start: self.start,
            orientation: self.orientation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256Plus;
    use testing::{mirror, randomize_labels, Around::*, TriangulationIter};

    fn log_init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn autom(rotations: &[Vec<usize>]) -> AutomorphismGroup {
        let mut g = PlaneGraph::from_rotation_system(rotations).unwrap();
        let group = (&mut g).try_into_autom().unwrap();
        check_group(&g, &group);
        group
    }

    fn check_group(g: &PlaneGraph, group: &AutomorphismGroup) {
        assert_eq!(group.automorphisms().len(), group.order());
        assert_eq!(
            group.order(),
            group.orientation_preserving_count() + group.orientation_reversing_count()
        );
        let identity: Vec<_> = (0..g.vertex_count()).collect();
        assert_eq!(group.automorphisms()[0], identity);
        for (perm, orientation) in group.iter() {
            assert!(preserves_embedding(g, perm, orientation));
        }
        // mirror images of paths and cycles can act trivially on vertices
        assert!(group.preserving().iter().all_unique());
        assert!(group.reversing().iter().all_unique());
    }

    #[test]
    fn tetrahedron() {
        log_init();

        let group = autom(&testing::tetrahedron());
        assert_eq!(group.order(), 24);
        assert_eq!(group.orientation_preserving_count(), 12);
        assert_eq!(group.orientation_reversing_count(), 12);
    }

    #[test]
    fn platonic() {
        log_init();

        assert_eq!(autom(&testing::cube()).order(), 48);
        assert_eq!(autom(&testing::octahedron()).order(), 48);
        let group = autom(&testing::icosahedron());
        assert_eq!(group.order(), 120);
        assert_eq!(group.orientation_reversing_count(), 60);
    }

    #[test]
    fn families() {
        log_init();

        assert_eq!(autom(&testing::prism(5)).order(), 20);
        assert_eq!(autom(&testing::antiprism(4)).order(), 16);
        assert_eq!(autom(&testing::pyramid(5)).order(), 10);
        assert_eq!(autom(&testing::bipyramid(5)).order(), 20);
    }

    #[test]
    fn trees() {
        log_init();

        let group = autom(&testing::spider(&[1, 2, 3]));
        assert!(group.is_trivial());
        let group = autom(&testing::spider(&[2, 2, 2]));
        assert_eq!(group.order(), 6);
        assert_eq!(group.orientation_reversing_count(), 3);
        let group = autom(&[vec![1], vec![0]]);
        assert_eq!(group.order(), 4);
    }

    #[test]
    fn orientation_preserving() {
        log_init();

        fn preserving(rotations: &[Vec<usize>]) -> AutomorphismGroup {
            let mut g = PlaneGraph::from_rotation_system(rotations).unwrap();
            g.make_dual();
            let group = AutomorphismGroup::determine_orientation_preserving(&g).unwrap();
            check_group(&g, &group);
            assert_eq!(group.orientation_reversing_count(), 0);
            group
        }

        // chiral graphs differ from their mirror images
        let pinwheel = testing::decorated_cycle(4, |_| vec![Next, Leaf, Path, Prev]);
        let group = preserving(&pinwheel);
        assert_eq!(group.order(), 4);
        assert_ne!(group.certificate(), preserving(&mirror(&pinwheel)).certificate());
        assert_eq!(autom(&pinwheel).certificate(), autom(&mirror(&pinwheel)).certificate());

        let decorated = testing::decorate_corners(&testing::tetrahedron());
        let group = preserving(&decorated);
        assert_eq!(group.order(), 12);
        assert_ne!(group.certificate(), preserving(&mirror(&decorated)).certificate());

        for rot in [testing::pyramid(4), testing::prism(5), testing::spider(&[1, 1, 2])] {
            let full = autom(&rot);
            let group = preserving(&rot);
            assert_eq!(group.order(), full.orientation_preserving_count());
            assert_eq!(group.certificate(), preserving(&mirror(&rot)).certificate());
        }
    }

    #[test]
    fn lone_vertex() {
        log_init();

        let group = autom(&[vec![]]);
        assert!(group.is_trivial());
        assert_eq!(group.canonical_start(), None);
    }

    #[test]
    fn requires_faces() {
        log_init();

        let mut g = PlaneGraph::new(4, 0).unwrap();
        let k4 = testing::tetrahedron();
        g.load(4, k4.iter().map(|r| r.iter().copied())).unwrap();
        assert!(AutomorphismGroup::determine(&g).is_err());
        assert_eq!(g.into_autom().order(), 24);
    }

    #[test]
    fn starting_arcs_pyramid() {
        log_init();

        // the apex is the only vertex of degree 5
        let g = PlaneGraph::from_rotation_system(&testing::pyramid(5)).unwrap();
        let arcs = starting_arcs(&g);
        assert_eq!(arcs.len(), 5);
        assert!(arcs.iter().all(|&e| g.arc(e).start == 5));
    }

    #[test]
    fn random_triangulations() {
        log_init();

        let mut rng = Xoshiro256Plus::seed_from_u64(1);
        for rot in TriangulationIter::default().take(100) {
            let group = autom(&rot);
            assert_eq!(group.order() % group.orientation_preserving_count(), 0);

            let relabelled = randomize_labels(&rot, &mut rng);
            let other = autom(&relabelled);
            assert_eq!(group.order(), other.order());
            assert_eq!(group.certificate(), other.certificate());

            let mirrored = autom(&mirror(&rot));
            assert_eq!(group.order(), mirrored.order());
            assert_eq!(group.certificate(), mirrored.certificate());
        }
    }
}
