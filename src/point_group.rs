//! Point groups of plane graphs
use std::fmt::{self, Display};
use std::str::FromStr;

use log::{trace, warn};
#[cfg(feature = "serde-1")]
use serde::{Deserialize, Serialize};

use crate::autom::AutomorphismGroup;
use crate::error::PlanarError;
use crate::plane_graph::PlaneGraph;

/// Symmetry group of a polyhedron realising a plane graph
///
/// The parameter of the axial groups is the order of the main rotation
/// axis. `S2n(n)` is the rotoreflection group of order `2n`, printed as
/// `S{2n}`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde-1", derive(Serialize, Deserialize))]
pub enum PointGroup {
    Cn(usize),
    Cnh(usize),
    Cnv(usize),
    S2n(usize),
    Dn(usize),
    Dnh(usize),
    Dnd(usize),
    T,
    Td,
    Th,
    O,
    Oh,
    I,
    Ih,
}

/// The axial point group families
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde-1", derive(Serialize, Deserialize))]
pub enum GroupFamily {
    Cn,
    Cnh,
    Cnv,
    S2n,
    Dn,
    Dnh,
    Dnd,
}

impl GroupFamily {
    pub fn with_parameter(self, n: usize) -> PointGroup {
        use GroupFamily::*;
        match self {
            Cn => PointGroup::Cn(n),
            Cnh => PointGroup::Cnh(n),
            Cnv => PointGroup::Cnv(n),
            S2n => PointGroup::S2n(n),
            Dn => PointGroup::Dn(n),
            Dnh => PointGroup::Dnh(n),
            Dnd => PointGroup::Dnd(n),
        }
    }
}

impl PointGroup {
    /// Number of symmetries in the group
    pub fn order(&self) -> usize {
        use PointGroup::*;
        match *self {
            Cn(n) => n,
            Cnh(n) | Cnv(n) | S2n(n) | Dn(n) => 2 * n,
            Dnh(n) | Dnd(n) => 4 * n,
            T => 12,
            Td | Th | O => 24,
            Oh => 48,
            I => 60,
            Ih => 120,
        }
    }

    /// The family of an axial group, `None` for polyhedral groups
    pub fn family(&self) -> Option<GroupFamily> {
        use PointGroup::*;
        let family = match self {
            Cn(_) => GroupFamily::Cn,
            Cnh(_) => GroupFamily::Cnh,
            Cnv(_) => GroupFamily::Cnv,
            S2n(_) => GroupFamily::S2n,
            Dn(_) => GroupFamily::Dn,
            Dnh(_) => GroupFamily::Dnh,
            Dnd(_) => GroupFamily::Dnd,
            _ => return None,
        };
        Some(family)
    }

    /// The parameter of an axial group, `None` for polyhedral groups
    pub fn parameter(&self) -> Option<usize> {
        use PointGroup::*;
        match *self {
            Cn(n) | Cnh(n) | Cnv(n) | S2n(n) | Dn(n) | Dnh(n) | Dnd(n) => Some(n),
            _ => None,
        }
    }

    /// Whether the group only contains rotations
    pub fn is_chiral(&self) -> bool {
        use PointGroup::*;
        matches!(self, Cn(_) | Dn(_) | T | O | I)
    }
}

impl Display for PointGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use PointGroup::*;
        let name = match *self {
            Cn(n) => format!("C{n}"),
            Cnh(n) => format!("C{n}h"),
            Cnv(n) => format!("C{n}v"),
            S2n(n) => format!("S{}", 2 * n),
            Dn(n) => format!("D{n}"),
            Dnh(n) => format!("D{n}h"),
            Dnd(n) => format!("D{n}d"),
            T => "T".to_owned(),
            Td => "Td".to_owned(),
            Th => "Th".to_owned(),
            O => "O".to_owned(),
            Oh => "Oh".to_owned(),
            I => "I".to_owned(),
            Ih => "Ih".to_owned(),
        };
        f.pad(&name)
    }
}

impl Display for GroupFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use GroupFamily::*;
        let name = match self {
            Cn => "C*",
            Cnh => "C*h",
            Cnv => "C*v",
            S2n => "S*",
            Dn => "D*",
            Dnh => "D*h",
            Dnd => "D*d",
        };
        f.pad(name)
    }
}

/// Determine the point group from the automorphism group
///
/// Rotation axes are identified through vertices, faces, and edges.
/// More than two ends of 3-fold axes, or axes of different orders at
/// least three, mean a polyhedral group, which is then determined by
/// the group order and the number of orientation-reversing symmetries
/// with fix points. Otherwise the group is axial and compared to the
/// order of its main axis.
pub fn classify(
    graph: &PlaneGraph,
    group: &AutomorphismGroup,
) -> Result<PointGroup, PlanarError> {
    Classifier { graph, group }.classify()
}

#[derive(Copy, Clone, Debug)]
enum Center {
    Vertex(usize),
    Face(usize),
    Edge(usize),
}

struct Classifier<'a> {
    graph: &'a PlaneGraph,
    group: &'a AutomorphismGroup,
}

fn unclassifiable(msg: String) -> PlanarError {
    PlanarError::UnclassifiableGroup(msg)
}

impl Classifier<'_> {
    fn classify(&self) -> Result<PointGroup, PlanarError> {
        use PointGroup::*;

        let order = self.group.order();
        let reversing = self.group.orientation_reversing_count();
        if reversing == 0 && (order < 4 || order % 2 == 1) {
            return Ok(Cn(order));
        }
        if reversing == 1 && order == 2 {
            return if self.has_reversing_with_fix_point() {
                Ok(Cnh(1))
            } else {
                Ok(S2n(1))
            };
        }

        // each axis is counted at both ends
        let mut fold_count = [0usize; 6];
        let mut main_axis: Option<(usize, Center)> = None;
        let vertex_axes = (0..self.graph.vertex_count())
            .map(|v| (self.rotation_through_vertex(v), Center::Vertex(v)));
        let face_axes = (0..self.graph.face_count())
            .map(|f| (self.rotation_through_face(f), Center::Face(f)));
        for (fold, center) in vertex_axes.chain(face_axes) {
            if fold > 5 {
                trace!("{fold}-fold rotation around {center:?}");
                return self.axial(fold, center);
            }
            fold_count[fold] += 1;
            if main_axis.map_or(true, |(max, _)| fold > max) {
                main_axis = Some((fold, center));
            }
            let orders_from_three = fold_count[3..].iter().filter(|&&c| c > 0).count();
            if fold_count[3] > 2 || orders_from_three > 1 {
                trace!("rotation axes: {fold_count:?}");
                return self.polyhedral();
            }
        }

        let arcs = self.graph.arcs();
        for (e, arc) in arcs.iter().enumerate() {
            if e < arc.inverse
                && main_axis.map_or(true, |(max, _)| max < 2)
                && self.has_preserving_with_action(arc.start, arc.end, arc.end, arc.start)
            {
                main_axis = Some((2, Center::Edge(e)));
            }
        }
        let Some((fold, center)) = main_axis else {
            return Err(unclassifiable("graph has no vertices".to_owned()));
        };
        trace!("main axis: {fold}-fold rotation around {center:?}");
        self.axial(fold, center)
    }

    fn axial(&self, fold: usize, center: Center) -> Result<PointGroup, PlanarError> {
        use PointGroup::*;

        let order = self.group.order();
        if self.group.orientation_reversing_count() == 0 {
            return if order == fold {
                Ok(Cn(fold))
            } else if order == 2 * fold {
                Ok(Dn(fold))
            } else {
                Err(unclassifiable(format!(
                    "illegal order {order} for chiral axial group with a {fold}-fold rotation"
                )))
            };
        }
        if order == 4 * fold {
            let with_fix_points = self.count_reversing_with_fix_points();
            if with_fix_points == fold {
                Ok(Dnd(fold))
            } else if with_fix_points == fold + 1 {
                Ok(Dnh(fold))
            } else {
                Err(unclassifiable(format!(
                    "{with_fix_points} orientation-reversing symmetries with fix points in axial group of order {order} with a {fold}-fold rotation"
                )))
            }
        } else if order == 2 * fold {
            if self.reversing_stabilises(center)? {
                Ok(Cnv(fold))
            } else if self.has_reversing_with_fix_point() {
                Ok(Cnh(fold))
            } else {
                Ok(S2n(fold))
            }
        } else {
            Err(unclassifiable(format!(
                "illegal order {order} for achiral axial group with a {fold}-fold rotation"
            )))
        }
    }

    // most groups are determined by their order and chirality, only Td
    // and Th need a closer look
    fn polyhedral(&self) -> Result<PointGroup, PlanarError> {
        use PointGroup::*;

        match self.group.order() {
            120 => Ok(Ih),
            60 => Ok(I),
            48 => Ok(Oh),
            24 if self.group.is_chiral() => Ok(O),
            24 => match self.count_reversing_with_fix_points() {
                6 => Ok(Td),
                3 => Ok(Th),
                n => Err(unclassifiable(format!(
                    "{n} orientation-reversing symmetries with fix points in polyhedral group of order 24"
                ))),
            },
            12 => Ok(T),
            order => Err(unclassifiable(format!(
                "illegal order {order} for a polyhedral group"
            ))),
        }
    }

    fn has_preserving_with_action(&self, v: usize, w: usize, v_img: usize, w_img: usize) -> bool {
        self.group
            .preserving()
            .iter()
            .any(|a| a[v] == v_img && a[w] == w_img)
    }

    fn rotation_through_vertex(&self, v: usize) -> usize {
        let deg = self.graph.degree(v);
        let mut rotation = self.graph.rotation(v);
        let Some(first) = rotation.next() else {
            return 1;
        };
        let w = self.graph.arc(first).end;
        for (i, e) in rotation.take(deg / 2).enumerate() {
            let image = self.graph.arc(e).end;
            if self.has_preserving_with_action(v, w, v, image) {
                return deg / (i + 1);
            }
        }
        1
    }

    fn rotation_through_face(&self, f: usize) -> usize {
        let size = self.graph.face_size(f);
        if size == 0 {
            return 1;
        }
        let arcs = self.graph.arcs();
        let mut e = self.graph.face_start(f);
        let (v, w) = (arcs[e].start, arcs[e].end);
        for i in 1..=size / 2 {
            // step backwards along the face boundary
            e = arcs[arcs[e].next].inverse;
            if self.has_preserving_with_action(v, w, arcs[e].start, arcs[e].end) {
                return size / i;
            }
        }
        1
    }

    fn reversing_stabilises(&self, center: Center) -> Result<bool, PlanarError> {
        let mut reversing = self.group.reversing().iter();
        match center {
            Center::Vertex(v) => Ok(reversing.any(|a| a[v] == v)),
            Center::Edge(e) => {
                let arc = self.graph.arc(e);
                let (s, t) = (arc.start, arc.end);
                Ok(reversing.any(|a| (a[s] == s && a[t] == t) || (a[s] == t && a[t] == s)))
            }
            Center::Face(f) => {
                let arc = self.graph.arc(self.graph.face_start(f));
                for a in reversing {
                    let image = self.graph.find_edge(a[arc.start], a[arc.end])?;
                    let inverse = self.graph.arc(image).inverse;
                    if self.graph.arc(inverse).right_face == f {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }

    // a fix point is either a fixed vertex or an edge with swapped ends,
    // a fixed face implies one of the two
    fn has_fix_point(&self, a: &[usize]) -> bool {
        a.iter().enumerate().any(|(v, &img)| v == img)
            || self.graph.arcs().iter().enumerate().any(|(e, arc)| {
                e < arc.inverse && a[arc.start] == arc.end && a[arc.end] == arc.start
            })
    }

    fn has_reversing_with_fix_point(&self) -> bool {
        self.group.reversing().iter().any(|a| self.has_fix_point(a))
    }

    fn count_reversing_with_fix_points(&self) -> usize {
        self.group
            .reversing()
            .iter()
            .filter(|a| self.has_fix_point(a))
            .count()
    }
}

/// A point group or a whole family of axial groups
///
/// Patterns are written like [PointGroup] names, with `*` standing for
/// any parameter, e.g. `C*v`, `D5h`, `S*`, or `Td`. `Sn` requires an
/// even `n`. Some alternative names are accepted and replaced:
///
/// | name  | replacement |
/// |-------|-------------|
/// | `Cs`  | `C1h`       |
/// | `C1v` | `C1h`       |
/// | `Ci`  | `S2`        |
/// | `D1`  | `C2`        |
/// | `D1h` | `C2v`       |
/// | `D1d` | `C2h`       |
/// | `Dnv` | `Dnd`       |
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde-1", derive(Serialize, Deserialize))]
pub enum GroupPattern {
    Group(PointGroup),
    Family(GroupFamily),
}

impl GroupPattern {
    pub fn matches(&self, group: &PointGroup) -> bool {
        match self {
            Self::Group(g) => g == group,
            Self::Family(f) => group.family() == Some(*f),
        }
    }
}

impl Display for GroupPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Group(g) => Display::fmt(g, f),
            Self::Family(family) => Display::fmt(family, f),
        }
    }
}

impl From<PointGroup> for GroupPattern {
    fn from(group: PointGroup) -> Self {
        Self::Group(group)
    }
}

impl From<GroupFamily> for GroupPattern {
    fn from(family: GroupFamily) -> Self {
        Self::Family(family)
    }
}

fn alias(name: &str) -> Option<PointGroup> {
    use PointGroup::*;
    let group = match name {
        "Cs" | "C1v" => Cnh(1),
        "Ci" => S2n(1),
        "D1" => Cn(2),
        "D1h" => Cnv(2),
        "D1d" => Cnh(2),
        _ => return None,
    };
    Some(group)
}

impl FromStr for GroupPattern {
    type Err = PlanarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use PointGroup::*;

        if let Some(group) = alias(s) {
            warn!("Replaced {s} by {group}");
            return Ok(group.into());
        }
        let polyhedral = match s {
            "T" => Some(T),
            "Td" => Some(Td),
            "Th" => Some(Th),
            "O" => Some(O),
            "Oh" => Some(Oh),
            "I" => Some(I),
            "Ih" => Some(Ih),
            _ => None,
        };
        if let Some(group) = polyhedral {
            return Ok(group.into());
        }

        let invalid = || PlanarError::InvalidGroupName(s.to_owned());
        let mut chars = s.chars();
        let letter = chars.next().ok_or_else(invalid)?;
        let rest = chars.as_str();
        let (parameter, suffix) = if let Some(suffix) = rest.strip_prefix('*') {
            (None, suffix)
        } else {
            let digits = rest.chars().take_while(|c| c.is_ascii_digit()).count();
            let n: usize = rest[..digits].parse().map_err(|_| invalid())?;
            if n == 0 {
                return Err(invalid());
            }
            (Some(n), &rest[digits..])
        };
        let family = match (letter, suffix) {
            ('C', "") => GroupFamily::Cn,
            ('C', "h") => GroupFamily::Cnh,
            ('C', "v") => GroupFamily::Cnv,
            ('S', "") => GroupFamily::S2n,
            ('D', "") => GroupFamily::Dn,
            ('D', "h") => GroupFamily::Dnh,
            ('D', "d") => GroupFamily::Dnd,
            ('D', "v") => {
                let replacement: GroupPattern = match parameter {
                    Some(n) => Dnd(n).into(),
                    None => GroupFamily::Dnd.into(),
                };
                warn!("Replaced {s} by {replacement}");
                GroupFamily::Dnd
            }
            _ => return Err(invalid()),
        };
        let pattern = match (family, parameter) {
            (family, None) => family.into(),
            (GroupFamily::S2n, Some(n)) if n % 2 == 1 => return Err(invalid()),
            (GroupFamily::S2n, Some(n)) => S2n(n / 2).into(),
            (family, Some(n)) => family.with_parameter(n).into(),
        };
        Ok(pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::autom::TryIntoAutom;
    use log::debug;
    use testing::{decorate_corners, decorated_cycle, pyritohedral_cube, Around::*, TriangulationIter};

    fn log_init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn point_group(rotations: &[Vec<usize>]) -> PointGroup {
        let mut g = PlaneGraph::from_rotation_system(rotations).unwrap();
        let group = (&mut g).try_into_autom().unwrap();
        let res = classify(&g, &group).unwrap();
        debug!("{res} of order {}", group.order());
        assert_eq!(res.order(), group.order());
        res
    }

    #[test]
    fn platonic() {
        log_init();

        assert_eq!(point_group(&testing::tetrahedron()), PointGroup::Td);
        assert_eq!(point_group(&testing::cube()), PointGroup::Oh);
        assert_eq!(point_group(&testing::octahedron()), PointGroup::Oh);
        assert_eq!(point_group(&testing::icosahedron()), PointGroup::Ih);
    }

    #[test]
    fn axial() {
        log_init();

        assert_eq!(point_group(&testing::prism(5)), PointGroup::Dnh(5));
        assert_eq!(point_group(&testing::prism(7)), PointGroup::Dnh(7));
        assert_eq!(point_group(&testing::antiprism(4)), PointGroup::Dnd(4));
        assert_eq!(point_group(&testing::pyramid(5)), PointGroup::Cnv(5));
        assert_eq!(point_group(&testing::pyramid(8)), PointGroup::Cnv(8));
        assert_eq!(point_group(&testing::bipyramid(5)), PointGroup::Dnh(5));
        assert_eq!(point_group(&testing::spider(&[2, 2, 2])), PointGroup::Cnv(3));
        assert_eq!(point_group(&[vec![1], vec![0]]), PointGroup::Cnv(2));
    }

    #[test]
    fn trivial() {
        log_init();

        assert_eq!(point_group(&testing::spider(&[1, 2, 3])), PointGroup::Cn(1));
        assert_eq!(point_group(&[vec![]]), PointGroup::Cn(1));
    }

    #[test]
    fn chiral_axial() {
        log_init();

        let pinwheel = |n| decorated_cycle(n, |_| vec![Next, Leaf, Path, Prev]);
        assert_eq!(point_group(&pinwheel(3)), PointGroup::Cn(3));
        assert_eq!(point_group(&pinwheel(4)), PointGroup::Cn(4));
        // the same decoration on both sides of the cycle
        let two_sided = decorated_cycle(3, |_| vec![Next, Leaf, Path, Prev, Leaf, Path]);
        assert_eq!(point_group(&two_sided), PointGroup::Dn(3));
    }

    #[test]
    fn horizontal_mirror() {
        log_init();

        assert_eq!(point_group(&testing::spider(&[1, 1, 2])), PointGroup::Cnh(1));
        // mirror images of the decoration on the two sides
        let mirrored = decorated_cycle(3, |_| vec![Next, Leaf, Path, Prev, Path, Leaf]);
        let res = point_group(&mirrored);
        assert_eq!(res, PointGroup::Cnh(3));
        assert_eq!(res.to_string(), "C3h");
    }

    #[test]
    fn rotoreflection() {
        log_init();

        // decorations alternate between the two sides with opposite
        // orientations
        let alternating = |n| {
            decorated_cycle(n, |i| {
                if i % 2 == 0 {
                    vec![Next, Leaf, Path, Prev]
                } else {
                    vec![Next, Prev, Path, Leaf]
                }
            })
        };
        assert_eq!(point_group(&alternating(4)), PointGroup::S2n(2));
        assert_eq!(point_group(&alternating(6)), PointGroup::S2n(3));
    }

    #[test]
    fn polyhedral() {
        log_init();

        let chiral = |rot: Vec<Vec<usize>>| point_group(&decorate_corners(&rot));
        assert_eq!(chiral(testing::tetrahedron()), PointGroup::T);
        assert_eq!(chiral(testing::cube()), PointGroup::O);
        assert_eq!(chiral(testing::icosahedron()), PointGroup::I);
        assert_eq!(point_group(&pyritohedral_cube()), PointGroup::Th);
    }

    #[test]
    fn illegal_orders() {
        log_init();

        // classify a subset of the automorphisms that is not a group
        fn unclassifiable(
            rotations: &[Vec<usize>],
            pick: impl Fn(&AutomorphismGroup) -> (Vec<Vec<usize>>, Vec<Vec<usize>>),
        ) {
            let mut g = PlaneGraph::from_rotation_system(rotations).unwrap();
            let group = (&mut g).try_into_autom().unwrap();
            let (preserving, reversing) = pick(&group);
            let count = preserving.len();
            let group = AutomorphismGroup::from_parts([preserving, reversing].concat(), count);
            let err = classify(&g, &group).unwrap_err();
            debug!("{err}");
            assert!(matches!(err, PlanarError::UnclassifiableGroup(_)));
        }

        // polyhedral rotations with half of the reflections
        unclassifiable(&testing::tetrahedron(), |group| {
            (group.preserving().to_vec(), group.reversing()[..6].to_vec())
        });
        // six rotations around the axis and two half turns
        unclassifiable(&testing::prism(6), |group| {
            let (rotations, half_turns): (Vec<_>, Vec<_>) =
                group.preserving().iter().cloned().partition(|a| a[0] < 6);
            assert_eq!(rotations.len(), 6);
            ([rotations, half_turns[..2].to_vec()].concat(), Vec::new())
        });
        // pentagonal prism with half of the orientation-reversing symmetries
        unclassifiable(&testing::prism(5), |group| {
            (group.preserving().to_vec(), group.reversing()[..5].to_vec())
        });
    }

    #[test]
    fn random_triangulations() {
        log_init();

        for rot in TriangulationIter::default().take(200) {
            point_group(&rot);
        }
    }

    #[test]
    fn display() {
        log_init();

        assert_eq!(PointGroup::Cnv(3).to_string(), "C3v");
        assert_eq!(PointGroup::S2n(2).to_string(), "S4");
        assert_eq!(PointGroup::Ih.to_string(), "Ih");
        assert_eq!(format!("{:<7}|", PointGroup::Dnd(12)), "D12d   |");
        assert_eq!(GroupPattern::Family(GroupFamily::Cnv).to_string(), "C*v");
    }

    #[test]
    fn parse() {
        log_init();

        use PointGroup::*;
        let parse = |s: &str| s.parse::<GroupPattern>();
        assert_eq!(parse("C3v").unwrap(), GroupPattern::from(Cnv(3)));
        assert_eq!(parse("S6").unwrap(), GroupPattern::from(S2n(3)));
        assert_eq!(parse("D12").unwrap(), GroupPattern::from(Dn(12)));
        assert_eq!(parse("Td").unwrap(), GroupPattern::from(Td));
        assert_eq!(parse("C*h").unwrap(), GroupPattern::from(GroupFamily::Cnh));
        assert_eq!(parse("S*").unwrap(), GroupPattern::from(GroupFamily::S2n));
        assert_eq!(parse("Cs").unwrap(), GroupPattern::from(Cnh(1)));
        assert_eq!(parse("Ci").unwrap(), GroupPattern::from(S2n(1)));
        assert_eq!(parse("D1d").unwrap(), GroupPattern::from(Cnh(2)));
        assert_eq!(parse("D4v").unwrap(), GroupPattern::from(Dnd(4)));
        for invalid in ["", "X", "C", "C0", "S3", "Tx", "Ohh", "C3x", "D*q", "C-1"] {
            assert!(parse(invalid).is_err(), "{invalid}");
        }
    }

    #[test]
    fn pattern_matching() {
        log_init();

        use PointGroup::*;
        let pattern: GroupPattern = "D*h".parse().unwrap();
        assert!(pattern.matches(&Dnh(3)));
        assert!(pattern.matches(&Dnh(17)));
        assert!(!pattern.matches(&Dnd(3)));
        assert!(!pattern.matches(&Oh));
        let pattern: GroupPattern = "Oh".parse().unwrap();
        assert!(pattern.matches(&Oh));
        assert!(!pattern.matches(&O));
    }
}
