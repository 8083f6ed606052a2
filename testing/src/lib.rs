use std::collections::BTreeMap;

use rand::{distributions::Uniform, prelude::*};
use rand_xoshiro::Xoshiro256Plus;

/// Clockwise neighbour lists of all vertices
pub type Rotations = Vec<Vec<usize>>;

/// Build a rotation system from its faces
///
/// Each face is a closed walk `[u, v, w, ...]`, all listed with the
/// same orientation: walking `u -> v -> w` means that `w` directly
/// precedes `u` in the rotation at `v`.
pub fn from_faces(vertex_count: usize, faces: &[Vec<usize>]) -> Rotations {
    let mut successor = vec![Vec::new(); vertex_count];
    for face in faces {
        let k = face.len();
        for i in 0..k {
            let (u, v, w) = (face[i], face[(i + 1) % k], face[(i + 2) % k]);
            successor[v].push((w, u));
        }
    }
    successor
        .into_iter()
        .map(|pairs| {
            let Some(&(first, _)) = pairs.first() else {
                return Vec::new();
            };
            let mut rotation = vec![first];
            let mut current = first;
            loop {
                let next = pairs
                    .iter()
                    .find(|(from, _)| *from == current)
                    .map(|(_, to)| *to)
                    .expect("faces do not form a closed surface");
                if next == first {
                    break;
                }
                rotation.push(next);
                current = next;
            }
            assert_eq!(rotation.len(), pairs.len());
            rotation
        })
        .collect()
}

/// Trace the faces of a rotation system
pub fn faces(rotations: &[Vec<usize>]) -> Vec<Vec<usize>> {
    let mut seen: Vec<Vec<bool>> =
        rotations.iter().map(|r| vec![false; r.len()]).collect();
    let mut res = Vec::new();
    for u in 0..rotations.len() {
        for i in 0..rotations[u].len() {
            if seen[u][i] {
                continue;
            }
            let mut face = Vec::new();
            let (mut from, mut idx) = (u, i);
            while !seen[from][idx] {
                seen[from][idx] = true;
                face.push(from);
                let to = rotations[from][idx];
                // continue with the neighbour preceding `from` at `to`
                let pos = rotations[to]
                    .iter()
                    .position(|&w| w == from)
                    .expect("rotation system is not symmetric");
                let len = rotations[to].len();
                idx = (pos + len - 1) % len;
                from = to;
            }
            res.push(face);
        }
    }
    res
}

/// Reverse the orientation of all rotations
pub fn mirror(rotations: &[Vec<usize>]) -> Rotations {
    rotations
        .iter()
        .map(|r| r.iter().rev().copied().collect())
        .collect()
}

/// Apply a random permutation to the vertices and rotate all
/// neighbour lists by a random offset
pub fn randomize_labels<R: Rng>(rotations: &[Vec<usize>], rng: &mut R) -> Rotations {
    let mut perm: Vec<_> = (0..rotations.len()).collect();
    perm.shuffle(rng);
    let mut res = vec![Vec::new(); rotations.len()];
    for (v, rotation) in rotations.iter().enumerate() {
        let mut image: Vec<_> = rotation.iter().map(|&w| perm[w]).collect();
        if !image.is_empty() {
            let shift = rng.gen_range(0..image.len());
            image.rotate_left(shift);
        }
        res[perm[v]] = image;
    }
    res
}

/// Pyramid over an `n`-gon, the apex is vertex `n`
pub fn pyramid(n: usize) -> Rotations {
    let mut faces = vec![(0..n).rev().collect()];
    faces.extend((0..n).map(|i| vec![i, (i + 1) % n, n]));
    from_faces(n + 1, &faces)
}

/// Two `n`-gons joined by squares
pub fn prism(n: usize) -> Rotations {
    let mut faces = vec![(0..n).rev().collect(), (n..2 * n).collect()];
    faces.extend((0..n).map(|i| {
        let j = (i + 1) % n;
        vec![i, j, n + j, n + i]
    }));
    from_faces(2 * n, &faces)
}

fn antiprism_sides(n: usize) -> Vec<Vec<usize>> {
    (0..n)
        .flat_map(|i| {
            let j = (i + 1) % n;
            [vec![i, j, n + i], vec![j, n + j, n + i]]
        })
        .collect()
}

/// Two `n`-gons joined by a band of triangles
pub fn antiprism(n: usize) -> Rotations {
    let mut faces = vec![(0..n).rev().collect(), (n..2 * n).collect()];
    faces.extend(antiprism_sides(n));
    from_faces(2 * n, &faces)
}

/// Two pyramids over an `n`-gon glued at their base, the apices are
/// `n` and `n + 1`
pub fn bipyramid(n: usize) -> Rotations {
    let faces: Vec<_> = (0..n)
        .flat_map(|i| {
            let j = (i + 1) % n;
            [vec![i, j, n], vec![j, i, n + 1]]
        })
        .collect();
    from_faces(n + 2, &faces)
}

pub fn tetrahedron() -> Rotations {
    pyramid(3)
}

pub fn cube() -> Rotations {
    prism(4)
}

pub fn octahedron() -> Rotations {
    antiprism(3)
}

pub fn icosahedron() -> Rotations {
    gyroelongated_bipyramid(5)
}

fn caps(n: usize) -> Vec<Vec<usize>> {
    let (top, bottom) = (2 * n, 2 * n + 1);
    (0..n)
        .flat_map(|i| {
            let j = (i + 1) % n;
            [vec![n + i, n + j, top], vec![j, i, bottom]]
        })
        .collect()
}

/// Prism with pyramids on both `n`-gons, the apices are `2n` and `2n + 1`
pub fn elongated_bipyramid(n: usize) -> Rotations {
    let mut faces: Vec<_> = (0..n)
        .map(|i| {
            let j = (i + 1) % n;
            vec![i, j, n + j, n + i]
        })
        .collect();
    faces.extend(caps(n));
    from_faces(2 * n + 2, &faces)
}

/// Antiprism with pyramids on both `n`-gons, the apices are `2n` and `2n + 1`
pub fn gyroelongated_bipyramid(n: usize) -> Rotations {
    let mut faces = antiprism_sides(n);
    faces.extend(caps(n));
    from_faces(2 * n + 2, &faces)
}

/// Entry in the rotation of a cycle vertex, see [decorated_cycle]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Around {
    /// The following vertex on the cycle
    Next,
    /// The preceding vertex on the cycle
    Prev,
    /// A new vertex of degree 1
    Leaf,
    /// A new path with two vertices
    Path,
}

/// Cycle `0, ..., n - 1` with trees attached
///
/// `pattern(i)` lists the clockwise rotation at cycle vertex `i`. The
/// cycle vertices on either side of `Leaf` and `Path` entries decide in
/// which of the two faces of the cycle they lie.
pub fn decorated_cycle(n: usize, pattern: impl Fn(usize) -> Vec<Around>) -> Rotations {
    assert!(n >= 3);
    let mut res = vec![Vec::new(); n];
    for i in 0..n {
        for entry in pattern(i) {
            let w = match entry {
                Around::Next => (i + 1) % n,
                Around::Prev => (i + n - 1) % n,
                Around::Leaf => {
                    res.push(vec![i]);
                    res.len() - 1
                }
                Around::Path => {
                    let (start, end) = (res.len(), res.len() + 1);
                    res.push(vec![i, end]);
                    res.push(vec![start]);
                    start
                }
            };
            res[i].push(w);
        }
    }
    res
}

/// Insert a leaf and a path with two vertices after each neighbour
///
/// The decorations destroy all orientation-reversing symmetries while
/// keeping the orientation-preserving ones.
pub fn decorate_corners(rotations: &[Vec<usize>]) -> Rotations {
    let mut res: Rotations = rotations.iter().map(|_| Vec::new()).collect();
    for (v, rotation) in rotations.iter().enumerate() {
        for &w in rotation {
            let (leaf, path, end) = (res.len(), res.len() + 1, res.len() + 2);
            res.extend([vec![v], vec![v, end], vec![path]]);
            res[v].extend([w, leaf, path]);
        }
    }
    res
}

/// Cube with a subdivided chord across each face
///
/// Each chord joins the midpoints of two opposite edges and opposite
/// faces have parallel chords, like the seams of a pyritohedron. Every
/// cube edge carries exactly one chord end.
pub fn pyritohedral_cube() -> Rotations {
    let cube_faces = [
        [3, 2, 1, 0],
        [4, 5, 6, 7],
        [0, 1, 5, 4],
        [1, 2, 6, 5],
        [2, 3, 7, 6],
        [3, 0, 4, 7],
    ];
    // chord between the midpoints of edges 0 and 2 or 1 and 3
    let chords = [1, 1, 0, 1, 0, 1];
    let mut vertex_count = 8;
    let mut midpoints = BTreeMap::new();
    let mut faces = Vec::new();
    for (face, chord) in cube_faces.iter().zip(chords) {
        let mut polygon = Vec::new();
        for k in 0..4 {
            let (a, b) = (face[k], face[(k + 1) % 4]);
            let mid = *midpoints.entry((a.min(b), a.max(b))).or_insert_with(|| {
                vertex_count += 1;
                vertex_count - 1
            });
            polygon.extend([a, mid]);
        }
        let centre = vertex_count;
        vertex_count += 1;
        polygon.rotate_left(2 * chord + 1);
        let mut half = polygon[..=4].to_vec();
        half.push(centre);
        faces.push(half);
        let mut half = polygon[4..].to_vec();
        half.extend([polygon[0], centre]);
        faces.push(half);
    }
    from_faces(vertex_count, &faces)
}

/// Paths of the given lengths joined at a common end, vertex 0
pub fn spider(legs: &[usize]) -> Rotations {
    let mut res = vec![Vec::new()];
    for &len in legs {
        let mut prev = 0;
        for _ in 0..len {
            let v = res.len();
            res[prev].push(v);
            res.push(vec![prev]);
            prev = v;
        }
    }
    res
}

/// Random triangulations of the sphere
///
/// Starting from the tetrahedron, vertices are inserted into randomly
/// chosen triangles.
pub struct TriangulationIter {
    rng: Xoshiro256Plus,
    insertion_distr: Uniform<usize>,
}

impl Default for TriangulationIter {
    fn default() -> Self {
        Self {
            rng: Xoshiro256Plus::seed_from_u64(0),
            insertion_distr: Uniform::from(0..12),
        }
    }
}

impl Iterator for TriangulationIter {
    type Item = Rotations;

    fn next(&mut self) -> Option<Self::Item> {
        let mut rotations = tetrahedron();
        let mut triangles = faces(&rotations);
        let insertions = self.insertion_distr.sample(&mut self.rng);
        for _ in 0..insertions {
            let idx = self.rng.gen_range(0..triangles.len());
            let [a, b, c] = [triangles[idx][0], triangles[idx][1], triangles[idx][2]];
            let x = rotations.len();
            // corner (u, v, w) of the face: at v, w precedes u
            for (u, v, w) in [(a, b, c), (b, c, a), (c, a, b)] {
                let pos = rotations[v]
                    .iter()
                    .position(|&y| y == w)
                    .expect("corner not found");
                debug_assert_eq!(
                    rotations[v][(pos + 1) % rotations[v].len()],
                    u
                );
                rotations[v].insert(pos + 1, x);
            }
            rotations.push(vec![a, b, c]);
            triangles.swap_remove(idx);
            triangles.extend([vec![a, b, x], vec![b, c, x], vec![c, a, x]]);
        }
        Some(rotations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn euler() {
        for rot in [cube(), octahedron(), icosahedron(), prism(7), bipyramid(4)] {
            let nv = rot.len();
            let ne: usize = rot.iter().map(|r| r.len()).sum::<usize>() / 2;
            assert_eq!(nv + faces(&rot).len(), ne + 2);
        }
        use Around::*;
        let pinwheel = decorated_cycle(5, |_| vec![Next, Leaf, Path, Prev]);
        let decorated = [
            pinwheel,
            decorated_cycle(4, |i| {
                if i % 2 == 0 {
                    vec![Next, Leaf, Path, Prev]
                } else {
                    vec![Next, Prev, Path, Leaf]
                }
            }),
            decorate_corners(&cube()),
            pyritohedral_cube(),
        ];
        for rot in decorated {
            let nv = rot.len();
            let ne: usize = rot.iter().map(|r| r.len()).sum::<usize>() / 2;
            assert_eq!(nv + faces(&rot).len(), ne + 2);
        }
        let pyrito = pyritohedral_cube();
        assert_eq!(pyrito.len(), 8 + 12 + 6);
        assert_eq!(faces(&pyrito).len(), 12);
        assert!(faces(&pyrito).iter().all(|f| f.len() == 6));

        for rot in TriangulationIter::default().take(20) {
            let nv = rot.len();
            let ne: usize = rot.iter().map(|r| r.len()).sum::<usize>() / 2;
            assert_eq!(ne, 3 * nv - 6);
            assert_eq!(faces(&rot).len(), 2 * nv - 4);
        }
    }
}
