use crate::plane_graph::PlaneGraph;

/// Check if two objects are identical
pub trait IsIdentical {
    fn is_identical(&self, other: &Self) -> bool;
}

impl IsIdentical for PlaneGraph {
    /// Same number of vertices and the same clockwise neighbour lists,
    /// each starting at the first arc
    fn is_identical(&self, other: &Self) -> bool {
        self.vertex_count() == other.vertex_count()
            && (0..self.vertex_count())
                .all(|v| self.neighbours(v).eq(other.neighbours(v)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(rotations: &[Vec<usize>]) -> PlaneGraph {
        PlaneGraph::from_rotation_system(rotations).unwrap()
    }

    #[test]
    fn ident() {
        let g1 = graph(&testing::pyramid(4));
        let g2 = graph(&testing::mirror(&testing::pyramid(4)));
        assert!(g1.is_identical(&g1));
        assert!(g2.is_identical(&g2));
        assert!(!g1.is_identical(&g2));
    }

    #[test]
    fn rotated_lists() {
        let g1 = graph(&[vec![1, 2, 3], vec![0], vec![0], vec![0]]);
        let g2 = graph(&[vec![2, 3, 1], vec![0], vec![0], vec![0]]);
        assert!(!g1.is_identical(&g2));
        assert!(!g1.is_identical(&graph(&testing::tetrahedron())));
    }
}
