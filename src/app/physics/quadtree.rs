use eframe::egui::{Vec2, vec2};

const MAX_DEPTH: usize = 24;

/// One square region of the Barnes–Hut tree, stored in a flat arena.
pub(super) struct Cell {
    pub(super) half_extent: f32,
    /// Summed charge of every point below this cell.
    pub(super) charge: f32,
    /// Charge-weighted centroid.
    pub(super) charge_center: Vec2,
    pub(super) children: [Option<usize>; 4],
    /// Points stored directly in this cell; only leaves carry points.
    pub(super) points: Vec<usize>,
}

impl Cell {
    pub(super) fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }

    pub(super) fn width(&self) -> f32 {
        self.half_extent * 2.0
    }
}

pub(super) struct ChargeTree {
    cells: Vec<Cell>,
}

impl ChargeTree {
    /// Builds the tree over `positions`, where every point carries `charge`.
    pub(super) fn build(positions: &[Vec2], charge: f32) -> Option<Self> {
        if positions.is_empty() {
            return None;
        }

        let mut min = vec2(f32::INFINITY, f32::INFINITY);
        let mut max = vec2(f32::NEG_INFINITY, f32::NEG_INFINITY);
        for point in positions {
            min = min.min(*point);
            max = max.max(*point);
        }
        if !min.x.is_finite() || !min.y.is_finite() || !max.x.is_finite() || !max.y.is_finite() {
            return None;
        }

        let half_extent = ((max.x - min.x).max(max.y - min.y) * 0.5).max(1.0);
        let mut tree = Self {
            cells: Vec::with_capacity(positions.len() * 2),
        };
        let points = (0..positions.len()).collect::<Vec<_>>();
        tree.insert_cell((min + max) * 0.5, half_extent, points, positions, charge, 0);
        Some(tree)
    }

    pub(super) fn cell(&self, id: usize) -> &Cell {
        &self.cells[id]
    }

    fn insert_cell(
        &mut self,
        center: Vec2,
        half_extent: f32,
        points: Vec<usize>,
        positions: &[Vec2],
        charge: f32,
        depth: usize,
    ) -> usize {
        let id = self.cells.len();
        let total_charge = charge * points.len() as f32;
        let centroid = points
            .iter()
            .fold(Vec2::ZERO, |acc, &index| acc + positions[index])
            / points.len().max(1) as f32;

        self.cells.push(Cell {
            half_extent,
            charge: total_charge,
            charge_center: centroid,
            children: [None; 4],
            points: Vec::new(),
        });

        let all_coincident = points
            .iter()
            .all(|&index| positions[index] == positions[points[0]]);
        if points.len() <= 1 || all_coincident || depth >= MAX_DEPTH {
            self.cells[id].points = points;
            return id;
        }

        let mut quadrants: [Vec<usize>; 4] = Default::default();
        for index in points {
            let point = positions[index];
            let slot = usize::from(point.x >= center.x) | (usize::from(point.y >= center.y) << 1);
            quadrants[slot].push(index);
        }

        let quarter = half_extent * 0.5;
        for (slot, bucket) in quadrants.into_iter().enumerate() {
            if bucket.is_empty() {
                continue;
            }
            let offset = vec2(
                if slot & 1 == 0 { -quarter } else { quarter },
                if slot & 2 == 0 { -quarter } else { quarter },
            );
            let child = self.insert_cell(center + offset, quarter, bucket, positions, charge, depth + 1);
            self.cells[id].children[slot] = Some(child);
        }

        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_accumulates_total_charge_and_centroid() {
        let positions = [vec2(-10.0, 0.0), vec2(10.0, 0.0), vec2(0.0, 30.0)];
        let tree = ChargeTree::build(&positions, -2.0).expect("tree");

        assert_eq!(tree.cell(0).charge, -6.0);
        assert!((tree.cell(0).charge_center - vec2(0.0, 10.0)).length() < 1e-4);
        assert!(!tree.cell(0).is_leaf());
    }

    #[test]
    fn every_point_lands_in_exactly_one_leaf() {
        let positions = (0..40)
            .map(|i| vec2((i * 7 % 13) as f32, (i * 5 % 11) as f32))
            .collect::<Vec<_>>();
        let tree = ChargeTree::build(&positions, -1.0).expect("tree");

        let mut seen = vec![0usize; positions.len()];
        let mut stack = vec![0usize];
        while let Some(id) = stack.pop() {
            let cell = tree.cell(id);
            for &point in &cell.points {
                seen[point] += 1;
            }
            stack.extend(cell.children.iter().flatten().copied());
        }
        assert!(seen.iter().all(|&count| count == 1));
    }

    #[test]
    fn coincident_points_share_a_leaf() {
        let positions = [vec2(3.0, 3.0); 5];
        let tree = ChargeTree::build(&positions, -1.0).expect("tree");
        assert!(tree.cell(0).is_leaf());
        assert_eq!(tree.cell(0).points.len(), 5);
    }

    #[test]
    fn empty_input_builds_nothing() {
        assert!(ChargeTree::build(&[], -1.0).is_none());
    }
}
