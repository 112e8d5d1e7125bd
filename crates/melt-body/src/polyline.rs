//! Open polyline with arc-length parameterisation

use melt_core::Vec2;

/// Open polyline through an ordered list of vertices
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polyline {
    vertices: Vec<Vec2>,
}

impl Polyline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vertices(vertices: Vec<Vec2>) -> Self {
        Polyline { vertices }
    }

    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    pub fn vertices_mut(&mut self) -> &mut [Vec2] {
        &mut self.vertices
    }

    /// Replace all vertices, reusing the allocation
    pub fn set_vertices(&mut self, vertices: impl IntoIterator<Item = Vec2>) {
        self.vertices.clear();
        self.vertices.extend(vertices);
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Total arc length
    pub fn length(&self) -> f32 {
        self.vertices
            .windows(2)
            .map(|w| w[0].distance(&w[1]))
            .sum()
    }

    /// Fractional vertex index at `length` along the line.
    ///
    /// Lengths are clamped to the line. Returns 0 for lines with fewer than
    /// two vertices or zero total length.
    pub fn index_at_length(&self, length: f32) -> f32 {
        if self.vertices.len() < 2 {
            return 0.0;
        }
        let total = self.length();
        if total <= f32::EPSILON {
            return 0.0;
        }
        let last = (self.vertices.len() - 1) as f32;
        let length = length.clamp(0.0, total);
        if length >= total {
            return last;
        }

        let mut walked = 0.0;
        for (i, w) in self.vertices.windows(2).enumerate() {
            let segment = w[0].distance(&w[1]);
            if length < walked + segment {
                // A zero-length segment can never satisfy the check above
                return i as f32 + (length - walked) / segment;
            }
            walked += segment;
        }
        last
    }

    /// Fractional vertex index at `percent` of the arc length
    pub fn index_at_percent(&self, percent: f32) -> f32 {
        self.index_at_length(percent * self.length())
    }

    /// Point at a fractional vertex index, interpolating along the segment
    pub fn point_at_index(&self, index: f32) -> Vec2 {
        let Some(last) = self.vertices.len().checked_sub(1) else {
            return Vec2::ZERO;
        };
        let index = index.max(0.0);
        let i = index.floor() as usize;
        if i >= last {
            return self.vertices[last];
        }
        let t = index - i as f32;
        self.vertices[i].lerp(&self.vertices[i + 1], t)
    }

    /// Point at `percent` of the arc length, clamped to the line
    pub fn point_at_percent(&self, percent: f32) -> Vec2 {
        self.point_at_index(self.index_at_percent(percent))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn l_shape() -> Polyline {
        // 30 units right, then 10 units down
        Polyline::from_vertices(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(30.0, 0.0),
            Vec2::new(30.0, 10.0),
        ])
    }

    fn close(a: Vec2, b: Vec2) -> bool {
        a.distance(&b) < 1e-4
    }

    #[test]
    fn test_length() {
        assert!((l_shape().length() - 40.0).abs() < 1e-5);
        assert_eq!(Polyline::new().length(), 0.0);
    }

    #[test]
    fn test_index_at_percent() {
        let line = l_shape();
        assert_eq!(line.index_at_percent(0.0), 0.0);
        assert!((line.index_at_percent(0.5) - (20.0 / 30.0)).abs() < 1e-5);
        assert!((line.index_at_percent(0.875) - 1.5).abs() < 1e-5);
        assert_eq!(line.index_at_percent(1.0), 2.0);
        assert_eq!(line.index_at_percent(1.3), 2.0);
        assert_eq!(line.index_at_percent(-0.3), 0.0);
    }

    #[test]
    fn test_point_at_percent() {
        let line = l_shape();
        assert!(close(line.point_at_percent(0.5), Vec2::new(20.0, 0.0)));
        assert!(close(line.point_at_percent(0.875), Vec2::new(30.0, 5.0)));
        assert!(close(line.point_at_percent(2.0), Vec2::new(30.0, 10.0)));
    }

    #[test]
    fn test_zero_length_segments() {
        let line = Polyline::from_vertices(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
        ]);
        assert!(close(line.point_at_percent(0.5), Vec2::new(5.0, 0.0)));

        let collapsed = Polyline::from_vertices(vec![Vec2::new(4.0, 4.0); 5]);
        assert_eq!(collapsed.index_at_percent(0.7), 0.0);
        assert!(close(collapsed.point_at_percent(0.7), Vec2::new(4.0, 4.0)));
    }

    #[test]
    fn test_empty_and_single() {
        assert_eq!(Polyline::new().point_at_percent(0.5), Vec2::ZERO);
        let single = Polyline::from_vertices(vec![Vec2::new(1.0, 2.0)]);
        assert_eq!(single.point_at_percent(0.5), Vec2::new(1.0, 2.0));
    }
}
