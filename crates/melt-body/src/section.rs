//! Body section melt model

use melt_core::{SectionId, Vec2};

use crate::Polyline;

/// How far past the melt boundary the drip anchor sits, as a share of the chain
pub const MELT_POINT_LOOKAHEAD: f32 = 0.05;

/// One anatomical chain and how much of it is still intact
#[derive(Clone, Debug)]
pub struct BodySection {
    id: SectionId,
    /// Chain geometry, rebuilt from joints every frame
    pub line: Polyline,
    /// Particle emission anchor, just past the melt boundary
    pub melted_point: Vec2,
    /// Intact share of the chain, in `[0, 1]`
    pub percent_left: f32,
}

impl BodySection {
    pub fn new(id: SectionId) -> Self {
        BodySection {
            id,
            line: Polyline::new(),
            melted_point: Vec2::ZERO,
            percent_left: 1.0,
        }
    }

    pub fn id(&self) -> SectionId {
        self.id
    }

    /// Grow (positive) or melt (negative) the section, then recompute the
    /// melted geometry from the current chain.
    ///
    /// Must run every frame after the chain is rebuilt, even with `amount`
    /// of zero, since it is what collapses the dissolved vertices.
    pub fn update_percent(&mut self, amount: f32) {
        if !amount.is_nan() {
            self.percent_left = (self.percent_left + amount).clamp(0.0, 1.0);
        }
        if self.line.is_empty() {
            return;
        }

        let melting_index = self.line.index_at_percent(self.percent_left);
        let boundary = self.line.point_at_percent(self.percent_left);
        self.melted_point = self
            .line
            .point_at_percent(self.percent_left + MELT_POINT_LOOKAHEAD);

        for (i, vertex) in self.line.vertices_mut().iter_mut().enumerate() {
            if i as f32 > melting_index {
                *vertex = boundary;
            }
        }
    }

    /// True once the section has fully dissolved
    pub fn is_melted(&self) -> bool {
        self.percent_left <= 0.0
    }
}
