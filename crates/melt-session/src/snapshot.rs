//! Per-frame output for the renderer and particle generator

use serde::Serialize;

use melt_body::{BodySection, Skeleton};
use melt_core::BodyColor;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SectionSnapshot {
    pub name: &'static str,
    /// Chain points after melting, distal end first
    pub points: Vec<[f32; 2]>,
    pub percent_left: f32,
    /// Drip emission anchor
    pub melted_point: [f32; 2],
}

impl From<&BodySection> for SectionSnapshot {
    fn from(section: &BodySection) -> Self {
        SectionSnapshot {
            name: section.id().name(),
            points: section.line.vertices().iter().map(|v| [v.x, v.y]).collect(),
            percent_left: section.percent_left,
            melted_point: [section.melted_point.x, section.melted_point.y],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BodySnapshot {
    pub id: String,
    #[serde(skip)]
    pub color: BodyColor,
    pub rgb: [u8; 3],
    pub scale: f32,
    pub restoring: bool,
    pub sections: Vec<SectionSnapshot>,
}

impl BodySnapshot {
    pub fn new(id: &str, skeleton: &Skeleton) -> Self {
        BodySnapshot {
            id: id.to_string(),
            color: skeleton.color,
            rgb: skeleton.color.rgb(),
            scale: skeleton.scale,
            restoring: skeleton.restoring,
            sections: skeleton.sections().iter().map(SectionSnapshot::from).collect(),
        }
    }
}

/// Everything downstream needs to draw one frame
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SessionSnapshot {
    /// Session time in seconds
    pub time: f64,
    /// Bodies ordered by id
    pub bodies: Vec<BodySnapshot>,
}

impl SessionSnapshot {
    pub fn body(&self, id: &str) -> Option<&BodySnapshot> {
        self.bodies.iter().find(|b| b.id == id)
    }
}
