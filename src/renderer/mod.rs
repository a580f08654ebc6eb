//! Render-facing export
//!
//! Flattens a `MatchState` into plain instance arrays. A GPU backend uploads
//! these with `bytemuck::cast_slice`; no graphics API code lives here.

pub mod instances;

pub use instances::{PartInstance, SnowInstance, SphereInstance, colors};

use glam::Mat4;

use crate::consts::GROUND_TOP;
use crate::sim::snow::cell_center;
use crate::sim::{Avatar, MatchPhase, MatchState, Team};

/// Everything a renderer needs for one frame
#[derive(Debug, Clone)]
pub struct RenderFrame {
    pub snow: Vec<SnowInstance>,
    pub snowballs: Vec<SphereInstance>,
    pub parts: Vec<PartInstance>,
    pub phase: MatchPhase,
    pub winner: Option<Team>,
}

impl RenderFrame {
    pub fn build(state: &MatchState) -> Self {
        let snow = state
            .snow
            .columns()
            .filter(|(_, col)| col.current_height > 0.0)
            .map(|(cell, col)| SnowInstance {
                base: cell_center(cell, GROUND_TOP).to_array(),
                height: col.current_height,
                alpha: col.alpha,
                _pad: [0.0; 3],
            })
            .collect();

        let snowballs = state
            .projectiles
            .iter()
            .filter(|p| p.is_active())
            .map(|p| SphereInstance {
                pos: p.pos.to_array(),
                radius: p.radius,
                color: colors::SNOWBALL,
            })
            .collect();

        let mut parts = Vec::with_capacity(12);
        for avatar in [&state.steve, &state.alex] {
            push_parts(&mut parts, avatar);
        }

        Self {
            snow,
            snowballs,
            parts,
            phase: state.phase,
            winner: state.winner(),
        }
    }

    pub fn snow_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.snow)
    }

    pub fn snowball_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.snowballs)
    }

    pub fn part_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.parts)
    }
}

fn push_parts(out: &mut Vec<PartInstance>, avatar: &Avatar) {
    let team = match avatar.team {
        Team::Steve => 0,
        Team::Alex => 1,
    };
    for (part, transform) in avatar.part_transforms() {
        let size = avatar.dims().layout(part).half_extents * 2.0;
        let model = transform * Mat4::from_scale(size);
        out.push(PartInstance {
            model: model.to_cols_array(),
            part: part as u32,
            avatar: team,
            _pad: [0; 2],
        });
    }
}
