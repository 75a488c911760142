//! Scene building: snapshot in, ordered draw commands out
//!
//! Pure and backend-agnostic so it can be tested without a canvas. Later
//! commands paint over earlier ones.

use glam::Vec2;

use crate::sim::{ObstacleKind, Snapshot};
use crate::tuning::Tuning;

/// Colors for game elements (CSS color strings)
pub mod colors {
    pub const BACKGROUND: &str = "#F5F5F5";
    pub const LANE_DIVIDER: &str = "#E0E0E0";
    pub const PLAYER: &str = "#0052FF";
    pub const OBSTACLE: &str = "#E43D28";
    pub const COIN: &str = "#FFD700";
    pub const HAZARD_LABEL: &str = "white";
    pub const COIN_LABEL: &str = "black";
}

/// Width of the lane divider strokes
pub const LANE_LINE_WIDTH: f32 = 2.0;
/// Glow radius around the player
pub const PLAYER_GLOW: f32 = 10.0;

/// One drawing primitive
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    /// Fill the whole playfield
    Clear { color: &'static str, size: Vec2 },
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: &'static str,
    },
    /// Axis-aligned rectangle from its top-left corner
    Rect {
        origin: Vec2,
        size: Vec2,
        color: &'static str,
        glow: f32,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: &'static str,
    },
    Text {
        text: &'static str,
        pos: Vec2,
        font: &'static str,
        color: &'static str,
    },
}

fn rect_centered(center: Vec2, size: Vec2, color: &'static str, glow: f32) -> DrawCmd {
    DrawCmd::Rect {
        origin: center - size / 2.0,
        size,
        color,
        glow,
    }
}

/// Build the draw list for one frame
pub fn build_scene(snapshot: &Snapshot<'_>, tuning: &Tuning) -> Vec<DrawCmd> {
    let world = Vec2::new(tuning.world_width(), tuning.world_height);
    let mut cmds = Vec::with_capacity(
        4 + snapshot.obstacles.len() * 2 + snapshot.collectibles.len() * 2,
    );

    cmds.push(DrawCmd::Clear {
        color: colors::BACKGROUND,
        size: world,
    });

    for lane in 1..tuning.lane_count {
        let x = tuning.lane_width * lane as f32;
        cmds.push(DrawCmd::Line {
            from: Vec2::new(x, 0.0),
            to: Vec2::new(x, world.y),
            width: LANE_LINE_WIDTH,
            color: colors::LANE_DIVIDER,
        });
    }

    let player = snapshot.player;
    cmds.push(rect_centered(player.pos, player.size, colors::PLAYER, PLAYER_GLOW));

    for obstacle in snapshot.obstacles {
        cmds.push(rect_centered(obstacle.pos, obstacle.size, colors::OBSTACLE, 0.0));
        if obstacle.kind == ObstacleKind::LowHazard {
            cmds.push(DrawCmd::Text {
                text: "RUG",
                pos: obstacle.pos - Vec2::new(10.0, 0.0),
                font: "10px Arial",
                color: colors::HAZARD_LABEL,
            });
        }
    }

    for coin in snapshot.collectibles.iter().filter(|c| !c.collected) {
        cmds.push(DrawCmd::Circle {
            center: coin.pos,
            radius: coin.size.x / 2.0,
            color: colors::COIN,
        });
        cmds.push(DrawCmd::Text {
            text: "₿",
            pos: coin.pos + Vec2::new(-4.0, 4.0),
            font: "12px Arial",
            color: colors::COIN_LABEL,
        });
    }

    cmds
}
