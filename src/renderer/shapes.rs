//! Shape generation for 2D primitives
//!
//! Everything is built in play-field units with y growing downward;
//! [`super::RenderState`] maps it to clip space.

use glam::Vec2;

use super::vertex::{Vertex, colors};
use crate::car_origin;
use crate::consts::*;
use crate::sim::Snapshot;

/// Length of one dash + gap, in field units
const DASH_PERIOD: f32 = 50.0;
const DASH_LENGTH: f32 = 30.0;
const DASH_WIDTH: f32 = 6.0;
/// Seconds for the road texture to scroll one full field height
const ROAD_SCROLL_SECS: f32 = 3.0;
const SHOULDER_WIDTH: f32 = 8.0;

/// Filled axis-aligned rectangle (two triangles)
pub fn rect(min: Vec2, size: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    let max = min + size;
    vec![
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(max.x, max.y, color),
    ]
}

/// Rectangle outline of the given stroke width
pub fn rect_outline(min: Vec2, size: Vec2, stroke: f32, color: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(24);
    vertices.extend(rect(min, Vec2::new(size.x, stroke), color));
    vertices.extend(rect(
        Vec2::new(min.x, min.y + size.y - stroke),
        Vec2::new(size.x, stroke),
        color,
    ));
    vertices.extend(rect(min, Vec2::new(stroke, size.y), color));
    vertices.extend(rect(
        Vec2::new(min.x + size.x - stroke, min.y),
        Vec2::new(stroke, size.y),
        color,
    ));
    vertices
}

/// Asphalt, shoulders and the scrolling center dashes
pub fn road(elapsed_secs: f32) -> Vec<Vertex> {
    let mut vertices = rect(
        Vec2::ZERO,
        Vec2::new(FIELD_WIDTH, FIELD_HEIGHT),
        colors::ASPHALT,
    );
    vertices.extend(rect(
        Vec2::ZERO,
        Vec2::new(SHOULDER_WIDTH, FIELD_HEIGHT),
        colors::SHOULDER,
    ));
    vertices.extend(rect(
        Vec2::new(FIELD_WIDTH - SHOULDER_WIDTH, 0.0),
        Vec2::new(SHOULDER_WIDTH, FIELD_HEIGHT),
        colors::SHOULDER,
    ));

    let offset = dash_offset(elapsed_secs);
    let center = FIELD_WIDTH / 2.0 - DASH_WIDTH / 2.0;
    let mut y = offset - DASH_PERIOD;
    while y < FIELD_HEIGHT {
        vertices.extend(rect(
            Vec2::new(center, y),
            Vec2::new(DASH_WIDTH, DASH_LENGTH),
            colors::LANE_DASH,
        ));
        y += DASH_PERIOD;
    }
    vertices
}

/// Scroll phase of the dashes in [0, DASH_PERIOD)
pub fn dash_offset(elapsed_secs: f32) -> f32 {
    let travelled = elapsed_secs / ROAD_SCROLL_SECS * FIELD_HEIGHT;
    travelled.rem_euclid(DASH_PERIOD)
}

/// A top-down car sprite with its top-left at `origin`
pub fn car(origin: Vec2, body: [f32; 4]) -> Vec<Vertex> {
    let size = Vec2::new(CAR_SPRITE_WIDTH, CAR_SPRITE_HEIGHT);
    let tire = Vec2::new(10.0, 22.0);
    let inset = 4.0;

    let mut vertices = Vec::with_capacity(36);
    // Tires poke out from under the body
    for (dx, dy) in [
        (0.0, 14.0),
        (size.x - tire.x, 14.0),
        (0.0, size.y - 14.0 - tire.y),
        (size.x - tire.x, size.y - 14.0 - tire.y),
    ] {
        vertices.extend(rect(origin + Vec2::new(dx, dy), tire, colors::TIRE));
    }
    vertices.extend(rect(
        origin + Vec2::new(inset, 0.0),
        Vec2::new(size.x - 2.0 * inset, size.y),
        body,
    ));
    vertices.extend(rect(
        origin + Vec2::new(inset + 8.0, size.y * 0.25),
        Vec2::new(size.x - 2.0 * (inset + 8.0), size.y * 0.2),
        colors::WINDSHIELD,
    ));
    vertices
}

/// Where the player sprite is drawn (anchored to the bottom edge)
pub fn player_sprite_origin(player: i32) -> Vec2 {
    car_origin(
        player,
        FIELD_HEIGHT - PLAYER_SPRITE_BOTTOM_MARGIN - CAR_SPRITE_HEIGHT,
    )
}

/// Full scene for one frame
pub fn scene(snapshot: &Snapshot, elapsed_secs: f32, show_hitboxes: bool) -> Vec<Vertex> {
    // Road stops scrolling once the run is over
    let mut vertices = road(if snapshot.game_over { 0.0 } else { elapsed_secs });

    vertices.extend(car(player_sprite_origin(snapshot.player), colors::PLAYER_BODY));
    for opponent in &snapshot.opponents {
        vertices.extend(car(
            car_origin(opponent.x, opponent.y),
            colors::OPPONENT_BODY,
        ));
    }

    if show_hitboxes {
        let size = Vec2::new(CAR_HITBOX_WIDTH, CAR_HITBOX_HEIGHT);
        vertices.extend(rect_outline(
            car_origin(snapshot.player, PLAYER_HITBOX_TOP),
            size,
            2.0,
            colors::HITBOX,
        ));
        for opponent in &snapshot.opponents {
            vertices.extend(rect_outline(
                car_origin(opponent.x, opponent.y),
                size,
                2.0,
                colors::HITBOX,
            ));
        }
    }

    if snapshot.game_over {
        vertices.extend(rect(
            Vec2::ZERO,
            Vec2::new(FIELD_WIDTH, FIELD_HEIGHT),
            colors::GAME_OVER_TINT,
        ));
    }

    vertices
}
