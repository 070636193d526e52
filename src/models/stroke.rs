// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Stroke planning.
//!
//! Turns the pen-down signal and the current fingertip into a list of draw
//! commands plus the new continuity cursor. Pure command generation: the
//! app applies the commands to concrete surfaces, which keeps stroke
//! semantics testable without a rendering backend.

use crate::models::hand::Point;
use crate::render::surface::{BlendMode, Color};

/// Stroke width in draw mode.
pub const DRAW_STROKE_WIDTH: f32 = 3.0;
/// Stroke width in erase mode; wider so erasing feels effortless.
pub const ERASE_STROKE_WIDTH: f32 = 12.0;
/// Fingertip indicator radius while the pen is down.
pub const INDICATOR_RADIUS_PEN_DOWN: f32 = 5.0;
/// Fingertip indicator radius while the pen is up.
pub const INDICATOR_RADIUS_PEN_UP: f32 = 10.0;
/// Width of the white ring around the indicator.
pub const INDICATOR_OUTLINE_WIDTH: f32 = 2.0;
/// Alpha applied to the selected color for the indicator fill.
pub const INDICATOR_FILL_ALPHA: u8 = 0xBB;
/// Translucent red indicator fill while erasing.
pub const ERASE_INDICATOR_FILL: Color = Color::rgba(239, 68, 68, 102);

/// Pen tool selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawMode {
    Draw,
    Erase,
}

/// The one mutable drawing context, written only by the UI task and read
/// by the per-tick update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawContext {
    pub color: Color,
    pub mode: DrawMode,
}

/// A single drawing side effect, in estimator-native coordinates. The
/// executor mirrors every point into display space before rasterizing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    /// Stroke segment on the persistent drawing surface.
    Segment {
        from: Point,
        to: Point,
        width: f32,
        color: Color,
        blend: BlendMode,
    },
    /// Fingertip indicator on the ephemeral overlay surface.
    Indicator {
        center: Point,
        radius: f32,
        fill: Color,
        outline: Color,
        outline_width: f32,
    },
}

/// Plan one frame of drawing.
///
/// Returns the commands to execute and the new stroke continuity cursor.
/// The cursor is `None` whenever no hand is present or the pen is up, so a
/// later pen-down frame starts a fresh segment instead of jumping across
/// the gap. On the first pen-down frame there is nothing to connect from:
/// no segment is emitted, but the cursor is set so the next frame can
/// connect.
pub fn plan(
    pen_down: bool,
    fingertip: Option<Point>,
    ctx: &DrawContext,
    last_point: Option<Point>,
) -> (Vec<DrawCommand>, Option<Point>) {
    let mut commands = Vec::new();
    let Some(point) = fingertip else {
        return (commands, None);
    };

    commands.push(indicator(point, pen_down, ctx));

    if !pen_down {
        return (commands, None);
    }

    if let Some(from) = last_point {
        commands.push(segment(from, point, ctx));
    }
    (commands, Some(point))
}

fn segment(from: Point, to: Point, ctx: &DrawContext) -> DrawCommand {
    match ctx.mode {
        DrawMode::Draw => DrawCommand::Segment {
            from,
            to,
            width: DRAW_STROKE_WIDTH,
            color: ctx.color,
            blend: BlendMode::Normal,
        },
        DrawMode::Erase => DrawCommand::Segment {
            from,
            to,
            width: ERASE_STROKE_WIDTH,
            color: Color::WHITE,
            blend: BlendMode::Destructive,
        },
    }
}

fn indicator(center: Point, pen_down: bool, ctx: &DrawContext) -> DrawCommand {
    let fill = match ctx.mode {
        DrawMode::Draw => ctx.color.with_alpha(INDICATOR_FILL_ALPHA),
        DrawMode::Erase => ERASE_INDICATOR_FILL,
    };
    DrawCommand::Indicator {
        center,
        radius: if pen_down {
            INDICATOR_RADIUS_PEN_DOWN
        } else {
            INDICATOR_RADIUS_PEN_UP
        },
        fill,
        outline: Color::WHITE,
        outline_width: INDICATOR_OUTLINE_WIDTH,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::pinch::{self, PinchGeometry, PinchState};

    const BLUE: Color = Color::rgb(56, 189, 248);

    fn ctx(mode: DrawMode) -> DrawContext {
        DrawContext { color: BLUE, mode }
    }

    fn segments(commands: &[DrawCommand]) -> Vec<DrawCommand> {
        commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Segment { .. }))
            .copied()
            .collect()
    }

    #[test]
    fn test_no_hand_emits_nothing_and_breaks_continuity() {
        let (commands, cursor) = plan(false, None, &ctx(DrawMode::Draw), Some(Point::new(5.0, 5.0)));
        assert!(commands.is_empty());
        assert_eq!(cursor, None);
    }

    #[test]
    fn test_pen_up_emits_indicator_only() {
        let p = Point::new(10.0, 20.0);
        let (commands, cursor) = plan(false, Some(p), &ctx(DrawMode::Draw), Some(Point::new(1.0, 1.0)));
        assert_eq!(cursor, None);
        assert_eq!(commands.len(), 1);
        match commands[0] {
            DrawCommand::Indicator { center, radius, fill, .. } => {
                assert_eq!(center, p);
                assert_eq!(radius, INDICATOR_RADIUS_PEN_UP);
                assert_eq!(fill, BLUE.with_alpha(INDICATOR_FILL_ALPHA));
            }
            _ => panic!("expected indicator"),
        }
    }

    #[test]
    fn test_stroke_start_connects_nothing() {
        let p = Point::new(10.0, 20.0);
        let (commands, cursor) = plan(true, Some(p), &ctx(DrawMode::Draw), None);
        assert!(segments(&commands).is_empty());
        assert_eq!(cursor, Some(p));
    }

    #[test]
    fn test_second_pen_down_frame_draws_a_segment() {
        let a = Point::new(10.0, 20.0);
        let b = Point::new(14.0, 22.0);
        let (commands, cursor) = plan(true, Some(b), &ctx(DrawMode::Draw), Some(a));
        assert_eq!(cursor, Some(b));
        let segs = segments(&commands);
        assert_eq!(segs.len(), 1);
        match segs[0] {
            DrawCommand::Segment { from, to, width, color, blend } => {
                assert_eq!((from, to), (a, b));
                assert_eq!(width, DRAW_STROKE_WIDTH);
                assert_eq!(color, BLUE);
                assert_eq!(blend, BlendMode::Normal);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_erase_mode_uses_destructive_wide_stroke() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(5.0, 0.0);
        let (commands, _) = plan(true, Some(b), &ctx(DrawMode::Erase), Some(a));
        match segments(&commands)[0] {
            DrawCommand::Segment { width, blend, .. } => {
                assert_eq!(width, ERASE_STROKE_WIDTH);
                assert_eq!(blend, BlendMode::Destructive);
            }
            _ => unreachable!(),
        }
        match commands[0] {
            DrawCommand::Indicator { fill, radius, .. } => {
                assert_eq!(fill, ERASE_INDICATOR_FILL);
                assert_eq!(radius, INDICATOR_RADIUS_PEN_DOWN);
            }
            _ => panic!("expected indicator first"),
        }
    }

    /// End-to-end scenario from the pinch filter through stroke planning:
    /// ratios [0.30, 0.10, 0.09, 0.08, 0.08] at fingertips marching right.
    /// The pen goes down on tick 4 and the only segment is emitted on
    /// tick 5, from (130,100) to (140,100).
    #[test]
    fn test_pinch_to_stroke_scenario() {
        let ratios = [0.30, 0.10, 0.09, 0.08, 0.08];
        let tips: Vec<Point> = (0..5)
            .map(|i| Point::new(100.0 + 10.0 * i as f32, 100.0))
            .collect();

        let context = ctx(DrawMode::Draw);
        let mut state = PinchState::default();
        let mut cursor = None;
        let mut all_segments = Vec::new();

        for (i, (&ratio, &tip)) in ratios.iter().zip(&tips).enumerate() {
            let geometry = PinchGeometry {
                thumb_tip: tip,
                index_tip: Point::new(tip.x, tip.y + ratio * 100.0),
                wrist: Point::new(0.0, 0.0),
                hand_base: Point::new(100.0, 0.0),
            };
            state = pinch::update(state, Some(&geometry));
            let (commands, next) = plan(state.active, Some(tip), &context, cursor);
            cursor = next;

            let segs = segments(&commands);
            if i < 4 {
                assert!(segs.is_empty(), "unexpected segment at tick {}", i + 1);
            }
            all_segments.extend(segs);
        }

        assert_eq!(all_segments.len(), 1);
        match all_segments[0] {
            DrawCommand::Segment { from, to, .. } => {
                assert_eq!(from, Point::new(130.0, 100.0));
                assert_eq!(to, Point::new(140.0, 100.0));
            }
            _ => unreachable!(),
        }
    }

    /// A one-tick hand loss while drawing breaks the stroke: the state
    /// resets, reactivation needs three fresh qualifying ticks, and the
    /// first resumed tick emits no segment.
    #[test]
    fn test_gap_restarts_stroke() {
        let context = ctx(DrawMode::Draw);
        let mut state = PinchState::default();
        let mut cursor = None;

        let tight = |tip: Point| PinchGeometry {
            thumb_tip: tip,
            index_tip: Point::new(tip.x, tip.y + 5.0),
            wrist: Point::new(0.0, 0.0),
            hand_base: Point::new(100.0, 0.0),
        };

        for i in 0..4 {
            let tip = Point::new(10.0 * i as f32, 50.0);
            state = pinch::update(state, Some(&tight(tip)));
            let (_, next) = plan(state.active, Some(tip), &context, cursor);
            cursor = next;
        }
        assert!(state.active);
        assert!(cursor.is_some());

        // Gap tick: hand disappears.
        state = pinch::update(state, None);
        let (commands, next) = plan(state.active, None, &context, cursor);
        cursor = next;
        assert!(commands.is_empty());
        assert_eq!(state, PinchState::default());
        assert_eq!(cursor, None);

        // Reappears pinching tightly at a far-away position.
        for i in 0..3 {
            let tip = Point::new(300.0 + i as f32, 200.0);
            state = pinch::update(state, Some(&tight(tip)));
            let (commands, next) = plan(state.active, Some(tip), &context, cursor);
            cursor = next;
            assert!(
                segments(&commands).is_empty(),
                "segment leaked across the gap on resumed tick {}",
                i + 1
            );
        }
        assert!(state.active);
        assert_eq!(cursor, Some(Point::new(302.0, 200.0)));
    }
}
