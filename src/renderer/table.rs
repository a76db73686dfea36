//! Table, balls and cue stick

use super::{Canvas, Color, Paint, Rect};
use crate::game::TableView;

const FELT_LIGHT: Color = Color::Rgb(0x4CAF50);
const FELT_DARK: Color = Color::Rgb(0x2E7D32);
const BORDER: Color = Color::Rgb(0xFFC0CB);
const BORDER_WIDTH: f32 = 14.0;
const BORDER_INSET: f32 = 6.0;
const POCKET: Color = Color::Rgb(0x444444);
const BALL_OUTLINE: Color = Color::Rgba(0x000000, 0.2);
const STICK: Color = Color::Rgb(0xD97EA4);
const STICK_WIDTH: f32 = 5.0;

/// Draw one frame: felt, border, pockets, balls still in play, then the cue
/// stick while aiming.
pub fn draw_frame(canvas: &mut dyn Canvas, view: &TableView<'_>) {
    let table = view.table;
    canvas.clear(Rect::new(glam::Vec2::ZERO, table.viewport));
    if view.suspended {
        return;
    }

    let felt = Rect::new(table.origin, table.size);
    canvas.fill_rect(
        felt,
        &Paint::LinearGradient {
            from: felt.min,
            to: felt.max(),
            stops: vec![(0.0, FELT_LIGHT), (1.0, FELT_DARK)],
        },
    );
    canvas.stroke_rect(felt.inflate(BORDER_INSET), BORDER, BORDER_WIDTH);

    for pocket in &table.pockets {
        canvas.fill_circle(*pocket, table.pocket_radius, POCKET);
    }

    for ball in view.visible_balls() {
        canvas.fill_circle(ball.pos, ball.radius, Color::Rgb(ball.color));
        canvas.stroke_circle(ball.pos, ball.radius, BALL_OUTLINE, 1.0);
    }

    if let Some((from, to)) = view.cue_stick() {
        canvas.line(from, to, STICK, STICK_WIDTH);
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::aim::DragState;
    use crate::settings::Settings;
    use crate::sim::{Ball, SimState, TableGeometry};

    #[derive(Debug, Clone, PartialEq)]
    enum Op {
        Clear(Rect),
        FillRect(Rect, Paint),
        StrokeRect(Rect, Color, f32),
        FillCircle(Vec2, f32, Color),
        StrokeCircle(Vec2, f32, Color, f32),
        Line(Vec2, Vec2, Color, f32),
    }

    #[derive(Default)]
    struct RecordingCanvas {
        ops: Vec<Op>,
    }

    impl Canvas for RecordingCanvas {
        fn clear(&mut self, rect: Rect) {
            self.ops.push(Op::Clear(rect));
        }
        fn fill_rect(&mut self, rect: Rect, paint: &Paint) {
            self.ops.push(Op::FillRect(rect, paint.clone()));
        }
        fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32) {
            self.ops.push(Op::StrokeRect(rect, color, width));
        }
        fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
            self.ops.push(Op::FillCircle(center, radius, color));
        }
        fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Color, width: f32) {
            self.ops.push(Op::StrokeCircle(center, radius, color, width));
        }
        fn line(&mut self, from: Vec2, to: Vec2, color: Color, width: f32) {
            self.ops.push(Op::Line(from, to, color, width));
        }
    }

    fn table() -> TableGeometry {
        TableGeometry::new(800.0, 444.0, &Settings::default()).unwrap()
    }

    fn view<'a>(
        table: &'a TableGeometry,
        balls: &'a [Ball],
        drag: Option<&'a DragState>,
    ) -> TableView<'a> {
        TableView {
            table,
            balls,
            drag,
            score: 0,
            best: 0,
            suspended: false,
        }
    }

    #[test]
    fn test_table_layers_in_order() {
        let table = table();
        let mut canvas = RecordingCanvas::default();
        draw_frame(&mut canvas, &view(&table, &[], None));

        assert_eq!(canvas.ops.len(), 3 + 6);
        assert_eq!(
            canvas.ops[0],
            Op::Clear(Rect::new(Vec2::ZERO, Vec2::new(800.0, 444.0)))
        );
        let felt = Rect::new(Vec2::new(40.0, 40.0), Vec2::new(720.0, 364.0));
        assert_eq!(
            canvas.ops[1],
            Op::FillRect(
                felt,
                Paint::LinearGradient {
                    from: Vec2::new(40.0, 40.0),
                    to: Vec2::new(760.0, 404.0),
                    stops: vec![(0.0, FELT_LIGHT), (1.0, FELT_DARK)],
                }
            )
        );
        assert_eq!(
            canvas.ops[2],
            Op::StrokeRect(felt.inflate(6.0), Color::Rgb(0xFFC0CB), 14.0)
        );
        for (op, pocket) in canvas.ops[3..].iter().zip(table.pockets) {
            assert_eq!(*op, Op::FillCircle(pocket, 18.0, POCKET));
        }
    }

    #[test]
    fn test_sunk_balls_are_not_drawn() {
        let table = table();
        let mut state = SimState::rack(1, &table, &Settings::default());
        state.balls[3].sunk = true;
        let mut canvas = RecordingCanvas::default();
        draw_frame(&mut canvas, &view(&table, &state.balls, None));

        let fills: Vec<_> = canvas.ops[9..]
            .iter()
            .filter(|op| matches!(op, Op::FillCircle(..)))
            .collect();
        assert_eq!(fills.len(), 6);
        assert!(!canvas.ops.iter().any(|op| matches!(op, Op::Line(..))));

        // Each ball is filled in its own colour, then outlined
        let ball = &state.balls[0];
        assert_eq!(
            canvas.ops[9],
            Op::FillCircle(ball.pos, ball.radius, Color::Rgb(ball.color))
        );
        assert_eq!(
            canvas.ops[10],
            Op::StrokeCircle(ball.pos, ball.radius, BALL_OUTLINE, 1.0)
        );
    }

    #[test]
    fn test_stick_drawn_last_while_aiming() {
        let table = table();
        let state = SimState::rack(1, &table, &Settings::default());
        let cue = state.cue().unwrap().pos;
        let drag = DragState {
            start: cue,
            current: cue + Vec2::new(0.0, 40.0),
        };
        let mut canvas = RecordingCanvas::default();
        draw_frame(&mut canvas, &view(&table, &state.balls, Some(&drag)));

        match canvas.ops.last() {
            Some(Op::Line(from, to, color, width)) => {
                assert!((*from - (cue - Vec2::new(0.0, 10.0))).length() < 1e-3);
                assert!((*to - (cue - Vec2::new(0.0, 260.0))).length() < 1e-3);
                assert_eq!(*color, STICK);
                assert_eq!(*width, 5.0);
            }
            other => panic!("expected cue stick, got {:?}", other),
        }
    }

    #[test]
    fn test_suspended_table_is_only_cleared() {
        let table = table();
        let state = SimState::rack(1, &table, &Settings::default());
        let mut canvas = RecordingCanvas::default();
        let view = TableView {
            suspended: true,
            ..view(&table, &state.balls, None)
        };
        draw_frame(&mut canvas, &view);
        assert_eq!(
            canvas.ops,
            vec![Op::Clear(Rect::new(Vec2::ZERO, table.viewport))]
        );
    }

    #[test]
    fn test_no_stick_when_cue_is_sunk() {
        let table = table();
        let mut state = SimState::rack(1, &table, &Settings::default());
        let cue = state.cue().unwrap().pos;
        if let Some(ball) = state.cue_mut() {
            ball.sunk = true;
        }
        let drag = DragState {
            start: cue,
            current: cue + Vec2::new(20.0, 0.0),
        };
        let mut canvas = RecordingCanvas::default();
        draw_frame(&mut canvas, &view(&table, &state.balls, Some(&drag)));
        assert!(!canvas.ops.iter().any(|op| matches!(op, Op::Line(..))));
    }
}
