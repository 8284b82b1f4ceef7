//! Primitive draw operations for a 2D canvas
//!
//! The scene builder emits these; the browser shell replays them onto a
//! `CanvasRenderingContext2d`. `Save`/`Restore` bracket every transform, alpha,
//! shadow or clip change.

use glam::Vec2;

use super::color::Rgba;

/// Axis-aligned rectangle (top-left origin)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Square of side `size` centered on `center`
    pub fn centered(center: Vec2, size: f32) -> Self {
        Self::new(center.x - size / 2.0, center.y - size / 2.0, size, size)
    }

    /// Same center, each side grown by `by` (negative shrinks)
    pub fn inflate(self, by: f32) -> Self {
        Self::new(self.x - by, self.y - by, self.w + by * 2.0, self.h + by * 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Push transform, alpha, shadow and clip
    Save,
    /// Pop back to the last `Save`
    Restore,
    Translate(Vec2),
    Rotate(f32),
    /// Global alpha multiplier
    SetAlpha(f32),
    /// Glow for subsequent fills and strokes; blur 0 disables it
    SetShadow { blur: f32, color: Rgba },
    /// Intersect the clip region with a rectangle
    ClipRect(Rect),
    FillRect { rect: Rect, color: Rgba },
    StrokeRect { rect: Rect, color: Rgba, width: f32 },
    FillCircle { center: Vec2, radius: f32, color: Rgba },
    StrokeCircle { center: Vec2, radius: f32, color: Rgba, width: f32 },
    /// Round-capped line segment
    Line { from: Vec2, to: Vec2, color: Rgba, width: f32 },
    Text {
        pos: Vec2,
        text: String,
        size: f32,
        bold: bool,
        color: Rgba,
        align: TextAlign,
    },
    /// Rectangle filled with a linear gradient running `from` → `to`
    GradientRect {
        rect: Rect,
        from: Vec2,
        to: Vec2,
        stops: Vec<(f32, Rgba)>,
    },
}

/// Balance of `Save` minus `Restore`; zero for a well-formed list
pub fn stack_depth(commands: &[DrawCommand]) -> i32 {
    commands.iter().fold(0, |depth, cmd| match cmd {
        DrawCommand::Save => depth + 1,
        DrawCommand::Restore => depth - 1,
        _ => depth,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_helpers() {
        let r = Rect::centered(Vec2::new(100.0, 50.0), 20.0);
        assert_eq!(r, Rect::new(90.0, 40.0, 20.0, 20.0));
        assert_eq!(r.inflate(2.0), Rect::new(88.0, 38.0, 24.0, 24.0));
        assert_eq!(r.inflate(-4.0), Rect::new(94.0, 44.0, 12.0, 12.0));
    }

    #[test]
    fn test_stack_depth() {
        let cmds = vec![
            DrawCommand::Save,
            DrawCommand::Translate(Vec2::ONE),
            DrawCommand::Restore,
        ];
        assert_eq!(stack_depth(&cmds), 0);
        assert_eq!(stack_depth(&cmds[..2]), 1);
    }
}
