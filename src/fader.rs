//! Screen transition fader
//!
//! A level/state transition darkens the screen from 0 up to [`FADE_FULL`] (or
//! back down) in fixed steps. Drawing goes through the [`Canvas`] trait so the
//! fader stays independent of any renderer.

use serde::{Deserialize, Serialize};

/// Fade level at which the screen is fully covered
pub const FADE_FULL: i32 = 65;

/// 8-bit RGBA colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba { r: 0, g: 0, b: 0, a: 255 };

    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

/// Integer screen rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl ScreenRect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }
}

/// Drawing surface the fader renders onto
pub trait Canvas {
    fn solid_rect(&mut self, rect: ScreenRect, color: Rgba);

    /// Full-screen transition texture
    fn textured_rect(&mut self, rect: ScreenRect, texture: u32, alpha: u8);

    /// Submit queued draws
    fn flush(&mut self);
}

/// Transition shape
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FadeShape {
    /// Uniform alpha fade
    #[default]
    Fade,
    /// Four bars closing in on the focus point
    Rect,
    /// Top and bottom bars
    FlipH,
    /// Left and right bars
    FlipV,
    /// Host-provided transition texture
    Custom(u32),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenFader {
    pub color: Rgba,
    shape: FadeShape,
    current: i32,
    target: i32,
    step: i32,
    rising: bool,
    active: bool,
    full: bool,
    complete: bool,
    focus: Option<(i32, i32)>,
}

impl Default for ScreenFader {
    fn default() -> Self {
        Self {
            color: Rgba::BLACK,
            shape: FadeShape::Fade,
            current: 0,
            target: 0,
            step: 0,
            rising: false,
            active: false,
            full: false,
            complete: false,
            focus: None,
        }
    }
}

impl ScreenFader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop and hide
    pub fn clear(&mut self) {
        self.active = false;
        self.current = 0;
        self.target = 0;
        self.step = 0;
        self.full = false;
        self.focus = None;
    }

    /// Start a transition from `start` toward `goal` by `step` per update.
    /// `focus` is the screen point the shaped transitions close in on
    /// (screen centre when `None`).
    pub fn setup(&mut self, step: i32, start: i32, goal: i32, shape: FadeShape, focus: Option<(i32, i32)>) {
        self.shape = shape;
        self.current = start;
        self.target = goal;
        self.step = step;
        self.rising = start < goal;
        self.active = true;
        self.full = false;
        self.complete = false;
        self.focus = focus;
        log::debug!("fader {:?} {} -> {} step {}", shape, start, goal, step);
    }

    pub fn update(&mut self) {
        if !self.active {
            return;
        }

        if self.current < self.target {
            self.current += self.step;
            if self.current >= self.target {
                self.current = self.target;
                self.step = 0;
                if self.current >= FADE_FULL {
                    self.full = true;
                    self.complete = true;
                }
            }
        } else if self.current > self.target {
            self.current -= self.step;
            if self.current <= self.target {
                self.current = self.target;
                self.step = 0;
                if self.current <= 0 {
                    self.active = false;
                    self.complete = true;
                }
            }
        }
    }

    pub fn level(&self) -> i32 {
        self.current
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn is_visible(&self) -> bool {
        self.active || self.full
    }

    pub fn is_fading_in(&self) -> bool {
        self.active && self.rising
    }

    pub fn is_fading_out(&self) -> bool {
        self.active && !self.rising
    }

    /// Draw onto a `width` x `height` target
    pub fn draw(&self, canvas: &mut dyn Canvas, width: i32, height: i32) {
        if !self.active {
            return;
        }

        let fade = self.current.clamp(0, FADE_FULL);
        let alpha = (fade * 255 / FADE_FULL) as u8;
        let screen = ScreenRect::new(0, 0, width, height);
        let color = self.color;

        if fade >= FADE_FULL {
            canvas.solid_rect(screen, color.with_alpha(alpha));
            canvas.flush();
            return;
        }

        match self.shape {
            FadeShape::Fade => canvas.solid_rect(screen, color.with_alpha(alpha)),
            FadeShape::Custom(texture) => canvas.textured_rect(screen, texture, alpha),
            FadeShape::Rect => {
                let (fx, fy) = self.focus.unwrap_or((width / 2, height / 2));
                let right_w = width - fx;
                let bottom_h = height - fy;
                let left_w = fx * fade / FADE_FULL;
                let top_h = fy * fade / FADE_FULL;
                let right_x = width - (right_w * fade + 64) / FADE_FULL + 1;
                let bottom_y = height - (bottom_h * fade + 64) / FADE_FULL + 1;

                canvas.solid_rect(ScreenRect::new(0, 0, left_w, height), color);
                canvas.solid_rect(ScreenRect::new(right_x, 0, right_w * fade / FADE_FULL, height), color);
                canvas.solid_rect(ScreenRect::new(0, 0, width, top_h), color);
                canvas.solid_rect(ScreenRect::new(0, bottom_y, width, bottom_h * fade / FADE_FULL), color);
            }
            FadeShape::FlipH => {
                let side = (height / 2 * fade + 64) / FADE_FULL;
                canvas.solid_rect(ScreenRect::new(0, 0, width, side), color);
                canvas.solid_rect(ScreenRect::new(0, height - side, width, side), color);
            }
            FadeShape::FlipV => {
                let side = (width / 2 * fade + 64) / FADE_FULL;
                canvas.solid_rect(ScreenRect::new(0, 0, side, height), color);
                canvas.solid_rect(ScreenRect::new(width - side, 0, side, height), color);
            }
        }
        canvas.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingCanvas {
        rects: Vec<(ScreenRect, Rgba)>,
        textures: Vec<(u32, u8)>,
        flushes: usize,
    }

    impl Canvas for RecordingCanvas {
        fn solid_rect(&mut self, rect: ScreenRect, color: Rgba) {
            self.rects.push((rect, color));
        }

        fn textured_rect(&mut self, _rect: ScreenRect, texture: u32, alpha: u8) {
            self.textures.push((texture, alpha));
        }

        fn flush(&mut self) {
            self.flushes += 1;
        }
    }

    #[test]
    fn test_fade_in_reaches_full() {
        let mut fader = ScreenFader::new();
        fader.setup(10, 0, FADE_FULL, FadeShape::Fade, None);
        assert!(fader.is_fading_in());

        for _ in 0..6 {
            fader.update();
            assert!(!fader.is_complete());
        }
        fader.update();
        assert_eq!(fader.level(), FADE_FULL);
        assert!(fader.is_complete());
        assert!(fader.is_visible());
    }

    #[test]
    fn test_fade_out_hides() {
        let mut fader = ScreenFader::new();
        fader.setup(20, FADE_FULL, 0, FadeShape::Fade, None);
        assert!(fader.is_fading_out());
        for _ in 0..4 {
            fader.update();
        }
        assert_eq!(fader.level(), 0);
        assert!(fader.is_complete());
        assert!(!fader.is_visible());
    }

    #[test]
    fn test_partial_goal_stays_active() {
        let mut fader = ScreenFader::new();
        fader.setup(5, 0, 30, FadeShape::Fade, None);
        for _ in 0..10 {
            fader.update();
        }
        assert_eq!(fader.level(), 30);
        assert!(!fader.is_complete());
        assert!(fader.is_visible());
    }

    #[test]
    fn test_draw_shapes() {
        let mut fader = ScreenFader::new();
        let mut canvas = RecordingCanvas::default();

        fader.draw(&mut canvas, 800, 600);
        assert!(canvas.rects.is_empty());

        fader.setup(1, 13, FADE_FULL, FadeShape::Fade, None);
        fader.draw(&mut canvas, 800, 600);
        assert_eq!(canvas.rects.len(), 1);
        assert_eq!(canvas.rects[0].1.a, 51);

        canvas.rects.clear();
        fader.setup(1, 13, FADE_FULL, FadeShape::Rect, Some((100, 100)));
        fader.draw(&mut canvas, 800, 600);
        assert_eq!(canvas.rects.len(), 4);
        assert_eq!(canvas.rects[0].0, ScreenRect::new(0, 0, 20, 600));

        canvas.rects.clear();
        fader.setup(1, 13, FADE_FULL, FadeShape::FlipH, None);
        fader.draw(&mut canvas, 800, 600);
        assert_eq!(canvas.rects.len(), 2);
        assert_eq!(canvas.rects[0].0.h, (300 * 13 + 64) / 65);

        canvas.rects.clear();
        fader.setup(1, FADE_FULL, 0, FadeShape::FlipV, None);
        fader.draw(&mut canvas, 800, 600);
        assert_eq!(canvas.rects, vec![(ScreenRect::new(0, 0, 800, 600), Rgba::BLACK)]);

        fader.setup(1, 0, FADE_FULL, FadeShape::Custom(7), None);
        fader.draw(&mut canvas, 800, 600);
        assert_eq!(canvas.textures, vec![(7, 0)]);
        assert_eq!(canvas.flushes, 5);
    }

    #[test]
    fn test_clear() {
        let mut fader = ScreenFader::new();
        fader.setup(65, 0, FADE_FULL, FadeShape::Fade, None);
        fader.update();
        assert!(fader.is_visible());
        fader.clear();
        assert!(!fader.is_visible());
        assert_eq!(fader.level(), 0);
    }
}
