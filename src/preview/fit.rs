#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// How a frame is placed inside the display surface. Neither mode stretches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FitMode {
    /// Whole frame visible, letterboxed or pillarboxed.
    #[default]
    Aspect,
    /// Surface fully covered, frame cropped.
    AspectFill,
}

/// Centres `content` inside `bounds`, scaled uniformly according to `mode`.
pub fn fit_rect(content: Size, bounds: Size, mode: FitMode) -> Rect {
    if content.is_empty() || bounds.is_empty() {
        return Rect {
            x: bounds.width.max(0.0) / 2.0,
            y: bounds.height.max(0.0) / 2.0,
            width: 0.0,
            height: 0.0,
        };
    }

    let scale_x = bounds.width / content.width;
    let scale_y = bounds.height / content.height;
    let scale = match mode {
        FitMode::Aspect => scale_x.min(scale_y),
        FitMode::AspectFill => scale_x.max(scale_y),
    };

    let width = content.width * scale;
    let height = content.height * scale;

    Rect {
        x: (bounds.width - width) / 2.0,
        y: (bounds.height - height) / 2.0,
        width,
        height,
    }
}
