use gpui::{Font, TextRun, Window, font, px};

use crate::layout::TextMeasurer;

/// Font family used for axis labels.
pub(crate) const LABEL_FONT: &str = ".SystemUIFont";

/// Shapes label text with the window's text system.
pub(crate) struct GpuiTextMeasurer<'a> {
    window: &'a Window,
    font: Font,
}

impl<'a> GpuiTextMeasurer<'a> {
    pub(crate) fn new(window: &'a Window) -> Self {
        Self {
            window,
            font: font(LABEL_FONT),
        }
    }
}

impl TextMeasurer for GpuiTextMeasurer<'_> {
    fn measure(&self, text: &str, size: f32) -> (f32, f32) {
        if text.is_empty() {
            return (0.0, 0.0);
        }
        let run = TextRun {
            len: text.len(),
            font: self.font.clone(),
            color: gpui::black(),
            background_color: None,
            underline: None,
            strikethrough: None,
        };
        let shaped =
            self.window
                .text_system()
                .shape_line(text.to_string().into(), px(size), &[run], None);
        let ascent_descent = f32::from(shaped.ascent + shaped.descent);
        (f32::from(shaped.width), ascent_descent.max(size))
    }
}
