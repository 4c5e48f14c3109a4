use std::fs;
use std::path::Path;

use fontdue::layout::{
    CoordinateSystem, HorizontalAlign, Layout, LayoutSettings, TextStyle, VerticalAlign, WrapStyle,
};
use fontdue::{Font, FontSettings};

use crate::source::Source;
use crate::BinResult;
use gifseq::{Frame, ImgVec, RGB8};

const BACKGROUND: RGB8 = RGB8 { r: 255, g: 255, b: 255 };
const FOREGROUND: RGB8 = RGB8 { r: 0, g: 176, b: 80 };

/// Renders one banner frame per input text line: anti-aliased text,
/// horizontally centered on a solid background.
pub struct TextBanner {
    lines: std::vec::IntoIter<String>,
    total: u64,
    font: Font,
    font_size: f32,
    width: u32,
    height: u32,
}

impl TextBanner {
    pub fn new(
        input: &Path,
        font_path: &Path,
        font_size: f32,
        width: u32,
        height: u32,
    ) -> BinResult<Self> {
        let text = fs::read_to_string(input)
            .map_err(|e| format!("can't read {}: {}", input.display(), e))?;
        let lines: Vec<String> = text.lines().map(str::to_owned).collect();

        let font_bytes = fs::read(font_path)
            .map_err(|e| format!("can't read font {}: {}", font_path.display(), e))?;
        let font = Font::from_bytes(font_bytes, FontSettings::default())
            .map_err(|e| format!("can't parse font {}: {}", font_path.display(), e))?;

        Ok(Self {
            total: lines.len() as u64,
            lines: lines.into_iter(),
            font,
            font_size,
            width,
            height,
        })
    }

    fn render_line(&self, line: &str) -> Frame {
        let mut pixels = vec![BACKGROUND; self.width as usize * self.height as usize];

        let mut layout = Layout::new(CoordinateSystem::PositiveYDown);
        layout.reset(&LayoutSettings {
            x: 0.0,
            y: 0.0,
            max_width: Some(self.width as f32),
            max_height: Some(self.height as f32),
            horizontal_align: HorizontalAlign::Center,
            vertical_align: VerticalAlign::Middle,
            line_height: 1.0,
            wrap_style: WrapStyle::Word,
            wrap_hard_breaks: true,
        });
        layout.append(&[&self.font], &TextStyle::new(line, self.font_size, 0));

        for glyph in layout.glyphs() {
            if glyph.width == 0 || glyph.height == 0 {
                continue;
            }
            let (_, coverage) = self.font.rasterize_config(glyph.key);
            blend_glyph(
                &mut pixels,
                self.width,
                self.height,
                glyph.x.round() as i32,
                glyph.y.round() as i32,
                glyph.width,
                glyph.height,
                &coverage,
            );
        }

        ImgVec::new(pixels, self.width as usize, self.height as usize)
    }
}

impl Source for TextBanner {
    fn frame_count(&self) -> u64 {
        self.total
    }

    fn next_frame(&mut self) -> BinResult<Option<Frame>> {
        Ok(self.lines.next().map(|line| self.render_line(&line)))
    }
}

/// Blend a rasterized glyph over the background, using its coverage mask as
/// the alpha channel.
#[allow(clippy::too_many_arguments)]
fn blend_glyph(
    pixels: &mut [RGB8],
    width: u32,
    height: u32,
    x: i32,
    y: i32,
    glyph_width: usize,
    glyph_height: usize,
    coverage: &[u8],
) {
    for row in 0..glyph_height {
        let py = y + row as i32;
        if py < 0 || py >= height as i32 {
            continue;
        }
        for col in 0..glyph_width {
            let px = x + col as i32;
            if px < 0 || px >= width as i32 {
                continue;
            }
            let mask = u16::from(coverage[row * glyph_width + col]);
            if mask == 0 {
                continue;
            }
            let dst = &mut pixels[py as usize * width as usize + px as usize];
            dst.r = blend(dst.r, FOREGROUND.r, mask);
            dst.g = blend(dst.g, FOREGROUND.g, mask);
            dst.b = blend(dst.b, FOREGROUND.b, mask);
        }
    }
}

fn blend(dst: u8, src: u8, alpha: u16) -> u8 {
    ((u16::from(src) * alpha + u16::from(dst) * (255 - alpha) + 127) / 255) as u8
}
