//! Format-mandated palette mapping.
//!
//! GIF stores at most 256 colors per raster, so every RGB frame is remapped
//! to palette indices plus a color table before serialization. Nothing here
//! is quality tuning; it is the minimum the container requires.

use imgref::ImgRef;
use rgb::{RGB8, RGBA8};

use crate::error::GifResult;

/// Map an RGB frame to palette indices and a ≤256-entry color table.
///
/// Input frames are opaque, so no transparent palette entry is reserved.
pub(crate) fn quantize(image: ImgRef<'_, RGB8>) -> GifResult<(Vec<u8>, Vec<RGB8>)> {
    // imagequant operates on RGBA; widen with an opaque alpha channel.
    // Iterating pixels also flattens any row stride.
    let pixels: Vec<RGBA8> = image
        .pixels()
        .map(|px| RGBA8::new(px.r, px.g, px.b, 255))
        .collect();

    let liq = imagequant::Attributes::new();
    let mut img = liq.new_image(pixels, image.width(), image.height(), 0.0)?;
    let mut res = liq.quantize(&mut img)?;
    res.set_dithering_level(0.5)?;
    let (pal, indexed) = res.remapped(&mut img)?;

    let pal = pal.iter().map(|px| RGB8::new(px.r, px.g, px.b)).collect();
    Ok((indexed, pal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use imgref::ImgVec;

    #[test]
    fn solid_frame_maps_to_single_color() {
        let color = RGB8::new(0, 176, 80);
        let image = ImgVec::new(vec![color; 16], 4, 4);
        let (indexed, pal) = quantize(image.as_ref()).unwrap();

        assert_eq!(indexed.len(), 16);
        let first = indexed[0];
        assert!(indexed.iter().all(|&i| i == first));
        let entry = pal[usize::from(first)];
        assert!(
            entry.r.abs_diff(color.r) <= 2
                && entry.g.abs_diff(color.g) <= 2
                && entry.b.abs_diff(color.b) <= 2,
            "palette entry {entry:?} too far from {color:?}"
        );
    }

    #[test]
    fn palette_never_exceeds_format_limit() {
        // 32x32 gradient, 1024 distinct colors going in
        let pixels: Vec<RGB8> = (0..32u8)
            .flat_map(|y| (0..32u8).map(move |x| RGB8::new(x * 8, y * 8, 128)))
            .collect();
        let image = ImgVec::new(pixels, 32, 32);
        let (indexed, pal) = quantize(image.as_ref()).unwrap();

        assert!(pal.len() <= 256);
        assert!(indexed.iter().all(|&i| usize::from(i) < pal.len()));
    }
}
