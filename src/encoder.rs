//! GIF89a stream serialization with an explicit
//! open → write-many → close lifecycle.
//!
//! Block order on the wire: header, logical screen descriptor, application
//! extension (iff looping), comment extension, then per frame a graphic
//! control extension, image descriptor, local color table and LZW-compressed
//! index data, and finally the trailer byte.

use std::io::Write;

use imgref::ImgRef;
use rgb::RGB8;

use crate::error::{Error, GifResult};
use crate::metadata::{GraphicControlExtension, StreamMetadata};
use crate::palette;

/// Block introducers.
const EXTENSION: u8 = 0x21;
const IMAGE_SEPARATOR: u8 = 0x2C;
const TRAILER: u8 = 0x3B;

/// Extension labels.
const GRAPHIC_CONTROL: u8 = 0xF9;
const COMMENT: u8 = 0xFE;
const APPLICATION: u8 = 0xFF;

/// Incremental animated-GIF writer.
///
/// Construction writes the header and all stream-level metadata, so a fresh
/// encoder is already "prepared"; [`write_frame`](Self::write_frame) appends
/// one frame per call and [`close`](Self::close) writes the trailer. Misuse
/// after `close` is a defined error rather than a corrupted stream.
///
/// The encoder is the sole writer to its sink for its whole lifetime and
/// never buffers across frames; frames appear in the output exactly in call
/// order. Errors are fail-fast: after an I/O failure mid-sequence the
/// instance must not be reused. Dropping an encoder without closing it
/// leaves the stream truncated, with no trailer — invalid by design.
pub struct SequenceEncoder<W: Write> {
    /// `None` once the trailer has been written.
    writer: Option<W>,
    width: u16,
    height: u16,
    control: GraphicControlExtension,
    frames_written: u64,
}

impl<W: Write> SequenceEncoder<W> {
    /// Open the stream: writes the `GIF89a` signature, the logical screen
    /// descriptor and the stream-level extension blocks.
    ///
    /// The looping application extension, when `metadata` carries one, goes
    /// on the wire here — exactly once, before any frame data.
    pub fn new(mut writer: W, metadata: &StreamMetadata) -> GifResult<Self> {
        let width = canvas_dimension(metadata.width, "width")?;
        let height = canvas_dimension(metadata.height, "height")?;

        writer.write_all(b"GIF89a")?;

        // logical screen descriptor: canvas size, 8-bit color resolution,
        // no global color table (every frame carries a local one)
        let mut screen_desc = [0_u8; 7];
        screen_desc[0..2].copy_from_slice(&width.to_le_bytes());
        screen_desc[2..4].copy_from_slice(&height.to_le_bytes());
        screen_desc[4] = 0x70;
        writer.write_all(&screen_desc)?;

        if let Some(looping) = &metadata.looping {
            writer.write_all(&[EXTENSION, APPLICATION, 11])?;
            writer.write_all(&looping.application_id)?;
            writer.write_all(&looping.auth_code)?;
            let [lo, hi] = looping.loop_count.to_le_bytes();
            write_sub_blocks(&mut writer, &[1, lo, hi])?;
        }

        if let Some(comment) = &metadata.comment {
            writer.write_all(&[EXTENSION, COMMENT])?;
            write_sub_blocks(&mut writer, comment.0.as_bytes())?;
        }

        Ok(Self {
            writer: Some(writer),
            width,
            height,
            control: metadata.control.clone(),
            frames_written: 0,
        })
    }

    /// Append one frame: graphic control extension, image descriptor, local
    /// color table and compressed pixel data.
    ///
    /// The frame is borrowed only for the duration of the call. Its geometry
    /// must match the canvas declared at open time.
    pub fn write_frame(&mut self, frame: ImgRef<'_, RGB8>) -> GifResult<()> {
        let writer = self.writer.as_mut().ok_or(Error::Closed)?;
        if frame.width() != usize::from(self.width) || frame.height() != usize::from(self.height) {
            return Err(Error::FrameMismatch(format!(
                "frame {} has wrong size ({}×{}, expected {}×{})",
                self.frames_written + 1,
                frame.width(),
                frame.height(),
                self.width,
                self.height
            )));
        }

        let (indexed, pal) = palette::quantize(frame)?;

        // control block is re-emitted for every frame
        let [delay_lo, delay_hi] = self.control.delay_centis.to_le_bytes();
        writer.write_all(&[
            EXTENSION,
            GRAPHIC_CONTROL,
            4,
            self.control.packed_flags(),
            delay_lo,
            delay_hi,
            self.control.transparent_index,
            0,
        ])?;

        // image descriptor covering the whole canvas, local color table
        // padded to a power-of-two entry count
        let table_len = pal.len().max(2).next_power_of_two();
        let size_bits = table_len.trailing_zeros() as u8 - 1;
        let mut image_desc = [0_u8; 10];
        image_desc[0] = IMAGE_SEPARATOR;
        image_desc[5..7].copy_from_slice(&self.width.to_le_bytes());
        image_desc[7..9].copy_from_slice(&self.height.to_le_bytes());
        image_desc[9] = 0x80 | size_bits;
        writer.write_all(&image_desc)?;

        let mut table = rgb::bytemuck::cast_slice::<RGB8, u8>(&pal).to_vec();
        table.resize(table_len * 3, 0);
        writer.write_all(&table)?;

        let min_code_size = (size_bits + 1).max(2);
        let compressed =
            weezl::encode::Encoder::new(weezl::BitOrder::Lsb, min_code_size).encode(&indexed)?;
        writer.write_all(&[min_code_size])?;
        write_sub_blocks(writer, &compressed)?;

        self.frames_written += 1;
        Ok(())
    }

    /// Write the trailer and flush the sink.
    ///
    /// Zero written frames is fine; the result is a valid, empty animation.
    /// A second call fails with [`Error::AlreadyClosed`] — the stream must
    /// carry exactly one trailer.
    pub fn close(&mut self) -> GifResult<()> {
        let mut writer = self.writer.take().ok_or(Error::AlreadyClosed)?;
        writer.write_all(&[TRAILER])?;
        writer.flush()?;
        Ok(())
    }

    /// Number of frames emitted so far. Diagnostic only; the encoder makes
    /// no control decisions from it.
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }
}

fn canvas_dimension(value: u32, name: &str) -> GifResult<u16> {
    u16::try_from(value).map_err(|_| {
        Error::Unsupported(format!(
            "canvas {} of {} exceeds the format limit of 65535",
            name, value
        ))
    })
}

/// Write `data` as GIF data sub-blocks: length-prefixed runs of at most 255
/// bytes, terminated by a zero-length block.
fn write_sub_blocks<W: Write>(writer: &mut W, data: &[u8]) -> std::io::Result<()> {
    for chunk in data.chunks(255) {
        writer.write_all(&[chunk.len() as u8])?;
        writer.write_all(chunk)?;
    }
    writer.write_all(&[0])
}

#[cfg(test)]
mod tests {
    use super::write_sub_blocks;

    #[test]
    fn sub_blocks_split_at_255() {
        let mut out = Vec::new();
        write_sub_blocks(&mut out, &[7_u8; 300]).unwrap();

        assert_eq!(out[0], 255);
        assert_eq!(out[1..256], [7; 255]);
        assert_eq!(out[256], 45);
        assert_eq!(out[257..302], [7; 45]);
        assert_eq!(out[302], 0);
        assert_eq!(out.len(), 303);
    }

    #[test]
    fn empty_data_is_just_the_terminator() {
        let mut out = Vec::new();
        write_sub_blocks(&mut out, &[]).unwrap();
        assert_eq!(out, [0]);
    }
}
