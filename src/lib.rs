/*
 gifseq animated GIF sequence writer

 This program is free software: you can redistribute it and/or modify
 it under the terms of the GNU Affero General Public License as
 published by the Free Software Foundation, either version 3 of the
 License, or (at your option) any later version.

 This program is distributed in the hope that it will be useful,
 but WITHOUT ANY WARRANTY; without even the implied warranty of
 MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 GNU Affero General Public License for more details.

 You should have received a copy of the GNU Affero General Public License
 along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

//! Assembles a sequence of RGB raster frames into a single animated GIF,
//! attaching per-frame timing and loop-control metadata so any standard
//! viewer replays them as an animation.
//!
//! The encoder is strictly sequential and incremental: open a
//! [`SequenceEncoder`] (this writes the header and stream-level metadata),
//! feed it frames one at a time, close it (this writes the trailer).
//!
//! ```
//! use gifseq::{AnimationConfig, PixelFormat, Repeat, SequenceEncoder, StreamMetadata};
//! use gifseq::{ImgVec, RGB8};
//!
//! # fn main() -> gifseq::GifResult<()> {
//! let config = AnimationConfig {
//!     frame_delay_ms: 250,
//!     repeat: Repeat::Infinite,
//!     width: 4,
//!     height: 4,
//!     pixel_format: PixelFormat::Rgb8,
//! };
//! let metadata = StreamMetadata::from_config(&config)?;
//!
//! let mut out = Vec::new();
//! let mut encoder = SequenceEncoder::new(&mut out, &metadata)?;
//! let frame = ImgVec::new(vec![RGB8::new(255, 0, 0); 16], 4, 4);
//! encoder.write_frame(frame.as_ref())?;
//! encoder.close()?;
//! # Ok(())
//! # }
//! ```

mod encoder;
mod error;
mod metadata;
mod palette;
pub mod progress;

pub use crate::encoder::SequenceEncoder;
pub use crate::error::{ConfigError, Error, GifResult};
pub use crate::metadata::{
    ApplicationExtension, CommentExtension, DisposalMethod, GraphicControlExtension,
    StreamMetadata,
};

pub use imgref::{ImgRef, ImgVec};
pub use rgb::RGB8;

/// One animation frame: an owned RGB pixel buffer with its dimensions.
///
/// Frames are handed to [`SequenceEncoder::write_frame`] by reference and
/// never retained past the call.
pub type Frame = ImgVec<RGB8>;

/// How many times a viewer should replay the animation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Repeat {
    /// Play once; no loop signaling is written to the stream
    #[default]
    None,
    /// Repeat forever
    Infinite,
    /// Repeat a fixed number of times
    Finite(u16),
}

/// Pixel layout of the frames handed to the encoder.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum PixelFormat {
    /// 8-bit RGB, no alpha
    #[default]
    Rgb8,
}

/// Stream-level animation parameters, set once per animation.
///
/// Validated and converted into wire-level descriptors by
/// [`StreamMetadata::from_config`]; every frame written to the resulting
/// encoder must match `width` × `height`.
#[derive(Debug, Copy, Clone)]
pub struct AnimationConfig {
    /// Display time of every frame, in milliseconds. The container counts
    /// in centiseconds, so this rounds down to a multiple of 10.
    pub frame_delay_ms: u32,
    pub repeat: Repeat,
    pub width: u32,
    pub height: u32,
    pub pixel_format: PixelFormat,
}
