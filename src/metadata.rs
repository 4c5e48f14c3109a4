//! Extension-block descriptors derived from an [`AnimationConfig`].
//!
//! All unit and range conversions happen here, exactly once per animation,
//! so the serializer in [`SequenceEncoder`](crate::SequenceEncoder) only
//! moves bytes.

use crate::error::ConfigError;
use crate::{AnimationConfig, PixelFormat, Repeat};

/// How a viewer treats the canvas area before drawing the next frame.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum DisposalMethod {
    /// No disposal specified
    #[default]
    NoAction,
    /// Leave the frame in place
    Keep,
    /// Restore to background color
    Background,
    /// Restore to previous frame
    Previous,
}

impl From<DisposalMethod> for u8 {
    fn from(d: DisposalMethod) -> Self {
        use self::DisposalMethod::*;
        match d {
            NoAction => 0,
            Keep => 1,
            Background => 2,
            Previous => 3,
        }
    }
}

/// Per-frame control block: disposal, transparency and display delay.
///
/// One logical instance per animation; the encoder re-serializes it in front
/// of every frame, since disposal and delay apply per frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphicControlExtension {
    pub disposal: DisposalMethod,
    pub user_input: bool,
    pub transparency: bool,
    /// Display time in 1/100ths of a second.
    pub delay_centis: u16,
    pub transparent_index: u8,
}

impl GraphicControlExtension {
    /// The packed-fields byte of the block.
    pub(crate) fn packed_flags(&self) -> u8 {
        u8::from(self.disposal) << 2
            | u8::from(self.user_input) << 1
            | u8::from(self.transparency)
    }
}

/// NETSCAPE2.0 looping block. `loop_count == 0` repeats forever.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationExtension {
    pub application_id: [u8; 8],
    pub auth_code: [u8; 3],
    pub loop_count: u16,
}

impl ApplicationExtension {
    pub fn netscape_loop(loop_count: u16) -> Self {
        Self {
            application_id: *b"NETSCAPE",
            auth_code: *b"2.0",
            loop_count,
        }
    }
}

/// Free-text block attached once at the start of the stream. Cosmetic only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentExtension(pub String);

/// Everything the encoder needs before the first frame arrives.
///
/// Built from an [`AnimationConfig`] by [`from_config`](Self::from_config)
/// and immutable for the lifetime of the animation.
#[derive(Debug, Clone)]
pub struct StreamMetadata {
    pub width: u32,
    pub height: u32,
    pub pixel_format: PixelFormat,
    /// Re-emitted in front of every frame.
    pub control: GraphicControlExtension,
    /// Present iff the animation loops; written once, before any frame data.
    pub looping: Option<ApplicationExtension>,
    pub comment: Option<CommentExtension>,
}

impl StreamMetadata {
    /// Derive the stream- and frame-level descriptors from `config`.
    ///
    /// The delay is converted to the container's centisecond unit by
    /// truncating integer division: anything finer than 10 ms rounds down.
    /// That loss is policy, not accident — callers asking for a 105 ms delay
    /// get 10 centiseconds.
    pub fn from_config(config: &AnimationConfig) -> Result<Self, ConfigError> {
        if config.width == 0 || config.height == 0 {
            return Err(ConfigError::EmptyCanvas);
        }
        let delay_centis = u16::try_from(config.frame_delay_ms / 10)
            .map_err(|_| ConfigError::DelayOverflow(config.frame_delay_ms))?;

        let looping = match config.repeat {
            Repeat::None => None,
            Repeat::Infinite => Some(ApplicationExtension::netscape_loop(0)),
            Repeat::Finite(n) => Some(ApplicationExtension::netscape_loop(n)),
        };

        Ok(Self {
            width: config.width,
            height: config.height,
            pixel_format: config.pixel_format,
            control: GraphicControlExtension {
                disposal: DisposalMethod::NoAction,
                user_input: false,
                transparency: false,
                delay_centis,
                transparent_index: 0,
            },
            looping,
            comment: Some(CommentExtension(env!("CARGO_PKG_NAME").into())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(frame_delay_ms: u32, repeat: Repeat) -> AnimationConfig {
        AnimationConfig {
            frame_delay_ms,
            repeat,
            width: 1024,
            height: 120,
            pixel_format: PixelFormat::Rgb8,
        }
    }

    #[test]
    fn delay_truncates_to_centiseconds() {
        let m = StreamMetadata::from_config(&config(250, Repeat::None)).unwrap();
        assert_eq!(m.control.delay_centis, 25);

        let m = StreamMetadata::from_config(&config(105, Repeat::None)).unwrap();
        assert_eq!(m.control.delay_centis, 10);

        let m = StreamMetadata::from_config(&config(9, Repeat::None)).unwrap();
        assert_eq!(m.control.delay_centis, 0);
    }

    #[test]
    fn delay_range() {
        let m = StreamMetadata::from_config(&config(655_359, Repeat::None)).unwrap();
        assert_eq!(m.control.delay_centis, 65_535);

        assert_eq!(
            StreamMetadata::from_config(&config(655_360, Repeat::None)).err(),
            Some(ConfigError::DelayOverflow(655_360)),
            "delays past the u16 centisecond range must be rejected"
        );
    }

    #[test]
    fn rejects_empty_canvas() {
        let mut c = config(100, Repeat::None);
        c.width = 0;
        assert_eq!(
            StreamMetadata::from_config(&c).err(),
            Some(ConfigError::EmptyCanvas)
        );

        let mut c = config(100, Repeat::None);
        c.height = 0;
        assert_eq!(
            StreamMetadata::from_config(&c).err(),
            Some(ConfigError::EmptyCanvas)
        );
    }

    #[test]
    fn control_defaults() {
        let m = StreamMetadata::from_config(&config(100, Repeat::None)).unwrap();
        assert_eq!(m.control.disposal, DisposalMethod::NoAction);
        assert!(!m.control.user_input);
        assert!(!m.control.transparency);
        assert_eq!(m.control.transparent_index, 0);
        assert_eq!(m.control.packed_flags(), 0);
    }

    #[test]
    fn loop_descriptor() {
        let m = StreamMetadata::from_config(&config(100, Repeat::None)).unwrap();
        assert!(m.looping.is_none());

        let m = StreamMetadata::from_config(&config(100, Repeat::Infinite)).unwrap();
        let looping = m.looping.unwrap();
        assert_eq!(&looping.application_id, b"NETSCAPE");
        assert_eq!(&looping.auth_code, b"2.0");
        assert_eq!(looping.loop_count, 0);

        let m = StreamMetadata::from_config(&config(100, Repeat::Finite(5))).unwrap();
        assert_eq!(m.looping.unwrap().loop_count, 5);
    }
}
