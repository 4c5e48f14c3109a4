use std::io;
use quick_error::quick_error;

quick_error! {
    /// Invalid [`AnimationConfig`](crate::AnimationConfig), caught before any I/O.
    #[derive(Debug, PartialEq, Eq)]
    pub enum ConfigError {
        DelayOverflow(ms: u32) {
            display("frame delay of {} ms does not fit the centisecond range (must be below 655360)", ms)
        }
        EmptyCanvas {
            display("canvas dimensions must be positive")
        }
    }
}

quick_error! {
    #[derive(Debug)]
    pub enum Error {
        Config(err: ConfigError) {
            from()
            display("invalid animation config: {}", err)
        }
        FrameMismatch(msg: String) {
            display("{}", msg)
        }
        Io(err: io::Error) {
            from()
            display("I/O: {}", err)
        }
        Closed {
            display("frame written to an encoder that was already closed")
        }
        AlreadyClosed {
            display("encoder closed twice; the stream carries exactly one trailer")
        }
        Unsupported(msg: String) {
            display("{}", msg)
        }
        Quant(liq: imagequant::liq_error) {
            from()
            display("palette error: {}", liq)
        }
        Lzw(err: weezl::LzwError) {
            from()
            display("LZW error: {}", err)
        }
    }
}

pub type GifResult<T, E = Error> = Result<T, E>;
