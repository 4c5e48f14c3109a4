use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use clap::{command, value_parser, Arg, ArgAction};

use gifseq::progress::{NoProgress, ProgressReporter};
use gifseq::{AnimationConfig, PixelFormat, Repeat, SequenceEncoder, StreamMetadata};

mod source;
mod text;

use crate::source::Source;
use crate::text::TextBanner;

pub type BinResult<T, E = Box<dyn std::error::Error + Send + Sync>> = Result<T, E>;

fn main() {
    if let Err(e) = bin_main() {
        eprintln!("error: {e}");
        if let Some(e) = e.source() {
            eprintln!("error: {e}");
        }
        std::process::exit(1);
    }
}

fn bin_main() -> BinResult<()> {
    let matches = command!()
        .arg(
            Arg::new("FILE")
                .help("Text file; every line becomes one animation frame")
                .value_parser(value_parser!(PathBuf))
                .required(true),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .value_name("a.gif")
                .value_parser(value_parser!(PathBuf))
                .help("Destination file to write to; defaults to the input name with a .gif extension"),
        )
        .arg(
            Arg::new("delay")
                .long("delay-ms")
                .value_name("ms")
                .value_parser(value_parser!(u32))
                .default_value("100")
                .help("Display time of every frame in milliseconds, rounded down to 1/100ths of a second"),
        )
        .arg(
            Arg::new("repeat")
                .long("repeat")
                .value_name("num")
                .value_parser(value_parser!(i32))
                .allow_negative_numbers(true)
                .default_value("-1")
                .help("Number of times the animation is repeated (-1 none, 0 forever or <value> repetitions)"),
        )
        .arg(
            Arg::new("width")
                .long("width")
                .short('W')
                .value_name("px")
                .value_parser(value_parser!(u32))
                .default_value("1024")
                .help("Canvas width; every frame is rendered at this size"),
        )
        .arg(
            Arg::new("height")
                .long("height")
                .short('H')
                .value_name("px")
                .value_parser(value_parser!(u32))
                .default_value("120")
                .help("Canvas height"),
        )
        .arg(
            Arg::new("font")
                .long("font")
                .value_name("file.ttf")
                .value_parser(value_parser!(PathBuf))
                .required(true)
                .help("TrueType font used to render the text"),
        )
        .arg(
            Arg::new("font-size")
                .long("font-size")
                .value_name("px")
                .value_parser(value_parser!(f32))
                .default_value("122")
                .help("Font size in pixels"),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .short('q')
                .action(ArgAction::SetTrue)
                .help("Do not display anything on standard output/console"),
        )
        .get_matches();

    let input = matches.get_one::<PathBuf>("FILE").ok_or("Missing input file")?;
    let output = matches
        .get_one::<PathBuf>("output")
        .cloned()
        .unwrap_or_else(|| input.with_extension("gif"));

    let repeat = match *matches.get_one::<i32>("repeat").ok_or("Missing repeat")? {
        -1 => Repeat::None,
        0 => Repeat::Infinite,
        n if (1..=i32::from(u16::MAX)).contains(&n) => Repeat::Finite(n as u16),
        n => return Err(format!("invalid repeat count {n}").into()),
    };

    let config = AnimationConfig {
        frame_delay_ms: *matches.get_one::<u32>("delay").ok_or("Missing delay")?,
        repeat,
        width: *matches.get_one::<u32>("width").ok_or("Missing width")?,
        height: *matches.get_one::<u32>("height").ok_or("Missing height")?,
        pixel_format: PixelFormat::Rgb8,
    };
    let metadata = StreamMetadata::from_config(&config)?;

    let font = matches.get_one::<PathBuf>("font").ok_or("Missing font")?;
    let font_size = *matches.get_one::<f32>("font-size").ok_or("Missing font size")?;
    let mut source = TextBanner::new(input, font, font_size, config.width, config.height)?;

    let mut progress: Box<dyn ProgressReporter> = if matches.get_flag("quiet") {
        Box::new(NoProgress {})
    } else {
        Box::new(gifseq::progress::ProgressBar::new(source.frame_count()))
    };

    let sink = BufWriter::new(File::create(&output)?);
    let mut encoder = SequenceEncoder::new(sink, &metadata)?;
    while let Some(frame) = source.next_frame()? {
        encoder.write_frame(frame.as_ref())?;
        if !progress.increase() {
            break;
        }
    }
    encoder.close()?;

    progress.done(&format!(
        "GIF created: {} ({} frames)",
        output.display(),
        encoder.frames_written()
    ));
    Ok(())
}
