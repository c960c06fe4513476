use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use gdrom_core::util::format_bytes_approx;
use gdrom_lib::{ConvertProgress, Game, Settings, Sink, Source, create_sink, open_source};

use crate::CliError;
use crate::spinner::Spinner;

pub(crate) struct ConvertArgs {
    pub src: PathBuf,
    pub dst: PathBuf,
    pub gdemu: bool,
    pub trim: bool,
    pub gdi_file: Option<String>,
    pub no_gdi_file: bool,
    pub quiet: bool,
}

/// Run the convert command.
///
/// Settings supply the defaults; every flag given on the command line wins.
pub(crate) fn run_convert(args: ConvertArgs) -> Result<(), CliError> {
    if args.src == args.dst {
        return Err(CliError::other("Source and destination are the same"));
    }

    let settings = Settings::load();
    let mut options = settings.convert_options();
    if args.gdemu {
        options = options.with_gdemu_names();
    }
    if args.trim {
        options = options.with_trim_whitespace(true);
    }
    if let Some(name) = args.gdi_file {
        options = options.with_gdi_file(name);
    }
    if args.no_gdi_file {
        options.gdi_file = None;
    }

    let mut game = Game::open(open_source(&args.src)?)?;
    log::info!(
        "Converting {} -> {}",
        game.ip_bin()
            .software_name
            .if_supports_color(Stdout, |t| t.bold()),
        args.dst.display(),
    );

    let mut sink = create_sink(&args.dst)?;
    let spinner = Spinner::new(args.quiet);
    let plan = game.write(&mut sink, &options, |progress| match progress {
        ConvertProgress::Detected { redump } => {
            log::debug!("Redump layout: {}", redump);
        }
        ConvertProgress::Track {
            destination,
            index,
            total,
            ..
        } => spinner.set_message(format!("[{}/{}] {}", index, total, destination)),
        ConvertProgress::Descriptor { name } => spinner.set_message(format!("Writing {}", name)),
        ConvertProgress::Done => {}
    });
    spinner.finish();
    let plan = plan?;
    sink.finish()?;

    log::info!(
        "{} {} tracks{}",
        "Done:".if_supports_color(Stdout, |t| t.green()),
        plan.copies.len(),
        if plan.redump {
            " (redump layout converted)"
        } else {
            ""
        },
    );
    log::info!(
        "  Read {}, wrote {}",
        format_bytes_approx(game.source().bytes_read()),
        format_bytes_approx(sink.bytes_written()),
    );
    Ok(())
}
