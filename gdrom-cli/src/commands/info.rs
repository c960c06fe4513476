use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use serde::Serialize;

use gdrom_core::{IpBin, TrackList};
use gdrom_lib::{Game, Source, open_source};

use crate::CliError;

/// What `info --json` prints.
#[derive(Serialize)]
struct InfoReport<'a> {
    gdi_file: Option<&'a str>,
    cue_file: Option<&'a str>,
    tracks: &'a TrackList,
    ip_bin: &'a IpBin,
    regions: Vec<&'static str>,
    peripherals: Vec<&'static str>,
    computed_crc: u16,
}

/// Run the info command.
pub(crate) fn run_info(path: &Path, json: bool) -> Result<(), CliError> {
    let game = Game::open(open_source(path)?)?;

    if json {
        let ip = game.ip_bin();
        let report = InfoReport {
            gdi_file: game.gdi_file(),
            cue_file: game.cue_file(),
            tracks: game.tracks(),
            ip_bin: ip,
            regions: ip.area_symbols.regions().iter().map(|r| r.name()).collect(),
            peripherals: ip.peripherals.iter_names().map(|(name, _)| name).collect(),
            computed_crc: ip.computed_crc(),
        };
        let text = serde_json::to_string_pretty(&report)
            .map_err(|e| CliError::other(format!("Failed to serialize report: {}", e)))?;
        println!("{}", text);
        return Ok(());
    }

    print_header(&game, path);
    crate::log_blank();
    print_tracks(game.tracks());
    crate::log_blank();
    print_toc(game.ip_bin());
    Ok(())
}

fn print_header<S: Source>(game: &Game<S>, path: &Path) {
    let ip = game.ip_bin();
    let descriptor = game
        .gdi_file()
        .or(game.cue_file())
        .unwrap_or_default();

    log::info!(
        "{} {}",
        ip.software_name.if_supports_color(Stdout, |t| t.bold()),
        format!("({})", path.display()).if_supports_color(Stdout, |t| t.dimmed()),
    );
    log::info!("  Layout:       {}", descriptor);
    log::info!("  Product:      {} {}", ip.product_number, ip.product_version);
    log::info!("  Maker:        {}", ip.maker_id);
    log::info!("  Producer:     {}", ip.producer);
    log::info!("  Released:     {}", ip.release_date.format("%Y-%m-%d"));
    log::info!("  Disc:         {} of {}", ip.disc, ip.total_discs);
    log::info!("  Boot file:    {}", ip.boot_filename);

    let regions: Vec<&str> = ip.area_symbols.regions().iter().map(|r| r.name()).collect();
    log::info!(
        "  Regions:      {} [{}]",
        if regions.is_empty() {
            "none".to_string()
        } else {
            regions.join(", ")
        },
        ip.area_symbols,
    );

    let crc = if ip.crc_matches() {
        format!("{:04X}", ip.crc)
            .if_supports_color(Stdout, |t| t.green())
            .to_string()
    } else {
        format!("{:04X} (computed {:04X})", ip.crc, ip.computed_crc())
            .if_supports_color(Stdout, |t| t.red())
            .to_string()
    };
    log::info!("  CRC:          {}", crc);

    let peripherals: Vec<&str> = ip.peripherals.iter_names().map(|(name, _)| name).collect();
    log::info!("  Peripherals:  {:07X}", ip.peripherals.bits());
    for name in peripherals {
        log::info!("    {}", name.to_lowercase().replace('_', " "));
    }
}

fn print_tracks(tracks: &TrackList) {
    log::info!(
        "{}",
        format!("Tracks ({})", tracks.count).if_supports_color(Stdout, |t| t.bold()),
    );
    for track in &tracks.tracks {
        log::info!(
            "  {:>2} {:>6} {:<5} {} {}",
            track.number,
            track.start,
            track.kind.name(),
            track.sector_size,
            track.name.if_supports_color(Stdout, |t| t.cyan()),
        );
    }
}

fn print_toc(ip: &IpBin) {
    log::info!(
        "{}",
        format!("IP.BIN TOC ({})", ip.toc.len()).if_supports_color(Stdout, |t| t.bold()),
    );
    for (i, entry) in ip.toc.iter().enumerate() {
        log::info!(
            "  {:>2} {:>6} {:>6} {}",
            i + 3,
            entry.start,
            entry.length,
            entry.kind.name(),
        );
    }
}
