//! Directory and zip round trips through the sources and sinks.

use std::fs;
use std::io::{ErrorKind, Read, Write};
use std::path::Path;

use gdrom_lib::{
    ConvertOptions, DirectoryReader, DirectoryWriter, Game, Sink, Source, ZipReader, ZipWriter,
};

const SECTOR: usize = 2352;

const GDI: &str = "3
1     0 4 2352 track01.bin 0
2   756 0 2352 track02.raw 0
3 45000 4 2352 track03.bin 0
";

fn put(buf: &mut [u8], offset: usize, text: &str) {
    buf[offset..offset + text.len()].copy_from_slice(text.as_bytes());
}

fn track_three() -> Vec<u8> {
    let mut ip = vec![b' '; 0x100];
    ip.resize(0x8000, 0);
    put(&mut ip, 0x000, "SEGA SEGAKATANA");
    put(&mut ip, 0x020, "0000 GD-ROM1/1");
    put(&mut ip, 0x030, "U");
    put(&mut ip, 0x038, "0000000");
    put(&mut ip, 0x040, "T-0001");
    put(&mut ip, 0x050, "20010203");
    put(&mut ip, 0x080, "ADAPTER TEST");

    let mut track = Vec::new();
    for chunk in ip.chunks(2048) {
        let mut sector = vec![0u8; SECTOR];
        sector[16..16 + 2048].copy_from_slice(chunk);
        track.extend_from_slice(&sector);
    }
    track
}

fn redump_audio() -> Vec<u8> {
    let mut track = vec![0u8; 150 * SECTOR];
    track.extend_from_slice(&vec![0x22u8; 2 * SECTOR]);
    track
}

fn write_game(dir: &Path) {
    fs::write(dir.join("game.gdi"), GDI).unwrap();
    fs::write(dir.join("track01.bin"), vec![0x11u8; 3 * SECTOR]).unwrap();
    fs::write(dir.join("track02.raw"), redump_audio()).unwrap();
    fs::write(dir.join("track03.bin"), track_three()).unwrap();
}

fn converted_gdi() -> String {
    GDI.replace("  756", "  906")
}

#[test]
fn test_directory_reader_rejects_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("plain.bin");
    fs::write(&file, b"data").unwrap();

    let err = DirectoryReader::open(&file).err().unwrap();
    assert_eq!(err.kind(), ErrorKind::NotADirectory);
}

#[test]
fn test_directory_reader_lookup() {
    let dir = tempfile::tempdir().unwrap();
    write_game(dir.path());
    fs::create_dir(dir.path().join("nested.gdi")).unwrap();

    let mut reader = DirectoryReader::open(dir.path()).unwrap();
    let (mut gdi, name) = reader.find_gdi_file().unwrap();
    let mut text = String::new();
    gdi.read_to_string(&mut text).unwrap();
    drop(gdi);
    assert_eq!(name, "game.gdi");
    assert_eq!(text, GDI);
    assert_eq!(reader.bytes_read(), GDI.len() as u64);

    assert_eq!(reader.file_size("track01.bin").unwrap(), 3 * SECTOR as u64);
    assert_eq!(
        reader.find_cue_file().err().unwrap().kind(),
        ErrorKind::NotFound
    );
    assert_eq!(
        reader.open_file("missing.bin").err().unwrap().kind(),
        ErrorKind::NotFound
    );
}

#[test]
fn test_directory_round_trip() {
    let src = tempfile::tempdir().unwrap();
    let dst = tempfile::tempdir().unwrap();
    write_game(src.path());
    let out = dst.path().join("converted");

    let mut game = Game::open(DirectoryReader::open(src.path()).unwrap()).unwrap();
    assert_eq!(game.ip_bin().software_name, "ADAPTER TEST");

    let mut sink = DirectoryWriter::create(&out).unwrap();
    let options = ConvertOptions::new().with_gdi_file("disc.gdi");
    let plan = game.write(&mut sink, &options, |_| {}).unwrap();
    sink.finish().unwrap();

    assert!(plan.redump);
    assert_eq!(fs::read_to_string(out.join("disc.gdi")).unwrap(), converted_gdi());
    assert_eq!(
        fs::read(out.join("track02.raw")).unwrap(),
        vec![0x22u8; 2 * SECTOR]
    );
    assert_eq!(fs::read(out.join("track03.bin")).unwrap(), track_three());
    assert_eq!(
        sink.bytes_written(),
        (3 + 2 + 16) as u64 * SECTOR as u64 + converted_gdi().len() as u64
    );

    // The converted layout loads back and is no longer redump-style.
    let mut again = Game::open(DirectoryReader::open(&out).unwrap()).unwrap();
    assert_eq!(again.gdi_file(), Some("disc.gdi"));
    assert!(!again.is_redump().unwrap());
}

#[test]
fn test_directory_writer_needs_open_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut sink = DirectoryWriter::create(dir.path()).unwrap();
    assert!(sink.write_all(b"orphan").is_err());

    sink.create_file("a.bin").unwrap();
    sink.write_all(b"first").unwrap();
    sink.create_file("b.bin").unwrap();
    sink.write_all(b"second").unwrap();
    sink.finish().unwrap();

    assert_eq!(fs::read(dir.path().join("a.bin")).unwrap(), b"first");
    assert_eq!(fs::read(dir.path().join("b.bin")).unwrap(), b"second");
    assert_eq!(sink.bytes_written(), 11);
}

#[test]
fn test_zip_round_trip() {
    let src = tempfile::tempdir().unwrap();
    let dst = tempfile::tempdir().unwrap();
    write_game(src.path());
    let archive = dst.path().join("game.zip");

    let mut game = Game::open(DirectoryReader::open(src.path()).unwrap()).unwrap();
    let mut sink = ZipWriter::create(&archive).unwrap();
    let options = ConvertOptions::new()
        .with_gdemu_names()
        .with_gdi_file("disc.gdi");
    game.write(&mut sink, &options, |_| {}).unwrap();
    sink.finish().unwrap();
    assert_eq!(
        sink.bytes_written(),
        (3 + 2 + 16) as u64 * SECTOR as u64 + converted_gdi().len() as u64
    );

    let mut reader = ZipReader::open(&archive).unwrap();
    assert_eq!(reader.file_size("track02.raw").unwrap(), 2 * SECTOR as u64);
    assert_eq!(
        reader.file_size("track02.bin").err().unwrap().kind(),
        ErrorKind::NotFound
    );

    let mut zipped = Game::open(reader).unwrap();
    assert_eq!(zipped.gdi_file(), Some("disc.gdi"));
    assert_eq!(zipped.tracks().tracks[1].start, 906);
    assert_eq!(zipped.ip_bin().product_number, "T-0001");
    assert!(!zipped.is_redump().unwrap());

    // Reading back through the zip counts decompressed bytes.
    let mut reader = zipped.into_source();
    let before = reader.bytes_read();
    let mut data = Vec::new();
    reader
        .open_file("track01.bin")
        .unwrap()
        .read_to_end(&mut data)
        .unwrap();
    assert_eq!(data, vec![0x11u8; 3 * SECTOR]);
    assert_eq!(reader.bytes_read() - before, 3 * SECTOR as u64);
}

#[test]
fn test_zip_writer_finish_is_final() {
    let dir = tempfile::tempdir().unwrap();
    let mut sink = ZipWriter::create(dir.path().join("out.zip")).unwrap();
    assert!(sink.write_all(b"orphan").is_err());
    sink.create_file("a.txt").unwrap();
    sink.write_all(b"hello").unwrap();
    sink.finish().unwrap();
    assert!(sink.create_file("b.txt").is_err());
}

#[test]
fn test_zip_writer_close_file_ends_entry() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.zip");
    let mut sink = ZipWriter::create(&path).unwrap();
    sink.create_file("a.txt").unwrap();
    sink.write_all(b"hello").unwrap();
    sink.close_file().unwrap();
    assert!(sink.write_all(b"stray").is_err());

    sink.create_file("b.txt").unwrap();
    sink.write_all(b"world").unwrap();
    sink.close_file().unwrap();
    sink.finish().unwrap();
    assert_eq!(sink.bytes_written(), 10);

    let mut reader = ZipReader::open(&path).unwrap();
    let mut text = String::new();
    reader.open_file("a.txt").unwrap().read_to_string(&mut text).unwrap();
    assert_eq!(text, "hello");
}

#[test]
fn test_open_source_and_create_sink_by_path() {
    let src = tempfile::tempdir().unwrap();
    let dst = tempfile::tempdir().unwrap();
    write_game(src.path());

    let mut game = Game::open(gdrom_lib::open_source(src.path()).unwrap()).unwrap();
    let mut sink = gdrom_lib::create_sink(dst.path().join("out.zip")).unwrap();
    game.write(&mut sink, &ConvertOptions::new(), |_| {}).unwrap();
    sink.finish().unwrap();
    assert!(dst.path().join("out.zip").is_file());

    let mut sink = gdrom_lib::create_sink(dst.path().join("out")).unwrap();
    game.write(&mut sink, &ConvertOptions::new(), |_| {}).unwrap();
    sink.finish().unwrap();
    assert!(!dst.path().join("out").join("game.gdi").exists());
    assert!(dst.path().join("out").join("track02.raw").is_file());

    let zipped = Game::open(gdrom_lib::open_source(dst.path().join("out.zip")).unwrap());
    // No descriptor was written, so there is nothing to load the layout from.
    assert!(zipped.is_err());
}
