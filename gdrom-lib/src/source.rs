//! Byte providers a game is loaded from.
//!
//! A source is a flat collection of named files: a directory on disk or a
//! zip archive. Files are located by extension (the track-layout descriptor
//! or a cue sheet) and then opened by the names that descriptor lists.

use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use zip::ZipArchive;
use zip::result::ZipError;

use crate::counter::Counter;

/// Named-file provider.
///
/// Every stream handed out adds to [`bytes_read`](Self::bytes_read) as it
/// is consumed. A file that does not exist is an [`io::ErrorKind::NotFound`]
/// error.
pub trait Source {
    /// First file whose extension matches `ext`, with its name.
    fn find_file(&mut self, ext: &str) -> io::Result<(Box<dyn Read + '_>, String)>;

    fn open_file(&mut self, name: &str) -> io::Result<Box<dyn Read + '_>>;

    fn file_size(&mut self, name: &str) -> io::Result<u64>;

    /// Bytes read so far across every stream.
    fn bytes_read(&self) -> u64;

    fn find_gdi_file(&mut self) -> io::Result<(Box<dyn Read + '_>, String)> {
        self.find_file(gdrom_core::gdi::EXTENSION)
    }

    fn find_cue_file(&mut self) -> io::Result<(Box<dyn Read + '_>, String)> {
        self.find_file("cue")
    }
}

impl<S: Source + ?Sized> Source for Box<S> {
    fn find_file(&mut self, ext: &str) -> io::Result<(Box<dyn Read + '_>, String)> {
        (**self).find_file(ext)
    }

    fn open_file(&mut self, name: &str) -> io::Result<Box<dyn Read + '_>> {
        (**self).open_file(name)
    }

    fn file_size(&mut self, name: &str) -> io::Result<u64> {
        (**self).file_size(name)
    }

    fn bytes_read(&self) -> u64 {
        (**self).bytes_read()
    }
}

/// Open a directory, or a zip archive when `path` is a file.
pub fn open_source(path: impl AsRef<Path>) -> io::Result<Box<dyn Source>> {
    let path = path.as_ref();
    if fs::metadata(path)?.is_dir() {
        Ok(Box::new(DirectoryReader::open(path)?))
    } else {
        Ok(Box::new(ZipReader::open(path)?))
    }
}

fn has_extension(name: &str, ext: &str) -> bool {
    Path::new(name)
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

fn not_found(what: impl std::fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("{what} not found"))
}

// ---------------------------------------------------------------------------
// Directory
// ---------------------------------------------------------------------------

/// Files in a single directory. Subdirectories are ignored.
pub struct DirectoryReader {
    root: PathBuf,
    rx: u64,
}

impl DirectoryReader {
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let root = path.as_ref().to_path_buf();
        if !fs::metadata(&root)?.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotADirectory,
                format!("{} is not a directory", root.display()),
            ));
        }
        Ok(Self { root, rx: 0 })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// File names in the directory, sorted so lookups are deterministic.
    fn file_names(&self) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }
}

impl Source for DirectoryReader {
    fn find_file(&mut self, ext: &str) -> io::Result<(Box<dyn Read + '_>, String)> {
        let name = self
            .file_names()?
            .into_iter()
            .find(|name| has_extension(name, ext))
            .ok_or_else(|| not_found(format_args!(".{ext} file")))?;
        let reader = self.open_file(&name)?;
        Ok((reader, name))
    }

    fn open_file(&mut self, name: &str) -> io::Result<Box<dyn Read + '_>> {
        let file = File::open(self.root.join(name))?;
        Ok(Box::new(Counter::new(BufReader::new(file), &mut self.rx)))
    }

    fn file_size(&mut self, name: &str) -> io::Result<u64> {
        Ok(fs::metadata(self.root.join(name))?.len())
    }

    fn bytes_read(&self) -> u64 {
        self.rx
    }
}

// ---------------------------------------------------------------------------
// Zip archive
// ---------------------------------------------------------------------------

/// Files in a zip archive, in archive order. Counts decompressed bytes.
pub struct ZipReader {
    archive: ZipArchive<BufReader<File>>,
    rx: u64,
}

impl ZipReader {
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::open(path)?;
        let archive = ZipArchive::new(BufReader::new(file)).map_err(zip_error)?;
        Ok(Self { archive, rx: 0 })
    }

    fn index_of(&mut self, ext: &str) -> io::Result<Option<usize>> {
        for i in 0..self.archive.len() {
            let file = self.archive.by_index(i).map_err(zip_error)?;
            if !file.is_dir() && has_extension(file.name(), ext) {
                return Ok(Some(i));
            }
        }
        Ok(None)
    }
}

impl Source for ZipReader {
    fn find_file(&mut self, ext: &str) -> io::Result<(Box<dyn Read + '_>, String)> {
        let index = self
            .index_of(ext)?
            .ok_or_else(|| not_found(format_args!(".{ext} file")))?;
        let file = self.archive.by_index(index).map_err(zip_error)?;
        let name = file.name().to_string();
        Ok((Box::new(Counter::new(file, &mut self.rx)), name))
    }

    fn open_file(&mut self, name: &str) -> io::Result<Box<dyn Read + '_>> {
        let file = self.archive.by_name(name).map_err(|e| match e {
            ZipError::FileNotFound => not_found(name),
            other => zip_error(other),
        })?;
        Ok(Box::new(Counter::new(file, &mut self.rx)))
    }

    fn file_size(&mut self, name: &str) -> io::Result<u64> {
        match self.archive.by_name(name) {
            Ok(file) => Ok(file.size()),
            Err(ZipError::FileNotFound) => Err(not_found(name)),
            Err(e) => Err(zip_error(e)),
        }
    }

    fn bytes_read(&self) -> u64 {
        self.rx
    }
}

fn zip_error(err: ZipError) -> io::Error {
    match err {
        ZipError::Io(e) => e,
        ZipError::FileNotFound => io::Error::new(io::ErrorKind::NotFound, err),
        other => io::Error::new(io::ErrorKind::InvalidData, other),
    }
}
