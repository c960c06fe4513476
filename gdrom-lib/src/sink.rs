//! Destinations a converted game is written to.
//!
//! A sink holds at most one open file. Starting a new file finalises the
//! previous one; [`Sink::finish`] finalises the last.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

use crate::counter::Counter;

pub trait Sink: Write {
    /// Start writing a new file, finalising the one currently open.
    fn create_file(&mut self, name: &str) -> io::Result<()>;

    /// Finalise the current file, if any. The sink stays usable.
    fn close_file(&mut self) -> io::Result<()>;

    /// Finalise everything. Nothing may be written afterwards.
    fn finish(&mut self) -> io::Result<()>;

    /// Payload bytes written so far.
    fn bytes_written(&self) -> u64;
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn create_file(&mut self, name: &str) -> io::Result<()> {
        (**self).create_file(name)
    }

    fn close_file(&mut self) -> io::Result<()> {
        (**self).close_file()
    }

    fn finish(&mut self) -> io::Result<()> {
        (**self).finish()
    }

    fn bytes_written(&self) -> u64 {
        (**self).bytes_written()
    }
}

/// A zip archive when `path` ends in `.zip`, otherwise a directory.
pub fn create_sink(path: impl AsRef<Path>) -> io::Result<Box<dyn Sink>> {
    let path = path.as_ref();
    let is_zip = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"));
    if is_zip {
        Ok(Box::new(ZipWriter::create(path)?))
    } else {
        Ok(Box::new(DirectoryWriter::create(path)?))
    }
}

fn no_open_file() -> io::Error {
    io::Error::other("no destination file is open")
}

// ---------------------------------------------------------------------------
// Directory
// ---------------------------------------------------------------------------

/// Writes each file into a directory, creating it (and its parents) first.
pub struct DirectoryWriter {
    root: PathBuf,
    current: Option<BufWriter<File>>,
    tx: u64,
}

impl DirectoryWriter {
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        let root = path.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            current: None,
            tx: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }
}

impl Write for DirectoryWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let file = self.current.as_mut().ok_or_else(no_open_file)?;
        Counter::new(file, &mut self.tx).write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.current.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

impl Sink for DirectoryWriter {
    fn create_file(&mut self, name: &str) -> io::Result<()> {
        self.close_file()?;
        let file = File::create(self.root.join(name))?;
        self.current = Some(BufWriter::new(file));
        Ok(())
    }

    fn close_file(&mut self) -> io::Result<()> {
        if let Some(mut file) = self.current.take() {
            file.flush()?;
        }
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        self.close_file()
    }

    fn bytes_written(&self) -> u64 {
        self.tx
    }
}

// ---------------------------------------------------------------------------
// Zip archive
// ---------------------------------------------------------------------------

/// Writes every file as a deflated entry of a single zip archive.
pub struct ZipWriter {
    archive: Option<zip::ZipWriter<BufWriter<File>>>,
    has_entry: bool,
    tx: u64,
}

impl ZipWriter {
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        Ok(Self {
            archive: Some(zip::ZipWriter::new(BufWriter::new(file))),
            has_entry: false,
            tx: 0,
        })
    }

    fn archive(&mut self) -> io::Result<&mut zip::ZipWriter<BufWriter<File>>> {
        self.archive
            .as_mut()
            .ok_or_else(|| io::Error::other("zip archive already finished"))
    }
}

impl Write for ZipWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if !self.has_entry {
            return Err(no_open_file());
        }
        let archive = self
            .archive
            .as_mut()
            .ok_or_else(|| io::Error::other("zip archive already finished"))?;
        Counter::new(archive, &mut self.tx).write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.archive.as_mut() {
            Some(archive) => archive.flush(),
            None => Ok(()),
        }
    }
}

impl Sink for ZipWriter {
    fn create_file(&mut self, name: &str) -> io::Result<()> {
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        self.archive()?
            .start_file(name, options)
            .map_err(io::Error::other)?;
        self.has_entry = true;
        Ok(())
    }

    /// The entry itself is finalised by the next `create_file` or by
    /// `finish`; writes are refused until another file is created.
    fn close_file(&mut self) -> io::Result<()> {
        self.has_entry = false;
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        if let Some(archive) = self.archive.take() {
            let mut inner = archive.finish().map_err(io::Error::other)?;
            inner.flush()?;
        }
        self.has_entry = false;
        Ok(())
    }

    fn bytes_written(&self) -> u64 {
        self.tx
    }
}
