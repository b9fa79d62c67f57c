//! Output sinks
//!
//! A session asks a [`SinkOpener`] for a fresh [`Sink`] on every start and
//! closes it on stop. Files are the normal destination; the in-memory sink
//! backs embedding hosts and tests.

use packetlog_shared::utils::time;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

/// Append-only text destination
pub trait Sink: Send {
    fn write(&mut self, text: &str) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()>;

    /// Flush and release the destination. Consumes the sink so it cannot be reused.
    fn close(self: Box<Self>) -> io::Result<()>;

    /// Human-readable location (a path for files)
    fn location(&self) -> String;
}

/// Creates a new sink for each session
pub trait SinkOpener: Send + Sync {
    fn open(&self) -> io::Result<Box<dyn Sink>>;
}

// ── Files ────────────────────────────────────────────────────────────────────

/// Opens `<dir>/<prefix>_<YYYYmmdd_HHMMSS>.log`, creating `dir` as needed.
///
/// Never reopens an existing file: if the name is taken (two sessions in the
/// same second) a numeric suffix is added.
#[derive(Debug, Clone)]
pub struct FileSinkOpener {
    dir: PathBuf,
    prefix: String,
}

/// Upper bound on `_N` suffixes tried for one timestamp
const MAX_NAME_ATTEMPTS: u32 = 1000;

impl FileSinkOpener {
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl SinkOpener for FileSinkOpener {
    fn open(&self) -> io::Result<Box<dyn Sink>> {
        fs::create_dir_all(&self.dir)?;

        let stamp = time::format_file_stamp(&time::now());
        for attempt in 0..MAX_NAME_ATTEMPTS {
            let name = if attempt == 0 {
                format!("{}_{}.log", self.prefix, stamp)
            } else {
                format!("{}_{}_{}.log", self.prefix, stamp, attempt)
            };
            let path = self.dir.join(name);

            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => {
                    debug!("Opened log file {}", path.display());
                    return Ok(Box::new(FileSink::new(path, file)));
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e),
            }
        }

        Err(io::Error::new(
            ErrorKind::AlreadyExists,
            format!(
                "no free log file name for {}_{} in {}",
                self.prefix,
                stamp,
                self.dir.display()
            ),
        ))
    }
}

/// Buffered file sink
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    buffer: EntryBuffer<File>,
}

impl FileSink {
    fn new(path: PathBuf, file: File) -> Self {
        Self {
            path,
            buffer: EntryBuffer::new(file),
        }
    }
}

impl Sink for FileSink {
    fn write(&mut self, text: &str) -> io::Result<()> {
        self.buffer.write(text.as_bytes())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.buffer.flush()
    }

    fn close(self: Box<Self>) -> io::Result<()> {
        let file = self.buffer.into_inner()?;
        file.sync_all()
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// `BufWriter` that forgets whatever it still holds once a write or flush
/// fails, so a half-written entry is never completed in front of the next one.
#[derive(Debug)]
struct EntryBuffer<W: Write> {
    // `None` only inside `discard`
    writer: Option<BufWriter<W>>,
}

impl<W: Write> EntryBuffer<W> {
    fn new(inner: W) -> Self {
        Self {
            writer: Some(BufWriter::new(inner)),
        }
    }

    fn writer(&mut self) -> io::Result<&mut BufWriter<W>> {
        self.writer
            .as_mut()
            .ok_or_else(|| io::Error::new(ErrorKind::Other, "sink writer unavailable"))
    }

    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        let result = self.writer()?.write_all(bytes);
        if result.is_err() {
            self.discard();
        }
        result
    }

    fn flush(&mut self) -> io::Result<()> {
        let result = self.writer()?.flush();
        if result.is_err() {
            self.discard();
        }
        result
    }

    fn discard(&mut self) {
        if let Some(writer) = self.writer.take() {
            let (inner, dropped) = writer.into_parts();
            if let Ok(dropped) = dropped {
                if !dropped.is_empty() {
                    debug!("Dropped {} unwritten bytes after a sink error", dropped.len());
                }
            }
            self.writer = Some(BufWriter::new(inner));
        }
    }

    fn into_inner(mut self) -> io::Result<W> {
        let writer = self.writer.take().ok_or_else(|| {
            io::Error::new(ErrorKind::Other, "sink writer unavailable")
        })?;
        writer.into_inner().map_err(|e| e.into_error())
    }
}

// ── Memory ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct MemoryLog {
    text: String,
    flushed_len: usize,
    closed: bool,
}

/// Keeps every opened log in memory, one entry per `open`
#[derive(Debug, Clone, Default)]
pub struct MemorySinkOpener {
    logs: Arc<Mutex<Vec<MemoryLog>>>,
}

impl MemorySinkOpener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sinks opened so far
    pub fn opened(&self) -> usize {
        self.lock().len()
    }

    /// Flushed text of the `index`-th opened sink
    pub fn contents(&self, index: usize) -> Option<String> {
        self.lock()
            .get(index)
            .map(|log| log.text[..log.flushed_len].to_string())
    }

    pub fn is_closed(&self, index: usize) -> bool {
        self.lock().get(index).map(|log| log.closed).unwrap_or(false)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<MemoryLog>> {
        self.logs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SinkOpener for MemorySinkOpener {
    fn open(&self) -> io::Result<Box<dyn Sink>> {
        let mut logs = self.lock();
        logs.push(MemoryLog::default());
        Ok(Box::new(MemorySink {
            logs: self.logs.clone(),
            index: logs.len() - 1,
        }))
    }
}

struct MemorySink {
    logs: Arc<Mutex<Vec<MemoryLog>>>,
    index: usize,
}

impl MemorySink {
    fn with_log<T>(&self, f: impl FnOnce(&mut MemoryLog) -> T) -> T {
        let mut logs = self.logs.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut logs[self.index])
    }
}

impl Sink for MemorySink {
    fn write(&mut self, text: &str) -> io::Result<()> {
        self.with_log(|log| {
            if log.closed {
                return Err(io::Error::new(ErrorKind::Other, "sink is closed"));
            }
            log.text.push_str(text);
            Ok(())
        })
    }

    fn flush(&mut self) -> io::Result<()> {
        self.with_log(|log| log.flushed_len = log.text.len());
        Ok(())
    }

    fn close(self: Box<Self>) -> io::Result<()> {
        self.with_log(|log| {
            log.flushed_len = log.text.len();
            log.closed = true;
        });
        Ok(())
    }

    fn location(&self) -> String {
        format!("memory:{}", self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_opener_creates_directory_and_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dir = temp_dir.path().join("nested").join("logs");
        let opener = FileSinkOpener::new(&dir, "packets");

        let mut sink = opener.open().unwrap();
        sink.write("hello\n").unwrap();
        sink.flush().unwrap();
        let location = sink.location();
        sink.close().unwrap();

        assert!(dir.is_dir());
        let name = Path::new(&location).file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("packets_") && name.ends_with(".log"), "{}", name);
        assert_eq!(fs::read_to_string(&location).unwrap(), "hello\n");
    }

    #[test]
    fn test_file_opener_never_reuses_a_name() {
        let temp_dir = tempfile::tempdir().unwrap();
        let opener = FileSinkOpener::new(temp_dir.path(), "run");

        let first = opener.open().unwrap();
        let second = opener.open().unwrap();
        assert_ne!(first.location(), second.location());
        first.close().unwrap();
        second.close().unwrap();
    }

    #[test]
    fn test_file_opener_fails_when_dir_is_a_file() {
        let temp_file = tempfile::NamedTempFile::new().unwrap();
        let opener = FileSinkOpener::new(temp_file.path(), "run");
        assert!(opener.open().is_err());
    }

    /// Shared byte log that refuses writes while `failing` is set
    #[derive(Clone, Default)]
    struct Disk {
        bytes: Arc<Mutex<Vec<u8>>>,
        failing: Arc<Mutex<bool>>,
    }

    impl Write for Disk {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if *self.failing.lock().unwrap() {
                return Err(io::Error::new(ErrorKind::Other, "disk full"));
            }
            self.bytes.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_failed_entry_is_not_replayed_before_next_one() {
        let disk = Disk::default();
        let mut buffer = EntryBuffer::new(disk.clone());

        buffer.write(b"header\n").unwrap();
        buffer.flush().unwrap();

        buffer.write(b"lost entry\n").unwrap();
        *disk.failing.lock().unwrap() = true;
        assert!(buffer.flush().is_err());
        *disk.failing.lock().unwrap() = false;

        buffer.write(b"next entry\n").unwrap();
        buffer.flush().unwrap();
        buffer.into_inner().unwrap();

        let text = String::from_utf8(disk.bytes.lock().unwrap().clone()).unwrap();
        assert_eq!(text, "header\nnext entry\n");
    }

    #[test]
    fn test_oversized_failed_write_is_dropped() {
        let disk = Disk::default();
        let mut buffer = EntryBuffer::new(disk.clone());

        buffer.write(b"partial").unwrap();
        *disk.failing.lock().unwrap() = true;
        let big = vec![b'x'; 64 * 1024];
        assert!(buffer.write(&big).is_err());
        *disk.failing.lock().unwrap() = false;

        buffer.write(b"ok\n").unwrap();
        buffer.flush().unwrap();
        assert_eq!(disk.bytes.lock().unwrap().as_slice(), b"ok\n");
    }

    #[test]
    fn test_memory_sink_only_exposes_flushed_text() {
        let opener = MemorySinkOpener::new();
        let mut sink = opener.open().unwrap();

        sink.write("abc").unwrap();
        assert_eq!(opener.contents(0).unwrap(), "");
        sink.flush().unwrap();
        assert_eq!(opener.contents(0).unwrap(), "abc");

        sink.write("def").unwrap();
        sink.close().unwrap();
        assert_eq!(opener.contents(0).unwrap(), "abcdef");
        assert!(opener.is_closed(0));
    }

    #[test]
    fn test_memory_opener_keeps_sessions_apart() {
        let opener = MemorySinkOpener::new();
        let mut a = opener.open().unwrap();
        let mut b = opener.open().unwrap();
        a.write("a").unwrap();
        b.write("b").unwrap();
        a.close().unwrap();
        b.close().unwrap();

        assert_eq!(opener.opened(), 2);
        assert_eq!(opener.contents(0).unwrap(), "a");
        assert_eq!(opener.contents(1).unwrap(), "b");
        assert!(opener.contents(2).is_none());
    }
}
