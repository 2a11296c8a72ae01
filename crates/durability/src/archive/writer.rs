//! Archive writer
//!
//! Streams snapshots, then logs, into `data.tar.gz` (or `data.tar.zst`)
//! inside an output directory. The stream is built as
//! `File -> BufWriter -> encoder -> tar::Builder` and torn down in the
//! opposite order so the compressor is flushed before the file is synced.

use crate::archive::error::{ArchiveError, ArchiveResult};
use crate::archive::types::{ArchiveInfo, ArchiveOptions, Compression};
use flate2::write::GzEncoder;
use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;
use tar::{Builder, Header, HeaderMode};
use tracing::{debug, info};
use zkarchive_core::{FileKind, PersistedFile};

/// Writer for backup archives
///
/// The archive is written to a `.tmp` sibling and renamed into place, so an
/// interrupted run never leaves a truncated archive under the final name.
pub struct ArchiveWriter {
    compression: Compression,
}

/// Per-run entry counters
#[derive(Debug, Default)]
struct EntryStats {
    snapshots: usize,
    logs: usize,
    bytes: u64,
}

impl ArchiveWriter {
    /// Create a new writer with the given options
    pub fn new(options: &ArchiveOptions) -> Self {
        Self {
            compression: options.compression,
        }
    }

    /// Create a new writer with default options (gzip)
    pub fn with_defaults() -> Self {
        Self::new(&ArchiveOptions::default())
    }

    /// Write `snapshots` then `logs` into the archive in `output_dir`
    ///
    /// An existing archive of the same name is replaced.
    pub fn write(
        &self,
        snapshots: &[PersistedFile],
        logs: &[PersistedFile],
        output_dir: &Path,
    ) -> ArchiveResult<ArchiveInfo> {
        if !output_dir.as_os_str().is_empty() && !output_dir.exists() {
            fs::create_dir_all(output_dir)?;
        }

        let name = self.compression.archive_name();
        let path = output_dir.join(name);
        let temp_path = output_dir.join(format!("{}.tmp", name));

        let stats = match self.write_file(snapshots, logs, &temp_path, &path) {
            Ok(stats) => stats,
            Err(e) => {
                let _ = fs::remove_file(&temp_path);
                return Err(e);
            }
        };

        if let Err(e) = fs::rename(&temp_path, &path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }

        let archive_size_bytes = fs::metadata(&path)?.len();
        info!(
            target: "zkarchive::archive",
            path = %path.display(),
            entries = stats.snapshots + stats.logs,
            bytes = archive_size_bytes,
            "Archive written"
        );

        Ok(ArchiveInfo {
            path,
            entry_count: stats.snapshots + stats.logs,
            snapshot_count: stats.snapshots,
            log_count: stats.logs,
            uncompressed_bytes: stats.bytes,
            archive_size_bytes,
        })
    }

    /// Build the archive in memory instead of on disk
    pub fn write_to_vec(
        &self,
        snapshots: &[PersistedFile],
        logs: &[PersistedFile],
    ) -> ArchiveResult<Vec<u8>> {
        let mut buffer = Vec::new();
        {
            let encoder = Encoder::new(&mut buffer, self.compression)?;
            let mut builder = Builder::new(encoder);
            self.append_all(&mut builder, snapshots, logs, Path::new("<memory>"))?;
            let encoder = builder
                .into_inner()
                .map_err(|e| ArchiveError::archive(format!("tar finish: {}", e)))?;
            encoder.finish()?;
        }
        Ok(buffer)
    }

    fn write_file(
        &self,
        snapshots: &[PersistedFile],
        logs: &[PersistedFile],
        temp_path: &Path,
        final_path: &Path,
    ) -> ArchiveResult<EntryStats> {
        let file = File::create(temp_path)?;
        let encoder = Encoder::new(BufWriter::new(file), self.compression)?;
        let mut builder = Builder::new(encoder);

        let stats = self.append_all(&mut builder, snapshots, logs, final_path)?;

        let encoder = builder
            .into_inner()
            .map_err(|e| ArchiveError::archive(format!("tar finish: {}", e)))?;
        let buffered = encoder.finish()?;
        let file = buffered
            .into_inner()
            .map_err(|e| ArchiveError::Io(e.into_error()))?;
        file.sync_all()?;

        Ok(stats)
    }

    fn append_all<W: Write>(
        &self,
        builder: &mut Builder<W>,
        snapshots: &[PersistedFile],
        logs: &[PersistedFile],
        archive_path: &Path,
    ) -> ArchiveResult<EntryStats> {
        let mut stats = EntryStats::default();

        for file in snapshots.iter().chain(logs) {
            info!(
                target: "zkarchive::archive",
                "compress {}:{} into {}",
                file.kind(),
                file.file_name(),
                archive_path.display()
            );
            stats.bytes += append_file(builder, file)?;
            match file.kind() {
                FileKind::Snapshot => stats.snapshots += 1,
                FileKind::Log => stats.logs += 1,
            }
        }

        Ok(stats)
    }
}

/// Copy one source file into the archive, returning its size
///
/// The source handle lives only for this call.
fn append_file<W: Write>(builder: &mut Builder<W>, file: &PersistedFile) -> ArchiveResult<u64> {
    let name = file.file_name();
    let mut source =
        File::open(file.path()).map_err(|e| ArchiveError::source_unreadable(file.path(), e))?;
    let metadata = source
        .metadata()
        .map_err(|e| ArchiveError::source_unreadable(file.path(), e))?;
    let size = metadata.len();

    let mut header = Header::new_gnu();
    header.set_metadata_in_mode(&metadata, HeaderMode::Complete);
    header.set_size(size);

    // A log still being appended to must not outgrow the size in its header
    builder
        .append_data(&mut header, &name, (&mut source).take(size))
        .map_err(|e| ArchiveError::archive(format!("append '{}': {}", name, e)))?;

    debug!(target: "zkarchive::archive", file = %name, bytes = size, "Entry appended");
    Ok(size)
}

/// Compressor sitting between the tar builder and the output
enum Encoder<W: Write> {
    Gzip(GzEncoder<W>),
    Zstd(zstd::Encoder<'static, W>),
}

impl<W: Write> Encoder<W> {
    fn new(inner: W, compression: Compression) -> ArchiveResult<Self> {
        match compression {
            Compression::Gzip { level } => Ok(Encoder::Gzip(GzEncoder::new(
                inner,
                flate2::Compression::new(level),
            ))),
            Compression::Zstd { level } => zstd::Encoder::new(inner, level)
                .map(Encoder::Zstd)
                .map_err(|e| ArchiveError::compression(format!("zstd encoder: {}", e))),
        }
    }

    /// Flush the compressor trailer and hand back the inner writer
    fn finish(self) -> ArchiveResult<W> {
        match self {
            Encoder::Gzip(encoder) => encoder
                .finish()
                .map_err(|e| ArchiveError::compression(format!("gzip finish: {}", e))),
            Encoder::Zstd(encoder) => encoder
                .finish()
                .map_err(|e| ArchiveError::compression(format!("zstd finish: {}", e))),
        }
    }
}

impl<W: Write> Write for Encoder<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Encoder::Gzip(encoder) => encoder.write(buf),
            Encoder::Zstd(encoder) => encoder.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Encoder::Gzip(encoder) => encoder.flush(),
            Encoder::Zstd(encoder) => encoder.flush(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::path::PathBuf;
    use tempfile::{tempdir, TempDir};
    use zkarchive_core::{file_name_for, Zxid, LOG_PREFIX, SNAPSHOT_PREFIX};

    fn make_file(dir: &Path, kind: FileKind, zxid: Zxid, contents: &[u8]) -> PersistedFile {
        let path = dir.join(file_name_for(kind.prefix(), zxid));
        fs::write(&path, contents).unwrap();
        PersistedFile::from_path(path, kind).unwrap()
    }

    fn make_test_files() -> (TempDir, Vec<PersistedFile>, Vec<PersistedFile>) {
        let dir = tempdir().unwrap();
        let snapshots = vec![make_file(dir.path(), FileKind::Snapshot, 0x10, b"snapshot body")];
        let logs = vec![
            make_file(dir.path(), FileKind::Log, 0xa, b"first log"),
            make_file(dir.path(), FileKind::Log, 0xb, b"second log"),
        ];
        (dir, snapshots, logs)
    }

    fn read_gzip_entries(data: &[u8]) -> Vec<(String, Vec<u8>)> {
        read_tar_entries(GzDecoder::new(data))
    }

    fn read_tar_entries<R: Read>(reader: R) -> Vec<(String, Vec<u8>)> {
        let mut archive = tar::Archive::new(reader);
        archive
            .entries()
            .unwrap()
            .map(|entry| {
                let mut entry = entry.unwrap();
                let name = entry.path().unwrap().to_string_lossy().to_string();
                let mut data = Vec::new();
                entry.read_to_end(&mut data).unwrap();
                (name, data)
            })
            .collect()
    }

    #[test]
    fn test_entry_order_and_contents() {
        let (_dir, snapshots, logs) = make_test_files();
        let writer = ArchiveWriter::with_defaults();

        let data = writer.write_to_vec(&snapshots, &logs).unwrap();
        let entries = read_gzip_entries(&data);

        assert_eq!(
            entries,
            vec![
                ("snapshot.10".to_string(), b"snapshot body".to_vec()),
                ("log.a".to_string(), b"first log".to_vec()),
                ("log.b".to_string(), b"second log".to_vec()),
            ]
        );
    }

    #[test]
    fn test_write_to_file() {
        let (_dir, snapshots, logs) = make_test_files();
        let out = tempdir().unwrap();
        let writer = ArchiveWriter::with_defaults();

        let info = writer.write(&snapshots, &logs, out.path()).unwrap();

        assert_eq!(info.path, out.path().join("data.tar.gz"));
        assert_eq!(info.entry_count, 3);
        assert_eq!(info.snapshot_count, 1);
        assert_eq!(info.log_count, 2);
        assert_eq!(info.uncompressed_bytes, 13 + 9 + 10);
        assert_eq!(info.archive_size_bytes, fs::metadata(&info.path).unwrap().len());

        let entries = read_gzip_entries(&fs::read(&info.path).unwrap());
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].0, "snapshot.10");
    }

    #[test]
    fn test_temp_file_removed_after_write() {
        let (_dir, snapshots, logs) = make_test_files();
        let out = tempdir().unwrap();

        ArchiveWriter::with_defaults()
            .write(&snapshots, &logs, out.path())
            .unwrap();

        assert!(!out.path().join("data.tar.gz.tmp").exists());
    }

    #[test]
    fn test_creates_output_directory() {
        let (_dir, snapshots, logs) = make_test_files();
        let out = tempdir().unwrap();
        let nested = out.path().join("backups").join("zk");

        let info = ArchiveWriter::with_defaults()
            .write(&snapshots, &logs, &nested)
            .unwrap();

        assert_eq!(info.path, nested.join("data.tar.gz"));
        assert!(info.path.exists());
    }

    #[test]
    fn test_overwrites_previous_archive() {
        let (_dir, snapshots, logs) = make_test_files();
        let out = tempdir().unwrap();
        fs::write(out.path().join("data.tar.gz"), b"stale archive").unwrap();

        let info = ArchiveWriter::with_defaults()
            .write(&snapshots, &logs[..1], out.path())
            .unwrap();

        let entries = read_gzip_entries(&fs::read(&info.path).unwrap());
        let names: Vec<&str> = entries.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["snapshot.10", "log.a"]);
    }

    #[test]
    fn test_missing_source_fails_without_archive() {
        let (dir, snapshots, mut logs) = make_test_files();
        let out = tempdir().unwrap();
        logs.push(
            PersistedFile::from_path(dir.path().join("log.ff"), FileKind::Log).unwrap(),
        );

        let result = ArchiveWriter::with_defaults().write(&snapshots, &logs, out.path());

        match result {
            Err(ArchiveError::SourceUnreadable { path, .. }) => {
                assert_eq!(path, dir.path().join("log.ff"));
            }
            other => panic!("expected SourceUnreadable, got {:?}", other),
        }
        assert!(!out.path().join("data.tar.gz").exists());
        assert!(!out.path().join("data.tar.gz.tmp").exists());
    }

    #[test]
    fn test_failed_write_keeps_previous_archive() {
        let (dir, snapshots, _) = make_test_files();
        let out = tempdir().unwrap();
        fs::write(out.path().join("data.tar.gz"), b"previous").unwrap();
        let missing =
            vec![PersistedFile::from_path(dir.path().join("log.ff"), FileKind::Log).unwrap()];

        let result = ArchiveWriter::with_defaults().write(&snapshots, &missing, out.path());

        assert!(result.is_err());
        assert_eq!(fs::read(out.path().join("data.tar.gz")).unwrap(), b"previous");
    }

    #[test]
    fn test_long_entry_name() {
        let dir = tempdir().unwrap();
        let name = format!("{}.{}1", LOG_PREFIX, "0".repeat(150));
        let path: PathBuf = dir.path().join(&name);
        fs::write(&path, b"padded").unwrap();
        let log = PersistedFile::from_path(path, FileKind::Log).unwrap();

        let data = ArchiveWriter::with_defaults()
            .write_to_vec(&[], &[log])
            .unwrap();
        let entries = read_gzip_entries(&data);

        assert_eq!(entries, vec![(name, b"padded".to_vec())]);
    }

    #[test]
    fn test_zstd_archive() {
        let (_dir, snapshots, logs) = make_test_files();
        let out = tempdir().unwrap();
        let writer =
            ArchiveWriter::new(&ArchiveOptions::default().with_compression(Compression::zstd()));

        let info = writer.write(&snapshots, &logs, out.path()).unwrap();

        assert_eq!(info.path, out.path().join("data.tar.zst"));
        let data = fs::read(&info.path).unwrap();
        let entries = read_tar_entries(zstd::Decoder::new(&data[..]).unwrap());
        let names: Vec<&str> = entries.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["snapshot.10", "log.a", "log.b"]);
    }

    #[test]
    fn test_entry_keeps_file_mode_and_size() {
        let dir = tempdir().unwrap();
        let snapshot = make_file(dir.path(), FileKind::Snapshot, 1, &[7u8; 2048]);

        let data = ArchiveWriter::with_defaults()
            .write_to_vec(&[snapshot], &[])
            .unwrap();

        let mut archive = tar::Archive::new(GzDecoder::new(&data[..]));
        let entry = archive.entries().unwrap().next().unwrap().unwrap();
        assert_eq!(entry.header().size().unwrap(), 2048);
        assert_eq!(
            entry.path().unwrap().to_string_lossy(),
            file_name_for(SNAPSHOT_PREFIX, 1)
        );
        assert!(entry.header().entry_type().is_file());
    }

    #[test]
    fn test_compression_reduces_size() {
        let dir = tempdir().unwrap();
        let snapshot = make_file(dir.path(), FileKind::Snapshot, 1, &"zxid".repeat(10_000).into_bytes());

        let data = ArchiveWriter::with_defaults()
            .write_to_vec(&[snapshot], &[])
            .unwrap();

        assert!(data.len() < 40_000);
    }
}
