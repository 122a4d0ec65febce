//! Directory walker used by the files check.
//!
//! # Examples
//!
//! ```no_run
//! use sysbasics::platform::file_scanner::FileScanner;
//! use std::path::Path;
//!
//! let scanner = FileScanner::new(Path::new("/var/spool/mail"))?.recursive(true);
//! let report = scanner.scan();
//!
//! for entry in report.entries {
//!     println!("{}: {} bytes", entry.name, entry.size);
//! }
//! # Ok::<(), sysbasics::CheckError>(())
//! ```

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use clap::ValueEnum;
use ignore::WalkBuilder;

use crate::error::{CheckError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FileKind {
    File,
    #[value(aliases = ["dir", "d"])]
    Directory,
    #[value(alias = "l")]
    Symlink,
    #[value(alias = "p")]
    Fifo,
    Socket,
    #[value(name = "block")]
    BlockDevice,
    #[value(name = "char")]
    CharDevice,
    /// Mode bit filters, matched independently of the entry type
    Sticky,
    Setuid,
    Setgid,
}

const MODE_SETUID: u32 = 0o4000;
const MODE_SETGID: u32 = 0o2000;
const MODE_STICKY: u32 = 0o1000;

impl FileKind {
    fn from_file_type(file_type: fs::FileType) -> Self {
        if file_type.is_symlink() {
            return FileKind::Symlink;
        }
        if file_type.is_dir() {
            return FileKind::Directory;
        }
        #[cfg(unix)]
        {
            use std::os::unix::fs::FileTypeExt;
            if file_type.is_fifo() {
                return FileKind::Fifo;
            }
            if file_type.is_socket() {
                return FileKind::Socket;
            }
            if file_type.is_block_device() {
                return FileKind::BlockDevice;
            }
            if file_type.is_char_device() {
                return FileKind::CharDevice;
            }
        }
        FileKind::File
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileKind::File => "file",
            FileKind::Directory => "directory",
            FileKind::Symlink => "symlink",
            FileKind::Fifo => "fifo",
            FileKind::Socket => "socket",
            FileKind::BlockDevice => "block",
            FileKind::CharDevice => "char",
            FileKind::Sticky => "sticky",
            FileKind::Setuid => "setuid",
            FileKind::Setgid => "setgid",
        };
        f.write_str(name)
    }
}

/// Entry from a directory walk
#[derive(Debug, Clone)]
pub struct ScanEntry {
    pub name: String,
    pub path: PathBuf,
    pub kind: FileKind,
    pub size: u64,
    pub modified: SystemTime,
    /// Permission bits including setuid, setgid and sticky; 0 off unix
    pub mode: u32,
}

impl ScanEntry {
    /// True when the entry is of the given type or carries the given mode bit
    pub fn is(&self, kind: FileKind) -> bool {
        match kind {
            FileKind::Sticky => self.mode & MODE_STICKY != 0,
            FileKind::Setuid => self.mode & MODE_SETUID != 0,
            FileKind::Setgid => self.mode & MODE_SETGID != 0,
            other => self.kind == other,
        }
    }
}

#[cfg(unix)]
fn mode_bits(metadata: &fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn mode_bits(_metadata: &fs::Metadata) -> u32 {
    0
}

/// Entries found plus the ones that could not be read
#[derive(Debug, Default)]
pub struct ScanReport {
    pub entries: Vec<ScanEntry>,
    pub errors: Vec<String>,
}

pub struct FileScanner {
    path: PathBuf,
    recursive: bool,
}

impl FileScanner {
    pub fn new(path: &Path) -> Result<Self> {
        log::debug!("Creating FileScanner for path: {:?}", path);

        let metadata = fs::metadata(path).map_err(|e| {
            CheckError::metric_collection(format!("could not access {}: {}", path.display(), e))
        })?;
        if !metadata.is_dir() {
            return Err(CheckError::metric_collection(format!(
                "{} is not a directory",
                path.display()
            )));
        }

        Ok(Self {
            path: path.to_path_buf(),
            recursive: false,
        })
    }

    /// Descend into subdirectories instead of looking at direct children only
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Walk the directory; symlinks are reported, never followed
    pub fn scan(&self) -> ScanReport {
        let walker = WalkBuilder::new(&self.path)
            .standard_filters(false)
            .follow_links(false)
            .max_depth(if self.recursive { None } else { Some(1) })
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        let mut report = ScanReport::default();
        for result in walker {
            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Skipping unreadable entry below {}: {}", self.path.display(), e);
                    report.errors.push(e.to_string());
                    continue;
                }
            };
            if entry.depth() == 0 {
                continue;
            }

            match entry.metadata() {
                Ok(metadata) => {
                    let kind = FileKind::from_file_type(metadata.file_type());
                    report.entries.push(ScanEntry {
                        name: entry.file_name().to_string_lossy().into_owned(),
                        path: entry.path().to_path_buf(),
                        kind,
                        size: if kind == FileKind::Directory { 0 } else { metadata.len() },
                        modified: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
                        mode: mode_bits(&metadata),
                    });
                }
                Err(e) => {
                    log::warn!("Skipping {}: {}", entry.path().display(), e);
                    report.errors.push(e.to_string());
                }
            }
        }

        log::debug!(
            "Scanned {}: {} entries, {} errors",
            self.path.display(),
            report.entries.len(),
            report.errors.len()
        );
        report
    }
}
