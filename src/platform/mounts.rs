//! Mounted filesystems and their usage.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{CheckError, Result};

pub const MOUNTS_PATH: &str = "/proc/self/mounts";

/// One line of the mount table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mount {
    pub device: String,
    pub mount_point: String,
    pub fs_type: String,
    pub options: Vec<String>,
}

/// Space and inode usage reported by `statvfs`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Usage {
    pub total: u64,
    pub free: u64,
    pub used: u64,
    pub inodes_total: u64,
    pub inodes_free: u64,
    pub inodes_used: u64,
}

impl Usage {
    /// Used space relative to what is usable by unprivileged users
    pub fn used_percent(&self) -> f64 {
        let usable = self.used + self.free;
        if usable == 0 {
            0.0
        } else {
            self.used as f64 / usable as f64 * 100.0
        }
    }

    pub fn free_percent(&self) -> f64 {
        100.0 - self.used_percent()
    }

    pub fn inodes_used_percent(&self) -> f64 {
        if self.inodes_total == 0 {
            0.0
        } else {
            self.inodes_used as f64 / self.inodes_total as f64 * 100.0
        }
    }

    pub fn inodes_free_percent(&self) -> f64 {
        if self.inodes_total == 0 {
            0.0
        } else {
            100.0 - self.inodes_used_percent()
        }
    }
}

pub fn read_mounts() -> Result<Vec<Mount>> {
    read_mounts_from(Path::new(MOUNTS_PATH))
}

pub fn read_mounts_from(path: &Path) -> Result<Vec<Mount>> {
    let content = fs::read_to_string(path).map_err(|e| {
        CheckError::metric_collection(format!("could not read {}: {}", path.display(), e))
    })?;
    let mounts = parse_mounts(&content);
    log::debug!("Detected {} mounts in {}", mounts.len(), path.display());
    Ok(mounts)
}

/// Parse the fstab-style mount table, skipping malformed lines
pub fn parse_mounts(content: &str) -> Vec<Mount> {
    content
        .lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let device = fields.next()?;
            let mount_point = fields.next()?;
            let fs_type = fields.next()?;
            let options = fields.next().unwrap_or_default();
            Some(Mount {
                device: unescape(device),
                mount_point: unescape(mount_point),
                fs_type: fs_type.to_string(),
                options: options
                    .split(',')
                    .filter(|o| !o.is_empty())
                    .map(str::to_string)
                    .collect(),
            })
        })
        .collect()
}

// The kernel writes space, tab, newline and backslash as \ooo octal escapes
fn unescape(field: &str) -> String {
    let bytes = field.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' && i + 3 < bytes.len() {
            let digits = &bytes[i + 1..i + 4];
            if digits.iter().all(|b| (b'0'..=b'7').contains(b)) {
                let code = digits.iter().fold(0u32, |acc, b| acc * 8 + u32::from(b - b'0'));
                if let Ok(code) = u8::try_from(code) {
                    out.push(code);
                    i += 4;
                    continue;
                }
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(unix)]
pub fn usage(path: &str) -> Result<Usage> {
    use std::ffi::CString;

    let c_path = CString::new(path)
        .map_err(|_| CheckError::metric_collection(format!("invalid mount path {:?}", path)))?;
    let mut stat: libc::statvfs = unsafe { std::mem::zeroed() };
    // SAFETY: c_path is a valid NUL-terminated string and stat is a writable statvfs
    let rc = unsafe { libc::statvfs(c_path.as_ptr(), &mut stat) };
    if rc != 0 {
        return Err(CheckError::Io(io::Error::last_os_error()));
    }

    let frsize = stat.f_frsize as u64;
    let blocks = stat.f_blocks as u64;
    let bfree = stat.f_bfree as u64;
    let bavail = stat.f_bavail as u64;
    let files = stat.f_files as u64;
    let ffree = stat.f_ffree as u64;

    Ok(Usage {
        total: blocks * frsize,
        free: bavail * frsize,
        used: blocks.saturating_sub(bfree) * frsize,
        inodes_total: files,
        inodes_free: ffree,
        inodes_used: files.saturating_sub(ffree),
    })
}

#[cfg(not(unix))]
pub fn usage(path: &str) -> Result<Usage> {
    Err(CheckError::Io(io::Error::new(
        io::ErrorKind::Unsupported,
        format!("statvfs is not available for {}", path),
    )))
}
