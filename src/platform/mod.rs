// Platform data acquisition: procfs, sysfs, statvfs and sysinfo

pub mod file_scanner;
pub mod hwmon;
pub mod mounts;
pub mod netdev;
pub mod pressure;
pub mod system;

// Re-exports for cleaner imports
pub use file_scanner::{FileKind, FileScanner, ScanEntry};
pub use hwmon::{Device, DeviceError, DeviceResult, HwmonReader, Sensor, SensorKind};
pub use mounts::{Mount, Usage};
pub use netdev::{Interface, NetReader, OperState};
pub use pressure::{Pressure, PressureError, PressureReader, Resource};
pub use system::{LoadStats, MemoryStats};
