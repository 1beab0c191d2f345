//! Host memory information.

use sysinfo::System;

/// Total physical memory of the host in bytes.
#[must_use]
pub fn physical_mem() -> u64 {
    let mut sys = System::new();
    sys.refresh_memory();
    sys.total_memory()
}
