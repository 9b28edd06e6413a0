// Shared test helpers: a fake /proc tree in a temp dir

#![allow(dead_code)]

use atrium_agent::stats_repo::ProcFs;
use std::path::Path;
use tempfile::TempDir;

pub const STAT: &str = "cpu  4705 356 584 3699176 23060 0 277 0 0 0\ncpu0 1393 280 290 1633214 9392 0 109 0 0 0\nintr 114930548 113199788 3 0 5 263 0 4 [...]\n";

pub const MEMINFO: &str = "\
MemTotal:        1000 kB
MemFree:          100 kB
MemAvailable:     400 kB
Buffers:           10 kB
";

pub const UPTIME: &str = "90061.00 350000.12\n";

pub const LOADAVG: &str = "0.52 0.58 0.59 1/467 12345\n";

const NET_DEV_HEADER: &str = "\
Inter-|   Receive                                                |  Transmit
 face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed
";

/// /proc/net/dev listing `names` in order; interface i receives (i+1) MiB and sends 2*(i+1) MiB.
pub fn net_dev(names: &[&str]) -> String {
    let mut out = NET_DEV_HEADER.to_string();
    for (i, name) in names.iter().enumerate() {
        let rx = (i as u64 + 1) * 1_048_576;
        let tx = rx * 2;
        out.push_str(&format!(
            "{:>6}: {} 10 0 0 0 0 0 0 {} 20 0 0 0 0 0 0\n",
            name, rx, tx
        ));
    }
    out
}

pub struct FakeProc {
    pub dir: TempDir,
}

impl FakeProc {
    /// Empty tree: every read fails.
    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    /// Tree with plausible content for every source.
    pub fn populated() -> Self {
        let fake = Self::empty();
        fake.write("stat", STAT);
        fake.write("meminfo", MEMINFO);
        fake.write("net/dev", &net_dev(&["lo", "eth0", "eth1", "eth2", "eth3", "eth4"]));
        fake.write("uptime", UPTIME);
        fake.write("loadavg", LOADAVG);
        fake
    }

    pub fn write(&self, file: &str, content: &str) {
        let path = self.dir.path().join(file);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn proc_fs(&self) -> ProcFs {
        ProcFs::new(self.dir.path())
    }
}
