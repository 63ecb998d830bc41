//! Sources of identifiers.

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use rand::{distributions::Alphanumeric, rngs::StdRng, Rng, SeedableRng};
use tracing::{debug, warn};

/// Length of generated identifiers.
pub const SYNTHETIC_ID_LEN: usize = 16;

/// Reads one identifier per line from `path`.
pub fn read_ids(path: &Path) -> io::Result<Vec<String>> {
    let ids = parse_ids(BufReader::new(File::open(path)?))?;
    debug!(path = %path.display(), count = ids.len(), "read identifiers");
    Ok(ids)
}

/// Reads one identifier per line.
///
/// A trailing `\r` is stripped and blank lines are skipped.
pub fn parse_ids(reader: impl BufRead) -> io::Result<Vec<String>> {
    let mut ids = Vec::new();
    let mut num_blank = 0_usize;
    for line in reader.lines() {
        let mut line = line?;
        if line.ends_with('\r') {
            line.pop();
        }
        if line.is_empty() {
            num_blank += 1;
        } else {
            ids.push(line);
        }
    }
    if num_blank > 0 {
        warn!(num_blank, "skipped blank lines");
    }
    Ok(ids)
}

/// Generates `count` random alphanumeric identifiers. The same seed always
/// gives the same identifiers.
pub fn synthetic_ids(count: usize, seed: u64) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            (&mut rng)
                .sample_iter(Alphanumeric)
                .take(SYNTHETIC_ID_LEN)
                .map(char::from)
                .collect()
        })
        .collect()
}
