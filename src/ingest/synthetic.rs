use std::io::Write;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::ids::ExternalId;
use crate::ingest::edge_list::Edge;

pub struct SyntheticConfig {
    pub node_count: u64,
    pub edge_count: u64,
    pub seed: u64,
}

/// Uniform random edges over `0..node_count`, no self loops.
///
/// Fewer than two nodes admit no such edge, so the stream is then empty.
pub fn generate(cfg: &SyntheticConfig) -> impl Iterator<Item = Edge> {
    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let node_count = cfg.node_count;
    let edge_count = if node_count < 2 { 0 } else { cfg.edge_count };

    (0..edge_count).map(move |_| {
        let src: ExternalId = rng.random_range(0..node_count);
        let mut dst: ExternalId = rng.random_range(0..node_count);
        if dst == src {
            dst = (dst + 1) % node_count;
        }
        (src, dst)
    })
}

/// Writes edges as a whitespace edge list, one `u v` per line.
pub fn write_edge_list<W: Write>(
    mut out: W,
    edges: impl IntoIterator<Item = Edge>,
) -> std::io::Result<u64> {
    let mut written = 0;
    for (src, dst) in edges {
        writeln!(out, "{src} {dst}")?;
        written += 1;
    }
    out.flush()?;
    Ok(written)
}
