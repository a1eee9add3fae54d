use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Named random streams for procedural content.
///
/// All streams share the ChaCha key expanded from one seed and differ only
/// in their stream id, which is the FNV-1a hash of the stream name. A given
/// seed and name give the same numbers on every platform and toolchain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedStreams {
    seed: u64,
}

impl SeedStreams {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn stream(&self, name: &str) -> ChaCha8Rng {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        rng.set_stream(stream_id(name));
        rng
    }
}

fn stream_id(name: &str) -> u64 {
    name.bytes().fold(FNV_OFFSET, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
    })
}
