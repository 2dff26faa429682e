// Scripted random source for resolver and octave tests.
//
// Yields a fixed sequence of raw u64 values and panics when exhausted, so
// a test pins every random decision *and* asserts exactly how many draws
// the code under test consumes.

use rand::RngCore;

pub(crate) struct ScriptedRng {
    values: Vec<u64>,
    next: usize,
}

impl ScriptedRng {
    pub(crate) fn new(values: Vec<u64>) -> Self {
        ScriptedRng { values, next: 0 }
    }

    /// The raw value that makes a 127-range draw come out as `r`.
    ///
    /// The rejection threshold for range 127 is 2 (2^64 ≡ 2 mod 127), so
    /// r itself is a valid raw value for r >= 2, while 127 maps to 0 and
    /// 128 to 1.
    pub(crate) fn raw_for_chance(r: u64) -> u64 {
        if r < 2 { 127 + r } else { r }
    }
}

impl RngCore for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        self.next_u64() as u32
    }

    fn next_u64(&mut self) -> u64 {
        let Some(&v) = self.values.get(self.next) else {
            panic!("scripted rng exhausted after {} draws", self.next);
        };
        self.next += 1;
        v
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}
