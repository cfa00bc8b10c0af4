#![allow(dead_code)]

#[derive(arbitrary::Arbitrary)]
pub struct FuzzInput<P> {
    pub data: Vec<u32>,
    pub params: P,
}

impl<P: std::fmt::Debug> std::fmt::Debug for FuzzInput<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FuzzInput")
            .field("params", &self.params)
            .field("data", &HexSlice(&self.data))
            .finish()
    }
}

/// How a packing round trip chooses its parameters.
#[derive(arbitrary::Arbitrary, Clone, Copy, PartialEq, Eq, Debug)]
pub enum Packing {
    /// Plain packing at `num_bits`
    PackedInts { num_bits: u8 },
    /// FFOR against a caller-chosen reference
    Ffor { min_val: u32, num_bits: u8 },
    /// FFOR with the reference and width derived from the column
    FforBest,
}

pub struct HexSlice<'a>(pub &'a [u32]);

impl std::fmt::Debug for HexSlice<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const MAX: usize = 20;

        let total = self.0.len();
        let shown = total.min(MAX);

        let mut list = f.debug_list();

        for v in &self.0[..shown] {
            list.entry(&format_args!("{v:#010x}"));
        }

        if total > MAX {
            list.entry(&format_args!(".. out of {total} total"));
        }

        list.finish()
    }
}
