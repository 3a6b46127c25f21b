/// Number of bits the perturbation value is shifted right on every step.
pub const PERTURB_SHIFT: u32 = 5;

/// The perturbation-based probe sequence over a power-of-two index table.
///
/// Starting from `j = perturb = hash`, each step yields `j & mask` and then
/// advances with `perturb >>= 5; j = 5 * j + 1 + perturb`. The upper hash
/// bits are folded into the slot choice over the first few steps, which
/// avoids the low-bit clustering of plain linear or quadratic probing. Once
/// `perturb` reaches zero the recurrence is a full-period linear
/// congruential generator modulo the table size, so every slot is
/// eventually visited.
///
/// The iterator never ends; callers stop at the slot they are looking for.
///
/// # Examples
///
/// ```rust
/// use compact_dict::probe::ProbeSeq;
///
/// let slots: Vec<usize> = ProbeSeq::new(0, 7).take(8).collect();
/// assert_eq!(slots, [0, 1, 6, 7, 4, 5, 2, 3]);
/// ```
#[derive(Clone, Debug)]
pub struct ProbeSeq {
    perturb: u64,
    j: u64,
    mask: usize,
}

impl ProbeSeq {
    /// Creates the probe sequence for `hash` over a table with `mask + 1`
    /// slots.
    #[inline]
    pub fn new(hash: u64, mask: usize) -> Self {
        debug_assert!(mask.wrapping_add(1).is_power_of_two());
        Self {
            perturb: hash,
            j: hash,
            mask,
        }
    }

    /// Returns the next slot in the sequence.
    #[inline(always)]
    pub fn next_slot(&mut self) -> usize {
        let slot = self.j as usize & self.mask;
        self.perturb >>= PERTURB_SHIFT;
        self.j = self
            .j
            .wrapping_mul(5)
            .wrapping_add(1)
            .wrapping_add(self.perturb);
        slot
    }
}

impl Iterator for ProbeSeq {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_slot())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}
