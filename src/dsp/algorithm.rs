use crate::{NUM_ALGORITHMS, NUM_OPERATORS};

/// One FM routing topology: which operators modulate which, and which
/// contribute to the audible output.
///
/// Definitions are pure data, shared by reference across every voice. The
/// voice-processing loop iterates them generically, so adding a topology
/// means adding a table entry, not code.
pub struct AlgorithmDef {
    /// Per-operator list of modulator source indices. Self-modulation is
    /// expressed through the operator's own feedback path, never here.
    pub modulators: [&'static [usize]; NUM_OPERATORS],
    /// Operators whose output is summed into the voice signal.
    pub carriers: [bool; NUM_OPERATORS],
    /// Evaluation order. Every operator's modulators appear earlier in the
    /// order, so a consumer always reads same-sample source outputs.
    pub order: [usize; NUM_OPERATORS],
}

impl AlgorithmDef {
    pub fn carrier_count(&self) -> usize {
        self.carriers.iter().filter(|&&c| c).count()
    }
}

/// The eight topologies, from the fully serial chain to the fully parallel
/// organ-style bank:
///
/// 0: 1>2>3>4>5>6             carrier 6
/// 1: (1+2)>3>4>5>6           carrier 6
/// 2: 1>(2+3+4+5+6)           carriers 2..6
/// 3: (1+2+3+4)>5>6           carrier 6
/// 4: 1>2, 3>4, 5>6           carriers 2, 4, 6
/// 5: (1+2+3)>(4+5+6)         carriers 4, 5, 6
/// 6: 1>2>3, 4>5>6            carriers 3, 6
/// 7: all parallel            all carriers
pub static ALGORITHMS: [AlgorithmDef; NUM_ALGORITHMS] = [
    AlgorithmDef {
        modulators: [&[], &[0], &[1], &[2], &[3], &[4]],
        carriers: [false, false, false, false, false, true],
        order: [0, 1, 2, 3, 4, 5],
    },
    AlgorithmDef {
        modulators: [&[], &[], &[0, 1], &[2], &[3], &[4]],
        carriers: [false, false, false, false, false, true],
        order: [0, 1, 2, 3, 4, 5],
    },
    AlgorithmDef {
        modulators: [&[], &[0], &[0], &[0], &[0], &[0]],
        carriers: [false, true, true, true, true, true],
        order: [0, 1, 2, 3, 4, 5],
    },
    AlgorithmDef {
        modulators: [&[], &[], &[], &[], &[0, 1, 2, 3], &[4]],
        carriers: [false, false, false, false, false, true],
        order: [0, 1, 2, 3, 4, 5],
    },
    AlgorithmDef {
        modulators: [&[], &[0], &[], &[2], &[], &[4]],
        carriers: [false, true, false, true, false, true],
        order: [0, 1, 2, 3, 4, 5],
    },
    AlgorithmDef {
        modulators: [&[], &[], &[], &[0, 1, 2], &[0, 1, 2], &[0, 1, 2]],
        carriers: [false, false, false, true, true, true],
        order: [0, 1, 2, 3, 4, 5],
    },
    AlgorithmDef {
        modulators: [&[], &[0], &[1], &[], &[3], &[4]],
        carriers: [false, false, true, false, false, true],
        order: [0, 1, 2, 3, 4, 5],
    },
    AlgorithmDef {
        modulators: [&[], &[], &[], &[], &[], &[]],
        carriers: [true, true, true, true, true, true],
        order: [0, 1, 2, 3, 4, 5],
    },
];

/// Resolve an algorithm index, falling back to the serial chain for anything
/// out of range. Keeping this total avoids an error path in the callback.
#[inline]
pub fn algorithm(index: usize) -> &'static AlgorithmDef {
    ALGORITHMS.get(index).unwrap_or(&ALGORITHMS[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_order_is_a_permutation() {
        for (i, def) in ALGORITHMS.iter().enumerate() {
            let mut seen = [false; NUM_OPERATORS];
            for &op in &def.order {
                assert!(op < NUM_OPERATORS, "algorithm {i}: order index {op}");
                assert!(!seen[op], "algorithm {i}: duplicate order entry {op}");
                seen[op] = true;
            }
        }
    }

    #[test]
    fn modulators_are_evaluated_before_consumers() {
        for (i, def) in ALGORITHMS.iter().enumerate() {
            let position = |op: usize| def.order.iter().position(|&o| o == op).unwrap();
            for op in 0..NUM_OPERATORS {
                for &source in def.modulators[op] {
                    assert!(source < NUM_OPERATORS);
                    assert_ne!(source, op, "algorithm {i}: self-modulation in table");
                    assert!(
                        position(source) < position(op),
                        "algorithm {i}: operator {op} consumes {source} before it runs"
                    );
                }
            }
        }
    }

    #[test]
    fn every_algorithm_has_a_carrier() {
        for (i, def) in ALGORITHMS.iter().enumerate() {
            assert!(def.carrier_count() >= 1, "algorithm {i} is inaudible");
        }
    }

    #[test]
    fn serial_chain_shape() {
        let def = &ALGORITHMS[0];
        assert!(def.modulators[0].is_empty());
        for op in 1..NUM_OPERATORS {
            assert_eq!(def.modulators[op], &[op - 1]);
        }
        assert_eq!(def.carrier_count(), 1);
        assert!(def.carriers[5]);
    }

    #[test]
    fn parallel_bank_has_no_modulation() {
        let def = &ALGORITHMS[7];
        assert!(def.modulators.iter().all(|m| m.is_empty()));
        assert_eq!(def.carrier_count(), NUM_OPERATORS);
    }

    #[test]
    fn out_of_range_index_falls_back_to_serial() {
        let fallback = algorithm(NUM_ALGORITHMS + 10);
        assert!(std::ptr::eq(fallback, &ALGORITHMS[0]));
    }
}
