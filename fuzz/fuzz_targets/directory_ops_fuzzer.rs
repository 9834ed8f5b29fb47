//! Fuzz target for directory operation sequences
//!
//! # Strategy
//!
//! Arbitrary sequences of account, friendship, message and reset operations
//! applied to both the engine and the reference model.
//!
//! # Invariants
//!
//! - Engine and model agree on every result
//! - Standard directory invariants hold after every operation
//! - Final observable states match

#![no_main]

use kinship_core::Directory;
use kinship_harness::{InvariantRegistry, ModelWorld, ObservableState, Operation, SystemSnapshot};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|ops: Vec<Operation>| {
    let registry = InvariantRegistry::standard();
    let mut model = ModelWorld::new();
    let mut real = Directory::new();

    for (i, op) in ops.iter().enumerate() {
        let expected = model.apply(op);
        let actual = op.apply_to(&mut real);
        assert_eq!(expected, actual, "divergence at operation {i}: {op:?}");

        registry.assert_all(&SystemSnapshot::from_directory(&real), &format!("after {op:?}"));
    }

    assert_eq!(model.observable_state(), ObservableState::from_directory(&real));
});
