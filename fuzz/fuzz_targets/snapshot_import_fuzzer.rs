//! Fuzz target for directory snapshot import
//!
//! # Strategy
//!
//! - Random bytes: completely arbitrary input (general malformation)
//! - Mutated snapshot: a valid export with bytes flipped or truncated
//!
//! # Invariants
//!
//! - NEVER panic on malformed input
//! - Every rejection is a persistence error
//! - Anything accepted satisfies the standard directory invariants and
//!   re-exports to bytes that import to the same directory

#![no_main]

use arbitrary::Arbitrary;
use kinship_core::Directory;
use kinship_harness::{InvariantRegistry, Operation, SystemSnapshot};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Clone, Arbitrary)]
enum ImportInput {
    RandomBytes { bytes: Vec<u8> },
    Mutated { ops: Vec<Operation>, flips: Vec<(u16, u8)>, truncate: Option<u16> },
}

fn check(bytes: &[u8]) {
    match Directory::import(bytes) {
        Ok(directory) => {
            InvariantRegistry::standard()
                .assert_all(&SystemSnapshot::from_directory(&directory), "after import");

            let reexported = directory.export().expect("accepted directory must export");
            let again = Directory::import(&reexported).expect("re-export must import");
            assert_eq!(again, directory);
        },
        Err(err) => assert!(err.is_persistence(), "non-persistence import error: {err}"),
    }
}

fuzz_target!(|input: ImportInput| {
    match input {
        ImportInput::RandomBytes { bytes } => check(&bytes),
        ImportInput::Mutated { ops, flips, truncate } => {
            let mut directory = Directory::new();
            for op in ops.iter().take(64) {
                let _ = op.apply_to(&mut directory);
            }

            let Ok(mut bytes) = directory.export() else {
                return;
            };
            if bytes.is_empty() {
                return;
            }

            for (position, mask) in flips {
                let index = usize::from(position) % bytes.len();
                bytes[index] ^= mask;
            }
            if let Some(len) = truncate {
                bytes.truncate(usize::from(len) % (bytes.len() + 1));
            }

            check(&bytes);
        },
    }
});
