#![no_main]

use libfuzzer_sys::fuzz_target;
use runtime_log::history::{load, merge, serialize, RunMeasurements};
use std::num::NonZeroUsize;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes either load or are rejected; this must never panic
    if let Ok(table) = load(data) {
        // Anything that loads must still reload after a merge
        let max = NonZeroUsize::new(table.width().max(1)).unwrap();
        let merged = merge(&table, &RunMeasurements::new(), max);
        let reloaded = load(&serialize(&merged)).expect("serialized history must reload");
        assert_eq!(reloaded, merged);
    }
});
