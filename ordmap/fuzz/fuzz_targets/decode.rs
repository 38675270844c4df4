#![no_main]
use libfuzzer_sys::fuzz_target;

use ordmap::OrderedMap;

fuzz_target!(|input: &[u8]| {
    if let Ok(map) = ordmap_bencode::from_bytes::<OrderedMap<Vec<u8>, i64>>(input) {
        assert!(map.check_invariants().is_ok());
    }
    if let Ok(map) = ordmap_bencode::from_bytes::<OrderedMap<u32, i64>>(input) {
        assert!(map.check_invariants().is_ok());
    }
});
