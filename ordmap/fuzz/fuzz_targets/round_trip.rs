#![no_main]
use libfuzzer_sys::fuzz_target;

use ordmap::OrderedMap;

fuzz_target!(|input: (OrderedMap<(i32, i32), i64>, OrderedMap<u16, i64>)| {
    let (pairs, fields) = input;

    let encoded = ordmap_bencode::to_bytes(&pairs).unwrap();
    let decoded: OrderedMap<(i32, i32), i64> = ordmap_bencode::from_bytes(&encoded).unwrap();
    assert_eq!(pairs, decoded);

    // Field names come back sorted, so only the pairing is compared.
    let encoded = ordmap_bencode::to_bytes(&fields).unwrap();
    let decoded: OrderedMap<u16, i64> = ordmap_bencode::from_bytes(&encoded).unwrap();
    assert_eq!(fields.len(), decoded.len());
    for (k, v) in &fields {
        assert_eq!(Some(v), decoded.get(k));
    }
});
