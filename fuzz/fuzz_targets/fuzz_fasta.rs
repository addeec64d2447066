#![no_main]

use libfuzzer_sys::fuzz_target;
use mumtree::seq::{parse_fasta, MultiSeq};

fuzz_target!(|data: &[u8]| {
    let Ok(records) = parse_fasta(data) else {
        return;
    };
    let multi = MultiSeq::from_records(&records);
    for (i, record) in multi.records().iter().enumerate() {
        if record.len > 0 {
            assert_eq!(multi.locate(record.start), Some((i, 0)));
            assert_eq!(multi.locate(record.start + record.len - 1), Some((i, record.len - 1)));
        }
    }
});
