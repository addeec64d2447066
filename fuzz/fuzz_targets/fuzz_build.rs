#![no_main]

use libfuzzer_sys::fuzz_target;
use mumtree::stree::{SuffixTree, TreeConfig};

fuzz_target!(|data: &[u8]| {
    // First byte picks the chain limit, the rest is the text
    let Some((&limit, text)) = data.split_first() else {
        return;
    };
    let config = TreeConfig {
        max_chain: u32::from(limit % 8),
        ..TreeConfig::default()
    };
    let tree = SuffixTree::build_with(text, &config).unwrap();
    tree.verify().unwrap();
    assert_eq!(tree.leaves_below(tree.root()).len(), text.len() + 1);

    for start in (0..text.len()).step_by(7) {
        let pattern = &text[start..text.len().min(start + 16)];
        let (loc, rest) = tree.scan_prefix(tree.root(), pattern);
        assert_eq!(rest, None);
        assert_eq!(loc.matched_length(), pattern.len());
        if !loc.is_root() {
            assert_eq!(tree.link(&loc).matched_length() + 1, pattern.len());
        }
    }
});
