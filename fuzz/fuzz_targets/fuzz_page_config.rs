#![no_main]

use arbitrary::Unstructured;
use crmdeck_core::config::GridWrap;
use crmdeck_layout::{DashboardBoard, PageConfig};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Leading bytes choose the grid wrap and the move stream; whatever
    // remains is parsed as a page descriptor.
    let mut u = Unstructured::new(data);
    let Ok(per_row) = u.int_in_range(1u32..=12) else {
        return;
    };
    let Ok(moves) = u.arbitrary::<Vec<(u8, u8)>>() else {
        return;
    };
    let json = String::from_utf8_lossy(u.take_rest());
    let Ok(page) = PageConfig::from_json(&json) else {
        return;
    };

    let wrap = GridWrap {
        per_row,
        ..GridWrap::default()
    };
    let mut board = DashboardBoard::from_page(&page, wrap);
    let len = board.len();
    assert_eq!(len, page.widgets.len());

    for (from, to) in moves {
        let from = usize::from(from);
        let to = usize::from(to);
        let outcome = board.move_widget(from, to);
        assert_eq!(outcome.is_moved(), from < len && to < len && from != to);
    }

    let mut seeds: Vec<usize> = board.widgets().iter().map(|w| w.seed_id).collect();
    seeds.sort_unstable();
    assert_eq!(seeds, (0..len).collect::<Vec<_>>(), "widgets lost or duplicated");
    for (index, entry) in board.widgets().iter().enumerate() {
        assert_eq!(entry.index, index, "cached index drifted");
    }

    let saved = board.to_page();
    let json = serde_json::to_string(&saved).expect("serialize page");
    assert_eq!(PageConfig::from_json(&json).ok().as_ref(), Some(&saved));
});
