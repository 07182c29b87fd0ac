#![no_main]

use crmdeck_core::config::EngineConfig;
use crmdeck_core::geometry::{Point, Size};
use crmdeck_layout::{COMPONENT_CATALOG, TemplateDocument};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // First byte picks the history capacity (1..=32); the rest is an op stream
    // of 5-byte records: opcode, two coordinate bytes, two selector bytes.
    let Some((&cap, ops)) = data.split_first() else {
        return;
    };
    let config = EngineConfig {
        history_capacity: usize::from(cap % 32) + 1,
        ..EngineConfig::default()
    };
    let page = config.page.size;
    let mut doc = TemplateDocument::new("fuzz", &config);

    for op in ops.chunks_exact(5) {
        let pointer = Point::new(i32::from(op[1]) * 4 - 100, i32::from(op[2]) * 5 - 100);
        let pick = usize::from(op[3]);
        let id = (!doc.components().is_empty())
            .then(|| doc.components()[pick % doc.components().len()].id.clone());

        match op[0] % 12 {
            0 | 1 => {
                let kind = COMPONENT_CATALOG[pick % COMPONENT_CATALOG.len()].clone();
                let total = doc.total_pages();
                let target = u32::from(op[4]) % (total + 1) + 1;
                let result = doc.drop_component(kind, pointer, target);
                assert_eq!(result.is_ok(), target <= total);
            }
            2 => {
                if let Some(id) = id {
                    let _ = doc.begin_move(&id, Point::new(0, 0));
                }
            }
            3 => {
                if let Some(id) = id {
                    let _ = doc.begin_resize(&id, Point::new(0, 0));
                }
            }
            4 => {
                doc.update_gesture(pointer);
            }
            5 => {
                doc.end_gesture();
            }
            6 => {
                doc.cancel_gesture();
            }
            7 => {
                if let Some(id) = id {
                    let _ = doc.delete(&id);
                }
            }
            8 => {
                doc.undo();
            }
            9 => {
                doc.redo();
            }
            10 => {
                if op[4] % 2 == 0 {
                    doc.add_page();
                } else {
                    doc.remove_last_page();
                }
            }
            _ => {
                if let Some(id) = id {
                    let size = Size::new(i32::from(op[1]) + 1, i32::from(op[2]) + 1);
                    let _ = doc.set_size(&id, size);
                }
            }
        }

        let history = doc.history();
        assert!(history.len() <= history.capacity(), "history over capacity");
        assert!(history.cursor() < history.len(), "history cursor out of range");

        let total = doc.total_pages();
        for component in doc.components() {
            assert!(component.page >= 1 && component.page <= total, "component off document");
            assert!(component.width > 0 && component.height > 0, "degenerate component");
            if doc.active_gesture().is_none() {
                assert!(component.x >= 0 && component.x < page.width, "component x off page");
            }
        }
        if let Some(selected) = doc.selected() {
            assert!(doc.component(selected).is_some(), "selection dangles");
        }
    }

    let json = doc.to_json().expect("serialize template");
    let reloaded = TemplateDocument::from_json(&json, &config).expect("reload template");
    assert_eq!(reloaded.components(), doc.components());
});
