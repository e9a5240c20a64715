//! Property tests for the store's clamping and normalization invariants.

use proptest::prelude::*;
use teekit_core::Color;
use teekit_designer::{ElementPatch, ElementStore};

proptest! {
    #[test]
    fn rotation_always_lands_in_range(degrees in -100_000.0f32..100_000.0) {
        let mut store = ElementStore::new();
        let id = store.add_text("spin", Color::BLACK, 16.0);
        store.rotate(id, degrees);
        let rotation = store.get(id).unwrap().placement.rotation;
        prop_assert!((0.0..360.0).contains(&rotation), "rotation {rotation} out of range");
    }

    #[test]
    fn moves_always_respect_the_canvas(
        x in -2_000.0f32..2_000.0,
        y in -2_000.0f32..2_000.0,
        width in 1.0f32..500.0,
        height in 1.0f32..600.0,
    ) {
        let mut store = ElementStore::new();
        let id = store.add_text("clamped", Color::BLACK, 16.0);
        store.update(id, ElementPatch {
            width: Some(width),
            height: Some(height),
            ..Default::default()
        });
        store.move_to(id, x, y);

        let p = store.get(id).unwrap().placement;
        prop_assert!(p.x >= 0.0);
        prop_assert!(p.y >= 0.0);
        prop_assert!(p.x + p.width <= 500.0 + f32::EPSILON * 500.0);
        prop_assert!(p.y + p.height <= 600.0 + f32::EPSILON * 600.0);
    }
}
