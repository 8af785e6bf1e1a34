//! Egui UI helpers for outfit editing.
//!
//! Provides a reusable variant picker over a [`Wardrobe`], allowing any
//! application with `bevy_egui` to embed outfit controls.

use bevy_egui::egui;

use crate::plugin::ChangePart;
use crate::wardrobe::Wardrobe;

/// Renders one collapsible section per category, with a selectable label for
/// each variant. Categories without parts are omitted.
///
/// Returns the swap the user clicked, if any. Write it as a [`ChangePart`]
/// message, or pass it to [`Wardrobe::change_part`] directly.
pub fn wardrobe_picker(ui: &mut egui::Ui, wardrobe: &Wardrobe) -> Option<ChangePart> {
    let mut requested = None;

    for entry in wardrobe.categories() {
        if entry.variants.is_empty() {
            continue;
        }
        let current = entry.current.as_deref();

        egui::CollapsingHeader::new(entry.name.as_str())
            .id_salt(format!("wardrobe_{}", entry.name))
            .default_open(true)
            .show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    for (code, variant) in &entry.variants {
                        let selected = current == Some(code.as_str());
                        let clicked = ui
                            .selectable_label(selected, variant.name.as_str())
                            .clicked();
                        if clicked && !selected {
                            requested = Some(ChangePart::new(entry.name.clone(), code.clone()));
                        }
                    }
                });
            });
    }

    requested
}
