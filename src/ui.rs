use egui::Context;

use crate::scene::Scene;

/// Draws the in-scene overlay: a crosshair at screen center and the debug
/// mode readout near the top-left. The attract screen stays blank.
pub fn draw_overlay(ctx: &Context, scene: &Scene) {
    if scene.is_attract {
        return;
    }
    draw_crosshair(ctx);
    draw_debug_text(ctx, scene);
}

fn draw_crosshair(ctx: &Context) {
    let painter = ctx.layer_painter(egui::LayerId::new(egui::Order::TOP, egui::Id::new("crosshair")));
    let center = ctx.available_rect().center();
    painter.text(
        center,
        egui::Align2::CENTER_CENTER,
        "+",
        egui::FontId::proportional(20.0),
        egui::Color32::WHITE,
    );
}

fn draw_debug_text(ctx: &Context, scene: &Scene) {
    let painter = ctx.layer_painter(egui::LayerId::new(egui::Order::TOP, egui::Id::new("debug_text")));
    let rect = ctx.available_rect();
    // 97% of the way up the screen, flush with the left edge.
    let pos = egui::Pos2::new(rect.left() + 4.0, rect.top() + rect.height() * (1.0 - 0.97));
    painter.text(
        pos,
        egui::Align2::LEFT_TOP,
        &scene.overlay_text,
        egui::FontId::monospace(12.0),
        egui::Color32::WHITE,
    );
}
