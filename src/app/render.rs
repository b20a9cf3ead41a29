use eframe::egui::{
    self, Align2, Color32, Context, FontId, Id, Order, Painter, Pos2, Rect, RichText, Stroke, Ui,
    Vec2,
};

use crate::config::StyleConfig;
use crate::map::{LearningLevel, ResourceKind};

use super::camera::Camera;
use super::scene::{Scene, TooltipSpec};

const BACKGROUND: Color32 = Color32::from_rgb(15, 23, 42);
const GRID_LINE: Color32 = Color32::from_rgba_premultiplied(30, 41, 59, 90);

fn tooltip_links_id() -> Id {
    Id::new("map_tooltip_links")
}

pub(in crate::app) fn draw_background(painter: &Painter, rect: Rect, camera: Camera, show_grid: bool) {
    painter.rect_filled(rect, 0.0, BACKGROUND);
    if !show_grid {
        return;
    }

    let step = (56.0 * camera.zoom.clamp(0.6, 1.8)).max(20.0);
    let origin = rect.center() + camera.pan;
    let stroke = Stroke::new(1.0, GRID_LINE);

    let mut x = rect.left() + (origin.x - rect.left()).rem_euclid(step);
    while x < rect.right() {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        x += step;
    }

    let mut y = rect.top() + (origin.y - rect.top()).rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        y += step;
    }
}

fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

fn edge_visible(rect: Rect, start: Pos2, end: Pos2, padding: f32) -> bool {
    let min_x = start.x.min(end.x) - padding;
    let max_x = start.x.max(end.x) + padding;
    let min_y = start.y.min(end.y) - padding;
    let max_y = start.y.max(end.y) + padding;

    !(max_x < rect.left() || min_x > rect.right() || max_y < rect.top() || min_y > rect.bottom())
}

/// Paints links, nodes and labels. Opacity changes fade over `highlight_fade_ms`.
pub(in crate::app) fn paint_scene(
    ctx: &Context,
    painter: &Painter,
    rect: Rect,
    camera: Camera,
    scene: &Scene,
    style: &StyleConfig,
) {
    let fade = style.highlight_fade_ms as f32 / 1000.0;
    let zoom = camera.zoom;

    for link in &scene.links {
        let start = camera.world_to_screen(rect, link.from);
        let end = camera.world_to_screen(rect, link.to);
        let opacity = ctx.animate_value_with_time(Id::new(("map_link", link.index)), link.opacity, fade);
        if !edge_visible(rect, start, end, 2.0) {
            continue;
        }
        painter.line_segment(
            [start, end],
            Stroke::new(link.width * zoom, link.color.gamma_multiply(opacity)),
        );
    }

    for node in &scene.nodes {
        let center = camera.world_to_screen(rect, node.center);
        let node_id = Id::new(("map_node", node.index));
        let opacity = ctx.animate_value_with_time(node_id.with("opacity"), node.opacity, fade);
        let radius = ctx.animate_value_with_time(node_id.with("radius"), node.radius, fade) * zoom;
        if !circle_visible(rect, center, radius + node.outline_width * zoom) {
            continue;
        }

        painter.circle(
            center,
            radius,
            node.fill.gamma_multiply(opacity),
            Stroke::new(node.outline_width * zoom, node.outline.gamma_multiply(opacity)),
        );
        painter.text(
            center + node.label.offset * zoom,
            Align2::LEFT_BOTTOM,
            &node.label.text,
            FontId::proportional((node.label.size * zoom).max(1.0)),
            node.label.color.gamma_multiply(opacity),
        );
    }
}

fn level_color(level: LearningLevel) -> Color32 {
    match level {
        LearningLevel::Beginner => Color32::from_rgb(0x34, 0xd3, 0x99),
        LearningLevel::Intermediate => Color32::from_rgb(0xfb, 0xbf, 0x24),
        LearningLevel::Advanced => Color32::from_rgb(0xf8, 0x71, 0x71),
    }
}

fn resource_badge(kind: ResourceKind) -> RichText {
    let color = match kind {
        ResourceKind::Video => Color32::from_rgb(0xf8, 0x71, 0x71),
        ResourceKind::Website => Color32::from_rgb(0x60, 0xa5, 0xfa),
    };
    RichText::new(kind.label()).small().color(color)
}

/// Floating detail card next to the pointer.
///
/// The card only takes pointer input while the pointer sits over one of the
/// resource links drawn last frame, so hovering stays with the map below it.
pub(in crate::app) fn show_tooltip(ctx: &Context, tooltip: &TooltipSpec) {
    let link_rects = ctx
        .data(|data| data.get_temp::<Vec<Rect>>(tooltip_links_id()))
        .unwrap_or_default();
    let pointer = ctx.input(|input| input.pointer.hover_pos());
    let over_link = pointer.is_some_and(|pointer| link_rects.iter().any(|rect| rect.contains(pointer)));

    let mut drawn_links = Vec::with_capacity(tooltip.resources.len());
    egui::Area::new(Id::new("map_tooltip"))
        .order(Order::Tooltip)
        .fixed_pos(tooltip.anchor)
        .interactable(over_link)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.set_max_width(280.0);
                draw_tooltip_body(ui, tooltip, &mut drawn_links);
            });
        });

    ctx.data_mut(|data| data.insert_temp(tooltip_links_id(), drawn_links));
}

pub(in crate::app) fn clear_tooltip(ctx: &Context) {
    ctx.data_mut(|data| data.remove::<Vec<Rect>>(tooltip_links_id()));
}

fn draw_tooltip_body(ui: &mut Ui, tooltip: &TooltipSpec, drawn_links: &mut Vec<Rect>) {
    ui.horizontal(|ui| {
        ui.label(RichText::new(tooltip.title.as_str()).strong());
        ui.label(
            RichText::new(tooltip.level.label())
                .small()
                .color(level_color(tooltip.level)),
        );
    });
    if !tooltip.description.is_empty() {
        ui.add_space(2.0);
        ui.label(tooltip.description.as_str());
    }
    if tooltip.resources.is_empty() {
        return;
    }

    ui.separator();
    ui.label(RichText::new("Resources").small().strong());
    for resource in &tooltip.resources {
        ui.horizontal(|ui| {
            ui.label(resource_badge(resource.kind));
            let response = ui.hyperlink_to(resource.title.as_str(), &resource.url);
            drawn_links.push(response.rect.expand2(Vec2::splat(2.0)));
        });
    }
}
