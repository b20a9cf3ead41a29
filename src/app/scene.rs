use std::collections::HashSet;

use eframe::egui::{Color32, Pos2, Vec2, vec2};

use crate::map::{LearningLevel, Resource};

use super::session::MapSession;

const LINK_COLOR: Color32 = Color32::from_rgb(0x47, 0x55, 0x69);
const LINK_HIGHLIGHT: Color32 = Color32::from_rgb(0xa7, 0x8b, 0xfa);
const LINK_WIDTH: f32 = 1.5;
const LINK_OPACITY: f32 = 0.6;
const LINK_HIGHLIGHT_OPACITY: f32 = 0.9;
const LINK_DIMMED_OPACITY: f32 = 0.1;
const NODE_DIMMED_OPACITY: f32 = 0.2;

const OUTLINE_SELECTED: Color32 = Color32::from_rgb(0x34, 0xd3, 0x99);
const OUTLINE_COLLAPSED: Color32 = Color32::from_rgb(0xf9, 0xa8, 0xd4);
const OUTLINE_DEFAULT: Color32 = Color32::from_rgb(0x1e, 0x29, 0x3b);
const LABEL_COLOR: Color32 = Color32::from_rgb(0xcb, 0xd5, 0xe1);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum NodeCategory {
    Collapsed,
    Root,
    HasChildren,
    Leaf,
}

impl NodeCategory {
    pub(crate) const ALL: [Self; 4] = [Self::Root, Self::HasChildren, Self::Leaf, Self::Collapsed];

    pub(crate) fn fill(self) -> Color32 {
        match self {
            Self::Collapsed => Color32::from_rgb(0xec, 0x48, 0x99),
            Self::Root => Color32::from_rgb(0x63, 0x66, 0xf1),
            Self::HasChildren => Color32::from_rgb(0x8b, 0x5c, 0xf6),
            Self::Leaf => Color32::from_rgb(0xd9, 0x46, 0xef),
        }
    }

    pub(crate) fn legend_label(self) -> &'static str {
        match self {
            Self::Collapsed => "Collapsed (double-click to expand)",
            Self::Root => "Main topic",
            Self::HasChildren => "Sub-topic",
            Self::Leaf => "Concept",
        }
    }
}

/// World-space radius of a node circle.
pub(crate) fn node_radius(is_root: bool, enlarged: bool) -> f32 {
    match (is_root, enlarged) {
        (true, true) => 16.0,
        (true, false) => 12.0,
        (false, true) => 10.0,
        (false, false) => 7.0,
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct LinkShape {
    pub(crate) index: usize,
    pub(crate) from: Vec2,
    pub(crate) to: Vec2,
    pub(crate) color: Color32,
    pub(crate) opacity: f32,
    pub(crate) width: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct LabelSpec {
    pub(crate) text: String,
    pub(crate) offset: Vec2,
    pub(crate) size: f32,
    pub(crate) color: Color32,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct NodeShape {
    pub(crate) index: usize,
    pub(crate) center: Vec2,
    pub(crate) fill: Color32,
    pub(crate) outline: Color32,
    pub(crate) outline_width: f32,
    pub(crate) radius: f32,
    pub(crate) opacity: f32,
    pub(crate) label: LabelSpec,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct TooltipSpec {
    pub(crate) anchor: Pos2,
    pub(crate) title: String,
    pub(crate) level: LearningLevel,
    pub(crate) description: String,
    pub(crate) resources: Vec<Resource>,
}

/// Declarative description of one frame, in world coordinates.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Scene {
    pub(crate) links: Vec<LinkShape>,
    pub(crate) nodes: Vec<NodeShape>,
    pub(crate) tooltip: Option<TooltipSpec>,
}

impl MapSession {
    pub(crate) fn category_of(&self, index: usize) -> Option<NodeCategory> {
        let node = self.store.node(index)?;
        Some(if self.collapsed.contains(&node.id) {
            NodeCategory::Collapsed
        } else if node.is_root {
            NodeCategory::Root
        } else if self.store.has_children_at(index) {
            NodeCategory::HasChildren
        } else {
            NodeCategory::Leaf
        })
    }

    fn is_enlarged(&self, index: usize) -> bool {
        self.hovered == Some(index) || self.selected == Some(index)
    }

    /// Top-most visible node whose circle contains `pointer`.
    pub(crate) fn hit_test(&self, pointer: Pos2) -> Option<usize> {
        let rect = self.viewport?;
        let simulation = self.simulation.as_ref()?;
        let world = self.camera.screen_to_world(rect, pointer);

        simulation.nodes().iter().rev().find_map(|node| {
            let index = node.index();
            let radius = node_radius(node.is_root(), self.is_enlarged(index));
            ((node.position() - world).length() <= radius).then_some(index)
        })
    }
}

pub(crate) fn build_scene(session: &MapSession) -> Scene {
    let Some(simulation) = session.simulation() else {
        return Scene::default();
    };
    let store = session.store();
    let visible = session.visible();

    let hovered = session.hovered().filter(|&index| visible.contains(index));
    let focus = hovered.map(|index| {
        let mut focus = visible.neighbors(index).cloned().unwrap_or_default();
        focus.insert(index);
        focus
    });
    let in_focus = |index: usize, focus: &Option<HashSet<usize>>| {
        focus.as_ref().is_none_or(|focus| focus.contains(&index))
    };

    let links = visible
        .links()
        .iter()
        .filter_map(|&link| {
            let &(source, target) = store.link_ends().get(link)?;
            let from = simulation.position(source)?;
            let to = simulation.position(target)?;
            let (color, opacity) = match hovered {
                Some(index) if index == source || index == target => {
                    (LINK_HIGHLIGHT, LINK_HIGHLIGHT_OPACITY)
                }
                Some(_) => (LINK_COLOR, LINK_DIMMED_OPACITY),
                None => (LINK_COLOR, LINK_OPACITY),
            };
            Some(LinkShape {
                index: link,
                from,
                to,
                color,
                opacity,
                width: LINK_WIDTH,
            })
        })
        .collect();

    let nodes = simulation
        .nodes()
        .iter()
        .filter_map(|sim_node| {
            let index = sim_node.index();
            let node = store.node(index)?;
            let category = session.category_of(index)?;
            let (outline, outline_width) = if session.selected() == Some(index) {
                (OUTLINE_SELECTED, 2.5)
            } else if category == NodeCategory::Collapsed {
                (OUTLINE_COLLAPSED, 2.5)
            } else {
                (OUTLINE_DEFAULT, 2.0)
            };
            let (label_dx, label_size) = if node.is_root { (16.0, 14.0) } else { (10.0, 12.0) };

            Some(NodeShape {
                index,
                center: sim_node.position(),
                fill: category.fill(),
                outline,
                outline_width,
                radius: node_radius(node.is_root, session.is_enlarged(index)),
                opacity: if in_focus(index, &focus) { 1.0 } else { NODE_DIMMED_OPACITY },
                label: LabelSpec {
                    text: node.label.clone(),
                    offset: vec2(label_dx, 4.0),
                    size: label_size,
                    color: LABEL_COLOR,
                },
            })
        })
        .collect();

    let tooltip_offset = session.config().style.tooltip_offset;
    let tooltip = hovered
        .zip(session.pointer())
        .filter(|_| session.drag().is_none())
        .and_then(|(index, pointer)| {
            let node = store.node(index)?;
            Some(TooltipSpec {
                anchor: pointer + vec2(tooltip_offset, tooltip_offset),
                title: node.label.clone(),
                level: node.level,
                description: node.description.clone(),
                resources: node.resources.clone(),
            })
        });

    Scene {
        links,
        nodes,
        tooltip,
    }
}
