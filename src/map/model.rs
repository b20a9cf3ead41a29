use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LearningLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl LearningLevel {
    pub fn label(self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Video,
    Website,
}

impl ResourceKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Website => "website",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub title: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: ResourceKind,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicNode {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub resources: Vec<Resource>,
    #[serde(default)]
    pub level: LearningLevel,
    #[serde(default)]
    pub is_root: bool,
}

/// A prerequisite edge: `source` must be learned before `target`.
///
/// Endpoints are node ids. Resolution to simulation slots happens in the
/// layout engine, never here.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TopicLink {
    pub source: String,
    pub target: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapData {
    pub nodes: Vec<TopicNode>,
    pub links: Vec<TopicLink>,
}

impl MapData {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn root_labels(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .filter(|node| node.is_root)
            .map(|node| node.label.as_str())
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::{LearningLevel, MapData, Resource, ResourceKind, TopicLink, TopicNode};

    pub(crate) fn node(id: &str, is_root: bool) -> TopicNode {
        TopicNode {
            id: id.to_owned(),
            label: id.to_uppercase(),
            description: format!("About {id}"),
            resources: vec![Resource {
                title: format!("{id} intro"),
                url: format!("https://example.com/{id}"),
                kind: ResourceKind::Website,
            }],
            level: LearningLevel::Beginner,
            is_root,
        }
    }

    pub(crate) fn link(source: &str, target: &str) -> TopicLink {
        TopicLink {
            source: source.to_owned(),
            target: target.to_owned(),
        }
    }

    pub(crate) fn map(nodes: &[(&str, bool)], links: &[(&str, &str)]) -> MapData {
        MapData {
            nodes: nodes.iter().map(|(id, root)| node(id, *root)).collect(),
            links: links
                .iter()
                .map(|(source, target)| link(source, target))
                .collect(),
        }
    }

    /// `a` is the root with children `b` and `c`; `b` has child `d`.
    pub(crate) fn small_tree() -> MapData {
        map(
            &[("a", true), ("b", false), ("c", false), ("d", false)],
            &[("a", "b"), ("a", "c"), ("b", "d")],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_fields_use_camel_case_and_defaults() {
        let raw = r#"{"id":"rust","label":"Rust","isRoot":true}"#;
        let node: TopicNode = serde_json::from_str(raw).expect("parse node");

        assert!(node.is_root);
        assert_eq!(node.level, LearningLevel::Beginner);
        assert!(node.description.is_empty());
        assert!(node.resources.is_empty());
    }

    #[test]
    fn resource_kind_uses_type_field() {
        let raw = r#"{"title":"Talk","url":"https://v.example","type":"video"}"#;
        let resource: Resource = serde_json::from_str(raw).expect("parse resource");
        assert_eq!(resource.kind, ResourceKind::Video);

        let encoded = serde_json::to_string(&resource).expect("encode resource");
        assert!(encoded.contains(r#""type":"video""#));
    }

    #[test]
    fn unknown_level_is_rejected() {
        let raw = r#"{"id":"x","label":"X","level":"Expert"}"#;
        assert!(serde_json::from_str::<TopicNode>(raw).is_err());
    }
}
