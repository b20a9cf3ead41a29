use std::collections::{HashMap, HashSet};

use super::model::{MapData, TopicLink, TopicNode};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub nodes: usize,
    pub links: usize,
    pub dropped_links: usize,
    pub duplicate_nodes: usize,
}

/// The active map plus its adjacency index. Replaced wholesale on each load.
#[derive(Debug, Default)]
pub struct GraphStore {
    data: MapData,
    index_by_id: HashMap<String, usize>,
    link_ends: Vec<(usize, usize)>,
    outgoing: Vec<Vec<usize>>,
    incoming: Vec<Vec<usize>>,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn from_data(data: MapData) -> Self {
        let mut store = Self::new();
        store.load(data);
        store
    }

    pub fn load(&mut self, data: MapData) -> LoadReport {
        let MapData { nodes, links } = data;
        let mut report = LoadReport::default();

        let mut index_by_id = HashMap::with_capacity(nodes.len());
        let mut kept_nodes = Vec::with_capacity(nodes.len());
        for node in nodes {
            if index_by_id.contains_key(&node.id) {
                tracing::warn!(id = %node.id, "dropping node with duplicate id");
                report.duplicate_nodes += 1;
                continue;
            }
            index_by_id.insert(node.id.clone(), kept_nodes.len());
            kept_nodes.push(node);
        }

        let mut kept_links = Vec::with_capacity(links.len());
        let mut link_ends = Vec::with_capacity(links.len());
        for link in links {
            match (index_by_id.get(&link.source), index_by_id.get(&link.target)) {
                (Some(&source), Some(&target)) => {
                    link_ends.push((source, target));
                    kept_links.push(link);
                }
                _ => {
                    tracing::debug!(
                        source = %link.source,
                        target = %link.target,
                        "dropping link with unknown endpoint"
                    );
                    report.dropped_links += 1;
                }
            }
        }

        let mut outgoing = vec![Vec::new(); kept_nodes.len()];
        let mut incoming = vec![Vec::new(); kept_nodes.len()];
        for &(source, target) in &link_ends {
            if source == target {
                continue;
            }
            outgoing[source].push(target);
            incoming[target].push(source);
        }
        for neighbors in outgoing.iter_mut().chain(incoming.iter_mut()) {
            neighbors.sort_unstable();
            neighbors.dedup();
        }

        report.nodes = kept_nodes.len();
        report.links = kept_links.len();
        if report.dropped_links > 0 || report.duplicate_nodes > 0 {
            tracing::warn!(
                dropped_links = report.dropped_links,
                duplicate_nodes = report.duplicate_nodes,
                "map contained invalid entries"
            );
        }

        self.data = MapData {
            nodes: kept_nodes,
            links: kept_links,
        };
        self.index_by_id = index_by_id;
        self.link_ends = link_ends;
        self.outgoing = outgoing;
        self.incoming = incoming;

        report
    }

    pub fn is_empty(&self) -> bool {
        self.data.nodes.is_empty()
    }

    pub fn data(&self) -> &MapData {
        &self.data
    }

    pub fn nodes(&self) -> &[TopicNode] {
        &self.data.nodes
    }

    pub fn links(&self) -> &[TopicLink] {
        &self.data.links
    }

    pub fn node(&self, index: usize) -> Option<&TopicNode> {
        self.data.nodes.get(index)
    }

    pub fn node_by_id(&self, id: &str) -> Option<&TopicNode> {
        self.index_of(id).and_then(|index| self.node(index))
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    /// Endpoints of every kept link as node indices, parallel to `links()`.
    pub fn link_ends(&self) -> &[(usize, usize)] {
        &self.link_ends
    }

    pub fn children(&self, index: usize) -> &[usize] {
        self.outgoing.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn parents(&self, index: usize) -> &[usize] {
        self.incoming.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_children_at(&self, index: usize) -> bool {
        !self.children(index).is_empty()
    }

    pub fn has_children(&self, id: &str) -> bool {
        self.index_of(id)
            .is_some_and(|index| self.has_children_at(index))
    }

    pub fn neighbor_indices(&self, index: usize) -> HashSet<usize> {
        self.children(index)
            .iter()
            .chain(self.parents(index))
            .copied()
            .collect()
    }

    /// Direct neighbors of `id` in both directions.
    pub fn adjacency(&self, id: &str) -> HashSet<&str> {
        let Some(index) = self.index_of(id) else {
            return HashSet::new();
        };
        self.neighbor_indices(index)
            .into_iter()
            .filter_map(|neighbor| self.node(neighbor).map(|node| node.id.as_str()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::super::model::fixtures::{link, map, node, small_tree};
    use super::*;

    #[test]
    fn load_indexes_nodes_and_children() {
        let store = GraphStore::from_data(small_tree());

        assert_eq!(store.nodes().len(), 4);
        assert!(store.has_children("a"));
        assert!(store.has_children("b"));
        assert!(!store.has_children("c"));
        assert!(!store.has_children("missing"));
        assert_eq!(store.adjacency("b"), HashSet::from(["a", "d"]));
    }

    #[test]
    fn dangling_links_are_dropped() {
        let data = map(&[("a", true), ("b", false)], &[("x", "b"), ("a", "b"), ("a", "y")]);
        let mut store = GraphStore::new();
        let report = store.load(data);

        assert_eq!(report.dropped_links, 2);
        assert_eq!(store.links(), &[link("a", "b")]);
        assert!(store.links().iter().all(|l| l.source != "x"));
    }

    #[test]
    fn duplicate_ids_keep_first_node() {
        let mut data = map(&[("a", true), ("b", false)], &[("a", "b")]);
        let mut clash = node("a", false);
        clash.label = "Second".to_owned();
        data.nodes.push(clash);

        let mut store = GraphStore::new();
        let report = store.load(data);

        assert_eq!(report.duplicate_nodes, 1);
        assert_eq!(store.nodes().len(), 2);
        assert_eq!(store.node_by_id("a").map(|n| n.label.as_str()), Some("A"));
    }

    #[test]
    fn empty_map_loads_without_error() {
        let mut store = GraphStore::new();
        let report = store.load(MapData::default());

        assert!(store.is_empty());
        assert_eq!(report, LoadReport::default());
        assert!(store.adjacency("a").is_empty());
    }

    #[test]
    fn self_links_are_kept_but_are_not_children() {
        let store = GraphStore::from_data(map(&[("a", true)], &[("a", "a")]));

        assert_eq!(store.links().len(), 1);
        assert!(!store.has_children("a"));
        assert!(store.adjacency("a").is_empty());
    }

    #[test]
    fn reload_replaces_index() {
        let mut store = GraphStore::from_data(small_tree());
        store.load(map(&[("z", true)], &[]));

        assert_eq!(store.nodes().len(), 1);
        assert!(store.children(0).is_empty());
        assert!(store.index_of("a").is_none());
        assert_eq!(store.index_of("z"), Some(0));
    }
}
