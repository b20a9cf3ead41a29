use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use super::store::GraphStore;

/// Node ids whose descendants are hidden.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CollapseSet {
    ids: BTreeSet<String>,
}

impl CollapseSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn insert(&mut self, id: &str) -> bool {
        self.ids.insert(id.to_owned())
    }

    pub fn remove(&mut self, id: &str) -> bool {
        self.ids.remove(id)
    }

    /// Flips membership and returns whether `id` is collapsed afterwards.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.remove(id) {
            false
        } else {
            self.insert(id)
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}

/// Nodes reachable from `start` over outgoing links. `start` itself is never
/// included, even when a cycle leads back to it.
pub fn descendants(store: &GraphStore, start: usize) -> HashSet<usize> {
    let mut found = HashSet::new();
    let mut queue = VecDeque::from_iter(store.children(start).iter().copied());

    while let Some(index) = queue.pop_front() {
        if index == start || !found.insert(index) {
            continue;
        }
        queue.extend(store.children(index).iter().copied());
    }

    found
}

/// The displayed subgraph for one (graph, collapse set) pair.
#[derive(Clone, Debug, Default)]
pub struct VisibleGraph {
    nodes: Vec<usize>,
    links: Vec<usize>,
    hidden: HashSet<usize>,
    neighbors: HashMap<usize, HashSet<usize>>,
}

impl VisibleGraph {
    /// Visible node indices in store order.
    pub fn nodes(&self) -> &[usize] {
        &self.nodes
    }

    /// Visible link indices in store order.
    pub fn links(&self) -> &[usize] {
        &self.links
    }

    pub fn contains(&self, index: usize) -> bool {
        self.neighbors.contains_key(&index)
    }

    pub fn hidden_count(&self) -> usize {
        self.hidden.len()
    }

    /// Direct neighbors over visible links only.
    pub fn neighbors(&self, index: usize) -> Option<&HashSet<usize>> {
        self.neighbors.get(&index)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }
}

pub fn resolve(store: &GraphStore, collapsed: &CollapseSet) -> VisibleGraph {
    let mut hidden = HashSet::new();
    for id in collapsed.iter() {
        if let Some(index) = store.index_of(id) {
            hidden.extend(descendants(store, index));
        }
    }

    let nodes = (0..store.nodes().len())
        .filter(|index| !hidden.contains(index))
        .collect::<Vec<_>>();

    let mut neighbors = nodes
        .iter()
        .map(|&index| (index, HashSet::new()))
        .collect::<HashMap<_, _>>();

    let mut links = Vec::new();
    for (link_index, &(source, target)) in store.link_ends().iter().enumerate() {
        if hidden.contains(&source) || hidden.contains(&target) {
            continue;
        }
        links.push(link_index);
        if source == target {
            continue;
        }
        if let Some(set) = neighbors.get_mut(&source) {
            set.insert(target);
        }
        if let Some(set) = neighbors.get_mut(&target) {
            set.insert(source);
        }
    }

    VisibleGraph {
        nodes,
        links,
        hidden,
        neighbors,
    }
}

#[cfg(test)]
mod tests {
    use super::super::model::fixtures::{map, small_tree};
    use super::*;

    fn visible_ids(store: &GraphStore, visible: &VisibleGraph) -> Vec<String> {
        visible
            .nodes()
            .iter()
            .filter_map(|&index| store.node(index).map(|node| node.id.clone()))
            .collect()
    }

    fn collapsed(ids: &[&str]) -> CollapseSet {
        let mut set = CollapseSet::new();
        for id in ids {
            set.insert(id);
        }
        set
    }

    #[test]
    fn collapsing_root_hides_children_and_links() {
        let store = GraphStore::from_data(map(
            &[("a", true), ("b", false), ("c", false)],
            &[("a", "b"), ("a", "c")],
        ));

        let hidden = resolve(&store, &collapsed(&["a"]));
        assert_eq!(visible_ids(&store, &hidden), vec!["a"]);
        assert_eq!(hidden.link_count(), 0);

        let shown = resolve(&store, &CollapseSet::new());
        assert_eq!(visible_ids(&store, &shown), vec!["a", "b", "c"]);
        assert_eq!(shown.links(), &[0, 1]);
    }

    #[test]
    fn collapse_hides_transitive_descendants() {
        let store = GraphStore::from_data(small_tree());
        let visible = resolve(&store, &collapsed(&["a"]));

        assert_eq!(visible_ids(&store, &visible), vec!["a"]);
        assert_eq!(visible.hidden_count(), 3);
    }

    #[test]
    fn visible_sets_match_definition() {
        let store = GraphStore::from_data(small_tree());
        let set = collapsed(&["b"]);
        let visible = resolve(&store, &set);

        let mut expected_hidden = HashSet::new();
        for id in set.iter() {
            let index = store.index_of(id).expect("collapsed id exists");
            expected_hidden.extend(descendants(&store, index));
        }
        let expected_nodes = (0..store.nodes().len())
            .filter(|index| !expected_hidden.contains(index))
            .collect::<Vec<_>>();
        assert_eq!(visible.nodes(), expected_nodes.as_slice());

        for (link_index, &(source, target)) in store.link_ends().iter().enumerate() {
            let both_visible = visible.contains(source) && visible.contains(target);
            assert_eq!(visible.links().contains(&link_index), both_visible);
        }
    }

    #[test]
    fn collapse_round_trip_restores_visible_sets() {
        let store = GraphStore::from_data(small_tree());
        let mut set = CollapseSet::new();
        let before = resolve(&store, &set);

        assert!(set.toggle("b"));
        let during = resolve(&store, &set);
        assert!(!during.contains(store.index_of("d").expect("d exists")));

        assert!(!set.toggle("b"));
        let after = resolve(&store, &set);
        assert_eq!(before.nodes(), after.nodes());
        assert_eq!(before.links(), after.links());
    }

    #[test]
    fn cycles_terminate_and_keep_collapsed_node() {
        let store = GraphStore::from_data(map(
            &[("a", true), ("b", false), ("c", false)],
            &[("a", "b"), ("b", "c"), ("c", "a")],
        ));

        let visible = resolve(&store, &collapsed(&["a"]));
        assert_eq!(visible_ids(&store, &visible), vec!["a"]);
    }

    #[test]
    fn nested_collapses_union_hidden_sets() {
        let store = GraphStore::from_data(small_tree());
        let visible = resolve(&store, &collapsed(&["a", "b"]));
        assert_eq!(visible_ids(&store, &visible), vec!["a"]);

        let only_b = resolve(&store, &collapsed(&["b"]));
        assert_eq!(visible_ids(&store, &only_b), vec!["a", "b", "c"]);
    }

    #[test]
    fn neighbors_follow_visible_links_only() {
        let store = GraphStore::from_data(small_tree());
        let b = store.index_of("b").expect("b exists");
        let a = store.index_of("a").expect("a exists");

        let all = resolve(&store, &CollapseSet::new());
        assert_eq!(all.neighbors(b).map(HashSet::len), Some(2));

        let visible = resolve(&store, &collapsed(&["b"]));
        assert_eq!(visible.neighbors(b), Some(&HashSet::from([a])));
    }

    #[test]
    fn unknown_collapsed_ids_are_ignored() {
        let store = GraphStore::from_data(small_tree());
        let visible = resolve(&store, &collapsed(&["ghost"]));
        assert_eq!(visible.node_count(), 4);
    }
}
