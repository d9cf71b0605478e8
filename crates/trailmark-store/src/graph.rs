//! Entity co-occurrence graph using petgraph.
//!
//! Nodes are `Type:Name` keys; an undirected edge joins two entities that
//! are mentioned in the same post. The graph is always rebuilt from the
//! full corpus, never patched.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use petgraph::graph::{NodeIndex, UnGraph};
use tracing::debug;

use crate::types::GraphStats;
use trailmark_core::{EntityMention, KnowledgeGraphEntity};

/// Frequency at which the frequency share of confidence saturates.
const FREQUENCY_CAP: u32 = 10;
/// Connection count at which the connection share of confidence saturates.
const CONNECTION_CAP: usize = 20;
const FREQUENCY_WEIGHT: f64 = 0.6;
const CONNECTION_WEIGHT: f64 = 0.4;

/// In-memory knowledge graph built from per-post entity lists.
pub struct KnowledgeGraph {
    graph: UnGraph<String, ()>,
    node_index: HashMap<String, NodeIndex>,
    entities: BTreeMap<String, KnowledgeGraphEntity>,
    post_count: usize,
}

impl KnowledgeGraph {
    /// Build the graph from every post's entities.
    pub fn build(entities_by_post: &HashMap<String, Vec<EntityMention>>) -> Self {
        let mut kg = Self {
            graph: UnGraph::new_undirected(),
            node_index: HashMap::new(),
            entities: BTreeMap::new(),
            post_count: entities_by_post.len(),
        };

        let mut slugs: Vec<&String> = entities_by_post.keys().collect();
        slugs.sort();

        for slug in slugs {
            let mentions = &entities_by_post[slug];
            let mut keys: Vec<String> = Vec::with_capacity(mentions.len());

            for mention in mentions {
                let key = mention.key();
                if keys.contains(&key) {
                    continue;
                }
                kg.node_for(&key, mention);
                if let Some(entity) = kg.entities.get_mut(&key) {
                    entity.frequency += 1;
                    entity.related_posts.insert(slug.clone());
                }
                keys.push(key);
            }

            for i in 0..keys.len() {
                for j in (i + 1)..keys.len() {
                    let a = kg.node_index[&keys[i]];
                    let b = kg.node_index[&keys[j]];
                    kg.graph.update_edge(a, b, ());
                }
            }
        }

        kg.finalize();
        debug!(
            "Knowledge graph built: {} nodes, {} edges from {} posts",
            kg.graph.node_count(),
            kg.graph.edge_count(),
            kg.post_count
        );
        kg
    }

    fn node_for(&mut self, key: &str, mention: &EntityMention) -> NodeIndex {
        if let Some(&idx) = self.node_index.get(key) {
            return idx;
        }
        let idx = self.graph.add_node(key.to_string());
        self.node_index.insert(key.to_string(), idx);
        self.entities.insert(
            key.to_string(),
            KnowledgeGraphEntity {
                id: key.to_string(),
                name: mention.name.clone(),
                entity_type: mention.entity_type,
                frequency: 0,
                connections: BTreeSet::new(),
                confidence: 0.0,
                related_posts: BTreeSet::new(),
            },
        );
        idx
    }

    /// Fill in connections and confidence once all posts are counted.
    fn finalize(&mut self) {
        for (key, &idx) in &self.node_index {
            let connections: BTreeSet<String> = self
                .graph
                .neighbors(idx)
                .map(|n| self.graph[n].clone())
                .collect();
            if let Some(entity) = self.entities.get_mut(key) {
                entity.confidence = node_confidence(entity.frequency, connections.len());
                entity.connections = connections;
            }
        }
    }

    pub fn entities(&self) -> &BTreeMap<String, KnowledgeGraphEntity> {
        &self.entities
    }

    pub fn get(&self, id: &str) -> Option<&KnowledgeGraphEntity> {
        self.entities.get(id)
    }

    /// Whether `a` and `b` were mentioned together in at least one post.
    pub fn has_edge(&self, a: &str, b: &str) -> bool {
        match (self.node_index.get(a), self.node_index.get(b)) {
            (Some(&x), Some(&y)) => self.graph.find_edge(x, y).is_some(),
            _ => false,
        }
    }

    pub fn neighbors(&self, id: &str) -> Vec<&KnowledgeGraphEntity> {
        self.get(id)
            .map(|e| {
                e.connections
                    .iter()
                    .filter_map(|c| self.entities.get(c))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Most frequent entities, ties broken by confidence then id.
    pub fn top_entities(&self, limit: usize) -> Vec<&KnowledgeGraphEntity> {
        let mut all: Vec<&KnowledgeGraphEntity> = self.entities.values().collect();
        all.sort_by(|a, b| {
            b.frequency
                .cmp(&a.frequency)
                .then(
                    b.confidence
                        .partial_cmp(&a.confidence)
                        .unwrap_or(std::cmp::Ordering::Equal),
                )
                .then(a.id.cmp(&b.id))
        });
        all.truncate(limit);
        all
    }

    pub fn stats(&self) -> GraphStats {
        GraphStats {
            node_count: self.graph.node_count(),
            edge_count: self.graph.edge_count(),
            post_count: self.post_count,
        }
    }
}

/// 60/40 blend of capped frequency and capped connection count.
pub fn node_confidence(frequency: u32, connections: usize) -> f64 {
    let freq = f64::from(frequency.min(FREQUENCY_CAP)) / f64::from(FREQUENCY_CAP);
    let conn = connections.min(CONNECTION_CAP) as f64 / CONNECTION_CAP as f64;
    FREQUENCY_WEIGHT * freq + CONNECTION_WEIGHT * conn
}

#[cfg(test)]
mod tests {
    use super::*;
    use trailmark_core::EntityType;

    fn m(t: EntityType, name: &str) -> EntityMention {
        EntityMention::new(t, name, 0.9)
    }

    fn corpus() -> HashMap<String, Vec<EntityMention>> {
        let mut map = HashMap::new();
        map.insert(
            "a".to_string(),
            vec![m(EntityType::Place, "Bangkok"), m(EntityType::Food, "Pad Thai")],
        );
        map.insert(
            "b".to_string(),
            vec![m(EntityType::Place, "Bangkok"), m(EntityType::Food, "Tom Yum")],
        );
        map
    }

    #[test]
    fn test_frequency_and_related_posts() {
        let kg = KnowledgeGraph::build(&corpus());
        let bangkok = kg.get("Place:Bangkok").unwrap();
        assert_eq!(bangkok.frequency, 2);
        assert_eq!(bangkok.related_posts.len(), 2);
        assert_eq!(bangkok.connections.len(), 2);
        assert_eq!(kg.stats().node_count, 3);
        assert_eq!(kg.stats().edge_count, 2);
    }

    #[test]
    fn test_edges_only_within_a_post() {
        let kg = KnowledgeGraph::build(&corpus());
        assert!(kg.has_edge("Place:Bangkok", "Food:Pad Thai"));
        assert!(kg.has_edge("Food:Pad Thai", "Place:Bangkok"));
        // Both appear alongside Bangkok, never together.
        assert!(!kg.has_edge("Food:Pad Thai", "Food:Tom Yum"));
    }

    #[test]
    fn test_edges_are_symmetric() {
        let kg = KnowledgeGraph::build(&corpus());
        for entity in kg.entities().values() {
            for other in &entity.connections {
                assert!(kg.get(other).unwrap().connections.contains(&entity.id));
            }
        }
    }

    #[test]
    fn test_shared_pair_in_two_posts_is_one_edge() {
        let mut map = HashMap::new();
        for slug in ["a", "b"] {
            map.insert(
                slug.to_string(),
                vec![m(EntityType::Food, "Pho"), m(EntityType::Place, "Hanoi")],
            );
        }
        let kg = KnowledgeGraph::build(&map);
        assert_eq!(kg.stats().edge_count, 1);
        assert_eq!(kg.get("Food:Pho").unwrap().frequency, 2);
    }

    #[test]
    fn test_confidence_formula() {
        assert!((node_confidence(0, 0) - 0.0).abs() < 1e-9);
        assert!((node_confidence(5, 10) - 0.5).abs() < 1e-9);
        assert!((node_confidence(50, 100) - 1.0).abs() < 1e-9);
        let kg = KnowledgeGraph::build(&corpus());
        let pad_thai = kg.get("Food:Pad Thai").unwrap();
        assert!((pad_thai.confidence - (0.6 * 0.1 + 0.4 * 0.05)).abs() < 1e-9);
    }

    #[test]
    fn test_top_entities_and_neighbors() {
        let kg = KnowledgeGraph::build(&corpus());
        assert_eq!(kg.top_entities(1)[0].id, "Place:Bangkok");
        assert_eq!(kg.neighbors("Food:Tom Yum").len(), 1);
        assert!(kg.neighbors("Nope:Nothing").is_empty());
    }

    #[test]
    fn test_empty_corpus() {
        let kg = KnowledgeGraph::build(&HashMap::new());
        assert!(kg.entities().is_empty());
        assert_eq!(kg.stats().edge_count, 0);
    }
}
