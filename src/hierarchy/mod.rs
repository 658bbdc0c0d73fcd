//! Tree-shape questions over the dealership store.
//!
//! The resolver never fails: a missing node, a broken parent link or a store
//! error all mean "no relationship". Store errors are logged and the answer
//! falls back to the most restrictive result.

use std::collections::HashSet;
use std::sync::Arc;

use crate::database::dealership_store::DealershipStore;
use crate::database::models::Dealership;

#[derive(Clone)]
pub struct HierarchyResolver {
    store: Arc<dyn DealershipStore>,
}

impl HierarchyResolver {
    pub fn new(store: Arc<dyn DealershipStore>) -> Self {
        Self { store }
    }

    /// `node_id` followed by each ancestor up to the root or the first break.
    pub async fn ancestor_chain(&self, node_id: &str) -> Vec<Dealership> {
        match self.store.get_ancestor_chain(node_id).await {
            Ok(chain) => chain,
            Err(e) => {
                tracing::error!("Ancestor lookup for dealership {} failed: {}", node_id, e);
                Vec::new()
            }
        }
    }

    /// True iff `candidate_id` sits strictly above `node_id` on its parent chain.
    pub async fn is_ancestor(&self, candidate_id: &str, node_id: &str) -> bool {
        tracing::debug!(
            "Checking if dealership ID: {} is an ancestor of dealership ID: {}",
            candidate_id,
            node_id
        );

        self.ancestor_chain(node_id)
            .await
            .iter()
            .skip(1)
            .any(|ancestor| ancestor.dealership_id == candidate_id)
    }

    /// `root_id` and every dealership below it. Empty when `root_id` does not exist.
    pub async fn descendants_of(&self, root_id: &str) -> HashSet<String> {
        match self.store.get_descendant_ids(root_id).await {
            Ok(ids) => ids,
            Err(e) => {
                tracing::error!("Descendant lookup for dealership {} failed: {}", root_id, e);
                HashSet::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;
    use crate::database::models::{DealershipUpdate, NewDealership};
    use chrono::Utc;

    async fn add(store: &MemoryStore, name: &str, parent: Option<&str>) -> String {
        store
            .create(NewDealership {
                name: name.to_string(),
                address: "1 Main St".to_string(),
                parent_dealership_id: parent.map(str::to_string),
            })
            .await
            .unwrap()
            .dealership_id
    }

    /// root -> a -> b, root -> c
    async fn fixture() -> (HierarchyResolver, MemoryStore, [String; 4]) {
        let store = MemoryStore::new();
        let root = add(&store, "root", None).await;
        let a = add(&store, "a", Some(&root)).await;
        let b = add(&store, "b", Some(&a)).await;
        let c = add(&store, "c", Some(&root)).await;
        let resolver = HierarchyResolver::new(Arc::new(store.clone()));
        (resolver, store, [root, a, b, c])
    }

    #[tokio::test]
    async fn node_is_not_its_own_ancestor() {
        let (resolver, _, ids) = fixture().await;
        for id in &ids {
            assert!(!resolver.is_ancestor(id, id).await);
        }
    }

    #[tokio::test]
    async fn ancestry_is_transitive() {
        let (resolver, _, [root, a, b, _]) = fixture().await;
        assert!(resolver.is_ancestor(&root, &a).await);
        assert!(resolver.is_ancestor(&a, &b).await);
        assert!(resolver.is_ancestor(&root, &b).await);
    }

    #[tokio::test]
    async fn ancestry_never_points_down_or_sideways() {
        let (resolver, _, [root, a, b, c]) = fixture().await;
        assert!(!resolver.is_ancestor(&b, &root).await);
        assert!(!resolver.is_ancestor(&b, &a).await);
        assert!(!resolver.is_ancestor(&c, &b).await);
        assert!(!resolver.is_ancestor(&a, &c).await);
    }

    #[tokio::test]
    async fn descendants_include_the_root_itself() {
        let (resolver, _, [root, a, b, c]) = fixture().await;
        let below_root = resolver.descendants_of(&root).await;
        assert_eq!(below_root, HashSet::from([root.clone(), a.clone(), b.clone(), c.clone()]));

        let below_a = resolver.descendants_of(&a).await;
        assert_eq!(below_a, HashSet::from([a, b]));
    }

    #[tokio::test]
    async fn unknown_node_has_no_relationships() {
        let (resolver, _, [root, ..]) = fixture().await;
        assert!(!resolver.is_ancestor(&root, "does-not-exist").await);
        assert!(resolver.descendants_of("does-not-exist").await.is_empty());
    }

    #[tokio::test]
    async fn broken_parent_link_truncates_the_walk() {
        let (resolver, store, [root, ..]) = fixture().await;
        let now = Utc::now();
        store
            .insert_unchecked(Dealership {
                dealership_id: "detached".to_string(),
                name: "detached".to_string(),
                address: "nowhere".to_string(),
                parent_dealership_id: Some("vanished".to_string()),
                created_at: now,
                updated_at: now,
            })
            .await;
        let leaf = add(&store, "leaf", Some("detached")).await;

        assert!(resolver.is_ancestor("detached", &leaf).await);
        assert!(!resolver.is_ancestor("vanished", &leaf).await);
        assert!(!resolver.is_ancestor(&root, &leaf).await);
    }

    #[tokio::test]
    async fn reparenting_moves_the_whole_subtree() {
        let (resolver, store, [root, a, b, c]) = fixture().await;
        store
            .update(
                &a,
                DealershipUpdate {
                    name: "a".to_string(),
                    address: "1 Main St".to_string(),
                    parent_dealership_id: Some(c.clone()),
                },
            )
            .await
            .unwrap();

        assert!(resolver.is_ancestor(&c, &b).await);
        assert!(resolver.descendants_of(&c).await.contains(&b));
        assert!(resolver.is_ancestor(&root, &b).await);
        assert_eq!(resolver.descendants_of(&a).await, HashSet::from([a, b]));
    }
}
