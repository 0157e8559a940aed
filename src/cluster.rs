//! Incremental rhyme clustering over a whole song.
//!
//! Syllables are fed in lyric order. Each one either joins the cluster its
//! folded rhyme key already maps to, joins a cluster whose keys are within
//! the near-rhyme tolerance, or starts a new cluster. The key map is the only
//! structure consulted for exact matches; merging re-points map entries so
//! lookups never walk a parent chain.
//!
//! With [`MatchPolicy::Representative`] a key is compared only against each
//! cluster's creation key, so a chain of near rhymes cannot drift. With
//! [`MatchPolicy::Transitive`] every absorbed key is compared and clusters
//! bridged by one syllable are merged into the lowest id.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::config::{MatchPolicy, SyllableScope, Tolerance};
use crate::models::{ClusterId, RhymeCluster, RhymeKey, Song, SyllableId};
use crate::rhyme::{canonical_key, folded_keys_rhyme};

pub struct ClusterEngine {
    tolerance: Tolerance,
    /// Indexed by ClusterId; merged-away clusters become None
    clusters: Vec<Option<RhymeCluster>>,
    /// Folded keys absorbed by each cluster, creation key first
    folded: Vec<Vec<RhymeKey>>,
    by_key: FxHashMap<RhymeKey, ClusterId>,
    /// Live clusters per nucleus, ascending id
    by_nucleus: FxHashMap<String, Vec<ClusterId>>,
}

impl ClusterEngine {
    pub fn new(tolerance: Tolerance) -> Self {
        Self {
            tolerance,
            clusters: Vec::new(),
            folded: Vec::new(),
            by_key: FxHashMap::default(),
            by_nucleus: FxHashMap::default(),
        }
    }

    /// Place one syllable and return the cluster it now belongs to.
    pub fn assign(&mut self, syllable: SyllableId, key: &RhymeKey, line: usize) -> ClusterId {
        let folded = canonical_key(key, self.tolerance.coda_folding);

        if let Some(&id) = self.by_key.get(&folded) {
            self.join(id, syllable, key, folded);
            return id;
        }

        let matches = self.tolerance_matches(&folded);
        let Some((&target, rest)) = matches.split_first() else {
            return self.create(syllable, key, folded, line);
        };
        if self.tolerance.policy == MatchPolicy::Transitive {
            for &other in rest {
                self.merge(target, other);
            }
        }
        self.join(target, syllable, key, folded);
        target
    }

    /// Live clusters whose compared keys are within tolerance, ascending id.
    fn tolerance_matches(&self, folded: &RhymeKey) -> Vec<ClusterId> {
        // Without edits, folded equality is the only match and by_key covers it
        if self.tolerance.max_coda_edits == 0 {
            return Vec::new();
        }
        let Some(candidates) = self.by_nucleus.get(&folded.nucleus) else {
            return Vec::new();
        };
        candidates
            .iter()
            .copied()
            .filter(|&id| {
                let keys = &self.folded[id];
                match self.tolerance.policy {
                    MatchPolicy::Representative => keys
                        .first()
                        .is_some_and(|rep| folded_keys_rhyme(rep, folded, &self.tolerance)),
                    MatchPolicy::Transitive => keys.iter().any(|k| folded_keys_rhyme(k, folded, &self.tolerance)),
                }
            })
            .collect()
    }

    fn create(&mut self, syllable: SyllableId, key: &RhymeKey, folded: RhymeKey, line: usize) -> ClusterId {
        let id = self.clusters.len();
        debug!(cluster = id, key = %key, line, "New rhyme cluster");
        self.clusters.push(Some(RhymeCluster::new(id, key.clone(), syllable, line)));
        self.by_nucleus.entry(folded.nucleus.clone()).or_default().push(id);
        self.by_key.insert(folded.clone(), id);
        self.folded.push(vec![folded]);
        id
    }

    fn join(&mut self, id: ClusterId, syllable: SyllableId, key: &RhymeKey, folded: RhymeKey) {
        let Some(cluster) = self.clusters[id].as_mut() else {
            return;
        };
        cluster.members.push(syllable);
        if !cluster.keys.contains(key) {
            cluster.keys.push(key.clone());
        }
        debug!(cluster = id, key = %key, members = cluster.members.len(), "Joined rhyme cluster");
        if !self.by_key.contains_key(&folded) {
            self.by_key.insert(folded.clone(), id);
            self.folded[id].push(folded);
        }
    }

    /// Fold `other` into `target`. `target` is always the lower id.
    fn merge(&mut self, target: ClusterId, other: ClusterId) {
        let Some(absorbed) = self.clusters[other].take() else {
            return;
        };
        let moved_keys = std::mem::take(&mut self.folded[other]);
        for key in &moved_keys {
            self.by_key.insert(key.clone(), target);
        }
        if let Some(first) = moved_keys.first() {
            if let Some(ids) = self.by_nucleus.get_mut(&first.nucleus) {
                ids.retain(|&id| id != other);
            }
        }
        self.folded[target].extend(moved_keys);

        let Some(cluster) = self.clusters[target].as_mut() else {
            return;
        };
        debug!(
            target,
            absorbed = other,
            members = cluster.members.len() + absorbed.members.len(),
            "Merged rhyme clusters"
        );
        cluster.members.extend(absorbed.members);
        cluster.members.sort_unstable();
        for key in absorbed.keys {
            if !cluster.keys.contains(&key) {
                cluster.keys.push(key);
            }
        }
        cluster.first_line = cluster.first_line.min(absorbed.first_line);
    }

    /// Number of clusters still alive.
    pub fn len(&self) -> usize {
        self.clusters.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write each member syllable's cluster and return live clusters by id.
    pub fn finish(self, song: &mut Song) -> Vec<RhymeCluster> {
        let clusters: Vec<RhymeCluster> = self.clusters.into_iter().flatten().collect();
        for cluster in &clusters {
            for &member in &cluster.members {
                let syllable = &mut song.syllables[member];
                debug_assert!(syllable.cluster.is_none(), "syllable clustered twice");
                syllable.cluster = Some(cluster.id);
            }
        }
        clusters
    }
}

/// Cluster the rhyme-bearing syllables of a song in lyric order.
pub fn cluster_song(song: &mut Song, tolerance: Tolerance, scope: SyllableScope) -> Vec<RhymeCluster> {
    let mut engine = ClusterEngine::new(tolerance);
    for word in 0..song.words.len() {
        if !song.rhyme_bearing[word] {
            continue;
        }
        let range = song.word_syllables[word].clone();
        let ids = match scope {
            SyllableScope::Final => range.end.saturating_sub(1).max(range.start)..range.end,
            SyllableScope::All => range,
        };
        let line = song.words[word].line;
        for id in ids {
            let key = song.syllables[id].key.clone();
            engine.assign(id, &key, line);
        }
    }
    debug!(clusters = engine.len(), "Clustering complete");
    engine.finish(song)
}

/// Find a cluster by id in a list sorted by id.
pub fn find_cluster(clusters: &[RhymeCluster], id: ClusterId) -> Option<&RhymeCluster> {
    clusters
        .binary_search_by_key(&id, |c| c.id)
        .ok()
        .map(|index| &clusters[index])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CodaFolding;

    fn key(nucleus: &str, coda: &[&str]) -> RhymeKey {
        RhymeKey {
            nucleus: nucleus.to_string(),
            coda: coda.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn tolerance(coda_folding: CodaFolding, max_coda_edits: usize, policy: MatchPolicy) -> Tolerance {
        Tolerance {
            coda_folding,
            max_coda_edits,
            policy,
        }
    }

    fn live(engine: ClusterEngine) -> Vec<RhymeCluster> {
        engine.clusters.into_iter().flatten().collect()
    }

    #[test]
    fn test_exact_keys_share_cluster() {
        let mut engine = ClusterEngine::new(Tolerance::exact());
        let a = engine.assign(0, &key("AE", &["T"]), 0);
        let b = engine.assign(1, &key("AE", &["T"]), 1);
        let c = engine.assign(2, &key("AO", &["G"]), 2);
        assert_eq!(a, b);
        assert_ne!(a, c);

        let clusters = live(engine);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].members, vec![0, 1]);
        assert_eq!(clusters[0].first_line, 0);
        assert!(clusters[0].qualifies());
        assert!(!clusters[1].qualifies());
    }

    #[test]
    fn test_first_line_set_once() {
        let mut engine = ClusterEngine::new(Tolerance::exact());
        engine.assign(0, &key("AY", &["T"]), 3);
        engine.assign(1, &key("AY", &["T"]), 7);
        let clusters = live(engine);
        assert_eq!(clusters[0].first_line, 3);
    }

    #[test]
    fn test_voicing_folding_joins() {
        let mut engine = ClusterEngine::new(tolerance(CodaFolding::Voicing, 0, MatchPolicy::Representative));
        let a = engine.assign(0, &key("AE", &["T"]), 0);
        let b = engine.assign(1, &key("AE", &["D"]), 1);
        assert_eq!(a, b);
        let clusters = live(engine);
        assert_eq!(clusters[0].keys.len(), 2);
        assert_eq!(clusters[0].representative, key("AE", &["T"]));
    }

    #[test]
    fn test_representative_policy_bounds_drift() {
        // R-T ~ R (1 edit), R ~ R-D (1 edit), but R-T vs R-D-Z is 2 edits
        let t = tolerance(CodaFolding::Exact, 1, MatchPolicy::Representative);
        let mut engine = ClusterEngine::new(t);
        let a = engine.assign(0, &key("AA", &["R", "T"]), 0);
        let b = engine.assign(1, &key("AA", &["R"]), 1);
        let c = engine.assign(2, &key("AA", &["R", "D", "Z"]), 2);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_absorbed_key_matches_exactly() {
        // A key that joined by tolerance is itself an exact key afterwards
        let t = tolerance(CodaFolding::Exact, 1, MatchPolicy::Representative);
        let mut engine = ClusterEngine::new(t);
        let a = engine.assign(0, &key("AA", &["R", "T"]), 0);
        engine.assign(1, &key("AA", &["R"]), 1);
        let c = engine.assign(2, &key("AA", &["R"]), 2);
        assert_eq!(a, c);
        assert_eq!(live(engine)[0].members.len(), 3);
    }

    #[test]
    fn test_transitive_policy_merges_bridged_clusters() {
        let t = tolerance(CodaFolding::Exact, 1, MatchPolicy::Transitive);
        let mut engine = ClusterEngine::new(t);
        let first = engine.assign(0, &key("AA", &["R", "T", "S"]), 0);
        let second = engine.assign(1, &key("AA", &["L"]), 1);
        assert_ne!(first, second);
        // "R" is one edit from "R T" (first cluster) and from "L" (second)
        engine.assign(2, &key("AA", &["R", "T"]), 2);
        let bridged = engine.assign(3, &key("AA", &["R"]), 3);
        assert_eq!(bridged, first);

        let clusters = live(engine);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].id, 0);
        assert_eq!(clusters[0].members, vec![0, 1, 2, 3]);
        assert_eq!(clusters[0].first_line, 0);
    }

    #[test]
    fn test_merge_repoints_key_map() {
        let t = tolerance(CodaFolding::Exact, 1, MatchPolicy::Transitive);
        let mut engine = ClusterEngine::new(t);
        engine.assign(0, &key("IY", &["M", "Z"]), 0);
        engine.assign(1, &key("IY", &["K"]), 1);
        // "M" is one edit from "M Z" and from "K"
        engine.assign(2, &key("IY", &["M"]), 2);
        let again = engine.assign(3, &key("IY", &["K"]), 3);
        assert_eq!(again, 0);
        assert_eq!(engine.len(), 1);
    }

    #[test]
    fn test_nucleus_separates_clusters() {
        let t = tolerance(CodaFolding::Manner, 2, MatchPolicy::Transitive);
        let mut engine = ClusterEngine::new(t);
        let a = engine.assign(0, &key("AE", &["T"]), 0);
        let b = engine.assign(1, &key("EH", &["T"]), 0);
        assert_ne!(a, b);
    }

    #[test]
    fn test_find_cluster_sparse_ids() {
        let clusters = vec![
            RhymeCluster::new(0, key("AE", &["T"]), 0, 0),
            RhymeCluster::new(4, key("AY", &[]), 1, 1),
        ];
        assert_eq!(find_cluster(&clusters, 4).map(|c| c.id), Some(4));
        assert!(find_cluster(&clusters, 2).is_none());
    }
}
