//! The six-pass diff engine over two extracted symbol sets.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::differ::changes::{Change, ChangeKind, Confidence};
use crate::types::{FuncSigMap, FuncSignature, Symbol, SymbolKey, SymbolKind, Symbols};

/// Minimum normalized Levenshtein similarity for fuzzy rename matching.
pub const MIN_NAME_SIMILARITY: f64 = 0.7;

/// Minimum Jaccard overlap on parameter types for fuzzy rename matching.
pub const MIN_PARAM_OVERLAP: f64 = 0.8;

/// Name length below which stricter name similarity is required.
pub const SHORT_NAME_LENGTH: usize = 4;

/// The stricter similarity threshold for names shorter than [`SHORT_NAME_LENGTH`].
pub const SHORT_NAME_MIN_SIMILARITY: f64 = 0.85;

/// Working state shared by all diff passes.
///
/// Emission order within each pass follows the OLD entry list (or sorted
/// group-key order for the grouped pass), so identical inputs produce
/// byte-identical output across runs.
struct DiffState<'a> {
    old_by_key: HashMap<SymbolKey, &'a Symbol>,
    new_by_key: HashMap<SymbolKey, &'a Symbol>,
    unmatched_old: HashSet<SymbolKey>,
    unmatched_new: HashSet<SymbolKey>,
    old_order: Vec<SymbolKey>,
    new_order: Vec<SymbolKey>,
    old_sigs: &'a FuncSigMap,
    new_sigs: &'a FuncSigMap,
    type_renames: HashMap<String, String>,
    changes: Vec<Change>,
}

/// Grouping key for the exact-signature rename pass. A composite record
/// rather than a delimited string, so signatures containing any delimiter
/// cannot collide.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct SigGroupKey {
    signature: String,
    kind: SymbolKind,
    package: String,
}

/// A candidate fuzzy match with its composite score.
struct ScoredPair {
    old_key: SymbolKey,
    new_key: SymbolKey,
    score: f64,
    old_name: String,
}

impl<'a> DiffState<'a> {
    fn new(
        old: &'a Symbols,
        new: &'a Symbols,
        old_sigs: &'a FuncSigMap,
        new_sigs: &'a FuncSigMap,
    ) -> Self {
        let mut s = DiffState {
            old_by_key: HashMap::with_capacity(old.entries.len()),
            new_by_key: HashMap::with_capacity(new.entries.len()),
            unmatched_old: HashSet::with_capacity(old.entries.len()),
            unmatched_new: HashSet::with_capacity(new.entries.len()),
            old_order: Vec::with_capacity(old.entries.len()),
            new_order: Vec::with_capacity(new.entries.len()),
            old_sigs,
            new_sigs,
            type_renames: HashMap::new(),
            changes: Vec::new(),
        };
        for sym in &old.entries {
            let key = sym.key();
            s.old_by_key.insert(key.clone(), sym);
            s.unmatched_old.insert(key.clone());
            s.old_order.push(key);
        }
        for sym in &new.entries {
            let key = sym.key();
            s.new_by_key.insert(key.clone(), sym);
            s.unmatched_new.insert(key.clone());
            s.new_order.push(key);
        }
        s
    }

    fn mark_matched(&mut self, old_key: &SymbolKey, new_key: &SymbolKey) {
        self.unmatched_old.remove(old_key);
        self.unmatched_new.remove(new_key);
    }

    /// Unmatched old keys in original entry order.
    fn unmatched_old_keys(&self) -> Vec<SymbolKey> {
        self.old_order
            .iter()
            .filter(|k| self.unmatched_old.contains(*k))
            .cloned()
            .collect()
    }

    /// Unmatched new keys in original entry order.
    fn unmatched_new_keys(&self) -> Vec<SymbolKey> {
        self.new_order
            .iter()
            .filter(|k| self.unmatched_new.contains(*k))
            .cloned()
            .collect()
    }

    // Pass 1: exact matches (same key, same signature) are silently consumed.
    fn exact_match(&mut self) {
        for key in self.unmatched_old_keys() {
            let Some(&new_sym) = self.new_by_key.get(&key) else {
                continue;
            };
            if self.old_by_key[&key].signature == new_sym.signature {
                self.mark_matched(&key, &key);
            }
        }
    }

    // Pass 2: same-key signature changes and cross-kind type changes.
    fn changed(&mut self) {
        // Part A: same key, different signature.
        for key in self.unmatched_old_keys() {
            let Some(&new_sym) = self.new_by_key.get(&key) else {
                continue;
            };
            let old_sym = self.old_by_key[&key];
            if old_sym.signature == new_sym.signature {
                continue;
            }

            let kind = match old_sym.kind {
                SymbolKind::Type | SymbolKind::Interface => ChangeKind::TypeChanged,
                _ => ChangeKind::SignatureChanged,
            };

            let change = Change {
                kind,
                symbol: old_sym.name.clone(),
                package: old_sym.package.clone(),
                old_signature: old_sym.signature.clone(),
                new_signature: new_sym.signature.clone(),
                new_name: String::new(),
                new_package: String::new(),
                confidence: Confidence::High,
            };
            self.changes.push(change);
            self.mark_matched(&key, &key);
        }

        // Part B: cross-kind changes (same name+package, different kind).
        let mut old_by_name: BTreeMap<(String, String), SymbolKey> = BTreeMap::new();
        for key in self.unmatched_old_keys() {
            old_by_name.insert((key.package.clone(), key.name.clone()), key);
        }

        let mut new_by_name: HashMap<(String, String), SymbolKey> = HashMap::new();
        for key in self.unmatched_new_keys() {
            new_by_name.insert((key.package.clone(), key.name.clone()), key);
        }

        for (nk, old_key) in &old_by_name {
            let Some(new_key) = new_by_name.get(nk) else {
                continue;
            };
            if old_key.kind == new_key.kind {
                continue;
            }

            let old_sym = self.old_by_key[old_key];
            let new_sym = self.new_by_key[new_key];

            self.changes.push(Change {
                kind: ChangeKind::TypeChanged,
                symbol: old_sym.name.clone(),
                package: old_sym.package.clone(),
                old_signature: old_sym.signature.clone(),
                new_signature: new_sym.signature.clone(),
                new_name: String::new(),
                new_package: String::new(),
                confidence: Confidence::High,
            });
            self.mark_matched(old_key, new_key);
        }
    }

    // Pass 3: exact-signature renames (unique 1:1 mapping by signature,
    // kind, and package). Also records type renames for Pass 4.
    fn renamed(&mut self) {
        let mut removed_by_sig: BTreeMap<SigGroupKey, Vec<SymbolKey>> = BTreeMap::new();
        for key in self.unmatched_old_keys() {
            let sym = self.old_by_key[&key];
            let gk = SigGroupKey {
                signature: sym.signature.clone(),
                kind: sym.kind,
                package: sym.package.clone(),
            };
            removed_by_sig.entry(gk).or_default().push(key);
        }

        let mut added_by_sig: HashMap<SigGroupKey, Vec<SymbolKey>> = HashMap::new();
        for key in self.unmatched_new_keys() {
            let sym = self.new_by_key[&key];
            let gk = SigGroupKey {
                signature: sym.signature.clone(),
                kind: sym.kind,
                package: sym.package.clone(),
            };
            added_by_sig.entry(gk).or_default().push(key);
        }

        for (gk, old_keys) in &removed_by_sig {
            let Some(new_keys) = added_by_sig.get(gk) else {
                continue;
            };

            // Collision on either side: defer to the fuzzy pass.
            if old_keys.len() > 1 || new_keys.len() > 1 {
                continue;
            }

            let old_key = &old_keys[0];
            let new_key = &new_keys[0];
            let old_sym = self.old_by_key[old_key];
            let new_sym = self.new_by_key[new_key];

            // Trivial-signature guard: skip empty or "()" signatures.
            if old_sym.signature.is_empty() || old_sym.signature == "()" {
                continue;
            }

            self.changes.push(Change {
                kind: ChangeKind::Renamed,
                symbol: old_sym.name.clone(),
                package: old_sym.package.clone(),
                old_signature: old_sym.signature.clone(),
                new_signature: new_sym.signature.clone(),
                new_name: new_sym.name.clone(),
                new_package: String::new(),
                confidence: Confidence::High,
            });

            if old_sym.kind == SymbolKind::Type || old_sym.kind == SymbolKind::Interface {
                self.type_renames
                    .insert(old_sym.name.clone(), new_sym.name.clone());
            }

            self.mark_matched(old_key, new_key);
        }
    }

    // Pass 4: correlate methods and fields whose receiver type was renamed.
    fn correlate_members(&mut self) {
        if self.type_renames.is_empty() {
            return;
        }

        for old_key in self.unmatched_old_keys() {
            let old_sym = self.old_by_key[&old_key];

            if old_sym.kind != SymbolKind::Method && old_sym.kind != SymbolKind::Field {
                continue;
            }

            let Some((receiver, member)) = old_sym.name.split_once('.') else {
                continue;
            };
            let Some(new_receiver) = self.type_renames.get(receiver) else {
                continue;
            };

            let probe = SymbolKey {
                package: old_sym.package.clone(),
                kind: old_sym.kind,
                name: format!("{}.{}", new_receiver, member),
            };
            if !self.unmatched_new.contains(&probe) {
                continue;
            }

            let new_sym = self.new_by_key[&probe];
            let change = if old_sym.signature == new_sym.signature {
                Change {
                    kind: ChangeKind::Renamed,
                    symbol: old_sym.name.clone(),
                    package: old_sym.package.clone(),
                    old_signature: old_sym.signature.clone(),
                    new_signature: new_sym.signature.clone(),
                    new_name: new_sym.name.clone(),
                    new_package: String::new(),
                    confidence: Confidence::High,
                }
            } else {
                Change {
                    kind: ChangeKind::SignatureChanged,
                    symbol: old_sym.name.clone(),
                    package: old_sym.package.clone(),
                    old_signature: old_sym.signature.clone(),
                    new_signature: new_sym.signature.clone(),
                    new_name: String::new(),
                    new_package: String::new(),
                    confidence: Confidence::High,
                }
            };
            self.changes.push(change);
            self.mark_matched(&old_key, &probe);
        }
    }

    // Pass 5: fuzzy matching for functions and methods using name
    // similarity and parameter-type overlap.
    fn fuzzy_match(&mut self) {
        let old_func_keys: Vec<SymbolKey> = self
            .unmatched_old_keys()
            .into_iter()
            .filter(|k| self.old_sigs.contains_key(k))
            .collect();
        let new_func_keys: Vec<SymbolKey> = self
            .unmatched_new_keys()
            .into_iter()
            .filter(|k| self.new_sigs.contains_key(k))
            .collect();

        if old_func_keys.is_empty() || new_func_keys.is_empty() {
            return;
        }

        let mut candidates = Vec::new();
        for old_key in &old_func_keys {
            let old_sym = self.old_by_key[old_key];
            let old_sig = &self.old_sigs[old_key];

            for new_key in &new_func_keys {
                let new_sym = self.new_by_key[new_key];
                let new_sig = &self.new_sigs[new_key];

                let name_sim = name_similarity(&old_sym.name, &new_sym.name);
                let overlap = param_overlap(old_sig, new_sig);

                // Short-name guard: stricter threshold below the length cutoff.
                let max_len = old_sym.name.len().max(new_sym.name.len());
                let name_threshold = if max_len < SHORT_NAME_LENGTH {
                    SHORT_NAME_MIN_SIMILARITY
                } else {
                    MIN_NAME_SIMILARITY
                };

                if name_sim >= name_threshold && overlap >= MIN_PARAM_OVERLAP {
                    candidates.push(ScoredPair {
                        old_key: old_key.clone(),
                        new_key: new_key.clone(),
                        score: name_sim * overlap,
                        old_name: old_sym.name.clone(),
                    });
                }
            }
        }

        // Descending score, tie-break lexicographically by old name.
        candidates.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.old_name.cmp(&b.old_name))
        });

        // Greedy matching.
        for pair in candidates {
            if !self.unmatched_old.contains(&pair.old_key)
                || !self.unmatched_new.contains(&pair.new_key)
            {
                continue;
            }

            let old_sym = self.old_by_key[&pair.old_key];
            let new_sym = self.new_by_key[&pair.new_key];

            self.changes.push(Change {
                kind: ChangeKind::Renamed,
                symbol: old_sym.name.clone(),
                package: old_sym.package.clone(),
                old_signature: old_sym.signature.clone(),
                new_signature: new_sym.signature.clone(),
                new_name: new_sym.name.clone(),
                new_package: String::new(),
                confidence: Confidence::Medium,
            });
            self.mark_matched(&pair.old_key, &pair.new_key);
        }
    }

    // Pass 6: every remaining unmatched old symbol is classified as removed.
    fn leftovers(&mut self) {
        for key in self.unmatched_old_keys() {
            let old_sym = self.old_by_key[&key];
            self.changes.push(Change {
                kind: ChangeKind::Removed,
                symbol: old_sym.name.clone(),
                package: old_sym.package.clone(),
                old_signature: old_sym.signature.clone(),
                new_signature: String::new(),
                new_name: String::new(),
                new_package: String::new(),
                confidence: Confidence::Low,
            });
        }
    }
}

/// Compare two symbol sets and classify every breaking change with a
/// confidence level.
///
/// Runs six passes over shared match state: exact match, changed,
/// exact-signature renames, member correlation through type renames,
/// fuzzy matching, leftovers. Added exports are never reported. The
/// function is infallible and purely a function of its four inputs.
pub fn diff_exports(
    old: &Symbols,
    new: &Symbols,
    old_sigs: &FuncSigMap,
    new_sigs: &FuncSigMap,
) -> Vec<Change> {
    let mut state = DiffState::new(old, new, old_sigs, new_sigs);
    state.exact_match();
    state.changed();
    state.renamed();
    state.correlate_members();
    state.fuzzy_match();
    state.leftovers();
    state.changes
}

/// Edit distance between two byte strings, two-row dynamic programming.
fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a = a.as_bytes();
    let b = b.as_bytes();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Normalized Levenshtein similarity in [0.0, 1.0]; 1.0 means identical.
/// Two empty strings are identical.
fn name_similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let max_len = a.len().max(b.len());
    1.0 - levenshtein_distance(a, b) as f64 / max_len as f64
}

/// Multiset Jaccard similarity of the combined parameter and result type
/// lists: sum of min counts over sum of max counts. Vacuously 1.0 when
/// both sides are empty.
fn param_overlap(a: &FuncSignature, b: &FuncSignature) -> f64 {
    let total_a = a.params.len() + a.results.len();
    let total_b = b.params.len() + b.results.len();

    if total_a == 0 && total_b == 0 {
        return 1.0;
    }

    let mut a_counts: HashMap<&str, usize> = HashMap::with_capacity(total_a);
    for t in a.params.iter().chain(a.results.iter()) {
        *a_counts.entry(t.as_str()).or_insert(0) += 1;
    }

    let mut b_counts: HashMap<&str, usize> = HashMap::with_capacity(total_b);
    for t in b.params.iter().chain(b.results.iter()) {
        *b_counts.entry(t.as_str()).or_insert(0) += 1;
    }

    let mut intersection = 0usize;
    let mut union = 0usize;
    for (t, &ac) in &a_counts {
        let bc = b_counts.get(t).copied().unwrap_or(0);
        intersection += ac.min(bc);
        union += ac.max(bc);
    }
    for (t, &bc) in &b_counts {
        if !a_counts.contains_key(t) {
            union += bc;
        }
    }

    if union == 0 {
        return 1.0;
    }
    intersection as f64 / union as f64
}
