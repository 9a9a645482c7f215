use std::collections::HashMap;

/// Anything the diversity layer can bucket
pub trait Diversifiable {
    fn diversity_category(&self) -> &str;
    fn diversity_type(&self) -> &str;
}

/// Diversity Layer - category/type capped selection
///
/// Walks a list already sorted by score and greedily accepts items whose
/// category and type are still under their caps. If that yields fewer than
/// `limit` items, the best remaining items fill the gap regardless of caps.
/// The selection keeps its ranked order.
#[derive(Debug, Clone)]
pub struct DiversityLayer {
    max_per_category: usize,
    max_per_type: usize,
}

impl Default for DiversityLayer {
    fn default() -> Self {
        Self::new(3, 2)
    }
}

impl DiversityLayer {
    pub fn new(max_per_category: usize, max_per_type: usize) -> Self {
        Self {
            max_per_category,
            max_per_type,
        }
    }

    pub fn select<T: Diversifiable>(&self, ranked: Vec<T>, limit: usize) -> Vec<T> {
        if ranked.is_empty() || limit == 0 {
            return Vec::new();
        }

        let mut accepted = vec![false; ranked.len()];
        let mut accepted_count = 0;

        {
            let mut category_counts: HashMap<&str, usize> = HashMap::new();
            let mut type_counts: HashMap<&str, usize> = HashMap::new();

            for (i, item) in ranked.iter().enumerate() {
                if accepted_count >= limit {
                    break;
                }

                let category = item.diversity_category();
                let kind = item.diversity_type();
                let category_used = category_counts.get(category).copied().unwrap_or(0);
                let type_used = type_counts.get(kind).copied().unwrap_or(0);

                if category_used < self.max_per_category && type_used < self.max_per_type {
                    *category_counts.entry(category).or_insert(0) += 1;
                    *type_counts.entry(kind).or_insert(0) += 1;
                    accepted[i] = true;
                    accepted_count += 1;
                }
            }
        }

        // Backfill with the highest-ranked leftovers
        for flag in accepted.iter_mut() {
            if accepted_count >= limit {
                break;
            }
            if !*flag {
                *flag = true;
                accepted_count += 1;
            }
        }

        ranked
            .into_iter()
            .zip(accepted)
            .filter_map(|(item, keep)| keep.then_some(item))
            .collect()
    }
}
