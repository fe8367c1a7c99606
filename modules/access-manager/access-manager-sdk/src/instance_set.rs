//! Lazily evaluated, filterable collections of entity instances.

use std::fmt;
use std::sync::Arc;

use access_security::{Filter, Record};

use crate::entity::EntityType;

/// A lazily evaluated, filterable collection of instances of one entity type.
///
/// Cloning must be cheap: the manager clones its base set for every call.
/// `filter`/`exclude` only narrow, so any composition of them returns a
/// subset of the input, which is what every `apply` must guarantee.
pub trait InstanceSet: Clone + Send + Sync + 'static {
    type Record;

    fn entity(&self) -> &EntityType;

    /// A copy of this set keeping everything it currently holds.
    ///
    /// The "allow everything" answer of an apply rule.
    #[must_use]
    fn all(&self) -> Self;

    /// The empty set.
    #[must_use]
    fn none(&self) -> Self;

    /// Keep instances matching `filter`.
    #[must_use]
    fn filter(&self, filter: Filter) -> Self;

    /// Drop instances matching `filter`.
    #[must_use]
    fn exclude(&self, filter: Filter) -> Self;

    /// Evaluate the set.
    fn fetch(&self) -> Vec<Self::Record>;

    fn count(&self) -> usize {
        self.fetch().len()
    }

    fn is_empty(&self) -> bool {
        self.count() == 0
    }
}

#[derive(Clone, Debug)]
enum Step {
    Keep(Filter),
    Drop(Filter),
}

/// In-memory [`InstanceSet`] over a shared snapshot of records.
///
/// Filters accumulate and are evaluated on [`fetch`](InstanceSet::fetch).
pub struct MemorySet<R> {
    entity: EntityType,
    records: Arc<Vec<R>>,
    steps: Vec<Step>,
    empty: bool,
}

impl<R> MemorySet<R> {
    #[must_use]
    pub fn new(entity: EntityType, records: Vec<R>) -> Self {
        Self::from_shared(entity, Arc::new(records))
    }

    #[must_use]
    pub fn from_shared(entity: EntityType, records: Arc<Vec<R>>) -> Self {
        Self {
            entity,
            records,
            steps: Vec::new(),
            empty: false,
        }
    }

    fn with_step(&self, step: Step) -> Self {
        let mut steps = self.steps.clone();
        steps.push(step);
        Self {
            entity: self.entity.clone(),
            records: Arc::clone(&self.records),
            steps,
            empty: self.empty,
        }
    }

    fn admits(&self, record: &R) -> bool
    where
        R: Record,
    {
        !self.empty
            && self.steps.iter().all(|step| match step {
                Step::Keep(f) => f.matches(record),
                Step::Drop(f) => !f.matches(record),
            })
    }
}

impl<R> Clone for MemorySet<R> {
    fn clone(&self) -> Self {
        Self {
            entity: self.entity.clone(),
            records: Arc::clone(&self.records),
            steps: self.steps.clone(),
            empty: self.empty,
        }
    }
}

impl<R> fmt::Debug for MemorySet<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemorySet")
            .field("entity", &self.entity)
            .field("records", &self.records.len())
            .field("steps", &self.steps)
            .field("empty", &self.empty)
            .finish()
    }
}

impl<R> InstanceSet for MemorySet<R>
where
    R: Record + Clone + Send + Sync + 'static,
{
    type Record = R;

    fn entity(&self) -> &EntityType {
        &self.entity
    }

    fn all(&self) -> Self {
        self.clone()
    }

    fn none(&self) -> Self {
        Self {
            entity: self.entity.clone(),
            records: Arc::clone(&self.records),
            steps: Vec::new(),
            empty: true,
        }
    }

    fn filter(&self, filter: Filter) -> Self {
        self.with_step(Step::Keep(filter))
    }

    fn exclude(&self, filter: Filter) -> Self {
        self.with_step(Step::Drop(filter))
    }

    fn fetch(&self) -> Vec<R> {
        self.records
            .iter()
            .filter(|r| self.admits(r))
            .cloned()
            .collect()
    }

    fn count(&self) -> usize {
        self.records.iter().filter(|r| self.admits(r)).count()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use access_security::FilterValue;

    #[derive(Clone, Debug, PartialEq)]
    struct Item {
        id: i64,
        tag: &'static str,
    }

    impl Record for Item {
        fn resolve_property(&self, property: &str) -> Vec<FilterValue> {
            match property {
                "id" => vec![self.id.into()],
                "tag" => vec![self.tag.into()],
                _ => Vec::new(),
            }
        }
    }

    fn set() -> MemorySet<Item> {
        MemorySet::new(
            EntityType::new("shop", "item"),
            vec![
                Item { id: 1, tag: "a" },
                Item { id: 2, tag: "b" },
                Item { id: 3, tag: "a" },
            ],
        )
    }

    #[test]
    fn filter_and_exclude_narrow() {
        let s = set().filter(Filter::eq("tag", "a"));
        assert_eq!(s.count(), 2);

        let s = s.exclude(Filter::eq("id", 1_i64));
        assert_eq!(s.fetch(), vec![Item { id: 3, tag: "a" }]);
    }

    #[test]
    fn none_is_empty_and_stays_empty() {
        let s = set().none();
        assert!(s.is_empty());
        assert!(s.filter(Filter::all(vec![])).is_empty());
    }

    #[test]
    fn all_keeps_accumulated_filters() {
        let s = set().filter(Filter::eq("tag", "a"));
        assert_eq!(s.all().count(), 2);
        assert!(s.none().all().is_empty());
    }

    #[test]
    fn filtering_does_not_affect_the_source() {
        let base = set();
        let _narrowed = base.filter(Filter::eq("tag", "b"));
        assert_eq!(base.count(), 3);
        assert_eq!(base.entity(), &EntityType::new("shop", "item"));
    }
}
