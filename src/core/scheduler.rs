/// Fill-order scheduler: randomized topological traversal of the
/// dependency graph.
///
/// Blanks with no noun dependencies start out ready. Each step picks a
/// ready blank uniformly at random; once its bound noun is produced, any
/// dependent whose nouns are now all met becomes ready. Blanks left over
/// when nothing is ready sit on a noun cycle.

use rand::Rng;
use rustc_hash::FxHashSet;
use thiserror::Error;

use super::edition::Edition;
use crate::schema::segment::FillableId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("{} blank(s) could not be scheduled because of a noun cycle: {stuck:?}", .stuck.len())]
    CyclicDependency {
        /// The order produced before the traversal got stuck.
        scheduled: Vec<FillableId>,
        /// Blanks whose dependencies were never met.
        stuck: Vec<FillableId>,
    },
}

/// Produce a randomized order over every fillable segment in `edition`
/// such that each blank comes after the producers of all nouns it
/// references.
///
/// Does not touch the edition; call once per play session for a fresh
/// order.
pub fn random_fill_order<R: Rng + ?Sized>(
    edition: &Edition,
    rng: &mut R,
) -> Result<Vec<FillableId>, ScheduleError> {
    let fillables = edition.fillable_segments();

    let mut ready: Vec<FillableId> = Vec::new();
    let mut pending: FxHashSet<FillableId> = FxHashSet::default();
    for (index, fillable) in fillables.iter().enumerate() {
        if fillable.noun_dependencies.is_empty() {
            ready.push(FillableId(index));
        } else {
            pending.insert(FillableId(index));
        }
    }

    let mut met_nouns: FxHashSet<&str> = FxHashSet::default();
    let mut order = Vec::with_capacity(fillables.len());

    while !ready.is_empty() {
        let pick = rng.gen_range(0..ready.len());
        let id = ready.swap_remove(pick);
        order.push(id);

        let current = fillables[id.0];
        let Some(noun) = current.bound_noun() else {
            continue;
        };
        met_nouns.insert(noun);

        for &dependent in current.dependents() {
            if !pending.contains(&dependent) {
                continue;
            }
            let met = fillables[dependent.0]
                .noun_dependencies
                .iter()
                .all(|dep| met_nouns.contains(dep.as_str()));
            if met {
                pending.remove(&dependent);
                ready.push(dependent);
            }
        }
    }

    if pending.is_empty() {
        return Ok(order);
    }

    let mut stuck: Vec<FillableId> = pending.into_iter().collect();
    stuck.sort_unstable();
    tracing::warn!(
        name = %edition.name(),
        stuck = ?stuck,
        "not every blank could be scheduled; noun references form a cycle"
    );
    Err(ScheduleError::CyclicDependency {
        scheduled: order,
        stuck,
    })
}
