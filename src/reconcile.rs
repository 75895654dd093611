//! The reconciliation driver: apply the resolver to an ordered spec list.

use tracing::info;

use crate::error::DfiError;
use crate::link::LinkSpec;
use crate::resolve::{ResolutionOutcome, ResolveOptions, resolve};

/// Reconcile every spec in input order, independently.
///
/// The caller guarantees the sequence is already deduplicated by link path
/// (first occurrence wins upstream). Non-fatal outcomes for one spec never
/// affect the next; the first fatal error aborts the run with no further
/// specs processed.
///
/// # Errors
///
/// Propagates the first [`DfiError`] raised by the resolver.
pub fn reconcile(
    specs: &[LinkSpec],
    opts: &ResolveOptions,
) -> Result<Vec<ResolutionOutcome>, DfiError> {
    let mut outcomes = Vec::with_capacity(specs.len());
    for spec in specs {
        outcomes.push(resolve(spec, opts)?);
    }

    let created = count(&outcomes, |o| matches!(o, ResolutionOutcome::Created));
    let already_ok = count(&outcomes, |o| {
        matches!(o, ResolutionOutcome::AlreadyCorrect)
    });
    let backed_up = count(&outcomes, |o| {
        matches!(o, ResolutionOutcome::BackedUp { .. })
    });
    let replaced = count(&outcomes, |o| matches!(o, ResolutionOutcome::Replaced));
    let skipped = count(&outcomes, |o| matches!(o, ResolutionOutcome::Skipped { .. }));
    info!(
        "{created} created, {already_ok} already ok, {backed_up} backed up, \
         {replaced} replaced, {skipped} skipped"
    );

    Ok(outcomes)
}

fn count(outcomes: &[ResolutionOutcome], pred: impl Fn(&ResolutionOutcome) -> bool) -> usize {
    outcomes.iter().filter(|o| pred(o)).count()
}
