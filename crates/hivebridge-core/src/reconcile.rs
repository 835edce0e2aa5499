// ── Accessory cache reconciliation ──
//
// Maps a live list of remote entities onto the registry's cached
// accessories: unknown identities are created, known identities with a
// matching serial are updated in place, and a cached accessory whose
// stored serial disagrees with the live one occupying its identity
// slot is removed before the replacement is created.
//
// Absence is not removal: a cached accessory missing from the latest
// remote list stays registered. A device that skips a poll cycle is
// treated as transiently disconnected, not deregistered.

use tracing::{debug, info};
use uuid::Uuid;

use crate::identity;
use crate::registry::{Accessory, AccessoryRegistry};

/// A remote entity eligible for reconciliation.
pub trait RemoteEntity {
    /// Stable serial the identity is derived from.
    fn serial(&self) -> &str;

    /// Display name for a freshly created accessory.
    fn display_name(&self) -> String;

    fn identity(&self) -> Uuid {
        identity::for_serial(self.serial())
    }
}

/// The decisions of one reconciliation pass. Pure data: the caller
/// applies it to the registry.
#[derive(Debug)]
pub struct ReconcilePlan<'a, E> {
    pub create: Vec<&'a E>,
    pub update: Vec<(&'a Accessory, &'a E)>,
    pub remove: Vec<&'a Accessory>,
}

impl<E> ReconcilePlan<'_, E> {
    pub fn is_empty(&self) -> bool {
        self.create.is_empty() && self.update.is_empty() && self.remove.is_empty()
    }
}

/// Partition `remote` against `cached`.
///
/// Deterministic: identical inputs always produce identical plans.
/// Every remote entity lands in exactly one of create/update; remove
/// only ever accompanies a create for the same identity slot (the
/// serial-mismatch case, which only occurs when the cache file was
/// edited or corrupted outside this process).
pub fn reconcile<'a, E: RemoteEntity>(
    remote: &'a [E],
    cached: &'a [Accessory],
) -> ReconcilePlan<'a, E> {
    let mut plan = ReconcilePlan {
        create: Vec::new(),
        update: Vec::new(),
        remove: Vec::new(),
    };

    for entity in remote {
        let id = entity.identity();
        match cached.iter().find(|a| a.id == id) {
            None => plan.create.push(entity),
            Some(existing) if existing.serial() == entity.serial() => {
                plan.update.push((existing, entity));
            }
            Some(stale) => {
                // Identity slot collision: the cached serial no longer
                // matches what the slot's identity was derived from.
                plan.remove.push(stale);
                plan.create.push(entity);
            }
        }
    }

    plan
}

/// Apply a plan to the registry, returning the resulting accessory set
/// for the platform's own bookkeeping.
///
/// Removals are applied before creations so an identity slot is never
/// registered twice within the pass; everything settles before this
/// function returns, and the single poll task never observes a
/// half-applied registry.
pub fn apply_plan<E: RemoteEntity>(
    plan: ReconcilePlan<'_, E>,
    registry: &dyn AccessoryRegistry,
    make: impl Fn(&E) -> Accessory,
) -> Vec<Accessory> {
    let mut result = Vec::with_capacity(plan.create.len() + plan.update.len());

    if !plan.remove.is_empty() {
        info!(count = plan.remove.len(), "removing stale accessories");
        registry.unregister(plan.remove.into_iter().cloned().collect());
    }

    let updated: Vec<Accessory> = plan.update.iter().map(|(_, e)| make(e)).collect();
    if !updated.is_empty() {
        debug!(count = updated.len(), "refreshing cached accessories");
        registry.update(updated.clone());
        result.extend(updated);
    }

    let created: Vec<Accessory> = plan.create.iter().map(|e| make(e)).collect();
    if !created.is_empty() {
        for accessory in &created {
            info!(name = %accessory.display_name, serial = %accessory.serial(), "adding new accessory");
        }
        registry.register(created.clone());
        result.extend(created);
    }

    result
}
