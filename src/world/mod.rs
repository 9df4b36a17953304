// world/mod.rs
// Shared particle positions, population counters and the world lifecycle.
//
// Every particle owns one slot. Only the worker holding the slot's
// `SlotHandle` writes to it; everybody else reads. Each slot sits behind its
// own RwLock so a reader always sees a whole location, never half of an
// update. Reads across different slots are not synchronized with each other:
// a worker may see particle 3 before and particle 4 after their latest moves.

use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::SimError;
use crate::particle::{Location, ParticleType};
use crate::sync::StartupBarrier;
use crate::units;


#[derive(Debug, Default)]
struct Slot {
    location: RwLock<Location>,
    placed: AtomicBool,
    claimed: AtomicBool,
}

/// All particles of one type.
#[derive(Debug)]
pub struct Population {
    kind: ParticleType,
    charge: f64,
    slots: Vec<Slot>,
}

impl Population {
    fn allocate(kind: ParticleType, charge: f64, count: usize) -> Result<Self, SimError> {
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(count)
            .map_err(|_| SimError::Allocation {
                what: kind.name(),
                requested: count,
            })?;
        slots.extend((0..count).map(|_| Slot::default()));
        Ok(Self { kind, charge, slots })
    }

    pub fn kind(&self) -> ParticleType {
        self.kind
    }

    /// Charge shared by every member of the population.
    pub fn charge(&self) -> f64 {
        self.charge
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Visit every placed member with a consistent copy of its location.
    pub fn for_each_placed(&self, mut f: impl FnMut(usize, Location)) {
        for (index, slot) in self.slots.iter().enumerate() {
            if slot.placed.load(Ordering::Acquire) {
                f(index, *slot.location.read());
            }
        }
    }
}

/// Charges of the two populations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Charges {
    pub electron: f64,
    pub proton: f64,
}

impl Default for Charges {
    fn default() -> Self {
        Self {
            electron: units::ELECTRON_CHARGE,
            proton: units::PROTON_CHARGE,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AmountCounters {
    pub electrons: usize,
    pub protons: usize,
    pub total: usize,
    pub ready: usize,
}

/// One placed particle as seen at snapshot time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SnapshotEntry {
    pub kind: ParticleType,
    pub index: usize,
    pub charge: f64,
    pub location: Location,
}

/// Result of a successful placement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub location: Location,
    pub attempts: usize,
}

#[derive(Debug)]
pub struct World {
    electrons: Population,
    protons: Population,
    barrier: Arc<StartupBarrier>,
    placement: Mutex<()>,
}

impl World {
    /// Allocate both populations with the default elementary charges.
    pub fn initialize(
        electrons: usize,
        protons: usize,
        barrier: Arc<StartupBarrier>,
    ) -> Result<Arc<World>, SimError> {
        Self::initialize_with(electrons, protons, Charges::default(), barrier)
    }

    pub fn initialize_with(
        electrons: usize,
        protons: usize,
        charges: Charges,
        barrier: Arc<StartupBarrier>,
    ) -> Result<Arc<World>, SimError> {
        let total = checked_total(electrons, protons)?;
        if barrier.capacity() != total {
            return Err(SimError::BarrierMismatch {
                expected: total,
                barrier: barrier.capacity(),
            });
        }
        let world = World {
            electrons: Population::allocate(ParticleType::Electron, charges.electron, electrons)?,
            protons: Population::allocate(ParticleType::Proton, charges.proton, protons)?,
            barrier,
            placement: Mutex::new(()),
        };
        log::info!(
            "World initialized with {} electrons and {} protons",
            electrons,
            protons
        );
        Ok(Arc::new(world))
    }

    /// Release the world. Only the last handle may do this; every worker
    /// must have been joined first.
    pub fn shutdown(world: Arc<World>) -> Result<AmountCounters, SimError> {
        match Arc::try_unwrap(world) {
            Ok(world) => {
                let counters = world.counters();
                drop(world);
                log::info!("World shut down ({} particles released)", counters.total);
                Ok(counters)
            }
            Err(world) => Err(SimError::WorldInUse {
                handles: Arc::strong_count(&world) - 1,
            }),
        }
    }

    pub fn population(&self, kind: ParticleType) -> &Population {
        match kind {
            ParticleType::Electron => &self.electrons,
            ParticleType::Proton => &self.protons,
        }
    }

    pub fn barrier(&self) -> &Arc<StartupBarrier> {
        &self.barrier
    }

    pub fn counters(&self) -> AmountCounters {
        let electrons = self.electrons.len();
        let protons = self.protons.len();
        AmountCounters {
            electrons,
            protons,
            total: electrons + protons,
            ready: self.barrier.readiness(),
        }
    }

    fn slot(&self, kind: ParticleType, index: usize) -> Result<&Slot, SimError> {
        let population = self.population(kind);
        population.slots.get(index).ok_or(SimError::SlotOutOfRange {
            kind,
            index,
            len: population.len(),
        })
    }

    /// Take exclusive write access to one slot.
    pub fn claim(self: &Arc<Self>, kind: ParticleType, index: usize) -> Result<SlotHandle, SimError> {
        let slot = self.slot(kind, index)?;
        if slot.claimed.swap(true, Ordering::AcqRel) {
            return Err(SimError::SlotClaimed { kind, index });
        }
        Ok(SlotHandle {
            world: Arc::clone(self),
            kind,
            index,
        })
    }

    pub fn location(&self, kind: ParticleType, index: usize) -> Option<Location> {
        let slot = self.population(kind).slots.get(index)?;
        slot.placed
            .load(Ordering::Acquire)
            .then(|| *slot.location.read())
    }

    pub fn is_placed(&self, kind: ParticleType, index: usize) -> bool {
        self.population(kind)
            .slots
            .get(index)
            .map_or(false, |slot| slot.placed.load(Ordering::Acquire))
    }

    /// Copy every placed particle.
    pub fn snapshot(&self) -> Vec<SnapshotEntry> {
        let mut entries = Vec::with_capacity(self.electrons.len() + self.protons.len());
        for population in [&self.electrons, &self.protons] {
            population.for_each_placed(|index, location| {
                entries.push(SnapshotEntry {
                    kind: population.kind,
                    index,
                    charge: population.charge,
                    location,
                });
            });
        }
        entries
    }

    /// Whether `candidate` sits exactly on any placed particle other than
    /// (`kind`, `index`), scanning electrons first, then protons.
    fn coincides_with_placed(&self, kind: ParticleType, index: usize, candidate: &Location) -> bool {
        [&self.electrons, &self.protons].iter().any(|population| {
            population.slots.iter().enumerate().any(|(other, slot)| {
                if population.kind == kind && other == index {
                    return false;
                }
                slot.placed.load(Ordering::Acquire) && slot.location.read().coincides(candidate)
            })
        })
    }

    /// Draw locations from `sample` until one coincides with no placed
    /// particle, then commit it. The scan and the commit happen under one
    /// lock so two placers cannot both claim the same point.
    fn place_slot(
        &self,
        kind: ParticleType,
        index: usize,
        max_attempts: usize,
        mut sample: impl FnMut() -> Location,
    ) -> Result<Placement, SimError> {
        let _guard = self.placement.lock();
        let mut attempts = 0;
        loop {
            if attempts >= max_attempts {
                return Err(SimError::PlacementExhausted {
                    kind,
                    index,
                    attempts,
                });
            }
            attempts += 1;
            let candidate = sample();
            if !self.coincides_with_placed(kind, index, &candidate) {
                let slot = self.slot(kind, index)?;
                *slot.location.write() = candidate;
                slot.placed.store(true, Ordering::Release);
                return Ok(Placement {
                    location: candidate,
                    attempts,
                });
            }
        }
    }
}

/// Population total, or `Allocation` when the counts cannot even be added.
pub(crate) fn checked_total(electrons: usize, protons: usize) -> Result<usize, SimError> {
    electrons
        .checked_add(protons)
        .ok_or(SimError::Allocation {
            what: "particles",
            requested: usize::MAX,
        })
}

/// Write access to a single slot. Dropping it releases the claim.
#[derive(Debug)]
pub struct SlotHandle {
    world: Arc<World>,
    kind: ParticleType,
    index: usize,
}

impl SlotHandle {
    pub fn kind(&self) -> ParticleType {
        self.kind
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn world(&self) -> &Arc<World> {
        &self.world
    }

    fn slot(&self) -> &Slot {
        // Index was validated when the handle was claimed.
        &self.world.population(self.kind).slots[self.index]
    }

    pub fn location(&self) -> Location {
        *self.slot().location.read()
    }

    pub fn is_placed(&self) -> bool {
        self.slot().placed.load(Ordering::Acquire)
    }

    /// Find a free location for this particle and publish it. See
    /// [`World`] for the placement rules.
    pub fn place(
        &self,
        max_attempts: usize,
        sample: impl FnMut() -> Location,
    ) -> Result<Placement, SimError> {
        self.world.place_slot(self.kind, self.index, max_attempts, sample)
    }

    /// Publish a new location for this particle.
    pub fn commit(&self, location: Location) {
        *self.slot().location.write() = location;
    }
}

impl Drop for SlotHandle {
    fn drop(&mut self) {
        self.slot().claimed.store(false, Ordering::Release);
    }
}
