//! Resource kinds and the resource ledger.
//!
//! This module contains:
//! - The `Resource` enum (every kind the board can produce)
//! - `ResourceLedger`, a fixed-key count per resource kind that can never go negative
//! - `LedgerError` for subtractions that would overdraw a balance

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::AddAssign;
use thiserror::Error;

/// Resource kinds produced by tiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Resource {
    Clay,
    Lumber,
    Ore,
    Grain,
    Wool,
}

impl Resource {
    /// All resource types
    pub const ALL: [Resource; 5] = [
        Resource::Clay,
        Resource::Lumber,
        Resource::Ore,
        Resource::Grain,
        Resource::Wool,
    ];
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Resource::Clay => "Clay",
            Resource::Lumber => "Lumber",
            Resource::Ore => "Ore",
            Resource::Grain => "Grain",
            Resource::Wool => "Wool",
        };
        f.write_str(name)
    }
}

/// Errors raised when a ledger operation would break the non-negative invariant
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("cannot remove {requested} {resource}: only {available} available")]
    Insufficient {
        resource: Resource,
        requested: u32,
        available: u32,
    },
}

/// Count of every resource kind.
///
/// Every kind is always present (zero by default). Subtraction never clamps:
/// an operation that would leave a negative balance fails and leaves the
/// ledger untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceLedger {
    clay: u32,
    lumber: u32,
    ore: u32,
    grain: u32,
    wool: u32,
}

impl ResourceLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger from `(kind, amount)` pairs; repeated kinds accumulate
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Resource, u32)>,
    {
        let mut ledger = Self::new();
        for (resource, amount) in pairs {
            ledger.add(resource, amount);
        }
        ledger
    }

    /// A ledger holding `amount` of a single kind
    pub fn single(resource: Resource, amount: u32) -> Self {
        Self::from_pairs([(resource, amount)])
    }

    /// One unit per listed kind; repeated kinds count once per occurrence
    pub fn one_each(resources: &[Resource]) -> Self {
        Self::from_pairs(resources.iter().map(|&r| (r, 1)))
    }

    /// Get count of a specific resource
    pub fn get(&self, resource: Resource) -> u32 {
        match resource {
            Resource::Clay => self.clay,
            Resource::Lumber => self.lumber,
            Resource::Ore => self.ore,
            Resource::Grain => self.grain,
            Resource::Wool => self.wool,
        }
    }

    fn slot(&mut self, resource: Resource) -> &mut u32 {
        match resource {
            Resource::Clay => &mut self.clay,
            Resource::Lumber => &mut self.lumber,
            Resource::Ore => &mut self.ore,
            Resource::Grain => &mut self.grain,
            Resource::Wool => &mut self.wool,
        }
    }

    /// Add `amount` of a resource
    pub fn add(&mut self, resource: Resource, amount: u32) {
        *self.slot(resource) += amount;
    }

    /// Remove `amount` of a resource, failing if the balance is too small
    pub fn subtract(&mut self, resource: Resource, amount: u32) -> Result<(), LedgerError> {
        let available = self.get(resource);
        if available < amount {
            return Err(LedgerError::Insufficient {
                resource,
                requested: amount,
                available,
            });
        }
        *self.slot(resource) = available - amount;
        Ok(())
    }

    /// Add every kind of another ledger to this one
    pub fn add_ledger(&mut self, other: &ResourceLedger) {
        for (resource, amount) in other.iter() {
            self.add(resource, amount);
        }
    }

    /// Subtract every kind of another ledger.
    ///
    /// Either every kind is deducted or, on the first shortfall, nothing is.
    pub fn subtract_ledger(&mut self, other: &ResourceLedger) -> Result<(), LedgerError> {
        self.check_covers(other)?;
        for (resource, amount) in other.iter() {
            *self.slot(resource) -= amount;
        }
        Ok(())
    }

    /// A copy of this ledger with `amount` more of `resource`
    pub fn plus(&self, resource: Resource, amount: u32) -> Self {
        let mut derived = self.clone();
        derived.add(resource, amount);
        derived
    }

    /// A copy of this ledger with `amount` less of `resource`
    pub fn minus(&self, resource: Resource, amount: u32) -> Result<Self, LedgerError> {
        let mut derived = self.clone();
        derived.subtract(resource, amount)?;
        Ok(derived)
    }

    /// A copy of this ledger with another ledger removed
    pub fn minus_ledger(&self, other: &ResourceLedger) -> Result<Self, LedgerError> {
        let mut derived = self.clone();
        derived.subtract_ledger(other)?;
        Ok(derived)
    }

    /// Whether subtracting `other` would succeed
    pub fn covers(&self, other: &ResourceLedger) -> bool {
        self.check_covers(other).is_ok()
    }

    fn check_covers(&self, other: &ResourceLedger) -> Result<(), LedgerError> {
        for (resource, requested) in other.iter() {
            let available = self.get(resource);
            if available < requested {
                return Err(LedgerError::Insufficient {
                    resource,
                    requested,
                    available,
                });
            }
        }
        Ok(())
    }

    /// Total number of resource units
    pub fn total(&self) -> u32 {
        self.clay + self.lumber + self.ore + self.grain + self.wool
    }

    /// Check if ledger is empty
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Iterate over every kind with its count, zero counts included
    pub fn iter(&self) -> impl Iterator<Item = (Resource, u32)> + '_ {
        Resource::ALL.into_iter().map(move |r| (r, self.get(r)))
    }

    /// Kinds with at least one unit
    pub fn held_kinds(&self) -> Vec<Resource> {
        Resource::ALL
            .into_iter()
            .filter(|&r| self.get(r) > 0)
            .collect()
    }

    /// Remove every unit of a kind, returning how many were removed
    pub fn take_all(&mut self, resource: Resource) -> u32 {
        std::mem::take(self.slot(resource))
    }

    /// Remove one unit of a kind chosen uniformly among the held kinds.
    ///
    /// The choice is over kinds, not units: holding 5 Ore and 1 Wool gives
    /// each kind the same chance.
    pub fn remove_random_kind<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Resource> {
        let resource = *self.held_kinds().choose(rng)?;
        *self.slot(resource) -= 1;
        Some(resource)
    }
}

impl AddAssign<&ResourceLedger> for ResourceLedger {
    fn add_assign(&mut self, rhs: &ResourceLedger) {
        self.add_ledger(rhs);
    }
}

impl fmt::Display for ResourceLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (resource, amount)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", resource, amount)?;
        }
        write!(f, "}}")
    }
}
