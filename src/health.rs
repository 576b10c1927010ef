//! Health Module
//!
//! Health pools for creatures and the status effects combat can leave on
//! the player.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A creature's health pool. Damage saturates at zero; healing is clamped
/// to the maximum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthState {
    max_hp: u32,
    current_hp: u32,
}

impl HealthState {
    /// Create a full health pool with the given maximum.
    pub fn new_at_max(max_hp: u32) -> HealthState {
        HealthState {
            max_hp,
            current_hp: max_hp,
        }
    }

    pub fn max_hp(&self) -> u32 {
        self.max_hp
    }

    pub fn current_hp(&self) -> u32 {
        self.current_hp
    }

    /// Do damage to health. Saturates at zero.
    pub fn damage(&mut self, amount: u32) {
        self.current_hp = self.current_hp.saturating_sub(amount);
    }

    /// Restore health, clamped to the maximum.
    pub fn heal(&mut self, amount: u32) {
        self.current_hp = (self.current_hp + amount).min(self.max_hp);
    }

    /// Reset both current and maximum HP. Used when generators overwrite
    /// template stats with rolled values.
    pub fn set_max(&mut self, max_hp: u32) {
        self.max_hp = max_hp;
        self.current_hp = max_hp;
    }

    /// Drop current HP to a fraction of maximum. Summoned allies arrive
    /// already worn down.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn reduce_to_fraction(&mut self, fraction: f64) {
        self.current_hp = ((f64::from(self.max_hp) * fraction).trunc() as u32).min(self.max_hp);
    }

    pub fn is_dead(&self) -> bool {
        self.current_hp == 0
    }
}

/// Lingering effects a special attack can leave on the player.
///
/// Dot effects subtract health each turn; the dampening effects scale the
/// player's derived stats while active and are never written back into the
/// base values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StatusEffect {
    Poison,
    Bleeding,
    Weakness,
    ReducedDodge,
    ReducedDamage,
}

impl StatusEffect {
    /// Health lost each turn this effect is active.
    pub fn damage_per_turn(self) -> u32 {
        match self {
            StatusEffect::Poison => 2,
            StatusEffect::Bleeding => 1,
            _ => 0,
        }
    }

    /// Whether this effect scales the player's effective damage by 0.7.
    pub fn dampens_damage(self) -> bool {
        matches!(self, StatusEffect::Weakness | StatusEffect::ReducedDamage)
    }

    /// Whether this effect halves the player's effective dodge chance.
    pub fn dampens_dodge(self) -> bool {
        matches!(self, StatusEffect::ReducedDodge)
    }
}

impl fmt::Display for StatusEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StatusEffect::Poison => "poison",
            StatusEffect::Bleeding => "bleeding",
            StatusEffect::Weakness => "weakness",
            StatusEffect::ReducedDodge => "reduced dodge",
            StatusEffect::ReducedDamage => "reduced damage",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damage_saturates_at_zero() {
        let mut health = HealthState::new_at_max(10);
        health.damage(25);
        assert_eq!(health.current_hp(), 0);
        assert!(health.is_dead());
    }

    #[test]
    fn heal_clamps_to_max() {
        let mut health = HealthState::new_at_max(30);
        health.damage(12);
        health.heal(100);
        assert_eq!(health.current_hp(), 30);
    }

    #[test]
    fn reduce_to_fraction_truncates() {
        let mut health = HealthState::new_at_max(25);
        health.reduce_to_fraction(0.7);
        assert_eq!(health.current_hp(), 17);
        assert_eq!(health.max_hp(), 25);
    }

    #[test]
    fn dot_effects_report_per_turn_damage() {
        assert_eq!(StatusEffect::Poison.damage_per_turn(), 2);
        assert_eq!(StatusEffect::Bleeding.damage_per_turn(), 1);
        assert_eq!(StatusEffect::ReducedDodge.damage_per_turn(), 0);
    }

    #[test]
    fn dampening_flags_cover_both_damage_effects() {
        assert!(StatusEffect::Weakness.dampens_damage());
        assert!(StatusEffect::ReducedDamage.dampens_damage());
        assert!(StatusEffect::ReducedDodge.dampens_dodge());
        assert!(!StatusEffect::Poison.dampens_damage());
    }
}
