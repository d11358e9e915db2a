//! Mana pools and mana costs.
//!
//! A pool has seven buckets: the five colors, colorless, and generic. Costs
//! are parsed from the usual brace notation, e.g. `"{2}{G}{G}"`.
//!
//! ## Payment order
//!
//! Colored and colorless pips are paid from their own bucket. Generic pips
//! are paid from the generic bucket first, then colorless, then colors in
//! WUBRG order.
//!
//! ```
//! use rust_mtg::core::{ManaColor, ManaCost, ManaPool};
//!
//! let cost = ManaCost::parse("{1}{G}").unwrap();
//! let mut pool = ManaPool::default();
//! pool.add(ManaColor::Green, 2);
//!
//! let paid = pool.pay(&cost).unwrap();
//! assert!(paid.is_empty());
//! ```

use serde::{Deserialize, Serialize};

use super::error::{Result, RulesError};

/// One bucket of a mana pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ManaColor {
    White,
    Blue,
    Black,
    Red,
    Green,
    Colorless,
    Generic,
}

impl ManaColor {
    /// All buckets, in pool order.
    pub const ALL: [ManaColor; 7] = [
        ManaColor::White,
        ManaColor::Blue,
        ManaColor::Black,
        ManaColor::Red,
        ManaColor::Green,
        ManaColor::Colorless,
        ManaColor::Generic,
    ];

    /// Parse a single mana symbol or color name (`"G"`, `"green"`, `"C"`).
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        match text.to_ascii_lowercase().as_str() {
            "w" | "white" => Some(ManaColor::White),
            "u" | "blue" => Some(ManaColor::Blue),
            "b" | "black" => Some(ManaColor::Black),
            "r" | "red" => Some(ManaColor::Red),
            "g" | "green" => Some(ManaColor::Green),
            "c" | "colorless" => Some(ManaColor::Colorless),
            "generic" => Some(ManaColor::Generic),
            _ => None,
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

/// Mana available to a player. Every bucket is non-negative by construction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ManaPool {
    amounts: [u32; 7],
}

impl ManaPool {
    /// Amount of mana in one bucket.
    #[must_use]
    pub fn get(&self, color: ManaColor) -> u32 {
        self.amounts[color.index()]
    }

    /// Add mana to a bucket.
    pub fn add(&mut self, color: ManaColor, amount: u32) {
        self.amounts[color.index()] = self.amounts[color.index()].saturating_add(amount);
    }

    /// Total mana across all buckets.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.amounts.iter().fold(0, |sum, &n| sum.saturating_add(n))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Empty every bucket.
    pub fn clear(&mut self) {
        self.amounts = [0; 7];
    }

    /// Can this pool pay `cost`?
    #[must_use]
    pub fn can_pay(&self, cost: &ManaCost) -> bool {
        self.pay(cost).is_some()
    }

    /// Pool remaining after paying `cost`, or `None` if it can't be paid.
    #[must_use]
    pub fn pay(&self, cost: &ManaCost) -> Option<ManaPool> {
        let mut remaining = *self;

        for (idx, &needed) in cost.pips.iter().enumerate() {
            remaining.amounts[idx] = remaining.amounts[idx].checked_sub(needed)?;
        }

        let mut generic = cost.generic;
        let order = [
            ManaColor::Generic,
            ManaColor::Colorless,
            ManaColor::White,
            ManaColor::Blue,
            ManaColor::Black,
            ManaColor::Red,
            ManaColor::Green,
        ];
        for color in order {
            if generic == 0 {
                break;
            }
            let available = remaining.amounts[color.index()];
            let used = available.min(generic);
            remaining.amounts[color.index()] -= used;
            generic -= used;
        }

        (generic == 0).then_some(remaining)
    }
}

/// A parsed mana cost.
///
/// `pips` counts colored and colorless symbols per bucket (the generic slot
/// is unused there); `generic` counts numeric symbols.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ManaCost {
    pips: [u32; 7],
    generic: u32,
}

impl ManaCost {
    /// The zero cost.
    #[must_use]
    pub fn free() -> Self {
        Self::default()
    }

    /// A cost of `amount` generic mana.
    #[must_use]
    pub fn generic(amount: u32) -> Self {
        Self {
            pips: [0; 7],
            generic: amount,
        }
    }

    /// Add `count` symbols of one color (builder pattern). Saturates.
    #[must_use]
    pub fn with(mut self, color: ManaColor, count: u32) -> Self {
        if color == ManaColor::Generic {
            self.generic = self.generic.saturating_add(count);
        } else {
            let pips = &mut self.pips[color.index()];
            *pips = pips.saturating_add(count);
        }
        self
    }

    /// Parse brace notation: `"{3}{W}{W}"`. The empty string is free.
    pub fn parse(text: &str) -> Result<Self> {
        let invalid = |reason: &str| RulesError::InvalidParameter {
            key: "mana_cost".to_string(),
            param: text.to_string(),
            reason: reason.to_string(),
        };

        let mut cost = ManaCost::free();
        let mut rest = text.trim();

        while !rest.is_empty() {
            let inner = rest
                .strip_prefix('{')
                .ok_or_else(|| invalid("expected `{`"))?;
            let close = inner.find('}').ok_or_else(|| invalid("unclosed `{`"))?;
            let symbol = &inner[..close];
            rest = &inner[close + 1..];

            if let Ok(amount) = symbol.parse::<u32>() {
                cost.generic = cost
                    .generic
                    .checked_add(amount)
                    .ok_or_else(|| invalid("cost too large"))?;
            } else {
                let color = match ManaColor::parse(symbol) {
                    Some(ManaColor::Generic) | None => return Err(invalid("unknown symbol")),
                    Some(color) => color,
                };
                let pips = &mut cost.pips[color.index()];
                *pips = pips.checked_add(1).ok_or_else(|| invalid("cost too large"))?;
            }
            let total = cost
                .pips
                .iter()
                .try_fold(cost.generic, |sum, &n| sum.checked_add(n));
            if total.is_none() {
                return Err(invalid("cost too large"));
            }
        }

        Ok(cost)
    }

    /// Total mana value.
    #[must_use]
    pub fn mana_value(&self) -> u32 {
        self.pips
            .iter()
            .fold(self.generic, |sum, &n| sum.saturating_add(n))
    }

    #[must_use]
    pub fn is_free(&self) -> bool {
        self.mana_value() == 0
    }
}

impl std::fmt::Display for ManaCost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.generic > 0 || self.is_free() {
            write!(f, "{{{}}}", self.generic)?;
        }
        let symbols = ["W", "U", "B", "R", "G", "C"];
        for (idx, symbol) in symbols.iter().enumerate() {
            for _ in 0..self.pips[idx] {
                write!(f, "{{{}}}", symbol)?;
            }
        }
        Ok(())
    }
}
