//! Trade taxonomy and the trade-to-plan-section mapping.
//!
//! Bids are priced per trade; production plans group work into named
//! sections with a boolean flag per section. The mapping is many-to-one:
//! fascia/soffit work lands in the siding section of a plan.

use serde::{Deserialize, Serialize};

/// The trades a bid can be written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "trade", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Trade {
    Roof,
    Siding,
    Gutters,
    Windows,
    FasciaSoffit,
}

impl Trade {
    /// The plan section this trade's work belongs to.
    ///
    /// Fascia/soffit collapses into `siding` -- plans have no dedicated
    /// fascia section.
    pub fn plan_section(self) -> &'static str {
        match self {
            Trade::Roof => "roof",
            Trade::Siding | Trade::FasciaSoffit => "siding",
            Trade::Gutters => "guttering",
            Trade::Windows => "windows",
        }
    }
}

/// Section flags derived from a trade, used when creating a plan from a bid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SectionFlags {
    pub has_roof: bool,
    pub has_siding: bool,
    pub has_guttering: bool,
    pub has_windows: bool,
    pub has_small_jobs: bool,
}

impl SectionFlags {
    /// Flags for a plan converted from a single-trade bid: exactly one
    /// section active (with the fascia_soffit -> siding collapse).
    pub fn for_trade(trade: Trade) -> Self {
        let mut flags = SectionFlags::default();
        match trade {
            Trade::Roof => flags.has_roof = true,
            Trade::Siding | Trade::FasciaSoffit => flags.has_siding = true,
            Trade::Gutters => flags.has_guttering = true,
            Trade::Windows => flags.has_windows = true,
        }
        flags
    }

    /// Whether `section` is one of the active sections.
    pub fn allows(&self, section: &str) -> bool {
        match section {
            "roof" => self.has_roof,
            "siding" => self.has_siding,
            "guttering" => self.has_guttering,
            "windows" => self.has_windows,
            "small_jobs" => self.has_small_jobs,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fascia_soffit_collapses_into_siding() {
        assert_eq!(Trade::FasciaSoffit.plan_section(), "siding");
        let flags = SectionFlags::for_trade(Trade::FasciaSoffit);
        assert!(flags.has_siding);
        assert!(!flags.has_roof);
        assert!(!flags.has_guttering);
    }

    #[test]
    fn each_trade_activates_exactly_one_section() {
        for trade in [
            Trade::Roof,
            Trade::Siding,
            Trade::Gutters,
            Trade::Windows,
            Trade::FasciaSoffit,
        ] {
            let flags = SectionFlags::for_trade(trade);
            let active = [
                flags.has_roof,
                flags.has_siding,
                flags.has_guttering,
                flags.has_windows,
                flags.has_small_jobs,
            ]
            .iter()
            .filter(|b| **b)
            .count();
            assert_eq!(active, 1, "{trade:?}");
            assert!(flags.allows(trade.plan_section()));
        }
    }
}
