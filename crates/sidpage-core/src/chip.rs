//! Hardware target registry
//!
//! Static table of the chips a manufacturing page can be generated for,
//! keyed by platform family, chip variant name and (where a family ships
//! multiple memory options of the same die) flash size in KiB.

use crate::error::{Error, Result};
use std::fmt;

/// Hardware platform family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Nordic Semiconductor (nRF52 series)
    Nordic,
    /// Texas Instruments (CC13x2 series)
    Ti,
    /// Silicon Labs (EFR32 series)
    SiLabs,
    /// Platform-agnostic page, base address zero
    Generic,
}

impl Platform {
    /// All supported platforms
    pub const ALL: &'static [Platform] =
        &[Platform::Nordic, Platform::Ti, Platform::SiLabs, Platform::Generic];

    /// Canonical lowercase name used on the command line
    pub const fn name(self) -> &'static str {
        match self {
            Platform::Nordic => "nordic",
            Platform::Ti => "ti",
            Platform::SiLabs => "silabs",
            Platform::Generic => "generic",
        }
    }

    /// Parse a platform from its CLI name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Platform> {
        Platform::ALL
            .iter()
            .copied()
            .find(|p| p.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One hardware target the page can be addressed for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChipDescriptor {
    /// Platform family
    pub platform: Platform,
    /// Short variant name used on the command line
    pub name: &'static str,
    /// Flash memory variant in KiB, 0 where the family has only one
    pub memory_kb: u32,
    /// Full part name, as understood by vendor tooling
    pub full_part_name: &'static str,
    /// Absolute flash address where the mfg page starts
    pub base_address: u32,
    /// Display default for CLI help. Never used to disambiguate.
    pub is_default: bool,
}

impl ChipDescriptor {
    fn combination(&self) -> String {
        if self.memory_kb != 0 {
            format!("({}, {}, {})", self.platform, self.name, self.memory_kb)
        } else {
            format!("({}, {})", self.platform, self.name)
        }
    }
}

/// The registered hardware targets
///
/// The (platform, name, memory_kb) triple is unique across this table.
pub static CHIPS: &[ChipDescriptor] = &[
    ChipDescriptor {
        platform: Platform::Nordic,
        name: "nrf52840",
        memory_kb: 0,
        full_part_name: "nRF52840",
        base_address: 0x000F_F000,
        is_default: true,
    },
    ChipDescriptor {
        platform: Platform::Ti,
        name: "p1",
        memory_kb: 0,
        full_part_name: "CC1352P1",
        base_address: 0x0005_6000,
        is_default: true,
    },
    ChipDescriptor {
        platform: Platform::Ti,
        name: "p7",
        memory_kb: 0,
        full_part_name: "CC1352P7",
        base_address: 0x000A_E000,
        is_default: false,
    },
    ChipDescriptor {
        platform: Platform::SiLabs,
        name: "mg21",
        memory_kb: 1024,
        full_part_name: "EFR32MG21B020F1024IM32",
        base_address: 0x000F_2000,
        is_default: true,
    },
    ChipDescriptor {
        platform: Platform::SiLabs,
        name: "mg24",
        memory_kb: 1536,
        full_part_name: "EFR32MG24B220F1536IM48",
        base_address: 0x0817_E000,
        is_default: false,
    },
    ChipDescriptor {
        platform: Platform::Generic,
        name: "generic",
        memory_kb: 0,
        full_part_name: "generic",
        base_address: 0x0000_0000,
        is_default: true,
    },
];

/// Chips registered for one platform
pub fn chips_for(platform: Platform) -> impl Iterator<Item = &'static ChipDescriptor> {
    CHIPS.iter().filter(move |c| c.platform == platform)
}

/// The display default chip for a platform, for CLI help text only
pub fn default_chip(platform: Platform) -> Option<&'static ChipDescriptor> {
    chips_for(platform).find(|c| c.is_default)
}

/// Resolve a caller-supplied selection to exactly one chip.
///
/// Zero or multiple matches are caller errors; the default flag does not
/// participate in resolution.
pub fn resolve(
    platform: Platform,
    name: Option<&str>,
    memory_kb: Option<u32>,
) -> Result<&'static ChipDescriptor> {
    let matches: Vec<&ChipDescriptor> = chips_for(platform)
        .filter(|c| name.is_none_or(|n| c.name.eq_ignore_ascii_case(n)))
        .filter(|c| memory_kb.is_none_or(|m| c.memory_kb == m))
        .collect();

    let requested = format!(
        "({}, {}, {})",
        platform,
        name.unwrap_or("*"),
        memory_kb.map_or_else(|| "*".to_string(), |m| m.to_string())
    );

    match matches.as_slice() {
        [chip] => Ok(chip),
        [] => Err(Error::ChipUnknown {
            requested,
            candidates: list_combinations(platform),
        }),
        many => Err(Error::ChipAmbiguous {
            requested,
            candidates: many
                .iter()
                .map(|c| c.combination())
                .collect::<Vec<_>>()
                .join(", "),
        }),
    }
}

fn list_combinations(platform: Platform) -> String {
    chips_for(platform)
        .map(|c| c.combination())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triple_uniqueness() {
        for (i, a) in CHIPS.iter().enumerate() {
            for b in CHIPS.iter().skip(i + 1) {
                assert!(
                    !(a.platform == b.platform && a.name == b.name && a.memory_kb == b.memory_kb),
                    "duplicate chip registration: {}",
                    a.combination()
                );
            }
        }
    }

    #[test]
    fn test_resolve_unique() {
        let chip = resolve(Platform::Nordic, None, None).unwrap();
        assert_eq!(chip.name, "nrf52840");

        let chip = resolve(Platform::SiLabs, Some("mg21"), Some(1024)).unwrap();
        assert_eq!(chip.full_part_name, "EFR32MG21B020F1024IM32");

        let chip = resolve(Platform::SiLabs, Some("MG24"), None).unwrap();
        assert_eq!(chip.memory_kb, 1536);
    }

    #[test]
    fn test_resolve_unknown_combination() {
        // Registered die, unregistered memory option
        let err = resolve(Platform::SiLabs, Some("mg21"), Some(2048)).unwrap_err();
        match err {
            Error::ChipUnknown { candidates, .. } => {
                assert!(candidates.contains("mg21"));
                assert!(candidates.contains("mg24"));
            }
            other => panic!("expected ChipUnknown, got {other:?}"),
        }
    }

    #[test]
    fn test_resolve_ambiguous() {
        let err = resolve(Platform::Ti, None, None).unwrap_err();
        match err {
            Error::ChipAmbiguous { candidates, .. } => {
                assert!(candidates.contains("p1"));
                assert!(candidates.contains("p7"));
            }
            other => panic!("expected ChipAmbiguous, got {other:?}"),
        }
    }

    #[test]
    fn test_default_is_display_only() {
        // TI has a default chip, but an unqualified request still fails
        assert!(default_chip(Platform::Ti).is_some());
        assert!(resolve(Platform::Ti, None, None).is_err());
    }
}
