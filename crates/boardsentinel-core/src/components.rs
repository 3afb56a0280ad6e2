//! Static hardware component catalog.
//!
//! The catalog is fixed at compile time and never derived from telemetry.

use serde::Serialize;

/// Health classification of a catalogued component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    Optimal,
    Warning,
    Critical,
}

impl std::fmt::Display for ComponentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Optimal => write!(f, "optimal"),
            Self::Warning => write!(f, "warning"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

/// A board component shown in the forensics view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HardwareComponent {
    /// Unique identifier (e.g. `"vrm-01"`).
    pub id: &'static str,
    pub name: &'static str,
    pub status: ComponentStatus,
    /// Free-text detail line.
    pub details: &'static str,
    /// SMBus address as printed on the bus map.
    pub address: &'static str,
}

static CATALOG: [HardwareComponent; 5] = [
    HardwareComponent {
        id: "vrm-01",
        name: "VRM Phase 1-12",
        status: ComponentStatus::Optimal,
        details: "DrMOS 90A Smart Power Stages",
        address: "0x40",
    },
    HardwareComponent {
        id: "cap-01",
        name: "Primary Capacitors",
        status: ComponentStatus::Optimal,
        details: "10K Black Metallic Caps",
        address: "0x48",
    },
    HardwareComponent {
        id: "pcie-01",
        name: "PCIe Gen5 Slot 1",
        status: ComponentStatus::Warning,
        details: "Signal integrity variance detected",
        address: "0x1A",
    },
    HardwareComponent {
        id: "chip-01",
        name: "Z790 Chipset",
        status: ComponentStatus::Optimal,
        details: "Thermal interface stable",
        address: "0x02",
    },
    HardwareComponent {
        id: "mem-01",
        name: "DIMM A2/B2",
        status: ComponentStatus::Optimal,
        details: "XMP 3.0 Profile Active",
        address: "0x50",
    },
];

/// The full catalog, in display order.
pub fn list_components() -> &'static [HardwareComponent] {
    &CATALOG
}

/// Look up a component by id.
pub fn find_component(id: &str) -> Option<&'static HardwareComponent> {
    CATALOG.iter().find(|c| c.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalog_has_five_entries() {
        assert_eq!(list_components().len(), 5);
    }

    #[test]
    fn catalog_order_is_stable() {
        let a: Vec<&str> = list_components().iter().map(|c| c.id).collect();
        let b: Vec<&str> = list_components().iter().map(|c| c.id).collect();
        assert_eq!(a, b);
        assert_eq!(a, ["vrm-01", "cap-01", "pcie-01", "chip-01", "mem-01"]);
    }

    #[test]
    fn ids_are_unique() {
        let ids: HashSet<&str> = list_components().iter().map(|c| c.id).collect();
        assert_eq!(ids.len(), list_components().len());
    }

    #[test]
    fn pcie_slot_is_the_only_warning() {
        let warnings: Vec<&str> = list_components()
            .iter()
            .filter(|c| c.status == ComponentStatus::Warning)
            .map(|c| c.id)
            .collect();
        assert_eq!(warnings, ["pcie-01"]);
    }

    #[test]
    fn find_by_id() {
        let chip = find_component("chip-01").unwrap();
        assert_eq!(chip.name, "Z790 Chipset");
        assert_eq!(chip.address, "0x02");
        assert!(find_component("gpu-01").is_none());
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_value(find_component("pcie-01").unwrap()).unwrap();
        assert_eq!(json["status"], "warning");
        assert_eq!(ComponentStatus::Critical.to_string(), "critical");
    }
}
