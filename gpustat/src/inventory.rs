//! Device enumeration: turns `nvidia-smi -L` and `lspci` listings into inventory entries.
//! Bus listings contain every vendor's devices; lines that aren't ours are skipped, not errors.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::reading::InventoryEntry;
use crate::vendor::VendorKind;

/// The only Intel device we report gets this id, kept apart from numeric bus ids.
pub const INTEL_INVENTORY_ID: &str = "99";

static NVIDIA_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)GPU\s(?P<id>\d+):\s(?P<model>.*?)\s\(UUID:\s(?P<guid>GPU-[0-9a-f-]+)\)")
        .expect("static regex")
});

static AMD_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:[0-9a-fA-F]{4}:)?(?P<bus>[0-9a-fA-F]{2}):(?P<dev>[0-9a-fA-F]{2})\.(?P<func>[0-7])\s.*?\[AMD(?:/ATI)?\]\s+(?P<chip>.+?)(?:\s+\[(?P<name>[^\]]+)\])?(?:\s+\(rev\s+[0-9a-fA-F]+\))?\s*$",
    )
    .expect("static regex")
});

// lspci -mm fields: quoted strings or bare tokens
static MM_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""([^"]*)"|(\S+)"#).expect("static regex"));

/// `nvidia-smi -L`: `GPU 0: NVIDIA GeForce RTX 3080 (UUID: GPU-...)`.
pub fn parse_nvidia(text: &str) -> Vec<InventoryEntry> {
    text.lines()
        .filter_map(|line| NVIDIA_LINE.captures(line))
        .map(|c| InventoryEntry {
            id: c["id"].to_string(),
            model: c["model"].trim().to_string(),
            guid: c["guid"].to_string(),
            vendor: VendorKind::Nvidia,
        })
        .collect()
}

/// `lspci` lines naming an `[AMD]`/`[AMD/ATI]` device. The marketing name in brackets wins
/// over the chip code name when lspci knows it. `guid` is the bus number radeontop wants.
pub fn parse_amd(text: &str) -> Vec<InventoryEntry> {
    text.lines()
        .filter(|line| line.contains("[AMD/ATI]") || line.contains("[AMD]"))
        .filter_map(|line| AMD_LINE.captures(line.trim()))
        .map(|c| {
            let model = c
                .name("name")
                .or_else(|| c.name("chip"))
                .map(|m| m.as_str().trim().to_string())
                .unwrap_or_default();
            InventoryEntry {
                id: format!("{}:{}.{}", &c["bus"], &c["dev"], &c["func"]),
                model,
                guid: c["bus"].to_ascii_lowercase(),
                vendor: VendorKind::Amd,
            }
        })
        .collect()
}

/// `lspci -Dmm` lines: `0000:00:02.0 "VGA compatible controller" "Intel Corporation" "AlderLake-S GT1" ...`.
/// A single integrated GPU is assumed; the first Intel line wins.
pub fn parse_intel(text: &str) -> Vec<InventoryEntry> {
    text.lines()
        .filter_map(|line| {
            let tokens: Vec<&str> = MM_TOKEN
                .captures_iter(line)
                .filter_map(|c| c.get(1).or_else(|| c.get(2)))
                .map(|m| m.as_str())
                .collect();
            if tokens.len() < 4 || tokens[2] != "Intel Corporation" {
                return None;
            }
            Some(InventoryEntry {
                id: INTEL_INVENTORY_ID.to_string(),
                model: tokens[3].trim().to_string(),
                guid: tokens[0].to_string(),
                vendor: VendorKind::Intel,
            })
        })
        .take(1)
        .collect()
}
