//! Plugin settings: vendor selection, device id, temperature unit and DISP* toggles.
//! Stored in the plugin's `KEY="value"` file. Search order: explicit path (or $GPUSTAT_CONFIG),
//! $XDG_CONFIG_HOME/gpustat/gpustat.cfg (fallback ~/.config/gpustat/gpustat.cfg), then the
//! Unraid flash location. A missing file yields defaults.

use ini::Ini;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

pub const PLUGIN_SETTINGS_PATH: &str = "/boot/config/plugins/gpustat/gpustat.cfg";
pub const CONFIG_ENV: &str = "GPUSTAT_CONFIG";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: ini::Error,
    },
    #[error("failed to parse settings: {0}")]
    Parse(#[from] ini::ParseError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TempFormat {
    #[default]
    Celsius,
    Fahrenheit,
}

/// Which Intel power reading to report when the tool emits both GPU and package wattage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PowerSelect {
    #[default]
    Max,
    Gpu,
    Package,
}

/// DISP* toggles. Everything is shown unless the settings file turns it off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayToggles {
    pub clocks: bool,
    pub temp: bool,
    pub fan: bool,
    pub pci_util: bool,
    pub power_draw: bool,
    pub power_state: bool,
    pub sessions: bool,
    // intel engines
    pub render_3d: bool,
    pub blitter: bool,
    pub video: bool,
    pub video_enhance: bool,
    pub interrupts: bool,
    // radeontop blocks
    pub event: bool,
    pub vertex: bool,
    pub texture: bool,
    pub shader_export: bool,
    pub sequencer: bool,
    pub shader_interp: bool,
    pub scan_converter: bool,
    pub prim_assembly: bool,
    pub depth_block: bool,
    pub color_block: bool,
    pub mem_util: bool,
    pub gfx_trans: bool,
    pub mem_clock_util: bool,
    pub clock_util: bool,
    pub power_select: PowerSelect,
}

impl Default for DisplayToggles {
    fn default() -> Self {
        Self {
            clocks: true,
            temp: true,
            fan: true,
            pci_util: true,
            power_draw: true,
            power_state: true,
            sessions: true,
            render_3d: true,
            blitter: true,
            video: true,
            video_enhance: true,
            interrupts: true,
            event: true,
            vertex: true,
            texture: true,
            shader_export: true,
            sequencer: true,
            shader_interp: true,
            scan_converter: true,
            prim_assembly: true,
            depth_block: true,
            color_block: true,
            mem_util: true,
            gfx_trans: true,
            mem_clock_util: true,
            clock_util: true,
            power_select: PowerSelect::Max,
        }
    }
}

impl DisplayToggles {
    fn toggle_mut(&mut self, key: &str) -> Option<&mut bool> {
        let slot = match key {
            "DISPCLOCKS" => &mut self.clocks,
            "DISPTEMP" => &mut self.temp,
            "DISPFAN" => &mut self.fan,
            "DISPPCIUTIL" => &mut self.pci_util,
            "DISPPWRDRAW" => &mut self.power_draw,
            "DISPPWRSTATE" => &mut self.power_state,
            "DISPSESSIONS" => &mut self.sessions,
            "DISP3DRENDER" => &mut self.render_3d,
            "DISPBLITTER" => &mut self.blitter,
            "DISPVIDEO" => &mut self.video,
            "DISPVIDENH" => &mut self.video_enhance,
            "DISPINTERRUPT" => &mut self.interrupts,
            "DISPEVENT" => &mut self.event,
            "DISPVERTEX" => &mut self.vertex,
            "DISPTEXTURE" => &mut self.texture,
            "DISPSHADEREXP" => &mut self.shader_export,
            "DISPSEQUENCER" => &mut self.sequencer,
            "DISPSHADERINTER" => &mut self.shader_interp,
            "DISPSCANCON" => &mut self.scan_converter,
            "DISPPRIMASSEM" => &mut self.prim_assembly,
            "DISPDEPTHBLK" => &mut self.depth_block,
            "DISPCOLORBLK" => &mut self.color_block,
            "DISPMEMUTIL" => &mut self.mem_util,
            "DISPGFXTRANS" => &mut self.gfx_trans,
            "DISPMEMCLOCKUTIL" => &mut self.mem_clock_util,
            "DISPCLOCKUTIL" => &mut self.clock_util,
            _ => return None,
        };
        Some(slot)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Raw vendor name; validated when a collector is picked so bad values surface as error 200.
    pub vendor: String,
    pub gpu_id: String,
    pub temp_format: TempFormat,
    pub display: DisplayToggles,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            vendor: "nvidia".into(),
            gpu_id: "0".into(),
            temp_format: TempFormat::Celsius,
            display: DisplayToggles::default(),
        }
    }
}

impl Settings {
    pub fn from_ini_str(text: &str) -> Result<Self, SettingsError> {
        let ini = Ini::load_from_str(text)?;
        Ok(Self::from_ini(&ini))
    }

    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let ini = Ini::load_from_file(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_ini(&ini))
    }

    fn from_ini(ini: &Ini) -> Self {
        let mut settings = Settings::default();
        for (key, value) in ini.general_section().iter() {
            let value = value.trim().trim_matches('"');
            match key {
                "VENDOR" => settings.vendor = value.to_ascii_lowercase(),
                "GPUID" => settings.gpu_id = value.to_string(),
                "TEMPFORMAT" => {
                    settings.temp_format = if value.eq_ignore_ascii_case("F") {
                        TempFormat::Fahrenheit
                    } else {
                        TempFormat::Celsius
                    }
                }
                "DISPPWRDRWSEL" => {
                    settings.display.power_select = match value.to_ascii_uppercase().as_str() {
                        "GPU" => PowerSelect::Gpu,
                        "PACKAGE" => PowerSelect::Package,
                        _ => PowerSelect::Max,
                    }
                }
                _ => match settings.display.toggle_mut(key) {
                    Some(slot) => match parse_bool(value) {
                        Some(b) => *slot = b,
                        None => debug!("ignoring non-boolean value {value:?} for {key}"),
                    },
                    None => debug!("ignoring unknown setting {key}"),
                },
            }
        }
        settings
    }

    /// Copy of these settings pointed at another device (batch requests).
    pub fn for_device(&self, vendor: &str, gpu_id: &str) -> Self {
        Self {
            vendor: vendor.to_ascii_lowercase(),
            gpu_id: gpu_id.to_string(),
            ..self.clone()
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

pub fn config_dir() -> PathBuf {
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
        PathBuf::from(xdg).join("gpustat")
    } else {
        dirs_next::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gpustat")
    }
}

/// Candidate settings files, most specific first.
pub fn settings_paths(explicit: Option<&Path>) -> Vec<PathBuf> {
    if let Some(p) = explicit {
        return vec![p.to_path_buf()];
    }
    if let Some(p) = std::env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()) {
        return vec![PathBuf::from(p)];
    }
    vec![
        config_dir().join("gpustat.cfg"),
        PathBuf::from(PLUGIN_SETTINGS_PATH),
    ]
}

/// Loads the first settings file that exists; falls back to defaults when none does or it can't be read.
pub fn load_settings(explicit: Option<&Path>) -> Settings {
    for path in settings_paths(explicit) {
        if !path.exists() {
            continue;
        }
        return match Settings::from_file(&path) {
            Ok(s) => {
                debug!("loaded settings from {}", path.display());
                s
            }
            Err(e) => {
                warn!("{e}; using default settings");
                Settings::default()
            }
        };
    }
    Settings::default()
}
