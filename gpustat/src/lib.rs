//! gpustat: GPU telemetry from vendor tools, normalized into the dashboard's JSON schema.

pub mod error;
pub mod inventory;
pub mod normalize;
pub mod probe;
pub mod procs;
pub mod reading;
pub mod response;
pub mod runner;
pub mod settings;
pub mod vendor;

pub use error::{ErrorKind, ErrorRecord};
pub use reading::{InventoryEntry, Reading, NOT_AVAILABLE};
pub use response::{collect_batch, collect_inventory, collect_reading};
pub use settings::{load_settings, Settings};
pub use vendor::{Host, Vendor, VendorKind};
