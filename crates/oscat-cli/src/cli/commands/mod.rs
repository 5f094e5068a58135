//! CLI command handlers, one file per command.

mod checksum;
mod download;
mod list;
mod update;
mod verify;

pub use checksum::run_checksum;
pub use download::{run_download, run_download_all};
pub use list::run_list;
pub use update::run_update;
pub use verify::run_verify;
