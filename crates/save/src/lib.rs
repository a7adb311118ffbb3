//! Road persistence: a versioned bitcode schema behind a checksummed file
//! header, optional LZ4 compression, and atomic writes.

mod atomic_write;
pub mod file_header;
mod save_codec;
pub mod save_error;
mod save_plugin;
pub mod save_types;

pub use save_codec::{decode_road, encode_road, load_road_from_file, save_road_to_file};
pub use save_error::SaveError;
pub use save_plugin::{LoadRoadEvent, RoadFileEvent, RoadSavePlugin, SaveRoadEvent};
pub use save_types::{SaveRoad, CURRENT_SAVE_VERSION};
