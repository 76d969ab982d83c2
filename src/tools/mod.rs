mod dimension_resolver;
mod engine_invoker;
mod image_set;
mod path_validator;

pub use dimension_resolver::{Dimensions, probe_dimensions, resolve_dimensions};
pub use engine_invoker::{
    DIAGNOSTIC_EXCERPT_CHARS, Engine, EngineError, EngineExit, MagickEngine,
};
pub use image_set::{IMAGE_EXTENSIONS, ImageRef, ImageSet, is_image_file, scan_image_files};
pub use path_validator::validate_file_exists;
