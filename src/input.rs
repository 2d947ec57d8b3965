//! Loading uploaded files.
pub mod translation;

pub use translation::{
    TranslationFile,
    load_translation_file,
    load_translation_files,
    validate_file_type,
};
