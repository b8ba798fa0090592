//! CLI command handlers

pub mod commands;

pub use commands::{
    export, export_file, import, import_file, plurals, ExportOptions, ImportOptions,
    DEFAULT_EXPORT_FILENAME, DEFAULT_IMPORT_FILENAME,
};
