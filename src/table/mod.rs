//! Mapping between the message model and a spreadsheet-shaped grid
//!
//! ```text
//! id  Context     Singular Form   Translation
//!  1              Hello World     Hallo Welt
//!  2  Keep short  Sausage         Wurst
//!  3  obsolete    Noodle          Nudel
//! ```
//!
//! Catalogs with plural messages get one translation column per plural form,
//! each labelled with the counts it covers.

mod decoder;
mod encoder;

pub use decoder::{decode, translation_columns};
pub use encoder::{encode, ColumnPlan};

pub const ID_HEADER: &str = "id";
pub const CONTEXT_HEADER: &str = "Context";
pub const SOURCE_HEADER: &str = "Singular Form";
pub const TRANSLATION_HEADER: &str = "Translation";

/// Shown in the context column instead of the real context
pub const OBSOLETE_MARKER: &str = "obsolete";

pub const CONTEXT_COLUMN: usize = 1;
pub const SOURCE_COLUMN: usize = 2;
/// Index of the first translation column
pub const FIRST_TRANSLATION_COLUMN: usize = 3;
