//! PoxConvert - gettext catalogs ⇄ translator spreadsheets
//!
//! This library turns `.po` catalogs into Excel workbooks a translator can
//! fill in, and reads the filled-in workbooks back into catalogs.
//!
//! # Features
//!
//! - Plural formula engine for `Plural-Forms` headers (`n%10==1 && n%100!=11 ? 0 : ...`)
//! - Human-readable plural column labels (`Plural, n = 2-4, 22-24, ...`)
//! - Context and obsolete entries survive the round trip
//! - Empty translations highlighted and outlined
//! - Excel import/export
//!
//! # Example
//!
//! ```
//! use pox_convert::plural::plural_hints;
//! use pox_convert::table::{decode, encode};
//! use pox_convert::types::{CatalogContext, Message};
//!
//! let hints = plural_hints(Some("nplurals=2; plural=(n != 1);"));
//! assert_eq!(hints[&0], "Singular, n = 1");
//!
//! let context = CatalogContext::new("de", vec![Message::singular("Hello", "Hallo")])
//!     .with_plural_hints(hints);
//! let grid = encode(&context);
//! assert_eq!(decode(&grid)?, context.messages);
//! # Ok::<(), pox_convert::error::PoxError>(())
//! ```

pub mod catalog;
pub mod cli;
pub mod error;
pub mod excel;
pub mod plural;
pub mod table;
pub mod types;

// Re-export commonly used types
pub use error::{FormulaError, PoxError, PoxResult};
pub use types::{CatalogContext, CatalogEntry, Cell, CellValue, Grid, Message, Translation};
