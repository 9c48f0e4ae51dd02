//! Shotpipe is the path-template core of a DCC asset-management pipeline:
//! named path patterns with typed placeholder fields, next-version
//! resolution for work files, and versionless display-name derivation for
//! publishes.
//!
//! The crate is pure, synchronous computation over field maps and path
//! strings. Enumerating sibling paths, saving scenes and registering
//! publishes belong to the hook layer built on top of it.
//!
//! ## Example
//!
//! ```
//! use shotpipe::{derive_name, next_version, Template, TemplateKey};
//!
//! # fn main() -> shotpipe::Result<()> {
//! let work = Template::new(
//!     "shot_work",
//!     "shots/{shot}/work/{name}_v{version}.ma",
//!     vec![
//!         TemplateKey::string("shot"),
//!         TemplateKey::string("name"),
//!         TemplateKey::integer("version", 3),
//!     ],
//! )?;
//!
//! let fields = work.fields_from_path("shots/sh010/work/anim_v002.ma")?;
//! let existing = ["shots/sh010/work/anim_v004.ma".to_string()];
//! assert_eq!(next_version(&work, &fields, &existing)?, 5);
//! assert_eq!(
//!     derive_name("shots/sh010/work/anim_v002.ma", &work, &fields)?,
//!     "anim"
//! );
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod field;
pub mod naming;
pub mod template;
pub mod version;

pub use error::{Result, TemplateError};
pub use field::{FieldKind, FieldMap, FieldValue, TemplateKey};
pub use naming::derive_name;
pub use template::Template;
pub use version::{highest_version, next_version};
