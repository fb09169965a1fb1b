//! Internationalization (i18n) module.
//!
//! - `locale`: validated locale codes
//! - `registry`: locale display names and default currencies
//!
//! # Example
//!
//! ```rust,ignore
//! use localization_seed::i18n::{Locale, LocaleRegistry};
//!
//! let german = Locale::german();
//! let title = LocaleRegistry::get().display_name(&german, &german);
//! assert_eq!(title, Some("Deutsch (Deutschland)"));
//! ```

mod locale;
mod registry;

pub use locale::{Locale, GERMAN_LOCALE};
pub use registry::{LocaleConfig, LocaleRegistry};
