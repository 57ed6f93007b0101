//! Payload helpers shared by the FortiOS resource layer.
//!
//! Everything here is a pure function over borrowed or owned values. None of
//! the helpers fail hard: malformed input degrades to a documented default so
//! that a best-effort sync never aborts on a formatting quirk of the device.

pub mod coerce;
pub mod filter;
pub mod natural;
pub mod normalize;
pub mod subtable;
pub mod validate;
pub mod version;

pub use coerce::{
    int_list_to_string, int_value, is_present, list_to_scalar, string_to_int_list, string_value,
};
pub use filter::escape_filter;
pub use natural::natural_sort_key;
pub use normalize::{ip_mask_to_cidr, to_cert_format};
pub use subtable::{order_subtable, SortMode};
pub use validate::{ValidationError, Validator};
pub use version::{CompatOperator, CompatRules, Version, VersionError};
