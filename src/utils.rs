use byte_unit::{Byte, UnitType};

/// Formats a byte count with a decimal unit, e.g. `1.23 GB`
#[must_use]
pub fn format_size(bytes: u64) -> String {
    let size = Byte::from(bytes);
    format!("{:#.2}", size.get_appropriate_unit(UnitType::Decimal))
}

/// Expands a leading `~` to the home directory of the invoking user.
///
/// Input without a leading `~`, or a `~user` form, is returned unchanged.
#[must_use]
pub fn expand_tilde(input: &str) -> String {
    shellexpand::tilde(input).into_owned()
}
