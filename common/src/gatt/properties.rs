use serde::{Deserialize, Serialize};

use super::handle::Handle;

/// Characteristic property bits, in the order they are reported.
pub const PROPERTY_FLAGS: [(u8, &str); 8] = [
    (0x01, "Broadcast"),
    (0x02, "Read"),
    (0x04, "Write without response"),
    (0x08, "Write"),
    (0x10, "Notify"),
    (0x20, "Indicate"),
    (0x40, "Authenticated Signed Writes"),
    (0x80, "Extended Properties"),
];

/// Decodes a characteristic property bitmask into flag names.
///
/// Names follow [`PROPERTY_FLAGS`] order, not the order bits were set.
pub fn decode(properties: u8) -> Vec<&'static str> {
    PROPERTY_FLAGS
        .iter()
        .filter(|(bit, _)| properties & bit != 0)
        .map(|(_, name)| *name)
        .collect()
}

/// A characteristic declaration as reported during discovery. Display only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacteristicDescriptor {
    pub handle: Handle,
    pub properties: u8,
    pub value_handle: Handle,
    pub uuid: String,
}

impl CharacteristicDescriptor {
    pub fn property_names(&self) -> Vec<&'static str> {
        decode(self.properties)
    }

    /// Comma separated property names, `"None"` when no bit is set.
    pub fn describe_properties(&self) -> String {
        let names = self.property_names();
        if names.is_empty() {
            "None".to_string()
        } else {
            names.join(", ")
        }
    }
}
