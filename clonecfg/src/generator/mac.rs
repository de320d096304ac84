//! MAC addresses with a real vendor prefix.

use rand::Rng;

/// Vendor prefixes (OUI) a generated address starts with.
pub const OUI_TABLE: &[&str] = &[
    "00:05:69", "00:1A:11", "00:E0:4C", "3C:5A:B4", "40:B8:9A", "BC:F5:AC", "D8:80:39",
];

/// Pick a vendor prefix and append three random host octets.
pub fn generate_mac_address<R: Rng + ?Sized>(rng: &mut R) -> String {
    let oui = OUI_TABLE[rng.gen_range(0..OUI_TABLE.len())];
    let host: [u8; 3] = rng.r#gen();
    format!("{oui}:{:02X}:{:02X}:{:02X}", host[0], host[1], host[2]).to_uppercase()
}
