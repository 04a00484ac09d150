//! Yes/no flags coded as 1/2.

use carg_model::{FieldValue, normalize_code};

pub const YES: &str = "SI";
pub const NO: &str = "NO";

/// `1` means submerged, `2` means not submerged; anything else is unknown (empty).
pub fn sommerso(value: &FieldValue) -> &'static str {
    let Some(code) = normalize_code(value) else {
        return "";
    };
    match code.to_ascii_uppercase().as_str() {
        "1" | "SI" | "S" => YES,
        "2" | "NO" | "N" => NO,
        _ => "",
    }
}
