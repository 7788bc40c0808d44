//! Name heuristics used to classify scene nodes.
//!
//! The station model carries no metadata besides node names, so walkable
//! geometry, stairs and platform segments are recognised by substrings. All
//! matching is case-insensitive.

/// Prefix of platform-segment nodes (`St_02_4`, `St_02001_6`, ...).
pub const PLATFORM_SEGMENT_PREFIX: &str = "st_";

/// Substrings that mark a node as walkable.
const FLOOR_MARKERS: [&str; 5] = ["floor", "piso", "stairs", "stair", "rail"];

pub fn is_platform_segment(name: &str) -> bool {
    starts_with_ignore_case(name, PLATFORM_SEGMENT_PREFIX)
}

/// Walkable nodes become floor surfaces; everything else with geometry blocks.
pub fn is_floor_like(name: &str) -> bool {
    let lower = name.to_lowercase();
    is_platform_segment(&lower) || FLOOR_MARKERS.iter().any(|m| lower.contains(m))
}

pub fn is_stair_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.contains("stairs") || lower.contains("stair")
}

pub fn starts_with_ignore_case(name: &str, prefix: &str) -> bool {
    name.to_lowercase().starts_with(&prefix.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_markers() {
        assert!(is_floor_like("Floor_main"));
        assert!(is_floor_like("PISO_andén"));
        assert!(is_floor_like("Railway_left"));
        assert!(is_floor_like("big_Stairs"));
        assert!(is_floor_like("St_02_4"));
        assert!(!is_floor_like("Vending_machine"));
        assert!(!is_floor_like("wall_st_03"));
    }

    #[test]
    fn test_stairs_and_segments() {
        assert!(is_stair_name("StairCase"));
        assert!(!is_stair_name("Floor"));
        assert!(is_platform_segment("st_01"));
        assert!(is_platform_segment("ST_01"));
        assert!(!is_platform_segment("Station"));
    }
}
