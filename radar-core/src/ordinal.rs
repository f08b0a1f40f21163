//! Ordinal mapping from radar vocabulary to visualization coordinates.
//!
//! These tables are the only bridge between the authored labels and the
//! integer space of the radar renderer. Direction classification in
//! [`crate::changelog`] reads ring order through [`ring_index`] so both stay
//! in agreement.

use crate::error::MappingError;
use crate::types::{Ring, Status};

/// `Adopt -> 0, Trial -> 1, Assess -> 2, Hold -> 3`.
pub fn ring_index(ring: Ring) -> u8 {
    match ring {
        Ring::Adopt => 0,
        Ring::Trial => 1,
        Ring::Assess => 2,
        Ring::Hold => 3,
    }
}

/// `New -> 2, MovedIn -> 1, MovedOut -> -1, NoChange -> 0`.
pub fn status_moved_flag(status: Status) -> i8 {
    match status {
        Status::New => 2,
        Status::MovedIn => 1,
        Status::MovedOut => -1,
        Status::NoChange => 0,
    }
}

/// Position of `name` among the configured quadrants, ignoring case.
///
/// Quadrants are configuration-defined, so this is the one mapping that can
/// fail.
pub fn quadrant_index<S: AsRef<str>>(name: &str, quadrants: &[S]) -> Result<u8, MappingError> {
    let wanted = name.to_lowercase();
    quadrants
        .iter()
        .position(|quadrant| quadrant.as_ref().to_lowercase() == wanted)
        .and_then(|index| u8::try_from(index).ok())
        .ok_or_else(|| MappingError::UnknownQuadrant(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUADRANTS: [&str; 4] = ["Techniques", "Platforms", "Tools", "Languages & Frameworks"];

    #[test]
    fn test_ring_index_table() {
        let indices: Vec<u8> = Ring::ALL.into_iter().map(ring_index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_ring_index_follows_ring_order() {
        for a in Ring::ALL {
            for b in Ring::ALL {
                assert_eq!(a < b, ring_index(a) < ring_index(b));
            }
        }
    }

    #[test]
    fn test_status_moved_flag() {
        assert_eq!(status_moved_flag(Status::New), 2);
        assert_eq!(status_moved_flag(Status::MovedIn), 1);
        assert_eq!(status_moved_flag(Status::MovedOut), -1);
        assert_eq!(status_moved_flag(Status::NoChange), 0);
    }

    #[test]
    fn test_quadrant_index_case_insensitive() {
        assert_eq!(quadrant_index("tools", &QUADRANTS), Ok(2));
        assert_eq!(quadrant_index("TECHNIQUES", &QUADRANTS), Ok(0));
        assert_eq!(quadrant_index("languages & frameworks", &QUADRANTS), Ok(3));
    }

    #[test]
    fn test_quadrant_index_unknown() {
        assert_eq!(
            quadrant_index("Gadgets", &QUADRANTS),
            Err(MappingError::UnknownQuadrant("Gadgets".to_string()))
        );
    }
}
