use bevy::math::Vec3;

/// Destination slot a navigation fragment is bound to, in volume rank order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionSlot {
    pub section_id: &'static str,
    pub label: &'static str,
    /// Resting position relative to the emblem root once decomposed.
    pub target_position: Vec3,
}

pub const NAVIGATION_SLOT_COUNT: usize = 4;

/// Slot 0 receives the largest fragment, slot 3 the fourth largest.
pub const SECTION_SLOTS: [SectionSlot; NAVIGATION_SLOT_COUNT] = [
    SectionSlot {
        section_id: "about",
        label: "About",
        target_position: Vec3::new(-1.6, 0.9, 0.0),
    },
    SectionSlot {
        section_id: "services",
        label: "Services",
        target_position: Vec3::new(1.6, 0.9, 0.0),
    },
    SectionSlot {
        section_id: "work",
        label: "Work",
        target_position: Vec3::new(-1.6, -0.9, 0.0),
    },
    SectionSlot {
        section_id: "contact",
        label: "Contact",
        target_position: Vec3::new(1.6, -0.9, 0.0),
    },
];

pub fn slot(index: usize) -> Option<&'static SectionSlot> {
    SECTION_SLOTS.get(index)
}

pub fn find_slot(section_id: &str) -> Option<(usize, &'static SectionSlot)> {
    SECTION_SLOTS
        .iter()
        .enumerate()
        .find(|(_, s)| s.section_id == section_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_are_found_by_section_id() {
        assert_eq!(find_slot("work").map(|(i, _)| i), Some(2));
        assert!(find_slot("nonexistent").is_none());
        assert!(slot(NAVIGATION_SLOT_COUNT).is_none());
    }
}
