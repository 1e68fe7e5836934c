//! The six fixed process stages and their feed keys

use clinker_shared::StageId;

/// Static description of one process stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stage {
    pub id: StageId,
    /// Key of the stage node in the live-data document
    pub feed_key: &'static str,
    /// Caption of the stage's status indicator
    pub status_label: &'static str,
}

pub const STAGES: [Stage; 6] = [
    Stage {
        id: StageId::Step1,
        feed_key: "step1_raw_material",
        status_label: "LimeStone CaO Content",
    },
    Stage {
        id: StageId::Step2,
        feed_key: "step2_proportioning",
        status_label: "LimeStone Proportion",
    },
    Stage {
        id: StageId::Step3,
        feed_key: "step3_preheater",
        status_label: "Heat Recovery Efficiency",
    },
    Stage {
        id: StageId::Step4,
        feed_key: "step4_kiln",
        status_label: "Kiln Filling Degree",
    },
    Stage {
        id: StageId::Step5,
        feed_key: "step5_cooling_grinding",
        status_label: "Separator Efficiency",
    },
    Stage {
        id: StageId::Step6,
        feed_key: "step6_packing_shipping",
        status_label: "Silo Level",
    },
];

/// Lookup helpers over [`STAGES`]
pub struct StageTable;

impl StageTable {
    pub fn all() -> &'static [Stage] {
        &STAGES
    }

    pub fn by_feed_key(feed_key: &str) -> Option<&'static Stage> {
        STAGES.iter().find(|stage| stage.feed_key == feed_key)
    }

    pub fn by_id(id: StageId) -> &'static Stage {
        // STAGES is ordered by step number
        &STAGES[usize::from(id.number() - 1)]
    }

    pub fn by_number(number: u8) -> Option<&'static Stage> {
        StageId::from_number(number).map(Self::by_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_key_mapping() {
        let stage = StageTable::by_feed_key("step3_preheater").unwrap();
        assert_eq!(stage.id, StageId::Step3);
        assert_eq!(stage.id.as_str(), "step3");
        assert!(StageTable::by_feed_key("step7_unknown").is_none());
    }

    #[test]
    fn test_by_id_matches_table_order() {
        for id in StageId::ALL {
            assert_eq!(StageTable::by_id(id).id, id);
        }
        assert_eq!(StageTable::by_number(6).map(|s| s.feed_key), Some("step6_packing_shipping"));
        assert!(StageTable::by_number(0).is_none());
    }
}
