use shared::{EmotionalState, Exercise, NeedLevel};

/// The authored exercise table, keyed by (emotional state, need level).
///
/// The key space is sparse: 11 of the 45 combinations carry an entry.
/// Lookup never fails; missing keys resolve through a fallback chain
/// instead (exact match, then the first entry with the same emotional
/// state, then Fear × safety).
pub struct ExerciseCatalog {
    entries: Vec<CatalogEntry>,
}

pub struct CatalogEntry {
    pub emotional_state: EmotionalState,
    pub need_level: NeedLevel,
    pub exercise: Exercise,
}

#[allow(clippy::too_many_arguments)]
fn entry(
    emotional_state: EmotionalState,
    need_level: NeedLevel,
    tone_frequency_hz: f32,
    display_color: &str,
    name: &str,
    affirmation_native: &str,
    affirmation_foreign: &str,
    breathing_instruction: &str,
    visualization_instruction: &str,
    total_duration_minutes: u32,
) -> CatalogEntry {
    CatalogEntry {
        emotional_state,
        need_level,
        exercise: Exercise {
            tone_frequency_hz,
            display_color: display_color.to_string(),
            name: name.to_string(),
            affirmation_native: affirmation_native.to_string(),
            affirmation_foreign: affirmation_foreign.to_string(),
            breathing_instruction: breathing_instruction.to_string(),
            visualization_instruction: visualization_instruction.to_string(),
            total_duration_minutes,
        },
    }
}

impl ExerciseCatalog {
    pub fn new() -> Self {
        // Authored order matters: the same-state fallback picks the first
        // entry whose emotional state matches, and Fear × safety doubles
        // as the global default.
        let entries = vec![
            entry(
                EmotionalState::Fear,
                NeedLevel::Safety,
                396.0,
                "#FF6B6B",
                "Айдсаас чөлөөлөх",
                "Би энэ мөчид аюулгүй байна. Миний биед итгэл найдвар байна.",
                "I am safe in this moment. I trust my body.",
                "4-7-8 (4 сек татах, 7 сек барих, 8 сек гаргах)",
                "Өөрийгөө гэрэлт бөмбөлөг хүрээлсэн байхаар төсөөлөх",
                10,
            ),
            entry(
                EmotionalState::Fear,
                NeedLevel::Physiological,
                174.0,
                "#8B4513",
                "Биеийн аюулгүй байдал",
                "Миний бие хүчтэй, эрүүл. Би өөртөө итгэдэг.",
                "My body is strong and healthy. I trust myself.",
                "4-4-4-4 (Box breathing)",
                "Биеийнхээ бүх эрхтнийг өөдрөг гэрлээр дүүргэх",
                8,
            ),
            entry(
                EmotionalState::Anger,
                NeedLevel::Esteem,
                528.0,
                "#FFD93D",
                "Хайр ба засварлалт",
                "Би өөрийн сэтгэл хөдлөлөө ойлгож, эвтэйхэн илэрхийлж байна.",
                "I understand my emotions and express them peacefully.",
                "Box breathing (4-4-4-4)",
                "Уурыг улаан утаагаар газарт урсах мэт төсөөлөх",
                10,
            ),
            entry(
                EmotionalState::Anger,
                NeedLevel::LoveBelonging,
                639.0,
                "#FF9999",
                "Харилцаа сэргээх",
                "Би бусдыг ойлгож, өршөөнгүй хандаж байна.",
                "I understand others and approach with compassion.",
                "4-7-8",
                "Зүрхнээс гэрэл цацруулж буй дүр төрх",
                10,
            ),
            entry(
                EmotionalState::Courage,
                NeedLevel::Esteem,
                741.0,
                "#6BCF7F",
                "Өөрийгөө илэрхийлэх",
                "Би өөртөө итгэлтэй, чадварлаг хүн. Би зорилгодоо хүрч чадна.",
                "I am confident and capable. I can achieve my goals.",
                "Box breathing (4-4-4-4)",
                "Өөрийгөө уулын оройд зогсож байхаар төсөөлөх",
                10,
            ),
            entry(
                EmotionalState::Courage,
                NeedLevel::Safety,
                417.0,
                "#FF8C42",
                "Өөрчлөлтийн зориг",
                "Би өөрчлөлтөд бэлэн. Би шинэ эхлэлд нээлттэй.",
                "I am ready for change. I am open to new beginnings.",
                "4-7-8",
                "Хуучин хүндийг салгаж, шинийг угтах",
                10,
            ),
            entry(
                EmotionalState::Love,
                NeedLevel::LoveBelonging,
                639.0,
                "#FF8DC7",
                "Харилцаа холбоо",
                "Би бүхэнтэй нэгдмэл, хайраар дүүрэн. Миний зүрх нээлттэй.",
                "I am one with all, filled with love. My heart is open.",
                "Байгалийн амьсгал",
                "Зүрхнээсээ ягаан гэрэл цацарч байхыг төсөөлөх",
                12,
            ),
            entry(
                EmotionalState::Love,
                NeedLevel::SelfActualization,
                528.0,
                "#FFB6C1",
                "Нэгдмэл хайр",
                "Би бүх амьтантай холбогдсон. Миний хайр хязгааргүй.",
                "I am connected to all beings. My love is limitless.",
                "Байгалийн амьсгал",
                "Орчин ертөнцтөө хайраар холбогдох",
                15,
            ),
            entry(
                EmotionalState::Joy,
                NeedLevel::SelfActualization,
                852.0,
                "#A8E6CF",
                "Оюун санааны гэгээрэлт",
                "Би энэ мөчийн гайхамшигт талархаж байна. Амьдрал бол баясгалан.",
                "I am grateful for this moment. Life is joy.",
                "Байгалийн амьсгал",
                "Өөрийгөө гэрлэн манан дотор усардах мэт төсөөлөх",
                12,
            ),
            entry(
                EmotionalState::Joy,
                NeedLevel::LoveBelonging,
                528.0,
                "#FFE66D",
                "Хамтын баяр",
                "Миний баяр баясгалан бусадтай хуваалцагддаг.",
                "My joy is shared with others.",
                "Байгалийн амьсгал",
                "Баясгаланг бусадтай хуваалцах",
                10,
            ),
            entry(
                EmotionalState::Peace,
                NeedLevel::SelfActualization,
                963.0,
                "#C7A8FF",
                "Тэнгэрлэг холбоо",
                "Би төгс амар тайван байна. Бүх зүйл яг байх ёстой байдлаараа.",
                "I am perfectly peaceful. All is as it should be.",
                "Байгалийн амьсгал",
                "Хоосон огторгуйд амрах",
                15,
            ),
        ];

        Self { entries }
    }

    /// Resolve a key to an exercise. Total: falls back to the first entry
    /// sharing the emotional state, then to Fear × safety.
    pub fn lookup(&self, state: EmotionalState, need: NeedLevel) -> &Exercise {
        if let Some(found) = self
            .entries
            .iter()
            .find(|e| e.emotional_state == state && e.need_level == need)
        {
            return &found.exercise;
        }
        if let Some(found) = self.entries.iter().find(|e| e.emotional_state == state) {
            return &found.exercise;
        }
        // Fear × safety is entry 0 by construction.
        &self.entries[0].exercise
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }
}

impl Default for ExerciseCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_fear_safety() {
        let catalog = ExerciseCatalog::new();
        let exercise = catalog.lookup(EmotionalState::Fear, NeedLevel::Safety);
        assert_eq!(exercise.tone_frequency_hz, 396.0);
        assert_eq!(exercise.name, "Айдсаас чөлөөлөх");
    }

    #[test]
    fn same_state_fallback_keeps_emotional_state() {
        let catalog = ExerciseCatalog::new();
        // No Joy × safety entry; the first authored Joy entry wins.
        let exercise = catalog.lookup(EmotionalState::Joy, NeedLevel::Safety);
        assert_eq!(exercise.tone_frequency_hz, 852.0);
        assert_eq!(exercise.name, "Оюун санааны гэгээрэлт");
    }

    #[test]
    fn default_fallback_for_states_without_entries() {
        let catalog = ExerciseCatalog::new();
        for need in NeedLevel::ALL {
            for state in [
                EmotionalState::Shame,
                EmotionalState::Guilt,
                EmotionalState::Acceptance,
            ] {
                let exercise = catalog.lookup(state, need);
                assert_eq!(exercise.tone_frequency_hz, 396.0);
            }
        }
    }

    #[test]
    fn lookup_is_total_and_state_preserving() {
        let catalog = ExerciseCatalog::new();
        let authored: Vec<EmotionalState> = catalog
            .entries()
            .iter()
            .map(|e| e.emotional_state)
            .collect();

        for state in EmotionalState::ALL {
            for need in NeedLevel::ALL {
                let exercise = catalog.lookup(state, need);
                assert!(exercise.tone_frequency_hz > 0.0);
                if authored.contains(&state) {
                    // Any state with at least one entry must resolve within it.
                    let key_of = catalog
                        .entries()
                        .iter()
                        .find(|e| e.exercise == *exercise)
                        .map(|e| e.emotional_state);
                    assert_eq!(key_of, Some(state));
                }
            }
        }
    }

    #[test]
    fn catalog_has_eleven_entries() {
        assert_eq!(ExerciseCatalog::new().entries().len(), 11);
    }
}
