//! Static treatment advice per weed type.

use serde::Serialize;

use super::weed::UNKNOWN_WEED;

/// Recommended control methods and notes for one weed type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub weed_type: &'static str,
    pub methods: &'static [&'static str],
    pub notes: &'static str,
}

/// Advice for weed types missing from the table.
static UNKNOWN_RECOMMENDATION: Recommendation = Recommendation {
    weed_type: UNKNOWN_WEED,
    methods: &["Manual removal", "Improve soil health", "Consult an expert"],
    notes: "Further identification is highly recommended for effective long-term management.",
};

/// Treatment table for recognized weed types.
static RECOMMENDATIONS: &[Recommendation] = &[
    Recommendation {
        weed_type: "Common purslane",
        methods: &["Manual removal", "Mulching", "Cultivation"],
        notes: "Produces many seeds quickly; remove before flowering. Can re-root from stem fragments.",
    },
    Recommendation {
        weed_type: "Goosegrass",
        methods: &[
            "Pre-emergent herbicides",
            "Post-emergent herbicides",
            "Manual removal",
        ],
        notes: "Thrives in compacted soil; aeration can help. Spreads by seed and tillers.",
    },
    Recommendation {
        weed_type: "Asthma-plant",
        methods: &["Manual removal", "Herbicides", "Improve turf density"],
        notes: "Prolific seed producer; control before it sets seed. Sap can be an irritant.",
    },
    Recommendation {
        weed_type: "Blue porterweed",
        methods: &["Manual removal", "Containment", "Herbicides"],
        notes: "Fast-growing and can outcompete native species. Monitor closely.",
    },
    Recommendation {
        weed_type: "Santa Maria feverfew",
        methods: &["Manual removal", "Early detection", "Biological control"],
        notes: "Highly toxic to livestock and can cause allergies in humans. Prioritize eradication.",
    },
    Recommendation {
        weed_type: "Water hyacinth",
        methods: &["Manual removal", "Biological control", "Herbicides"],
        notes: "Forms dense mats, depleting oxygen and blocking waterways. Requires persistent management.",
    },
    Recommendation {
        weed_type: "Climbing dayflower",
        methods: &["Manual removal", "Repeated mowing/trimming", "Herbicides"],
        notes: "Can quickly cover and smother desirable plants. Watch for new shoots.",
    },
    Recommendation {
        weed_type: "Common plantain",
        methods: &["Manual removal", "Improve soil health", "Herbicides"],
        notes: "Tolerant of compacted soils and high traffic. Good lawn health is a preventative measure.",
    },
    Recommendation {
        weed_type: "Arrowleaf sida",
        methods: &["Manual removal", "Mowing", "Herbicides"],
        notes: "Resilient perennial; requires persistent effort for complete removal. Prevents re-establishment.",
    },
    Recommendation {
        weed_type: "Oriental false hawksbeard",
        methods: &["Manual removal", "Mowing", "Herbicides"],
        notes: "Prolific seed producer; prioritize control to limit spread in disturbed areas.",
    },
];

/// Advice for a weed type, falling back to the "Unknown Weed" entry.
pub fn recommendation_for(weed_type: &str) -> &'static Recommendation {
    RECOMMENDATIONS
        .iter()
        .find(|r| r.weed_type == weed_type)
        .unwrap_or(&UNKNOWN_RECOMMENDATION)
}
