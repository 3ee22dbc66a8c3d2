//! Built-in prompt templates offered to the browser and the structured
//! instruction block appended to prompts in enriched mode.

use serde::Serialize;
use std::collections::BTreeMap;

/// Categories and their canned prompts.
const TEMPLATES: [(&str, &str); 5] = [
    (
        "plant_disease",
        "Examine this plant image for signs of disease, pests or nutrient \
         deficiency. Identify the likely crop, describe visible symptoms on \
         leaves, stems and fruit, name the most probable disease or pest, and \
         estimate how far it has spread.",
    ),
    (
        "soil_analysis",
        "Analyze this soil sample image. Describe its color, texture, \
         structure and visible moisture, estimate organic matter content and \
         likely soil type, and point out any signs of erosion, compaction, \
         salinity or contamination.",
    ),
    (
        "livestock_health",
        "Assess the health of the animal in this image. Identify the species \
         and breed if possible, evaluate body condition, coat or skin, eyes, \
         posture and gait, and note any wounds, swelling, parasites or other \
         signs of illness or distress.",
    ),
    (
        "poultry_diagnosis",
        "Inspect the poultry in this image for health problems. Evaluate \
         feathers, comb, wattles, eyes, legs and droppings if visible, and \
         identify signs of respiratory disease, mites, malnutrition or \
         injury.",
    ),
    (
        "equipment_check",
        "Inspect the farm equipment in this image. Identify the machine or \
         implement, describe its visible condition, and point out wear, rust, \
         leaks, damaged parts or safety hazards that need maintenance.",
    ),
];

/// Section headings requested from the model in enriched mode.
pub const REPORT_SECTIONS: [&str; 6] = [
    "Overview",
    "Key Findings",
    "Severity/Condition Score",
    "Detailed Analysis",
    "Recommendations",
    "Preventive Measures",
];

/// Read-only map from category key to prompt text, built once at startup
/// and shared between handlers.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct PromptCatalog {
    templates: BTreeMap<&'static str, &'static str>,
}

impl PromptCatalog {
    pub fn builtin() -> Self {
        Self {
            templates: TEMPLATES.into_iter().collect(),
        }
    }

    pub fn get(&self, category: &str) -> Option<&'static str> {
        self.templates.get(category).copied()
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.templates.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl Default for PromptCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Appends the report-format instructions to a user prompt.
pub fn enhance_prompt(prompt: &str) -> String {
    let mut enhanced = String::with_capacity(prompt.len() + 512);
    enhanced.push_str(prompt);
    enhanced.push_str(
        "\n\nPlease structure your response with the following sections, \
         using clear headings and bullet points:\n",
    );
    for (index, section) in REPORT_SECTIONS.iter().enumerate() {
        enhanced.push_str(&format!("{}. **{}**\n", index + 1, section));
    }
    enhanced.push_str(
        "\nUnder Severity/Condition Score give a rating from 1 (healthy) to \
         10 (critical) with a short justification. Keep each bullet concise \
         and practical for a farmer.",
    );
    enhanced
}
