//! Instruction block for sample analysis

use rockscan_domain::{AccessTier, Basin, OperatingMode};

/// Mohs hardness buckets offered to the model
pub const MOHS_SCALE: [&str; 8] = [
    "1.0-2.0", "2.0-3.0", "3.0-4.0", "4.0-5.0", "5.0-6.0", "6.0-7.0", "7.0-8.0", "8.0+",
];

/// Grain-size classes offered to the model, as (label, range)
pub const GRAIN_SIZE_CLASSES: [(&str, &str); 3] = [
    ("Fine", "< 0.18mm"),
    ("Medium", "0.10 - 0.18mm"),
    ("Coarse", "> 0.10mm"),
];

/// Builds the natural-language instruction sent alongside the still
///
/// Mode, tier and basin select vocabulary and depth only; the output
/// shape is fixed by the response schema.
pub struct PromptBuilder<'a> {
    mode: OperatingMode,
    tier: AccessTier,
    basin: &'a Basin,
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder
    pub fn new(mode: OperatingMode, tier: AccessTier, basin: &'a Basin) -> Self {
        Self { mode, tier, basin }
    }

    /// Build the complete instruction
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        // 1. Persona
        prompt.push_str(PERSONA);
        prompt.push_str("\n\n");

        // 2. Session parameters
        prompt.push_str(&format!(
            "Current Mode: {} ({})\n",
            self.mode.as_str(),
            self.mode.framing()
        ));
        prompt.push_str(&format!("User Level: {}\n", self.tier.as_str()));
        prompt.push_str(&format!(
            "Geological Basin Context: {} - {} ({})\n\n",
            self.basin.id.as_str(),
            self.basin.name,
            self.basin.description
        ));

        // 3. Framing for the capture mode
        prompt.push_str(match self.mode {
            OperatingMode::Field => FIELD_GUIDANCE,
            OperatingMode::Lab => LAB_GUIDANCE,
        });
        prompt.push_str("\n\n");

        // 4. Narrative depth
        prompt.push_str(match self.tier {
            AccessTier::Student => STUDENT_DEPTH,
            AccessTier::Researcher => RESEARCHER_DEPTH,
        });
        prompt.push_str("\n\n");

        // 5. Regional nuance
        prompt.push_str(&format!(
            "Include basin-specific nuances for {} where the evidence supports them.\n\n",
            self.basin.name
        ));

        // 6. Controlled vocabulary
        prompt.push_str(&format!(
            "Report hardness as one of these Mohs buckets: {}.\n",
            MOHS_SCALE.join(", ")
        ));
        let grain_classes: Vec<String> = GRAIN_SIZE_CLASSES
            .iter()
            .map(|(label, range)| format!("{} ({})", label, range))
            .collect();
        prompt.push_str(&format!(
            "Describe grain size using these classes: {}.\n\n",
            grain_classes.join(", ")
        ));

        // 7. Fossils and output rules
        prompt.push_str(FOSSIL_INSTRUCTIONS);
        prompt.push_str("\n\n");
        prompt.push_str(OUTPUT_RULES);

        prompt
    }
}

const PERSONA: &str = "You are an expert PhD Geologist specializing in regional tectonics and petrography. \
Analyze the provided image and return a JSON response with high scientific accuracy.";

const FIELD_GUIDANCE: &str = "The image is a macro view of a hand specimen or outcrop taken in the field. \
Base the identification on visible colour, lustre, fabric, fracture and weathering.";

const LAB_GUIDANCE: &str = "The image is a thin section under a petrographic microscope. \
Base the identification on crystal habit, optical texture and grain relationships.";

const STUDENT_DEPTH: &str = "Audience: Student. Write an approachable educationalNote that explains \
how the sample formed and which features identify it.";

const RESEARCHER_DEPTH: &str = "Audience: Researcher. Provide a professionalInsight with technical \
depth, a stratigraphicContext correlating the sample with known units, and a provenance \
interpretation (rounding, transportDistance, basinSource) when clasts are visible.";

const FOSSIL_INSTRUCTIONS: &str = "Detect whether the object is a fossil and set isFossil accordingly. \
If it is, set fossilAuthenticity to your confidence (0.0-1.0) that it is genuine rather than a \
pseudofossil or artifact. Omit fossilAuthenticity when isFossil is false.";

const OUTPUT_RULES: &str = r#"Output rules:
- confidence is a number between 0.0 and 1.0
- mineralogy lists at least one mineral, most abundant first
- rockType is Igneous, Sedimentary, Metamorphic or another broad category
- Return a single JSON object matching the response schema, no additional text"#;
