use serde::Serialize;

pub const PRODUCT_NAME: &str = "IntelliCare";
pub const TAGLINE: &str = "AI triage that tells you how urgently to seek care.";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Feature {
    pub title: &'static str,
    pub blurb: &'static str,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Hero {
    pub headline: &'static str,
    pub subheadline: &'static str,
    pub call_to_action: &'static str,
}

pub const HERO: Hero = Hero {
    headline: "Know where to go, before you go.",
    subheadline: "Describe your symptoms in plain words. IntelliCare asks a few follow-up \
                  questions, then recommends an urgency level and the department to visit.",
    call_to_action: "Start symptom check",
};

pub const FEATURES: &[Feature] = &[
    Feature {
        title: "Privacy-respecting",
        blurb: "Skip any personal question you'd rather not answer.",
    },
    Feature {
        title: "Medical history collection",
        blurb: "Conditions and medications you mention are folded into the assessment.",
    },
    Feature {
        title: "Smart triage system",
        blurb: "A five-level urgency scale, from immediate emergency to routine checkup.",
    },
    Feature {
        title: "Comprehensive differential diagnosis",
        blurb: "Ranked possible conditions with probabilities and a recommended department.",
    },
];
