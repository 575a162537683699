//! Static evidence citations shown alongside risk factors and treatments.
//!
//! This is reference data only; nothing here feeds the risk calculation.

use once_cell::sync::Lazy;
use serde::Serialize;

/// Citation for the risk model itself
pub const MODEL_CITATION: &str =
    "Dorresteijn JAN et al. Eur Heart J 2019;40(37):3133-3140 [PMID: 31211368]";

/// Topic an evidence entry supports
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceTopic {
    Smoking,
    Ldl,
    StatinHigh,
    Sbp,
}

/// A single evidence entry: the effect size and where it comes from
#[derive(Clone, Debug, Serialize)]
pub struct Evidence {
    pub topic: EvidenceTopic,
    pub effect: &'static str,
    pub source: &'static str,
}

static EVIDENCE: Lazy<Vec<Evidence>> = Lazy::new(|| {
    vec![
        Evidence {
            topic: EvidenceTopic::Smoking,
            effect: "2-4x higher risk of recurrent events",
            source: "Hackshaw et al. BMJ 2018 (PMID: 29367388)",
        },
        Evidence {
            topic: EvidenceTopic::Ldl,
            effect: "22% RR reduction per 1 mmol/L LDL reduction",
            source: "CTT Collaboration, Lancet 2010 (PMID: 21067804)",
        },
        Evidence {
            topic: EvidenceTopic::StatinHigh,
            effect: "35% RR reduction vs no statin",
            source: "TNT Trial, NEJM 2005 (PMID: 15930428)",
        },
        Evidence {
            topic: EvidenceTopic::Sbp,
            effect: "25% RR reduction with intensive control",
            source: "SPRINT Trial, NEJM 2015 (PMID: 26551272)",
        },
    ]
});

/// All evidence entries, in display order
pub fn all_evidence() -> &'static [Evidence] {
    &EVIDENCE
}

/// Look up the evidence entry for a topic
pub fn evidence_for(topic: EvidenceTopic) -> Option<&'static Evidence> {
    EVIDENCE.iter().find(|e| e.topic == topic)
}

impl Evidence {
    /// Single-line form used for hover/help text
    pub fn summary(&self) -> String {
        format!("{} | {}", self.effect, self.source)
    }
}
