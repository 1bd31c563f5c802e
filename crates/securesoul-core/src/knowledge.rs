//! Static per-domain reference material injected into generation prompts.
//!
//! The blobs are compiled in and never change at runtime.

use crate::schema::Domain;

const MENTAL_HEALTH_KB: &str = "\
- Tele-MANAS (national tele mental health programme): call 14416 or 1-800-891-4416, 24x7, free, in multiple Indian languages.
- KIRAN mental health rehabilitation helpline: 1800-599-0019.
- National Institute of Mental Health and Neuro-Sciences (NIMHANS): https://nimhans.ac.in
- Simple grounding: breathe in for 4 seconds, hold for 4, breathe out for 6. Name 5 things you can see.
- Talking to someone you trust, keeping a regular sleep routine and short daily walks all help with low mood.
- If you are thinking about harming yourself, call 14416 or the national emergency number 112 right away.";

const LEGAL_KB: &str = "\
- National Legal Services Authority (NALSA) free legal aid: helpline 15100, https://nalsa.gov.in
- Women, children, SC/ST members, industrial workmen, persons with disabilities and low-income citizens are entitled to free legal aid.
- File a police complaint (FIR) at any police station; a Zero FIR can be filed regardless of jurisdiction.
- Consumer complaints: National Consumer Helpline 1915, https://consumerhelpline.gov.in
- Cyber crime reporting: https://cybercrime.gov.in or call 1930.
- RTI (Right to Information) applications: https://rtionline.gov.in";

const GOVERNMENT_SCHEMES_KB: &str = "\
- myScheme portal to discover schemes you are eligible for: https://www.myscheme.gov.in
- Ayushman Bharat PM-JAY health cover up to Rs 5 lakh per family per year: https://pmjay.gov.in, helpline 14555.
- PM Kisan Samman Nidhi income support for farmers: https://pmkisan.gov.in
- National Scholarship Portal: https://scholarships.gov.in
- Pradhan Mantri Awas Yojana (housing): https://pmaymis.gov.in
- Apply for many state and central services through Common Service Centres (CSC) or https://services.india.gov.in";

const SAFETY_KB: &str = "\
- National emergency number: 112 (police, fire, ambulance).
- Police: 100. Fire: 101. Ambulance: 102.
- Women helpline: 181. Child helpline: 1098.
- Cyber fraud or online harassment: call 1930 or report at https://cybercrime.gov.in
- If you feel unsafe, move to a public, well-lit place and share your live location with someone you trust.
- The 112 India app can send an SOS alert with your location to emergency services.";

/// Per-domain knowledge snippets.
#[derive(Debug, Clone, Copy, Default)]
pub struct KnowledgeBase;

impl KnowledgeBase {
    pub fn new() -> Self {
        Self
    }

    /// Reference text for `domain`.
    pub fn snippet(&self, domain: Domain) -> &'static str {
        match domain {
            Domain::MentalHealth => MENTAL_HEALTH_KB,
            Domain::Legal => LEGAL_KB,
            Domain::GovernmentSchemes => GOVERNMENT_SCHEMES_KB,
            Domain::Safety => SAFETY_KB,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_domain_has_a_snippet() {
        let kb = KnowledgeBase::new();
        for d in Domain::ALL {
            assert!(!kb.snippet(d).is_empty(), "{} has no knowledge", d);
        }
    }

    #[test]
    fn safety_lists_emergency_numbers() {
        let s = KnowledgeBase::new().snippet(Domain::Safety);
        assert!(s.contains("112"));
        assert!(s.contains("Police: 100"));
    }
}
