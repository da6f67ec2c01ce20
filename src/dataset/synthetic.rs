//! Template-based synthetic claims generator
//!
//! Produces a catalog of doctors, lawyers, businesses and claimants plus
//! claim notes built from short templates. Output is a pure function of the
//! preset and the seed.

use super::{Dataset, DatasetError, DatasetResult};
use crate::model::{Document, Entity, EntityCategory};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::info;

const DOCTOR_FIRST: &[&str] = &[
    "Michael", "Jennifer", "Amanda", "Steven", "Carlos", "Lisa", "Thomas", "Nicole", "David",
    "Sarah", "Robert", "Patricia", "James", "Maria", "Kevin", "Daniel", "Angela", "Christopher",
    "Elizabeth", "Matthew", "Jessica", "Andrew", "Michelle", "Joshua", "Rachel", "Ryan",
    "Rebecca", "Brian", "Laura", "William",
];

const DOCTOR_LAST: &[&str] = &[
    "Rodriguez", "Walsh", "Foster", "Kim", "Mendez", "Patel", "Burke", "Zhang", "Smith",
    "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Martinez",
    "Hernandez", "Lopez", "Gonzalez", "Wilson", "Anderson", "Thomas",
];

const PERSON_FIRST: &[&str] = &[
    "Sarah", "David", "Lisa", "Robert", "Maria", "Kevin", "Patricia", "Frank", "Janet",
    "Brandon", "Emma", "Angela", "Mark", "Chris", "Samantha", "Daniel", "Michelle", "Steven",
    "Rachel", "Tony", "Jessica", "Andrew", "Nicole", "Brian",
];

const PERSON_LAST: &[&str] = &[
    "Thompson", "Park", "Chen", "Davis", "Gonzalez", "O'Brien", "Williams", "Harrison",
    "Murphy", "Taylor", "Watson", "Scott", "Johnson", "Adams", "Lee", "Cooper", "Mitchell",
    "Green", "Ricci", "Martinez", "Brown", "Moore", "Jackson", "White",
];

const BUSINESS_PREFIXES: &[&str] = &[
    "Atlantic", "Quick Heal", "Summit", "Elite", "Northside", "Thompson", "Miller", "City",
    "Valley", "Metro", "Precision", "Global", "Progressive", "Premier", "United", "National",
    "Regional", "Central", "Coastal", "Mountain",
];

const BUSINESS_SUFFIXES: &[&str] = &[
    "Medical Group", "Physical Therapy", "Construction LLC", "Diagnostics Center",
    "Medical Plaza", "Associates", "Defense Attorneys", "Medical Associates",
    "Orthopedic Clinic", "Legal Group", "Logistics Inc", "Shipping Services", "Wellness Center",
    "Care Center", "Health Services", "Solutions LLC",
];

const INJURY_TYPES: &[&str] = &[
    "back strain", "shoulder injury", "knee injury", "repetitive stress injury",
    "slip and fall", "lifting injury", "carpal tunnel syndrome", "neck strain", "ankle sprain",
    "wrist fracture", "chemical exposure", "hearing loss", "rotator cuff tear",
    "herniated disc", "soft tissue damage", "laceration",
];

const NOTE_TEMPLATES: &[&str] = &[
    "{claimant} filed claim for {injury_type} at {business}. Treated by {doctor}. Legal rep: {lawyer}.",
    "Workplace incident involving {claimant} at {business}. Medical evaluation by {doctor}. Attorney {lawyer} reviewing case.",
    "{doctor} provided treatment to {claimant} for {injury_type} sustained at {business}. {lawyer} handling legal matters.",
    "Claim filed: {claimant} injured at {business}. {doctor} ordered diagnostic testing. {lawyer} representing claimant.",
    "{claimant} sustained {injury_type}. Initial treatment at {business} facility by {doctor}. {lawyer} initiated proceedings.",
    "Workers comp case: {claimant} at {business}. Treatment provider: {doctor}. Legal counsel: {lawyer}.",
    "{doctor} evaluated {claimant} for {injury_type} from {business} incident. Legal representation by {lawyer}.",
    "Ongoing treatment for {claimant} by {doctor}. Incident occurred at {business}. {lawyer} managing claim.",
];

/// Network size presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    Demo,
    ClientPresentation,
    Production,
    StressTest,
}

impl Preset {
    pub fn sizes(&self) -> NetworkSizes {
        let (doctors, lawyers, businesses, claimants, claims) = match self {
            Preset::Demo => (10, 6, 12, 12, 25),
            Preset::ClientPresentation => (25, 18, 35, 70, 200),
            Preset::Production => (50, 40, 80, 200, 500),
            Preset::StressTest => (100, 80, 150, 400, 1000),
        };
        NetworkSizes {
            doctors,
            lawyers,
            businesses,
            claimants,
            claims,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Demo => "demo",
            Preset::ClientPresentation => "client_presentation",
            Preset::Production => "production",
            Preset::StressTest => "stress_test",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Preset {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "demo" => Ok(Preset::Demo),
            "client_presentation" => Ok(Preset::ClientPresentation),
            "production" => Ok(Preset::Production),
            "stress_test" => Ok(Preset::StressTest),
            other => Err(DatasetError::UnknownPreset(other.to_string())),
        }
    }
}

/// Entity and claim counts for one generated network
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkSizes {
    pub doctors: usize,
    pub lawyers: usize,
    pub businesses: usize,
    pub claimants: usize,
    pub claims: usize,
}

impl NetworkSizes {
    pub fn total_entities(&self) -> usize {
        self.doctors + self.lawyers + self.businesses + self.claimants
    }
}

/// Synthetic dataset generator
#[derive(Debug, Clone)]
pub struct SyntheticGenerator {
    sizes: NetworkSizes,
    fraud_ratio: f64,
    seed: u64,
}

impl SyntheticGenerator {
    pub fn new(preset: Preset, seed: u64) -> Self {
        Self::with_sizes(preset.sizes(), seed)
    }

    pub fn with_sizes(sizes: NetworkSizes, seed: u64) -> Self {
        Self {
            sizes,
            fraud_ratio: 0.35,
            seed,
        }
    }

    pub fn fraud_ratio(mut self, ratio: f64) -> Self {
        self.fraud_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    pub fn generate(&self) -> DatasetResult<Dataset> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let sizes = self.sizes;

        let mut entities = Vec::with_capacity(sizes.total_entities());
        let mut doctors = Vec::with_capacity(sizes.doctors);
        let mut lawyers = Vec::with_capacity(sizes.lawyers);
        let mut businesses = Vec::with_capacity(sizes.businesses);
        let mut claimants = Vec::with_capacity(sizes.claimants);

        for i in 0..sizes.doctors {
            let name = pooled_name("Dr. ", DOCTOR_FIRST, DOCTOR_LAST, i, DOCTOR_FIRST.len());
            doctors.push(name.clone());
            entities.push(Entity::new(name, EntityCategory::Doctor, rng.gen_bool(self.fraud_ratio)));
        }

        for i in 0..sizes.lawyers {
            let name = pooled_name("", PERSON_FIRST, PERSON_LAST, i, PERSON_FIRST.len());
            lawyers.push(name.clone());
            entities.push(Entity::new(name, EntityCategory::Lawyer, rng.gen_bool(self.fraud_ratio)));
        }

        for i in 0..sizes.businesses {
            let prefix = BUSINESS_PREFIXES[i % BUSINESS_PREFIXES.len()];
            let suffix = BUSINESS_SUFFIXES[i % BUSINESS_SUFFIXES.len()];
            let name = if i < BUSINESS_PREFIXES.len() {
                format!("{} {}", prefix, suffix)
            } else {
                format!("{} {} {}", prefix, suffix, i)
            };
            businesses.push(name.clone());
            entities.push(Entity::new(name, EntityCategory::Business, rng.gen_bool(self.fraud_ratio)));
        }

        // Claimants continue the person pool after the lawyers so names never collide
        for i in 0..sizes.claimants {
            let slot = sizes.lawyers + i;
            let name = pooled_name("", PERSON_FIRST, PERSON_LAST, slot, PERSON_FIRST.len());
            let category = if i % 3 == 0 {
                EntityCategory::Driver
            } else {
                EntityCategory::RegularPerson
            };
            claimants.push(name.clone());
            entities.push(Entity::new(name, category, rng.gen_bool(self.fraud_ratio)));
        }

        let mut documents = Vec::new();
        let mut note_counter = 1usize;

        for claim_idx in 0..sizes.claims {
            let claim = format!("WC-2024-{:04}", claim_idx + 1);
            let notes = rng.gen_range(1..4);

            for _ in 0..notes {
                let claimant = pick(&mut rng, &claimants, "Unknown Claimant");
                let doctor = pick(&mut rng, &doctors, "Dr. Unknown");
                let lawyer = pick(&mut rng, &lawyers, "Attorney Unknown");
                let business = pick(&mut rng, &businesses, "Unknown Business");
                let injury = INJURY_TYPES.choose(&mut rng).copied().unwrap_or("injury");
                let template = NOTE_TEMPLATES.choose(&mut rng).copied().unwrap_or(NOTE_TEMPLATES[0]);

                let text = template
                    .replace("{claimant}", &claimant)
                    .replace("{doctor}", &doctor)
                    .replace("{lawyer}", &lawyer)
                    .replace("{business}", &business)
                    .replace("{injury_type}", injury);

                documents.push(Document::new(format!("N{:05}", note_counter), claim.as_str(), text));
                note_counter += 1;
            }
        }

        info!(
            entities = entities.len(),
            doctors = sizes.doctors,
            lawyers = sizes.lawyers,
            businesses = sizes.businesses,
            claimants = sizes.claimants,
            claims = sizes.claims,
            notes = documents.len(),
            "Generated synthetic dataset"
        );

        let dataset = Dataset::new(entities, documents);
        dataset.validate()?;
        Ok(dataset)
    }
}

fn pooled_name(prefix: &str, first: &[&str], last: &[&str], i: usize, plain_limit: usize) -> String {
    let f = first[i % first.len()];
    let l = last[i % last.len()];
    if i < plain_limit {
        format!("{}{} {}", prefix, f, l)
    } else {
        format!("{}{} {}{}", prefix, f, l, i)
    }
}

fn pick(rng: &mut StdRng, pool: &[String], fallback: &str) -> String {
    pool.choose(rng).cloned().unwrap_or_else(|| fallback.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_sizes() {
        let sizes = Preset::ClientPresentation.sizes();
        assert_eq!(sizes.total_entities(), 148);
        assert_eq!(sizes.claims, 200);
        assert_eq!(Preset::Demo.sizes().total_entities(), 40);
    }

    #[test]
    fn test_preset_parse() {
        assert_eq!("stress_test".parse::<Preset>().unwrap(), Preset::StressTest);
        assert!(matches!(
            "huge".parse::<Preset>(),
            Err(DatasetError::UnknownPreset(_))
        ));
    }

    #[test]
    fn test_generation_is_deterministic_per_seed() {
        let a = SyntheticGenerator::new(Preset::Demo, 42).generate().unwrap();
        let b = SyntheticGenerator::new(Preset::Demo, 42).generate().unwrap();
        let c = SyntheticGenerator::new(Preset::Demo, 43).generate().unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_generated_shape() {
        let dataset = SyntheticGenerator::new(Preset::Demo, 1).generate().unwrap();

        assert_eq!(dataset.entities.len(), 40);
        assert_eq!(dataset.claims().len(), 25);
        assert!(dataset.documents.len() >= 25 && dataset.documents.len() <= 75);
        assert!(dataset.documents.iter().all(|d| d.claim.as_str().starts_with("WC-2024-")));
        assert!(dataset.documents.iter().all(|d| !d.text.contains('{')));
    }

    #[test]
    fn test_large_preset_names_are_unique() {
        // stress_test wraps every name pool, so suffixes must keep names distinct
        let dataset = SyntheticGenerator::with_sizes(
            NetworkSizes {
                doctors: 100,
                lawyers: 80,
                businesses: 150,
                claimants: 400,
                claims: 5,
            },
            3,
        )
        .generate();

        assert!(dataset.is_ok());
    }

    #[test]
    fn test_fraud_ratio_extremes() {
        let none = SyntheticGenerator::new(Preset::Demo, 9).fraud_ratio(0.0).generate().unwrap();
        let all = SyntheticGenerator::new(Preset::Demo, 9).fraud_ratio(1.0).generate().unwrap();

        assert!(none.entities.iter().all(|e| !e.is_fraud));
        assert!(all.entities.iter().all(|e| e.is_fraud));
    }
}
