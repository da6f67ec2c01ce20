//! Static workers' compensation dataset
//!
//! Forty catalog entities and twenty claim notes across twelve claims. The
//! notes mention entities by canonical name, by name without the "Dr. "
//! honorific, and through possessives, which exercises every matcher path.

use super::Dataset;
use crate::model::{Document, Entity, EntityCategory};

const ENTITIES: &[(&str, EntityCategory, bool)] = &[
    ("Dr. Michael Rodriguez", EntityCategory::Doctor, true),
    ("Sarah Thompson", EntityCategory::RegularPerson, false),
    ("Atlantic Medical Group", EntityCategory::Business, true),
    ("James Mitchell", EntityCategory::Lawyer, true),
    ("Lisa Chen", EntityCategory::RegularPerson, false),
    ("Robert Davis", EntityCategory::Driver, false),
    ("Quick Heal Physical Therapy", EntityCategory::Business, true),
    ("Dr. Jennifer Walsh", EntityCategory::Doctor, false),
    ("Maria Gonzalez", EntityCategory::RegularPerson, false),
    ("David Park", EntityCategory::Driver, true),
    ("Thompson & Associates Law", EntityCategory::Business, true),
    ("Dr. Amanda Foster", EntityCategory::Doctor, false),
    ("Kevin O'Brien", EntityCategory::RegularPerson, false),
    ("Summit Construction LLC", EntityCategory::Business, false),
    ("Patricia Williams", EntityCategory::RegularPerson, false),
    ("Dr. Steven Kim", EntityCategory::Doctor, true),
    ("Elite Diagnostics Center", EntityCategory::Business, true),
    ("Mark Johnson", EntityCategory::Driver, false),
    ("Rachel Green", EntityCategory::Lawyer, false),
    ("Tony Ricci", EntityCategory::RegularPerson, true),
    ("Northside Medical Plaza", EntityCategory::Business, false),
    ("Dr. Carlos Mendez", EntityCategory::Doctor, true),
    ("Janet Murphy", EntityCategory::RegularPerson, false),
    ("Global Shipping Services", EntityCategory::Business, false),
    ("Frank Harrison", EntityCategory::Driver, false),
    ("Miller Defense Attorneys", EntityCategory::Business, true),
    ("Dr. Lisa Patel", EntityCategory::Doctor, false),
    ("Brandon Taylor", EntityCategory::RegularPerson, false),
    ("Emma Watson", EntityCategory::Lawyer, false),
    ("City Medical Associates", EntityCategory::Business, false),
    ("Dr. Thomas Burke", EntityCategory::Doctor, false),
    ("Angela Scott", EntityCategory::RegularPerson, true),
    ("Precision Logistics Inc", EntityCategory::Business, false),
    ("Chris Adams", EntityCategory::Driver, true),
    ("Valley Orthopedic Clinic", EntityCategory::Business, false),
    ("Dr. Nicole Zhang", EntityCategory::Doctor, false),
    ("Metro Legal Group", EntityCategory::Business, true),
    ("Daniel Cooper", EntityCategory::RegularPerson, false),
    ("Samantha Lee", EntityCategory::Lawyer, true),
    ("Progressive Wellness Center", EntityCategory::Business, true),
];

const NOTES: &[(&str, &str)] = &[
    (
        "WC-2024-001",
        "Initial claim received for workplace injury at Summit Construction LLC. Claimant Sarah Thompson reports back strain while lifting materials on 3/15/24. Witness Mark Johnson confirmed incident occurred during normal work duties. Medical attention sought at Northside Medical Plaza same day.",
    ),
    (
        "WC-2024-001",
        "Follow-up with treating physician Dr. Jennifer Walsh regarding Sarah Thompson's back injury. Medical records show consistent findings with reported mechanism of injury.",
    ),
    (
        "WC-2024-001",
        "Sarah Thompson returned to full duty on 4/20/24 as cleared by Dr. Jennifer Walsh. Summit Construction LLC confirmed employee performance remains satisfactory.",
    ),
    (
        "WC-2024-002",
        "New claim filed by David Park, driver for Global Shipping Services, alleging shoulder injury from vehicle rollover on 4/2/24. Claimant sought treatment at Atlantic Medical Group with Dr. Michael Rodriguez.",
    ),
    (
        "WC-2024-002",
        "Surveillance conducted on David Park shows activities inconsistent with reported shoulder limitations. Treatment records from Dr. Michael Rodriguez show minimal objective findings despite extensive symptom complaints.",
    ),
    (
        "WC-2024-003",
        "Lisa Chen, warehouse worker, sustained ankle fracture after fall from ladder at Precision Logistics Inc on 4/10/24. Incident witnessed by Patricia Williams and Frank Harrison. Immediate medical attention provided by Dr. Amanda Foster at City Medical Associates.",
    ),
    (
        "WC-2024-003",
        "Lisa Chen underwent successful ankle surgery performed by Dr. Thomas Burke at Valley Orthopedic Clinic. Estimated time loss 12-16 weeks.",
    ),
    (
        "WC-2024-004",
        "Robert Davis, delivery driver, reports repetitive stress injury to wrists and forearms. Initial evaluation by Dr. Lisa Patel shows early signs of carpal tunnel syndrome. Work conditioning program recommended through Quick Heal Physical Therapy.",
    ),
    (
        "WC-2024-005",
        "Complex claim involving Maria Gonzalez who sustained multiple injuries in workplace machinery accident. Legal representation by Emma Watson from Miller Defense Attorneys raising questions about safety violations. Dr. Carlos Mendez at Elite Diagnostics Center conducting extensive diagnostic testing.",
    ),
    (
        "WC-2024-005",
        "Settlement discussions initiated for Maria Gonzalez claim through attorney Emma Watson. Independent medical examination scheduled with Dr. Nicole Zhang to assess permanent disability rating.",
    ),
    (
        "WC-2024-006",
        "Kevin O'Brien sustained chemical burn injury during routine maintenance at Atlantic Medical Group facility. Immediate treatment provided by Dr. Steven Kim showing second-degree burns requiring specialized care.",
    ),
    (
        "WC-2024-007",
        "Suspicious claim filed by Tony Ricci alleging back injury with no witnesses present. Treatment sought exclusively at Quick Heal Physical Therapy with excessive therapy utilization. Legal representation by James Mitchell from Thompson & Associates Law raising red flags.",
    ),
    (
        "WC-2024-007",
        "Investigation results for Tony Ricci claim reveal social media posts showing activities inconsistent with disability claims. Treatment provider Quick Heal Physical Therapy has history of questionable billing practices. Attorney James Mitchell represents multiple suspicious claims.",
    ),
    (
        "WC-2024-008",
        "Janet Murphy, office administrator, developed gradual onset back pain over several months. Ergonomic assessment conducted by Brandon Taylor identified workstation deficiencies. Conservative treatment with Dr. Jennifer Walsh showing good progress.",
    ),
    (
        "WC-2024-009",
        "Chris Adams sustained laceration injury requiring emergency surgery at Northside Medical Plaza. Dr. Amanda Foster performed successful repair with good healing progress noted. Employer Summit Construction LLC reviewing safety procedures.",
    ),
    (
        "WC-2024-010",
        "Daniel Cooper reports hearing loss allegedly from prolonged noise exposure at Metro Legal Group office location. Audiological testing by Dr. Nicole Zhang shows results inconsistent with claimed exposure levels.",
    ),
    (
        "WC-2024-010",
        "Hearing loss claim for Daniel Cooper requires additional medical evaluation by specialist Dr. Thomas Burke. Independent assessment confirms pre-existing condition significantly contributing to current hearing status.",
    ),
    (
        "WC-2024-011",
        "Angela Scott sustained serious injury in forklift accident witnessed by multiple employees including Samantha Lee. Emergency treatment at Valley Orthopedic Clinic with Dr. Carlos Mendez revealed multiple fractures requiring extensive rehabilitation.",
    ),
    (
        "WC-2024-012",
        "Routine claim closure for Mark Johnson's minor laceration injury treated at City Medical Associates. Dr. Lisa Patel provided appropriate care with complete healing achieved within standard timeframe.",
    ),
    (
        "WC-2024-012",
        "Final settlement reached for Mark Johnson claim with total costs of $1,450 including medical expenses and wage replacement. Dr. Lisa Patel released claimant to full duty status.",
    ),
];

/// Build the static dataset. Note ids are `N001`..`N020` in listing order.
pub fn workers_comp_fixture() -> Dataset {
    let entities = ENTITIES
        .iter()
        .map(|&(name, category, is_fraud)| Entity::new(name, category, is_fraud))
        .collect();

    let documents = NOTES
        .iter()
        .enumerate()
        .map(|(i, &(claim, text))| Document::new(format!("N{:03}", i + 1), claim, text))
        .collect();

    Dataset::new(entities, documents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_shape() {
        let dataset = workers_comp_fixture();

        assert_eq!(dataset.entities.len(), 40);
        assert_eq!(dataset.documents.len(), 20);
        assert_eq!(dataset.claims().len(), 12);
        assert!(dataset.validate().is_ok());
    }

    #[test]
    fn test_fixture_fraud_flags() {
        let dataset = workers_comp_fixture();
        let fraud = dataset.entities.iter().filter(|e| e.is_fraud).count();
        assert_eq!(fraud, 16);
    }
}
