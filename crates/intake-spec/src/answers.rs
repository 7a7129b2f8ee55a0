use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Raised when a wire key does not name a known field, service or rank.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownKey {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownKey {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Single-valued answer fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarField {
    Name,
    Age,
    Gender,
    Contact,
    Address,
    EmergencyContact,
    BloodGroup,
    Area,
    VisitedDoctor,
    OtherReason,
    UseWellnessCentre,
    CghsImportance,
    WrongTreatment,
    WrongTreatmentDetails,
    BloodTestCost,
    GenericMedicines,
    HealthSessions,
    HealthTopics,
    Feedback,
    FollowUp,
    Phone,
    Whatsapp,
    Satisfaction,
}

impl ScalarField {
    pub const ALL: [ScalarField; 23] = [
        ScalarField::Name,
        ScalarField::Age,
        ScalarField::Gender,
        ScalarField::Contact,
        ScalarField::Address,
        ScalarField::EmergencyContact,
        ScalarField::BloodGroup,
        ScalarField::Area,
        ScalarField::VisitedDoctor,
        ScalarField::OtherReason,
        ScalarField::UseWellnessCentre,
        ScalarField::CghsImportance,
        ScalarField::WrongTreatment,
        ScalarField::WrongTreatmentDetails,
        ScalarField::BloodTestCost,
        ScalarField::GenericMedicines,
        ScalarField::HealthSessions,
        ScalarField::HealthTopics,
        ScalarField::Feedback,
        ScalarField::FollowUp,
        ScalarField::Phone,
        ScalarField::Whatsapp,
        ScalarField::Satisfaction,
    ];

    /// Personal fields that must be filled before a submission is accepted.
    pub const REQUIRED: [ScalarField; 7] = [
        ScalarField::Name,
        ScalarField::Age,
        ScalarField::Gender,
        ScalarField::Contact,
        ScalarField::Address,
        ScalarField::EmergencyContact,
        ScalarField::BloodGroup,
    ];

    /// Column / question id used on the wire.
    pub fn key(self) -> &'static str {
        match self {
            ScalarField::Name => "name",
            ScalarField::Age => "age",
            ScalarField::Gender => "gender",
            ScalarField::Contact => "contact",
            ScalarField::Address => "address",
            ScalarField::EmergencyContact => "emergency_contact",
            ScalarField::BloodGroup => "blood_group",
            ScalarField::Area => "area",
            ScalarField::VisitedDoctor => "visited_doctor",
            ScalarField::OtherReason => "other_reason",
            ScalarField::UseWellnessCentre => "use_wellness_centre",
            ScalarField::CghsImportance => "cghs_importance",
            ScalarField::WrongTreatment => "wrong_treatment",
            ScalarField::WrongTreatmentDetails => "wrong_treatment_details",
            ScalarField::BloodTestCost => "blood_test_cost",
            ScalarField::GenericMedicines => "generic_medicines",
            ScalarField::HealthSessions => "health_sessions",
            ScalarField::HealthTopics => "health_topics",
            ScalarField::Feedback => "feedback",
            ScalarField::FollowUp => "follow_up",
            ScalarField::Phone => "phone",
            ScalarField::Whatsapp => "whatsapp",
            ScalarField::Satisfaction => "satisfaction",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }

    pub fn is_required(self) -> bool {
        Self::REQUIRED.contains(&self)
    }
}

impl fmt::Display for ScalarField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Multi-select answer fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetField {
    NoVisitReasons,
    VisitHours,
}

impl SetField {
    pub const ALL: [SetField; 2] = [SetField::NoVisitReasons, SetField::VisitHours];

    pub fn key(self) -> &'static str {
        match self {
            SetField::NoVisitReasons => "no_visit_reasons",
            SetField::VisitHours => "visit_hours",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }
}

impl fmt::Display for SetField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Column / question id of the ranking question.
pub const SERVICES_NEEDED: &str = "services_needed";

/// Services that can be ranked in the "services needed" question, in catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Service {
    GeneralOpd,
    Daycare,
    SuperSpeciality,
    Diagnostic,
    CghsSupport,
    GenericMedicines,
    PreventiveCheckups,
}

impl Service {
    pub const ALL: [Service; 7] = [
        Service::GeneralOpd,
        Service::Daycare,
        Service::SuperSpeciality,
        Service::Diagnostic,
        Service::CghsSupport,
        Service::GenericMedicines,
        Service::PreventiveCheckups,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Service::GeneralOpd => "general-opd",
            Service::Daycare => "daycare",
            Service::SuperSpeciality => "super-speciality",
            Service::Diagnostic => "diagnostic",
            Service::CghsSupport => "cghs-support",
            Service::GenericMedicines => "generic-medicines",
            Service::PreventiveCheckups => "preventive-checkups",
        }
    }
}

impl FromStr for Service {
    type Err = UnknownKey;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|service| service.as_str() == raw)
            .ok_or_else(|| UnknownKey::new("service", raw))
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Priority given to a service. Stored as the literal strings "1", "2", "3".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rank {
    First,
    Second,
    Third,
}

impl Rank {
    pub const ALL: [Rank; 3] = [Rank::First, Rank::Second, Rank::Third];

    pub fn value(self) -> u8 {
        match self {
            Rank::First => 1,
            Rank::Second => 2,
            Rank::Third => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Rank::First => "1",
            Rank::Second => "2",
            Rank::Third => "3",
        }
    }
}

impl TryFrom<u64> for Rank {
    type Error = UnknownKey;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Rank::First),
            2 => Ok(Rank::Second),
            3 => Ok(Rank::Third),
            other => Err(UnknownKey::new("rank", &other.to_string())),
        }
    }
}

impl FromStr for Rank {
    type Err = UnknownKey;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim() {
            "1" => Ok(Rank::First),
            "2" => Ok(Rank::Second),
            "3" => Ok(Rank::Third),
            _ => Err(UnknownKey::new("rank", raw)),
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Rank {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Rank {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RankVisitor;

        impl Visitor<'_> for RankVisitor {
            type Value = Rank;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a rank of \"1\", \"2\" or \"3\"")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Rank, E> {
                value.parse().map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Rank, E> {
                Rank::try_from(value).map_err(E::custom)
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Rank, E> {
                u64::try_from(value)
                    .map_err(E::custom)
                    .and_then(|value| Rank::try_from(value).map_err(E::custom))
            }
        }

        deserializer.deserialize_any(RankVisitor)
    }
}

/// A rank that may be blank. `""` and `null` mean unranked.
struct BlankableRank(Option<Rank>);

impl<'de> Deserialize<'de> for BlankableRank {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct BlankableVisitor;

        impl<'de> Visitor<'de> for BlankableVisitor {
            type Value = BlankableRank;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a rank of \"1\", \"2\" or \"3\", or an empty value")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<BlankableRank, E> {
                if value.trim().is_empty() {
                    return Ok(BlankableRank(None));
                }
                value.parse().map(|rank| BlankableRank(Some(rank))).map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<BlankableRank, E> {
                Rank::try_from(value)
                    .map(|rank| BlankableRank(Some(rank)))
                    .map_err(E::custom)
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<BlankableRank, E> {
                u64::try_from(value)
                    .map_err(E::custom)
                    .and_then(|value| self.visit_u64(value))
            }

            fn visit_unit<E: de::Error>(self) -> Result<BlankableRank, E> {
                Ok(BlankableRank(None))
            }

            fn visit_none<E: de::Error>(self) -> Result<BlankableRank, E> {
                Ok(BlankableRank(None))
            }

            fn visit_some<D: Deserializer<'de>>(
                self,
                deserializer: D,
            ) -> Result<BlankableRank, D::Error> {
                deserializer.deserialize_any(self)
            }
        }

        deserializer.deserialize_any(BlankableVisitor)
    }
}

/// Reads an optional rank, treating `""` and `null` as unranked.
pub(crate) fn deserialize_optional_rank<'de, D>(deserializer: D) -> Result<Option<Rank>, D::Error>
where
    D: Deserializer<'de>,
{
    BlankableRank::deserialize(deserializer).map(|rank| rank.0)
}

/// Reads the services mapping, dropping services stored with a blank rank.
fn deserialize_services<'de, D>(deserializer: D) -> Result<BTreeMap<Service, Rank>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<Service, BlankableRank>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|(service, rank)| rank.0.map(|rank| (service, rank)))
        .collect())
}

/// The complete set of a respondent's answers for one submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnswerSet {
    pub name: String,
    pub age: String,
    pub gender: String,
    pub contact: String,
    pub address: String,
    pub emergency_contact: String,
    pub blood_group: String,
    pub area: String,
    pub visited_doctor: String,
    pub no_visit_reasons: Vec<String>,
    pub other_reason: String,
    #[serde(deserialize_with = "deserialize_services")]
    pub services_needed: BTreeMap<Service, Rank>,
    pub use_wellness_centre: String,
    pub cghs_importance: String,
    pub wrong_treatment: String,
    pub wrong_treatment_details: String,
    pub blood_test_cost: String,
    pub generic_medicines: String,
    pub visit_hours: Vec<String>,
    pub health_sessions: String,
    pub health_topics: String,
    pub feedback: String,
    pub follow_up: String,
    pub phone: String,
    pub whatsapp: String,
    pub satisfaction: String,
}

impl AnswerSet {
    /// Creates a fresh empty answer set.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self, field: ScalarField) -> &str {
        match field {
            ScalarField::Name => &self.name,
            ScalarField::Age => &self.age,
            ScalarField::Gender => &self.gender,
            ScalarField::Contact => &self.contact,
            ScalarField::Address => &self.address,
            ScalarField::EmergencyContact => &self.emergency_contact,
            ScalarField::BloodGroup => &self.blood_group,
            ScalarField::Area => &self.area,
            ScalarField::VisitedDoctor => &self.visited_doctor,
            ScalarField::OtherReason => &self.other_reason,
            ScalarField::UseWellnessCentre => &self.use_wellness_centre,
            ScalarField::CghsImportance => &self.cghs_importance,
            ScalarField::WrongTreatment => &self.wrong_treatment,
            ScalarField::WrongTreatmentDetails => &self.wrong_treatment_details,
            ScalarField::BloodTestCost => &self.blood_test_cost,
            ScalarField::GenericMedicines => &self.generic_medicines,
            ScalarField::HealthSessions => &self.health_sessions,
            ScalarField::HealthTopics => &self.health_topics,
            ScalarField::Feedback => &self.feedback,
            ScalarField::FollowUp => &self.follow_up,
            ScalarField::Phone => &self.phone,
            ScalarField::Whatsapp => &self.whatsapp,
            ScalarField::Satisfaction => &self.satisfaction,
        }
    }

    fn text_mut(&mut self, field: ScalarField) -> &mut String {
        match field {
            ScalarField::Name => &mut self.name,
            ScalarField::Age => &mut self.age,
            ScalarField::Gender => &mut self.gender,
            ScalarField::Contact => &mut self.contact,
            ScalarField::Address => &mut self.address,
            ScalarField::EmergencyContact => &mut self.emergency_contact,
            ScalarField::BloodGroup => &mut self.blood_group,
            ScalarField::Area => &mut self.area,
            ScalarField::VisitedDoctor => &mut self.visited_doctor,
            ScalarField::OtherReason => &mut self.other_reason,
            ScalarField::UseWellnessCentre => &mut self.use_wellness_centre,
            ScalarField::CghsImportance => &mut self.cghs_importance,
            ScalarField::WrongTreatment => &mut self.wrong_treatment,
            ScalarField::WrongTreatmentDetails => &mut self.wrong_treatment_details,
            ScalarField::BloodTestCost => &mut self.blood_test_cost,
            ScalarField::GenericMedicines => &mut self.generic_medicines,
            ScalarField::HealthSessions => &mut self.health_sessions,
            ScalarField::HealthTopics => &mut self.health_topics,
            ScalarField::Feedback => &mut self.feedback,
            ScalarField::FollowUp => &mut self.follow_up,
            ScalarField::Phone => &mut self.phone,
            ScalarField::Whatsapp => &mut self.whatsapp,
            ScalarField::Satisfaction => &mut self.satisfaction,
        }
    }

    /// Overwrites a scalar field.
    pub fn set_text(&mut self, field: ScalarField, value: impl Into<String>) {
        *self.text_mut(field) = value.into();
    }

    pub fn members(&self, field: SetField) -> &[String] {
        match field {
            SetField::NoVisitReasons => &self.no_visit_reasons,
            SetField::VisitHours => &self.visit_hours,
        }
    }

    fn members_mut(&mut self, field: SetField) -> &mut Vec<String> {
        match field {
            SetField::NoVisitReasons => &mut self.no_visit_reasons,
            SetField::VisitHours => &mut self.visit_hours,
        }
    }

    /// Adds `value` to the set when `present`, removes it otherwise.
    ///
    /// Adding a value that is already present and removing an absent one are
    /// both no-ops. Returns whether the set changed.
    pub fn toggle_member(&mut self, field: SetField, value: impl Into<String>, present: bool) -> bool {
        let value = value.into();
        let members = self.members_mut(field);
        let position = members.iter().position(|member| *member == value);
        match (present, position) {
            (true, None) => {
                members.push(value);
                true
            }
            (false, Some(idx)) => {
                members.remove(idx);
                true
            }
            _ => false,
        }
    }

    pub fn rank(&self, service: Service) -> Option<Rank> {
        self.services_needed.get(&service).copied()
    }

    /// Writes or clears the rank of one service, returning the previous rank.
    pub fn set_rank(&mut self, service: Service, rank: Option<Rank>) -> Option<Rank> {
        match rank {
            Some(rank) => self.services_needed.insert(service, rank),
            None => self.services_needed.remove(&service),
        }
    }

    /// Ranked services ordered by rank, ties kept in catalog order.
    pub fn ranked_services(&self) -> Vec<(Service, Rank)> {
        let mut ranked = self
            .services_needed
            .iter()
            .map(|(service, rank)| (*service, *rank))
            .collect::<Vec<_>>();
        ranked.sort_by_key(|(_, rank)| *rank);
        ranked
    }

    /// True when no field carries a value.
    pub fn is_blank(&self) -> bool {
        ScalarField::ALL
            .iter()
            .all(|field| self.text(*field).is_empty())
            && SetField::ALL
                .iter()
                .all(|field| self.members(*field).is_empty())
            && self.services_needed.is_empty()
    }

    /// Serializes the answer set as indented JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_keys_roundtrip() {
        for field in ScalarField::ALL {
            assert_eq!(ScalarField::from_key(field.key()), Some(field));
        }
        for field in SetField::ALL {
            assert_eq!(SetField::from_key(field.key()), Some(field));
        }
        assert_eq!(ScalarField::from_key("services_needed"), None);
    }

    #[test]
    fn ranked_services_breaks_ties_by_catalog_order() {
        let mut answers = AnswerSet::new();
        answers.set_rank(Service::PreventiveCheckups, Some(Rank::First));
        answers.set_rank(Service::Daycare, Some(Rank::Second));
        answers.set_rank(Service::GeneralOpd, Some(Rank::First));

        assert_eq!(
            answers.ranked_services(),
            vec![
                (Service::GeneralOpd, Rank::First),
                (Service::PreventiveCheckups, Rank::First),
                (Service::Daycare, Rank::Second),
            ]
        );
    }

    #[test]
    fn clearing_rank_removes_key() {
        let mut answers = AnswerSet::new();
        answers.set_rank(Service::Diagnostic, Some(Rank::Third));
        assert_eq!(answers.set_rank(Service::Diagnostic, None), Some(Rank::Third));
        assert!(answers.services_needed.is_empty());
    }

    #[test]
    fn rank_accepts_strings_and_numbers() {
        let from_str: Rank = serde_json::from_str("\"2\"").expect("string rank");
        let from_num: Rank = serde_json::from_str("3").expect("numeric rank");
        assert_eq!(from_str, Rank::Second);
        assert_eq!(from_num, Rank::Third);
        assert!(serde_json::from_str::<Rank>("\"\"").is_err());
        assert!(serde_json::from_str::<Rank>("4").is_err());
    }

    #[test]
    fn answer_set_json_uses_wire_keys() {
        let mut answers = AnswerSet::new();
        answers.set_rank(Service::CghsSupport, Some(Rank::First));
        let value = serde_json::to_value(&answers).expect("serialize");
        assert_eq!(value["services_needed"]["cghs-support"], "1");
        assert_eq!(value["emergency_contact"], "");

        let parsed: AnswerSet = serde_json::from_str(r#"{ "name": "Asha" }"#).expect("partial");
        assert_eq!(parsed.name, "Asha");
        assert!(parsed.visit_hours.is_empty());
    }

    #[test]
    fn blank_ranks_mean_unranked() {
        let parsed: AnswerSet = serde_json::from_str(
            r#"{ "services_needed": { "daycare": "", "diagnostic": "1", "cghs-support": null } }"#,
        )
        .expect("blank ranks accepted");
        assert_eq!(parsed.rank(Service::Diagnostic), Some(Rank::First));
        assert_eq!(parsed.rank(Service::Daycare), None);
        assert_eq!(parsed.services_needed.len(), 1);
    }
}
