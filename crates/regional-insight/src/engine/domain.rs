use super::resolver;
use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// Categorical "is this facility/system here" signal, parsed once at ingestion.
///
/// The data service reports presence as free text (`"Ada"`, `"ada"`, ...). Two readings exist:
/// facility fields count any text containing the marker `ada` ([`Presence::from_text`]), while
/// hazard fields such as `disaster_exist` must read exactly `ada` ([`Presence::from_exact_text`]),
/// so `"Tidak ada"` is absent there. Empty or missing text is unknown under both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Presence {
    Present,
    Absent,
    #[default]
    Unknown,
}

impl Presence {
    pub const PRESENT_MARKER: &'static str = "ada";

    pub fn from_text(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            Self::Unknown
        } else if trimmed.to_lowercase().contains(Self::PRESENT_MARKER) {
            Self::Present
        } else {
            Self::Absent
        }
    }

    /// Present only when the trimmed text is the marker itself, ignoring case.
    pub fn from_exact_text(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            Self::Unknown
        } else if trimmed.eq_ignore_ascii_case(Self::PRESENT_MARKER) {
            Self::Present
        } else {
            Self::Absent
        }
    }

    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(text) => Self::from_text(text),
            other => Self::from_flag(other),
        }
    }

    pub fn from_exact_value(value: &Value) -> Self {
        match value {
            Value::String(text) => Self::from_exact_text(text),
            other => Self::from_flag(other),
        }
    }

    fn from_flag(value: &Value) -> Self {
        match value {
            Value::Bool(true) => Self::Present,
            Value::Bool(false) => Self::Absent,
            _ => Self::Unknown,
        }
    }

    pub const fn is_present(self) -> bool {
        matches!(self, Self::Present)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Present => "Present",
            Self::Absent => "Absent",
            Self::Unknown => "Unknown",
        }
    }
}

/// The named domain blocks a village record may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainBlock {
    Health,
    Economy,
    Digital,
    Disease,
    Disaster,
    Infrastructure,
    Security,
    Sanitation,
    Social,
    Criminal,
}

impl DomainBlock {
    pub const fn key(self) -> &'static str {
        match self {
            Self::Health => "health",
            Self::Economy => "economy",
            Self::Digital => "digital",
            Self::Disease => "disease",
            Self::Disaster => "disaster",
            Self::Infrastructure => "infrastructure",
            Self::Security => "security",
            Self::Sanitation => "sanitation",
            Self::Social => "social",
            Self::Criminal => "criminal",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DiseaseBlock {
    #[serde(deserialize_with = "lenient_number")]
    pub disability_population: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub infectious_cases: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub dbd_cases: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub dbd_deaths: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub malaria_cases: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub malaria_deaths: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub muntaber_cases: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub muntaber_deaths: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub campak_cases: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub campak_deaths: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub sars_cases: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub sars_deaths: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub hepatitis_e_cases: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub hepatitis_e_deaths: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub difteri_cases: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub difteri_deaths: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub covid_cases: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub covid_deaths: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DigitalBlock {
    #[serde(deserialize_with = "lenient_presence")]
    pub village_information_system: Presence,
    #[serde(deserialize_with = "lenient_text")]
    pub signal_strength: String,
    #[serde(deserialize_with = "lenient_number")]
    pub bts_count: f64,
}

impl DigitalBlock {
    pub fn has_strong_signal(&self) -> bool {
        self.signal_strength.to_lowercase().contains("kuat")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EconomyBlock {
    #[serde(deserialize_with = "lenient_number")]
    pub markets: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub bumdes: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub cooperatives: f64,
    #[serde(deserialize_with = "lenient_text")]
    pub primary_income: String,
}

impl EconomyBlock {
    /// Markets plus village-owned enterprises, the dashboard's notion of economic activity.
    pub fn activity(&self) -> f64 {
        self.markets + self.bumdes
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DisasterBlock {
    #[serde(deserialize_with = "exact_presence")]
    pub disaster_exist: Presence,
    #[serde(deserialize_with = "lenient_number")]
    pub flood: f64,
    #[serde(deserialize_with = "lenient_presence")]
    pub warning_system: Presence,
    #[serde(deserialize_with = "exact_presence")]
    pub flood_exist: Presence,
    #[serde(deserialize_with = "exact_presence")]
    pub landslide_exist: Presence,
    #[serde(deserialize_with = "exact_presence")]
    pub earthquake_exist: Presence,
    #[serde(deserialize_with = "exact_presence")]
    pub tsunami_exist: Presence,
    #[serde(deserialize_with = "exact_presence")]
    pub drought_exist: Presence,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct InfrastructureBlock {
    #[serde(
        rename = "State_electricity_company",
        deserialize_with = "lenient_number"
    )]
    pub state_grid: f64,
    #[serde(
        rename = "Non_state_electricity_company",
        deserialize_with = "lenient_number"
    )]
    pub non_state_grid: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub non_electricity: f64,
}

/// Errors raised while turning a raw document into a [`VillageRecord`].
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("village record must be a JSON object")]
    NotAnObject,
    #[error("village record is missing an id")]
    MissingId,
    #[error("village record does not match the schema: {0}")]
    Schema(#[from] serde_json::Error),
}

/// Alternate spellings seen in service payloads, as `(alias, canonical)` per block.
const FIELD_ALIASES: &[(DomainBlock, &[(&str, &str)])] = &[
    (
        DomainBlock::Disaster,
        &[
            ("disaster_present", "disaster_exist"),
            ("disasterPresent", "disaster_exist"),
        ],
    ),
    (
        DomainBlock::Infrastructure,
        &[
            ("state_electricity_company", "State_electricity_company"),
            ("non_state_electricity_company", "Non_state_electricity_company"),
        ],
    ),
];

/// Renames each alias to its canonical key. When both are present the canonical value wins and
/// the alias is dropped, so the typed block and the field resolver read the same value.
fn fold_aliases(fields: &mut Map<String, Value>, aliases: &[(&str, &str)]) {
    for &(alias, canonical) in aliases {
        if let Some(value) = fields.remove(alias) {
            if !fields.contains_key(canonical) {
                fields.insert(canonical.to_string(), value);
            }
        }
    }
}

/// One village as delivered by the data service.
///
/// The blocks the engine reads are typed; every other field stays reachable through
/// [`VillageRecord::resolve`] on the retained raw document.
#[derive(Debug, Clone, PartialEq)]
pub struct VillageRecord {
    pub id: String,
    pub name: String,
    pub district: String,
    pub latitude: f64,
    pub longitude: f64,
    pub disease: DiseaseBlock,
    pub digital: DigitalBlock,
    pub economy: EconomyBlock,
    pub disaster: DisasterBlock,
    pub infrastructure: InfrastructureBlock,
    raw: Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RecordSchema {
    #[serde(deserialize_with = "lenient_text")]
    id: String,
    #[serde(deserialize_with = "lenient_text")]
    name: String,
    #[serde(deserialize_with = "lenient_text")]
    district: String,
    #[serde(deserialize_with = "lenient_number")]
    latitude: f64,
    #[serde(deserialize_with = "lenient_number")]
    longitude: f64,
    #[serde(deserialize_with = "lenient_block")]
    disease: DiseaseBlock,
    #[serde(deserialize_with = "lenient_block")]
    digital: DigitalBlock,
    #[serde(deserialize_with = "lenient_block")]
    economy: EconomyBlock,
    #[serde(deserialize_with = "lenient_block")]
    disaster: DisasterBlock,
    #[serde(deserialize_with = "lenient_block")]
    infrastructure: InfrastructureBlock,
}

impl VillageRecord {
    pub fn from_value(raw: Value) -> Result<Self, RecordError> {
        let Value::Object(mut fields) = raw else {
            return Err(RecordError::NotAnObject);
        };

        // Older service payloads ship the disaster block as `disaster_risk`.
        if !fields.contains_key(DomainBlock::Disaster.key()) {
            if let Some(legacy) = fields.remove("disaster_risk") {
                fields.insert(DomainBlock::Disaster.key().to_string(), legacy);
            }
        }
        for &(block, aliases) in FIELD_ALIASES {
            if let Some(Value::Object(block_fields)) = fields.get_mut(block.key()) {
                fold_aliases(block_fields, aliases);
            }
        }

        let raw = Value::Object(fields);
        let schema: RecordSchema = serde_json::from_value(raw.clone())?;
        let id = schema.id.trim().to_string();
        if id.is_empty() {
            return Err(RecordError::MissingId);
        }

        Ok(Self {
            id,
            name: schema.name,
            district: schema.district,
            latitude: schema.latitude,
            longitude: schema.longitude,
            disease: schema.disease,
            digital: schema.digital,
            economy: schema.economy,
            disaster: schema.disaster,
            infrastructure: schema.infrastructure,
            raw,
        })
    }

    /// Numeric value at `path` (e.g. `health.jumlah_puskesmas`), zero when absent.
    pub fn resolve(&self, path: &str) -> f64 {
        resolver::resolve(&self.raw, path)
    }

    pub fn resolve_text(&self, path: &str) -> String {
        resolver::resolve_text(&self.raw, path)
    }

    pub fn block(&self, block: DomainBlock) -> Option<&Map<String, Value>> {
        self.raw.get(block.key()).and_then(Value::as_object)
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

impl<'de> Deserialize<'de> for VillageRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;
        Self::from_value(raw).map_err(serde::de::Error::custom)
    }
}

impl Serialize for VillageRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.raw.serialize(serializer)
    }
}

fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(resolver::coerce_number(&value))
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(resolver::coerce_text(&value))
}

fn lenient_presence<'de, D>(deserializer: D) -> Result<Presence, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(Presence::from_value(&value))
}

fn exact_presence<'de, D>(deserializer: D) -> Result<Presence, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(Presence::from_exact_value(&value))
}

// Every typed field coerces on its own, so an object block only fails on a real schema conflict
// and that failure is reported rather than zeroing the block.
fn lenient_block<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Object(_) => serde_json::from_value(value).map_err(serde::de::Error::custom),
        _ => Ok(T::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn presence_matches_marker_case_insensitively() {
        assert_eq!(Presence::from_text("Ada"), Presence::Present);
        assert_eq!(Presence::from_text("  ADA "), Presence::Present);
        assert_eq!(Presence::from_text("Tidak"), Presence::Absent);
        assert_eq!(Presence::from_text("   "), Presence::Unknown);
        assert_eq!(Presence::from_value(&json!(true)), Presence::Present);
        assert_eq!(Presence::from_value(&json!(false)), Presence::Absent);
        assert_eq!(Presence::from_value(&json!(null)), Presence::Unknown);
    }

    #[test]
    fn hazard_presence_requires_the_exact_marker() {
        assert_eq!(Presence::from_exact_text(" Ada "), Presence::Present);
        assert_eq!(Presence::from_exact_text("Tidak ada"), Presence::Absent);
        assert_eq!(Presence::from_exact_text("tidak"), Presence::Absent);
        assert_eq!(Presence::from_exact_text(""), Presence::Unknown);
        assert_eq!(Presence::from_text("Tidak ada"), Presence::Present);

        let record = VillageRecord::from_value(json!({
            "id": "v-4",
            "disaster": {
                "disaster_exist": "Tidak ada",
                "flood_exist": "tidak ada",
                "drought_exist": "ADA",
                "warning_system": "Ada sirine"
            }
        }))
        .expect("record parses");

        assert_eq!(record.disaster.disaster_exist, Presence::Absent);
        assert_eq!(record.disaster.flood_exist, Presence::Absent);
        assert_eq!(record.disaster.drought_exist, Presence::Present);
        assert_eq!(record.disaster.warning_system, Presence::Present);
    }

    #[test]
    fn conflicting_aliases_keep_the_rest_of_the_block() {
        let record = VillageRecord::from_value(json!({
            "id": "v-5",
            "disaster": { "disaster_exist": "ada", "disaster_present": false, "flood": 3 },
            "infrastructure": {
                "State_electricity_company": 80,
                "state_electricity_company": 5,
                "non_state_electricity_company": 7
            }
        }))
        .expect("record parses");

        assert_eq!(record.disaster.flood, 3.0);
        assert_eq!(record.resolve("disaster.flood"), 3.0);
        assert_eq!(record.disaster.disaster_exist, Presence::Present);
        assert_eq!(record.infrastructure.state_grid, 80.0);
        assert_eq!(record.infrastructure.non_state_grid, 7.0);
        assert_eq!(
            record.resolve("infrastructure.Non_state_electricity_company"),
            7.0
        );
    }

    #[test]
    fn boolean_disaster_flag_is_accepted_under_either_spelling() {
        let snake = VillageRecord::from_value(json!({
            "id": "v-6",
            "disaster": { "disaster_present": true }
        }))
        .expect("record parses");
        let camel = VillageRecord::from_value(json!({
            "id": "v-7",
            "disaster": { "disasterPresent": false }
        }))
        .expect("record parses");

        assert_eq!(snake.disaster.disaster_exist, Presence::Present);
        assert_eq!(camel.disaster.disaster_exist, Presence::Absent);
    }

    #[test]
    fn absent_blocks_default_to_zero() {
        let record = VillageRecord::from_value(json!({ "id": "v-1", "name": "Sukamaju" }))
            .expect("record parses");

        assert_eq!(record.disease, DiseaseBlock::default());
        assert_eq!(record.economy.activity(), 0.0);
        assert_eq!(
            record.digital.village_information_system,
            Presence::Unknown
        );
        assert!(record.block(DomainBlock::Health).is_none());
    }

    #[test]
    fn malformed_values_coerce_instead_of_failing() {
        let record = VillageRecord::from_value(json!({
            "id": 1101012001u64,
            "disease": { "infectious_cases": "7", "disability_population": "n/a" },
            "economy": "not a block",
            "digital": { "bts_count": null, "signal_strength": 3 }
        }))
        .expect("record parses");

        assert_eq!(record.id, "1101012001");
        assert_eq!(record.disease.infectious_cases, 7.0);
        assert_eq!(record.disease.disability_population, 0.0);
        assert_eq!(record.economy, EconomyBlock::default());
        assert_eq!(record.digital.bts_count, 0.0);
        assert_eq!(record.digital.signal_strength, "3");
    }

    #[test]
    fn legacy_disaster_key_is_folded_into_disaster_block() {
        let record = VillageRecord::from_value(json!({
            "id": "v-2",
            "disaster_risk": { "flood": 3, "warning_system": "Ada" }
        }))
        .expect("record parses");

        assert_eq!(record.disaster.flood, 3.0);
        assert!(record.disaster.warning_system.is_present());
        assert_eq!(record.resolve("disaster.flood"), 3.0);
    }

    #[test]
    fn infrastructure_accepts_service_casing() {
        let record = VillageRecord::from_value(json!({
            "id": "v-3",
            "infrastructure": { "State_electricity_company": 120, "non_electricity": 4 }
        }))
        .expect("record parses");

        assert_eq!(record.infrastructure.state_grid, 120.0);
        assert_eq!(record.infrastructure.non_electricity, 4.0);
    }

    #[test]
    fn records_without_identity_are_rejected() {
        assert!(matches!(
            VillageRecord::from_value(json!({ "name": "Anonymous" })),
            Err(RecordError::MissingId)
        ));
        assert!(matches!(
            VillageRecord::from_value(json!(["not", "an", "object"])),
            Err(RecordError::NotAnObject)
        ));
    }

    #[test]
    fn serializes_back_to_the_service_shape() {
        let source = json!({ "id": "v-4", "health": { "jumlah_klinik": 2 } });
        let record = VillageRecord::from_value(source.clone()).expect("record parses");
        assert_eq!(serde_json::to_value(&record).expect("serializes"), source);
    }
}
