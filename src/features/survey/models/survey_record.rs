use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One farmer/plot submission as returned by the form-collection API.
///
/// The fields the dashboard reads are typed; every other answer is kept
/// verbatim in `extra` so the record round-trips unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurveyRecord {
    #[serde(rename = "_id", default, deserialize_with = "de_lenient_string")]
    pub id: Option<String>,

    #[serde(
        rename = "Data_collection_date",
        default,
        deserialize_with = "de_lenient_string"
    )]
    pub collection_date: Option<String>,

    #[serde(
        rename = "A1_Producer_farmer_name_first_name",
        default,
        deserialize_with = "de_lenient_string"
    )]
    pub farmer_name: Option<String>,

    #[serde(rename = "A3_Farmer_ID", default, deserialize_with = "de_lenient_string")]
    pub farmer_id: Option<String>,

    #[serde(
        rename = "A13_Farmer_group_cooperative",
        default,
        deserialize_with = "de_lenient_string"
    )]
    pub group: Option<String>,

    /// "lat lon[ altitude accuracy]"
    #[serde(
        rename = "B2_Plot_location",
        default,
        deserialize_with = "de_lenient_string"
    )]
    pub plot_location: Option<String>,

    #[serde(rename = "plot_area", default, deserialize_with = "de_lenient_f64")]
    pub plot_area: Option<f64>,

    #[serde(
        rename = "C2_Total_synthetic_ast_year_on_farm_kg",
        default,
        deserialize_with = "de_lenient_f64"
    )]
    pub synthetic_fertilizer_kg: Option<f64>,

    #[serde(
        rename = "main_crop_productivity",
        default,
        deserialize_with = "de_lenient_f64"
    )]
    pub crop_productivity: Option<f64>,

    #[serde(
        rename = "C1_Organic_fertiliz_ast_year_on_farm_kg",
        default,
        deserialize_with = "de_lenient_f64"
    )]
    pub organic_fertilizer_kg: Option<f64>,

    #[serde(
        rename = "Are_you_applying_chemical_pest",
        default,
        deserialize_with = "de_lenient_string"
    )]
    pub pesticide_use: Option<String>,

    #[serde(
        rename = "Are_you_applying_chemical_herb",
        default,
        deserialize_with = "de_lenient_string"
    )]
    pub herbicide_use: Option<String>,

    #[serde(
        rename = "C5_Type_of_agroforestry_practice",
        default,
        deserialize_with = "de_lenient_string"
    )]
    pub agroforestry_practice: Option<String>,

    #[serde(
        rename = "A6_Last_education_level",
        default,
        deserialize_with = "de_lenient_string"
    )]
    pub education_level: Option<String>,

    #[serde(rename = "A4_Gender", default, deserialize_with = "de_lenient_string")]
    pub gender: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A plot coordinate parsed from the location answer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotLocation {
    pub lat: f64,
    pub lon: f64,
}

impl PlotLocation {
    /// Parse "lat lon ..." taking the first two whitespace-separated tokens.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.split_whitespace();
        let lat = parts.next()?.parse::<f64>().ok()?;
        let lon = parts.next()?.parse::<f64>().ok()?;

        if !lat.is_finite() || !lon.is_finite() {
            return None;
        }

        Some(Self { lat, lon })
    }
}

impl SurveyRecord {
    /// Parsed plot location, `None` when missing or malformed
    pub fn location(&self) -> Option<PlotLocation> {
        self.plot_location.as_deref().and_then(PlotLocation::parse)
    }

    /// Group code, ignoring blank answers
    pub fn group_code(&self) -> Option<&str> {
        self.group.as_deref().filter(|g| !g.trim().is_empty())
    }
}

/// Accept strings, numbers and booleans as text; anything else is missing.
fn de_lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// Accept numbers and numeric strings; unparsable values become missing.
fn de_lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(parsed.filter(|v| v.is_finite()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_plot_location() {
        let loc = PlotLocation::parse("-2.5312 112.9481 35.0 4.8").unwrap();
        assert_eq!(loc.lat, -2.5312);
        assert_eq!(loc.lon, 112.9481);

        assert!(PlotLocation::parse("-2.5312").is_none());
        assert!(PlotLocation::parse("").is_none());
        assert!(PlotLocation::parse("north east").is_none());
        assert!(PlotLocation::parse("NaN 112.9").is_none());
    }

    #[test]
    fn test_lenient_decoding() {
        let record: SurveyRecord = serde_json::from_value(json!({
            "_id": 101,
            "A3_Farmer_ID": 7788,
            "A13_Farmer_group_cooperative": "kub_tani_jaya",
            "B2_Plot_location": "-2.1 113.2 0 0",
            "plot_area": "1.75",
            "main_crop_productivity": 820,
            "C2_Total_synthetic_ast_year_on_farm_kg": "n/a",
            "A4_Gender": "female",
            "meta/instanceID": "uuid:abc"
        }))
        .unwrap();

        assert_eq!(record.id.as_deref(), Some("101"));
        assert_eq!(record.farmer_id.as_deref(), Some("7788"));
        assert_eq!(record.plot_area, Some(1.75));
        assert_eq!(record.crop_productivity, Some(820.0));
        assert_eq!(record.synthetic_fertilizer_kg, None);
        assert_eq!(record.organic_fertilizer_kg, None);
        assert_eq!(record.gender.as_deref(), Some("female"));
        assert_eq!(record.extra.get("meta/instanceID"), Some(&json!("uuid:abc")));
        assert_eq!(
            record.location(),
            Some(PlotLocation {
                lat: -2.1,
                lon: 113.2
            })
        );
    }

    #[test]
    fn test_blank_group_is_ignored() {
        let record = SurveyRecord {
            group: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(record.group_code(), None);
    }
}
