use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::sync::Arc;

use crate::core::config::{LayersConfig, MapConfig};
use crate::features::classification::models::{ClassifiedRecord, MarkerStatus};
use crate::features::classification::ClassificationService;
use crate::features::dashboard::dtos::*;
use crate::features::layers::models::LayerKind;
use crate::features::survey::models::SurveyRecord;
use crate::features::survey::SurveyService;
use crate::shared::constants::*;
use crate::shared::templates::escape_html;

const NOT_AVAILABLE: &str = "N/A";

/// Numeric indicators: (key, title, accessor)
const INDICATORS: &[(&str, &str, fn(&SurveyRecord) -> Option<f64>)] = &[
    (FIELD_PLOT_AREA, "Average Plot Area (ha)", |r| r.plot_area),
    (
        FIELD_SYNTHETIC_FERTILIZER,
        "Average Synthetic Fertilizer (kg/ha)",
        |r| r.synthetic_fertilizer_kg,
    ),
    (
        FIELD_CROP_PRODUCTIVITY,
        "Average Crop Productivity (kg/ha)",
        |r| r.crop_productivity,
    ),
    (
        FIELD_ORGANIC_FERTILIZER,
        "Average Organic Fertilizer (kg/ha)",
        |r| r.organic_fertilizer_kg,
    ),
];

type CategoricalField = (
    &'static str,
    &'static str,
    &'static [(&'static str, &'static str)],
    fn(&SurveyRecord) -> Option<&str>,
);

/// Categorical charts: (key, title, labels, accessor)
const CHARTS: &[CategoricalField] = &[
    (FIELD_PESTICIDE, "Pesticides Application", YES_NO_LABELS, |r| {
        r.pesticide_use.as_deref()
    }),
    (FIELD_HERBICIDE, "Herbicides Application", YES_NO_LABELS, |r| {
        r.herbicide_use.as_deref()
    }),
    (
        FIELD_AGROFORESTRY,
        "Agroforestry Practice",
        AGROFORESTRY_LABELS,
        |r| r.agroforestry_practice.as_deref(),
    ),
    (FIELD_EDUCATION, "Education Level", EDUCATION_LABELS, |r| {
        r.education_level.as_deref()
    }),
    (FIELD_GENDER, "Farmer Gender", GENDER_LABELS, |r| {
        r.gender.as_deref()
    }),
];

/// Builds every dashboard output from the current record set
pub struct DashboardService {
    survey_service: Arc<SurveyService>,
    classification_service: Arc<ClassificationService>,
    map: MapSettingsDto,
}

impl DashboardService {
    pub fn new(
        survey_service: Arc<SurveyService>,
        classification_service: Arc<ClassificationService>,
        map: &MapConfig,
        layers: &LayersConfig,
    ) -> Self {
        Self {
            survey_service,
            classification_service,
            map: MapSettingsDto {
                center_lat: map.center_lat,
                center_lon: map.center_lon,
                zoom: map.zoom,
                tile_url: map.tile_url.clone(),
                deforestation_wms_url: layers.deforestation_wms_url.clone(),
                deforestation_wms_layer: layers.deforestation_wms_layer.clone(),
            },
        }
    }

    /// Render outputs for the selected groups (empty selection means all)
    pub async fn view(&self, selected_groups: &[String]) -> DashboardViewDto {
        let records = self.survey_service.snapshot().await;
        build_view(&records, selected_groups, &self.classification_service)
    }

    pub async fn group_options(&self, selected_groups: &[String]) -> Vec<GroupOptionDto> {
        let records = self.survey_service.snapshot().await;
        group_options(&records, selected_groups)
    }

    /// Re-fetch the record set, returning how many records are now held
    pub async fn refresh(&self) -> usize {
        self.survey_service.refresh().await.len()
    }

    pub fn map_settings(&self) -> &MapSettingsDto {
        &self.map
    }
}

// ============================================================================
// Render pass
// ============================================================================

pub fn build_view(
    records: &[SurveyRecord],
    selected_groups: &[String],
    classifier: &ClassificationService,
) -> DashboardViewDto {
    if records.is_empty() {
        return empty_view(DashboardState::NoData, selected_groups, 0);
    }

    let selected: Vec<&SurveyRecord> = records
        .iter()
        .filter(|record| {
            selected_groups.is_empty()
                || record
                    .group_code()
                    .is_some_and(|group| selected_groups.iter().any(|s| s == group))
        })
        .collect();

    let classified = classifier.classify(&selected);
    if classified.is_empty() {
        return empty_view(DashboardState::EmptySelection, selected_groups, records.len());
    }

    let located: Vec<&SurveyRecord> = classified.iter().map(|c| c.record).collect();

    DashboardViewDto {
        state: DashboardState::Ready,
        message: None,
        selected_groups: selected_groups.to_vec(),
        total_records: records.len(),
        markers: classified.iter().map(marker).collect(),
        household: household_list(&classified),
        deforestation_alerts: alert_list(
            "Alerts Deforestation",
            &classified,
            |c| c.in_deforested_area,
            |c| c.deforestation_year.map(|year| format!("deforested in {}", year)),
            MarkerStatus::Deforested,
            "deforested areas",
        ),
        protected_area_alerts: alert_list(
            "Alerts Protected Area",
            &classified,
            |c| c.in_protected_area,
            |c| c.protected_area_name.clone(),
            MarkerStatus::Protected,
            "protected areas",
        ),
        indicators: INDICATORS
            .iter()
            .map(|(key, title, value)| indicator(key, title, &located, *value))
            .collect(),
        charts: CHARTS
            .iter()
            .map(|(key, title, labels, value)| chart(key, title, labels, &located, *value))
            .collect(),
    }
}

fn empty_view(state: DashboardState, selected_groups: &[String], total: usize) -> DashboardViewDto {
    let (message, annotation) = match state {
        DashboardState::NoData => ("No data available.", "No data"),
        _ => ("No data for selected filter.", "No data for selection"),
    };

    let empty_alerts = |title: &str| AlertListDto {
        title: title.to_string(),
        count: 0,
        counter: points_counter(0),
        items: Vec::new(),
        empty_message: None,
    };

    DashboardViewDto {
        state,
        message: Some(message.to_string()),
        selected_groups: selected_groups.to_vec(),
        total_records: total,
        markers: Vec::new(),
        household: HouseholdListDto {
            items: Vec::new(),
            empty_message: Some(message.to_string()),
        },
        deforestation_alerts: empty_alerts("Alerts Deforestation"),
        protected_area_alerts: empty_alerts("Alerts Protected Area"),
        indicators: INDICATORS
            .iter()
            .map(|(key, title, _)| IndicatorDto {
                key: key.to_string(),
                title: title.to_string(),
                value: None,
                display: NOT_AVAILABLE.to_string(),
            })
            .collect(),
        charts: CHARTS
            .iter()
            .map(|(key, title, _, _)| ChartDto {
                key: key.to_string(),
                title: title.to_string(),
                slices: Vec::new(),
                placeholder: false,
                annotation: Some(annotation.to_string()),
            })
            .collect(),
    }
}

fn farmer_id(record: &SurveyRecord) -> &str {
    record.farmer_id.as_deref().unwrap_or(NOT_AVAILABLE)
}

fn points_counter(count: usize) -> String {
    format!("{} points", count)
}

fn format_two_decimals(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.2}", v))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn marker(classified: &ClassifiedRecord<'_>) -> MarkerDto {
    let status = classified.status();
    let id = farmer_id(classified.record);

    MarkerDto {
        lat: classified.location.lat,
        lon: classified.location.lon,
        color: status.color().to_string(),
        status: status.label().to_string(),
        tooltip: format!("Farmer ID: {}", escape_html(id)),
        popup_html: format!(
            "<b>Farmer ID: </b>{}<br><b>Plot Area (ha): </b>{}",
            escape_html(id),
            format_two_decimals(classified.record.plot_area)
        ),
    }
}

fn household_list(classified: &[ClassifiedRecord<'_>]) -> HouseholdListDto {
    let items: Vec<HouseholdItemDto> = classified
        .iter()
        .map(|c| HouseholdItemDto {
            dot_color: c.status().color().to_string(),
            collection_date: c
                .record
                .collection_date
                .as_deref()
                .and_then(parse_collection_date)
                .map(|dt| dt.format("%m/%d/%Y, %I:%M %p").to_string())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            farmer_name: c
                .record
                .farmer_name
                .clone()
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            farmer_id: farmer_id(c.record).to_string(),
            group: c
                .record
                .group
                .clone()
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        })
        .collect();

    let empty_message = items
        .is_empty()
        .then(|| "No household data to display.".to_string());

    HouseholdListDto {
        items,
        empty_message,
    }
}

fn alert_list(
    title: &str,
    classified: &[ClassifiedRecord<'_>],
    flagged: impl Fn(&ClassifiedRecord<'_>) -> bool,
    detail: impl Fn(&ClassifiedRecord<'_>) -> Option<String>,
    status: MarkerStatus,
    area: &str,
) -> AlertListDto {
    let items: Vec<AlertItemDto> = classified
        .iter()
        .filter(|c| flagged(c))
        .map(|c| {
            let id = farmer_id(c.record);
            AlertItemDto {
                farmer_id: id.to_string(),
                message: format!("Farmer ID {} is in {}!", id, area),
                detail: detail(c),
                dot_color: status.color().to_string(),
            }
        })
        .collect();

    let empty_message = items
        .is_empty()
        .then(|| format!("No survey points in {}.", area));

    AlertListDto {
        title: title.to_string(),
        count: items.len(),
        counter: points_counter(items.len()),
        items,
        empty_message,
    }
}

fn indicator(
    key: &str,
    title: &str,
    records: &[&SurveyRecord],
    value: fn(&SurveyRecord) -> Option<f64>,
) -> IndicatorDto {
    let values: Vec<f64> = records
        .iter()
        .filter_map(|r| value(r))
        .filter(|v| v.is_finite())
        .collect();

    let mean = (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64);

    IndicatorDto {
        key: key.to_string(),
        title: title.to_string(),
        value: mean,
        display: format_two_decimals(mean),
    }
}

fn chart(
    key: &str,
    title: &str,
    labels: &[(&str, &str)],
    records: &[&SurveyRecord],
    value: fn(&SurveyRecord) -> Option<&str>,
) -> ChartDto {
    // Counts in first-seen order; the stable sort keeps that order for ties
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for code in records
        .iter()
        .filter_map(|r| value(r))
        .filter(|v| !v.trim().is_empty())
    {
        match counts.iter_mut().find(|(c, _)| *c == code) {
            Some((_, n)) => *n += 1,
            None => counts.push((code, 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    if counts.is_empty() {
        return ChartDto {
            key: key.to_string(),
            title: title.to_string(),
            slices: vec![ChartSliceDto {
                label: "No Data".to_string(),
                count: 1,
            }],
            placeholder: true,
            annotation: None,
        };
    }

    ChartDto {
        key: key.to_string(),
        title: title.to_string(),
        slices: counts
            .into_iter()
            .map(|(code, count)| ChartSliceDto {
                label: label_for(labels, code).to_string(),
                count,
            })
            .collect(),
        placeholder: false,
        annotation: None,
    }
}

/// Parse the collection timestamp, keeping the local wall-clock time of offset values
fn parse_collection_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }

    ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| {
            DateTime::parse_from_str(raw, format)
                .map(|dt| dt.naive_local())
                .or_else(|_| NaiveDateTime::parse_from_str(raw, format))
                .ok()
        })
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

// ============================================================================
// Checklist and legend
// ============================================================================

/// Distinct non-empty groups in first-seen order
pub fn group_options(records: &[SurveyRecord], selected_groups: &[String]) -> Vec<GroupOptionDto> {
    let mut options: Vec<GroupOptionDto> = Vec::new();

    for group in records.iter().filter_map(|r| r.group_code()) {
        if options.iter().any(|o| o.value == group) {
            continue;
        }
        options.push(GroupOptionDto {
            value: group.to_string(),
            label: label_for(GROUP_LABELS, group).to_string(),
            selected: selected_groups.iter().any(|s| s == group),
        });
    }

    options
}

pub fn legend(state: LegendState) -> LegendDto {
    let survey_items = [MarkerStatus::Safe, MarkerStatus::Deforested, MarkerStatus::Protected]
        .iter()
        .map(|status| LegendItemDto {
            label: status.label().to_string(),
            color: status.color().to_string(),
        })
        .collect();

    let protected_items = PROTECTED_AREA_COLORS
        .iter()
        .map(|(name, color)| LegendItemDto {
            label: name.to_string(),
            color: color.to_string(),
        })
        .collect();

    LegendDto {
        title: "Map Legend".to_string(),
        state,
        toggled: state.toggle(),
        sections: vec![
            LegendSectionDto {
                title: "Survey Data".to_string(),
                shape: "circle".to_string(),
                items: survey_items,
            },
            LegendSectionDto {
                title: LayerKind::ProtectedAreas.display_name().to_string(),
                shape: "square".to_string(),
                items: protected_items,
            },
            LegendSectionDto {
                title: LayerKind::Peatland.display_name().to_string(),
                shape: "square".to_string(),
                items: vec![LegendItemDto {
                    label: LayerKind::Peatland.display_name().to_string(),
                    color: COLOR_PEATLAND_LEGEND.to_string(),
                }],
            },
        ],
    }
}
