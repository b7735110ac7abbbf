use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

// ============================================================================
// Query
// ============================================================================

/// Expanded/collapsed state of the map legend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LegendState {
    #[default]
    Collapsed,
    Expanded,
}

impl LegendState {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "collapsed" => Some(LegendState::Collapsed),
            "expanded" => Some(LegendState::Expanded),
            _ => None,
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            LegendState::Collapsed => LegendState::Expanded,
            LegendState::Expanded => LegendState::Collapsed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LegendState::Collapsed => "collapsed",
            LegendState::Expanded => "expanded",
        }
    }
}

/// Dashboard inputs carried in the query string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardQuery {
    /// Selected group codes; empty means all groups
    pub groups: Vec<String>,
    pub legend: LegendState,
}

impl DashboardQuery {
    /// Build from raw query pairs. `groups` may repeat or hold a comma-separated
    /// list; an unknown `legend` value falls back to collapsed.
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let mut query = DashboardQuery::default();

        for (key, value) in pairs {
            match key.as_str() {
                "groups" => {
                    for group in value.split(',').map(str::trim).filter(|g| !g.is_empty()) {
                        if !query.groups.iter().any(|g| g == group) {
                            query.groups.push(group.to_string());
                        }
                    }
                }
                "legend" => query.legend = LegendState::parse(value).unwrap_or_default(),
                _ => {}
            }
        }

        query
    }
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct LegendQueryParams {
    /// `collapsed` (default) or `expanded`
    pub state: Option<String>,
}

// ============================================================================
// Render outputs
// ============================================================================

/// Which of the three render states the dashboard is in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DashboardState {
    /// The record set is empty
    NoData,
    /// Records exist but none match the selection
    EmptySelection,
    Ready,
}

/// One survey plot on the map
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MarkerDto {
    pub lat: f64,
    pub lon: f64,
    pub color: String,
    pub status: String,
    /// Pre-escaped HTML for the marker tooltip
    pub tooltip: String,
    /// Pre-escaped HTML for the marker popup
    pub popup_html: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HouseholdItemDto {
    pub dot_color: String,
    /// `%m/%d/%Y, %I:%M %p`, or `N/A` when missing or unparsable
    pub collection_date: String,
    pub farmer_name: String,
    pub farmer_id: String,
    pub group: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HouseholdListDto {
    pub items: Vec<HouseholdItemDto>,
    pub empty_message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AlertItemDto {
    pub farmer_id: String,
    pub message: String,
    /// Protected-area name or deforestation year, when known
    pub detail: Option<String>,
    pub dot_color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AlertListDto {
    pub title: String,
    pub count: usize,
    /// "N points"
    pub counter: String,
    pub items: Vec<AlertItemDto>,
    pub empty_message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IndicatorDto {
    pub key: String,
    pub title: String,
    pub value: Option<f64>,
    /// Two decimals or `N/A`
    pub display: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChartSliceDto {
    pub label: String,
    pub count: usize,
}

/// A categorical distribution rendered as a donut chart
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChartDto {
    pub key: String,
    pub title: String,
    /// Ordered by descending count
    pub slices: Vec<ChartSliceDto>,
    /// True when the only slice is the "No Data" placeholder
    pub placeholder: bool,
    /// Annotation shown instead of slices in the empty states
    pub annotation: Option<String>,
}

/// Everything one render pass produces
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardViewDto {
    pub state: DashboardState,
    pub message: Option<String>,
    pub selected_groups: Vec<String>,
    pub total_records: usize,
    pub markers: Vec<MarkerDto>,
    pub household: HouseholdListDto,
    pub deforestation_alerts: AlertListDto,
    pub protected_area_alerts: AlertListDto,
    pub indicators: Vec<IndicatorDto>,
    pub charts: Vec<ChartDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GroupOptionDto {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

// ============================================================================
// Legend and map
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LegendItemDto {
    pub label: String,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LegendSectionDto {
    pub title: String,
    /// `circle` for survey markers, `square` for area swatches
    pub shape: String,
    pub items: Vec<LegendItemDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LegendDto {
    pub title: String,
    pub state: LegendState,
    /// State the toggle control switches to
    pub toggled: LegendState,
    pub sections: Vec<LegendSectionDto>,
}

/// Base map and overlay settings for the page
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MapSettingsDto {
    pub center_lat: f64,
    pub center_lon: f64,
    pub zoom: u8,
    pub tile_url: String,
    pub deforestation_wms_url: String,
    pub deforestation_wms_layer: String,
}
