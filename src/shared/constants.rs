// =============================================================================
// SURVEY FORM FIELDS
// =============================================================================

pub const FIELD_PLOT_AREA: &str = "plot_area";
pub const FIELD_SYNTHETIC_FERTILIZER: &str = "C2_Total_synthetic_ast_year_on_farm_kg";
pub const FIELD_CROP_PRODUCTIVITY: &str = "main_crop_productivity";
pub const FIELD_ORGANIC_FERTILIZER: &str = "C1_Organic_fertiliz_ast_year_on_farm_kg";

pub const FIELD_PESTICIDE: &str = "Are_you_applying_chemical_pest";
pub const FIELD_HERBICIDE: &str = "Are_you_applying_chemical_herb";
pub const FIELD_AGROFORESTRY: &str = "C5_Type_of_agroforestry_practice";
pub const FIELD_EDUCATION: &str = "A6_Last_education_level";
pub const FIELD_GENDER: &str = "A4_Gender";

// =============================================================================
// DISPLAY LABELS
// =============================================================================

/// Farmer group codes shown in the checklist
pub const GROUP_LABELS: &[(&str, &str)] = &[
    ("kub_jaya_abadi", "KUB Jaya Abadi"),
    ("kub_sejahtera_bahagia", "KUB Sejahtera Bahagia"),
    ("kub_tani_jaya", "KUB Tani Jaya"),
];

pub const YES_NO_LABELS: &[(&str, &str)] = &[("yes", "Yes"), ("no", "No")];

pub const AGROFORESTRY_LABELS: &[(&str, &str)] = &[
    ("fully_implement", "Full"),
    ("partially_implement", "Partial"),
    ("no", "None"),
];

pub const EDUCATION_LABELS: &[(&str, &str)] = &[
    ("none", "None"),
    ("primary_school", "Primary"),
    ("secondary_school", "Secondary"),
    ("tertiary_school", "Tertiary"),
];

pub const GENDER_LABELS: &[(&str, &str)] = &[("male", "Male"), ("female", "Female")];

/// Look up a display label, falling back to the raw code
pub fn label_for<'a>(labels: &'a [(&'a str, &'a str)], code: &'a str) -> &'a str {
    labels
        .iter()
        .find(|(k, _)| *k == code)
        .map(|(_, v)| *v)
        .unwrap_or(code)
}

// =============================================================================
// MAP COLOURS
// =============================================================================

pub const COLOR_SAFE: &str = "black";
pub const COLOR_DEFORESTED: &str = "orange";
pub const COLOR_PROTECTED: &str = "red";

pub const COLOR_PEATLAND: &str = "#4E7254";
pub const COLOR_PEATLAND_LEGEND: &str = "#4E725480";
pub const COLOR_UNKNOWN_CATEGORY: &str = "gray";

/// Protected area categories (the `NAMOBJ` attribute) and their fill colours
pub const PROTECTED_AREA_COLORS: &[(&str, &str)] = &[
    ("Hutan Lindung", "#9D900180"),
    ("Taman Wisata Alam", "#B3242980"),
    ("Hutan Suaka Alam dan Wisata", "#E6D69080"),
    ("Cagar Alam", "#927A6C80"),
    ("Taman Buru", "#4A192C80"),
    ("Taman Nasional", "#31572080"),
    ("Taman Hutan Raya", "#474B4E80"),
    ("Suaka Margasatwa", "#82422D80"),
    ("Kawasan Suaka Alam/Kawasan Pelestarian Alam", "#1B558380"),
];

/// Fill colour for a protected area category
pub fn protected_area_color(category: &str) -> &'static str {
    PROTECTED_AREA_COLORS
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, color)| *color)
        .unwrap_or(COLOR_UNKNOWN_CATEGORY)
}

// =============================================================================
// REFERENCE LAYER ATTRIBUTES
// =============================================================================

pub const PROTECTED_AREA_NAME_ATTR: &str = "NAMOBJ";
pub const PEATLAND_NAME_ATTR: &str = "NAMA_KHG";

/// Raster code → deforestation year
pub const DEFORESTATION_YEAR_CODES: &[(u32, i32)] =
    &[(0, 2020), (1, 2021), (2, 2022), (3, 2023), (4, 2024)];
