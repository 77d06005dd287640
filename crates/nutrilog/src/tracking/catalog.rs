use super::domain::MetricDraft;

/// Built-in nutrient catalog used to seed demos and fresh deployments.
/// Nothing depends on the exact ordering.
const STANDARD_METRICS: &[(&str, &str)] = &[
    ("Carbs", "g"),
    ("Fibre", "g"),
    ("Protein", "g"),
    ("Fat", "g"),
    ("Calories", "kcal"),
    ("Vitamin B1", "mg"),
    ("Calcium (Ca)", "mg"),
    ("Chromium (Cr)", "μg"),
    ("Chloride (Cl)", "mg"),
    ("Copper (Cu)", "mg"),
    ("Fluoride (F)", "mg"),
    ("Iodine (I)", "μg"),
    ("Iron (Fe)", "mg"),
    ("Magnesium (Mg)", "mg"),
    ("Manganese (Mn)", "mg"),
    ("Molybdenum (Mo)", "μg"),
    ("Phosphorus (P)", "mg"),
    ("Potassium (K)", "mg"),
    ("Selenium (Se)", "μg"),
    ("Sodium (Na)", "mg"),
    ("Sulphur (S)", "mg"),
    ("Zinc (Zn)", "mg"),
    ("Vitamin A retinol equivalents", "μg"),
    ("Thiamin (B1)", "mg"),
    ("Riboflavin (B2)", "mg"),
    ("Niacin (B3)", "mg"),
    ("Pantothenic acid (B5)", "mg"),
    ("Pyridoxine (B6)", "mg"),
    ("Biotin (B7)", "μg"),
    ("Cobalamin (B12)", "μg"),
    ("Folate, natural", "μg"),
    ("Dietary folate equivalents", "μg"),
    ("Vitamin C", "mg"),
    ("Vitamin D3 equivalents", "μg"),
    ("Vitamin E", "mg"),
];

/// Drafts for every metric in the standard catalog.
pub fn standard_metrics() -> Vec<MetricDraft> {
    STANDARD_METRICS
        .iter()
        .map(|(name, unit)| MetricDraft {
            name: (*name).to_string(),
            unit: (*unit).to_string(),
        })
        .collect()
}
