//! Typed checklist catalog model
//!
//! A [`Catalog`] owns its [`Checklist`]s, which own their [`Step`]s. There is
//! no sharing between records and no back-references, so every value here is
//! a plain tree that can be cloned, compared and serialized directly.
//!
//! Serialization is derived: field declaration order is the canonical
//! emission order, and optional fields are skipped when blank, absent or
//! `false`.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Version marker written at the top of every serialized document
pub const DOCUMENT_VERSION: &str = "1.0";

/// One procedure item
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Step {
    /// Identifier, unique within its checklist
    pub id: String,
    /// Display text (never blank)
    #[serde(rename = "texto")]
    pub text: String,
    /// Icon key
    #[serde(rename = "icono", skip_serializing_if = "is_blank")]
    pub icon: Option<String>,
    /// Altitude display unit (`"m"` or `"ft"`)
    #[serde(rename = "altitud", skip_serializing_if = "is_blank")]
    pub altitude: Option<String>,
    /// Pressure display unit (`"hPa"` or `"inHg"`)
    #[serde(skip_serializing_if = "is_blank")]
    pub qnh: Option<String>,
    /// URL to open
    #[serde(skip_serializing_if = "is_blank")]
    pub link: Option<String>,
    /// External application identifier to launch
    #[serde(skip_serializing_if = "is_blank")]
    pub app: Option<String>,
    /// Show local time
    #[serde(rename = "localtime", skip_serializing_if = "is_false")]
    pub local_time: bool,
    /// Show UTC time
    #[serde(rename = "utctime", skip_serializing_if = "is_false")]
    pub utc_time: bool,
    /// Free-text label recorded in the flight log
    #[serde(skip_serializing_if = "is_blank")]
    pub log: Option<String>,
}

impl Step {
    /// Create a step with only the mandatory fields
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            ..Self::default()
        }
    }

    /// With icon key
    #[inline]
    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// With log label
    #[inline]
    #[must_use]
    pub fn with_log(mut self, label: impl Into<String>) -> Self {
        self.log = Some(label.into());
        self
    }

    /// Altitude unit, if the raw value names a known one
    #[must_use]
    pub fn altitude_unit(&self) -> Option<AltitudeUnit> {
        self.altitude.as_deref().and_then(|s| s.parse().ok())
    }

    /// Pressure unit, if the raw value names a known one
    #[must_use]
    pub fn pressure_unit(&self) -> Option<PressureUnit> {
        self.qnh.as_deref().and_then(|s| s.parse().ok())
    }

    /// Whether the step carries a flight-log action
    #[inline]
    #[must_use]
    pub fn has_log_action(&self) -> bool {
        !is_blank(&self.log)
    }
}

/// A named, ordered procedure
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Checklist {
    /// Identifier, unique within a catalog
    pub id: String,
    /// Title (defaults to `id` when parsed without one)
    #[serde(rename = "titulo")]
    pub title: String,
    /// Grouping label
    #[serde(rename = "categoria", skip_serializing_if = "is_blank")]
    pub category: Option<String>,
    /// Default display mode; `None` means step-by-step
    #[serde(rename = "full-list", skip_serializing_if = "Option::is_none")]
    pub full_list: Option<bool>,
    /// Display color as `#RRGGBB`
    #[serde(skip_serializing_if = "is_blank")]
    pub color: Option<String>,
    /// Steps in traversal order
    #[serde(rename = "pasos")]
    pub steps: Vec<Step>,
}

impl Checklist {
    /// Create an empty checklist whose title is its id
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            title: id.clone(),
            id,
            ..Self::default()
        }
    }

    /// With title
    #[inline]
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// With category
    #[inline]
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// With default mode flag
    #[inline]
    #[must_use]
    pub fn with_full_list(mut self, full_list: bool) -> Self {
        self.full_list = Some(full_list);
        self
    }

    /// Append a step
    #[inline]
    #[must_use]
    pub fn with_step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// Number of steps
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the checklist has no steps
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Highest valid step index (0 for an empty checklist)
    #[inline]
    #[must_use]
    pub fn max_step_index(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    /// Display color decoded from `#RRGGBB`
    #[must_use]
    pub fn color_rgb(&self) -> Option<(u8, u8, u8)> {
        let hex = self.color.as_deref()?.trim().strip_prefix('#')?;
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
        Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

/// Full set of checklists loaded from one document
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Catalog {
    /// Checklists in document order
    pub checklists: Vec<Checklist>,
}

impl Catalog {
    /// Create catalog from checklists
    #[inline]
    #[must_use]
    pub fn new(checklists: Vec<Checklist>) -> Self {
        Self { checklists }
    }

    /// Find checklist by id
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Checklist> {
        self.checklists.iter().find(|c| c.id == id)
    }

    /// Find checklist by id for editing
    #[must_use]
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Checklist> {
        self.checklists.iter_mut().find(|c| c.id == id)
    }

    /// Distinct categories in first-seen order
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for category in self.checklists.iter().filter_map(|c| c.category.as_deref()) {
            if !seen.contains(&category) {
                seen.push(category);
            }
        }
        seen
    }

    /// Number of checklists
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.checklists.len()
    }

    /// Whether the catalog holds no checklists
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checklists.is_empty()
    }
}

/// Unit used to display altitude readouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AltitudeUnit {
    /// Meters
    Meters,
    /// Feet
    Feet,
}

impl AltitudeUnit {
    /// Raw document value
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Meters => "m",
            Self::Feet => "ft",
        }
    }
}

impl FromStr for AltitudeUnit {
    type Err = UnknownUnit;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "m" => Ok(Self::Meters),
            "ft" => Ok(Self::Feet),
            other => Err(UnknownUnit(other.to_string())),
        }
    }
}

impl fmt::Display for AltitudeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unit used to display pressure readouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PressureUnit {
    /// Hectopascals
    HectoPascal,
    /// Inches of mercury
    InchesMercury,
}

impl PressureUnit {
    /// Raw document value
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HectoPascal => "hPa",
            Self::InchesMercury => "inHg",
        }
    }
}

impl FromStr for PressureUnit {
    type Err = UnknownUnit;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "hPa" => Ok(Self::HectoPascal),
            "inHg" => Ok(Self::InchesMercury),
            other => Err(UnknownUnit(other.to_string())),
        }
    }
}

impl fmt::Display for PressureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unit string that names no known unit
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown unit: '{0}'")]
pub struct UnknownUnit(pub String);

// serde's skip_serializing_if hands us a reference to the field.
#[allow(clippy::ref_option)]
fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |s| s.trim().is_empty())
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(value: &bool) -> bool {
    !*value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checklist_new_uses_id_as_title() {
        let checklist = Checklist::new("preflight");
        assert_eq!(checklist.title, "preflight");
        assert!(checklist.is_empty());
        assert_eq!(checklist.max_step_index(), 0);
    }

    #[test]
    fn color_rgb_decodes_hex() {
        let mut checklist = Checklist::new("c");
        checklist.color = Some("#FF8000".to_string());
        assert_eq!(checklist.color_rgb(), Some((255, 128, 0)));

        checklist.color = Some("FF8000".to_string());
        assert_eq!(checklist.color_rgb(), None);

        checklist.color = Some("#GG0000".to_string());
        assert_eq!(checklist.color_rgb(), None);
    }

    #[test]
    fn step_units() {
        let mut step = Step::new("s", "Altimeter");
        step.altitude = Some("ft".to_string());
        step.qnh = Some("inHg".to_string());
        assert_eq!(step.altitude_unit(), Some(AltitudeUnit::Feet));
        assert_eq!(step.pressure_unit(), Some(PressureUnit::InchesMercury));

        step.altitude = Some("yards".to_string());
        assert_eq!(step.altitude_unit(), None);
    }

    #[test]
    fn catalog_categories_dedup_in_order() {
        let catalog = Catalog::new(vec![
            Checklist::new("a").with_category("Normal"),
            Checklist::new("b").with_category("Emergency"),
            Checklist::new("c").with_category("Normal"),
            Checklist::new("d"),
        ]);
        assert_eq!(catalog.categories(), vec!["Normal", "Emergency"]);
        assert!(catalog.get("c").is_some());
        assert!(catalog.get("z").is_none());
    }

    #[test]
    fn blank_detection() {
        assert!(is_blank(&None));
        assert!(is_blank(&Some("  ".to_string())));
        assert!(!is_blank(&Some("x".to_string())));
    }
}
