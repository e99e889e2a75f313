// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Hike model, the hike form and its field schema.

use serde::{Deserialize, Serialize};

/// Separator between trail names in `trails_cs`.
pub const TRAIL_SEPARATOR: &str = ", ";

/// Stored hike record, as read back from the `hikes` table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hike {
    pub id: i64,
    /// Date of the hike (YYYY-MM-DD)
    pub hike_date: String,
    /// Owner
    pub user_id: i64,
    pub area_id: i64,
    /// Denormalized copy of the area name
    pub area_name: String,
    pub trailhead: String,
    /// Comma-separated trail names, as entered
    pub trails_cs: String,
    /// Rounded to one decimal place
    pub distance_km: f64,
    /// Image store identifier
    pub image_url: Option<String>,
    pub image_alt: Option<String>,
    pub map_link: Option<String>,
    pub other_info: Option<String>,
    /// `trails_cs` split into individual trail names
    pub trails_list: Vec<String>,
}

impl Hike {
    /// Prefill an edit form with this hike's values.
    pub fn to_form(&self) -> HikeForm {
        HikeForm {
            hike_date: self.hike_date.clone(),
            area_name: self.area_name.clone(),
            trailhead: self.trailhead.clone(),
            trails_cs: self.trails_cs.clone(),
            distance_km: format!("{:.1}", self.distance_km),
            image_url: self.image_url.clone().unwrap_or_default(),
            image_alt: self.image_alt.clone().unwrap_or_default(),
            map_link: self.map_link.clone().unwrap_or_default(),
            other_info: self.other_info.clone().unwrap_or_default(),
        }
    }
}

/// Hike data for inserts and updates.
///
/// The column list bound by the store is fixed to these fields.
#[derive(Debug, Clone, PartialEq)]
pub struct NewHike {
    pub hike_date: String,
    pub area_name: String,
    pub trailhead: String,
    pub trails_cs: String,
    pub distance_km: f64,
    pub image_url: Option<String>,
    pub image_alt: Option<String>,
    pub map_link: Option<String>,
    pub other_info: Option<String>,
}

impl NewHike {
    /// Individual trail names from `trails_cs`.
    pub fn trail_names(&self) -> Vec<String> {
        split_trails(&self.trails_cs)
    }
}

/// A followee's hike in a feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedHike {
    #[serde(flatten)]
    pub hike: Hike,
    /// Poster's username
    pub username: String,
}

/// Raw hike form submission. Every field arrives as text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HikeForm {
    pub hike_date: String,
    pub area_name: String,
    pub trailhead: String,
    pub trails_cs: String,
    pub distance_km: String,
    pub image_url: String,
    pub image_alt: String,
    pub map_link: String,
    pub other_info: String,
}

impl HikeForm {
    /// Field values paired with their form names, in schema order.
    pub fn fields(&self) -> [(&'static str, &str); 9] {
        [
            ("hike_date", &self.hike_date),
            ("area_name", &self.area_name),
            ("trailhead", &self.trailhead),
            ("trails_cs", &self.trails_cs),
            ("distance_km", &self.distance_km),
            ("image_url", &self.image_url),
            ("image_alt", &self.image_alt),
            ("map_link", &self.map_link),
            ("other_info", &self.other_info),
        ]
    }

    /// Set a field by its form name. Unknown names are ignored.
    pub fn set(&mut self, name: &str, value: String) {
        match name {
            "hike_date" => self.hike_date = value,
            "area_name" => self.area_name = value,
            "trailhead" => self.trailhead = value,
            "trails_cs" => self.trails_cs = value,
            "distance_km" => self.distance_km = value,
            "image_url" => self.image_url = value,
            "image_alt" => self.image_alt = value,
            "map_link" => self.map_link = value,
            "other_info" => self.other_info = value,
            _ => {}
        }
    }
}

/// Describes one input of the hike form.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub input_type: &'static str,
    pub required: bool,
}

/// Field schema for the new/edit hike form.
pub const HIKE_FORM_FIELDS: [FormField; 9] = [
    FormField {
        name: "hike_date",
        label: "Hike date",
        input_type: "date",
        required: true,
    },
    FormField {
        name: "area_name",
        label: "Area",
        input_type: "text",
        required: true,
    },
    FormField {
        name: "trailhead",
        label: "Trailhead",
        input_type: "text",
        required: true,
    },
    FormField {
        name: "trails_cs",
        label: "Trails (comma-separated)",
        input_type: "text",
        required: true,
    },
    FormField {
        name: "distance_km",
        label: "Distance (KM)",
        input_type: "number",
        required: true,
    },
    FormField {
        name: "image_url",
        label: "Photo",
        input_type: "file",
        required: false,
    },
    FormField {
        name: "image_alt",
        label: "Photo description",
        input_type: "text",
        required: false,
    },
    FormField {
        name: "map_link",
        label: "Map link",
        input_type: "text",
        required: false,
    },
    FormField {
        name: "other_info",
        label: "Notes",
        input_type: "textarea",
        required: false,
    },
];

/// Look up a field in the hike form schema.
pub fn form_field(name: &str) -> Option<&'static FormField> {
    HIKE_FORM_FIELDS.iter().find(|f| f.name == name)
}

/// Split a comma-separated trail string into trail names.
pub fn split_trails(trails_cs: &str) -> Vec<String> {
    trails_cs.split(TRAIL_SEPARATOR).map(str::to_string).collect()
}
