#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Call and issue record types.
//!
//! A [`CallIssue`] is one intake record as stored by the organizing staff:
//! either a phone call or a written issue, tied to a tenant, a landlord,
//! an address and a set of categories. Geographic breakdowns only need
//! the narrow [`GeocodedRecord`] projection of it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Whether a record came in as a phone call or as a written issue.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RecordKind {
    /// A logged phone call.
    Call,
    /// A written issue (has a title and message).
    Issue,
}

/// Contact details for a tenant, landlord or staff representative.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// Phone number as entered.
    pub phone_number: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Management company (landlords only).
    pub management_company: Option<String>,
}

/// A street address, optionally geocoded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    /// Street line.
    pub street: Option<String>,
    /// Apartment or unit.
    pub unit_number: Option<String>,
    /// City.
    pub city: Option<String>,
    /// State abbreviation.
    pub state: Option<String>,
    /// ZIP code.
    pub zip: Option<String>,
    /// Latitude (WGS84).
    pub lat: Option<f64>,
    /// Longitude (WGS84).
    pub lon: Option<f64>,
}

/// A call or issue row as retrieved from the record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallIssue {
    /// Primary key.
    pub id: i64,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last edited.
    pub updated_at: Option<DateTime<Utc>>,
    /// Tenant who called or filed the issue.
    pub tenant: Option<Contact>,
    /// The tenant's landlord.
    pub landlord: Option<Contact>,
    /// Staff member who logged the record.
    pub rep: Option<Contact>,
    /// Address the record concerns.
    pub address: Option<Address>,
    /// Ward as recorded at intake.
    pub ward: Option<String>,
    /// Category names. Entries may be null when the record has no
    /// categories attached.
    #[serde(default)]
    pub categories: Vec<Option<String>>,
    pub has_lease: Option<bool>,
    pub received_lead_notice: Option<bool>,
    pub number_of_children_under_six: Option<i32>,
    pub number_of_units_in_building: Option<i32>,
    pub is_owner_occupied: Option<bool>,
    pub is_subsidized: Option<bool>,
    pub subsidy_type: Option<String>,
    pub is_rlto: Option<bool>,
    pub is_referred_by_info: Option<bool>,
    pub is_counseled_in_spanish: Option<bool>,
    pub is_referred_to_attorney: Option<bool>,
    pub referred_to_building_organizer: Option<bool>,
    /// Issue title. Calls have none.
    pub title: Option<String>,
    pub closed: Option<bool>,
    pub resolved: Option<bool>,
    pub area_of_residence: Option<String>,
    pub efforts_to_fix: Option<String>,
    /// Issue body.
    pub message: Option<String>,
    pub urgency: Option<String>,
    pub entry_availability: Option<String>,
    pub referred_to_whom: Option<String>,
    pub notes: Option<String>,
    pub heard_about_mto_from: Option<String>,
    pub materials_sent: Option<String>,
    pub is_interested_in_membership: Option<bool>,
    pub is_interested_in_tenant_congress: Option<bool>,
    pub number_of_materials_sent: Option<i32>,
    pub is_tenant_interested_in_volunteering: Option<bool>,
    pub is_referred_to_agency: Option<bool>,
    pub is_walkin: Option<bool>,
}

impl CallIssue {
    /// Creates a record with only the required fields set.
    #[must_use]
    pub const fn new(id: i64, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            created_at,
            updated_at: None,
            tenant: None,
            landlord: None,
            rep: None,
            address: None,
            ward: None,
            categories: Vec::new(),
            has_lease: None,
            received_lead_notice: None,
            number_of_children_under_six: None,
            number_of_units_in_building: None,
            is_owner_occupied: None,
            is_subsidized: None,
            subsidy_type: None,
            is_rlto: None,
            is_referred_by_info: None,
            is_counseled_in_spanish: None,
            is_referred_to_attorney: None,
            referred_to_building_organizer: None,
            title: None,
            closed: None,
            resolved: None,
            area_of_residence: None,
            efforts_to_fix: None,
            message: None,
            urgency: None,
            entry_availability: None,
            referred_to_whom: None,
            notes: None,
            heard_about_mto_from: None,
            materials_sent: None,
            is_interested_in_membership: None,
            is_interested_in_tenant_congress: None,
            number_of_materials_sent: None,
            is_tenant_interested_in_volunteering: None,
            is_referred_to_agency: None,
            is_walkin: None,
        }
    }

    /// Issues are the records with a non-empty title.
    #[must_use]
    pub fn kind(&self) -> RecordKind {
        if self.title.as_deref().is_some_and(|t| !t.trim().is_empty()) {
            RecordKind::Issue
        } else {
            RecordKind::Call
        }
    }

    /// ZIP code of the record's address, if any.
    #[must_use]
    pub fn zip(&self) -> Option<&str> {
        self.address.as_ref().and_then(|a| a.zip.as_deref())
    }

    /// Non-null, non-blank category names.
    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        clean_categories(&self.categories)
    }
}

/// The narrow projection of a record used for geographic aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeocodedRecord {
    /// Record identifier.
    pub id: i64,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// Longitude, absent when the address was never geocoded.
    pub lon: Option<f64>,
    /// Latitude, absent when the address was never geocoded.
    pub lat: Option<f64>,
    /// Category names, possibly containing nulls.
    pub categories: Vec<Option<String>>,
}

impl GeocodedRecord {
    /// `(lon, lat)` when both coordinates are present.
    #[must_use]
    pub const fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.lon, self.lat) {
            (Some(lon), Some(lat)) => Some((lon, lat)),
            _ => None,
        }
    }

    /// Non-null, non-blank category names.
    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        clean_categories(&self.categories)
    }
}

impl From<&CallIssue> for GeocodedRecord {
    fn from(record: &CallIssue) -> Self {
        let address = record.address.as_ref();
        Self {
            id: record.id,
            created_at: record.created_at,
            lon: address.and_then(|a| a.lon),
            lat: address.and_then(|a| a.lat),
            categories: record.categories.clone(),
        }
    }
}

fn clean_categories(categories: &[Option<String>]) -> impl Iterator<Item = &str> {
    categories
        .iter()
        .filter_map(Option::as_deref)
        .map(str::trim)
        .filter(|name| !name.is_empty())
}
