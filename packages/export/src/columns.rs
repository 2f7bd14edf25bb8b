//! Column table for the full call/issue record export.
//!
//! Each output column is a name paired with a function that extracts the
//! cell from a [`CallIssue`]. Adding a column means adding a row here.

use std::io::Write;

use chrono::{DateTime, Utc};
use reporter_records_models::{Address, CallIssue, Contact};

use crate::ExportError;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One output column of the record export.
#[derive(Clone, Copy)]
pub struct Column {
    /// Header text.
    pub name: &'static str,
    /// Produces the cell text for a record. Missing values are empty.
    pub extract: fn(&CallIssue) -> String,
}

impl std::fmt::Debug for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Column")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Record export columns, in output order.
pub const RECORD_COLUMNS: &[Column] = &[
    Column {
        name: "id",
        extract: |r| r.id.to_string(),
    },
    Column {
        name: "call_issue",
        extract: |r| r.kind().to_string(),
    },
    Column {
        name: "created_at",
        extract: |r| timestamp(Some(&r.created_at)),
    },
    Column {
        name: "updated_at",
        extract: |r| timestamp(r.updated_at.as_ref()),
    },
    Column {
        name: "tenant_first_name",
        extract: |r| contact(r.tenant.as_ref(), |c| c.first_name.as_deref()),
    },
    Column {
        name: "tenant_last_name",
        extract: |r| contact(r.tenant.as_ref(), |c| c.last_name.as_deref()),
    },
    Column {
        name: "tenant_phone_number",
        extract: |r| contact(r.tenant.as_ref(), |c| c.phone_number.as_deref()),
    },
    Column {
        name: "tenant_email",
        extract: |r| contact(r.tenant.as_ref(), |c| c.email.as_deref()),
    },
    Column {
        name: "street",
        extract: |r| address(r, |a| a.street.as_deref()),
    },
    Column {
        name: "unit_number",
        extract: |r| address(r, |a| a.unit_number.as_deref()),
    },
    Column {
        name: "city",
        extract: |r| address(r, |a| a.city.as_deref()),
    },
    Column {
        name: "state",
        extract: |r| address(r, |a| a.state.as_deref()),
    },
    Column {
        name: "zip",
        extract: |r| address(r, |a| a.zip.as_deref()),
    },
    Column {
        name: "lat",
        extract: |r| number(r.address.as_ref().and_then(|a| a.lat)),
    },
    Column {
        name: "lon",
        extract: |r| number(r.address.as_ref().and_then(|a| a.lon)),
    },
    Column {
        name: "ward",
        extract: |r| text(r.ward.as_deref()),
    },
    Column {
        name: "landlord_first_name",
        extract: |r| contact(r.landlord.as_ref(), |c| c.first_name.as_deref()),
    },
    Column {
        name: "landlord_last_name",
        extract: |r| contact(r.landlord.as_ref(), |c| c.last_name.as_deref()),
    },
    Column {
        name: "landlord_management_company",
        extract: |r| contact(r.landlord.as_ref(), |c| c.management_company.as_deref()),
    },
    Column {
        name: "landlord_email",
        extract: |r| contact(r.landlord.as_ref(), |c| c.email.as_deref()),
    },
    Column {
        name: "rep_first_name",
        extract: |r| contact(r.rep.as_ref(), |c| c.first_name.as_deref()),
    },
    Column {
        name: "rep_last_name",
        extract: |r| contact(r.rep.as_ref(), |c| c.last_name.as_deref()),
    },
    Column {
        name: "has_lease",
        extract: |r| flag(r.has_lease),
    },
    Column {
        name: "received_lead_notice",
        extract: |r| flag(r.received_lead_notice),
    },
    Column {
        name: "number_of_children_under_six",
        extract: |r| number(r.number_of_children_under_six),
    },
    Column {
        name: "number_of_units_in_building",
        extract: |r| number(r.number_of_units_in_building),
    },
    Column {
        name: "is_owner_occupied",
        extract: |r| flag(r.is_owner_occupied),
    },
    Column {
        name: "is_subsidized",
        extract: |r| flag(r.is_subsidized),
    },
    Column {
        name: "subsidy_type",
        extract: |r| text(r.subsidy_type.as_deref()),
    },
    Column {
        name: "is_rlto",
        extract: |r| flag(r.is_rlto),
    },
    Column {
        name: "is_referred_by_info",
        extract: |r| flag(r.is_referred_by_info),
    },
    Column {
        name: "is_counseled_in_spanish",
        extract: |r| flag(r.is_counseled_in_spanish),
    },
    Column {
        name: "is_referred_to_attorney",
        extract: |r| flag(r.is_referred_to_attorney),
    },
    Column {
        name: "referred_to_building_organizer",
        extract: |r| flag(r.referred_to_building_organizer),
    },
    Column {
        name: "categories",
        extract: |r| r.category_names().collect::<Vec<_>>().join(", "),
    },
    Column {
        name: "title",
        extract: |r| text(r.title.as_deref()),
    },
    Column {
        name: "closed",
        extract: |r| flag(r.closed),
    },
    Column {
        name: "resolved",
        extract: |r| flag(r.resolved),
    },
    Column {
        name: "area_of_residence",
        extract: |r| text(r.area_of_residence.as_deref()),
    },
    Column {
        name: "efforts_to_fix",
        extract: |r| text(r.efforts_to_fix.as_deref()),
    },
    Column {
        name: "message",
        extract: |r| text(r.message.as_deref()),
    },
    Column {
        name: "urgency",
        extract: |r| text(r.urgency.as_deref()),
    },
    Column {
        name: "entry_availability",
        extract: |r| text(r.entry_availability.as_deref()),
    },
    Column {
        name: "referred_to_whom",
        extract: |r| text(r.referred_to_whom.as_deref()),
    },
    Column {
        name: "notes",
        extract: |r| text(r.notes.as_deref()),
    },
    Column {
        name: "heard_about_mto_from",
        extract: |r| text(r.heard_about_mto_from.as_deref()),
    },
    Column {
        name: "materials_sent",
        extract: |r| text(r.materials_sent.as_deref()),
    },
    Column {
        name: "is_interested_in_membership",
        extract: |r| flag(r.is_interested_in_membership),
    },
    Column {
        name: "is_interested_in_tenant_congress",
        extract: |r| flag(r.is_interested_in_tenant_congress),
    },
    Column {
        name: "number_of_materials_sent",
        extract: |r| number(r.number_of_materials_sent),
    },
    Column {
        name: "is_tenant_interested_in_volunteering",
        extract: |r| flag(r.is_tenant_interested_in_volunteering),
    },
    Column {
        name: "is_referred_to_agency",
        extract: |r| flag(r.is_referred_to_agency),
    },
    Column {
        name: "is_walkin",
        extract: |r| flag(r.is_walkin),
    },
];

/// Header row of the record export.
#[must_use]
pub fn record_header() -> Vec<&'static str> {
    RECORD_COLUMNS.iter().map(|c| c.name).collect()
}

/// Cells for one record, in [`RECORD_COLUMNS`] order.
#[must_use]
pub fn record_row(record: &CallIssue) -> Vec<String> {
    RECORD_COLUMNS.iter().map(|c| (c.extract)(record)).collect()
}

/// Writes the header and one row per record.
///
/// # Errors
///
/// Returns [`ExportError`] if serialization or the underlying writer
/// fails.
pub fn write_records_csv<'a, W, I>(writer: W, records: I) -> Result<(), ExportError>
where
    W: Write,
    I: IntoIterator<Item = &'a CallIssue>,
{
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(record_header())?;

    let mut rows = 0_usize;
    for record in records {
        csv.write_record(record_row(record))?;
        rows += 1;
    }
    csv.flush()?;

    log::debug!("Wrote {rows} record rows");
    Ok(())
}

fn text(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

fn flag(value: Option<bool>) -> String {
    value.map(|b| b.to_string()).unwrap_or_default()
}

fn number<T: ToString>(value: Option<T>) -> String {
    value.map(|n| n.to_string()).unwrap_or_default()
}

fn timestamp(value: Option<&DateTime<Utc>>) -> String {
    value
        .map(|at| at.format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_default()
}

fn contact(contact: Option<&Contact>, field: fn(&Contact) -> Option<&str>) -> String {
    text(contact.and_then(field))
}

fn address(record: &CallIssue, field: fn(&Address) -> Option<&str>) -> String {
    text(record.address.as_ref().and_then(field))
}
