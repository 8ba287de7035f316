use serde::Serialize;
use crate::postal::model::PostOfficeRecord;

/// Output row for `--json`
#[derive(Debug, Serialize)]
pub struct Record<'a> {
    name: Option<&'a str>,
    pincode: Option<&'a str>,
    district: Option<&'a str>,
    state: Option<&'a str>,
}

impl<'a> From<&'a PostOfficeRecord> for Record<'a> {
    fn from(office: &'a PostOfficeRecord) -> Self {
        Self {
            name: office.name.as_deref(),
            pincode: office.pincode.as_deref(),
            district: office.district.as_deref(),
            state: office.state.as_deref(),
        }
    }
}

/// serialize the displayed records as a pretty JSON array
pub fn records_to_json(records: &[&PostOfficeRecord]) -> serde_json::Result<String> {
    let rows = records.iter().map(|office| Record::from(*office)).collect::<Vec<_>>();
    serde_json::to_string_pretty(&rows)
}
