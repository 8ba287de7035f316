use crate::lookup::{LookupController, LookupResult};
use crate::postal::model::PostOfficeRecord;
use crate::postal::PostalApi;

pub const NO_RESULTS: &str = "Couldn't find the postal data you're looking for...";

/// Render the status region, the filter line and the result cards
pub fn render_view<A: PostalApi + Sync>(controller: &LookupController<A>) -> String {
    if controller.is_loading() {
        return "Loading...\n".to_owned();
    }
    let mut out = String::new();
    match controller.result() {
        LookupResult::Idle | LookupResult::Loading => {}
        LookupResult::Failure(reason) => out.push_str(&format!("error: {reason}\n")),
        LookupResult::Success(all) => {
            let records = controller.filtered_records();
            let term = controller.filter_input().trim();
            if term.is_empty() {
                out.push_str(&format!("{} post office(s), narrow with /filter <name>\n", all.len()));
            } else {
                out.push_str(&format!("filter \"{term}\": {} of {} post office(s)\n", records.len(), all.len()));
            }
            if records.is_empty() {
                out.push_str(NO_RESULTS);
                out.push('\n');
            }
            for record in records {
                out.push('\n');
                out.push_str(&render_card(record));
            }
        }
    }
    out
}

pub fn render_card(record: &PostOfficeRecord) -> String {
    let field = |v: &Option<String>| v.clone().unwrap_or_default();
    format!(
        "  Post Office Name: {}\n  Pincode: {}\n  District: {}\n  State: {}\n",
        field(&record.name),
        field(&record.pincode),
        field(&record.district),
        field(&record.state),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LookupError;
    use crate::postal::model::Pincode;

    struct NoApi;

    impl PostalApi for NoApi {
        async fn fetch_body(&self, _pincode: &Pincode) -> Result<String, LookupError> {
            Err(LookupError::transport("offline"))
        }
    }

    fn office(name: &str, district: &str) -> PostOfficeRecord {
        PostOfficeRecord {
            name: Some(name.into()),
            pincode: Some("110001".into()),
            district: Some(district.into()),
            state: Some("Delhi".into()),
        }
    }

    fn with_success(records: Vec<PostOfficeRecord>) -> LookupController<NoApi> {
        let mut controller = LookupController::new(NoApi);
        controller.set_pincode_input("110001");
        let ticket = controller.begin_lookup().unwrap();
        assert!(controller.complete_lookup(ticket, Ok(records)));
        controller
    }

    #[test]
    fn idle_renders_nothing() {
        assert_eq!(render_view(&LookupController::new(NoApi)), "");
    }

    #[test]
    fn loading_and_failure_status() {
        let mut controller = LookupController::new(NoApi);
        controller.set_pincode_input("110001");
        let _ticket = controller.begin_lookup();
        assert_eq!(render_view(&controller), "Loading...\n");

        controller.set_pincode_input("12a456");
        assert!(controller.begin_lookup().is_none());
        assert_eq!(render_view(&controller), "error: Postal code must be exactly 6 digits.\n");
    }

    #[test]
    fn cards_show_all_four_fields() {
        let view = render_view(&with_success(vec![office("Connaught Place", "New Delhi")]));
        assert!(view.starts_with("1 post office(s)"));
        assert!(view.contains("  Post Office Name: Connaught Place\n  Pincode: 110001\n  District: New Delhi\n  State: Delhi\n"));
        assert!(!view.contains(NO_RESULTS));
    }

    #[test]
    fn empty_filter_result_shows_message() {
        let mut controller = with_success(vec![office("Connaught Place", "New Delhi")]);
        controller.set_filter_input("zzz");
        let view = render_view(&controller);
        assert!(view.starts_with("filter \"zzz\": 0 of 1 post office(s)"));
        assert!(view.contains(NO_RESULTS));
        assert!(!view.contains("Post Office Name"));
    }

    #[test]
    fn empty_success_shows_message() {
        assert!(render_view(&with_success(Vec::new())).contains(NO_RESULTS));
    }

    #[test]
    fn missing_fields_render_blank() {
        let card = render_card(&PostOfficeRecord::default());
        assert_eq!(card, "  Post Office Name: \n  Pincode: \n  District: \n  State: \n");
    }
}
