use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::workflows::campaigns::domain::{ApplicationEnd, CampaignStatus, Fulfillment};

const LOCAL_DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y.%m.%d"];

fn normalize_token(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    cleaned.trim().to_ascii_lowercase()
}

pub(crate) fn normalize_status(raw: &str) -> Option<CampaignStatus> {
    match normalize_token(raw).as_str() {
        "recruiting" | "active" | "open" => Some(CampaignStatus::Recruiting),
        "closed" | "ended" | "completed" | "expired" => Some(CampaignStatus::Closed),
        "draft" | "pending" | "hidden" => Some(CampaignStatus::Draft),
        _ => None,
    }
}

/// Anything that is not explicitly a shipped product is reviewed without a delivery leg.
pub(crate) fn normalize_fulfillment(raw: Option<&str>) -> Fulfillment {
    match raw.map(normalize_token).as_deref() {
        Some("delivery" | "shipping" | "shipped" | "product" | "true" | "yes") => {
            Fulfillment::Delivery
        }
        _ => Fulfillment::NoShipment,
    }
}

/// Date-only values stay inclusive through end of day; wall-clock values are read in
/// business time.
pub(crate) fn parse_application_end(
    raw: &str,
    business_offset: FixedOffset,
) -> Option<ApplicationEnd> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(ApplicationEnd::Instant(instant.with_timezone(&Utc)));
    }

    for format in LOCAL_DATETIME_FORMATS {
        if let Ok(local) = NaiveDateTime::parse_from_str(trimmed, format) {
            return business_offset
                .from_local_datetime(&local)
                .single()
                .map(|instant| ApplicationEnd::Instant(instant.with_timezone(&Utc)));
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .map(ApplicationEnd::Date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kst() -> FixedOffset {
        FixedOffset::east_opt(9 * 3600).expect("valid offset")
    }

    #[test]
    fn status_tokens_are_case_and_bom_insensitive() {
        assert_eq!(
            normalize_status("\u{feff} Active "),
            Some(CampaignStatus::Recruiting)
        );
        assert_eq!(normalize_status("ENDED"), Some(CampaignStatus::Closed));
        assert_eq!(normalize_status("archived"), None);
    }

    #[test]
    fn rfc3339_deadline_keeps_its_own_offset() {
        let end = parse_application_end("2025-06-30T23:00:00+00:00", kst()).expect("parses");
        assert_eq!(
            end,
            ApplicationEnd::Instant(
                Utc.with_ymd_and_hms(2025, 6, 30, 23, 0, 0)
                    .single()
                    .expect("valid")
            )
        );
    }

    #[test]
    fn dotted_dates_are_accepted() {
        assert_eq!(
            parse_application_end("2025.06.30", kst()),
            Some(ApplicationEnd::Date(
                NaiveDate::from_ymd_opt(2025, 6, 30).expect("valid")
            ))
        );
        assert_eq!(parse_application_end("next friday", kst()), None);
    }

    #[test]
    fn missing_fulfillment_defaults_to_no_shipment() {
        assert_eq!(normalize_fulfillment(None), Fulfillment::NoShipment);
        assert_eq!(normalize_fulfillment(Some("Shipping")), Fulfillment::Delivery);
    }
}
