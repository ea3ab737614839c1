use crate::extract::text_joined;
use crate::model::{Condition, Furniture, ListingDetail};
use crate::normalize::{parse_area, parse_posted};
use chrono::NaiveDate;
use scraper::{Html, Selector};

/// Parses the fixed parameter set out of a listing's own page
///
/// The parameters container holds one `<p>` per attribute, each a
/// `"Label: value"` pair. Every label maps to exactly one field; an absent
/// label leaves that field absent (or `Unspecified` for the condition).
/// The posted date lives in a separate marked span.
pub fn parse_detail_page(html: &str, card_id: &str, today: NaiveDate) -> ListingDetail {
    let document = Html::parse_document(html);
    let mut detail = ListingDetail::empty(card_id);

    if let Some(container) = Selector::parse("div[data-testid='ad-parameters-container']")
        .ok()
        .and_then(|selector| document.select(&selector).next())
    {
        if let Ok(paragraph_selector) = Selector::parse("p") {
            for paragraph in container.select(&paragraph_selector) {
                let text = text_joined(paragraph);
                apply_parameter(&mut detail, &text);
            }
        }
    }

    if let Some(posted) = Selector::parse("span[data-testid='ad-posted-at']")
        .ok()
        .and_then(|selector| document.select(&selector).next())
    {
        detail.date = parse_posted(&text_joined(posted), today).date;
    }

    detail
}

/// Routes one "Label: value" line into its field. Unknown labels are noise.
fn apply_parameter(detail: &mut ListingDetail, text: &str) {
    let value = label_value(text);

    if text.starts_with("Количество комнат") {
        detail.number_rooms = (!value.is_empty()).then(|| value.to_string());
    } else if text.starts_with("Общая площадь") {
        detail.area = parse_area(value);
    } else if text.starts_with("Меблирована") {
        detail.furniture = Some(if value.to_lowercase() == "да" {
            Furniture::Yes
        } else {
            Furniture::No
        });
    } else if text.starts_with("Ремонт") {
        detail.condition = if value.is_empty() {
            Condition::Unspecified
        } else {
            Condition::Specified(value.to_string())
        };
    }
}

/// Text after the last `:`, trimmed; the whole text when there is none.
fn label_value(text: &str) -> &str {
    match text.rsplit_once(':') {
        Some((_, value)) => value.trim(),
        None => text.trim(),
    }
}
