//! Field extraction from the AP's `radio.asp` and `ssid.asp` markup.
//!
//! Every lookup returns `None` when the element is missing or malformed;
//! callers decide which sentinel to show.

use scraper::{ElementRef, Html, Selector};
use tracing::trace;

/// A named field on one of the radio/SSID pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// `wl_channel`: control channel of the selected unit.
    Channel,
    /// `wl_radio`: "Enabled" or "Disabled".
    RadioState,
    /// `wl_nctrlsb`: control sideband ("Lower"/"Upper"), 5 GHz only.
    Sideband,
    /// `wl_nbw_cap`: bandwidth capability text.
    Bandwidth,
    /// `wl_ssid`: network name of the selected unit.
    Ssid,
}

impl Field {
    /// The form name the field carries in the markup.
    pub fn name(self) -> &'static str {
        match self {
            Self::Channel => "wl_channel",
            Self::RadioState => "wl_radio",
            Self::Sideband => "wl_nctrlsb",
            Self::Bandwidth => "wl_nbw_cap",
            Self::Ssid => "wl_ssid",
        }
    }
}

/// Extract a field's current value from page markup.
pub fn field(html: &str, field: Field) -> Option<String> {
    let doc = Html::parse_document(html);
    let value = match field {
        // The channel list only covers the selected unit; older firmware
        // omits `selected` and lists the active channel first.
        Field::Channel => selected_option(&doc, field.name())
            .or_else(|| first_option(&doc, field.name()))
            .and_then(|option| option.value().attr("value").map(str::to_owned)),
        Field::RadioState | Field::Sideband | Field::Bandwidth => {
            selected_option(&doc, field.name()).map(|option| element_text(&option))
        }
        Field::Ssid => input_value(&doc, field.name()),
    };
    trace!(field = field.name(), ?value, "scraped field");
    value.filter(|v| !v.is_empty())
}

/// The MAC address text shown for a radio unit in the `wl_unit` selector,
/// e.g. `(00:90:4C:13:11:03)`.
pub fn unit_mac(html: &str, unit: &str) -> Option<String> {
    let doc = Html::parse_document(html);
    let selector = Selector::parse(&format!(
        r#"select[name="wl_unit"] option[value="{unit}"]"#
    ))
    .ok()?;
    doc.select(&selector)
        .next()
        .map(|option| element_text(&option))
        .filter(|text| !text.is_empty())
}

fn selected_option<'a>(doc: &'a Html, name: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(&format!(r#"select[name="{name}"] option[selected]"#)).ok()?;
    doc.select(&selector).next()
}

fn first_option<'a>(doc: &'a Html, name: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(&format!(r#"select[name="{name}"] option"#)).ok()?;
    doc.select(&selector).next()
}

fn input_value(doc: &Html, name: &str) -> Option<String> {
    let selector = Selector::parse(&format!(r#"input[name="{name}"]"#)).ok()?;
    doc.select(&selector)
        .next()
        .and_then(|input| input.value().attr("value"))
        .map(str::to_owned)
}

fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_owned()
}
