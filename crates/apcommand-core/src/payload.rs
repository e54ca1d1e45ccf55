// Field dictionary builders.
//
// Every band-scoped request starts from `base_data`; every committing
// request also carries `action = Apply`. Queries send the base alone so
// the firmware renders the page for that unit without saving anything.

use apcommand_api::FieldPayload;

use crate::policy::{ACTION_APPLY, Band, FIELD_ACTION, FIELD_UNIT};

/// `{wl_unit: <band unit>}`.
pub fn base_data(band: Band) -> FieldPayload {
    FieldPayload::new().with(FIELD_UNIT, band.unit_id())
}

/// `{action: Apply}`.
pub fn action_payload() -> FieldPayload {
    FieldPayload::new().with(FIELD_ACTION, ACTION_APPLY)
}

/// The base every committing command starts from: the apply marker plus
/// the unit selector when the command is band-scoped.
pub fn command_base(band: Option<Band>) -> FieldPayload {
    let mut data = action_payload();
    if let Some(band) = band {
        data.merge(&base_data(band));
    }
    data
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn base_data_selects_unit() {
        assert_eq!(
            base_data(Band::TwoPointFour),
            FieldPayload::new().with("wl_unit", "0")
        );
        assert_eq!(base_data(Band::Five), FieldPayload::new().with("wl_unit", "1"));
    }

    #[test]
    fn command_base_always_applies() {
        assert_eq!(command_base(None), FieldPayload::new().with("action", "Apply"));
        assert_eq!(
            command_base(Some(Band::Five)),
            FieldPayload::new()
                .with("wl_unit", "1")
                .with("action", "Apply")
        );
    }
}
