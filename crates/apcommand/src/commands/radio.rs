//! `enable` / `disable`.

use apcommand_core::AccessPoint;

use crate::cli::{BandArg, GlobalOpts};
use crate::error::CliError;
use crate::output;

pub async fn enable(
    access_point: &AccessPoint,
    band: BandArg,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let band = super::band(band);
    access_point.enable(band).await?;
    output::print_done(&format!("{band} radio enabled"), global.quiet);
    Ok(())
}

pub async fn disable(
    access_point: &AccessPoint,
    band: BandArg,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let band = super::band(band);
    access_point.disable(band).await?;
    output::print_done(&format!("{band} radio disabled"), global.quiet);
    Ok(())
}
