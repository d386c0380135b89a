//! CSV export of a gap decomposition.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::gap::types::{EyaEstimate, GapDecomposition, OaResult};
use crate::reporting::UNDEFINED;

/// Column header of the component table.
const HEADER: &str = "category,eya_value,oa_value,difference,aep_impact_gwh";

/// Header of the trailing summary block.
const SUMMARY_HEADER: &str = "summary,value";

/// Exports a decomposition to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(
    eya: &EyaEstimate,
    oa: &OaResult,
    decomposition: &GapDecomposition,
    path: &Path,
) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(eya, oa, decomposition, buf)?;
    tracing::info!(path = %path.display(), "exported gap decomposition");
    Ok(())
}

/// Writes the component table and summary block as CSV to any writer.
///
/// One row per component (turbine ideal energy, availability, electrical,
/// unexplained) followed by the summary rows (EYA AEP, OA AEP, gap, gap
/// percent). Energies are in GWh, loss fractions in percent; the OA loss
/// columns carry the sensitivity-adjusted values. Output is deterministic
/// for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(
    eya: &EyaEstimate,
    oa: &OaResult,
    decomposition: &GapDecomposition,
    writer: impl Write,
) -> io::Result<()> {
    let d = decomposition;
    let mut wtr = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(writer);

    wtr.write_record(HEADER.split(','))?;

    wtr.write_record(&[
        "Turbine Ideal Energy (GWh)".to_string(),
        format!("{:.6}", d.eya_ideal_energy),
        format!("{:.6}", oa.turbine_ideal_energy),
        format!("{:.6}", oa.turbine_ideal_energy - d.eya_ideal_energy),
        format!("{:.6}", d.turbine_ideal_diff),
    ])?;
    wtr.write_record(&[
        "Availability Losses (%)".to_string(),
        format!("{:.4}", eya.availability_losses * 100.0),
        format!("{:.4}", d.adjusted_availability_losses * 100.0),
        format!(
            "{:.4}",
            (d.adjusted_availability_losses - eya.availability_losses) * 100.0
        ),
        format!("{:.6}", d.availability_diff),
    ])?;
    wtr.write_record(&[
        "Electrical Losses (%)".to_string(),
        format!("{:.4}", eya.electrical_losses * 100.0),
        format!("{:.4}", d.adjusted_electrical_losses * 100.0),
        format!(
            "{:.4}",
            (d.adjusted_electrical_losses - eya.electrical_losses) * 100.0
        ),
        format!("{:.6}", d.electrical_diff),
    ])?;
    wtr.write_record(&[
        "Unexplained (GWh)".to_string(),
        String::new(),
        String::new(),
        String::new(),
        format!("{:.6}", d.unexplained_residual),
    ])?;

    wtr.write_record(SUMMARY_HEADER.split(','))?;
    wtr.write_record(&["EYA AEP (GWh)".to_string(), format!("{:.6}", d.eya_aep)])?;
    wtr.write_record(&["OA AEP (GWh)".to_string(), format!("{:.6}", d.oa_aep)])?;
    wtr.write_record(&["Gap (GWh)".to_string(), format!("{:.6}", d.gap)])?;
    wtr.write_record(&[
        "Gap (%)".to_string(),
        d.gap_percent
            .map_or_else(|| UNDEFINED.to_string(), |p| format!("{p:.4}")),
    ])?;

    wtr.flush()?;
    Ok(())
}
