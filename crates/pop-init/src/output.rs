//! CSV export of an initialized population.

use std::io::Write;
use std::path::Path;

use csv::Writer;

use crate::{InitResult, Population};

/// Write `population` to `path` as `agent_id,date_of_birth,date_of_death`,
/// one row per agent in index order.
pub fn write_population_csv(path: &Path, population: &Population) -> InitResult<()> {
    let file = std::fs::File::create(path)?;
    write_population(file, population)
}

/// Like [`write_population_csv`] but accepts any `Write` sink.
pub fn write_population<W: Write>(sink: W, population: &Population) -> InitResult<()> {
    let mut writer = Writer::from_writer(sink);
    writer.write_record(["agent_id", "date_of_birth", "date_of_death"])?;
    for (agent, dob, dod) in population.iter() {
        writer.write_record(&[agent.0.to_string(), dob.0.to_string(), dod.0.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}
