use std::fs::File;
use std::io::Error;
use std::path::Path;

pub fn write_contributions(
    path: &Path,
    rows: &[(&str, &str, &str, &str)],
) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);

    wtr.write_record(["participant", "name", "phone", "quantity"])?;
    for (participant, name, phone, quantity) in rows {
        wtr.write_record([*participant, *name, *phone, *quantity])?;
    }

    wtr.flush()?;
    Ok(())
}
