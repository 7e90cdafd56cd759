use crate::numerical::trapezoid::SampleGrid;
use csv::Writer;
use std::fs::File;
use std::io;

/// Dumps the sampled grid as a two-column CSV: the argument column and the
/// flow-rate column, one row per node.
pub fn save_grid_to_csv(
    grid: &SampleGrid,
    filename: &str,
    arg: &str,
    value: &str,
) -> io::Result<()> {
    let file = File::create(filename)?;
    let mut writer = Writer::from_writer(file);

    writer.write_record([arg, value])?;
    for (t, y) in grid.nodes.iter().zip(grid.values.iter()) {
        writer.write_record([t.to_string(), y.to_string()])?;
    }

    writer.flush()?;
    Ok(())
}
