use crate::domain::model::ProfitResult;
use crate::utils::error::Result;
use std::io::Write;

/// Writes results as CSV with a `name,level,price,cost,profit` header.
pub fn write_csv<'a, W, I>(writer: W, results: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a ProfitResult>,
{
    let mut csv_writer = csv::Writer::from_writer(writer);
    for result in results {
        csv_writer.serialize(result)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn format_result(result: &ProfitResult) -> String {
    format!(
        "{} (lvl {}): {:+} gp [sell {} | cost {}]",
        result.name, result.level, result.profit, result.price, result.cost
    )
}
