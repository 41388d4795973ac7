use anyhow::Result;
use console::style;

pub fn execute() -> Result<()> {
    println!(
        "{} {}",
        style("Banana CLI").bold().yellow(),
        env!("CARGO_PKG_VERSION")
    );
    Ok(())
}
