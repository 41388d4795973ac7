use anyhow::Result;
use banana::use_case::UseCase;
use console::style;

pub fn execute() -> Result<()> {
    for info in UseCase::catalog() {
        println!("{}  {}", style(&info.id).cyan().bold(), style(info.title).bold());
        println!("    {}", style(info.description).dim());
    }
    Ok(())
}
