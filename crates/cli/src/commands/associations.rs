use anyhow::Context;
use scaffold_codegen::{AssociationGenerator, OutputFormat};
use std::path::Path;

pub fn show(
    generator: &AssociationGenerator,
    table: &str,
    format: OutputFormat,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            let written = generator
                .generate(table, format, path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            if written {
                println!("Wrote {}", path.display());
            } else {
                println!("Unchanged {}", path.display());
            }
        }
        None => {
            print!("{}", generator.render(table, format)?);
        }
    }

    Ok(())
}

pub fn generate_all(
    generator: &AssociationGenerator,
    output_dir: &Path,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let written = generator
        .generate_all(output_dir, format)
        .with_context(|| format!("Failed to generate into {}", output_dir.display()))?;

    for path in &written {
        println!("Wrote {}", path.display());
    }
    println!(
        "{} of {} association maps changed",
        written.len(),
        generator.schema().len()
    );

    Ok(())
}

pub fn contain(generator: &AssociationGenerator, table: &str) -> anyhow::Result<()> {
    print!("{}", generator.render_contain(table)?);
    Ok(())
}
