use scaffold_codegen::AssociationGenerator;

pub fn list(generator: &AssociationGenerator, table: &str) -> anyhow::Result<()> {
    for alias in generator.junction_aliases(table)? {
        println!("{}", alias);
    }
    Ok(())
}

pub fn filter_has_many(
    generator: &AssociationGenerator,
    table: &str,
    aliases: &[String],
) -> anyhow::Result<()> {
    for alias in generator.filter_has_many_aliases(table, aliases)? {
        println!("{}", alias);
    }
    Ok(())
}
