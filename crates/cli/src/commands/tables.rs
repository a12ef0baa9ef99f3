use scaffold_codegen::AssociationGenerator;

pub fn list(generator: &AssociationGenerator) {
    for table in generator.schema().tables() {
        println!(
            "{} ({}, {} associations)",
            table.alias(),
            table.type_name(),
            table.associations().count()
        );
    }
}
