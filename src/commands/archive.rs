use crate::core::{
    command_init::{StoreInit, StoreOptions},
    error::Result,
    file_uri,
    output::{print_json, print_success},
};

/// Archive the sketch at `sketch` into the zip file `destination`
pub fn execute_archive(options: &StoreOptions, sketch: &str, destination: &str) -> Result<()> {
    let store = StoreInit::initialize(options)?;
    let sketch = store.load_sketch(&file_uri::parse(sketch)?)?;
    let destination = file_uri::parse(destination)?;

    let archive = store.archive(&sketch, &destination)?;

    if options.json {
        return print_json(&archive);
    }
    let archive_path = file_uri::to_path(&archive)?;
    print_success(&format!("Archived {} to {}", sketch.name, archive_path.display()));
    println!();
    Ok(())
}
