use ironrest::GeneratorConfig;
use std::env;
use std::fs;
use std::path::PathBuf;

fn main() {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let schemas = manifest_dir.join("schemas");

    let common = fs::read_to_string(schemas.join("common.json")).expect("Failed to read common.json");
    let api = fs::read_to_string(schemas.join("api.json")).expect("Failed to read api.json");

    let config = GeneratorConfig::builder()
        .output_dir(manifest_dir.join("src/generated"))
        .build();
    ironrest::generate(&[("common", common.as_str()), ("api", api.as_str())], config)
        .expect("Failed to generate types");

    println!("cargo:rerun-if-changed=schemas");
    println!("cargo:rerun-if-changed=build.rs");
}
