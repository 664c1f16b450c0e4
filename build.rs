// build.rs

use glob::glob;
use std::env;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// A linear-system fixture discovered in the `data/` directory.
#[derive(Debug)]
struct Fixture {
    pub name: String,
    pub path: PathBuf,
}

/// Discovers all augmented-system fixtures under `data/`.
fn get_all_fixtures() -> Vec<Fixture> {
    glob("data/*.csv")
        .expect("Failed to read glob pattern")
        .filter_map(Result::ok)
        .map(|path| {
            let name = path
                .file_stem()
                .unwrap()
                .to_string_lossy()
                .to_string()
                .replace('-', "_");
            Fixture { name, path }
        })
        .collect()
}

fn main() {
    println!("cargo:rerun-if-changed=data");

    let out_dir = env::var("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("fixture_tests.rs");
    let mut file = BufWriter::new(File::create(&dest_path).unwrap());

    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();

    // Generate a separate `#[test]` function for each fixture.
    for fixture in get_all_fixtures() {
        let path = Path::new(&manifest_dir).join(&fixture.path);
        writeln!(
            file,
            r#"
#[test]
fn fixture_{name}() -> anyhow::Result<()> {{
    run_fixture("{path}")
}}
"#,
            name = fixture.name,
            path = path.to_str().unwrap().escape_default(),
        )
        .unwrap();
    }
}
