// build.rs

use std::env;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

const WEB_DIR: &str = "web";

fn main() -> io::Result<()> {
    println!("cargo:rerun-if-changed={}", WEB_DIR);

    let mut files = Vec::new();
    for entry in fs::read_dir(WEB_DIR)? {
        let path = entry?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();

    let out_dir = env::var("OUT_DIR").map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    let dest_path = Path::new(&out_dir).join("static_files.rs");
    let mut f = File::create(dest_path)?;

    writeln!(
        &mut f,
        "static STATIC_FILES: [(&str, &[u8]); {}] = [",
        files.len()
    )?;

    for path in files {
        let filename = match path.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => continue,
        };
        let data = fs::read(&path)?;
        let data_elements = data
            .iter()
            .map(|byte| format!("{}", byte))
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(
            &mut f,
            "    (\"{}\", &[\n        {}\n    ]),",
            filename, data_elements
        )?;
    }

    writeln!(&mut f, "];")?;
    Ok(())
}
